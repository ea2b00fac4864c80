use std::collections::HashMap;

use minic_core::Location;
use minic_syntax::TypeName;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct Symbol {
    pub name: String,
    pub location: Location,
    pub symbol_type: SymbolType,
    pub scope_id: usize,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum SymbolType {
    Variable(ValueType),
    Parameter(ValueType),
}

impl SymbolType {
    pub fn value_type(&self) -> ValueType {
        match self {
            SymbolType::Variable(value_type) => *value_type,
            SymbolType::Parameter(value_type) => *value_type,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum ValueType {
    Int,
    Float,
    String,
    Unknown,
}

impl ValueType {
    pub fn is_numeric(self) -> bool {
        matches!(self, ValueType::Int | ValueType::Float)
    }
}

impl From<TypeName> for ValueType {
    fn from(ty: TypeName) -> Self {
        match ty {
            TypeName::Int => ValueType::Int,
            TypeName::Float => ValueType::Float,
            TypeName::String => ValueType::String,
            TypeName::Void => ValueType::Unknown,
        }
    }
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueType::Int => write!(f, "int"),
            ValueType::Float => write!(f, "float"),
            ValueType::String => write!(f, "string"),
            ValueType::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Vec<Symbol>>,
    scopes: Vec<Scope>,
    current_scope: usize,
}

#[derive(Debug, Clone)]
pub struct Scope {
    pub id: usize,
    pub parent: Option<usize>,
    pub symbols: Vec<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        let mut table = Self {
            symbols: HashMap::new(),
            scopes: Vec::new(),
            current_scope: 0,
        };

        table.push_scope();
        table
    }

    pub fn push_scope(&mut self) -> usize {
        let scope_id = self.scopes.len();
        let parent = if scope_id == 0 {
            None
        } else {
            Some(self.current_scope)
        };

        self.scopes.push(Scope {
            id: scope_id,
            parent,
            symbols: Vec::new(),
        });

        self.current_scope = scope_id;
        scope_id
    }

    pub fn pop_scope(&mut self) {
        if let Some(parent) = self.scopes[self.current_scope].parent {
            self.current_scope = parent;
        }
    }

    pub fn declare_symbol(&mut self, name: String, location: Location, symbol_type: SymbolType) {
        let symbol = Symbol {
            name: name.clone(),
            location,
            symbol_type,
            scope_id: self.current_scope,
        };

        self.scopes[self.current_scope].symbols.push(name.clone());
        self.symbols.entry(name).or_default().push(symbol);
    }

    /// Walks the scope chain from the current scope outwards. Inner
    /// declarations shadow outer ones.
    pub fn lookup_symbol(&self, name: &str) -> Option<&Symbol> {
        let symbols = self.symbols.get(name)?;

        let mut scope_id = Some(self.current_scope);
        while let Some(id) = scope_id {
            if let Some(symbol) = symbols.iter().rev().find(|s| s.scope_id == id) {
                return Some(symbol);
            }
            scope_id = self.scopes[id].parent;
        }

        None
    }

    /// Only consults the current scope; redeclaring a name from an outer
    /// scope is shadowing, not a duplicate.
    pub fn declared_in_current_scope(&self, name: &str) -> bool {
        self.symbols
            .get(name)
            .is_some_and(|symbols| symbols.iter().any(|s| s.scope_id == self.current_scope))
    }

    pub fn current_scope_id(&self) -> usize {
        self.current_scope
    }
}
