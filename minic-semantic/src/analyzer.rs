use minic_core::Location;
use minic_syntax::{Ast, AstNode, ElseBranch, Expr, FunctionDecl, IfStmt, TypeName, VarDecl};
use minic_token::{Operator, TokenKind};

use crate::collect::Collector;
use crate::diagnostics::{Diagnostics, SemanticDiagnostic};
use crate::records::{FunctionInfo, GlobalVariable};
use crate::symbol_table::{SymbolTable, SymbolType, ValueType};

/// Everything the semantic stage hands to the driver: the declaration
/// records and the ordered diagnostic list (errors, warnings, and the
/// info-severity recursion notes).
#[derive(Debug)]
pub struct SemanticInfo {
    pub globals: Vec<GlobalVariable>,
    pub functions: Vec<FunctionInfo>,
    pub diagnostics: Vec<SemanticDiagnostic>,
}

#[derive(Debug)]
pub struct SemanticAnalyzer<'src> {
    content: &'src str,
    symbol_table: SymbolTable,
    diagnostics: Diagnostics,
}

impl<'src> SemanticAnalyzer<'src> {
    pub fn new(content: &'src str) -> Self {
        Self {
            content,
            symbol_table: SymbolTable::new(),
            diagnostics: Diagnostics::default(),
        }
    }

    pub fn analyze(&mut self, ast: &Ast) -> SemanticInfo {
        let (globals, functions) = Collector::new(self.content).collect(ast);

        for function in &functions {
            if function.name.is_empty() {
                self.diagnostics
                    .error(function.location, "function name missing");
            } else if function.is_recursive {
                self.diagnostics.info(
                    function.location,
                    format!("recursive function detected: '{}'", function.name),
                );
            }
        }

        for global in &globals {
            if global.name.is_empty() {
                self.diagnostics.error(
                    global.location,
                    format!(
                        "global variable has an incomplete declaration: '{}'",
                        global.name
                    ),
                );
            }
        }

        if !functions.iter().any(|f| f.name == "main") {
            self.diagnostics
                .warning(Location::new(0, 0, 1), "function 'main' not found");
        }

        self.check_nodes(&ast.nodes, None);

        SemanticInfo {
            globals,
            functions,
            diagnostics: std::mem::take(&mut self.diagnostics).items(),
        }
    }

    fn check_nodes(&mut self, nodes: &[AstNode], function: Option<&str>) {
        for node in nodes {
            self.check_node(node, function);
        }
    }

    fn check_node(&mut self, node: &AstNode, function: Option<&str>) {
        match node {
            AstNode::VarDecl(decl) => self.check_var_decl(decl, function),
            AstNode::Function(func) => self.check_function(func),
            AstNode::If(stmt) => self.check_if(stmt, function),
            AstNode::While(stmt) => {
                self.symbol_table.push_scope();
                self.check_nodes(&stmt.body, function);
                self.symbol_table.pop_scope();
            }
            AstNode::For(stmt) => {
                // the header declaration lives in the same scope as the body
                self.symbol_table.push_scope();
                if let Some(init) = &stmt.init {
                    self.check_node(init.as_ref(), function);
                }
                self.check_nodes(&stmt.body, function);
                self.symbol_table.pop_scope();
            }
            AstNode::Return(_)
            | AstNode::Break(_)
            | AstNode::Continue(_)
            | AstNode::Expr(_)
            | AstNode::Error(_) => {}
        }
    }

    fn check_if(&mut self, stmt: &IfStmt, function: Option<&str>) {
        self.symbol_table.push_scope();
        self.check_nodes(&stmt.then_body, function);
        self.symbol_table.pop_scope();

        match &stmt.else_branch {
            Some(ElseBranch::If(nested)) => self.check_if(nested, function),
            Some(ElseBranch::Block { body, .. }) => {
                self.symbol_table.push_scope();
                self.check_nodes(body, function);
                self.symbol_table.pop_scope();
            }
            None => {}
        }
    }

    fn check_function(&mut self, func: &FunctionDecl) {
        let name = func.name_text(self.content);

        self.symbol_table.push_scope();

        for param in &func.params {
            let Some(param_location) = param.name else {
                continue;
            };
            let param_name = &self.content[param_location.to_range()];

            if self.symbol_table.declared_in_current_scope(param_name) {
                self.diagnostics.error(
                    param_location,
                    format!("parameter '{param_name}' is already declared in function '{name}'"),
                );
            } else {
                self.symbol_table.declare_symbol(
                    param_name.to_string(),
                    param_location,
                    SymbolType::Parameter(param.ty.into()),
                );
            }
        }

        self.check_nodes(&func.body, Some(name));
        self.symbol_table.pop_scope();

        if func.return_type != TypeName::Void && !has_return(&func.body) {
            self.diagnostics.error(
                func.location,
                format!("non-void function '{name}' does not have a return statement"),
            );
        }
    }

    fn check_var_decl(&mut self, decl: &VarDecl, function: Option<&str>) {
        let Some(name_location) = decl.name else {
            // the parser already reported the missing name
            return;
        };
        let name = &self.content[name_location.to_range()];

        if self.symbol_table.declared_in_current_scope(name) {
            let message = match function {
                Some(func) => format!("variable '{name}' is already declared in function '{func}'"),
                None => format!("global variable '{name}' is already declared"),
            };
            self.diagnostics.error(name_location, message);
        } else {
            self.symbol_table.declare_symbol(
                name.to_string(),
                name_location,
                SymbolType::Variable(decl.ty.into()),
            );
        }

        self.check_initializer(decl, name);
    }

    /// Flat declared types only: single-literal (or single-identifier)
    /// initializers are checked against the declared type, anything more
    /// structured is left alone.
    fn check_initializer(&mut self, decl: &VarDecl, name: &str) {
        let Some(init) = &decl.initializer else {
            return;
        };
        let Some(value_type) = self.initializer_type(init) else {
            return;
        };

        let compatible = match decl.ty {
            TypeName::Int | TypeName::Float => value_type.is_numeric(),
            TypeName::String => value_type == ValueType::String,
            TypeName::Void => return,
        };

        if !compatible {
            self.diagnostics.error(
                init.location,
                format!(
                    "invalid initialization for variable '{name}' with value '{}'",
                    init.text(self.content)
                ),
            );
        }
    }

    fn initializer_type(&self, init: &Expr) -> Option<ValueType> {
        match init.tokens.as_slice() {
            [token] => match token.kind() {
                TokenKind::Number => Some(self.numeric_type(token.text(self.content))),
                TokenKind::StringLiteral => Some(self.literal_string_type(token.text(self.content))),
                TokenKind::Identifier => self
                    .symbol_table
                    .lookup_symbol(token.text(self.content))
                    .map(|symbol| symbol.symbol_type.value_type()),
                _ => None,
            },
            [sign, token]
                if matches!(
                    sign.kind(),
                    TokenKind::Operator(Operator::Minus | Operator::Plus)
                ) && token.kind() == TokenKind::Number =>
            {
                Some(self.numeric_type(token.text(self.content)))
            }
            _ => None,
        }
    }

    fn numeric_type(&self, text: &str) -> ValueType {
        match text.contains('.') {
            true => ValueType::Float,
            false => ValueType::Int,
        }
    }

    /// Double-quoted literals are strings; single-quoted character literals
    /// satisfy none of the declared types.
    fn literal_string_type(&self, text: &str) -> ValueType {
        match text.starts_with('"') {
            true => ValueType::String,
            false => ValueType::Unknown,
        }
    }
}

fn has_return(nodes: &[AstNode]) -> bool {
    nodes.iter().any(|node| match node {
        AstNode::Return(_) => true,
        AstNode::If(stmt) => if_has_return(stmt),
        AstNode::While(stmt) => has_return(&stmt.body),
        AstNode::For(stmt) => has_return(&stmt.body),
        _ => false,
    })
}

fn if_has_return(stmt: &IfStmt) -> bool {
    if has_return(&stmt.then_body) {
        return true;
    }

    match &stmt.else_branch {
        Some(ElseBranch::If(nested)) => if_has_return(nested),
        Some(ElseBranch::Block { body, .. }) => has_return(body),
        None => false,
    }
}
