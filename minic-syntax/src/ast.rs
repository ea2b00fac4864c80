use minic_core::Location;
use minic_token::{Keyword, Token, TokenKind};
use serde::Serialize;

/// Declared type of a variable, parameter, or function return.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum TypeName {
    Int,
    Float,
    String,
    Void,
}

impl TypeName {
    pub fn from_keyword(keyword: Keyword) -> Option<TypeName> {
        match keyword {
            Keyword::Int => Some(TypeName::Int),
            Keyword::Float => Some(TypeName::Float),
            Keyword::String => Some(TypeName::String),
            Keyword::Void => Some(TypeName::Void),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TypeName::Int => "int",
            TypeName::Float => "float",
            TypeName::String => "string",
            TypeName::Void => "void",
        }
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a declaration was seen at file scope or inside a function body.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum DeclScope {
    Global,
    Local,
}

#[derive(Debug, Default)]
pub struct Ast {
    pub nodes: Vec<AstNode>,
}

#[derive(Debug)]
pub enum AstNode {
    VarDecl(VarDecl),
    Function(FunctionDecl),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Break(Location),
    Continue(Location),
    Expr(ExprStmt),
    Error(ErrorNode),
}

impl AstNode {
    pub fn location(&self) -> Location {
        match self {
            AstNode::VarDecl(decl) => decl.location,
            AstNode::Function(func) => func.location,
            AstNode::If(stmt) => stmt.location,
            AstNode::While(stmt) => stmt.location,
            AstNode::For(stmt) => stmt.location,
            AstNode::Return(stmt) => stmt.location,
            AstNode::Break(location) => *location,
            AstNode::Continue(location) => *location,
            AstNode::Expr(stmt) => stmt.location,
            AstNode::Error(error) => error.location,
        }
    }
}

#[derive(Debug)]
pub struct VarDecl {
    pub scope: DeclScope,
    pub ty: TypeName,
    pub name: Option<Location>,
    pub initializer: Option<Expr>,
    pub location: Location,
}

impl VarDecl {
    /// The declared name, or `""` when the parser had to recover without one.
    pub fn name_text<'src>(&self, content: &'src str) -> &'src str {
        self.name.map(|l| &content[l.to_range()]).unwrap_or("")
    }
}

#[derive(Debug)]
pub struct Param {
    pub ty: TypeName,
    pub name: Option<Location>,
    pub location: Location,
}

#[derive(Debug)]
pub struct FunctionDecl {
    pub return_type: TypeName,
    pub name: Option<Location>,
    pub params: Vec<Param>,
    pub body: Vec<AstNode>,
    pub location: Location,
    pub keyword: Location,
}

impl FunctionDecl {
    pub fn name_text<'src>(&self, content: &'src str) -> &'src str {
        self.name.map(|l| &content[l.to_range()]).unwrap_or("")
    }
}

#[derive(Debug)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_body: Vec<AstNode>,
    pub else_branch: Option<ElseBranch>,
    pub location: Location,
    pub keyword: Location,
}

#[derive(Debug)]
pub enum ElseBranch {
    If(Box<IfStmt>),
    Block {
        body: Vec<AstNode>,
        keyword: Location,
        location: Location,
    },
}

#[derive(Debug)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Vec<AstNode>,
    pub location: Location,
    pub keyword: Location,
}

#[derive(Debug)]
pub struct ForStmt {
    pub init: Option<Box<AstNode>>,
    pub condition: Option<Expr>,
    pub step: Option<Expr>,
    pub body: Vec<AstNode>,
    pub location: Location,
    pub keyword: Location,
}

#[derive(Debug)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub location: Location,
    pub keyword: Location,
}

#[derive(Debug)]
pub struct ExprStmt {
    pub expr: Expr,
    pub location: Location,
}

#[derive(Debug)]
pub struct ErrorNode {
    pub token: TokenKind,
    pub location: Location,
}

/// A flat run of expression tokens. Conditions, initializers, and expression
/// statements keep their tokens in source order without any operator
/// structure; parenthesised sub-runs (call shapes) stay inside one run.
#[derive(Debug)]
pub struct Expr {
    pub tokens: Vec<Token>,
    pub location: Location,
}

impl Expr {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn text<'src>(&self, content: &'src str) -> &'src str {
        &content[self.location.to_range()]
    }
}
