use minic_syntax::{Ast, AstNode, DeclScope, ElseBranch, Expr, FunctionDecl, IfStmt, VarDecl};
use minic_token::{Delimiter, TokenKind};

use crate::records::{FunctionInfo, GlobalVariable};

/// The one authority for declaration records: a single walk over the syntax
/// tree that fills the global-variable and function lists the driver and the
/// semantic checks consume.
pub(crate) struct Collector<'src> {
    content: &'src str,
}

impl<'src> Collector<'src> {
    pub(crate) fn new(content: &'src str) -> Self {
        Self { content }
    }

    pub(crate) fn collect(&self, ast: &Ast) -> (Vec<GlobalVariable>, Vec<FunctionInfo>) {
        let mut globals = Vec::new();
        let mut functions = Vec::new();
        self.collect_nodes(&ast.nodes, &mut globals, &mut functions);
        (globals, functions)
    }

    fn collect_nodes(
        &self,
        nodes: &[AstNode],
        globals: &mut Vec<GlobalVariable>,
        functions: &mut Vec<FunctionInfo>,
    ) {
        for node in nodes {
            match node {
                AstNode::VarDecl(decl) if decl.scope == DeclScope::Global => {
                    globals.push(self.global_record(decl));
                }
                AstNode::Function(func) => functions.push(self.function_record(func)),
                AstNode::If(stmt) => {
                    self.collect_nodes(&stmt.then_body, globals, functions);
                    match &stmt.else_branch {
                        Some(ElseBranch::If(nested)) => {
                            self.collect_nodes(&nested.then_body, globals, functions)
                        }
                        Some(ElseBranch::Block { body, .. }) => {
                            self.collect_nodes(body, globals, functions)
                        }
                        None => {}
                    }
                }
                AstNode::While(stmt) => self.collect_nodes(&stmt.body, globals, functions),
                AstNode::For(stmt) => self.collect_nodes(&stmt.body, globals, functions),
                _ => {}
            }
        }
    }

    fn global_record(&self, decl: &VarDecl) -> GlobalVariable {
        GlobalVariable {
            name: decl.name_text(self.content).to_string(),
            declared_type: decl.ty,
            initializer: decl
                .initializer
                .as_ref()
                .map(|e| e.text(self.content).to_string())
                .unwrap_or_default(),
            location: decl.location,
        }
    }

    fn function_record(&self, func: &FunctionDecl) -> FunctionInfo {
        let parameters = match (func.params.first(), func.params.last()) {
            (Some(first), Some(last)) => {
                self.content[first.location.merge(last.location).to_range()].to_string()
            }
            _ => String::new(),
        };

        let mut info = FunctionInfo {
            name: func.name_text(self.content).to_string(),
            return_type: func.return_type,
            parameters,
            is_recursive: false,
            local_variables: Vec::new(),
            control_structures: Vec::new(),
            location: func.location,
        };

        self.walk_body(&func.body, &mut info);
        info
    }

    fn walk_body(&self, nodes: &[AstNode], info: &mut FunctionInfo) {
        for node in nodes {
            match node {
                AstNode::VarDecl(decl) => {
                    info.local_variables
                        .push(decl.name_text(self.content).to_string());
                    if let Some(init) = &decl.initializer {
                        self.scan_run(init, info);
                    }
                }
                AstNode::If(stmt) => self.walk_if(stmt, info),
                AstNode::While(stmt) => {
                    info.control_structures.push("while".to_string());
                    self.scan_run(&stmt.condition, info);
                    self.walk_body(&stmt.body, info);
                }
                AstNode::For(stmt) => {
                    info.control_structures.push("for".to_string());
                    if let Some(init) = &stmt.init {
                        self.walk_body(std::slice::from_ref(init.as_ref()), info);
                    }
                    if let Some(condition) = &stmt.condition {
                        self.scan_run(condition, info);
                    }
                    if let Some(step) = &stmt.step {
                        self.scan_run(step, info);
                    }
                    self.walk_body(&stmt.body, info);
                }
                AstNode::Return(stmt) => {
                    if let Some(value) = &stmt.value {
                        self.scan_run(value, info);
                    }
                }
                AstNode::Expr(stmt) => self.scan_run(&stmt.expr, info),
                AstNode::Function(_)
                | AstNode::Break(_)
                | AstNode::Continue(_)
                | AstNode::Error(_) => {}
            }
        }
    }

    fn walk_if(&self, stmt: &IfStmt, info: &mut FunctionInfo) {
        info.control_structures.push("if".to_string());
        self.scan_run(&stmt.condition, info);
        self.walk_body(&stmt.then_body, info);

        match &stmt.else_branch {
            Some(ElseBranch::If(nested)) => {
                info.control_structures.push("else".to_string());
                self.walk_if(nested, info);
            }
            Some(ElseBranch::Block { body, .. }) => {
                info.control_structures.push("else".to_string());
                self.walk_body(body, info);
            }
            None => {}
        }
    }

    /// Marks the function recursive when a run contains a call shape on the
    /// function's own name.
    fn scan_run(&self, expr: &Expr, info: &mut FunctionInfo) {
        if info.name.is_empty() || info.is_recursive {
            return;
        }

        for pair in expr.tokens.windows(2) {
            if pair[0].kind() == TokenKind::Identifier
                && pair[0].text(self.content) == info.name
                && pair[1].kind() == TokenKind::Delimiter(Delimiter::LParen)
            {
                info.is_recursive = true;
                return;
            }
        }
    }
}
