use minic_core::{Diagnostic, Location};
use minic_token::{Delimiter, Keyword, Operator, Token, TokenKind, Tokens};

use crate::ast::*;

#[cfg(test)]
mod tests;

/// The two-state scope automaton: declarations seen at file scope become
/// globals, declarations inside a function body become locals, and
/// `return`/`break`/`continue` are only accepted inside a function body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeContext {
    FileScope,
    FunctionBody,
}

#[derive(Debug)]
pub struct ParseResult {
    pub ast: Ast,
    pub diagnostics: Vec<Diagnostic>,
}

pub struct Parser<'src> {
    tokens: Tokens,
    content: &'src str,
    diagnostics: Vec<Diagnostic>,
    reached_eof: bool,
}

impl<'src> Parser<'src> {
    pub fn new(tokens: Tokens, content: &'src str) -> Self {
        Self {
            tokens,
            content,
            diagnostics: Vec::new(),
            reached_eof: false,
        }
    }

    pub fn parse(mut self) -> ParseResult {
        let mut nodes = vec![];

        while self.tokens.peek().kind() != TokenKind::Eof {
            nodes.push(self.parse_node(ScopeContext::FileScope));
        }

        ParseResult {
            ast: Ast { nodes },
            diagnostics: self.diagnostics,
        }
    }

    fn parse_node(&mut self, scope: ScopeContext) -> AstNode {
        let token = self.tokens.peek();
        match token.kind() {
            TokenKind::Keyword(Keyword::Void) if scope == ScopeContext::FileScope => {
                self.parse_function()
            }
            TokenKind::Keyword(keyword) if keyword.is_type() => {
                if scope == ScopeContext::FileScope && self.looks_like_function() {
                    self.parse_function()
                } else {
                    self.parse_var_decl(scope)
                }
            }
            TokenKind::Keyword(Keyword::If) => AstNode::If(self.parse_if(scope)),
            TokenKind::Keyword(Keyword::While) => self.parse_while(scope),
            TokenKind::Keyword(Keyword::For) => self.parse_for(scope),
            TokenKind::Keyword(Keyword::Return) if scope == ScopeContext::FunctionBody => {
                self.parse_return()
            }
            TokenKind::Keyword(Keyword::Break | Keyword::Continue)
                if scope == ScopeContext::FunctionBody =>
            {
                self.parse_jump()
            }
            TokenKind::Identifier
            | TokenKind::Number
            | TokenKind::StringLiteral
            | TokenKind::Operator(_)
            | TokenKind::Delimiter(Delimiter::LParen)
                if scope == ScopeContext::FunctionBody =>
            {
                self.parse_expr_stmt()
            }
            _ => self.unexpected_token(token),
        }
    }

    /// A type keyword opens either a function or a variable declaration;
    /// only the `(` after the name tells them apart.
    fn looks_like_function(&self) -> bool {
        self.tokens.peek_at(1).kind() == TokenKind::Identifier
            && self.tokens.peek_at(2).kind() == TokenKind::Delimiter(Delimiter::LParen)
    }

    fn parse_function(&mut self) -> AstNode {
        let keyword = self.tokens.next_token();
        let TokenKind::Keyword(kw) = keyword.kind() else {
            unreachable!("caller dispatches on a return type keyword")
        };
        let return_type = TypeName::from_keyword(kw).expect("return type keyword");

        let name = match self.tokens.peek().kind() {
            TokenKind::Identifier => Some(self.tokens.next_token().location()),
            _ => {
                self.error(self.tokens.peek().location(), "expected function name");
                None
            }
        };

        self.expect_delimiter(Delimiter::LParen, "expected '(' after function name");
        let params = self.parse_params();
        self.expect_delimiter(Delimiter::LCurly, "expected '{' after function declaration");
        let (body, close) = self.parse_block(ScopeContext::FunctionBody);

        AstNode::Function(FunctionDecl {
            return_type,
            name,
            params,
            body,
            location: keyword.location().merge(close),
            keyword: keyword.location(),
        })
    }

    /// Consumes up to and including the closing `)`.
    fn parse_params(&mut self) -> Vec<Param> {
        let mut params = vec![];

        loop {
            let token = self.tokens.peek();
            match token.kind() {
                TokenKind::Delimiter(Delimiter::RParen) => {
                    self.tokens.consume();
                    break;
                }
                TokenKind::Eof => {
                    self.eof_error(")");
                    break;
                }
                TokenKind::Keyword(keyword) if keyword.is_type() => {
                    let ty_token = self.tokens.next_token();
                    let ty = TypeName::from_keyword(keyword).expect("type keyword");

                    let (name, location) = match self.tokens.peek().kind() {
                        TokenKind::Identifier => {
                            let name = self.tokens.next_token();
                            (
                                Some(name.location()),
                                ty_token.location().merge(name.location()),
                            )
                        }
                        _ => {
                            self.error(self.tokens.peek().location(), "expected parameter name");
                            (None, ty_token.location())
                        }
                    };

                    params.push(Param { ty, name, location });

                    if self.tokens.peek().kind() == TokenKind::Delimiter(Delimiter::Comma) {
                        self.tokens.consume();
                    }
                }
                _ => {
                    self.error(
                        token.location(),
                        format!(
                            "expected parameter type and name in function declaration, found '{}'",
                            token.text(self.content)
                        ),
                    );
                    self.tokens.consume();
                }
            }
        }

        params
    }

    fn parse_var_decl(&mut self, scope: ScopeContext) -> AstNode {
        let type_token = self.tokens.next_token();
        let TokenKind::Keyword(kw) = type_token.kind() else {
            unreachable!("caller dispatches on a type keyword")
        };
        let ty = TypeName::from_keyword(kw).expect("type keyword");

        let name = match self.tokens.peek().kind() {
            TokenKind::Identifier => Some(self.tokens.next_token().location()),
            _ => {
                self.error(self.tokens.peek().location(), "expected variable name");
                None
            }
        };

        let initializer = match self.tokens.peek().kind() {
            TokenKind::Operator(Operator::Assign) => {
                self.tokens.consume();
                let expr = self.parse_expr_run();
                if expr.is_empty() {
                    self.error(expr.location, "expected expression after '='");
                }
                Some(expr)
            }
            _ => None,
        };

        let semi =
            self.expect_delimiter(Delimiter::Semicolon, "expected ';' after variable declaration");

        let end = semi
            .or(initializer.as_ref().map(|e| e.location))
            .or(name)
            .unwrap_or(type_token.location());

        AstNode::VarDecl(VarDecl {
            scope: match scope {
                ScopeContext::FileScope => DeclScope::Global,
                ScopeContext::FunctionBody => DeclScope::Local,
            },
            ty,
            name,
            initializer,
            location: type_token.location().merge(end),
        })
    }

    fn parse_if(&mut self, scope: ScopeContext) -> IfStmt {
        let keyword = self.tokens.next_token();
        self.expect_delimiter(Delimiter::LParen, "expected '(' after 'if'");
        let condition = self.parse_expr_run();
        self.expect_delimiter(Delimiter::RParen, "expected ')' after condition");
        self.expect_delimiter(Delimiter::LCurly, "expected '{' after 'if' condition");
        let (then_body, mut end) = self.parse_block(scope);

        let else_branch = match self.tokens.peek().kind() {
            TokenKind::Keyword(Keyword::Else) => {
                let else_token = self.tokens.next_token();
                match self.tokens.peek().kind() {
                    TokenKind::Keyword(Keyword::If) => {
                        let nested = self.parse_if(scope);
                        end = nested.location;
                        Some(ElseBranch::If(Box::new(nested)))
                    }
                    _ => {
                        self.expect_delimiter(Delimiter::LCurly, "expected '{' after 'else'");
                        let (body, close) = self.parse_block(scope);
                        let location = else_token.location().merge(close);
                        end = location;
                        Some(ElseBranch::Block {
                            body,
                            keyword: else_token.location(),
                            location,
                        })
                    }
                }
            }
            _ => None,
        };

        IfStmt {
            condition,
            then_body,
            else_branch,
            location: keyword.location().merge(end),
            keyword: keyword.location(),
        }
    }

    fn parse_while(&mut self, scope: ScopeContext) -> AstNode {
        let keyword = self.tokens.next_token();
        self.expect_delimiter(Delimiter::LParen, "expected '(' after 'while'");
        let condition = self.parse_expr_run();
        self.expect_delimiter(Delimiter::RParen, "expected ')' after condition");
        self.expect_delimiter(Delimiter::LCurly, "expected '{' after 'while' condition");
        let (body, close) = self.parse_block(scope);

        AstNode::While(WhileStmt {
            condition,
            body,
            location: keyword.location().merge(close),
            keyword: keyword.location(),
        })
    }

    fn parse_for(&mut self, scope: ScopeContext) -> AstNode {
        let keyword = self.tokens.next_token();
        self.expect_delimiter(Delimiter::LParen, "expected '(' after 'for'");

        let init = match self.tokens.peek().kind() {
            TokenKind::Delimiter(Delimiter::Semicolon) => {
                self.tokens.consume();
                None
            }
            // a declaration header consumes its own ';'
            TokenKind::Keyword(keyword) if keyword.is_type() => {
                Some(Box::new(self.parse_var_decl(scope)))
            }
            _ => {
                let expr = self.parse_expr_run();
                let location = expr.location;
                self.expect_delimiter(Delimiter::Semicolon, "expected ';' in 'for' header");
                Some(Box::new(AstNode::Expr(ExprStmt { expr, location })))
            }
        };

        let condition = match self.tokens.peek().kind() {
            TokenKind::Delimiter(Delimiter::Semicolon) => {
                self.tokens.consume();
                None
            }
            _ => {
                let expr = self.parse_expr_run();
                self.expect_delimiter(Delimiter::Semicolon, "expected ';' in 'for' header");
                (!expr.is_empty()).then_some(expr)
            }
        };

        let step = match self.tokens.peek().kind() {
            TokenKind::Delimiter(Delimiter::RParen) => None,
            _ => {
                let expr = self.parse_expr_run();
                (!expr.is_empty()).then_some(expr)
            }
        };

        self.expect_delimiter(Delimiter::RParen, "expected ')' after 'for' header");
        self.expect_delimiter(Delimiter::LCurly, "expected '{' after 'for' header");
        let (body, close) = self.parse_block(scope);

        AstNode::For(ForStmt {
            init,
            condition,
            step,
            body,
            location: keyword.location().merge(close),
            keyword: keyword.location(),
        })
    }

    fn parse_return(&mut self) -> AstNode {
        let keyword = self.tokens.next_token();

        let value = match self.tokens.peek().kind() {
            TokenKind::Delimiter(Delimiter::Semicolon) => None,
            _ => {
                let expr = self.parse_expr_run();
                (!expr.is_empty()).then_some(expr)
            }
        };

        let semi =
            self.expect_delimiter(Delimiter::Semicolon, "expected ';' after 'return' statement");

        let end = semi
            .or(value.as_ref().map(|e| e.location))
            .unwrap_or(keyword.location());

        AstNode::Return(ReturnStmt {
            value,
            location: keyword.location().merge(end),
            keyword: keyword.location(),
        })
    }

    fn parse_jump(&mut self) -> AstNode {
        let token = self.tokens.next_token();
        let message = format!("expected ';' after '{}'", token.text(self.content));
        let semi = self.expect_delimiter(Delimiter::Semicolon, message);
        let location = match semi {
            Some(semi) => token.location().merge(semi),
            None => token.location(),
        };

        match token.kind() {
            TokenKind::Keyword(Keyword::Break) => AstNode::Break(location),
            _ => AstNode::Continue(location),
        }
    }

    fn parse_expr_stmt(&mut self) -> AstNode {
        let expr = self.parse_expr_run();
        let semi = self.expect_delimiter(Delimiter::Semicolon, "expected ';' after expression");
        let location = match semi {
            Some(semi) => expr.location.merge(semi),
            None => expr.location,
        };

        AstNode::Expr(ExprStmt { expr, location })
    }

    /// Consumes a flat run of expression tokens. Parenthesised sub-runs are
    /// tracked only by depth so call shapes survive in one run; there is no
    /// precedence and no expression tree.
    fn parse_expr_run(&mut self) -> Expr {
        let mut tokens: Vec<Token> = vec![];
        let mut depth = 0usize;

        loop {
            let token = self.tokens.peek();
            match token.kind() {
                TokenKind::Identifier
                | TokenKind::Number
                | TokenKind::StringLiteral
                | TokenKind::Operator(_) => {
                    self.tokens.consume();
                    tokens.push(token);
                }
                TokenKind::Delimiter(Delimiter::LParen) => {
                    depth += 1;
                    self.tokens.consume();
                    tokens.push(token);
                }
                TokenKind::Delimiter(Delimiter::RParen) if depth > 0 => {
                    depth -= 1;
                    self.tokens.consume();
                    tokens.push(token);
                }
                TokenKind::Delimiter(Delimiter::Comma) if depth > 0 => {
                    self.tokens.consume();
                    tokens.push(token);
                }
                _ => break,
            }
        }

        let location = match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => first.location().merge(last.location()),
            _ => {
                let next = self.tokens.peek().location();
                Location::new(next.start_byte, next.start_byte, next.line)
            }
        };

        Expr { tokens, location }
    }

    /// Consumes statements up to and including the closing `}`. Running out
    /// of input inside a block is reported exactly once, then every
    /// enclosing block unwinds silently.
    fn parse_block(&mut self, scope: ScopeContext) -> (Vec<AstNode>, Location) {
        let mut nodes = vec![];

        let close = loop {
            let token = self.tokens.peek();
            match token.kind() {
                TokenKind::Delimiter(Delimiter::RCurly) => {
                    self.tokens.consume();
                    break token.location();
                }
                TokenKind::Eof => {
                    self.eof_error("}");
                    break token.location();
                }
                _ => nodes.push(self.parse_node(scope)),
            }
        };

        (nodes, close)
    }

    fn unexpected_token(&mut self, token: Token) -> AstNode {
        self.error(
            token.location(),
            format!("unexpected token '{}'", token.text(self.content)),
        );
        self.tokens.consume();

        AstNode::Error(ErrorNode {
            token: token.kind(),
            location: token.location(),
        })
    }

    fn expect_delimiter(
        &mut self,
        delimiter: Delimiter,
        message: impl Into<String>,
    ) -> Option<Location> {
        let token = self.tokens.peek();
        if token.kind() == TokenKind::Delimiter(delimiter) {
            self.tokens.consume();
            return Some(token.location());
        }

        self.error(token.location(), message);
        None
    }

    fn eof_error(&mut self, expected: &str) {
        if self.reached_eof {
            return;
        }
        self.reached_eof = true;

        self.error(
            self.tokens.peek().location(),
            format!("unexpected end of input, expected '{expected}'"),
        );
    }

    fn error(&mut self, location: Location, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic::error(location, message));
    }
}
