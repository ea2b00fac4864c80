use minic_token::{Lexer, Tokens};

use crate::ast::*;
use crate::parser::{ParseResult, Parser};

fn parse(content: &str) -> ParseResult {
    let tokens = Lexer::new(content).collect::<Vec<_>>();
    let tokens = Tokens::new(tokens, content.len());
    Parser::new(tokens, content).parse()
}

#[test]
fn test_clean_function_has_no_diagnostics() {
    let content = "void f(int a) { return; }";
    let result = parse(content);

    assert!(result.diagnostics.is_empty());
    assert_eq!(result.ast.nodes.len(), 1);

    let AstNode::Function(func) = &result.ast.nodes[0] else {
        panic!("expected a function declaration");
    };
    assert_eq!(func.return_type, TypeName::Void);
    assert_eq!(func.name_text(content), "f");
    assert_eq!(func.params.len(), 1);
    assert_eq!(func.params[0].ty, TypeName::Int);
    assert_eq!(
        &content[func.params[0].name.unwrap().to_range()],
        "a"
    );
    assert!(matches!(func.body[0], AstNode::Return(_)));
}

#[test]
fn test_global_variable_declaration() {
    let content = "int x = 5;";
    let result = parse(content);

    assert!(result.diagnostics.is_empty());

    let AstNode::VarDecl(decl) = &result.ast.nodes[0] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(decl.scope, DeclScope::Global);
    assert_eq!(decl.ty, TypeName::Int);
    assert_eq!(decl.name_text(content), "x");
    assert_eq!(decl.initializer.as_ref().unwrap().text(content), "5");
}

#[test]
fn test_local_variable_is_tagged_local() {
    let content = "void f() { int y; }";
    let result = parse(content);

    assert!(result.diagnostics.is_empty());

    let AstNode::Function(func) = &result.ast.nodes[0] else {
        panic!("expected a function declaration");
    };
    let AstNode::VarDecl(decl) = &func.body[0] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(decl.scope, DeclScope::Local);
}

#[test]
fn test_file_scope_block_keeps_globals_global() {
    let content = "if (x) { int g; }";
    let result = parse(content);

    let AstNode::If(stmt) = &result.ast.nodes[0] else {
        panic!("expected an if statement");
    };
    let AstNode::VarDecl(decl) = &stmt.then_body[0] else {
        panic!("expected a variable declaration");
    };
    assert_eq!(decl.scope, DeclScope::Global);
}

#[test]
fn test_typed_function_is_disambiguated_from_variable() {
    let content = "int add(int a, int b) { return a + b; }";
    let result = parse(content);

    assert!(result.diagnostics.is_empty());

    let AstNode::Function(func) = &result.ast.nodes[0] else {
        panic!("expected a function declaration");
    };
    assert_eq!(func.return_type, TypeName::Int);
    assert_eq!(func.params.len(), 2);
}

#[test]
fn test_missing_semicolon() {
    let content = "int x = 5";
    let result = parse(content);

    assert_eq!(result.diagnostics.len(), 1);
    insta::assert_snapshot!(
        result.diagnostics[0].to_string(),
        @"expected ';' after variable declaration at line 1"
    );
}

#[test]
fn test_unexpected_token_at_top_level() {
    let content = "+ int x;";
    let result = parse(content);

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "unexpected token '+'");
    assert!(matches!(result.ast.nodes[0], AstNode::Error(_)));
    assert!(matches!(result.ast.nodes[1], AstNode::VarDecl(_)));
}

#[test]
fn test_return_is_rejected_at_file_scope() {
    let content = "return;";
    let result = parse(content);

    assert_eq!(result.diagnostics[0].message, "unexpected token 'return'");
}

#[test]
fn test_truncated_body_reports_end_of_input_once() {
    let content = "void f() { if (x) {";
    let result = parse(content);

    assert_eq!(result.diagnostics.len(), 1);
    insta::assert_snapshot!(
        result.diagnostics[0].to_string(),
        @"unexpected end of input, expected '}' at line 1"
    );
}

#[test]
fn test_if_else_chain() {
    let content = "void f() { if (x) { return; } else if (y) { } else { break; } }";
    let result = parse(content);

    assert!(result.diagnostics.is_empty());

    let AstNode::Function(func) = &result.ast.nodes[0] else {
        panic!("expected a function declaration");
    };
    let AstNode::If(stmt) = &func.body[0] else {
        panic!("expected an if statement");
    };
    let Some(ElseBranch::If(nested)) = &stmt.else_branch else {
        panic!("expected an else-if branch");
    };
    let Some(ElseBranch::Block { body, .. }) = &nested.else_branch else {
        panic!("expected a final else block");
    };
    assert!(matches!(body[0], AstNode::Break(_)));
}

#[test]
fn test_for_header() {
    let content = "void f() { for (int i = 0; i < 3; i += 1) { } }";
    let result = parse(content);

    assert!(result.diagnostics.is_empty());

    let AstNode::Function(func) = &result.ast.nodes[0] else {
        panic!("expected a function declaration");
    };
    let AstNode::For(stmt) = &func.body[0] else {
        panic!("expected a for statement");
    };
    assert!(matches!(stmt.init.as_deref(), Some(AstNode::VarDecl(_))));
    assert_eq!(stmt.condition.as_ref().unwrap().tokens.len(), 3);
    assert_eq!(stmt.step.as_ref().unwrap().tokens.len(), 3);
}

#[test]
fn test_missing_control_parens_recover() {
    let content = "void f() { while x { } }";
    let result = parse(content);

    assert_eq!(result.diagnostics.len(), 2);
    assert_eq!(result.diagnostics[0].message, "expected '(' after 'while'");
    assert_eq!(result.diagnostics[1].message, "expected ')' after condition");
}

#[test]
fn test_call_shaped_statement_stays_in_one_run() {
    let content = "void f() { g(1, 2); }";
    let result = parse(content);

    assert!(result.diagnostics.is_empty());

    let AstNode::Function(func) = &result.ast.nodes[0] else {
        panic!("expected a function declaration");
    };
    let AstNode::Expr(stmt) = &func.body[0] else {
        panic!("expected an expression statement");
    };
    assert_eq!(stmt.expr.tokens.len(), 6);
    assert_eq!(stmt.expr.text(content), "g(1, 2)");
}

#[test]
fn test_missing_function_name_recovers() {
    let content = "void (int a) { }";
    let result = parse(content);

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].message, "expected function name");

    let AstNode::Function(func) = &result.ast.nodes[0] else {
        panic!("expected a function declaration");
    };
    assert!(func.name.is_none());
    assert_eq!(func.params.len(), 1);
}

#[test]
fn test_every_parse_terminates_on_garbage() {
    // a soup of error tokens, stray delimiters, and truncated constructs
    let content = "} ) , ; void int x 12.3.4 \"open\nfor (; while { if";
    let result = parse(content);

    assert!(!result.diagnostics.is_empty());
}
