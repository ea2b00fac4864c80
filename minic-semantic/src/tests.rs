use minic_syntax::TypeName;
use minic_token::{Lexer, Tokens};

use crate::analyzer::{SemanticAnalyzer, SemanticInfo};
use crate::diagnostics::{DiagnosticSeverity, SemanticDiagnostic};

fn analyze(content: &str) -> SemanticInfo {
    let tokens = Lexer::new(content).collect::<Vec<_>>();
    let tokens = Tokens::new(tokens, content.len());
    let ast = minic_syntax::Parser::new(tokens, content).parse().ast;
    SemanticAnalyzer::new(content).analyze(&ast)
}

fn errors(info: &SemanticInfo) -> Vec<&SemanticDiagnostic> {
    info.diagnostics.iter().filter(|d| d.is_error()).collect()
}

#[test]
fn test_global_record_extraction() {
    let info = analyze("int x = 5;");

    assert_eq!(info.globals.len(), 1);
    assert_eq!(info.globals[0].name, "x");
    assert_eq!(info.globals[0].declared_type, TypeName::Int);
    assert_eq!(info.globals[0].initializer, "5");
    assert!(errors(&info).is_empty());
}

#[test]
fn test_global_without_initializer() {
    let info = analyze("float y;");

    assert_eq!(info.globals[0].name, "y");
    assert_eq!(info.globals[0].initializer, "");
}

#[test]
fn test_function_record() {
    let content = "
void f(int a) {
    int t = 1;
    if (t > 0) { }
    while (t) { }
}
";
    let info = analyze(content);

    assert_eq!(info.functions.len(), 1);
    let func = &info.functions[0];
    assert_eq!(func.name, "f");
    assert_eq!(func.return_type, TypeName::Void);
    assert_eq!(func.parameters, "int a");
    assert_eq!(func.local_variables, ["t"]);
    assert_eq!(func.control_structures, ["if", "while"]);
    assert!(!func.is_recursive);
}

#[test]
fn test_recursive_function_gets_an_info_note() {
    let info = analyze("void f() { f(); }");

    assert!(info.functions[0].is_recursive);
    assert!(errors(&info).is_empty());

    let note = info
        .diagnostics
        .iter()
        .find(|d| d.severity == DiagnosticSeverity::Info)
        .expect("expected a recursion note");
    insta::assert_snapshot!(note.message, @"recursive function detected: 'f'");
}

#[test]
fn test_function_name_missing() {
    let info = analyze("void (int a) { }");

    assert_eq!(info.functions[0].name, "");
    assert_eq!(errors(&info)[0].message, "function name missing");
}

#[test]
fn test_incomplete_global_declaration() {
    let info = analyze("int = 5;");

    assert_eq!(
        errors(&info)[0].message,
        "global variable has an incomplete declaration: ''"
    );
}

#[test]
fn test_duplicate_global() {
    let info = analyze("int x; int x;");

    assert_eq!(info.globals.len(), 2);
    assert_eq!(
        errors(&info)[0].message,
        "global variable 'x' is already declared"
    );
}

#[test]
fn test_duplicate_local() {
    let info = analyze("void f() { int a; int a; }");

    assert_eq!(
        errors(&info)[0].message,
        "variable 'a' is already declared in function 'f'"
    );
}

#[test]
fn test_duplicate_parameter() {
    let info = analyze("void f(int a, float a) { }");

    assert_eq!(
        errors(&info)[0].message,
        "parameter 'a' is already declared in function 'f'"
    );
}

#[test]
fn test_shadowing_in_nested_scope_is_allowed() {
    let info = analyze("void f(int a) { if (a) { int a; } }");

    assert!(errors(&info).is_empty());
}

#[test]
fn test_invalid_string_initializer() {
    let info = analyze("string s = 5;");

    assert_eq!(
        errors(&info)[0].message,
        "invalid initialization for variable 's' with value '5'"
    );
}

#[test]
fn test_invalid_numeric_initializer() {
    let info = analyze("int n = \"x\";");

    assert_eq!(
        errors(&info)[0].message,
        "invalid initialization for variable 'n' with value '\"x\"'"
    );
}

#[test]
fn test_char_literal_satisfies_no_declared_type() {
    let info = analyze("string c = 'a';");

    assert_eq!(errors(&info).len(), 1);
}

#[test]
fn test_valid_initializers() {
    let content = "
int i = 5;
float g = 1.5;
string s = \"ok\";
int neg = -2;
int j = i;
";
    let info = analyze(content);

    assert!(errors(&info).is_empty());
}

#[test]
fn test_missing_return_in_non_void_function() {
    let info = analyze("int f() { }");

    assert_eq!(
        errors(&info)[0].message,
        "non-void function 'f' does not have a return statement"
    );
}

#[test]
fn test_return_in_a_branch_satisfies_the_check() {
    let info = analyze("int f() { if (1) { return 1; } }");

    assert!(errors(&info).is_empty());
}

#[test]
fn test_missing_main_is_a_warning_not_an_error() {
    let info = analyze("int x;");
    let warning = info
        .diagnostics
        .iter()
        .find(|d| d.severity == DiagnosticSeverity::Warning)
        .expect("expected a warning");
    assert_eq!(warning.message, "function 'main' not found");

    let info = analyze("void main() { }");
    assert!(
        info.diagnostics
            .iter()
            .all(|d| d.severity != DiagnosticSeverity::Warning)
    );
}
