use minic_core::Diagnostic;
use minic_semantic::{FunctionInfo, GlobalVariable};
use minic_token::{Token, TokenKind};

pub fn token_kind_name(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Keyword(_) => "KEYWORD",
        TokenKind::Identifier => "IDENTIFIER",
        TokenKind::Operator(_) => "OPERATOR",
        TokenKind::Number => "NUMBER",
        TokenKind::StringLiteral => "STRING_LITERAL",
        TokenKind::Delimiter(_) => "DELIMITER",
        TokenKind::Error(_) | TokenKind::Eof => "ERROR",
    }
}

pub fn render_tokens(tokens: &[Token], content: &str) -> String {
    let mut out = String::from("Tokens:\n");
    for token in tokens {
        out.push_str(&format!(
            "({}, {}, {})\n",
            token_kind_name(token.kind()),
            token.text(content),
            token.location().line
        ));
    }
    out
}

pub fn lexical_errors(tokens: &[Token], content: &str) -> Vec<String> {
    tokens
        .iter()
        .filter_map(|token| match token.kind() {
            TokenKind::Error(error) => Some(format!(
                "lexical error at line {}: {} '{}'",
                token.location().line,
                error.description(),
                token.text(content)
            )),
            _ => None,
        })
        .collect()
}

pub fn syntax_errors(diagnostics: &[Diagnostic]) -> Vec<String> {
    diagnostics
        .iter()
        .map(|diagnostic| format!("syntax error: {diagnostic}"))
        .collect()
}

pub fn render_globals(globals: &[GlobalVariable]) -> String {
    let mut out = String::from("Global Variables:\n");

    if globals.is_empty() {
        out.push_str("no global variables found\n");
        return out;
    }

    for global in globals {
        match global.initializer.is_empty() {
            true => out.push_str(&format!("{} {}\n", global.declared_type, global.name)),
            false => out.push_str(&format!(
                "{} {} = {}\n",
                global.declared_type, global.name, global.initializer
            )),
        }
    }

    out
}

pub fn render_functions(functions: &[FunctionInfo]) -> String {
    let mut out = String::from("Functions:\n");

    for func in functions {
        out.push_str(&format!(
            "{} {}({})",
            func.return_type, func.name, func.parameters
        ));
        if func.is_recursive {
            out.push_str(" [recursive]");
        }
        out.push('\n');

        if !func.local_variables.is_empty() {
            out.push_str(&format!("  locals: {}\n", func.local_variables.join(", ")));
        }
        if !func.control_structures.is_empty() {
            out.push_str(&format!(
                "  control structures: {}\n",
                func.control_structures.join(", ")
            ));
        }
    }

    out
}
