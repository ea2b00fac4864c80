mod error;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use minic_semantic::{DiagnosticSeverity, SemanticAnalyzer};
use minic_token::{Lexer, Tokens};

use crate::error::{Error, Result};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Source file to analyze
    file: PathBuf,

    /// Print the token stream
    #[arg(long)]
    tokens: bool,

    /// Print the recognized global variables
    #[arg(long)]
    globals: bool,

    /// Print the recognized functions
    #[arg(long)]
    functions: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

/// Runs the full pipeline over one file and renders every report. Returns
/// whether the source came through without errors.
fn run(cli: &Cli) -> Result<bool> {
    let content = std::fs::read_to_string(&cli.file).map_err(|source| Error::ReadSource {
        path: cli.file.display().to_string(),
        source,
    })?;
    let config = minic_config::load_config(cli.file.parent());

    let tokens = Lexer::new(&content).collect::<Vec<_>>();
    let cursor = Tokens::new(tokens.clone(), content.len());
    let result = minic_syntax::Parser::new(cursor, &content).parse();
    let info = SemanticAnalyzer::new(&content).analyze(&result.ast);

    if cli.tokens || config.show_tokens {
        print!("{}", report::render_tokens(&tokens, &content));
    }
    if cli.globals || config.show_globals {
        print!("{}", report::render_globals(&info.globals));
    }
    if cli.functions || config.show_functions {
        print!("{}", report::render_functions(&info.functions));
    }

    let lexical = report::lexical_errors(&tokens, &content);
    for error in &lexical {
        println!("{error}");
    }

    for error in report::syntax_errors(&result.diagnostics) {
        println!("{error}");
    }

    let mut semantic_errors = 0usize;
    for diagnostic in &info.diagnostics {
        match diagnostic.severity {
            DiagnosticSeverity::Error => {
                semantic_errors += 1;
                println!("semantic error: {diagnostic}");
            }
            DiagnosticSeverity::Warning => println!("warning: {diagnostic}"),
            DiagnosticSeverity::Info => println!("note: {diagnostic}"),
        }
    }

    Ok(lexical.is_empty() && result.diagnostics.is_empty() && semantic_errors == 0)
}
