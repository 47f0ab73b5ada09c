// minicc: lexer and parser driver for a small C subset

use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser as ClapParser, ValueEnum};
use thiserror::Error;

use minicc::diagnostics::{Diagnostic, Diagnostics};
use minicc::parser::{parse, tokenize, Arena};

/// Last stage to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Stage {
    Lex,
    Parse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => io::stderr().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

#[derive(Debug, ClapParser)]
#[command(name = "minicc", version, about = "Lex and parse a C-subset source file")]
struct Cli {
    /// Source file to read
    file: PathBuf,

    /// Stop after this stage
    #[arg(long, value_enum, default_value_t = Stage::Parse)]
    stage: Stage,

    /// Print the token array after lexing
    #[arg(long)]
    dump_tokens: bool,

    /// Print the AST after a clean parse
    #[arg(long)]
    dump_ast: bool,

    /// Colour diagnostics
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    color: ColorChoice,
}

#[derive(Debug, Error)]
enum DriverError {
    #[error("cannot read '{path}': {source}")]
    Read { path: String, source: io::Error },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let mut diagnostics = Diagnostics::terminal(cli.color.enabled());
    let filename = cli.file.display().to_string();

    let source = match read_source(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            diagnostics.report(Diagnostic::error(&filename, e.to_string()));
            return ExitCode::FAILURE;
        }
    };

    if run(&cli, &source, &filename, &mut diagnostics) {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Run the requested stages; true when none of them reported an error.
fn run(cli: &Cli, source: &[u8], filename: &str, diagnostics: &mut Diagnostics) -> bool {
    let lexed = tokenize(source, filename, diagnostics);
    if cli.dump_tokens {
        print!("{}", lexed.tokens.dump(source));
    }

    if lexed.had_error {
        diagnostics.info(
            filename,
            format!("lexing failed with {} error(s)", diagnostics.error_count()),
        );
        return false;
    }
    if cli.stage == Stage::Lex {
        diagnostics.info(filename, format!("lexed {} tokens", lexed.tokens.len()));
        return true;
    }

    let arena = Arena::new();
    let parsed = parse(&lexed.tokens, source, filename, &arena, diagnostics);

    if parsed.had_error {
        diagnostics.info(
            filename,
            format!(
                "parsing failed with {} error(s); {} function(s) recovered",
                diagnostics.error_count(),
                parsed.module.functions.len()
            ),
        );
        return false;
    }

    if cli.dump_ast {
        print!("{}", parsed.module);
    }
    diagnostics.info(
        filename,
        format!("parsed {} function(s)", parsed.module.functions.len()),
    );
    true
}

/// Read the file as raw bytes; the lexer reports anything it cannot use.
fn read_source(path: &Path) -> Result<Vec<u8>, DriverError> {
    fs::read(path).map_err(|source| DriverError::Read {
        path: path.display().to_string(),
        source,
    })
}

/// Install a stderr subscriber when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(io::stderr).with_target(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}
