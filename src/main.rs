use std::{
    fs,
    io::{self, Write},
    path::Path,
    process::ExitCode,
    time::Instant,
};

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use vtwin::{
    display_error,
    evaluator::evaluator::{run_program, run_statement, Outcome},
    lexer::{lexer::tokenize, tokens::TokenKind},
    parser::parser::parse,
};

#[derive(Parser)]
#[command(
    name = "vtwin",
    version,
    about = "Parse and evaluate vtwin expressions and declarations",
    long_about = None,
)]
struct Cli {
    /// Log parser and evaluator events at debug level (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a file, then evaluate every top-level statement
    Run {
        #[arg(name = "FILE")]
        file: String,

        /// Print the parsed tree of each statement before its value
        #[arg(long)]
        tree: bool,
    },
    /// Print the token stream of a file
    Tokens {
        #[arg(name = "FILE")]
        file: String,
    },
    /// Read and evaluate one line at a time
    Repl,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run { file, tree } => run_file(&file, tree),
        Commands::Tokens { file } => print_tokens(&file),
        Commands::Repl => {
            repl();
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(()) => ExitCode::FAILURE,
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Reads `path`, returning the contents and the name errors should report.
fn read_source(path: &str) -> Result<(String, String), ()> {
    let source = fs::read_to_string(path).map_err(|e| {
        eprintln!("Error reading file '{}': {}", path, e);
    })?;

    let file_name = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string());

    Ok((source, file_name))
}

fn run_file(path: &str, print_tree: bool) -> Result<(), ()> {
    let (source, file_name) = read_source(path)?;

    let start = Instant::now();
    let (_, program) = parse(source.clone(), Some(file_name));
    let program = program.map_err(|error| display_error(&error, &source))?;
    info!(statements = program.len(), elapsed = ?start.elapsed(), "parsed");

    for stmt in program.iter() {
        if print_tree {
            println!("{}", stmt);
        }

        let outcome = run_statement(stmt).map_err(|error| display_error(&error, &source))?;
        print_outcome(&outcome);
    }

    debug!(elapsed = ?start.elapsed(), "finished");
    Ok(())
}

fn print_tokens(path: &str) -> Result<(), ()> {
    let (source, file_name) = read_source(path)?;

    let tokens = tokenize(source.clone(), Some(file_name)).map_err(|error| display_error(&error, &source))?;

    for token in tokens.iter().filter(|token| token.kind != TokenKind::EOF) {
        println!("{:>5}  {}", token.span.start.0, token.debug());
    }

    Ok(())
}

fn repl() {
    let stdin = io::stdin();

    loop {
        print!("> ");
        if io::stdout().flush().is_err() {
            return;
        }

        let mut line = String::new();
        match stdin.read_line(&mut line) {
            Ok(0) => return,
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                continue;
            }
        }

        let line = line.trim_end();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("exit") {
            return;
        }

        let (_, program) = parse(line.to_string(), None);
        let outcomes = program.and_then(|program| run_program(&program));

        match outcomes {
            Ok(outcomes) => outcomes.iter().for_each(print_outcome),
            Err(error) => display_error(&error, line),
        }
    }
}

fn print_outcome(outcome: &Outcome) {
    match (&outcome.identifier, outcome.value) {
        (Some(identifier), Some(value)) => println!("{} = {}", identifier, value),
        (None, Some(value)) => println!("{}", value),
        _ => {}
    }
}
