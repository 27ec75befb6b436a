use clap::{Parser as ClapParser, Subcommand};
use jaql_ast::cli::{self, CheckOptions, CliError, PlanOptions, StatementCheck};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(ClapParser)]
#[command(name = "jaql")]
#[command(about = "Build, validate and print JAQL statement trees from build traces")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the plan of every statement in a trace
    Plan {
        /// Trace file (reads from stdin if not provided)
        trace: Option<PathBuf>,

        /// Print the canonical form instead of the query echo
        #[arg(short, long)]
        canonical: bool,
    },

    /// Validate every statement in a trace
    Check {
        /// Trace file (reads from stdin if not provided)
        trace: Option<PathBuf>,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Plan { trace, canonical } => run_plan(trace, canonical),
        Commands::Check { trace } => run_check(trace),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    }
}

fn read_trace(path: Option<PathBuf>) -> Result<Option<String>, CliError> {
    match path {
        Some(path) => Ok(Some(std::fs::read_to_string(path)?)),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer).map_err(CliError::Io)?;
            Ok(Some(buffer))
        }
        None => Ok(None),
    }
}

fn run_plan(path: Option<PathBuf>, canonical: bool) -> Result<bool, CliError> {
    let options = PlanOptions {
        trace: read_trace(path)?,
        canonical,
    };
    print!("{}", cli::execute_plan(&options)?);
    Ok(true)
}

fn run_check(path: Option<PathBuf>) -> Result<bool, CliError> {
    let options = CheckOptions {
        trace: read_trace(path)?,
    };
    let report = cli::execute_check(&options)?;

    for (i, stmt) in report.statements.iter().enumerate() {
        match stmt {
            StatementCheck::Valid { nodes } => println!("statement {}: ok ({} nodes)", i + 1, nodes),
            StatementCheck::Invalid(msg) => println!("statement {}: {}", i + 1, msg),
        }
    }
    Ok(report.all_valid())
}
