//! Contract inference CLI.
//!
//! Provides the `infercon` binary:
//! - `infer` resolves every method of a JSON inference session and prints the
//!   resulting contracts.
//! - `normalize` turns an ordered list of contract clauses into a
//!   non-intersecting set.
//!
//! Logging goes to stderr and is controlled by `INFERCON_LOG` (an `EnvFilter`
//! directive, default `warn`).

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use infercon_core::{format_contracts, Contract};
use infercon_resolve::{to_non_intersecting, InferenceSession, ResolveConfig, SessionError};

/// Method contract inference tools.
#[derive(Parser)]
#[command(name = "infercon", about = "Method contract inference tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Infer contracts for the methods of a session file.
    Infer {
        /// Path to the session JSON file.
        #[arg(short, long)]
        input: PathBuf,

        /// Only report this method.
        #[arg(short, long)]
        method: Option<String>,

        /// Output format.
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        /// Maximum pre-contract nesting depth.
        #[arg(long, env = "INFERCON_MAX_DEPTH", default_value_t = ResolveConfig::default().max_depth)]
        max_depth: usize,
    },

    /// Normalize contract clauses into a non-intersecting set.
    Normalize {
        /// Parameter count of the method the clauses belong to.
        #[arg(short, long)]
        params: usize,

        /// Contract clauses, in order, e.g. "null -> fail".
        #[arg(required = true)]
        contracts: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

/// One line of `infer` output.
#[derive(Serialize)]
struct MethodReport {
    method: String,
    contracts: Vec<String>,
}

fn main() {
    let filter = EnvFilter::try_from_env("INFERCON_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Commands::Infer {
            input,
            method,
            format,
            max_depth,
        } => run_infer(&input, method.as_deref(), format, ResolveConfig { max_depth }),
        Commands::Normalize { params, contracts } => run_normalize(params, &contracts),
    };
    process::exit(exit_code);
}

/// Execute the infer subcommand.
///
/// Returns exit code: 0 = success, 1 = invalid session, 3 = I/O error.
fn run_infer(input: &Path, method: Option<&str>, format: OutputFormat, config: ResolveConfig) -> i32 {
    let session = match InferenceSession::load(input) {
        Ok(s) => s,
        Err(SessionError::Io(e)) => {
            eprintln!("Error: failed to read '{}': {}", input.display(), e);
            return 3;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return 1;
        }
    };

    if let Some(name) = method {
        if session.method_by_name(name).is_none() {
            eprintln!("Error: no method named '{}'", name);
            return 1;
        }
    }

    let inferred = session.infer_all(config);
    tracing::info!(methods = inferred.len(), "inference finished");

    let reports: Vec<MethodReport> = session
        .methods()
        .filter(|entry| method.map_or(true, |name| entry.def.name == name))
        .map(|entry| MethodReport {
            method: entry.def.name.clone(),
            contracts: inferred
                .get(&entry.def.id)
                .map(|cs| cs.iter().map(Contract::to_string).collect())
                .unwrap_or_default(),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&reports).unwrap_or_else(|e| {
                format!("{{\"error\": \"failed to serialize result: {}\"}}", e)
            });
            println!("{}", json);
        }
        OutputFormat::Text => {
            for report in &reports {
                println!("{}: {}", report.method, report.contracts.join("; "));
            }
        }
    }
    0
}

/// Execute the normalize subcommand.
///
/// Returns exit code: 0 = success, 1 = invalid contract text, 2 = conflict.
fn run_normalize(params: usize, clauses: &[String]) -> i32 {
    let mut contracts = Vec::new();
    for clause in clauses {
        match Contract::parse_clauses(clause, params) {
            Ok(parsed) => contracts.extend(parsed),
            Err(e) => {
                eprintln!("Error: {}", e);
                return 1;
            }
        }
    }

    match to_non_intersecting(contracts) {
        Some(normalized) => {
            println!("{}", format_contracts(&normalized));
            0
        }
        None => {
            eprintln!("Conflict: contracts overlap with different outcomes");
            2
        }
    }
}
