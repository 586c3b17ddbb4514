//! jsondb CLI
//!
//! Reads from and writes to a JSON database file from the command line.
//! Prints the response as JSON on stdout; logs go to stderr.

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use jsondb::{Config, Engine, Request, WriteSource};
use tracing_subscriber::{fmt, EnvFilter};

/// jsondb CLI
#[derive(Parser, Debug)]
#[command(name = "jsondb")]
#[command(about = "Hierarchical key-value database in a single JSON file")]
#[command(version)]
struct Cli {
    /// Database file used when --file is not given
    #[arg(long, default_value = "./JsonDatabase.Global.json")]
    db: String,

    /// Lock timeout in milliseconds (also the stale-lock threshold)
    #[arg(long, default_value = "20000")]
    lock_timeout_ms: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Read the value at a path
    Read {
        /// Path expression (empty for the whole document)
        #[arg(default_value = "")]
        path: String,

        /// Database file
        #[arg(short, long, default_value = "")]
        file: String,
    },

    /// Write (or delete) the value at a path
    Write {
        /// Path expression (empty for the whole document)
        #[arg(default_value = "")]
        path: String,

        /// Database file
        #[arg(short, long, default_value = "")]
        file: String,

        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// JSON text to write; an empty string deletes the path
    #[arg(long, conflicts_with_all = ["key", "context"])]
    json: Option<String>,

    /// Key (path expression) to look up in --context
    #[arg(long, requires = "context")]
    key: Option<String>,

    /// JSON object the --key is looked up in
    #[arg(long, requires = "key")]
    context: Option<String>,
}

fn main() -> ExitCode {
    // Initialize tracing/logging (stderr, so stdout stays JSON)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,jsondb=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Cli::parse();

    let config = Config::builder()
        .default_db_path(&args.db)
        .lock_timeout_ms(args.lock_timeout_ms)
        .build();

    let engine = match Engine::new(config) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let request = match build_request(args.command) {
        Ok(r) => r,
        Err(message) => {
            tracing::error!("{}", message);
            return ExitCode::FAILURE;
        }
    };

    let response = engine.respond(request);
    println!("{}", response.to_json());

    if response.is_error() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn build_request(command: Commands) -> Result<Request, String> {
    match command {
        Commands::Read { path, file } => Ok(Request::read(path, file)),
        Commands::Write { path, file, source } => {
            let source = match (source.json, source.key, source.context) {
                (Some(json), _, _) => WriteSource::JsonLiteral(json),
                (None, Some(key), Some(context)) => {
                    let context = serde_json::from_str(&context)
                        .map_err(|e| format!("--context is not valid JSON: {}", e))?;
                    WriteSource::ContextKey { context, key }
                }
                _ => return Err("write needs --json or --key with --context".to_string()),
            };
            Ok(Request::write(path, file, source))
        }
    }
}
