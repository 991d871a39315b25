//! Entry point: initializes logging, opens the database named on the
//! command line (or `test.db` by default), and hands it to the REPL.

#[macro_use]
mod errors;
mod database;
mod repl;
mod storage;

use clap::Parser;
use database::Database;
use std::fs::OpenOptions;
use std::process::ExitCode;
use tracing::error;
use tracing_subscriber::EnvFilter;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser)]
#[command(name = "mysqlite", version = VERSION, about = "A tiny B+tree-backed key/value store.")]
struct Cli {
    /// Path to the database file.
    #[arg(default_value = "test.db", env = "MYSQLITE_DB")]
    db: String,
}

fn main() -> ExitCode {
    let file = OpenOptions::new()
        .append(true)
        .create(true)
        .open("mysqlite.log")
        .expect("failed to open log file");

    tracing_subscriber::fmt()
        .with_writer(file)
        .with_ansi(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut db = match Database::open(&cli.db) {
        Ok(db) => db,
        Err(e) => {
            error!(path = %cli.db, error = %e, "failed to open database");
            println!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = repl::run(&mut db);

    if let Err(e) = db.close() {
        error!(error = %e, "failed to close database cleanly");
        println!("Error: {}", e);
        return ExitCode::FAILURE;
    }

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "fatal error");
            println!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
