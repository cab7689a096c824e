//! FileTable CLI
//!
//! Command-line interface for inspecting and editing table directories.

use std::process;

use clap::{Parser, Subcommand};
use filetable::{FileTableError, Table};
use tracing_subscriber::{fmt, EnvFilter};

/// FileTable CLI
#[derive(Parser, Debug)]
#[command(name = "filetable")]
#[command(about = "CLI for FileTable directories")]
#[command(version)]
struct Args {
    /// Open tables without snapshot history (plain value files)
    #[arg(long, global = true)]
    no_history: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the keys of each table
    Ls {
        /// Table directories
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Print the current value of a key
    Cat {
        /// Table directory
        path: String,

        /// The key to print
        key: String,
    },

    /// Print every snapshot of a key, oldest first
    History {
        /// Table directory
        path: String,

        /// The key to print
        key: String,
    },

    /// Write a value
    Put {
        /// Table directory
        path: String,

        /// The key to write
        key: String,

        /// The value to write
        value: String,
    },

    /// Remove a key and its history
    Rm {
        /// Table directory
        path: String,

        /// The key to remove
        key: String,
    },

    /// Remove a whole table directory
    Drop {
        /// Table directory
        path: String,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,filetable=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let keep_history = !args.no_history;

    if let Err(e) = run(args.command, keep_history) {
        if e.is_not_found() {
            eprintln!("key not found");
        } else {
            tracing::error!("{}", e);
            eprintln!("error: {}", e);
        }
        process::exit(1);
    }
}

fn run(command: Commands, keep_history: bool) -> Result<(), FileTableError> {
    match command {
        Commands::Ls { paths } => {
            for path in paths {
                let table = Table::open_path(&path, keep_history)?;
                for key in table.keys() {
                    println!("{}", String::from_utf8_lossy(&key?));
                }
            }
        }
        Commands::Cat { path, key } => {
            let table = Table::open_path(&path, keep_history)?;
            let value = table.get(key.as_bytes())?;
            println!("{}", String::from_utf8_lossy(&value));
        }
        Commands::History { path, key } => {
            let table = Table::open_path(&path, keep_history)?;
            for snapshot in table.get_snapshots(key.as_bytes()) {
                let snapshot = snapshot?;
                println!("{}", snapshot.info.timestamp);
                println!("{}", String::from_utf8_lossy(&snapshot.value));
            }
        }
        Commands::Put { path, key, value } => {
            let table = Table::open_path(&path, keep_history)?;
            table.put(key.as_bytes(), value.as_bytes())?;
            tracing::info!(key = %key, "stored value");
        }
        Commands::Rm { path, key } => {
            let table = Table::open_path(&path, keep_history)?;
            table.remove(key.as_bytes())?;
            tracing::info!(key = %key, "removed key");
        }
        Commands::Drop { path } => {
            let table = Table::open_path(&path, keep_history)?;
            table.drop_table()?;
            tracing::info!(path = %path, "dropped table");
        }
    }
    Ok(())
}
