use std::path::PathBuf;

use clap::{Parser, Subcommand};
use sqlx::{Pool, Sqlite};

use crate::db::job_repository::JobRepository;
use crate::loader;

#[derive(Debug, Parser)]
#[command(name = "job-board", version, about = "Job posting store with a JSON HTTP API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand, PartialEq, Eq)]
pub enum Command {
    /// Seed an empty store, then serve the HTTP API (default)
    Serve,
    /// Load a JSON array of jobs into the store, skipping known job URLs
    Load {
        /// Path to the JSON file
        file: PathBuf,
    },
    /// Print the number of stored jobs
    Count,
}

/// Run a one-shot command against the store
pub async fn run(pool: &Pool<Sqlite>, command: Command) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Command::Serve => Ok(()),
        Command::Load { file } => {
            let summary = loader::load_jobs_from_file(pool, &file).await?;
            println!(
                "Loaded {}: {} inserted, {} duplicates skipped, {} invalid",
                file.display(),
                summary.inserted,
                summary.duplicates,
                summary.invalid.len()
            );
            for (index, reason) in summary.invalid {
                println!("  item #{}: {}", index, reason);
            }
            Ok(())
        }
        Command::Count => {
            println!("{}", JobRepository::count(pool).await?);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_subcommands() {
        assert_eq!(Cli::parse_from(["job-board"]).command, None);
        assert_eq!(Cli::parse_from(["job-board", "serve"]).command, Some(Command::Serve));
        assert_eq!(
            Cli::parse_from(["job-board", "load", "seed.json"]).command,
            Some(Command::Load {
                file: PathBuf::from("seed.json")
            })
        );
        assert!(Cli::try_parse_from(["job-board", "load"]).is_err());
    }
}
