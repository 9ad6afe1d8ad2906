mod inspect;
mod run;
mod schedule;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "redditetl")]
#[command(about = "Subreddit top posts to sentiment-labelled CSV in object storage")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the pipeline once and exit
    Run {
        #[command(flatten)]
        target: TargetArgs,

        /// Fail on the first error instead of retrying the whole run
        #[arg(long)]
        no_retry: bool,
    },
    /// Run the pipeline on a cron schedule until interrupted
    Schedule {
        #[command(flatten)]
        target: TargetArgs,

        /// Six-field cron expression (sec min hour day month weekday);
        /// overrides `REDDIT_ETL_SCHEDULE`
        #[arg(long)]
        cron: Option<String>,
    },
    /// Summarise a payload CSV produced by a previous run
    Inspect {
        /// Path to the CSV file
        file: PathBuf,

        /// Also print the first N rows
        #[arg(long, default_value_t = 0)]
        rows: usize,
    },
}

/// Which subreddit to read and how many posts to take.
#[derive(Debug, Clone, Default, PartialEq, Eq, Args)]
pub(crate) struct TargetArgs {
    /// Subreddit name; defaults to `REDDIT_ETL_SUBREDDIT`
    #[arg(long, short)]
    pub(crate) subreddit: Option<String>,

    /// Number of top posts; defaults to `REDDIT_ETL_POST_LIMIT`
    #[arg(long, short)]
    pub(crate) limit: Option<u32>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { target, no_retry } => {
            let config = redditetl_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            run::run_once(&config, &target, no_retry).await
        }
        Commands::Schedule { target, cron } => {
            let config = redditetl_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            schedule::run_scheduled(&config, &target, cron).await
        }
        Commands::Inspect { file, rows } => {
            // Reads a local file only; no credentials needed.
            init_tracing("info")?;
            inspect::run_inspect(&file, rows).await
        }
    }
}

fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    Ok(())
}

#[cfg(test)]
mod tests;
