mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "proctor-cli")]
#[command(about = "Proctor CLI - Validate candidate submissions against the execution service", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a submission's test battery and print the result envelope
    Run {
        /// Path to the candidate source file
        #[arg(short, long)]
        code: String,

        /// Language tag (javascript/js, python/py, cpp/c++, java, c)
        #[arg(short, long)]
        language: String,

        /// Path to the test cases JSON file
        #[arg(short, long)]
        tests: String,

        /// Path to a driver templates JSON file (optional)
        #[arg(short, long)]
        drivers: Option<String>,

        /// Problem title, enables the pre-flight submission check
        #[arg(short, long)]
        problem: Option<String>,
    },

    /// List supported languages and their source file names
    Languages,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing subscriber
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            code,
            language,
            tests,
            drivers,
            problem,
        } => {
            let success =
                commands::run_submission(&code, &language, &tests, drivers.as_deref(), problem)
                    .await?;
            if !success {
                std::process::exit(1);
            }
        }
        Commands::Languages => {
            commands::list_languages();
        }
    }

    Ok(())
}
