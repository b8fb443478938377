//! qbl CLI — build exams and quizzes from question bank files.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(name = "qbl", version, about = "Question bank to quiz and exam converter")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load banks, optionally generate an exam, and write it out
    Build(commands::build::BuildArgs),

    /// Check bank files for parse and validation problems
    Validate {
        /// Bank files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// Create a starter config and example bank
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("qbl=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Build(args) => commands::build::execute(args),
        Commands::Validate { files } => commands::validate::execute(files),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
