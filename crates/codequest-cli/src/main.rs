//! codequest CLI: interactive trainer and teacher tooling.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "codequest", version, about = "Adaptive coding skill trainer")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start an interactive session (the default)
    Play,

    /// Manage student profiles
    Student {
        #[command(subcommand)]
        action: StudentAction,
    },

    /// Show a student's per-topic progress
    Progress {
        /// Student ID (e.g. S001)
        #[arg(long)]
        student: String,
    },

    /// Generate teacher reports from the attempt ledger
    Report {
        /// Output directory (default: report_dir from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output formats: text, csv, json, html, all
        #[arg(long, default_value = "text,csv")]
        format: String,
    },

    /// Validate question bank TOML files
    Validate {
        /// Path to a question bank file or directory
        #[arg(long)]
        bank: PathBuf,
    },

    /// Create starter config and example question bank
    Init,
}

#[derive(Subcommand)]
enum StudentAction {
    /// Create a new student profile
    Create {
        /// Display name
        #[arg(long)]
        name: String,
    },
    /// List all student profiles
    List,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("codequest=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command.unwrap_or(Commands::Play) {
        Commands::Play => commands::play::execute(config),
        Commands::Student { action } => match action {
            StudentAction::Create { name } => commands::student::create(name, config),
            StudentAction::List => commands::student::list(config),
        },
        Commands::Progress { student } => commands::progress::execute(student, config),
        Commands::Report { output, format } => commands::report::execute(output, format, config),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
