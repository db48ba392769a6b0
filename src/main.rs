/// docfiler - files an inbox of scanned documents into an LLM-grown folder tree
use clap::{Parser, Subcommand};
use docfiler::cli::{CliApp, CliCommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docfiler")]
#[command(about = "Sort scanned documents into folders chosen by an LLM", long_about = None)]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process every file in the inbox
    Run {
        /// Inbox directory (overrides the configuration)
        #[arg(long)]
        inbox: Option<PathBuf>,

        /// Output root (overrides the configuration)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Print the batch report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify a single file without moving it
    Classify {
        /// File to classify
        path: PathBuf,
    },

    /// Show the groups and subgroups found in the output tree
    Taxonomy {
        /// Output root (overrides the configuration)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let app = match CliApp::new(cli.config.as_deref()) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to initialize docfiler: {}", e);
            std::process::exit(1);
        }
    };

    let command = match cli.command {
        Commands::Run {
            inbox,
            output,
            json,
        } => CliCommand::Run {
            inbox,
            output,
            json,
        },
        Commands::Classify { path } => CliCommand::Classify { path },
        Commands::Taxonomy { output } => CliCommand::Taxonomy { output },
    };

    if let Err(e) = app.execute(command).await {
        eprintln!("Command failed: {}", e.source_chain().join(": "));
        std::process::exit(1);
    }
}
