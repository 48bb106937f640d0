mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};
use qualmaster::config::QualMasterConfig;
use qualmaster::server;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "qualmaster",
    version,
    about = "Qualitative research methodology MCP server"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the MCP server (stdio unless --http or `server.transport = "http"`)
    Serve {
        /// Serve streamable HTTP and the JSON-RPC endpoint instead of stdio
        #[arg(long)]
        http: bool,
    },
    /// Manage the embedding model
    Model {
        #[command(subcommand)]
        action: ModelAction,
    },
    /// Manage the semantic search index
    Index {
        #[command(subcommand)]
        action: IndexAction,
    },
    /// Search the knowledge base from the terminal
    Search {
        query: String,
        /// Restrict results to one category (paradigms, traditions, coding, quality, journals, rejection)
        #[arg(long)]
        category: Option<String>,
    },
    /// Score a study description against the quality rubric
    Assess {
        description: String,
        /// A rigor strategy already applied; repeatable
        #[arg(long = "strategy")]
        strategies: Vec<String>,
        /// lincoln_guba, tracy or all
        #[arg(long, default_value = "all")]
        criteria: String,
    },
}

#[derive(Subcommand)]
enum ModelAction {
    /// Download the embedding model to ~/.qualmaster/models/
    Download,
}

#[derive(Subcommand)]
enum IndexAction {
    /// Render the knowledge corpus, embed it and rewrite the index
    Build,
    /// Show what the index contains and how it was built
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = QualMasterConfig::load()?;

    // Log to stderr so stdout stays clean for MCP JSON-RPC.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { http } => {
            if http || config.server.transport == "http" {
                server::serve_http(config).await?;
            } else {
                server::serve_stdio(config).await?;
            }
        }
        Command::Model { action } => match action {
            ModelAction::Download => {
                cli::model_download(&config.embedding).await?;
            }
        },
        Command::Index { action } => match action {
            IndexAction::Build => cli::index_build(&config)?,
            IndexAction::Status => cli::index_status(&config)?,
        },
        Command::Search { query, category } => {
            cli::search(config, &query, category.as_deref()).await?;
        }
        Command::Assess {
            description,
            strategies,
            criteria,
        } => {
            cli::assess(&config, &description, &strategies, &criteria)?;
        }
    }

    Ok(())
}
