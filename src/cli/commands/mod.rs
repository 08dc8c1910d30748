//! CLI commands implementation.
//!
//! This module contains the CLI parser and dispatches to command-specific modules.

mod catalog;
mod collector;
mod status;
mod submit;
mod tasks;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use collector_admin::config::{load_settings_with_options, LoadOptions};
use collector_admin::{AdminClient, Settings};

#[derive(Parser)]
#[command(name = "collector-admin")]
#[command(about = "Admin client for the market collector")]
#[command(version)]
pub struct Cli {
    /// Config file path (overrides auto-discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend URL (overrides the config file)
    #[arg(short, long, global = true, env = "COLLECTOR_ADMIN_URL")]
    url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
pub fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Subcommand)]
enum Commands {
    /// Create collector tasks for a server in batches of 10
    Submit {
        /// Server (context) id every task is created for
        #[arg(short, long)]
        server: String,
        /// Add every product of a catalog group (repeatable)
        #[arg(short, long)]
        group: Vec<String>,
        /// Add every product in the catalog
        #[arg(short, long)]
        all: bool,
        /// Product ids; non-numeric values are ignored
        products: Vec<String>,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a single task
    Create {
        /// Server id
        #[arg(short, long)]
        server: String,
        /// Product id
        product: i64,
    },

    /// Start the collector
    Start,

    /// Stop the collector
    Stop,

    /// Show collector status
    Status {
        /// Continuously refresh status display
        #[arg(long)]
        live: bool,
        /// Refresh interval in seconds
        #[arg(long, default_value = "10")]
        interval: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Set the delay between collector requests (1-3600 seconds)
    Interval {
        /// Seconds between requests
        seconds: u32,
    },

    /// List collector tasks with table statistics
    Tasks {
        /// Page to show (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,
        /// Rows per page
        #[arg(long, default_value_t = collector_admin::paginate::PAGE_SIZE)]
        page_size: usize,
        /// Continuously refresh the table
        #[arg(long)]
        live: bool,
        /// Refresh interval in seconds
        #[arg(long, default_value = "30")]
        interval: u64,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete one task
    Delete {
        /// Task id
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Delete every task (collector must be stopped)
    DeleteAll {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Show configured servers and product groups
    Catalog,
}

/// Build the client and log in when credentials are configured.
async fn connect(settings: &Settings) -> anyhow::Result<AdminClient> {
    let client = AdminClient::from_settings(settings)?;
    if client.has_credentials() {
        client.login().await?;
        tracing::info!("Logged in to {}", client.base_url());
    } else {
        tracing::debug!("No credentials configured; relying on an existing session");
    }
    Ok(client)
}

pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config,
        base_url: cli.url,
    };
    let (settings, _config) = load_settings_with_options(options).await?;

    match cli.command {
        Commands::Catalog => catalog::cmd_catalog(&settings),
        Commands::Submit {
            server,
            group,
            all,
            products,
            yes,
            json,
        } => {
            let args = submit::SubmitArgs {
                server,
                groups: group,
                products,
                all,
            };
            submit::cmd_submit(&settings, &args, yes, json).await
        }
        Commands::Create { server, product } => {
            submit::cmd_create(&settings, &server, product).await
        }
        Commands::Start => {
            let client = connect(&settings).await?;
            collector::cmd_toggle(&client, true).await
        }
        Commands::Stop => {
            let client = connect(&settings).await?;
            collector::cmd_toggle(&client, false).await
        }
        Commands::Interval { seconds } => {
            let client = connect(&settings).await?;
            collector::cmd_interval(&client, seconds).await
        }
        Commands::Status {
            live,
            interval,
            json,
        } => {
            let client = connect(&settings).await?;
            status::cmd_status(&client, live, interval, json).await
        }
        Commands::Tasks {
            page,
            page_size,
            live,
            interval,
            json,
        } => {
            let client = connect(&settings).await?;
            tasks::cmd_tasks(&client, &settings, page, page_size, live, interval, json).await
        }
        Commands::Delete { id, yes } => {
            let client = connect(&settings).await?;
            tasks::cmd_delete(&client, id, yes).await
        }
        Commands::DeleteAll { yes } => {
            let client = connect(&settings).await?;
            tasks::cmd_delete_all(&client, yes).await
        }
    }
}
