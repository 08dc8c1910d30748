//! collector-admin - admin client for the market collector.
//!
//! Creates collector tasks in batches, starts and stops the collector and
//! shows its status and task table.

mod cli;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    // Initialize logging based on verbosity; stdout is kept for command output
    let default_filter = if cli::is_verbose() {
        "collector_admin=info"
    } else {
        "collector_admin=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    cli::run().await
}
