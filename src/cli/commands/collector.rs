//! Collector control commands.

use collector_admin::client::INTERVAL_RANGE;
use collector_admin::AdminClient;

use crate::cli::helpers::print_ok;

/// Start or stop the collector.
pub async fn cmd_toggle(client: &AdminClient, running: bool) -> anyhow::Result<()> {
    let response = client.toggle_collector(running).await?;
    let fallback = if running {
        "Collector started"
    } else {
        "Collector stopped"
    };
    print_ok(response.message.as_deref().unwrap_or(fallback));
    Ok(())
}

/// Change the delay between collector requests.
pub async fn cmd_interval(client: &AdminClient, seconds: u32) -> anyhow::Result<()> {
    if !INTERVAL_RANGE.contains(&seconds) {
        anyhow::bail!(
            "Interval must be between {} and {} seconds",
            INTERVAL_RANGE.start(),
            INTERVAL_RANGE.end()
        );
    }
    client.update_interval(seconds).await?;
    print_ok(&format!("Request interval set to {}s", seconds));
    Ok(())
}
