//! Collector status command.

use std::io::{stdout, Write};
use std::time::Duration;

use chrono::Local;
use console::style;
use crossterm::{cursor, execute, terminal};

use collector_admin::models::CollectorStatus;
use collector_admin::ticker::Ticker;
use collector_admin::AdminClient;

/// Show collector status once, as JSON, or refreshed on an interval.
pub async fn cmd_status(
    client: &AdminClient,
    live: bool,
    interval: u64,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let status = client.status().await?;
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    if live {
        run_live_status(client, interval).await
    } else {
        let status = client.status().await?;
        display_status(&status);
        Ok(())
    }
}

fn display_status(status: &CollectorStatus) {
    let separator = "─".repeat(70);

    println!();
    println!(
        "{:<50} Last updated: {}",
        style("collector status").bold(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("{}", separator);

    let state = if status.is_running {
        style("running").green().bold()
    } else {
        style("stopped").red().bold()
    };
    println!("  {:<20} {}", "State:", state);
    println!("  {:<20} {}s", "Request interval:", status.request_interval);
    println!(
        "  {:<20} {}",
        "Current task:",
        status
            .current_task_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string())
    );
    let now = Local::now().naive_local();
    let last = match status.last_request_at() {
        Some(at) => format!(
            "{} ({}s ago)",
            status.last_request_time,
            (now - at).num_seconds().max(0)
        ),
        None => "-".to_string(),
    };
    let next = match status.next_request_at() {
        Some(at) => format!(
            "{} (in {}s)",
            status.next_request_time,
            (at - now).num_seconds().max(0)
        ),
        None => "-".to_string(),
    };
    println!("  {:<20} {}", "Last request:", last);
    println!("  {:<20} {}", "Next request:", next);

    if let Some(ref error) = status.error_message {
        println!();
        println!("{}", style("LAST ERROR").red().bold());
        println!("  {}", error);
    }

    println!("{}", separator);
}

/// Redraw the status on every tick until Ctrl+C.
async fn run_live_status(client: &AdminClient, interval: u64) -> anyhow::Result<()> {
    let mut stdout = stdout();
    let mut ticker = Ticker::new(Duration::from_secs(interval));

    execute!(stdout, terminal::Clear(terminal::ClearType::All))?;
    println!("Press Ctrl+C to exit\n");

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = tokio::signal::ctrl_c() => break,
        }

        execute!(stdout, cursor::MoveTo(0, 1))?;
        execute!(stdout, terminal::Clear(terminal::ClearType::FromCursorDown))?;

        // A failed poll is shown and the next tick tries again.
        match client.status().await {
            Ok(status) => display_status(&status),
            Err(e) => eprintln!("{} Error: {}", style("✗").red(), e),
        }

        println!("\nPress Ctrl+C to exit");
        stdout.flush()?;
    }

    Ok(())
}
