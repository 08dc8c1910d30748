//! Task table and deletion commands.

use std::io::{stdout, Write};
use std::time::Duration;

use chrono::Local;
use console::style;
use crossterm::{cursor, execute, terminal};

use collector_admin::models::TaskList;
use collector_admin::paginate::Paginator;
use collector_admin::ticker::Ticker;
use collector_admin::{AdminClient, Catalog, Settings};

use crate::cli::helpers::{confirm, format_number, print_ok, truncate_string};

/// List tasks one page at a time, optionally refreshed on an interval.
pub async fn cmd_tasks(
    client: &AdminClient,
    settings: &Settings,
    page: usize,
    page_size: usize,
    live: bool,
    interval: u64,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        let list = client.tasks().await?;
        println!("{}", serde_json::to_string_pretty(&list)?);
        return Ok(());
    }

    if live {
        return run_live_tasks(client, &settings.catalog, page, page_size, interval).await;
    }

    let list = client.tasks().await?;
    display_tasks(&list, &settings.catalog, page, page_size);
    Ok(())
}

fn display_tasks(list: &TaskList, catalog: &Catalog, page: usize, page_size: usize) {
    let separator = "─".repeat(100);
    let pager = Paginator::new(list.tasks.len(), page_size).at(page);

    println!();
    println!(
        "{:<80} Last updated: {}",
        style("collector tasks").bold(),
        Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    println!("{}", separator);

    if list.tasks.is_empty() {
        println!("  No tasks. Create some with 'collector-admin submit'.");
        println!("{}", separator);
        return;
    }

    println!(
        "{:>6}  {:<16} {:<20} {:>8} {:>4} {:>10} {:>8} {:>8}  {:<19}",
        style("ID").cyan().bold(),
        style("SERVER").cyan().bold(),
        style("PRODUCT").cyan().bold(),
        style("RUNS").cyan().bold(),
        style("OK").cyan().bold(),
        style("ROWS").cyan().bold(),
        style("BATCHES").cyan().bold(),
        style("LAST").cyan().bold(),
        style("UPDATED").cyan().bold(),
    );

    for task in pager.page(&list.tasks) {
        let stats = list.stats_for(task);
        let ok = if task.total_collections == 0 {
            style("-").dim()
        } else if task.last_collection_success {
            style("✓").green()
        } else {
            style("✗").red()
        };

        println!(
            "{:>6}  {:<16} {:<20} {:>8} {:>4} {:>10} {:>8} {:>8}  {:<19}",
            task.id,
            truncate_string(&catalog.server_label(task.server_type), 16),
            truncate_string(&catalog.product_label(task.product_type), 20),
            format_number(task.total_collections),
            ok,
            format_number(stats.total_count),
            format_number(stats.batch_count),
            format_number(stats.last_batch_count),
            stats.last_update_time,
        );

        if !task.last_collection_success {
            if let Some(ref error) = task.last_error {
                println!("{:>8}{}", "", style(truncate_string(error, 90)).red().dim());
            }
        }
    }

    println!("{}", separator);
    let mut footer = format!(
        "Page {}/{} ({} task(s))",
        pager.current(),
        pager.total_pages(),
        format_number(list.tasks.len() as u64)
    );
    if pager.has_next() {
        footer.push_str(&format!("  next: --page {}", pager.current() + 1));
    }
    println!("{}", style(footer).dim());
}

/// Redraw the task table on every tick until Ctrl+C.
async fn run_live_tasks(
    client: &AdminClient,
    catalog: &Catalog,
    page: usize,
    page_size: usize,
    interval: u64,
) -> anyhow::Result<()> {
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

        match client.tasks().await {
            Ok(list) => display_tasks(&list, catalog, page, page_size),
            Err(e) => eprintln!("{} Error: {}", style("✗").red(), e),
        }

        println!("\nPress Ctrl+C to exit");
        stdout.flush()?;
    }

    Ok(())
}

/// Delete one task.
pub async fn cmd_delete(client: &AdminClient, id: i64, yes: bool) -> anyhow::Result<()> {
    if !confirm(&format!("Delete task {}?", id), yes)? {
        return Ok(());
    }
    client.delete_task(id).await?;
    print_ok(&format!("Deleted task {}", id));
    Ok(())
}

/// Delete every task.
pub async fn cmd_delete_all(client: &AdminClient, yes: bool) -> anyhow::Result<()> {
    if !confirm(
        &format!("{} Delete ALL tasks?", style("!").yellow().bold()),
        yes,
    )? {
        return Ok(());
    }
    client.delete_all_tasks().await?;
    print_ok("Deleted all tasks");
    Ok(())
}
