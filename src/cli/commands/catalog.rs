//! Catalog listing.

use console::style;

use collector_admin::Settings;

/// Print the configured servers and product groups.
pub fn cmd_catalog(settings: &Settings) -> anyhow::Result<()> {
    let catalog = &settings.catalog;

    match settings.config_path {
        Some(ref path) => println!("Config: {}", path.display()),
        None => println!("Config: {}", style("(none found)").dim()),
    }
    println!();

    println!("{}", style("SERVERS").cyan().bold());
    if catalog.servers.is_empty() {
        println!("  {}", style("none configured; any id is accepted").dim());
    }
    for (id, name) in &catalog.servers {
        println!("  {:>6}  {}", id, name);
    }
    println!();

    let groups = catalog.groups();
    if groups.is_empty() {
        println!("{}", style("PRODUCTS").cyan().bold());
        for (id, name) in &catalog.products {
            println!("  {:>6}  {}", id, name);
        }
        return Ok(());
    }

    for (name, products) in groups {
        println!("{}", style(name.to_uppercase()).cyan().bold());
        for (id, product) in products {
            println!("  {:>6}  {}", id, product);
        }
        println!();
    }

    Ok(())
}
