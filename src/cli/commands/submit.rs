//! Task creation commands.

use console::style;

use collector_admin::models::TaskRequest;
use collector_admin::submit::{
    BatchOutcome, Context, RunSummary, Selection, SelectionBuilder, ValidationError,
};
use collector_admin::{BatchSubmitter, Catalog, Settings};

use super::connect;
use crate::cli::helpers::{confirm, print_err, print_ok, print_warn};
use crate::cli::progress::SubmitProgress;

/// Products listed before the confirmation prompt.
const PREVIEW_ROWS: usize = 10;

/// What the operator picked on the command line.
#[derive(Debug, Default)]
pub struct SubmitArgs {
    pub server: String,
    pub groups: Vec<String>,
    pub products: Vec<String>,
    pub all: bool,
}

/// Resolve the server and product selection against the catalog.
fn plan(catalog: &Catalog, args: &SubmitArgs) -> Result<(Context, Selection), ValidationError> {
    let context = Context::parse(Some(args.server.as_str()), catalog)?;

    let mut builder = SelectionBuilder::default();
    if args.all {
        builder.push_all(catalog);
    }
    for name in &args.groups {
        builder.push_group(catalog, name)?;
    }
    for token in &args.products {
        builder.push_raw(token);
    }
    Ok((context, builder.build()?))
}

/// Create tasks for every selected product on one server, in batches.
///
/// Nothing is sent, not even the login, until the selection is valid and
/// confirmed.
pub async fn cmd_submit(
    settings: &Settings,
    args: &SubmitArgs,
    yes: bool,
    json: bool,
) -> anyhow::Result<()> {
    let catalog = &settings.catalog;
    let (context, selection) = plan(catalog, args)?;

    if json && !yes {
        anyhow::bail!("--json output needs --yes (no confirmation prompt)");
    }
    if !json {
        println!(
            "\n{} {} task(s) for {}",
            style("Creating").bold(),
            selection.len(),
            style(catalog.server_label(context.id())).cyan()
        );
        for id in selection.ids().iter().take(PREVIEW_ROWS) {
            println!("  {}", catalog.product_label(*id));
        }
        if selection.len() > PREVIEW_ROWS {
            println!(
                "  {} more",
                style(format!("... {}", selection.len() - PREVIEW_ROWS)).dim()
            );
        }
        if !confirm("\nProceed?", yes)? {
            return Ok(());
        }
    }

    let client = connect(settings).await?;
    let progress = (!json).then(|| SubmitProgress::new(selection.len()));
    let result = BatchSubmitter::new(&client, catalog)
        .run(&selection, context, |state| {
            if let Some(ref bar) = progress {
                bar.update(state);
            }
        })
        .await;

    if let Some(bar) = progress {
        bar.finish();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        for outcome in result.failures() {
            if let BatchOutcome::Failure {
                index,
                size,
                kind,
                message,
            } = outcome
            {
                print_err(&format!(
                    "Batch {} ({} task(s)) failed [{}]: {}",
                    index + 1,
                    size,
                    kind.as_str(),
                    message
                ));
            }
        }

        match result.summary() {
            RunSummary::AllSucceeded => print_ok(&format!(
                "All {} task(s) submitted ({} new)",
                result.total(),
                result.created()
            )),
            RunSummary::PartialFailure => print_warn(&format!(
                "Partially submitted: {}/{} task(s) ({} new)",
                result.completed(),
                result.total(),
                result.created()
            )),
            RunSummary::AllFailed => print_err("No tasks were submitted"),
        }
    }

    if result.has_error {
        anyhow::bail!(
            "{} of {} batch(es) failed",
            result.failures().count(),
            result.outcomes.len()
        );
    }
    Ok(())
}

/// Create a single task.
pub async fn cmd_create(settings: &Settings, server: &str, product: i64) -> anyhow::Result<()> {
    let context = Context::parse(Some(server), &settings.catalog)?;
    let client = connect(settings).await?;
    let task = TaskRequest::new(context.id(), product);
    client.create_task(task).await?;
    print_ok(&format!(
        "Created task {} / {} ({})",
        settings.catalog.server_label(context.id()),
        settings.catalog.product_label(product),
        task.table_name()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use collector_admin::config::ProductGroup;

    fn catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.servers.insert(1, "Entrepreneurs".to_string());
        catalog.products.insert(3, "Wheat".to_string());
        catalog.products.insert(4, "Corn".to_string());
        catalog.product_groups.push(ProductGroup {
            name: "Grain".to_string(),
            products: vec![4, 3],
        });
        catalog
    }

    /// Settings pointing at a closed port, with credentials so a login would be tried.
    fn unreachable_settings() -> Settings {
        let port = std::net::TcpListener::bind("127.0.0.1:0")
            .unwrap()
            .local_addr()
            .unwrap()
            .port();
        let mut settings = Settings::default();
        settings
            .set_base_url(&format!("http://127.0.0.1:{}", port))
            .unwrap();
        settings.username = Some("admin".to_string());
        settings.password = Some("secret".to_string());
        settings.catalog = catalog();
        settings
    }

    fn args(server: &str, products: &[&str]) -> SubmitArgs {
        SubmitArgs {
            server: server.to_string(),
            products: products.iter().map(|p| p.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_plan_combines_all_groups_and_ids() {
        let args = SubmitArgs {
            groups: vec!["grain".to_string()],
            all: true,
            ..args("1", &["9", "x"])
        };
        let (context, selection) = plan(&catalog(), &args).unwrap();
        assert_eq!(context.id(), 1);
        assert_eq!(selection.ids(), &[3, 4, 9]);
    }

    #[test]
    fn test_plan_rejects_unknown_server() {
        assert_eq!(
            plan(&catalog(), &args("5", &["3"])).unwrap_err(),
            ValidationError::UnknownContext(5)
        );
    }

    #[tokio::test]
    async fn test_empty_selection_fails_before_login() {
        let err = cmd_submit(&unreachable_settings(), &args("1", &[]), true, false)
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::NoItemsSelected)
        );
    }

    #[tokio::test]
    async fn test_bad_server_fails_before_login() {
        let settings = unreachable_settings();

        let err = cmd_submit(&settings, &args("north", &["3"]), true, false)
            .await
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::InvalidContext)
        );

        let err = cmd_create(&settings, "7", 3).await.unwrap_err();
        assert_eq!(
            err.downcast_ref::<ValidationError>(),
            Some(&ValidationError::UnknownContext(7))
        );
    }
}
