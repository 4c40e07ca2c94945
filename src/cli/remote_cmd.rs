//! Commands against the remote task list
//!
//! Each command performs a single pipeline operation, the same one a scan
//! would, and reports the result instead of alerting.

use anyhow::{Context, Result};
use clap::Subcommand;

use super::output::Output;
use crate::domain::{plan_merge, ListId, MergeDecision, ScanCode};
use crate::pipeline::{ProductMerger, ShelfSorter};
use crate::remote::{AlertSink, LogAlerts, PushbulletAlerts, TaskListApi, WunderlistClient};
use crate::storage::{AlertConfig, Home};

#[derive(Subcommand)]
pub enum RemoteCommands {
    /// Add one unit of a catalog product to its list
    Add {
        /// Scan code (EAN) of a catalog product
        ean: ScanCode,

        /// List to add to (defaults to the product's list, then remote.default_list)
        #[arg(long)]
        list: Option<ListId>,

        /// Show whether the product would be created or merged, without writing
        #[arg(long)]
        dry_run: bool,
    },

    /// Show the tasks of a list with their counts
    Tasks {
        /// List id (defaults to remote.default_list)
        #[arg(long)]
        list: Option<ListId>,
    },

    /// Reorder a list by the shelf labels in task comments
    Sort {
        /// List id (defaults to remote.default_list)
        #[arg(long)]
        list: Option<ListId>,

        /// Show the new order without writing it
        #[arg(long)]
        dry_run: bool,
    },
}

pub fn run(cmd: RemoteCommands, output: &Output, home: &Home) -> Result<()> {
    match cmd {
        RemoteCommands::Add { ean, list, dry_run } => add(output, home, &ean, list, dry_run),
        RemoteCommands::Tasks { list } => tasks(output, home, list),
        RemoteCommands::Sort { list, dry_run } => sort(output, home, list, dry_run),
    }
}

/// Builds the remote client from the home configuration
pub(super) fn connect(home: &Home) -> Result<WunderlistClient> {
    let remote = &home.config().home.remote;
    let credentials = remote.credentials()?;

    WunderlistClient::new(remote.api_url.as_str(), &credentials, remote.timeout())
        .context("Failed to set up the remote client")
}

/// Picks the alert sink the configuration asks for
pub(super) fn alert_sink(config: &AlertConfig) -> Box<dyn AlertSink> {
    match &config.pushbullet_access_key {
        Some(key) if !key.is_empty() => {
            Box::new(PushbulletAlerts::new(key.as_str(), config.channel_tag.clone()))
        }
        _ => Box::new(LogAlerts),
    }
}

fn target_list(home: &Home, list: Option<ListId>) -> Result<ListId> {
    match list {
        Some(list) => Ok(list),
        None => Ok(home.config().home.remote.require_default_list()?),
    }
}

fn add(
    output: &Output,
    home: &Home,
    ean: &ScanCode,
    list: Option<ListId>,
    dry_run: bool,
) -> Result<()> {
    let catalog = home.catalog()?;
    let product = catalog.product(ean)?.ok_or_else(|| {
        anyhow::anyhow!(
            "Product not found: {}. Add it with 'shelfscan product add'.",
            ean
        )
    })?;
    let list = target_list(home, list.or(product.list))?;
    let client = connect(home)?;

    output.verbose_ctx("remote", &format!("Adding {} to list {}", product.name, list));

    if dry_run {
        let tasks = client.list_tasks(list)?;
        let decision = plan_merge(&tasks, &product.name);
        if output.is_json() {
            output.data(&decision);
        } else {
            match decision {
                MergeDecision::Create { name } => {
                    println!("Would create task '{}' on list {}", name, list)
                }
                MergeDecision::Merge {
                    task_id, new_title, ..
                } => println!("Would rename task {} to '{}'", task_id, new_title),
            }
        }
        return Ok(());
    }

    let merger = ProductMerger::new(&client);
    let outcome = merger.merge(ean, &product.name, list, product.shelf.as_deref())?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "ean": ean,
            "name": product.name,
            "list": list,
            "success": outcome.success,
            "payload": outcome.payload,
        }));
    }

    if !outcome.success {
        anyhow::bail!("List {} rejected {}: {}", list, product.name, outcome.payload);
    }

    if !output.is_json() {
        output.success(&format!("Added {} to list {}", product.name, list));
    }
    Ok(())
}

fn tasks(output: &Output, home: &Home, list: Option<ListId>) -> Result<()> {
    let list = target_list(home, list)?;
    let client = connect(home)?;
    let tasks = client.list_tasks(list)?;

    if output.is_json() {
        let items: Vec<_> = tasks
            .iter()
            .map(|t| {
                let decoded = t.decoded();
                serde_json::json!({
                    "id": t.id,
                    "title": t.title,
                    "name": decoded.name,
                    "count": decoded.count,
                    "revision": t.revision,
                })
            })
            .collect();
        output.data(&items);
        return Ok(());
    }

    if tasks.is_empty() {
        println!("List {} is empty.", list);
        return Ok(());
    }

    println!("{:<12} {:<6} NAME", "ID", "COUNT");
    println!("{}", "-".repeat(50));
    for task in &tasks {
        let decoded = task.decoded();
        println!("{:<12} {:<6} {}", task.id, decoded.count, decoded.name);
    }

    Ok(())
}

fn sort(output: &Output, home: &Home, list: Option<ListId>, dry_run: bool) -> Result<()> {
    let list = target_list(home, list)?;
    let client = connect(home)?;
    let sorter = ShelfSorter::new(&client, home.config().home.remote.positions);

    if dry_run {
        match sorter.plan(list)? {
            Some(plan) if output.is_json() => output.data(&plan),
            Some(plan) => {
                println!("Revision {}", plan.revision);
                for task in &plan.task_ids {
                    println!("  {}", task);
                }
            }
            None => output.success(&format!("No shelf labels on list {}", list)),
        }
        return Ok(());
    }

    let outcome = sorter.sort(list)?;
    if !outcome.success {
        anyhow::bail!("List {} rejected the new order: {}", list, outcome.payload);
    }

    if output.is_json() {
        output.data(&outcome);
    } else {
        output.success(&format!("Sorted list {} by shelf", list));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alerts_without_key_go_to_log() {
        let sink = alert_sink(&AlertConfig::default());
        // LogAlerts never touches the network
        sink.notify("title", "body");
    }

    #[test]
    fn blank_key_means_log_only() {
        let config = AlertConfig {
            pushbullet_access_key: Some(String::new()),
            channel_tag: None,
        };
        alert_sink(&config).notify("title", "body");
    }
}
