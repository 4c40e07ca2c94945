//! Tag commands

use anyhow::Result;
use clap::Subcommand;

use super::output::{or_dash, Output};
use crate::domain::Tag;
use crate::storage::Home;

#[derive(Subcommand)]
pub enum TagCommands {
    /// Add a tag
    Add {
        id: i64,

        name: String,

        /// Display position among tags
        #[arg(long, default_value = "0")]
        ord: i64,
    },

    /// Change a tag's name or position
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        ord: Option<i64>,
    },

    /// Remove a tag; its products become untagged
    Remove { id: i64 },

    /// Show all tags in display order
    All,

    /// Show products grouped by tag
    Overview,
}

pub fn run(cmd: TagCommands, output: &Output, home: &Home) -> Result<()> {
    let catalog = home.catalog()?;

    match cmd {
        TagCommands::Add { id, name, ord } => {
            let tag = Tag { id, name, ord };
            catalog.add_tag(&tag)?;
            output.success(&format!("Added tag: {} - {}", tag.id, tag.name));
        }
        TagCommands::Update { id, name, ord } => {
            if name.is_none() && ord.is_none() {
                anyhow::bail!("Nothing to update. Pass --name or --ord.");
            }
            let tag = catalog.update_tag(id, name.as_deref(), ord)?;
            output.success(&format!("Updated tag: {} - {} (ord {})", tag.id, tag.name, tag.ord));
        }
        TagCommands::Remove { id } => {
            catalog.remove_tag(id)?;
            output.success(&format!("Removed tag: {}", id));
        }
        TagCommands::All => {
            let tags = catalog.tags()?;
            if output.is_json() {
                output.data(&tags);
            } else if tags.is_empty() {
                println!("No tags defined.");
            } else {
                for tag in &tags {
                    output.row(&[
                        tag.id.to_string().as_str(),
                        tag.name.as_str(),
                        tag.ord.to_string().as_str(),
                    ]);
                }
            }
        }
        TagCommands::Overview => {
            let groups = catalog.tag_overview()?;
            if output.is_json() {
                output.data(&groups);
                return Ok(());
            }

            for group in groups.iter().filter(|g| !g.products.is_empty()) {
                let heading = group
                    .tag
                    .as_ref()
                    .map(|t| t.name.as_str())
                    .unwrap_or("Untagged");
                println!("{} ({})", heading, group.products.len());
                for product in &group.products {
                    println!(
                        "  {:<15} {:<30} {}",
                        product.ean,
                        product.name,
                        or_dash(product.shelf.as_deref())
                    );
                }
            }
        }
    }

    Ok(())
}
