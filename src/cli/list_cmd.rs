//! Shopping list commands
//!
//! Lists mirror remote list ids locally so products can name them.

use anyhow::Result;
use clap::Subcommand;

use super::output::{or_dash, Output};
use crate::domain::ListId;
use crate::storage::Home;

#[derive(Subcommand)]
pub enum ListCommands {
    /// Register a remote list under a name
    Add {
        /// Remote list id
        id: ListId,

        name: String,
    },

    /// Rename a list
    Rename { id: ListId, name: String },

    /// Remove a list; its products lose their list
    Remove { id: ListId },

    /// Show all lists
    All,
}

pub fn run(cmd: ListCommands, output: &Output, home: &Home) -> Result<()> {
    let catalog = home.catalog()?;

    match cmd {
        ListCommands::Add { id, name } => {
            catalog.add_list(id, &name)?;
            output.success(&format!("Added list: {} - {}", id, name));
        }
        ListCommands::Rename { id, name } => {
            catalog.rename_list(id, &name)?;
            output.success(&format!("Renamed list {} to {}", id, name));
        }
        ListCommands::Remove { id } => {
            catalog.remove_list(id)?;
            output.success(&format!("Removed list: {}", id));
        }
        ListCommands::All => {
            let lists = catalog.lists()?;
            let default_list = home.config().home.remote.default_list;

            if output.is_json() {
                output.data(&lists);
            } else if lists.is_empty() {
                println!("No lists registered.");
            } else {
                for list in &lists {
                    let marker = if Some(list.id) == default_list { "*" } else { "" };
                    output.row(&[
                        format!("{}{}", list.id, marker).as_str(),
                        or_dash(list.name.as_deref()).as_str(),
                    ]);
                }
            }
        }
    }

    Ok(())
}
