//! Handling of scanner input, one command at a time
//!
//! The scanner produces lines. Each line becomes a [`ScanCommand`]: a
//! reserved sort code triggers a shelf sort, anything else is a product to
//! add. [`ScanPipeline::handle`] runs a command to completion and reports
//! what happened; failures are alerted, never propagated, so a long-running
//! loop survives a bad scan.

use serde::Serialize;
use tracing::{error, info, warn};

use super::merger::ProductMerger;
use super::resolve::{NameLookup, ProductCatalog, Resolution, ScanResolver};
use super::sorter::ShelfSorter;
use crate::domain::{ListId, PositionPolicy, ScanCode};
use crate::remote::{AlertSink, TaskListApi, WriteOutcome};

/// One unit of work from the scanner
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanCommand {
    Merge(ScanCode),
    Sort(ListId),
}

impl ScanCommand {
    /// Classifies a raw input line; blank and malformed lines yield `None`
    pub fn from_line(line: &str, sort_code: Option<&str>, sort_list: ListId) -> Option<Self> {
        let code: ScanCode = line.parse().ok()?;
        if sort_code == Some(code.as_str()) {
            Some(ScanCommand::Sort(sort_list))
        } else {
            Some(ScanCommand::Merge(code))
        }
    }
}

/// What handling a command amounted to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ScanReport {
    /// Product resolved and the list write was accepted
    Added { code: String, name: String },

    /// Product resolved but the list write was rejected
    Rejected {
        code: String,
        name: String,
        payload: serde_json::Value,
    },

    /// No name could be found for the code
    Unknown { code: String },

    Sorted { list: ListId, payload: serde_json::Value },

    SortRejected { list: ListId, payload: serde_json::Value },

    /// A read or storage error aborted the command
    Failed { message: String },
}

impl ScanReport {
    pub fn is_success(&self) -> bool {
        matches!(self, ScanReport::Added { .. } | ScanReport::Sorted { .. })
    }
}

/// The scan pipeline with its collaborators wired in
pub struct ScanPipeline<'a> {
    pub api: &'a dyn TaskListApi,
    pub catalog: &'a dyn ProductCatalog,
    pub names: &'a dyn NameLookup,
    pub alerts: &'a dyn AlertSink,
    pub default_list: ListId,
    pub policy: PositionPolicy,
}

impl ScanPipeline<'_> {
    pub fn handle(&self, command: &ScanCommand) -> ScanReport {
        match command {
            ScanCommand::Merge(code) => self.add(code),
            ScanCommand::Sort(list) => self.sort(*list),
        }
    }

    fn add(&self, code: &ScanCode) -> ScanReport {
        let resolver = ScanResolver::new(self.catalog, self.names, self.default_list);
        let entry = match resolver.resolve(code) {
            Ok(Resolution::Known(entry)) | Ok(Resolution::Discovered(entry)) => entry,
            Ok(Resolution::Unknown) => {
                warn!(%code, "Lookup failed");
                self.alerts.notify(
                    "Failed to lookup EAN",
                    &format!("{}; Can you tell me what it is?", code),
                );
                return ScanReport::Unknown {
                    code: code.to_string(),
                };
            }
            Err(e) => return self.fail(&format!("Catalog lookup for {} failed", code), &e),
        };

        let merger = ProductMerger::new(self.api);
        match merger.merge(code, &entry.name, entry.list, entry.shelf.as_deref()) {
            Ok(WriteOutcome { success: true, .. }) => {
                info!(%code, name = %entry.name, "Task add ok");
                ScanReport::Added {
                    code: code.to_string(),
                    name: entry.name,
                }
            }
            Ok(WriteOutcome { payload, .. }) => {
                warn!(%code, name = %entry.name, %payload, "Task add rejected");
                self.alerts.notify(
                    "Failed to save to the list",
                    &format!("{}\n{}", entry.name, payload),
                );
                ScanReport::Rejected {
                    code: code.to_string(),
                    name: entry.name,
                    payload,
                }
            }
            Err(e) => self.fail(&format!("Adding {} failed", entry.name), &e),
        }
    }

    fn sort(&self, list: ListId) -> ScanReport {
        let sorter = ShelfSorter::new(self.api, self.policy);
        match sorter.sort(list) {
            Ok(WriteOutcome { success: true, payload }) => ScanReport::Sorted { list, payload },
            Ok(WriteOutcome { payload, .. }) => {
                warn!(%list, %payload, "Sort rejected");
                self.alerts
                    .notify("Failed to sort list", &format!("List {}\n{}", list, payload));
                ScanReport::SortRejected { list, payload }
            }
            Err(e) => self.fail(&format!("Sorting list {} failed", list), &e),
        }
    }

    fn fail(&self, what: &str, err: &dyn std::fmt::Display) -> ScanReport {
        let message = format!("{}: {}", what, err);
        error!("{}", message);
        self.alerts.notify(what, &err.to_string());
        ScanReport::Failed { message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Product, RemoteComment, RemoteTask, TaskId, TaskPositions};
    use crate::pipeline::resolve::NoLookup;
    use crate::remote::fake::{Call, FakeList};
    use anyhow::Result;
    use std::cell::RefCell;

    #[derive(Default)]
    struct OneProduct(Option<Product>);

    impl ProductCatalog for OneProduct {
        fn find(&self, code: &ScanCode) -> Result<Option<Product>> {
            Ok(self.0.clone().filter(|p| &p.ean == code))
        }

        fn insert(&self, _code: &ScanCode, _name: &str, _list: ListId) -> Result<()> {
            Ok(())
        }
    }

    struct BrokenCatalog;

    impl ProductCatalog for BrokenCatalog {
        fn find(&self, _code: &ScanCode) -> Result<Option<Product>> {
            anyhow::bail!("database is locked")
        }

        fn insert(&self, _code: &ScanCode, _name: &str, _list: ListId) -> Result<()> {
            anyhow::bail!("database is locked")
        }
    }

    #[derive(Default)]
    struct CollectedAlerts(RefCell<Vec<(String, String)>>);

    impl AlertSink for CollectedAlerts {
        fn notify(&self, title: &str, body: &str) {
            self.0.borrow_mut().push((title.to_string(), body.to_string()));
        }
    }

    fn code(raw: &str) -> ScanCode {
        raw.parse().unwrap()
    }

    fn milk() -> OneProduct {
        let mut product = Product::new(code("4000"), "Milk");
        product.list = Some(ListId(2));
        product.shelf = Some("A1".to_string());
        OneProduct(Some(product))
    }

    fn pipeline<'a>(
        api: &'a FakeList,
        catalog: &'a dyn ProductCatalog,
        alerts: &'a CollectedAlerts,
    ) -> ScanPipeline<'a> {
        ScanPipeline {
            api,
            catalog,
            names: &NoLookup,
            alerts,
            default_list: ListId(1),
            policy: PositionPolicy::Subset,
        }
    }

    #[test]
    fn sort_code_becomes_sort_command() {
        assert_eq!(
            ScanCommand::from_line("0000\n", Some("0000"), ListId(4)),
            Some(ScanCommand::Sort(ListId(4)))
        );
        assert_eq!(
            ScanCommand::from_line("4000", Some("0000"), ListId(4)),
            Some(ScanCommand::Merge(code("4000")))
        );
        assert_eq!(
            ScanCommand::from_line("0000", None, ListId(4)),
            Some(ScanCommand::Merge(code("0000")))
        );
        assert_eq!(ScanCommand::from_line("   ", None, ListId(4)), None);
    }

    #[test]
    fn known_product_is_added_to_its_list() {
        let api = FakeList::default();
        let catalog = milk();
        let alerts = CollectedAlerts::default();

        let report = pipeline(&api, &catalog, &alerts).handle(&ScanCommand::Merge(code("4000")));

        assert!(report.is_success());
        assert_eq!(api.calls()[0], Call::ListTasks(ListId(2)));
        assert_eq!(
            api.writes()[1],
            Call::AddComment {
                task: TaskId(100),
                text: "EAN: 4000, Shelf: A1".to_string()
            }
        );
        assert!(alerts.0.borrow().is_empty());
    }

    #[test]
    fn unknown_product_alerts_and_skips_remote() {
        let api = FakeList::default();
        let catalog = OneProduct::default();
        let alerts = CollectedAlerts::default();

        let report = pipeline(&api, &catalog, &alerts).handle(&ScanCommand::Merge(code("999")));

        assert_eq!(report, ScanReport::Unknown { code: "999".to_string() });
        assert!(api.calls().is_empty());
        assert_eq!(
            alerts.0.borrow()[0],
            (
                "Failed to lookup EAN".to_string(),
                "999; Can you tell me what it is?".to_string()
            )
        );
    }

    #[test]
    fn rejected_write_alerts_with_payload() {
        let api = FakeList {
            tasks: vec![RemoteTask {
                id: TaskId(1),
                title: "Milk".to_string(),
                revision: 5,
                list_id: None,
            }],
            accept_rename: false,
            ..Default::default()
        };
        let catalog = milk();
        let alerts = CollectedAlerts::default();

        let report = pipeline(&api, &catalog, &alerts).handle(&ScanCommand::Merge(code("4000")));

        assert!(matches!(report, ScanReport::Rejected { .. }));
        let alerts = alerts.0.borrow();
        assert_eq!(alerts[0].0, "Failed to save to the list");
        assert!(alerts[0].1.starts_with("Milk\n"));
        assert!(alerts[0].1.contains("rejected"));
    }

    #[test]
    fn remote_read_error_is_reported_not_raised() {
        let api = FakeList {
            read_failure: Some(500),
            ..Default::default()
        };
        let catalog = milk();
        let alerts = CollectedAlerts::default();

        let report = pipeline(&api, &catalog, &alerts).handle(&ScanCommand::Merge(code("4000")));

        match report {
            ScanReport::Failed { message } => assert!(message.contains("500")),
            other => panic!("expected failure, got {:?}", other),
        }
        assert!(api.writes().is_empty());
        assert_eq!(alerts.0.borrow().len(), 1);
    }

    #[test]
    fn catalog_error_is_reported() {
        let api = FakeList::default();
        let alerts = CollectedAlerts::default();

        let report =
            pipeline(&api, &BrokenCatalog, &alerts).handle(&ScanCommand::Merge(code("4000")));

        assert!(matches!(report, ScanReport::Failed { .. }));
        assert!(api.calls().is_empty());
    }

    #[test]
    fn sort_command_sorts_list() {
        let api = FakeList {
            comments: vec![
                RemoteComment {
                    task_id: TaskId(1),
                    text: "Shelf: B".to_string(),
                },
                RemoteComment {
                    task_id: TaskId(2),
                    text: "Shelf: A".to_string(),
                },
            ],
            positions: vec![TaskPositions {
                revision: 3,
                values: vec![TaskId(1), TaskId(2)],
            }],
            ..Default::default()
        };
        let catalog = OneProduct::default();
        let alerts = CollectedAlerts::default();

        let report = pipeline(&api, &catalog, &alerts).handle(&ScanCommand::Sort(ListId(8)));

        assert!(report.is_success());
        assert_eq!(
            api.writes(),
            vec![Call::ApplyPositions {
                list: ListId(8),
                revision: 3,
                ordered: vec![TaskId(2), TaskId(1)]
            }]
        );
    }
}
