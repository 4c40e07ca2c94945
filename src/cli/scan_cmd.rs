//! Foreground scan loop
//!
//! A reader thread turns scanner lines into [`ScanCommand`]s and sends them
//! over a channel; the main thread handles them one at a time, in order.
//! The loop ends when the input does.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::thread;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use super::output::Output;
use super::remote_cmd::{alert_sink, connect};
use crate::domain::ListId;
use crate::pipeline::{NoLookup, ScanCommand, ScanPipeline, ScanReport};
use crate::storage::Home;

/// Counts of what a scan session did
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ScanSummary {
    pub handled: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl ScanSummary {
    fn record(&mut self, report: &ScanReport) {
        self.handled += 1;
        if report.is_success() {
            self.succeeded += 1;
        } else {
            self.failed += 1;
        }
    }
}

pub fn run(output: &Output, home: &Home, input: Option<PathBuf>) -> Result<()> {
    let config = &home.config().home;
    let default_list = config.remote.require_default_list()?;
    let sort_code = config.scanner.sort_code.clone();
    let sort_list = match sort_code {
        Some(_) => config.sort_list()?,
        None => default_list,
    };

    let client = connect(home)?;
    let catalog = home.catalog()?;
    let alerts = alert_sink(&config.alerts);
    let names = NoLookup;

    let pipeline = ScanPipeline {
        api: &client,
        catalog: &catalog,
        names: &names,
        alerts: alerts.as_ref(),
        default_list,
        policy: config.remote.positions,
    };

    let reader = open_input(input.as_deref())?;
    let (tx, rx) = mpsc::channel();
    let source = input
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stdin".to_string());

    let handle = thread::spawn(move || read_commands(reader, sort_code.as_deref(), sort_list, &tx));

    info!(%default_list, %source, "Scanner ready");
    output.verbose_ctx("scan", &format!("Reading codes from {}", source));

    let mut summary = ScanSummary::default();
    for command in rx {
        let report = pipeline.handle(&command);
        summary.record(&report);
        print_report(output, &report);
    }

    handle
        .join()
        .map_err(|_| anyhow::anyhow!("Scanner reader thread panicked"))?
        .context("Failed to read scanner input")?;

    info!(
        handled = summary.handled,
        failed = summary.failed,
        "Scanner input closed"
    );

    if output.is_json() {
        output.data(&summary);
    } else {
        output.success(&format!(
            "Handled {} scan(s): {} ok, {} failed",
            summary.handled, summary.succeeded, summary.failed
        ));
    }

    Ok(())
}

fn open_input(input: Option<&Path>) -> Result<Box<dyn BufRead + Send>> {
    match input {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("Failed to open scanner input: {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(BufReader::new(io::stdin()))),
    }
}

/// Reads lines until EOF or until the receiving side hangs up
///
/// Lines that are not UTF-8 are skipped like any other unreadable scan.
fn read_commands(
    mut reader: impl BufRead,
    sort_code: Option<&str>,
    sort_list: ListId,
    tx: &Sender<ScanCommand>,
) -> io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }

        let line = match std::str::from_utf8(&buf) {
            Ok(line) => line,
            Err(_) => {
                warn!(bytes = buf.len(), "Ignoring scan that is not UTF-8");
                continue;
            }
        };

        match ScanCommand::from_line(line, sort_code, sort_list) {
            Some(command) => {
                if tx.send(command).is_err() {
                    return Ok(());
                }
            }
            None if line.trim().is_empty() => {}
            None => warn!(line = %line.trim(), "Ignoring unreadable scan"),
        }
    }
}

fn print_report(output: &Output, report: &ScanReport) {
    if output.is_json() {
        output.data(report);
        return;
    }

    match report {
        ScanReport::Added { code, name } => println!("+ {} ({})", name, code),
        ScanReport::Rejected { code, name, .. } => println!("! {} ({}) rejected by the list", name, code),
        ScanReport::Unknown { code } => println!("? {} is not in the catalog", code),
        ScanReport::Sorted { list, .. } => println!("= sorted list {}", list),
        ScanReport::SortRejected { list, .. } => println!("! list {} rejected the new order", list),
        ScanReport::Failed { message } => println!("! {}", message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ScanCode;
    use std::io::Cursor;

    fn collect(input: &str, sort_code: Option<&str>) -> Vec<ScanCommand> {
        collect_bytes(input.as_bytes(), sort_code)
    }

    fn collect_bytes(input: &[u8], sort_code: Option<&str>) -> Vec<ScanCommand> {
        let (tx, rx) = mpsc::channel();
        read_commands(Cursor::new(input.to_vec()), sort_code, ListId(9), &tx).unwrap();
        drop(tx);
        rx.into_iter().collect()
    }

    fn merge(code: &str) -> ScanCommand {
        ScanCommand::Merge(code.parse::<ScanCode>().unwrap())
    }

    #[test]
    fn lines_become_commands_in_order() {
        let commands = collect("111\n222\r\n111\n", None);
        assert_eq!(commands, vec![merge("111"), merge("222"), merge("111")]);
    }

    #[test]
    fn blank_and_malformed_lines_are_skipped() {
        let commands = collect("\n  \n12 34\n555\n", None);
        assert_eq!(commands, vec![merge("555")]);
    }

    #[test]
    fn non_utf8_line_does_not_end_the_session() {
        let commands = collect_bytes(b"111\n\xff\xfe\n222\n", None);
        assert_eq!(commands, vec![merge("111"), merge("222")]);
    }

    #[test]
    fn last_line_without_newline_is_read() {
        let commands = collect("111\n222", None);
        assert_eq!(commands, vec![merge("111"), merge("222")]);
    }

    #[test]
    fn sort_code_triggers_sort() {
        let commands = collect("111\n000\n", Some("000"));
        assert_eq!(commands, vec![merge("111"), ScanCommand::Sort(ListId(9))]);
    }

    #[test]
    fn reader_stops_when_receiver_is_gone() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        let result = read_commands(Cursor::new("111\n222\n".to_string()), None, ListId(1), &tx);
        assert!(result.is_ok());
    }

    #[test]
    fn summary_counts_outcomes() {
        let mut summary = ScanSummary::default();
        summary.record(&ScanReport::Added {
            code: "1".to_string(),
            name: "Milk".to_string(),
        });
        summary.record(&ScanReport::Unknown {
            code: "2".to_string(),
        });

        assert_eq!(
            summary,
            ScanSummary {
                handled: 2,
                succeeded: 1,
                failed: 1
            }
        );
    }
}
