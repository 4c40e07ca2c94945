//! # Command-Line Interface
//!
//! User-facing CLI commands and output formatting.
//!
//! ## Command Groups
//!
//! | Group | Purpose | Examples |
//! |-------|---------|----------|
//! | Core | Home setup | `init` |
//! | Catalog | Local product data | `product add`, `list all`, `tag overview` |
//! | Remote | One-off list operations | `remote add`, `remote tasks`, `remote sort` |
//! | Scanner | Long-running scan loop | `scan`, `scan --input /dev/hidraw0` |
//!
//! ## Output Formats
//!
//! All commands support `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output and debug-level logs:
//! ```bash
//! shelfscan --verbose remote sort
//! ```
//! `RUST_LOG` overrides the log level either way.
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod list_cmd;
mod output;
mod product_cmd;
mod remote_cmd;
mod scan_cmd;
mod tag_cmd;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
pub use scan_cmd::ScanSummary;
