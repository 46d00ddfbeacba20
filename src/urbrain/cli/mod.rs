//! # CLI Layer
//!
//! One possible UI for urbrain. This is the only place that:
//! - parses arguments
//! - reads stdin (confirmations and the `session` loop)
//! - prints to stdout
//! - installs the tracing subscriber
//!
//! ## Structure
//!
//! - `setup`: clap definitions
//! - `commands`: `run()`, context setup and the per-command handlers
//! - `render`: `TerminalRenderer` and the text formatting behind it
//!
//! One-shot commands work on folders and notes. Tabs only exist for the life
//! of a process, so the tab strip is driven through `urbrain session`.

mod commands;
mod render;
mod setup;

pub use commands::run;
