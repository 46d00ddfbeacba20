//! # Urbrain Architecture
//!
//! Urbrain keeps folders, notes and a strip of tabs over them. The library
//! owns all state and every rule; a UI only sends [`commands::Command`]s in
//! and renders [`view::View`]s out. The bundled binary is one such UI.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prompts, prints                        │
//! │  - The ONLY place that knows about stdout/stdin/exit codes  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Owns the workspace, the gateway and the renderer         │
//! │  - Dispatch, then persist, then render                      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - One transition function per command                      │
//! │  - Validates first, mutates second, reports effects         │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  State (entities.rs, hierarchy.rs, tabs.rs)                 │
//! │  - Folder/note collections, tree queries, tab state machine │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - BlobStore trait: FileStore, InMemoryStore                │
//! │  - Gateway: three JSON namespaces under a key prefix        │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O in the Core
//!
//! From `api.rs` inward nothing writes to stdout or reads stdin. Output goes
//! through [`view::ViewRenderer`] and `CmdResult` messages; diagnostics go
//! through `tracing`, which the binary routes to stderr.
//!
//! ## Tabs are Session State
//!
//! Folders, notes and sticky notes are persisted. Tabs are not: every
//! [`api::UrbrainApi::open`] starts with a single Home tab.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for all operations
//! - [`commands`]: Transition functions and the `Command` enum
//! - [`entities`]: Folder and note collections, cascade delete, integrity
//! - [`hierarchy`]: Read-only tree queries over the folder collection
//! - [`tabs`]: The tab strip state machine
//! - [`view`]: View model and the renderer contract
//! - [`store`]: Key-value storage and the persistence gateway
//! - [`model`]: `Folder`, `Note` and their ids
//! - [`config`]: Configuration file
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod entities;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod store;
pub mod tabs;
pub mod view;
pub mod workspace;
