//! # Arbor Architecture
//!
//! Arbor is a **UI-agnostic outliner engine**: a tree of short text nodes with
//! structural editing, level-based navigation, snapshot undo/redo and search.
//! It is a library that happens to have a CLI client, not the other way round.
//! A desktop shell, a web view or the bundled `arbor` binary all drive the same
//! [`document::Document`].
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prints outlines, sets exit codes       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Opens/saves documents through a DocumentStore            │
//! │  - Turns node ids into focus moves plus a command           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Document + Command Layer (document.rs, commands/*.rs)      │
//! │  - Focus, selection, clipboard, history, edit session       │
//! │  - Every mutation: validate, apply or ignore, snapshot      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Tree Store (tree.rs, model.rs) + format.rs / store/        │
//! │  - Owned node tree, id counter, JSON codec, storage backends│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O Assumptions in Core
//!
//! From `api.rs` inward, code takes Rust values and returns Rust values. It
//! never prints and never exits. Diagnostics go out as `tracing` events; the
//! binary decides where they end up.
//!
//! Mutations with unmet preconditions are not errors: they come back as
//! [`commands::Outcome::Ignored`] and leave the document untouched. `Result`
//! is reserved for I/O, malformed documents and unknown ids passed in by a host.
//!
//! ## Testing Strategy
//!
//! 1. **Commands** (`commands/*.rs`): the bulk of the tests, on small fixture trees.
//! 2. **Document/History/Search/Format**: unit tests next to the code.
//! 3. **API** (`api.rs`): dispatch tests over `InMemoryStore`.
//! 4. **Integration** (`tests/`): engine properties through the public API, and
//!    the binary driven end to end.
//!
//! ## Module Overview
//!
//! - [`api`]: the facade hosts call
//! - [`document`]: one open outline and its session state
//! - [`commands`]: the mutation and cursor operations
//! - [`tree`] / [`model`]: the Tree Store and node types
//! - [`navigation`]: level model, same-level and sibling neighbours, breadcrumbs
//! - [`history`]: snapshot undo/redo
//! - [`search`]: substring search over visible order
//! - [`format`]: JSON persistence with load-time validation
//! - [`store`]: storage abstraction and implementations
//! - [`export`]: Markdown, plain text and tab outlines
//! - [`config`] / [`init`]: configuration and where it lives
//! - [`clipboard`]: system clipboard support
//! - [`error`]: error types
//! - `cli`: argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod clipboard;
pub mod commands;
pub mod config;
pub mod document;
pub mod error;
pub mod export;
pub mod format;
pub mod history;
pub mod init;
pub mod model;
pub mod navigation;
pub mod search;
pub mod store;
pub mod tree;

#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
