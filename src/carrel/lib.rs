//! # Carrel Architecture
//!
//! Carrel is a **UI-agnostic library-management engine**. This is not a CLI
//! application that happens to have some library code—it's an engine that
//! happens to have a CLI client, and that distinction should guide all
//! development.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (args.rs, wired by main.rs)                      │
//! │  - Parses arguments, formats output, handles terminal I/O   │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine ([`library::Library`] + component modules)          │
//! │  - Pure in-memory state: items, tasks, indices, histories   │
//! │  - Every mutation is one atomic, undoable step              │
//! │  - No I/O assumptions whatsoever                            │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Boundary Layers (store/, import.rs, config.rs)             │
//! │  - Persistence: SnapshotStore trait, FileStore, InMemory    │
//! │  - Import: filesystem walking feeding ordinary add calls    │
//! │  - Talk to the engine only through its public API           │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Principle: No I/O in the Engine
//!
//! From [`library`] inward, code takes regular Rust arguments, returns
//! regular Rust types, never touches the filesystem or the terminal, and
//! never blocks. Persistence happens by value: the engine emits a
//! [`snapshot::LibrarySnapshot`] and rebuilds itself from one. Anything
//! slow or fallible in the outside world (file walking, rendering) lives
//! in the boundary layers and hands finished data in through ordinary
//! engine calls.
//!
//! The engine is single-threaded and does no internal locking; wrap it in
//! a mutex (or keep it on one thread) if you need shared access.
//!
//! ## Module Overview
//!
//! - [`library`]: The engine facade—entry point for all operations
//! - [`model`]: Core data types (`Item`, `Task`, `Category`, `Priority`)
//! - [`memento`]: Undo records, one tagged payload per operation kind
//! - [`index`]: Inverted keyword index and tag frequencies
//! - [`tasks`]: Urgency-ordered task scheduling
//! - [`recent`]: Bounded recently-viewed history
//! - [`snapshot`]: The persistence-facing full-state value
//! - [`store`]: Snapshot persistence (file-backed and in-memory)
//! - [`import`]: Directory import feeding the engine
//! - [`config`]: Configuration management
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod import;
pub mod index;
pub mod library;
pub mod memento;
pub mod model;
pub mod recent;
mod search;
pub mod snapshot;
pub mod store;
pub mod tasks;
