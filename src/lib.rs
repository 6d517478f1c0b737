//! tasktrackr - local task tracker library
//!
//! This library provides the core of the tasktrackr CLI: a task store that
//! persists every mutation atomically, and a classifier that groups tasks by
//! due date.
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `classify`: Six-bucket due-date classification
//! - `config`: Configuration loading from `.tasktrackr.toml`
//! - `due`: Due date parsing and the `N/A` sentinel
//! - `error`: Error types and result aliases
//! - `lock`: File locking and atomic writes
//! - `output`: Human and JSON output envelopes
//! - `storage`: Tasks file paths and JSON I/O
//! - `task`: Task records and the task store

pub mod classify;
pub mod cli;
pub mod config;
pub mod due;
pub mod error;
pub mod lock;
pub mod output;
pub mod storage;
pub mod task;

pub use error::{Error, Result};
