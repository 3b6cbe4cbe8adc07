//! # muse-core
//!
//! Core types for the muse content-safety pipeline.
//!
//! This crate provides:
//! - Error taxonomy shared by every subsystem
//! - Centralized default constants
//! - Structured logging field schema
//! - Typed record model and per-kind extraction from raw catalog JSON
//! - The local keyword pre-filter (allow-list / deny-list, no I/O)
//!
//! The async moderation pipeline itself (remote clients, cache, retry,
//! orchestrator) lives in `muse-safety`.

pub mod defaults;
pub mod error;
pub mod keyword;
pub mod logging;
pub mod records;

pub use error::{Error, Result};
pub use keyword::{classify, normalize, Verdict};
pub use records::{CandidateRecord, FilteredItem, RecordKind};
