//! # Scanned-document data model.
//!
//! This module groups the values produced at the scanner boundary:
//! - [`ScanRecord`], [`Verdict`] — one captured code line with its parsed
//!   fields and validity verdict;
//! - [`SourceEvent`], [`SourceEventKind`] — raw driver events (data read,
//!   device attach/detach, read errors).
//!
//! Records are built once by the document codec and passed by value
//! downstream; nothing in this crate mutates them after creation.

mod record;
mod source;

pub use record::{ScanRecord, Verdict};
pub use source::{SourceEvent, SourceEventKind};
