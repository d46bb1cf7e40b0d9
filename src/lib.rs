//! # typesniff - content-type classification for filesystem entries
//!
//! typesniff classifies a filesystem entry (regular file, directory,
//! symlink, FIFO, device, socket) into a rich content-type descriptor:
//! MIME type, human-readable filetype string, binary/text/source/
//! script/archive/media facets, and a detected programming language for
//! source code. It is built as a pre-filter for scanning tools that
//! need to decide how to process a file before opening it.
//!
//! ## Quick Start
//!
//! ```no_run
//! let record = typesniff::classifier::classify("/usr/lib/libc.so.6");
//! assert!(record.is_binary);
//! assert!(record.is_elf);
//! ```
//!
//! The decision engine combines a magic-number probe, an
//! extension-table MIME guess, a lexical-grammar registry and byte
//! heuristics (Shannon entropy, long-line detection, binary sniffing),
//! merged through a documented priority/override policy into a single
//! immutable record, cached per path.

pub mod analysis;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod extract;
pub mod languages;
pub mod probe;

pub use classifier::{ClassificationRecord, Classifier, ClassifierConfig, EntryKind};
pub use config::SniffConfig;

/// Result type alias for typesniff operations
pub type Result<T> = anyhow::Result<T>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");
