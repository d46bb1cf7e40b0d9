pub mod core;
pub mod facets;
pub mod record;

// Re-export main types for easier access
pub use self::core::{Classifier, ClassifierConfig, classify, SAMPLE_LEN};
pub use facets::{BINARY_ENTROPY_CUTOFF, LONG_LINE_CUTOFF};
pub use record::{ClassificationRecord, EntryKind, StatInfo};
