pub mod entropy;
pub mod sniff;

// Re-export main functions for easier access
pub use entropy::{entropy, gzip_entropy, shannon_entropy, ENTROPY_SAMPLE_LEN};
pub use sniff::{first_line, looks_binary, max_line_length, read_prefix, shebang_interpreter};
