use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::analysis::{entropy, sniff};
use crate::cli::Output;

#[derive(Args)]
pub struct EntropyArgs {
    /// File to sample
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Number of bytes to sample from the start of the file
    #[arg(long, default_value_t = entropy::ENTROPY_SAMPLE_LEN)]
    pub length: usize,
}

pub fn execute(args: EntropyArgs, output: &Output) -> Result<()> {
    let shannon = entropy::entropy(&args.path, args.length)?;
    let sample = sniff::read_prefix(&args.path, args.length)?;
    let ratio = entropy::gzip_entropy(&sample);

    output.header(&format!("Entropy of {}", args.path.display()));
    output.key_value("Sample size:", &format!("{} bytes", sample.len()), false);
    output.key_value("Shannon entropy:", &format!("{shannon:.4} bits/symbol"), true);
    output.key_value("Compression ratio:", &format!("{ratio:.4}"), true);
    output.key_value("Reading:", interpret(shannon, ratio), false);

    Ok(())
}

/// Rough band interpretation of the two signals together.
fn interpret(shannon: f64, ratio: f64) -> &'static str {
    if shannon > 7.0 || ratio > 0.95 {
        "high entropy - likely compressed, encrypted or binary"
    } else if shannon > 4.0 {
        "medium entropy - typical of natural-language text"
    } else {
        "low entropy - highly redundant content"
    }
}
