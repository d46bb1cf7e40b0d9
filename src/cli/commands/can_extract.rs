use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::cli::Output;
use crate::extract;

#[derive(Args)]
pub struct CanExtractArgs {
    /// File to check
    #[arg(value_name = "PATH")]
    pub path: PathBuf,
}

pub fn execute(args: CanExtractArgs, output: &Output) -> Result<()> {
    let display = args.path.display().to_string();

    if extract::can_extract(&args.path) {
        output.status_indicator("EXTRACTABLE", &display, true);
    } else {
        output.status_indicator("NOT EXTRACTABLE", &display, false);
        std::process::exit(1);
    }

    Ok(())
}
