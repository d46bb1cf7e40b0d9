//! Version command implementation
//!
//! Displays version information about typesniff.

use crate::cli::Output;
use anyhow::Result;

/// Execute the version command
pub fn execute(output: &Output) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    let name = env!("CARGO_PKG_NAME");
    let description = env!("CARGO_PKG_DESCRIPTION");
    let authors = env!("CARGO_PKG_AUTHORS");
    let repository = env!("CARGO_PKG_REPOSITORY");

    output.header("typesniff Version Information");

    output.status_indicator("VERSION", &format!("{} v{}", name, version), true);
    output.blank_line();

    output.category("About");
    output.key_value("Description:", description, false);
    output.key_value("Authors:", authors, false);
    output.key_value("Repository:", repository, false);
    output.blank_line();

    output.category("Build Information");
    output.key_value("Rust edition:", "2024", false);
    output.key_value("Target:", std::env::consts::ARCH, false);
    output.key_value(
        "Profile:",
        if cfg!(debug_assertions) { "debug" } else { "release" },
        false,
    );

    Ok(())
}
