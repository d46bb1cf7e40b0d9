use anyhow::Result;

use crate::cli::{ConfigCommands, Output};
use crate::config::SniffConfig;

pub fn execute(cmd: ConfigCommands, config_path: Option<&str>, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => {
            let config = SniffConfig::load_with_custom_config(config_path)?;
            let full = config.get_full_config()?;
            println!("{}", serde_json::to_string_pretty(&full)?);
            Ok(())
        }
        ConfigCommands::Validate => {
            let config = SniffConfig::load_with_custom_config(config_path)?;
            // extracting the classifier keys proves the merged shape
            config.get_usize("classifier.sample_bytes")?;
            config.get_f64("classifier.entropy_cutoff")?;
            config.get_usize("classifier.long_line_cutoff")?;
            output.success("Configuration is valid");
            Ok(())
        }
    }
}
