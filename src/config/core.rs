use anyhow::Result;
use figment::{Figment, providers::{Format, Toml, Json, Yaml, Env}};

// Embed the default config at compile time
const DEFAULT_CONFIG: &str = include_str!("../../default-config.toml");

pub struct SniffConfig {
    figment: Figment,
}

impl SniffConfig {
    pub fn load() -> Result<Self> {
        Self::load_with_custom_config(None)
    }

    pub fn load_with_custom_config(custom_config: Option<&str>) -> Result<Self> {
        let mut figment = Figment::new()
            .merge(Toml::string(DEFAULT_CONFIG));  // Embedded defaults

        // If custom config is specified, use only that + defaults + env vars
        if let Some(custom_path) = custom_config {
            figment = figment
                .merge(Toml::file(custom_path))
                .merge(Json::file(custom_path))
                .merge(Yaml::file(custom_path));
        } else {
            // Standard priority: user config -> repo config
            figment = figment
                .merge(Toml::file(Self::user_config_path()))
                .merge(Toml::file("typesniff.toml"))
                .merge(Json::file("typesniff.json"))
                .merge(Yaml::file("typesniff.yaml"))
                .merge(Yaml::file("typesniff.yml"));
        }

        // Environment variables always have highest priority
        figment = figment.merge(Env::prefixed("TYPESNIFF_"));

        Ok(SniffConfig { figment })
    }

    /// Get the full merged configuration as a structured value
    pub fn get_full_config(&self) -> Result<serde_json::Value> {
        Ok(self.figment.extract()?)
    }

    /// Get a boolean value from config
    pub fn get_bool(&self, path: &str) -> Result<bool> {
        Ok(self.figment.extract_inner(path)?)
    }

    /// Get a string value from config
    pub fn get_string(&self, path: &str) -> Result<String> {
        Ok(self.figment.extract_inner(path)?)
    }

    /// Get a usize value from config
    pub fn get_usize(&self, path: &str) -> Result<usize> {
        Ok(self.figment.extract_inner(path)?)
    }

    /// Get an f64 value from config
    pub fn get_f64(&self, path: &str) -> Result<f64> {
        Ok(self.figment.extract_inner(path)?)
    }

    fn user_config_path() -> String {
        match std::env::var("HOME") {
            Ok(home) => format!("{}/.config/typesniff/config.toml", home),
            Err(_) => "~/.config/typesniff/config.toml".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_loading() {
        let config = SniffConfig::load();
        assert!(config.is_ok(), "Should load default config successfully");
    }

    #[test]
    fn test_config_loads_defaults() {
        let config = SniffConfig::load().expect("Should load default config");

        // Test some default values from our default-config.toml
        assert_eq!(config.get_bool("general.color").unwrap(), true);
        assert_eq!(config.get_usize("classifier.sample_bytes").unwrap(), 16384);
        assert_eq!(config.get_usize("classifier.long_line_cutoff").unwrap(), 1000);
        assert!((config.get_f64("classifier.entropy_cutoff").unwrap() - 7.0).abs() < 1e-9);
        assert_eq!(config.get_usize("scan.threads").unwrap(), 0);
    }

    #[test]
    fn test_config_methods() {
        let config = SniffConfig::load().unwrap();
        assert!(config.get_full_config().is_ok());
        assert!(config.get_string("no.such.key").is_err());
    }

    #[test]
    fn test_custom_config_loading() {
        // Test with non-existent custom config (should fallback to defaults)
        let config = SniffConfig::load_with_custom_config(Some("non_existent.toml"));
        assert!(config.is_ok(), "Should handle missing custom config gracefully");
    }
}
