use std::path::Path;

use serde::{Deserialize, Serialize};

/// Per-project driver defaults, loaded from a `minic.toml` next to the
/// analyzed source. Command-line flags are OR-ed on top.
#[derive(Debug, Default)]
pub struct Config {
    pub show_tokens: bool,
    pub show_globals: bool,
    pub show_functions: bool,
}

impl From<RawConfig> for Config {
    fn from(raw_config: RawConfig) -> Self {
        Self {
            show_tokens: raw_config.show_tokens.unwrap_or(false),
            show_globals: raw_config.show_globals.unwrap_or(false),
            show_functions: raw_config.show_functions.unwrap_or(false),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct RawConfig {
    show_tokens: Option<bool>,
    show_globals: Option<bool>,
    show_functions: Option<bool>,
}

fn load_project_config<P: AsRef<Path>>(root_dir: P) -> Option<Config> {
    let config_path = root_dir.as_ref().join("minic.toml");
    if !config_path.exists() {
        return None;
    };

    let config = std::fs::read_to_string(config_path).ok()?;

    convert_from_toml(&config)
}

fn convert_from_toml(config: &str) -> Option<Config> {
    let raw_config: RawConfig = toml::from_str(config).ok()?;
    Some(raw_config.into())
}

pub fn load_config<P: AsRef<Path>>(root_dir: Option<P>) -> Config {
    match root_dir {
        Some(root_dir) => load_project_config(root_dir).unwrap_or_default(),
        None => Config::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config = convert_from_toml("show_tokens = true").unwrap();

        assert!(config.show_tokens);
        assert!(!config.show_globals);
        assert!(!config.show_functions);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        assert!(convert_from_toml("show_tokens = \"yes\"").is_none());
    }
}
