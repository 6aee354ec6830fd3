//! Runtime configuration

use serde::{Deserialize, Serialize};

/// Compositor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Terminal program spawned into new windows
    pub term: String,

    /// Wrapper that confines the terminal to its window
    pub cage: String,

    /// Per-output position and mode overrides
    pub outputs: Vec<OutputConfig>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            term: "alacritty".into(),
            cage: "cage -d".into(),
            outputs: Vec::new(),
        }
    }
}

/// Position and mode override for one named output
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub name: String,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub scale: Option<i32>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            x: None,
            y: None,
            width: None,
            height: None,
            scale: None,
        }
    }
}

impl OutputConfig {
    /// Layout position, if both coordinates were given.
    pub fn position(&self) -> Option<(i32, i32)> {
        Some((self.x?, self.y?))
    }

    /// Forced mode, if both dimensions were given.
    pub fn mode(&self) -> Option<(i32, i32)> {
        Some((self.width?, self.height?))
    }
}

impl Config {
    /// Load configuration from file, falling back to defaults
    pub fn load() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("wayrio/config.toml")),
            Some(std::path::PathBuf::from("/etc/wayrio/config.toml")),
        ];

        for path in config_paths.into_iter().flatten() {
            if path.exists() {
                match std::fs::read_to_string(&path) {
                    Ok(content) => match toml::from_str::<Config>(&content) {
                        Ok(config) => {
                            tracing::info!(?path, term = %config.term, "loaded configuration");
                            return config;
                        }
                        Err(e) => {
                            tracing::warn!(?path, error = %e, "failed to parse config");
                        }
                    },
                    Err(e) => {
                        tracing::warn!(?path, error = %e, "failed to read config");
                    }
                }
            }
        }

        tracing::info!("using default configuration");
        Self::default()
    }

    /// The override block for a named output, if present.
    pub fn output(&self, name: &str) -> Option<&OutputConfig> {
        self.outputs.iter().find(|o| o.name == name)
    }

    /// Shell command line for populating a new window.
    pub fn new_window_command(&self) -> String {
        format!("{} -- {}", self.cage, self.term)
    }
}

/// Helper for getting XDG directories
mod dirs {
    use std::path::PathBuf;

    pub fn config_dir() -> Option<PathBuf> {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_command_wraps_term_in_cage() {
        let config = Config::default();
        assert_eq!(config.new_window_command(), "cage -d -- alacritty");
    }

    #[test]
    fn parses_output_overrides() {
        let config: Config = toml::from_str(
            r#"
            term = "foot"

            [[outputs]]
            name = "DP-1"
            x = 0
            y = 0
            width = 2560
            height = 1440

            [[outputs]]
            name = "HDMI-A-1"
            x = 2560
            y = 0
            "#,
        )
        .expect("valid toml");

        assert_eq!(config.term, "foot");
        // cage falls back to the default
        assert_eq!(config.cage, "cage -d");

        let dp1 = config.output("DP-1").expect("DP-1 configured");
        assert_eq!(dp1.position(), Some((0, 0)));
        assert_eq!(dp1.mode(), Some((2560, 1440)));

        let hdmi = config.output("HDMI-A-1").expect("HDMI-A-1 configured");
        assert_eq!(hdmi.position(), Some((2560, 0)));
        assert_eq!(hdmi.mode(), None);

        assert!(config.output("eDP-1").is_none());
    }

    #[test]
    fn partial_position_is_ignored() {
        let config: Config = toml::from_str(
            r#"
            [[outputs]]
            name = "DP-1"
            x = 100
            "#,
        )
        .expect("valid toml");
        assert_eq!(config.output("DP-1").expect("configured").position(), None);
    }
}
