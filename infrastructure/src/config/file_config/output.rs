//! `[output]`: how answers and progress reach the terminal

use gnsearch_domain::OutputFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileOutputConfig {
    /// Answer rendering when `--output` is not given
    pub format: Option<OutputFormat>,
    pub color: bool,
    /// Spinners and step lines on stderr
    pub progress: bool,
}

impl Default for FileOutputConfig {
    fn default() -> Self {
        Self {
            format: None,
            color: true,
            progress: true,
        }
    }
}

impl FileOutputConfig {
    /// A format named on the command line wins over the file.
    pub fn resolve_format(&self, requested: Option<OutputFormat>) -> OutputFormat {
        requested.or(self.format).unwrap_or_default()
    }

    /// Colors only ever reach a terminal.
    pub fn use_color(&self, stdout_is_terminal: bool) -> bool {
        self.color && stdout_is_terminal
    }

    pub fn wants_progress(&self, quiet: bool) -> bool {
        self.progress && !quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_format_wins() {
        let config: FileOutputConfig = toml::from_str(r#"format = "json""#).unwrap();
        assert_eq!(config.resolve_format(None), OutputFormat::Json);
        assert_eq!(config.resolve_format(Some(OutputFormat::Text)), OutputFormat::Text);
        assert_eq!(FileOutputConfig::default().resolve_format(None), OutputFormat::Text);
    }

    #[test]
    fn test_color_needs_a_terminal() {
        let config = FileOutputConfig::default();
        assert!(config.use_color(true));
        assert!(!config.use_color(false));
        let config: FileOutputConfig = toml::from_str("color = false").unwrap();
        assert!(!config.use_color(true));
    }

    #[test]
    fn test_quiet_or_disabled_progress() {
        let config = FileOutputConfig::default();
        assert!(config.wants_progress(false));
        assert!(!config.wants_progress(true));
        let config: FileOutputConfig = toml::from_str("progress = false").unwrap();
        assert!(!config.wants_progress(false));
    }
}
