//! Configuration types for the Philly transpiler.
//!
//! All types implement [`serde::Deserialize`] so they can be loaded from a
//! TOML file:
//!
//! ```toml
//! [parser]
//! strict = true
//!
//! [output]
//! final_newline = true
//! ```
//!
//! # Example
//!
//! ```
//! # use philly::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(!config.parser().strict());
//! assert!(!config.output().final_newline());
//! ```

use serde::Deserialize;

/// Top-level application configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Parser configuration section.
    #[serde(default)]
    parser: ParserConfig,

    /// Output configuration section.
    #[serde(default)]
    output: OutputConfig,
}

impl AppConfig {
    /// Returns the parser configuration.
    pub fn parser(&self) -> ParserConfig {
        self.parser
    }

    /// Returns the output configuration.
    pub fn output(&self) -> OutputConfig {
        self.output
    }

    /// Returns a copy with strict structural validation switched on or off.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.parser.strict = strict;
        self
    }
}

/// Front-end settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct ParserConfig {
    /// Check bracket balance and condition continuations after parsing.
    #[serde(default)]
    strict: bool,
}

impl ParserConfig {
    pub fn strict(&self) -> bool {
        self.strict
    }
}

/// Generated text settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct OutputConfig {
    /// Append `\n` when the generated text does not already end with one.
    #[serde(default)]
    final_newline: bool,
}

impl OutputConfig {
    pub fn final_newline(&self) -> bool {
        self.final_newline
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_full_config() {
        let config: AppConfig = toml::from_str(
            r#"
            [parser]
            strict = true

            [output]
            final_newline = true
            "#,
        )
        .unwrap();

        assert!(config.parser().strict());
        assert!(config.output().final_newline());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: AppConfig = toml::from_str("[output]\nfinal_newline = true\n").unwrap();

        assert_eq!(config.parser(), ParserConfig::default());
        assert!(config.output().final_newline());

        let empty: AppConfig = toml::from_str("").unwrap();
        assert_eq!(empty, AppConfig::default());
    }

    #[test]
    fn test_with_strict_overrides_parser_section() {
        let config = AppConfig::default().with_strict(true);
        assert!(config.parser().strict());
        assert!(!config.output().final_newline());
    }
}
