//! Command-line argument definitions for the Philly CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the input file, the pipeline stage to
//! stop at, configuration file selection, and logging verbosity.

use clap::{Parser, ValueEnum};

/// Pipeline stage whose result is printed instead of JavaScript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Stage {
    /// Echo the source text
    Print,
    /// Print the token stream
    Lex,
    /// Print the leaf sequence
    Parse,
}

/// Command-line arguments for the PhillyScript transpiler
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input PhillyScript file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Stop after this stage and print its result
    #[arg(value_enum)]
    pub stage: Option<Stage>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Check bracket balance and condition continuations
    #[arg(long)]
    pub strict: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::try_parse_from(["philly", "main.philly"]).unwrap();

        assert_eq!(args.input, "main.philly");
        assert_eq!(args.stage, None);
        assert_eq!(args.config, None);
        assert!(!args.strict);
        assert_eq!(args.log_level, "warn");
    }

    #[test]
    fn test_stage_and_flags() {
        let args = Args::try_parse_from([
            "philly",
            "main.philly",
            "lex",
            "--strict",
            "-c",
            "philly.toml",
            "--log-level",
            "debug",
        ])
        .unwrap();

        assert_eq!(args.stage, Some(Stage::Lex));
        assert!(args.strict);
        assert_eq!(args.config.as_deref(), Some("philly.toml"));
        assert_eq!(args.log_level, "debug");
    }

    #[test]
    fn test_unknown_stage_is_rejected() {
        assert!(Args::try_parse_from(["philly", "main.philly", "run"]).is_err());
    }
}
