//! Philly - a PhillyScript to JavaScript transpiler.
//!
//! Tokenizing, leaf building and JavaScript generation for the PhillyScript
//! language. A run turns one source text into one JavaScript text; the
//! intermediate token stream and leaf sequence are available for inspection.

pub mod config;

mod error;
mod generate;

pub use philly_core::{Leaf, Program, leaf};
pub use philly_parser::tokens;

pub use error::PhillyError;
pub use generate::{Fragment, transpile};

use log::{debug, info, trace};

use philly_parser::{ParseConfig, tokens::PositionedToken};

use config::AppConfig;

/// Builder for running PhillyScript through the transpiler pipeline.
///
/// # Examples
///
/// ```rust
/// use philly::{Transpiler, config::AppConfig};
///
/// let source = "fun main {\n  jawn x := 1\n}";
///
/// // With custom config
/// let config = AppConfig::default().with_strict(true);
/// let transpiler = Transpiler::new(config);
///
/// // Parse source to the leaf sequence
/// let program = transpiler.parse(source)
///     .expect("Failed to parse");
///
/// // Render the leaves as JavaScript
/// let js = transpiler.generate(&program);
/// assert_eq!(js, "function main() {\n  const x = 1\n}");
///
/// // Or use default config
/// let transpiler = Transpiler::default();
/// ```
#[derive(Debug, Default)]
pub struct Transpiler {
    config: AppConfig,
}

impl Transpiler {
    /// Create a new transpiler with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including parser and output settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the active configuration.
    pub fn config(&self) -> AppConfig {
        self.config
    }

    /// Tokenize source code into the flat token stream.
    ///
    /// # Errors
    ///
    /// Returns `PhillyError::Parse` when a character matches no grammar rule.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use philly::{Transpiler, tokens::TokenList};
    ///
    /// let transpiler = Transpiler::default();
    /// let tokens = transpiler.lex("jawn x := 1").expect("Failed to tokenize");
    /// assert_eq!(TokenList(&tokens).to_string(), "[VAR, 'x', '1', EOF]");
    /// ```
    pub fn lex<'src>(
        &self,
        source: &'src str,
    ) -> Result<Vec<PositionedToken<'src>>, PhillyError> {
        info!("Tokenizing source");

        let tokens = philly_parser::tokenize(source)
            .map_err(|err| PhillyError::new_parse_error(err, source))?;

        debug!(tokens = tokens.len(); "Source tokenized successfully");
        Ok(tokens)
    }

    /// Parse source code into the leaf sequence.
    ///
    /// This performs tokenizing, leaf building and, when `parser.strict` is
    /// configured, structural validation.
    ///
    /// # Errors
    ///
    /// Returns `PhillyError::Parse` for lexical, leaf builder or validation
    /// errors.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use philly::Transpiler;
    ///
    /// let program = Transpiler::default()
    ///     .parse("x /% 3")
    ///     .expect("Failed to parse");
    /// assert_eq!(program.to_string(), "[\n  {type: DIV_REMAIN, var: 'x', val: '3'},\n]");
    /// ```
    pub fn parse(&self, source: &str) -> Result<Program, PhillyError> {
        info!(strict = self.config.parser().strict(); "Parsing source");

        let parse_config = ParseConfig::new(self.config.parser().strict());
        let program = philly_parser::parse(source, parse_config)
            .map_err(|err| PhillyError::new_parse_error(err, source))?;

        debug!(leaves = program.len(); "Source parsed successfully");
        trace!(program:%; "Parsed program");

        Ok(program)
    }

    /// Render a parsed program as JavaScript.
    ///
    /// Applies the `output` configuration on top of [`transpile`].
    pub fn generate(&self, program: &Program) -> String {
        let mut output = transpile(program);

        if self.config.output().final_newline() && !output.ends_with('\n') {
            output.push('\n');
        }

        output
    }

    /// Transpile source code to JavaScript in one step.
    ///
    /// # Errors
    ///
    /// Returns `PhillyError::Parse` if the source cannot be parsed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use philly::Transpiler;
    ///
    /// let js = Transpiler::default()
    ///     .compile("jawn x := 1")
    ///     .expect("Failed to compile");
    /// assert_eq!(js, "const x = 1");
    /// ```
    pub fn compile(&self, source: &str) -> Result<String, PhillyError> {
        let program = self.parse(source)?;
        let output = self.generate(&program);

        info!(bytes = output.len(); "JavaScript generated successfully");
        Ok(output)
    }
}
