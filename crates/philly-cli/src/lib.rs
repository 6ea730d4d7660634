//! Philly CLI library
//!
//! The command-line logic of the `philly` transpiler: read one source file,
//! run it through the pipeline and write the requested stage to the given
//! writer.

pub mod error_adapter;

mod args;
mod config;

pub use args::{Args, Stage};

use std::{fs, io::Write};

use log::info;

use philly::{PhillyError, Transpiler, tokens::TokenList};

/// Run the Philly CLI application
///
/// Reads `args.input`, applies the configuration and `--strict` flag, and
/// writes either the requested stage or the generated JavaScript to `out`.
///
/// # Errors
///
/// Returns `PhillyError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Lexical, leaf builder and validation errors
pub fn run(args: &Args, out: &mut impl Write) -> Result<(), PhillyError> {
    info!(input_path = args.input, stage:? = args.stage; "Processing source");

    let mut app_config = config::load_config(args.config.as_ref())?;
    if args.strict {
        app_config = app_config.with_strict(true);
    }

    let source = fs::read_to_string(&args.input)?;
    let transpiler = Transpiler::new(app_config);

    match args.stage {
        Some(Stage::Print) => {
            out.write_all(source.as_bytes())?;
        }
        Some(Stage::Lex) => {
            let tokens = transpiler.lex(&source)?;
            writeln!(out, "{}", TokenList(&tokens))?;
        }
        Some(Stage::Parse) => {
            let program = transpiler.parse(&source)?;
            writeln!(out, "{program}")?;
        }
        None => {
            let js = transpiler.compile(&source)?;
            out.write_all(js.as_bytes())?;
        }
    }

    info!(input_path = args.input; "Source processed successfully");

    Ok(())
}
