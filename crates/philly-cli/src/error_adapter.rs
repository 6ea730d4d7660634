//! Turns a [`PhillyError`] into miette reports for the terminal.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, GraphicalReportHandler, LabeledSpan, SourceSpan};

use philly::PhillyError;
use philly_parser::{Span, error::Diagnostic};

/// One renderable failure.
///
/// A parse error turns into one `Located` report per diagnostic, so each
/// gets its own snippet of the source file.
#[derive(Debug)]
pub enum Reportable<'a> {
    Located {
        diag: &'a Diagnostic,
        src: &'a str,
    },
    Plain(&'a PhillyError),
}

impl fmt::Display for Reportable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Located { diag, .. } => f.write_str(diag.message()),
            Self::Plain(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl std::error::Error for Reportable<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Located { .. } => None,
            Self::Plain(err) => err.source(),
        }
    }
}

impl MietteDiagnostic for Reportable<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Self::Located { diag, .. } => diag
                .code()
                .map(|code| Box::new(code) as Box<dyn fmt::Display>),
            Self::Plain(PhillyError::Io(_)) => Some(Box::new("philly::io")),
            Self::Plain(PhillyError::Config(_)) => Some(Box::new("philly::config")),
            Self::Plain(PhillyError::Parse { .. }) => None,
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            Self::Located { diag, .. } => diag
                .help()
                .map(|help| Box::new(help) as Box<dyn fmt::Display>),
            Self::Plain(PhillyError::Config(_)) => Some(Box::new(
                "sections are [parser] and [output]; pass --config to pick another file",
            )),
            Self::Plain(_) => None,
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            Self::Located { src, .. } => Some(src as &dyn miette::SourceCode),
            Self::Plain(_) => None,
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let Self::Located { diag, .. } = self else {
            return None;
        };
        if diag.labels().is_empty() {
            return None;
        }

        Some(Box::new(diag.labels().iter().map(|label| {
            let span = source_span(label.span());
            let message = Some(label.message().to_string());
            if label.is_primary() {
                LabeledSpan::new_primary_with_span(message, span)
            } else {
                LabeledSpan::new_with_span(message, span)
            }
        })))
    }
}

fn source_span(span: Span) -> SourceSpan {
    SourceSpan::new(span.start().into(), span.len())
}

/// Splits an error into the reports the CLI prints.
pub fn to_reportables(err: &PhillyError) -> Vec<Reportable<'_>> {
    match err {
        PhillyError::Parse { err: parse_err, src } => parse_err
            .diagnostics()
            .iter()
            .map(|diag| Reportable::Located { diag, src })
            .collect(),
        _ => vec![Reportable::Plain(err)],
    }
}

/// Renders every report of `err` with the given handler.
pub fn render_reports(
    err: &PhillyError,
    handler: &GraphicalReportHandler,
) -> Result<Vec<String>, fmt::Error> {
    to_reportables(err)
        .iter()
        .map(|report| {
            let mut out = String::new();
            handler.render_report(&mut out, report)?;
            Ok(out)
        })
        .collect()
}
