//! Error rendering using miette
//!
//! Errors from `tsrpn_core` carry no positions. This module locates the
//! offending token in the program text so the report can point at it.

use core::fmt;
use std::iter;

use miette::{
    Diagnostic, GraphicalReportHandler, GraphicalTheme, LabeledSpan, SourceCode, SourceSpan,
};

use crate::{Error, SyntaxError};

/// An [`Error`] paired with the program text it came from.
#[derive(Debug)]
pub struct ErrorReport {
    error: Error,
    source: String,
    span: Option<SourceSpan>,
}

impl ErrorReport {
    pub fn new(error: Error, source: impl Into<String>, delimiter: char) -> Self {
        let source = source.into();
        let span = locate(&error, &source, delimiter);
        Self {
            error,
            source,
            span,
        }
    }

    pub fn error(&self) -> &Error {
        &self.error
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.error, f)
    }
}

impl std::error::Error for ErrorReport {}

impl Diagnostic for ErrorReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.error {
            Error::Syntax(_) => "tsrpn::syntax",
            Error::OpenBindings(_) => "tsrpn::open_bindings",
            Error::BadBindingType { .. } => "tsrpn::binding_type",
            Error::ExpectedFloat { .. } => "tsrpn::expected_float",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.error {
            Error::OpenBindings(_) => "bind every listed name before evaluating",
            Error::BadBindingType { .. } => "bind a number or a sequence of numbers",
            Error::Syntax(SyntaxError::NotEnoughParameters { .. }) => {
                "operands must precede the operator"
            }
            Error::Syntax(SyntaxError::ExtraParameters(_)) => {
                "the program must reduce to a single value"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(&self.source)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        Some(Box::new(iter::once(LabeledSpan::new_with_span(
            Some("here".to_string()),
            span,
        ))))
    }
}

/// Finds the token an error is about, if it names one.
fn locate(error: &Error, source: &str, delimiter: char) -> Option<SourceSpan> {
    let name = match error {
        Error::Syntax(SyntaxError::EmptyToken) => "",
        Error::Syntax(
            SyntaxError::NotEnoughParameters { op, .. }
            | SyntaxError::NotPositiveInteger { op, .. }
            | SyntaxError::InsufficientStack { op, .. }
            | SyntaxError::ExpectedLabel { op, .. }
            | SyntaxError::NotASeries { op, .. }
            | SyntaxError::SeriesTooShort { op, .. },
        ) => op.name(),
        Error::Syntax(SyntaxError::PercentileOutOfRange(_)) => "PERCENT",
        Error::OpenBindings(names) => names.first()?.as_str(),
        Error::BadBindingType { key, .. } => key.as_str(),
        _ => return None,
    };
    let mut offset = 0;
    for piece in source.split(delimiter) {
        if piece == name {
            return Some(SourceSpan::new(offset.into(), piece.len()));
        }
        offset += piece.len() + delimiter.len_utf8();
    }
    None
}

/// Render an error against its program text to stderr
///
/// # Example
/// ```no_run
/// use tsrpn::{Program, render_error};
///
/// let source = "1,2,3,4,AVG";
/// if let Err(e) = Program::new(source) {
///     render_error(&e, source, ',');
/// }
/// ```
pub fn render_error(error: &Error, source: &str, delimiter: char) {
    let report = miette::Report::new(ErrorReport::new(error.clone(), source, delimiter));
    eprintln!("{:?}", report);
}

/// Render an error to a String without color codes (useful for tests, logs, etc.)
pub fn render_error_to_string(error: &Error, source: &str, delimiter: char) -> String {
    let report = ErrorReport::new(error.clone(), source, delimiter);
    let mut out = String::new();
    let handler = GraphicalReportHandler::new_themed(GraphicalTheme::unicode_nocolor());
    if handler.render_report(&mut out, &report).is_err() {
        return error.to_string();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Bindings, Program};

    #[test]
    fn test_locates_operator() {
        let source = "1,2,3,4,AVG";
        let err = Program::new(source).unwrap_err();
        let report = ErrorReport::new(err, source, ',');
        assert_eq!(report.span, Some(SourceSpan::new(8.into(), 3)));
    }

    #[test]
    fn test_locates_first_open_binding() {
        let source = "x|b|a|+|*";
        let err = Program::new(&source.replace('|', ","))
            .unwrap()
            .evaluate(&Bindings::new())
            .unwrap_err();
        let report = ErrorReport::new(err, source, '|');
        assert_eq!(report.span, Some(SourceSpan::new(4.into(), 1)));
    }

    #[test]
    fn test_rendered_text_names_error() {
        let source = "1,2,3,4,AVG";
        let err = Program::new(source).unwrap_err();
        let text = render_error_to_string(&err, source, ',');
        assert!(text.contains("AVG operand requires 4 items, but only 3 on stack"));
        assert!(text.contains("tsrpn::syntax"));
    }
}
