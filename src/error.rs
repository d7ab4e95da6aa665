use std::num::ParseFloatError;

use miette::{Diagnostic, NamedSource, Report, SourceSpan};
use thiserror::Error;

/// Why a numeric lexeme has no value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NumberError {
    #[error(transparent)]
    Invalid(#[from] ParseFloatError),

    #[error("number is too large for a double")]
    OutOfRange,
}

// ============= Scan diagnostics (with miette diagnostics) =============

/// A lexical problem found during a scan. None of these stop the scan.
#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum ScanError {
    #[error("[line {line}] unexpected character '{ch}'")]
    #[diagnostic(code(glox::scan::unexpected_character))]
    UnexpectedCharacter {
        ch: char,
        line: usize,
        #[label("not a valid token")]
        span: SourceSpan,
    },

    #[error("[line {line}] unterminated string")]
    #[diagnostic(
        code(glox::scan::unterminated_string),
        help("close the string with a '\"'")
    )]
    UnterminatedString {
        line: usize,
        #[label("string starts here")]
        span: SourceSpan,
    },

    #[error("[line {line}] invalid number '{lexeme}'")]
    #[diagnostic(code(glox::scan::number_parse))]
    NumberParseError {
        lexeme: String,
        line: usize,
        #[label("not a number")]
        span: SourceSpan,
        #[source]
        source: NumberError,
    },
}

impl ScanError {
    pub fn unexpected_character(ch: char, line: usize, offset: usize) -> Self {
        Self::UnexpectedCharacter {
            ch,
            line,
            span: SourceSpan::new(offset.into(), ch.len_utf8()),
        }
    }

    pub fn unterminated_string(line: usize, offset: usize, len: usize) -> Self {
        Self::UnterminatedString {
            line,
            span: SourceSpan::new(offset.into(), len),
        }
    }

    pub fn number_parse(
        lexeme: impl Into<String>,
        line: usize,
        offset: usize,
        source: impl Into<NumberError>,
    ) -> Self {
        let lexeme = lexeme.into();
        let len = lexeme.len();
        Self::NumberParseError {
            lexeme,
            line,
            span: SourceSpan::new(offset.into(), len),
            source: source.into(),
        }
    }

    /// Line the offending text starts on.
    pub fn line(&self) -> usize {
        match self {
            Self::UnexpectedCharacter { line, .. }
            | Self::UnterminatedString { line, .. }
            | Self::NumberParseError { line, .. } => *line,
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            Self::UnexpectedCharacter { span, .. }
            | Self::UnterminatedString { span, .. }
            | Self::NumberParseError { span, .. } => *span,
        }
    }
}

/// Attach source code to each diagnostic for fancy miette rendering.
pub fn render(errors: &[ScanError], name: &str, source: &str) -> Vec<Report> {
    errors
        .iter()
        .map(|e| {
            Report::new(e.clone()).with_source_code(NamedSource::new(name, source.to_string()))
        })
        .collect()
}

// ============= Tests =============

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_failure(text: &str) -> ParseFloatError {
        text.parse::<f64>().unwrap_err()
    }

    #[test]
    fn scan_error_implements_diagnostic() {
        let err = ScanError::unexpected_character('@', 1, 0);
        let diag: &dyn Diagnostic = &err;
        assert!(diag.code().is_some());
        assert_eq!(
            diag.code().map(|c| c.to_string()),
            Some("glox::scan::unexpected_character".to_string())
        );
    }

    #[test]
    fn unexpected_character_message() {
        let err = ScanError::unexpected_character('@', 3, 10);
        assert_eq!(err.to_string(), "[line 3] unexpected character '@'");
        assert_eq!(err.line(), 3);
        assert_eq!(err.span(), SourceSpan::new(10.into(), 1));
    }

    #[test]
    fn unexpected_character_span_covers_multibyte_char() {
        let err = ScanError::unexpected_character('€', 1, 2);
        assert_eq!(err.span().len(), 3);
    }

    #[test]
    fn unterminated_string_message() {
        let err = ScanError::unterminated_string(2, 4, 5);
        assert_eq!(err.to_string(), "[line 2] unterminated string");
        assert_eq!(err.span().offset(), 4);
    }

    #[test]
    fn number_parse_keeps_source_error() {
        let err = ScanError::number_parse("٣", 1, 0, parse_failure("٣"));
        assert!(err.to_string().contains("invalid number"));
        let source = std::error::Error::source(&err);
        assert!(source.is_some());
        assert_eq!(err.span().len(), "٣".len());
    }

    #[test]
    fn number_out_of_range_message() {
        let err = ScanError::number_parse("1e999", 4, 0, NumberError::OutOfRange);
        assert_eq!(err.to_string(), "[line 4] invalid number '1e999'");
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source.as_deref(), Some("number is too large for a double"));
    }

    #[test]
    fn render_attaches_source() {
        let errors = vec![ScanError::unexpected_character('@', 1, 4)];
        let reports = render(&errors, "input", "var @;");
        assert_eq!(reports.len(), 1);
        let shown = format!("{:?}", reports[0]);
        assert!(shown.contains("unexpected character"));
    }
}
