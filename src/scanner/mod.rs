pub mod lexer;
pub mod token;

use crate::error::ScanError;
use token::Token;

/// Everything one scan produced: tokens in source order plus any diagnostics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scan {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<ScanError>,
}

impl Scan {
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    /// Treat any diagnostic as a failure of the whole source unit.
    pub fn into_result(self) -> Result<Vec<Token>, Vec<ScanError>> {
        if self.diagnostics.is_empty() {
            Ok(self.tokens)
        } else {
            Err(self.diagnostics)
        }
    }
}

/// Scan source code into tokens, collecting diagnostics along the way.
pub fn scan(source: &str) -> Scan {
    lexer::scan_all(source)
}
