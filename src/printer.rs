use std::fmt::Write;

use crate::scanner::token::{Literal, Token};

/// How tokens are rendered for display.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Format {
    /// Multi-line block per token
    #[default]
    Debug,
    /// One token per line
    Line,
    /// JSON array of tokens
    Json,
}

pub fn render(tokens: &[Token], format: Format) -> String {
    match format {
        Format::Debug => to_debug(tokens),
        Format::Line => to_lines(tokens),
        Format::Json => to_json(tokens),
    }
}

pub fn to_debug(tokens: &[Token]) -> String {
    let mut buf = String::new();
    for token in tokens {
        debug_token(&mut buf, token);
    }
    buf
}

fn debug_token(buf: &mut String, token: &Token) {
    buf.push_str("~~Token~~\n");
    let _ = writeln!(buf, "Lexeme: {}", token.lexeme);
    match &token.literal {
        Literal::None => buf.push_str("Literal:\n"),
        literal => {
            let _ = writeln!(buf, "Literal: {literal}");
        }
    }
    let _ = writeln!(buf, "Type: {}", token.kind.name());
    let _ = writeln!(buf, "Line: {}", token.line);
    buf.push('\n');
}

pub fn to_lines(tokens: &[Token]) -> String {
    let mut buf = String::new();
    for token in tokens {
        let _ = writeln!(buf, "{token}");
    }
    buf
}

pub fn to_json(tokens: &[Token]) -> String {
    serde_json::to_string_pretty(tokens).expect("tokens should be serializable")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner;

    #[test]
    fn debug_block_shows_every_field() {
        let scan = scanner::scan("\"hi\"");
        let out = to_debug(&scan.tokens);
        assert_eq!(
            out,
            "~~Token~~\nLexeme: \"hi\"\nLiteral: hi\nType: String\nLine: 1\n\n"
        );
    }

    #[test]
    fn debug_block_leaves_absent_literal_empty() {
        let scan = scanner::scan("(");
        let out = to_debug(&scan.tokens);
        assert!(out.contains("Literal:\n"));
        assert!(out.contains("Type: LeftParen\n"));
    }

    #[test]
    fn line_format_one_token_per_line() {
        let scan = scanner::scan("var x = 1;\nprint x;");
        let out = to_lines(&scan.tokens);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "Var 'var' @1");
        assert_eq!(lines[3], "Number '1' 1 @1");
        assert_eq!(lines[6], "Identifier 'x' @2");
    }

    #[test]
    fn json_output_is_valid() {
        let scan = scanner::scan("x = 2.5;");
        let json = to_json(&scan.tokens);
        let parsed: serde_json::Value =
            serde_json::from_str(&json).expect("JSON output should be valid");
        let tokens = parsed.as_array().expect("array of tokens");
        assert_eq!(tokens.len(), 4);
        assert_eq!(tokens[0]["kind"], "Identifier");
        assert_eq!(tokens[2]["literal"]["type"], "Number");
        assert_eq!(tokens[2]["literal"]["value"], 2.5);
        assert_eq!(tokens[2]["span"]["offset"], 4);
    }

    #[test]
    fn render_dispatches_on_format() {
        let scan = scanner::scan("(");
        assert!(render(&scan.tokens, Format::Debug).starts_with("~~Token~~"));
        assert_eq!(render(&scan.tokens, Format::Line), "LeftParen '(' @1\n");
        assert!(render(&scan.tokens, Format::Json).starts_with('['));
    }
}
