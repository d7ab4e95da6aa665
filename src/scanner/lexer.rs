use tracing::{debug, trace};
use unicode_general_category::{GeneralCategory, get_general_category};
use winnow::combinator::{alt, opt};
use winnow::error::{ContextError, ErrMode};
use winnow::prelude::*;
use winnow::stream::{LocatingSlice, Location, Stream};
use winnow::token::{any, take_till, take_while};

use crate::error::{NumberError, ScanError};
use crate::scanner::Scan;
use crate::scanner::token::{Literal, Span, Token, TokenKind, keyword_kind};

type Input<'a> = LocatingSlice<&'a str>;

fn is_digit(c: char) -> bool {
    c.is_numeric()
}

/// Letter general categories only; combining marks do not continue a name.
fn is_letter(c: char) -> bool {
    matches!(
        get_general_category(c),
        GeneralCategory::UppercaseLetter
            | GeneralCategory::LowercaseLetter
            | GeneralCategory::TitlecaseLetter
            | GeneralCategory::ModifierLetter
            | GeneralCategory::OtherLetter
    )
}

fn line_comment(input: &mut Input<'_>) -> ModalResult<()> {
    ("//", take_till(0.., '\n')).void().parse_next(input)
}

/// A string literal from the opening quote through the closing one. A
/// backslash keeps the next character from closing the literal. Running out
/// of input is a cut: the literal is unterminated.
fn string_literal(input: &mut Input<'_>) -> ModalResult<()> {
    '"'.parse_next(input)?;
    loop {
        let c = any
            .parse_next(input)
            .map_err(|_: ErrMode<ContextError>| ErrMode::Cut(ContextError::new()))?;
        match c {
            '"' => break,
            '\\' => {
                any.parse_next(input)
                    .map_err(|_: ErrMode<ContextError>| ErrMode::Cut(ContextError::new()))?;
            }
            _ => {}
        }
    }
    Ok(())
}

fn digits<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    take_while(1.., is_digit).parse_next(input)
}

/// Digits with at most one fractional part. A `.` not followed by a digit
/// is left for the next token.
fn number_literal<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    (digits, opt(('.', digits))).take().parse_next(input)
}

fn identifier_or_keyword<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    take_while(1.., is_letter).parse_next(input)
}

fn two_char_operator(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((
        "!=".value(TokenKind::BangEqual),
        "==".value(TokenKind::EqualEqual),
        ">=".value(TokenKind::GreaterEqual),
        "<=".value(TokenKind::LessEqual),
    ))
    .parse_next(input)
}

fn single_char_operator(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    any.verify_map(|c: char| match c {
        '(' => Some(TokenKind::LeftParen),
        ')' => Some(TokenKind::RightParen),
        '{' => Some(TokenKind::LeftBrace),
        '}' => Some(TokenKind::RightBrace),
        ',' => Some(TokenKind::Comma),
        '.' => Some(TokenKind::Dot),
        '+' => Some(TokenKind::Plus),
        '-' => Some(TokenKind::Minus),
        '*' => Some(TokenKind::Star),
        ';' => Some(TokenKind::Semicolon),
        '/' => Some(TokenKind::Slash),
        '!' => Some(TokenKind::Bang),
        '=' => Some(TokenKind::Equal),
        '<' => Some(TokenKind::Less),
        '>' => Some(TokenKind::Greater),
        _ => None,
    })
    .parse_next(input)
}

fn operator(input: &mut Input<'_>) -> ModalResult<TokenKind> {
    alt((two_char_operator, single_char_operator)).parse_next(input)
}

/// Cursor state for a single scan. Owned by `scan_all` and dropped with it.
struct Scanner<'a> {
    source: &'a str,
    input: Input<'a>,
    start: usize,
    line: usize,
    tokens: Vec<Token>,
    errors: Vec<ScanError>,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            input: LocatingSlice::new(source),
            start: 0,
            line: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
        }
    }

    fn is_at_end(&self) -> bool {
        self.input.is_empty()
    }

    fn current(&self) -> usize {
        self.input.current_token_start()
    }

    fn peek(&self) -> Option<char> {
        self.input.chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        self.input.next_token()
    }

    fn lexeme(&self) -> &'a str {
        &self.source[self.start..self.current()]
    }

    fn scan_tokens(mut self) -> Scan {
        while !self.is_at_end() {
            self.start = self.current();
            self.scan_token();
        }

        debug!(
            tokens = self.tokens.len(),
            diagnostics = self.errors.len(),
            lines = self.line,
            "scan finished"
        );
        Scan {
            tokens: self.tokens,
            diagnostics: self.errors,
        }
    }

    fn scan_token(&mut self) {
        let Some(c) = self.peek() else {
            return;
        };

        match c {
            ' ' | '\r' | '\t' => {
                self.advance();
            }
            '\n' => {
                self.advance();
                self.line += 1;
            }
            '/' if self.input.starts_with("//") => {
                let _ = line_comment(&mut self.input);
            }
            '"' => self.string(),
            c if is_digit(c) => self.number(),
            c if is_letter(c) => self.identifier(),
            c => {
                let checkpoint = self.input.checkpoint();
                match operator(&mut self.input) {
                    Ok(kind) => self.add_token(kind, Literal::None, self.line),
                    Err(_) => {
                        self.input.reset(&checkpoint);
                        self.advance();
                        self.error(ScanError::unexpected_character(c, self.line, self.start));
                    }
                }
            }
        }
    }

    fn string(&mut self) {
        let line = self.line;
        let result = string_literal(&mut self.input);
        if result.is_err() {
            // Unterminated literals swallow the rest of the input.
            let _ = self.input.finish();
        }
        self.line += self.lexeme().matches('\n').count();

        match result {
            Ok(()) => {
                let lexeme = self.lexeme();
                let value = &lexeme[1..lexeme.len() - 1];
                self.add_token(TokenKind::String, Literal::Text(value.to_string()), line);
            }
            Err(_) => {
                let len = self.current() - self.start;
                self.error(ScanError::unterminated_string(line, self.start, len));
            }
        }
    }

    fn number(&mut self) {
        let Ok(lexeme) = number_literal(&mut self.input) else {
            unreachable!("dispatch guarantees a leading digit");
        };

        let parsed = match lexeme.parse::<f64>() {
            Ok(n) if n.is_finite() => Ok(n),
            Ok(_) => Err(NumberError::OutOfRange),
            Err(e) => Err(NumberError::from(e)),
        };
        match parsed {
            Ok(n) => self.add_token(TokenKind::Number, Literal::Number(n), self.line),
            Err(e) => {
                self.error(ScanError::number_parse(lexeme, self.line, self.start, e));
                self.add_token(TokenKind::Number, Literal::None, self.line);
            }
        }
    }

    fn identifier(&mut self) {
        let Ok(lexeme) = identifier_or_keyword(&mut self.input) else {
            unreachable!("dispatch guarantees a leading letter");
        };
        let kind = keyword_kind(lexeme).unwrap_or(TokenKind::Identifier);
        self.add_token(kind, Literal::None, self.line);
    }

    fn add_token(&mut self, kind: TokenKind, literal: Literal, line: usize) {
        let lexeme = self.lexeme();
        let span = Span::new(self.start, lexeme.len());
        trace!(kind = kind.name(), lexeme, line, "token");
        self.tokens.push(Token::new(kind, lexeme, literal, line, span));
    }

    fn error(&mut self, error: ScanError) {
        debug!(line = error.line(), "{error}");
        self.errors.push(error);
    }
}

/// Scan all tokens from source. Every lexical problem is collected; the scan
/// itself always runs to the end of the input.
pub fn scan_all(source: &str) -> Scan {
    Scanner::new(source).scan_tokens()
}
