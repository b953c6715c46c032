//! Date pattern compilation, rendering, and strict parsing.
//!
//! Daily note filenames encode a calendar date through a user-configured
//! pattern such as `YYYY-MM-DD` or `YYYY/MM/DD`. Patterns are compiled once
//! into a token program which can render a date to a string and strictly
//! parse a string back to a date.
//!
//! Strictness matters more than coverage here: a padded token consumes an
//! exact digit width, so `2026-2-8` never parses under `YYYY-MM-DD`. Callers
//! additionally verify render-back equality, which also rejects non-canonical
//! matches for the unpadded tokens.

use chrono::{Datelike, NaiveDate};
use thiserror::Error;

/// Errors produced while compiling a date pattern.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The pattern was empty or whitespace-only.
    #[error("date format is empty")]
    Empty,

    /// The pattern used a token this codec does not understand.
    #[error("unsupported token '{0}' in date format")]
    UnsupportedToken(String),

    /// A `[` literal escape was never closed.
    #[error("unterminated '[' escape in date format")]
    UnterminatedEscape,
}

/// One compiled unit of a date pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    /// `YYYY`: zero-padded four-digit year.
    Year4,
    /// `YY`: zero-padded two-digit year (2000-2099 on parse).
    Year2,
    /// `MM`: zero-padded two-digit month.
    Month2,
    /// `M`: unpadded month.
    Month1,
    /// `DD`: zero-padded two-digit day of month.
    Day2,
    /// `D`: unpadded day of month.
    Day1,
    /// Verbatim text between date tokens.
    Literal(String),
}

/// A compiled date pattern.
///
/// Supports the moment-style tokens daily note conventions actually use
/// (`YYYY`, `YY`, `MM`, `M`, `DD`, `D`), bracket escapes (`[week]`), and any
/// non-alphabetic character as a literal. Rendered output may contain `/`,
/// which callers treat as a nested folder path.
#[derive(Debug, Clone, PartialEq)]
pub struct DateFormat {
    tokens: Vec<Token>,
}

impl DateFormat {
    /// Compile a pattern string into a token program.
    ///
    /// Alphabetic runs that are not a supported token are rejected rather
    /// than guessed at, so a convention this codec cannot round-trip is
    /// refused before any note is scanned.
    pub fn compile(pattern: &str) -> std::result::Result<Self, FormatError> {
        if pattern.trim().is_empty() {
            return Err(FormatError::Empty);
        }

        let chars: Vec<char> = pattern.chars().collect();
        let mut tokens: Vec<Token> = Vec::new();
        let mut index = 0;

        while index < chars.len() {
            let current = chars[index];

            if current == '[' {
                let close = chars[index + 1..]
                    .iter()
                    .position(|&c| c == ']')
                    .ok_or(FormatError::UnterminatedEscape)?;
                let literal: String = chars[index + 1..index + 1 + close].iter().collect();
                push_literal(&mut tokens, &literal);
                index += close + 2;
                continue;
            }

            if current.is_ascii_alphabetic() {
                let mut run = 1;
                while index + run < chars.len() && chars[index + run] == current {
                    run += 1;
                }
                let token = match (current, run) {
                    ('Y', 4) => Token::Year4,
                    ('Y', 2) => Token::Year2,
                    ('M', 2) => Token::Month2,
                    ('M', 1) => Token::Month1,
                    ('D', 2) => Token::Day2,
                    ('D', 1) => Token::Day1,
                    _ => {
                        return Err(FormatError::UnsupportedToken(
                            current.to_string().repeat(run),
                        ));
                    }
                };
                tokens.push(token);
                index += run;
                continue;
            }

            push_literal(&mut tokens, &current.to_string());
            index += 1;
        }

        Ok(Self { tokens })
    }

    /// Render a date through the compiled pattern.
    pub fn render(&self, date: NaiveDate) -> String {
        let mut output = String::new();
        for token in &self.tokens {
            match token {
                Token::Year4 => output.push_str(&format!("{:04}", date.year())),
                Token::Year2 => output.push_str(&format!("{:02}", date.year().rem_euclid(100))),
                Token::Month2 => output.push_str(&format!("{:02}", date.month())),
                Token::Month1 => output.push_str(&date.month().to_string()),
                Token::Day2 => output.push_str(&format!("{:02}", date.day())),
                Token::Day1 => output.push_str(&date.day().to_string()),
                Token::Literal(text) => output.push_str(text),
            }
        }
        output
    }

    /// Strictly parse a string produced by this pattern.
    ///
    /// Every token consumes its exact shape (padded tokens require their full
    /// digit width, literals must match verbatim) and the whole input must be
    /// consumed. Returns `None` for any mismatch or impossible calendar date.
    ///
    /// Fields the pattern does not mention default to 1970-01-01 components,
    /// keeping the parse deterministic; render-back equality still holds
    /// because rendering only reads the fields the pattern mentions.
    pub fn parse_strict(&self, input: &str) -> Option<NaiveDate> {
        let bytes = input.as_bytes();
        let mut position = 0;
        let mut year: i32 = 1970;
        let mut month: u32 = 1;
        let mut day: u32 = 1;

        for token in &self.tokens {
            match token {
                Token::Year4 => {
                    year = take_digits(bytes, &mut position, 4, 4)? as i32;
                }
                Token::Year2 => {
                    year = 2000 + take_digits(bytes, &mut position, 2, 2)? as i32;
                }
                Token::Month2 => {
                    month = take_digits(bytes, &mut position, 2, 2)?;
                }
                Token::Month1 => {
                    month = take_digits(bytes, &mut position, 1, 2)?;
                }
                Token::Day2 => {
                    day = take_digits(bytes, &mut position, 2, 2)?;
                }
                Token::Day1 => {
                    day = take_digits(bytes, &mut position, 1, 2)?;
                }
                Token::Literal(text) => {
                    let end = position + text.len();
                    if bytes.len() < end || &bytes[position..end] != text.as_bytes() {
                        return None;
                    }
                    position = end;
                }
            }
        }

        if position != bytes.len() {
            return None;
        }

        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// Append literal text, merging with a preceding literal token.
fn push_literal(tokens: &mut Vec<Token>, text: &str) {
    if let Some(Token::Literal(existing)) = tokens.last_mut() {
        existing.push_str(text);
    } else {
        tokens.push(Token::Literal(text.to_string()));
    }
}

/// Consume between `min` and `max` ASCII digits, greedily.
fn take_digits(bytes: &[u8], position: &mut usize, min: usize, max: usize) -> Option<u32> {
    let start = *position;
    let mut end = start;
    while end < bytes.len() && end - start < max && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end - start < min {
        return None;
    }
    let text = std::str::from_utf8(&bytes[start..end]).ok()?;
    *position = end;
    text.parse().ok()
}
