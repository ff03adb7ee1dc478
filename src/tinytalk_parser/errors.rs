use nom::error::{ContextError, ParseError};
use std::fmt;

/// Parse error carrying the unconsumed input at each failure point, so the
/// caller can report where in the rule text parsing stopped.
#[derive(Debug, PartialEq)]
pub struct TinyTalkParsingError<'a> {
    pub errors: Vec<(&'a str, &'static str)>,
}

impl<'a> TinyTalkParsingError<'a> {
    pub fn root(input: &'a str, message: &'static str) -> Self {
        TinyTalkParsingError {
            errors: vec![(input, message)],
        }
    }

    /// Byte offset of the failure inside `source`, when the recorded input
    /// is a suffix of it.
    pub fn offset_in(&self, source: &str) -> Option<usize> {
        let (suffix, _) = self.errors.first()?;
        source.len().checked_sub(suffix.len())
    }
}

impl<'a> ParseError<&'a str> for TinyTalkParsingError<'a> {
    fn from_error_kind(input: &'a str, _kind: nom::error::ErrorKind) -> Self {
        TinyTalkParsingError {
            errors: vec![(input, "unexpected input")],
        }
    }

    fn append(input: &'a str, _kind: nom::error::ErrorKind, mut other: Self) -> Self {
        other.errors.push((input, "while parsing"));
        other
    }
}

impl<'a> ContextError<&'a str> for TinyTalkParsingError<'a> {
    fn add_context(input: &'a str, ctx: &'static str, mut other: Self) -> Self {
        other.errors.push((input, ctx));
        other
    }
}

impl fmt::Display for TinyTalkParsingError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (input, ctx) in &self.errors {
            let snippet: String = input.chars().take(40).collect();
            if snippet.is_empty() {
                writeln!(f, "{} at end of input", ctx)?;
            } else {
                writeln!(f, "{} at '{}'", ctx, snippet)?;
            }
        }
        Ok(())
    }
}

impl<'a> From<nom::error::Error<&'a str>> for TinyTalkParsingError<'a> {
    fn from(err: nom::error::Error<&'a str>) -> Self {
        TinyTalkParsingError {
            errors: vec![(err.input, "unable to parse")],
        }
    }
}
