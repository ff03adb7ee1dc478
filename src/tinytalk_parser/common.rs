use nom::{
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, digit1, satisfy},
    combinator::{not, opt, recognize, value},
    error::{ErrorKind, ParseError},
    sequence::{delimited, pair, preceded},
    IResult, Parser,
};

use super::errors::TinyTalkParsingError;

pub type PResult<'a, T> = IResult<&'a str, T, TinyTalkParsingError<'a>>;

/// Identifiers that may never be parsed as a `name`.
pub const RESERVED_WORDS: [&str; 4] = ["as", "where", "true", "false"];

/// TinyTalk whitespace: spaces, tabs, newlines and commas are all
/// interchangeable separators.
fn is_separator(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | ',')
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_lowercase() || c == '_' || c == '-'
}

/// Zero or more separator characters.
pub fn ws0<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    take_while(is_separator).parse(input)
}

/// At least one separator character.
pub fn ws1<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    take_while1(is_separator).parse(input)
}

/// Separator-handling combinator, mirroring how clause parsers trim around
/// their inner tokens.
pub fn ws<'a, O, E: ParseError<&'a str>, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
{
    delimited(take_while(is_separator), inner, take_while(is_separator))
}

/// Match a literal keyword with a word boundary, so `one` never swallows the
/// head of `onetime`.
pub fn keyword<'a, E: ParseError<&'a str>>(
    kw: &'static str,
) -> impl Parser<&'a str, Output = &'a str, Error = E> {
    nom::sequence::terminated(tag(kw), not(satisfy(is_name_char)))
}

/// Parse a `name`: lowercase letters with `-` and `_`, rejecting reserved
/// words.
pub fn parse_name<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    let (rest, name) = recognize(pair(
        satisfy(|c: char| c.is_ascii_lowercase()),
        take_while(is_name_char),
    ))
    .parse(input)?;
    if RESERVED_WORDS.contains(&name) {
        return Err(nom::Err::Error(E::from_error_kind(input, ErrorKind::Verify)));
    }
    Ok((rest, name))
}

/// Parse a `#`-prefixed tag, returning the bare tag name.
pub fn parse_tag(input: &str) -> PResult<'_, &str> {
    preceded(char('#'), parse_name).parse(input)
}

/// Parse a numeric literal (optional sign, optional fraction, optional
/// exponent) as an f64. The full literal text goes through the standard
/// float parser so round-tripping stays bit-exact.
pub fn parse_number<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, f64, E> {
    let (rest, text) = recognize((
        opt(alt((char('+'), char('-')))),
        digit1,
        opt(pair(char('.'), digit1)),
        opt((
            alt((char('e'), char('E'))),
            opt(alt((char('+'), char('-')))),
            digit1,
        )),
    ))
    .parse(input)?;
    match text.parse::<f64>() {
        Ok(number) => Ok((rest, number)),
        Err(_) => Err(nom::Err::Error(E::from_error_kind(input, ErrorKind::Float))),
    }
}

/// Parse a string literal. TinyTalk strings carry no escaping, and the
/// surrounding quotes are kept as part of the value.
pub fn parse_string<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, &'a str, E> {
    recognize(delimited(char('"'), take_while(|c| c != '"'), char('"'))).parse(input)
}

pub fn parse_boolean<'a, E: ParseError<&'a str>>(input: &'a str) -> IResult<&'a str, bool, E> {
    alt((value(true, keyword("true")), value(false, keyword("false")))).parse(input)
}
