//! Parser for the TinyTalk rule language.
//!
//! A rule reads `when <match> (; <match>)* <write> (; <write>)*` where a
//! write is either a `create` or an `update` clause. Whitespace includes
//! commas, so `[#paddle x, y]` and `[#paddle x y]` are the same clause.

use nom::{
    branch::alt,
    character::complete::char,
    multi::separated_list1,
    sequence::preceded,
    Parser,
};

pub mod ast;
mod common;
mod create_clause;
pub(crate) mod errors;
mod expression;
mod match_clause;
mod update_clause;

pub use errors::TinyTalkParsingError;

use ast::{Consequence, Rule};
use common::{keyword, ws, ws0, PResult};

fn parse_rule_body(input: &str) -> PResult<'_, Rule> {
    let (input, _) = preceded(ws0, keyword("when")).parse(input)?;
    let (input, premise) =
        separated_list1(ws(char(';')), match_clause::parse_match_clause).parse(input)?;
    let (input, consequents) =
        separated_list1(ws(char(';')), preceded(ws0, parse_consequence)).parse(input)?;
    Ok((input, Rule { premise, consequents }))
}

fn parse_consequence(input: &str) -> PResult<'_, Consequence> {
    alt((
        create_clause::parse_create_clause,
        update_clause::parse_update_clause,
    ))
    .parse(input)
}

/// Parse one complete rule, requiring that the whole input is consumed.
/// On failure the error reports the position parsing stopped at; no partial
/// rule is produced.
pub fn parse_rule(input: &str) -> Result<Rule, TinyTalkParsingError<'_>> {
    match parse_rule_body(input) {
        Ok((remainder, rule)) => {
            let trimmed = remainder.trim();
            if !trimmed.is_empty() {
                return Err(TinyTalkParsingError {
                    errors: vec![
                        (remainder, "unexpected tokens after rule"),
                        (trimmed, "unparsed input"),
                    ],
                });
            }
            Ok(rule)
        }
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(e),
        Err(nom::Err::Incomplete(_)) => Err(TinyTalkParsingError::root(
            "",
            "incomplete rule",
        )),
    }
}

/// Parse a rule file: rules separated by blank lines, each parsed
/// independently so one bad rule never takes down its neighbours.
pub fn parse_rules_source(source: &str) -> Vec<Result<Rule, TinyTalkParsingError<'_>>> {
    source
        .split("\n\n")
        .filter(|chunk| !chunk.trim().is_empty())
        .map(parse_rule)
        .collect()
}
