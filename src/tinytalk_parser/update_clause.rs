use indexmap::IndexMap;
use nom::{
    character::complete::char,
    combinator::cut,
    error::context,
    multi::separated_list1,
    sequence::preceded,
    Parser,
};

use super::ast::Consequence;
use super::common::{keyword, parse_name, ws0, ws1, PResult};
use super::create_clause::parse_datum_expr;

/// Parse an update consequence: `"update" name "[" data "]"`.
pub fn parse_update_clause(input: &str) -> PResult<'_, Consequence> {
    let (input, _) = keyword("update").parse(input)?;
    let (input, alias) = context(
        "expected an alias after update",
        cut(preceded(ws1, parse_name)),
    )
    .parse(input)?;
    let (input, _) =
        context("expected '[' after update alias", cut(preceded(ws0, char('[')))).parse(input)?;
    let (input, data) = context(
        "expected at least one attribute to update",
        cut(preceded(ws0, separated_list1(ws1, parse_datum_expr))),
    )
    .parse(input)?;
    let (input, _) =
        context("unclosed update clause", cut(preceded(ws0, char(']')))).parse(input)?;

    let mut attrs = IndexMap::new();
    for (name, expr) in data {
        attrs.insert(name, expr);
    }

    Ok((input, Consequence::Update {
        alias: alias.to_string(),
        attrs,
    }))
}
