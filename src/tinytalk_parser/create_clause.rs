use indexmap::IndexMap;
use nom::{
    character::complete::char,
    combinator::{cut, opt, value},
    error::context,
    multi::many0,
    sequence::preceded,
    Parser,
};

use super::ast::{Consequence, Expr, Relation, Value};
use super::common::{keyword, parse_name, ws0, ws1, PResult};
use super::expression::parse_expr;
use super::match_clause::parse_tags;

/// Parse a create consequence: `"create" relation? "[" tags data? "]"`.
pub fn parse_create_clause(input: &str) -> PResult<'_, Consequence> {
    let (input, _) = keyword("create").parse(input)?;
    let (input, relation) =
        opt(preceded(ws1, value(Relation::Friend, keyword("friend")))).parse(input)?;
    let (input, _) = context("expected '[' after create", cut(preceded(ws0, char('['))))
        .parse(input)?;
    let (input, tags) = context("expected at least one #tag", cut(parse_tags)).parse(input)?;
    let (input, data) = many0(preceded(ws1, parse_datum_expr)).parse(input)?;
    let (input, _) =
        context("unclosed create clause", cut(preceded(ws0, char(']')))).parse(input)?;

    let mut attrs = IndexMap::new();
    for (name, expr) in data {
        attrs.insert(name, expr);
    }

    Ok((
        input,
        Consequence::Create {
            relation,
            tags,
            attrs,
        },
    ))
}

/// `name (":" expr)?` in a write body. A bare datum copies the same-named
/// attribute out of the context.
pub(super) fn parse_datum_expr(input: &str) -> PResult<'_, (String, Expr)> {
    let (input, name) = parse_name(input)?;
    let (input, val) = opt(preceded(char(':'), preceded(ws0, parse_expr))).parse(input)?;
    let expr = val.unwrap_or(Expr::Lit(Value::Wild));
    Ok((input, (name.to_string(), expr)))
}
