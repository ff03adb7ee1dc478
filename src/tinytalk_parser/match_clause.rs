use indexmap::IndexMap;
use nom::{
    branch::alt,
    character::complete::char,
    combinator::{cut, map, opt, value},
    error::context,
    multi::{many0, separated_list1},
    sequence::preceded,
    Parser,
};

use super::ast::{Adjective, BinOp, Condition, Expr, MatchClause, Relation};
use super::common::{keyword, parse_name, parse_tag, ws0, ws1, PResult};
use super::expression::{parse_expr, parse_truthy};

/// Parse one match clause:
/// `adjectives? relation? "[" tags attr-conds? "]" ("as" pronouns)?`
pub fn parse_match_clause(input: &str) -> PResult<'_, MatchClause> {
    let (input, adjectives) = many0(preceded(ws0, parse_adjective)).parse(input)?;
    let (input, relation) =
        opt(preceded(ws0, value(Relation::Friend, keyword("friend")))).parse(input)?;
    let (input, _) = preceded(ws0, char('[')).parse(input)?;
    let (input, tags) = context(
        "expected at least one #tag",
        cut(preceded(ws0, separated_list1(ws1, parse_tag))),
    )
    .parse(input)?;
    let (input, conds) = many0(preceded(ws1, parse_attr_condition)).parse(input)?;
    let (input, _) = context("unclosed match clause", cut(preceded(ws0, char(']')))).parse(input)?;
    let (input, aliases) = opt(preceded(
        (ws1, keyword("as"), ws1),
        cut(parse_pronouns),
    ))
    .parse(input)?;

    let tags: Vec<String> = tags.into_iter().map(str::to_string).collect();
    // An unaliased clause is still addressable from consequences through its
    // tag names.
    let aliases = aliases.unwrap_or_else(|| tags.clone());
    let mut attrs = IndexMap::new();
    for (name, cond) in conds {
        attrs.insert(name, cond);
    }

    Ok((
        input,
        MatchClause {
            adjectives,
            relation,
            tags,
            attrs,
            aliases,
        },
    ))
}

fn parse_adjective(input: &str) -> PResult<'_, Adjective> {
    alt((
        value(Adjective::One, keyword("one")),
        value(Adjective::Only, keyword("only")),
        value(Adjective::Global, keyword("global")),
    ))
    .parse(input)
}

/// `name "where" truthy` or a plain datum.
fn parse_attr_condition(input: &str) -> PResult<'_, (String, Condition)> {
    alt((parse_where_condition, parse_match_datum)).parse(input)
}

fn parse_where_condition(input: &str) -> PResult<'_, (String, Condition)> {
    let (input, name) = parse_name(input)?;
    let (input, _) = preceded(ws1, keyword("where")).parse(input)?;
    let (input, expr) = context("expected a condition after 'where'", cut(preceded(ws1, parse_truthy)))
        .parse(input)?;
    Ok((input, (name.to_string(), Condition::Cond(expr))))
}

/// A bare datum requires the attribute to exist; `name: expr` requires it to
/// equal the expression.
fn parse_match_datum(input: &str) -> PResult<'_, (String, Condition)> {
    let (input, name) = parse_name(input)?;
    let (input, val) = opt(preceded(char(':'), preceded(ws0, parse_expr))).parse(input)?;
    let cond = match val {
        None => Condition::Any,
        Some(expr) => Condition::Cond(Expr::Bin {
            op: BinOp::Is,
            left: Box::new(Expr::Ref(name.to_string())),
            right: Box::new(expr),
        }),
    };
    Ok((input, (name.to_string(), cond)))
}

/// `name ("/" name)*`: every pronoun binds to the same object.
pub fn parse_pronouns(input: &str) -> PResult<'_, Vec<String>> {
    map(
        separated_list1(char('/'), parse_name),
        |names: Vec<&str>| names.into_iter().map(str::to_string).collect(),
    )
    .parse(input)
}

/// Parse the tag list of a bracketed body, shared with the create clause.
pub(super) fn parse_tags(input: &str) -> PResult<'_, Vec<String>> {
    map(
        preceded(ws0, separated_list1(ws1, parse_tag)),
        |tags: Vec<&str>| tags.into_iter().map(str::to_string).collect(),
    )
    .parse(input)
}
