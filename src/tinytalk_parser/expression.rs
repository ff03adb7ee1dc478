use nom::{
    branch::alt,
    character::complete::char,
    combinator::{map, opt, value},
    sequence::{delimited, preceded},
    Parser,
};

use super::ast::{BinOp, Expr, Value};
use super::common::{
    keyword, parse_boolean, parse_name, parse_number, parse_string, ws, ws0, PResult,
};

/// Parse a full expression: an inequality when a comparison operator is
/// present, otherwise plain arithmetic.
pub fn parse_expr(input: &str) -> PResult<'_, Expr> {
    alt((parse_inequality, parse_additive)).parse(input)
}

/// Parse the body of a `where` condition: a boolean literal or an
/// inequality.
pub fn parse_truthy(input: &str) -> PResult<'_, Expr> {
    alt((
        parse_inequality,
        map(parse_boolean, |b| Expr::Lit(Value::Bool(b))),
    ))
    .parse(input)
}

/// `operand comparison operand (comparison operand)?`
///
/// A chained inequality `a op1 b op2 c` lowers to
/// `And(Bin(op1, a, b), Bin(op2, b, c))`, repeating the middle operand so
/// each conjunct stays a plain binary comparison.
fn parse_inequality(input: &str) -> PResult<'_, Expr> {
    let (input, first) = parse_additive(input)?;
    let (input, op) = preceded(ws0, parse_comparison).parse(input)?;
    let (input, second) = preceded(ws0, parse_additive).parse(input)?;
    let (input, tail) =
        opt((preceded(ws0, parse_comparison), preceded(ws0, parse_additive))).parse(input)?;
    let expr = match tail {
        None => Expr::Bin {
            op,
            left: Box::new(first),
            right: Box::new(second),
        },
        Some((second_op, third)) => Expr::And(
            Box::new(Expr::Bin {
                op,
                left: Box::new(first),
                right: Box::new(second.clone()),
            }),
            Box::new(Expr::Bin {
                op: second_op,
                left: Box::new(second),
                right: Box::new(third),
            }),
        ),
    };
    Ok((input, expr))
}

fn parse_comparison(input: &str) -> PResult<'_, BinOp> {
    alt((
        value(BinOp::Less, char('<')),
        value(BinOp::Greater, char('>')),
        value(BinOp::Is, keyword("is")),
        value(BinOp::IsNot, keyword("not")),
    ))
    .parse(input)
}

/// Additions and subtractions, folded left-to-right.
fn parse_additive(input: &str) -> PResult<'_, Expr> {
    let (input, first) = parse_multiplicative(input)?;
    let (input, rest) = nom::multi::many0((
        preceded(
            ws0,
            alt((value(BinOp::Add, char('+')), value(BinOp::Sub, char('-')))),
        ),
        preceded(ws0, parse_multiplicative),
    ))
    .parse(input)?;
    Ok((input, fold_binary(first, rest)))
}

/// Multiplications, folded left-to-right.
fn parse_multiplicative(input: &str) -> PResult<'_, Expr> {
    let (input, first) = parse_factor(input)?;
    let (input, rest) = nom::multi::many0((
        preceded(ws0, value(BinOp::Mul, char('*'))),
        preceded(ws0, parse_factor),
    ))
    .parse(input)?;
    Ok((input, fold_binary(first, rest)))
}

fn fold_binary(first: Expr, rest: Vec<(BinOp, Expr)>) -> Expr {
    rest.into_iter().fold(first, |left, (op, right)| Expr::Bin {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// A parenthesized subexpression, a literal, or a name/path reference.
fn parse_factor(input: &str) -> PResult<'_, Expr> {
    alt((
        delimited(char('('), ws(parse_expr), char(')')),
        map(parse_number, |n| Expr::Lit(Value::Num(n))),
        map(parse_string, |s: &str| Expr::Lit(Value::Str(s.to_string()))),
        map(parse_boolean, |b| Expr::Lit(Value::Bool(b))),
        parse_ref,
    ))
    .parse(input)
}

fn parse_ref(input: &str) -> PResult<'_, Expr> {
    let (input, name) = parse_name(input)?;
    let (input, attr) = opt(preceded(char('.'), parse_name)).parse(input)?;
    let expr = match attr {
        Some(attr) => Expr::Path {
            alias: name.to_string(),
            attr: attr.to_string(),
        },
        None => Expr::Ref(name.to_string()),
    };
    Ok((input, expr))
}
