//! Expression and condition evaluation against a row and a context.
//!
//! Bare names resolve against the row when one is given (match conditions)
//! and against the context otherwise (consequences). A reference that
//! resolves nowhere evaluates to its own text, which is what makes
//! `element is fire` compare against the string "fire" instead of failing.

use super::context::Context;
use super::scene::{AttrValue, TinyObject};
use crate::tinytalk_parser::ast::{BinOp, Expr, Value};

/// Evaluate an expression. `None` is the undefined value: arithmetic over
/// it stays undefined and comparisons against it are false.
///
/// `attr_name` is the attribute the expression is being assigned to; a bare
/// datum (`Wild`) copies that attribute out of the context.
pub fn eval_expr(
    expr: &Expr,
    attr_name: Option<&str>,
    ctx: &Context,
    row: Option<&TinyObject>,
) -> Option<AttrValue> {
    match expr {
        Expr::Lit(Value::Num(n)) => Some(AttrValue::Num(*n)),
        Expr::Lit(Value::Str(s)) => Some(AttrValue::Str(s.clone())),
        Expr::Lit(Value::Bool(b)) => Some(AttrValue::Bool(*b)),
        Expr::Lit(Value::Wild) => attr_name.and_then(|name| ctx.attr(name).cloned()),
        Expr::Ref(name) => Some(resolve_name(name, ctx, row)),
        Expr::Path { alias, attr } => {
            let object = ctx.object(alias)?;
            object.get(attr).cloned()
        }
        Expr::Bin { op, left, right } => {
            let left = eval_expr(left, attr_name, ctx, row);
            let right = eval_expr(right, attr_name, ctx, row);
            apply_binary(*op, left, right)
        }
        Expr::And(left, right) => Some(AttrValue::Bool(
            eval_condition_expr(left, attr_name, ctx, row)
                && eval_condition_expr(right, attr_name, ctx, row),
        )),
    }
}

/// Evaluate a match condition for a candidate row: true only when the
/// expression comes out as boolean true.
pub fn eval_condition(expr: &Expr, ctx: &Context, row: &TinyObject) -> bool {
    eval_condition_expr(expr, None, ctx, Some(row))
}

fn eval_condition_expr(
    expr: &Expr,
    attr_name: Option<&str>,
    ctx: &Context,
    row: Option<&TinyObject>,
) -> bool {
    matches!(eval_expr(expr, attr_name, ctx, row), Some(AttrValue::Bool(true)))
}

fn resolve_name(name: &str, ctx: &Context, row: Option<&TinyObject>) -> AttrValue {
    let resolved = match row {
        Some(row) => row.get(name),
        None => ctx.attr(name),
    };
    match resolved {
        Some(value) => value.clone(),
        None => {
            log::debug!("unresolved reference '{}' evaluates to its own text", name);
            AttrValue::Str(name.to_string())
        }
    }
}

fn apply_binary(op: BinOp, left: Option<AttrValue>, right: Option<AttrValue>) -> Option<AttrValue> {
    match op {
        BinOp::Add | BinOp::Sub | BinOp::Mul => {
            let left = left.as_ref().and_then(AttrValue::as_num)?;
            let right = right.as_ref().and_then(AttrValue::as_num)?;
            let result = match op {
                BinOp::Add => left + right,
                BinOp::Sub => left - right,
                _ => left * right,
            };
            Some(AttrValue::Num(result))
        }
        BinOp::Is => Some(AttrValue::Bool(values_equal(&left, &right))),
        BinOp::IsNot => Some(AttrValue::Bool(match (&left, &right) {
            (Some(l), Some(r)) => l != r,
            _ => false,
        })),
        BinOp::Less | BinOp::Greater => {
            let ordered = match (
                left.as_ref().and_then(AttrValue::as_num),
                right.as_ref().and_then(AttrValue::as_num),
            ) {
                (Some(l), Some(r)) => {
                    if op == BinOp::Less {
                        l < r
                    } else {
                        l > r
                    }
                }
                // Non-numeric operands never order.
                _ => false,
            };
            Some(AttrValue::Bool(ordered))
        }
    }
}

fn values_equal(left: &Option<AttrValue>, right: &Option<AttrValue>) -> bool {
    match (left, right) {
        (Some(l), Some(r)) => l == r,
        _ => false,
    }
}
