//! Match one clause against the scene under an accumulated context.

use std::collections::BTreeSet;

use super::context::Context;
use super::eval::eval_condition;
use super::scene::{Scene, TinyObject};
use crate::tinytalk_parser::ast::{Adjective, Condition, MatchClause};

/// Return every scene object satisfying the clause, in scene order.
///
/// The filters run in a fixed order: tags, adjectives, relation, attribute
/// conditions.
pub fn match_clause<'s>(
    clause: &MatchClause,
    ctx: &Context,
    scene: &'s Scene,
) -> Vec<&'s TinyObject> {
    let wanted: BTreeSet<&str> = clause.tags.iter().map(String::as_str).collect();

    // Tag filter: exact set equality, objects without a type are invisible.
    let mut candidates: Vec<&TinyObject> = scene
        .iter()
        .filter_map(|(_, object)| {
            let type_field = object.type_field()?;
            let present: BTreeSet<&str> =
                type_field.split(' ').filter(|t| !t.is_empty()).collect();
            (present == wanted).then_some(object)
        })
        .collect();

    for adjective in &clause.adjectives {
        match adjective {
            // `only` and `one` demand exactly one candidate; anything else
            // empties the match.
            Adjective::Only | Adjective::One => {
                if candidates.len() != 1 {
                    candidates.clear();
                }
            }
            // `global` is a lookup-scope hint; a single scene has one scope.
            Adjective::Global => {}
        }
    }

    // `friend` is declared by the grammar but carries no scene-level
    // filtering semantics.

    for (name, condition) in &clause.attrs {
        candidates.retain(|object| {
            if object.get(name).is_none() {
                return false;
            }
            match condition {
                Condition::Any => true,
                Condition::Cond(expr) => eval_condition(expr, ctx, object),
            }
        });
    }

    candidates
}
