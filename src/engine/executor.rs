//! Context expansion and consequence assembly for one rule.

use indexmap::IndexMap;
use uuid::Uuid;

use super::context::Context;
use super::eval::eval_expr;
use super::matcher::match_clause;
use super::scene::{AttrValue, ObjectId, Scene, TinyObject};
use super::EngineError;
use crate::tinytalk_parser::ast::{Expr, Relation, Rule};

/// Expand the rule's premise into every consistent alias binding.
///
/// Each clause multiplies the context set by its matches; an object may
/// appear at most once per context, so a two-clause premise never binds the
/// same identity twice.
pub fn expand_contexts(rule: &Rule, scene: &Scene) -> Vec<Context> {
    let mut contexts = vec![Context::default()];
    for clause in &rule.premise {
        let mut expanded = Vec::new();
        for ctx in &contexts {
            for object in match_clause(clause, ctx, scene) {
                let Some(id) = object.id() else { continue };
                if ctx.contains_id(id) {
                    continue;
                }
                let mut next = ctx.clone();
                next.bind(clause.aliases.clone(), object.clone());
                expanded.push(next);
            }
        }
        contexts = expanded;
    }
    contexts
}

/// Assemble a freshly identified object for a create consequence.
pub fn build_create(
    tags: &[String],
    relation: Option<&Relation>,
    attrs: &IndexMap<String, Expr>,
    ctx: &Context,
) -> (ObjectId, TinyObject) {
    let id = Uuid::new_v4().to_string();
    let mut object = TinyObject::new(tags.to_vec());
    object
        .attrs
        .insert("id".to_string(), AttrValue::Str(id.clone()));
    object
        .attrs
        .insert("type".to_string(), AttrValue::Str(tags.join(" ")));
    for (name, expr) in attrs {
        let value = eval_expr(expr, Some(name), ctx, None).unwrap_or(AttrValue::Null);
        object.attrs.insert(name.clone(), value);
    }
    if let Some(relation) = relation {
        object
            .attrs
            .insert(relation.attr_name().to_string(), AttrValue::Ids(ctx.ids()));
    }
    (id, object)
}

/// Evaluate an update consequence into the target id and attribute patch.
pub fn build_update(
    alias: &str,
    attrs: &IndexMap<String, Expr>,
    ctx: &Context,
) -> Result<(ObjectId, IndexMap<String, AttrValue>), EngineError> {
    let object = ctx
        .object(alias)
        .ok_or_else(|| EngineError::UnboundAlias(alias.to_string()))?;
    let id = object
        .id()
        .ok_or_else(|| EngineError::UnboundAlias(alias.to_string()))?
        .to_string();
    let mut patch = IndexMap::new();
    for (name, expr) in attrs {
        let value = eval_expr(expr, Some(name), ctx, None).unwrap_or(AttrValue::Null);
        patch.insert(name.clone(), value);
    }
    Ok((id, patch))
}
