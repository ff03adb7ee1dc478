//! The forward-chaining rule runtime.
//!
//! A [`TinylandEngine`] owns the scene, the rule table and the trigger
//! indices; every mutation goes through [`TinylandEngine::create`] or
//! [`TinylandEngine::update`] so the reactive loop always sees it. Cascades
//! are bounded: each (rule, trigger) pair runs at most once per drain, and
//! work discovered while draining waits for the next drain.

use std::collections::{BTreeSet, HashMap, HashSet};

use indexmap::{IndexMap, IndexSet};
use thiserror::Error;

use crate::tinytalk_parser::ast::{Consequence, Rule};

pub mod context;
pub mod eval;
pub mod executor;
pub mod matcher;
pub mod scene;

pub use context::Context;
pub use scene::{AttrValue, ObjectId, Scene, TinyObject};

pub type RuleId = usize;

/// A scheduled rule execution: which rule, and which object's mutation
/// triggered it.
type WorkItem = (RuleId, ObjectId);

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no object '{0}' in the scene")]
    MissingObject(ObjectId),
    #[error("alias '{0}' is not bound in this context")]
    UnboundAlias(String),
}

#[derive(Clone, Copy)]
enum TriggerKind {
    Create,
    Update,
}

#[derive(Debug, Default)]
pub struct TinylandEngine {
    rules: Vec<Rule>,
    create_triggers: HashMap<String, BTreeSet<RuleId>>,
    update_triggers: HashMap<String, BTreeSet<RuleId>>,
    scene: Scene,
    cur_loop: IndexSet<WorkItem>,
    next_loop: IndexSet<WorkItem>,
    executed: HashSet<WorkItem>,
}

impl TinylandEngine {
    pub fn new() -> Self {
        TinylandEngine::default()
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Load a rule and index its premise tags. A clause with no attribute
    /// conditions only reacts to creates; a conditioned clause reacts to
    /// both creates and updates. Loading an identical rule twice is a no-op.
    pub fn load_rule(&mut self, rule: Rule) -> RuleId {
        if let Some(existing) = self.rules.iter().position(|r| r == &rule) {
            return existing;
        }
        let rule_id = self.rules.len();
        for clause in &rule.premise {
            let conditioned = !clause.attrs.is_empty();
            for tag in &clause.tags {
                self.create_triggers
                    .entry(tag.clone())
                    .or_default()
                    .insert(rule_id);
                if conditioned {
                    self.update_triggers
                        .entry(tag.clone())
                        .or_default()
                        .insert(rule_id);
                }
            }
        }
        self.rules.push(rule);
        rule_id
    }

    /// Put an object into the scene and schedule the rules its tags
    /// trigger. A create on an occupied id folds into an update.
    pub fn create(&mut self, id: &str, object: TinyObject) {
        if self.scene.contains(id) {
            if let Err(err) = self.update(id, object.attrs) {
                log::warn!("create-as-update on '{}' failed: {}", id, err);
            }
            return;
        }
        let tags = object.tags.clone();
        self.scene.insert(id, object);
        self.cascade(TriggerKind::Create, id, &tags);
    }

    /// Merge a patch into an existing object and schedule update triggers.
    pub fn update(
        &mut self,
        id: &str,
        patch: IndexMap<String, AttrValue>,
    ) -> Result<(), EngineError> {
        let tags = self.scene.update(id, patch)?.tags.clone();
        self.cascade(TriggerKind::Update, id, &tags);
        Ok(())
    }

    /// Schedule every rule indexed under the mutated object's tags. A pair
    /// that already ran this drain defers to the next drain; everything
    /// else joins the current queue.
    fn cascade(&mut self, kind: TriggerKind, id: &str, tags: &[String]) {
        let index = match kind {
            TriggerKind::Create => &self.create_triggers,
            TriggerKind::Update => &self.update_triggers,
        };
        let mut triggered: BTreeSet<RuleId> = BTreeSet::new();
        for tag in tags {
            if let Some(rule_ids) = index.get(tag) {
                triggered.extend(rule_ids);
            }
        }
        for rule_id in triggered {
            let item = (rule_id, id.to_string());
            if self.executed.contains(&item) {
                self.next_loop.insert(item);
            } else {
                self.cur_loop.insert(item);
            }
        }
    }

    /// Run one rule against the scene. When a trigger id is given, only
    /// contexts that bound the mutated object apply their consequences, so
    /// cascades react to the object that changed rather than re-firing on
    /// the whole scene.
    pub fn run(&mut self, rule_id: RuleId, trigger_id: Option<&str>) {
        let Some(rule) = self.rules.get(rule_id).cloned() else {
            return;
        };
        let contexts = executor::expand_contexts(&rule, &self.scene);
        for ctx in contexts {
            if let Some(trigger) = trigger_id {
                if !ctx.contains_id(trigger) {
                    continue;
                }
            }
            for consequence in &rule.consequents {
                match consequence {
                    Consequence::Create {
                        tags,
                        relation,
                        attrs,
                    } => {
                        let (id, object) =
                            executor::build_create(tags, relation.as_ref(), attrs, &ctx);
                        self.create(&id, object);
                    }
                    Consequence::Update { alias, attrs } => {
                        match executor::build_update(alias, attrs, &ctx) {
                            Ok((id, patch)) => {
                                if let Err(err) = self.update(&id, patch) {
                                    log::warn!(
                                        "update through alias '{}' skipped: {}",
                                        alias,
                                        err
                                    );
                                }
                            }
                            Err(err) => log::warn!("consequence skipped: {}", err),
                        }
                    }
                }
            }
        }
    }

    /// Drain the work that was pending when the call started, then promote
    /// the deferred queue. Returns whether any rule ran. Work scheduled by
    /// the batch itself stays queued for the next drain, which is what keeps
    /// mutually-triggering rules stepping one drain at a time instead of
    /// recursing.
    pub fn execute_loop(&mut self) -> bool {
        let batch: Vec<WorkItem> = self.cur_loop.drain(..).collect();
        let ran = !batch.is_empty();
        for (rule_id, trigger_id) in batch {
            self.executed.insert((rule_id, trigger_id.clone()));
            self.run(rule_id, Some(&trigger_id));
        }
        self.executed.clear();
        let deferred = std::mem::take(&mut self.next_loop);
        self.cur_loop.extend(deferred);
        ran
    }

    /// Pending work across both queues, exposed for host diagnostics.
    pub fn pending_work(&self) -> usize {
        self.cur_loop.len() + self.next_loop.len()
    }
}
