use super::scene::{AttrValue, ObjectId, TinyObject};

/// One binding of aliases to matched objects, accumulated clause by clause.
/// Pronouns are several aliases over one entry; the object is never copied
/// per pronoun.
#[derive(Debug, Clone, Default)]
pub struct Context {
    entries: Vec<ContextEntry>,
}

#[derive(Debug, Clone)]
pub struct ContextEntry {
    pub aliases: Vec<String>,
    pub object: TinyObject,
}

impl Context {
    pub fn bind(&mut self, aliases: Vec<String>, object: TinyObject) {
        self.entries.push(ContextEntry { aliases, object });
    }

    /// The object bound to `alias`, if any.
    pub fn object(&self, alias: &str) -> Option<&TinyObject> {
        self.entries
            .iter()
            .find(|entry| entry.aliases.iter().any(|a| a == alias))
            .map(|entry| &entry.object)
    }

    /// Resolve a bare attribute name against the bound objects in match
    /// order; the first object carrying the attribute wins.
    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.entries.iter().find_map(|entry| entry.object.get(name))
    }

    /// Whether an object with this identity is already bound.
    pub fn contains_id(&self, id: &str) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.object.id() == Some(id))
    }

    /// Identities of all bound objects, in match order.
    pub fn ids(&self) -> Vec<ObjectId> {
        self.entries
            .iter()
            .filter_map(|entry| entry.object.id().map(str::to_string))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
