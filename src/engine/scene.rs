use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::EngineError;

pub type ObjectId = String;

/// A runtime attribute value. Untagged so the ingestion and render edges
/// speak plain JSON: `5` is a number, `"red"` a string, `["a", "b"]` a list
/// of object ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttrValue {
    Bool(bool),
    Num(f64),
    Str(String),
    Ids(Vec<ObjectId>),
    Null,
}

impl AttrValue {
    pub fn as_num(&self) -> Option<f64> {
        match self {
            AttrValue::Num(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttrValue::Str(s) => Some(s),
            _ => None,
        }
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Num(value)
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Str(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Str(value)
    }
}

/// One thing on the tinyland surface: a tag list plus a bag of named
/// attributes. `attrs["id"]` and `attrs["type"]` mirror the scene key and
/// the space-joined tag list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TinyObject {
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub attrs: IndexMap<String, AttrValue>,
}

impl TinyObject {
    pub fn new<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TinyObject {
            tags: tags.into_iter().map(Into::into).collect(),
            attrs: IndexMap::new(),
        }
    }

    /// Builder-style attribute setter, mostly for tests and ingestion glue.
    pub fn with_attr(mut self, name: &str, value: impl Into<AttrValue>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").and_then(AttrValue::as_str)
    }

    /// The space-joined tag list the matcher compares against.
    pub fn type_field(&self) -> Option<&str> {
        self.attrs.get("type").and_then(AttrValue::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }
}

/// The scene: an insertion-ordered map from object id to object, so
/// matching walks objects in a deterministic order.
#[derive(Debug, Default)]
pub struct Scene {
    objects: IndexMap<ObjectId, TinyObject>,
}

impl Scene {
    pub fn new() -> Self {
        Scene::default()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.objects.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&TinyObject> {
        self.objects.get(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ObjectId, &TinyObject)> {
        self.objects.iter()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Insert an object under `id`, filling in the `id` and `type`
    /// attributes when the caller did not set them. A rule is free to write
    /// its own `id` attribute (markers carry their fiducial id there); the
    /// scene key stays authoritative.
    pub fn insert(&mut self, id: &str, mut object: TinyObject) {
        object
            .attrs
            .entry("id".to_string())
            .or_insert_with(|| AttrValue::Str(id.to_string()));
        let joined = object.tags.join(" ");
        object
            .attrs
            .entry("type".to_string())
            .or_insert(AttrValue::Str(joined));
        self.objects.insert(id.to_string(), object);
    }

    /// Merge `patch` into the object's attributes, attribute-level
    /// last-write-wins.
    pub fn update(
        &mut self,
        id: &str,
        patch: IndexMap<String, AttrValue>,
    ) -> Result<&TinyObject, EngineError> {
        let object = self
            .objects
            .get_mut(id)
            .ok_or_else(|| EngineError::MissingObject(id.to_string()))?;
        for (name, value) in patch {
            object.attrs.insert(name, value);
        }
        Ok(object)
    }
}
