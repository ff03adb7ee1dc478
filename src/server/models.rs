use indexmap::IndexMap;
use serde::Deserialize;

use crate::engine::{AttrValue, TinyObject};

/// One scene mutation arriving over an ingestion edge, websocket or UDP.
/// Whether it lands as a create or an update is the host's call: an id
/// already in the scene means update.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SceneMessage {
    pub id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(flatten)]
    pub attrs: IndexMap<String, AttrValue>,
}

impl SceneMessage {
    pub fn into_parts(self) -> (String, TinyObject) {
        let SceneMessage { id, tags, attrs } = self;
        (id, TinyObject { tags, attrs })
    }
}
