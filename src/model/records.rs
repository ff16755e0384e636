use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub type TagId = i64;

/// the id of a fragment. Older data used numeric ids, newer data uses text, so both are kept as they were stored
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        RecordId::Text(value.to_string())
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        RecordId::Text(value)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        RecordId::Number(value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(id) => write!(f, "{id}"),
            RecordId::Text(id) => f.write_str(id),
        }
    }
}

/// a saved code snippet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
    /// stable across edits, used to match a fragment when it is saved again
    pub id: RecordId,
    /// the snippet body
    #[serde(default)]
    pub content: String,
    /// ids of the [`Tag`]s on this fragment. Not checked against the stored tags; `null` reads as none
    #[serde(default, deserialize_with = "tags_or_none")]
    pub tags: Vec<TagId>,
    /// everything else the ui stores on a fragment (title, language, timestamps...), kept verbatim
    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Fragment {
    pub fn new(id: impl Into<RecordId>, content: impl Into<String>, tags: Vec<TagId>) -> Fragment {
        Fragment {
            id: id.into(),
            content: content.into(),
            tags,
            details: Map::new(),
        }
    }

    pub fn with_detail(mut self, name: &str, value: impl Into<Value>) -> Fragment {
        self.details.insert(name.to_string(), value.into());
        self
    }

    pub fn has_tag(&self, tag_id: TagId) -> bool {
        self.tags.contains(&tag_id)
    }
}

fn tags_or_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<TagId>, D::Error> {
    Ok(Option::<Vec<TagId>>::deserialize(deserializer)?.unwrap_or_default())
}

/// a named label that can be put on fragments. Names are not unique
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
}
