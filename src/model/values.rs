use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::model::error::store_errors::StoreError;
use crate::model::keys::StoreKey;
use crate::model::records::{Fragment, Tag};

/// a value that has been checked against the schema of the key it belongs to
#[derive(Debug, Clone, PartialEq)]
pub enum StoreValue {
    Fragments(Vec<Fragment>),
    Tags(Vec<Tag>),
    DarkMode(bool),
}

impl StoreValue {
    /// the value a key reads as when nothing (or nothing valid) is stored for it
    pub fn default_for(key: StoreKey) -> StoreValue {
        match key {
            StoreKey::Fragments => StoreValue::Fragments(Vec::new()),
            StoreKey::Tags => StoreValue::Tags(Vec::new()),
            StoreKey::DarkMode => StoreValue::DarkMode(false),
        }
    }

    /// the key whose schema this value satisfies
    pub fn key(&self) -> StoreKey {
        match self {
            StoreValue::Fragments(_) => StoreKey::Fragments,
            StoreValue::Tags(_) => StoreKey::Tags,
            StoreValue::DarkMode(_) => StoreKey::DarkMode,
        }
    }

    pub fn matches(&self, key: StoreKey) -> bool {
        self.key() == key
    }

    /// validates `json` against the schema for `key`
    ///
    /// # Returns
    /// - `Ok(StoreValue)` if `json` has the shape `key` requires
    /// - `Err(StoreError::SchemaViolation)` otherwise
    pub fn from_json(key: StoreKey, json: Value) -> Result<StoreValue, StoreError> {
        let parsed = match key {
            StoreKey::Fragments => serde_json::from_value(json).map(StoreValue::Fragments),
            StoreKey::Tags => serde_json::from_value(json).map(StoreValue::Tags),
            StoreKey::DarkMode => serde_json::from_value(json).map(StoreValue::DarkMode),
        };
        parsed.map_err(|e| {
            log::warn!("Value for {key} does not match its schema: {e}");
            StoreError::SchemaViolation
        })
    }

    /// reads a value that was already stored for `key`, keeping as much of it as possible.
    ///
    /// Fragments and tags must still be arrays, but elements that don't match the schema are dropped
    /// one by one instead of failing the whole collection. Dark mode is checked the same way as [`StoreValue::from_json`]
    pub fn from_stored_json(key: StoreKey, json: Value) -> Result<StoreValue, StoreError> {
        match key {
            StoreKey::Fragments => keep_valid_elements(key, json).map(StoreValue::Fragments),
            StoreKey::Tags => keep_valid_elements(key, json).map(StoreValue::Tags),
            StoreKey::DarkMode => StoreValue::from_json(key, json),
        }
    }

    /// same as [`StoreValue::from_stored_json`], for json that hasn't been parsed yet
    pub fn from_stored_json_str(key: StoreKey, raw: &str) -> Result<StoreValue, StoreError> {
        let json: Value = serde_json::from_str(raw).map_err(|e| {
            log::warn!("Stored value for {key} is not valid json: {e}");
            StoreError::SchemaViolation
        })?;
        StoreValue::from_stored_json(key, json)
    }

    pub fn to_json(&self) -> Value {
        match self {
            StoreValue::Fragments(fragments) => json!(fragments),
            StoreValue::Tags(tags) => json!(tags),
            StoreValue::DarkMode(dark_mode) => Value::Bool(*dark_mode),
        }
    }

    pub fn into_fragments(self) -> Option<Vec<Fragment>> {
        match self {
            StoreValue::Fragments(fragments) => Some(fragments),
            _ => None,
        }
    }

    pub fn into_tags(self) -> Option<Vec<Tag>> {
        match self {
            StoreValue::Tags(tags) => Some(tags),
            _ => None,
        }
    }

    pub fn as_dark_mode(&self) -> Option<bool> {
        match self {
            StoreValue::DarkMode(dark_mode) => Some(*dark_mode),
            _ => None,
        }
    }
}

fn keep_valid_elements<T: DeserializeOwned>(key: StoreKey, json: Value) -> Result<Vec<T>, StoreError> {
    let Value::Array(elements) = json else {
        log::warn!("Stored value for {key} is not an array");
        return Err(StoreError::SchemaViolation);
    };
    let total = elements.len();
    let kept: Vec<T> = elements
        .into_iter()
        .filter_map(|element| serde_json::from_value(element).ok())
        .collect();
    if kept.len() < total {
        log::warn!(
            "Dropped {} of {total} stored {key} entries that do not match the schema",
            total - kept.len()
        );
    }
    Ok(kept)
}
