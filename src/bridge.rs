use serde_json::Value;

use crate::gateway::{Environment, Storage};
use crate::model::{SlotKey, StoreValue};

/// the only way the ui reaches storage: string keys in, json values out.
///
/// Keys are the six slot names (`fragments`, `tags`, `darkMode` and their `backup_` twins); anything else is refused
pub struct StoreBridge {
    storage: Box<dyn Storage>,
}

impl StoreBridge {
    pub fn new(storage: Box<dyn Storage>) -> StoreBridge {
        StoreBridge { storage }
    }

    pub fn environment(&self) -> Environment {
        self.storage.environment()
    }

    /// the json stored under `key`, or `null` if the key is unknown or nothing could be read
    pub fn get(&self, key: &str) -> Value {
        let Some(slot) = parse_key(key) else {
            return Value::Null;
        };
        self.storage
            .get(slot)
            .map(|value| value.to_json())
            .unwrap_or(Value::Null)
    }

    /// stores `value` under `key` if it fits the key's schema
    pub fn set(&self, key: &str, value: Value) -> bool {
        let Some(slot) = parse_key(key) else {
            return false;
        };
        match StoreValue::from_json(slot.key, value) {
            Ok(value) => self.storage.set(slot, &value),
            Err(_) => false,
        }
    }

    pub fn delete(&self, key: &str) -> bool {
        match parse_key(key) {
            Some(slot) => self.storage.delete(slot),
            None => false,
        }
    }

    pub fn into_storage(self) -> Box<dyn Storage> {
        self.storage
    }
}

fn parse_key(key: &str) -> Option<SlotKey> {
    match key.parse::<SlotKey>() {
        Ok(slot) => Some(slot),
        Err(e) => {
            log::warn!("Refusing storage access for {e:?}");
            None
        }
    }
}
