use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::error::store_errors::ParseKeyError;

static BACKUP_PREFIX: &str = "backup_";

static SLOT_KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new("^(backup_)?(fragments|tags|darkMode)$").unwrap());

/// the three named values the store knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKey {
    Fragments,
    Tags,
    DarkMode,
}

impl StoreKey {
    pub const ALL: [StoreKey; 3] = [StoreKey::Fragments, StoreKey::Tags, StoreKey::DarkMode];

    /// the name the key is persisted under
    pub fn name(&self) -> &'static str {
        match self {
            StoreKey::Fragments => "fragments",
            StoreKey::Tags => "tags",
            StoreKey::DarkMode => "darkMode",
        }
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// a place a value can be stored in: either the primary slot for a key, or its shadow `backup_` slot.
///
/// Both slots share the schema of their [`StoreKey`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotKey {
    pub key: StoreKey,
    pub backup: bool,
}

impl SlotKey {
    pub const fn primary(key: StoreKey) -> SlotKey {
        SlotKey { key, backup: false }
    }

    pub const fn backup_of(key: StoreKey) -> SlotKey {
        SlotKey { key, backup: true }
    }

    /// the backup slot for the same key. A backup slot maps to itself
    pub fn to_backup(self) -> SlotKey {
        SlotKey::backup_of(self.key)
    }

    /// every primary and backup slot
    pub fn all() -> impl Iterator<Item = SlotKey> {
        StoreKey::ALL
            .into_iter()
            .flat_map(|key| [SlotKey::primary(key), SlotKey::backup_of(key)])
    }
}

impl From<StoreKey> for SlotKey {
    fn from(key: StoreKey) -> Self {
        SlotKey::primary(key)
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.backup {
            write!(f, "{BACKUP_PREFIX}{}", self.key)
        } else {
            write!(f, "{}", self.key)
        }
    }
}

impl FromStr for SlotKey {
    type Err = ParseKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some(captures) = SLOT_KEY_PATTERN.captures(s) else {
            return Err(ParseKeyError::UnknownKey(s.to_string()));
        };
        let key = match &captures[2] {
            "fragments" => StoreKey::Fragments,
            "tags" => StoreKey::Tags,
            _ => StoreKey::DarkMode,
        };
        Ok(SlotKey {
            key,
            backup: captures.get(1).is_some(),
        })
    }
}
