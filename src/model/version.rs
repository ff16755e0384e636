use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::error::store_errors::ParseVersionError;

static VERSION_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\.(\d+)\.(\d+)$").unwrap());

/// the version of the stored data layout, compared field by field
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

/// a store that has never been migrated
pub const INITIAL_SCHEMA_VERSION: SchemaVersion = SchemaVersion::new(0, 0, 0);
/// the layout this build reads and writes
pub const CURRENT_SCHEMA_VERSION: SchemaVersion = SchemaVersion::new(1, 0, 0);

impl SchemaVersion {
    pub const fn new(major: u64, minor: u64, patch: u64) -> SchemaVersion {
        SchemaVersion {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl FromStr for SchemaVersion {
    type Err = ParseVersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || ParseVersionError::Malformed(s.to_string());
        let captures = VERSION_PATTERN.captures(s.trim()).ok_or_else(malformed)?;
        let part = |index: usize| captures[index].parse::<u64>().map_err(|_| malformed());
        Ok(SchemaVersion::new(part(1)?, part(2)?, part(3)?))
    }
}
