pub mod error;
pub mod keys;
pub mod records;
pub mod values;
pub mod version;

#[cfg(test)]
mod tests;

// make it easier to just use models
pub use keys::{SlotKey, StoreKey};
pub use records::{Fragment, RecordId, Tag, TagId};
pub use values::StoreValue;
pub use version::{SchemaVersion, CURRENT_SCHEMA_VERSION, INITIAL_SCHEMA_VERSION};
