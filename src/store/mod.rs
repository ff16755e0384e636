use std::backtrace::Backtrace;
use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::{Connection, OpenFlags};

use crate::config::StoreConfig;
use crate::model::error::store_errors::{OpenStoreError, StoreError};
use crate::model::{
    SchemaVersion, SlotKey, StoreValue, CURRENT_SCHEMA_VERSION, INITIAL_SCHEMA_VERSION,
};

pub mod migrations;
pub mod repository;


/// raw read / write / delete access to a medium holding the store's slots.
///
/// [`DurableStore`] is the real implementation; the gateway only depends on this trait
pub trait Backend {
    /// returns the value in `slot`, or the default for its key if nothing valid is stored there
    fn read(&self, slot: SlotKey) -> Result<StoreValue, StoreError>;

    /// whether anything is stored in `slot`, as opposed to it reading as the default
    fn contains(&self, slot: SlotKey) -> Result<bool, StoreError>;

    /// validates `value` against the schema of `slot` and persists it before returning
    fn write(&self, slot: SlotKey, value: &StoreValue) -> Result<(), StoreError>;

    /// removes the value in `slot`, so it reads as the default afterwards
    fn delete(&self, slot: SlotKey) -> Result<(), StoreError>;

    /// releases the medium
    fn close(self) -> Result<(), StoreError>
    where
        Self: Sized,
    {
        Ok(())
    }
}

/// the schema-validating key-value store, kept in a single sqlite file
pub struct DurableStore {
    con: Connection,
    path: PathBuf,
}

impl DurableStore {
    /// opens (creating if needed) `<location>/<name>.sqlite`, then brings it up to [`CURRENT_SCHEMA_VERSION`]
    /// and clears out anything that doesn't match the schema.
    ///
    /// Nothing can be read or written through the returned store before that has finished
    pub fn open(location: &Path, name: &str) -> Result<DurableStore, OpenStoreError> {
        if let Err(e) = fs::create_dir_all(location) {
            log::error!(
                "Failed to create store directory {}: {e:?}\n{}",
                location.display(),
                Backtrace::force_capture()
            );
            return Err(OpenStoreError::CreateDirectory);
        }
        let path = location.join(format!("{name}.sqlite"));
        let con = match Connection::open_with_flags(&path, OpenFlags::default()) {
            Ok(con) => con,
            Err(e) => {
                log::error!(
                    "Failed to open store at {}: {e:?}\n{}",
                    path.display(),
                    Backtrace::force_capture()
                );
                return Err(OpenStoreError::Connection);
            }
        };
        let store = DurableStore { con, path };
        store.initialize()?;
        Ok(store)
    }

    pub fn open_with_config(config: &StoreConfig) -> Result<DurableStore, OpenStoreError> {
        DurableStore::open(&config.location, &config.name)
    }

    /// where the store file lives
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// handles checking if the store has its tables and is up to the correct version.
    /// If not, it either creates or upgrades the store accordingly
    fn initialize(&self) -> Result<(), OpenStoreError> {
        if let Err(e) = repository::create_tables(&self.con) {
            log::error!(
                "Failed to create tables in {}: {e:?}\n{}",
                self.path.display(),
                Backtrace::force_capture()
            );
            return Err(OpenStoreError::Initialize);
        }
        let version = self
            .schema_version()
            .map_err(|_| OpenStoreError::Initialize)?;
        self.migrate(version, CURRENT_SCHEMA_VERSION)
            .map_err(|_| OpenStoreError::Migration)?;
        self.clear_invalid_entries()
            .map_err(|_| OpenStoreError::Initialize)?;
        Ok(())
    }

    /// the schema version the stored data is in. A store that was never migrated is at [`INITIAL_SCHEMA_VERSION`]
    pub fn schema_version(&self) -> Result<SchemaVersion, StoreError> {
        match repository::get_schema_version(&self.con) {
            Ok(Some(raw)) => Ok(raw.parse().unwrap_or_else(|e| {
                log::warn!("Stored schema version is unreadable ({e:?}), treating the store as unmigrated");
                INITIAL_SCHEMA_VERSION
            })),
            Ok(None) => Ok(INITIAL_SCHEMA_VERSION),
            Err(e) => {
                log::error!(
                    "Failed to read schema version: {e:?}\n{}",
                    Backtrace::force_capture()
                );
                Err(StoreError::StorageFault)
            }
        }
    }

    /// runs every migration newer than `from` up to and including `to`
    pub fn migrate(&self, from: SchemaVersion, to: SchemaVersion) -> Result<(), StoreError> {
        migrations::migrate_store(&self.con, from, to)
    }

    /// returns the value in `slot`, or the default for its key if nothing is stored there.
    ///
    /// Stored fragments or tags that don't match the schema are skipped one by one. A stored value that can't
    /// be read at all is removed and the default is returned in its place.
    ///
    /// # Returns
    /// - `Ok(StoreValue)`: the stored value or the default
    /// - `Err(StoreError::StorageFault)`: if the store file could not be read
    pub fn read(&self, slot: SlotKey) -> Result<StoreValue, StoreError> {
        let name = slot.to_string();
        let raw = match repository::get_value(&name, &self.con) {
            Ok(raw) => raw,
            Err(e) => {
                log::error!(
                    "Failed to read {name} from the store: {e:?}\n{}",
                    Backtrace::force_capture()
                );
                return Err(StoreError::StorageFault);
            }
        };
        let Some(raw) = raw else {
            return Ok(StoreValue::default_for(slot.key));
        };
        match StoreValue::from_stored_json_str(slot.key, &raw) {
            Ok(value) => Ok(value),
            Err(_) => {
                log::warn!("Resetting {name} to its default because the stored value is invalid");
                self.delete(slot)?;
                Ok(StoreValue::default_for(slot.key))
            }
        }
    }

    /// whether anything is stored in `slot`
    pub fn contains(&self, slot: SlotKey) -> Result<bool, StoreError> {
        match repository::get_value(&slot.to_string(), &self.con) {
            Ok(raw) => Ok(raw.is_some()),
            Err(e) => {
                log::error!(
                    "Failed to check {slot} in the store: {e:?}\n{}",
                    Backtrace::force_capture()
                );
                Err(StoreError::StorageFault)
            }
        }
    }

    /// persists `value` in `slot`. Values for a different key are rejected without touching the store
    pub fn write(&self, slot: SlotKey, value: &StoreValue) -> Result<(), StoreError> {
        if !value.matches(slot.key) {
            log::error!(
                "Refusing to write a {} value to {slot}\n{}",
                value.key(),
                Backtrace::force_capture()
            );
            return Err(StoreError::SchemaViolation);
        }
        if let Err(e) = repository::set_value(&slot.to_string(), &value.to_json().to_string(), &self.con)
        {
            log::error!(
                "Failed to write {slot} to the store: {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(StoreError::StorageFault);
        }
        Ok(())
    }

    /// removes the value in `slot`. Removing a slot that holds nothing succeeds
    pub fn delete(&self, slot: SlotKey) -> Result<(), StoreError> {
        if let Err(e) = repository::delete_value(&slot.to_string(), &self.con) {
            log::error!(
                "Failed to delete {slot} from the store: {e:?}\n{}",
                Backtrace::force_capture()
            );
            return Err(StoreError::StorageFault);
        }
        Ok(())
    }

    /// removes every stored row whose key is unknown or whose value doesn't match its key's schema.
    ///
    /// returns how many rows were removed
    pub fn clear_invalid_entries(&self) -> Result<usize, StoreError> {
        let rows = repository::get_all_values(&self.con).map_err(|e| {
            log::error!(
                "Failed to list stored values: {e:?}\n{}",
                Backtrace::force_capture()
            );
            StoreError::StorageFault
        })?;
        let mut removed = 0;
        for (key, raw) in rows {
            let valid = match key.parse::<SlotKey>() {
                Ok(slot) => StoreValue::from_stored_json_str(slot.key, &raw).is_ok(),
                Err(_) => false,
            };
            if valid {
                continue;
            }
            log::warn!("Clearing invalid stored value for {key}");
            if let Err(e) = repository::delete_value(&key, &self.con) {
                log::error!(
                    "Failed to clear {key}: {e:?}\n{}",
                    Backtrace::force_capture()
                );
                return Err(StoreError::StorageFault);
            }
            removed += 1;
        }
        Ok(removed)
    }

    /// closes the connection to the store file
    pub fn close(self) -> Result<(), StoreError> {
        self.con.close().map_err(|(_, e)| {
            log::error!(
                "Failed to close the store: {e:?}\n{}",
                Backtrace::force_capture()
            );
            StoreError::StorageFault
        })
    }
}

impl Backend for DurableStore {
    fn read(&self, slot: SlotKey) -> Result<StoreValue, StoreError> {
        DurableStore::read(self, slot)
    }

    fn contains(&self, slot: SlotKey) -> Result<bool, StoreError> {
        DurableStore::contains(self, slot)
    }

    fn write(&self, slot: SlotKey, value: &StoreValue) -> Result<(), StoreError> {
        DurableStore::write(self, slot, value)
    }

    fn delete(&self, slot: SlotKey) -> Result<(), StoreError> {
        DurableStore::delete(self, slot)
    }

    fn close(self) -> Result<(), StoreError> {
        DurableStore::close(self)
    }
}
