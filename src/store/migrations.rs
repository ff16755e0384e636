use std::backtrace::Backtrace;

use rusqlite::Connection;

use crate::model::error::store_errors::StoreError;
use crate::model::{SchemaVersion, SlotKey, StoreKey, StoreValue};
use crate::store::repository;

type Migration = fn(&Connection) -> Result<(), StoreError>;

/// every migration step, in ascending version order
static MIGRATIONS: [(SchemaVersion, Migration); 1] =
    [(SchemaVersion::new(1, 0, 0), migrate_v1_0_0 as Migration)];

/// incrementally upgrades the store for each version between `from` (exclusive) and `to` (inclusive),
/// then records `to` as the store's schema version.
///
/// Everything happens in one transaction, so a failed step leaves the store exactly as it was.
/// If `from` is not older than `to` nothing happens; the recorded version never moves backwards
pub fn migrate_store(
    con: &Connection,
    from: SchemaVersion,
    to: SchemaVersion,
) -> Result<(), StoreError> {
    if from >= to {
        return Ok(());
    }
    let tx = con.unchecked_transaction().map_err(|e| {
        log::error!(
            "Failed to start a migration transaction: {e:?}\n{}",
            Backtrace::force_capture()
        );
        StoreError::StorageFault
    })?;
    for &(version, migration) in MIGRATIONS.iter() {
        if from < version && version <= to {
            log_migration_version(&version);
            migration(&tx)?;
        }
    }
    if let Err(e) = repository::set_schema_version(&to.to_string(), &tx) {
        log::error!(
            "Failed to record schema version {to}: {e:?}\n{}",
            Backtrace::force_capture()
        );
        return Err(StoreError::StorageFault);
    }
    tx.commit().map_err(|e| {
        log::error!(
            "Failed to commit migration to {to}: {e:?}\n{}",
            Backtrace::force_capture()
        );
        StoreError::StorageFault
    })
}

fn log_migration_version(_version: &SchemaVersion) {
    #[cfg(not(test))]
    log::info!("Migrating store to v{_version}...");
}

/// re-reads and re-writes fragments and tags so they are stored in the current shape
fn migrate_v1_0_0(con: &Connection) -> Result<(), StoreError> {
    normalize_slot(SlotKey::primary(StoreKey::Fragments), con)?;
    normalize_slot(SlotKey::primary(StoreKey::Tags), con)
}

/// decodes and re-encodes the value in `slot`, dropping entries that don't match the schema.
/// Missing or unreadable values are written out as the default
fn normalize_slot(slot: SlotKey, con: &Connection) -> Result<(), StoreError> {
    let name = slot.to_string();
    let raw = repository::get_value(&name, con).map_err(|e| {
        log::error!(
            "Failed to read {name} for migration: {e:?}\n{}",
            Backtrace::force_capture()
        );
        StoreError::StorageFault
    })?;
    let value = raw
        .and_then(|raw| StoreValue::from_stored_json_str(slot.key, &raw).ok())
        .unwrap_or_else(|| StoreValue::default_for(slot.key));
    repository::set_value(&name, &value.to_json().to_string(), con).map_err(|e| {
        log::error!(
            "Failed to write {name} for migration: {e:?}\n{}",
            Backtrace::force_capture()
        );
        StoreError::StorageFault
    })
}
