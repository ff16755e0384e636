use std::backtrace::Backtrace;

use crate::gateway::{Environment, Storage};
use crate::model::error::store_errors::StoreError;
use crate::model::{SlotKey, StoreValue};
use crate::store::{Backend, DurableStore};

/// storage over a [`Backend`], adding a single retry against the slot's `backup_` twin.
///
/// - reads that fault are answered from the backup slot, if one was written, which is then copied back to the primary slot
/// - writes that fault are saved to the backup slot instead
/// - deletes are never retried
pub struct PackagedStorage<B: Backend = DurableStore> {
    backend: B,
}

impl<B: Backend> PackagedStorage<B> {
    pub fn new(backend: B) -> PackagedStorage<B> {
        PackagedStorage { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn into_backend(self) -> B {
        self.backend
    }

    /// answers a failed read of `slot` from its backup slot, copying the backup back into `slot`.
    ///
    /// A backup slot that was never written holds nothing to recover, so `slot` is left untouched
    fn recover_from_backup(&self, slot: SlotKey) -> Option<StoreValue> {
        let backup = slot.to_backup();
        match self.backend.contains(backup) {
            Ok(true) => {}
            Ok(false) => {
                log::error!("No {backup} to recover {slot} from");
                return None;
            }
            Err(e) => {
                log::error!(
                    "Failed to check {backup} as well, nothing to recover {slot} from: {e:?}\n{}",
                    Backtrace::force_capture()
                );
                return None;
            }
        }
        let value = match self.backend.read(backup) {
            Ok(value) => value,
            Err(e) => {
                log::error!(
                    "Failed to read {backup} as well, nothing to recover {slot} from: {e:?}\n{}",
                    Backtrace::force_capture()
                );
                return None;
            }
        };
        match self.backend.write(slot, &value) {
            Ok(()) => log::info!("Restored {slot} from {backup}"),
            Err(e) => log::warn!("Recovered {slot} from {backup} but could not save it back: {e:?}"),
        }
        Some(value)
    }
}

impl<B: Backend> Storage for PackagedStorage<B> {
    fn environment(&self) -> Environment {
        Environment::Packaged
    }

    fn get(&self, slot: SlotKey) -> Option<StoreValue> {
        match self.backend.read(slot) {
            Ok(value) => Some(value),
            Err(e) => {
                log::error!(
                    "Read error for {slot}: {e:?}\n{}",
                    Backtrace::force_capture()
                );
                if slot.backup {
                    return None;
                }
                self.recover_from_backup(slot)
            }
        }
    }

    fn set(&self, slot: SlotKey, value: &StoreValue) -> bool {
        match self.backend.write(slot, value) {
            Ok(()) => true,
            Err(StoreError::SchemaViolation) => false,
            Err(StoreError::StorageFault) if slot.backup => false,
            Err(StoreError::StorageFault) => {
                let backup = slot.to_backup();
                log::error!(
                    "Save error for {slot}, saving to {backup} instead\n{}",
                    Backtrace::force_capture()
                );
                match self.backend.write(backup, value) {
                    Ok(()) => true,
                    Err(e) => {
                        log::error!("Failed to save {backup} as well: {e:?}");
                        false
                    }
                }
            }
        }
    }

    fn delete(&self, slot: SlotKey) -> bool {
        match self.backend.delete(slot) {
            Ok(()) => true,
            Err(e) => {
                log::error!(
                    "Delete error for {slot}: {e:?}\n{}",
                    Backtrace::force_capture()
                );
                false
            }
        }
    }

    fn close(self: Box<Self>) -> bool {
        self.backend.close().is_ok()
    }
}
