use std::backtrace::Backtrace;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::gateway::{Environment, Storage};
use crate::model::error::store_errors::OpenStoreError;
use crate::model::{SlotKey, StoreValue};

/// storage with browser local storage semantics: one json file per slot in a directory.
///
/// Anything missing or unreadable reads as the default for its key, and there is no backup slot fallback
pub struct BrowserStorage {
    dir: PathBuf,
}

impl BrowserStorage {
    pub fn open(dir: &Path) -> Result<BrowserStorage, OpenStoreError> {
        if let Err(e) = fs::create_dir_all(dir) {
            log::error!(
                "Failed to create browser storage directory {}: {e:?}\n{}",
                dir.display(),
                Backtrace::force_capture()
            );
            return Err(OpenStoreError::CreateDirectory);
        }
        Ok(BrowserStorage {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn slot_path(&self, slot: SlotKey) -> PathBuf {
        self.dir.join(format!("{slot}.json"))
    }

    fn write_file(path: &Path, contents: &str) -> std::io::Result<()> {
        let mut file = File::create(path)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()
    }
}

impl Storage for BrowserStorage {
    fn environment(&self) -> Environment {
        Environment::Browser
    }

    fn get(&self, slot: SlotKey) -> Option<StoreValue> {
        let default = StoreValue::default_for(slot.key);
        let raw = match fs::read_to_string(self.slot_path(slot)) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Some(default),
            Err(e) => {
                log::warn!("Failed to read {slot} from browser storage: {e:?}");
                return Some(default);
            }
        };
        Some(StoreValue::from_stored_json_str(slot.key, &raw).unwrap_or(default))
    }

    fn set(&self, slot: SlotKey, value: &StoreValue) -> bool {
        if !value.matches(slot.key) {
            log::error!("Refusing to write a {} value to {slot}", value.key());
            return false;
        }
        match BrowserStorage::write_file(&self.slot_path(slot), &value.to_json().to_string()) {
            Ok(()) => true,
            Err(e) => {
                log::error!(
                    "Failed to write {slot} to browser storage: {e:?}\n{}",
                    Backtrace::force_capture()
                );
                false
            }
        }
    }

    fn delete(&self, slot: SlotKey) -> bool {
        match fs::remove_file(self.slot_path(slot)) {
            Ok(()) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => true,
            Err(e) => {
                log::error!(
                    "Failed to delete {slot} from browser storage: {e:?}\n{}",
                    Backtrace::force_capture()
                );
                false
            }
        }
    }

    fn close(self: Box<Self>) -> bool {
        true
    }
}
