use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::{create_dir_all, remove_dir_all};
use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::model::error::store_errors::StoreError;
use crate::model::{SlotKey, StoreValue};
use crate::store::{Backend, DurableStore};

pub static TEST_STORE_NAME: &str = "test-data";

pub fn current_thread_name() -> String {
    let current_thread = std::thread::current();
    current_thread.name().unwrap().to_string()
}

/// every test gets its own directory, named after the thread running it
pub fn test_dir() -> PathBuf {
    PathBuf::from(format!(
        "./{}_wallet",
        current_thread_name().replace("::", "_")
    ))
}

/// removes anything left over from a previous run and creates a fresh [`test_dir`]
pub fn init_test_dir() -> PathBuf {
    cleanup();
    let dir = test_dir();
    create_dir_all(&dir).unwrap();
    dir
}

pub fn open_test_store() -> DurableStore {
    DurableStore::open(&test_dir(), TEST_STORE_NAME).unwrap()
}

pub fn test_store_path() -> PathBuf {
    test_dir().join(format!("{TEST_STORE_NAME}.sqlite"))
}

/// opens a second, raw connection to the store file so tests can tamper with it
pub fn raw_connection(path: &Path) -> Connection {
    Connection::open(path).unwrap()
}

/// makes every insert or update of `key` in the store file fail, the way a full disk would
pub fn fail_writes_to(key: &str, path: &Path) {
    let con = raw_connection(path);
    con.execute_batch(&format!(
        r"create trigger fail_insert_{key} before insert on KeyValueStore
        when new.key = '{key}'
        begin
            select raise(abort, 'simulated write failure');
        end;
        create trigger fail_update_{key} before update on KeyValueStore
        when new.key = '{key}'
        begin
            select raise(abort, 'simulated write failure');
        end;"
    ))
    .unwrap();
    con.close().unwrap();
}

pub fn cleanup() {
    remove_dir_all(test_dir()).unwrap_or(());
}

/// a [`Backend`] over a real [`DurableStore`] that fails chosen operations on chosen slots
pub struct FlakyBackend {
    pub store: DurableStore,
    pub failing_reads: RefCell<HashSet<SlotKey>>,
    pub failing_writes: RefCell<HashSet<SlotKey>>,
    pub failing_deletes: RefCell<HashSet<SlotKey>>,
}

impl FlakyBackend {
    pub fn new(store: DurableStore) -> FlakyBackend {
        FlakyBackend {
            store,
            failing_reads: RefCell::new(HashSet::new()),
            failing_writes: RefCell::new(HashSet::new()),
            failing_deletes: RefCell::new(HashSet::new()),
        }
    }

    pub fn fail_reads(&self, slot: SlotKey) {
        self.failing_reads.borrow_mut().insert(slot);
    }

    pub fn fail_writes(&self, slot: SlotKey) {
        self.failing_writes.borrow_mut().insert(slot);
    }

    pub fn fail_deletes(&self, slot: SlotKey) {
        self.failing_deletes.borrow_mut().insert(slot);
    }

    pub fn heal(&self) {
        self.failing_reads.borrow_mut().clear();
        self.failing_writes.borrow_mut().clear();
        self.failing_deletes.borrow_mut().clear();
    }
}

impl Backend for FlakyBackend {
    fn read(&self, slot: SlotKey) -> Result<StoreValue, StoreError> {
        if self.failing_reads.borrow().contains(&slot) {
            return Err(StoreError::StorageFault);
        }
        self.store.read(slot)
    }

    fn contains(&self, slot: SlotKey) -> Result<bool, StoreError> {
        if self.failing_reads.borrow().contains(&slot) {
            return Err(StoreError::StorageFault);
        }
        self.store.contains(slot)
    }

    fn write(&self, slot: SlotKey, value: &StoreValue) -> Result<(), StoreError> {
        if self.failing_writes.borrow().contains(&slot) {
            return Err(StoreError::StorageFault);
        }
        self.store.write(slot, value)
    }

    fn delete(&self, slot: SlotKey) -> Result<(), StoreError> {
        if self.failing_deletes.borrow().contains(&slot) {
            return Err(StoreError::StorageFault);
        }
        self.store.delete(slot)
    }

    fn close(self) -> Result<(), StoreError> {
        self.store.close()
    }
}

mod test_dir_tests {
    use super::*;

    #[test]
    fn test_dir_name_is_portable() {
        let dir = init_test_dir();
        let name = dir.file_name().unwrap().to_string_lossy().to_string();
        assert!(!name.contains(':'));
        assert_eq!(
            "test_test_dir_tests_test_dir_name_is_portable_wallet",
            name
        );
        assert!(dir.is_dir());
        cleanup();
        assert!(!dir.exists());
    }
}
