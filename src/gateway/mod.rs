use crate::config::{BackendChoice, WalletConfig};
use crate::model::error::store_errors::OpenStoreError;
use crate::model::{SlotKey, StoreValue};
use crate::store::DurableStore;

pub mod browser;
pub mod packaged;


pub use browser::BrowserStorage;
pub use packaged::PackagedStorage;

/// the environment a [`Storage`] was built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// backed by the durable store, with backup slot fallback
    Packaged,
    /// backed by plain local files, without fallback
    Browser,
}

/// the `get` / `set` / `delete` surface application state persists through.
///
/// Errors never cross this boundary: reads give `None` when nothing could be recovered,
/// writes and deletes report success as a `bool`
pub trait Storage {
    fn environment(&self) -> Environment;

    fn get(&self, slot: SlotKey) -> Option<StoreValue>;

    fn set(&self, slot: SlotKey, value: &StoreValue) -> bool;

    fn delete(&self, slot: SlotKey) -> bool;

    /// releases whatever the storage holds open. Returns `false` if that failed
    fn close(self: Box<Self>) -> bool;
}

/// builds the storage for this process, once, based on `config.storage.backend`.
///
/// With [`BackendChoice::Auto`] the durable store is used if it can be opened, and
/// browser storage inside the store directory is used otherwise
pub fn select_storage(config: &WalletConfig) -> Result<Box<dyn Storage>, OpenStoreError> {
    match config.storage.backend {
        BackendChoice::Packaged => {
            let store = DurableStore::open_with_config(&config.store)?;
            Ok(Box::new(PackagedStorage::new(store)))
        }
        BackendChoice::Browser => Ok(Box::new(BrowserStorage::open(
            &config.store.browser_dir(),
        )?)),
        BackendChoice::Auto => match DurableStore::open_with_config(&config.store) {
            Ok(store) => {
                log::info!("Using the durable store at {}", store.path().display());
                Ok(Box::new(PackagedStorage::new(store)))
            }
            Err(e) => {
                log::warn!("Durable store is unavailable ({e:?}), falling back to browser storage");
                Ok(Box::new(BrowserStorage::open(
                    &config.store.browser_dir(),
                )?))
            }
        },
    }
}
