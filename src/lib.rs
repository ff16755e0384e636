//! Persistence for a personal code snippet wallet.
//!
//! Fragments (saved snippets), tags and the dark mode setting live in a [`store::DurableStore`],
//! reached through a [`gateway::Storage`] chosen once at startup, and exposed to the ui through a
//! [`bridge::StoreBridge`]. [`wallet::Wallet`] keeps the in-memory application state in sync with it.

pub mod bridge;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod store;
pub mod wallet;

#[cfg(test)]
mod test;

pub use bridge::StoreBridge;
pub use config::{load_config, parse_config, WalletConfig};
pub use gateway::{select_storage, Storage};
pub use store::DurableStore;
pub use wallet::Wallet;
