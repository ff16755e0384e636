
use crate::gateway::{PackagedStorage, Storage};
use crate::test::open_test_store;
use crate::wallet::Wallet;

fn open_wallet() -> Wallet {
    Wallet::load(Box::new(PackagedStorage::new(open_test_store())))
}

fn reopen(wallet: Wallet) -> Wallet {
    assert!(wallet.into_storage().close());
    open_wallet()
}

fn close(wallet: Wallet) {
    let storage: Box<dyn Storage> = wallet.into_storage();
    assert!(storage.close());
}
