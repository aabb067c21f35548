use rentix_shared::{log_err_as_warn, storage::StoreKey};
use strum::IntoEnumIterator as _;

use super::TokenStore;

/// Backed by the browser's local storage. Only touches the keys in
/// [`StoreKey`] so other data on the same origin is left alone
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageTokenStore;

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

impl TokenStore for LocalStorageTokenStore {
    fn get(&self, key: StoreKey) -> Option<String> {
        local_storage()?.get_item(key.as_str()).ok().flatten()
    }

    fn set(&self, key: StoreKey, value: &str) {
        if let Some(storage) = local_storage() {
            log_err_as_warn!(storage.set_item(key.as_str(), value));
        }
    }

    fn remove(&self, key: StoreKey) {
        if let Some(storage) = local_storage() {
            log_err_as_warn!(storage.remove_item(key.as_str()));
        }
    }

    fn clear(&self) {
        if let Some(storage) = local_storage() {
            for key in StoreKey::iter() {
                log_err_as_warn!(storage.remove_item(key.as_str()));
            }
        }
    }
}
