//! Durable client side key value storage for the session credentials.
//!
//! Nothing here validates or expires values, the stores only remember them
//! across restarts (or page reloads on the web)

mod file;
#[cfg(target_arch = "wasm32")]
mod web;

use std::{collections::BTreeMap, fmt::Debug, sync::Arc, sync::Mutex};

use rentix_shared::storage::{StoreKey, ThemePreference};

pub use file::FileTokenStore;
#[cfg(target_arch = "wasm32")]
pub use web::LocalStorageTokenStore;

pub type SharedTokenStore = Arc<dyn TokenStore>;

pub trait TokenStore: Debug + Send + Sync {
    fn get(&self, key: StoreKey) -> Option<String>;

    fn set(&self, key: StoreKey, value: &str);

    fn remove(&self, key: StoreKey);

    /// Removes every [`StoreKey`]
    fn clear(&self);

    /// Applies all changes as one write, `None` removes the key. Stores that
    /// can be observed mid update must override this
    fn update_many(&self, changes: &[(StoreKey, Option<&str>)]) {
        for (key, value) in changes {
            match value {
                Some(value) => self.set(*key, value),
                None => self.remove(*key),
            }
        }
    }

    fn theme_preference(&self) -> ThemePreference {
        self.get(StoreKey::ThemePreference)
            .and_then(|value| value.parse().ok())
            .unwrap_or_default()
    }

    fn set_theme_preference(&self, theme: ThemePreference) {
        self.set(StoreKey::ThemePreference, &theme.to_string());
    }
}

/// Lost when the process exits. Used for tests and when nothing should touch
/// the disk
#[derive(Default)]
pub struct MemoryTokenStore {
    entries: Mutex<BTreeMap<StoreKey, String>>,
}

impl MemoryTokenStore {
    pub fn shared() -> SharedTokenStore {
        Arc::new(Self::default())
    }
}

impl Debug for MemoryTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let keys: Vec<StoreKey> = self
            .entries
            .lock()
            .map(|entries| entries.keys().copied().collect())
            .unwrap_or_default();
        f.debug_struct("MemoryTokenStore")
            .field("keys", &keys)
            .finish()
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self, key: StoreKey) -> Option<String> {
        self.entries.lock().expect("mutex poisoned").get(&key).cloned()
    }

    fn set(&self, key: StoreKey, value: &str) {
        self.entries
            .lock()
            .expect("mutex poisoned")
            .insert(key, value.to_string());
    }

    fn remove(&self, key: StoreKey) {
        self.entries.lock().expect("mutex poisoned").remove(&key);
    }

    fn clear(&self) {
        self.entries.lock().expect("mutex poisoned").clear();
    }

    fn update_many(&self, changes: &[(StoreKey, Option<&str>)]) {
        let mut entries = self.entries.lock().expect("mutex poisoned");
        apply_changes(&mut entries, changes);
    }
}

fn apply_changes(entries: &mut BTreeMap<StoreKey, String>, changes: &[(StoreKey, Option<&str>)]) {
    for (key, value) in changes {
        match value {
            Some(value) => {
                entries.insert(*key, value.to_string());
            }
            None => {
                entries.remove(key);
            }
        }
    }
}
