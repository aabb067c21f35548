use anyhow::Context;
use rentix_shared::{log_err_as_error, storage::StoreKey};
use std::{
    collections::BTreeMap,
    fmt::Debug,
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};
use tracing::{info, instrument};

use super::{apply_changes, TokenStore};

/// Keeps the values in a RON file so they survive restarts. Every change is
/// written out immediately through a temporary file so a crash never leaves a
/// half written file behind
pub struct FileTokenStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<StoreKey, String>>,
}

impl FileTokenStore {
    /// A missing file is treated as an empty store
    #[instrument]
    pub fn open(path: impl Into<PathBuf> + Debug) -> anyhow::Result<Self> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => ron::from_str(&contents)
                .with_context(|| format!("failed to parse token file: {path:?}"))?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!("No token file found, starting empty");
                BTreeMap::new()
            }
            Err(err) => {
                return Err(err).with_context(|| format!("failed to read token file: {path:?}"))
            }
        };
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<StoreKey, String>) -> anyhow::Result<()> {
        if entries.is_empty() {
            return match fs::remove_file(&self.path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
                Err(err) => Err(err).context("failed to remove token file"),
            };
        }
        let contents = ron::ser::to_string_pretty(entries, ron::ser::PrettyConfig::default())
            .context("failed to serialize tokens to ron")?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, contents)
            .with_context(|| format!("failed to write token file: {tmp_path:?}"))?;
        fs::rename(&tmp_path, &self.path)
            .with_context(|| format!("failed to move token file into place: {:?}", self.path))?;
        Ok(())
    }

    fn mutate(&self, f: impl FnOnce(&mut BTreeMap<StoreKey, String>)) {
        let mut entries = self.entries.lock().expect("mutex poisoned");
        f(&mut entries);
        log_err_as_error!(self.persist(&entries), "failed to save the session file");
    }
}

impl Debug for FileTokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileTokenStore")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl TokenStore for FileTokenStore {
    fn get(&self, key: StoreKey) -> Option<String> {
        self.entries.lock().expect("mutex poisoned").get(&key).cloned()
    }

    fn set(&self, key: StoreKey, value: &str) {
        self.mutate(|entries| {
            entries.insert(key, value.to_string());
        });
    }

    fn remove(&self, key: StoreKey) {
        self.mutate(|entries| {
            entries.remove(&key);
        });
    }

    fn clear(&self) {
        self.mutate(|entries| entries.clear());
    }

    fn update_many(&self, changes: &[(StoreKey, Option<&str>)]) {
        self.mutate(|entries| apply_changes(entries, changes));
    }
}
