//! Session persistence.
//!
//! The file backend keeps two entries side by side, the mnemonic as plain
//! text and the wallet list as a JSON array of wallet records. Loading does
//! not validate records; that happens in `WalletSession::restore`.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::core::errors::{WalletError, WalletResult};
use crate::core::key_deriver::Wallet;
use crate::core::session::SessionSnapshot;
use crate::security::vec_to_secret;

pub const MNEMONIC_FILE: &str = "mnemonic";
pub const WALLETS_FILE: &str = "wallets.json";

#[async_trait]
pub trait SessionStorage: Send + Sync {
    /// Persisted state, or `None` when nothing has been saved yet.
    async fn load(&self) -> WalletResult<Option<SessionSnapshot>>;
    async fn save(&self, snapshot: &SessionSnapshot) -> WalletResult<()>;
    async fn clear(&self) -> WalletResult<()>;
}

#[derive(Debug, Clone)]
pub struct FileSessionStorage {
    dir: PathBuf,
}

impl FileSessionStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn mnemonic_path(&self) -> PathBuf {
        self.dir.join(MNEMONIC_FILE)
    }

    fn wallets_path(&self) -> PathBuf {
        self.dir.join(WALLETS_FILE)
    }

    async fn read_optional(path: &Path) -> WalletResult<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(WalletError::StorageError(format!("{}: {}", path.display(), e))),
        }
    }

    /// Write via a sibling temp file and rename so readers never see a
    /// half-written file. On unix the temp file is created 0o600, so the
    /// contents are never readable by other users.
    async fn write_atomic(path: &Path, contents: &[u8]) -> WalletResult<()> {
        let tmp = path.with_extension("tmp");
        Self::remove_if_exists(&tmp).await?;

        let tmp_owned = tmp.clone();
        let data = vec_to_secret(contents.to_vec());
        tokio::task::spawn_blocking(move || Self::write_private(&tmp_owned, &data))
            .await
            .map_err(|e| WalletError::StorageError(format!("write task failed: {}", e)))?
            .map_err(|e| WalletError::StorageError(format!("{}: {}", tmp.display(), e)))?;

        tokio::fs::rename(&tmp, path)
            .await
            .map_err(|e| WalletError::StorageError(format!("{}: {}", path.display(), e)))
    }

    fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
        use std::io::Write;

        let mut options = std::fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(path)?;
        file.write_all(contents)?;
        file.sync_all()
    }

    async fn remove_if_exists(path: &Path) -> WalletResult<()> {
        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(WalletError::StorageError(format!("{}: {}", path.display(), e))),
        }
    }
}

#[async_trait]
impl SessionStorage for FileSessionStorage {
    async fn load(&self) -> WalletResult<Option<SessionSnapshot>> {
        let mnemonic = Self::read_optional(&self.mnemonic_path())
            .await?
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        let wallets = match Self::read_optional(&self.wallets_path()).await? {
            Some(raw) => serde_json::from_str::<Vec<Wallet>>(&raw).map_err(|e| {
                WalletError::SerializationError(format!("{}: {}", WALLETS_FILE, e))
            })?,
            None => Vec::new(),
        };

        if mnemonic.is_none() && wallets.is_empty() {
            debug!(dir = %self.dir.display(), "No stored session");
            return Ok(None);
        }
        debug!(dir = %self.dir.display(), wallets = wallets.len(), "Loaded stored session");
        Ok(Some(SessionSnapshot { mnemonic, wallets }))
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> WalletResult<()> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| WalletError::StorageError(format!("{}: {}", self.dir.display(), e)))?;

        match snapshot.mnemonic.as_deref() {
            Some(phrase) => Self::write_atomic(&self.mnemonic_path(), phrase.as_bytes()).await?,
            None => Self::remove_if_exists(&self.mnemonic_path()).await?,
        }
        let json = serde_json::to_vec_pretty(&snapshot.wallets)?;
        Self::write_atomic(&self.wallets_path(), &json).await?;

        info!(dir = %self.dir.display(), wallets = snapshot.wallets.len(), "Session saved");
        Ok(())
    }

    async fn clear(&self) -> WalletResult<()> {
        Self::remove_if_exists(&self.mnemonic_path()).await?;
        Self::remove_if_exists(&self.wallets_path()).await?;
        info!(dir = %self.dir.display(), "Stored session cleared");
        Ok(())
    }
}

/// In-process storage, mostly for tests.
#[derive(Debug, Default)]
pub struct MemorySessionStorage {
    inner: Mutex<Option<SessionSnapshot>>,
}

impl MemorySessionStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStorage for MemorySessionStorage {
    async fn load(&self) -> WalletResult<Option<SessionSnapshot>> {
        Ok(self.inner.lock().clone())
    }

    async fn save(&self, snapshot: &SessionSnapshot) -> WalletResult<()> {
        *self.inner.lock() = Some(snapshot.clone());
        Ok(())
    }

    async fn clear(&self) -> WalletResult<()> {
        *self.inner.lock() = None;
        Ok(())
    }
}
