//! Durable store: tables mirrored to a single file on disk.
//!
//! This is what lets a session be restored after a restart. The
//! in-memory session is lost when the process exits, but the admin
//! license it was derived from is still in the file, and the session
//! coordinator re-adopts it on the next start.
//!
//! # Write protocol
//!
//! Every mutation takes an exclusive lock on `<path>.lock`, re-reads the
//! file, applies the change to what it read, writes the result to
//! `<path>.tmp` and renames it over `<path>`. Several handles (or
//! processes) may share one path: each mutation starts from the latest
//! committed file, never from a snapshot taken at open time.
//!
//! Reads load the file without taking the lock. The rename is atomic,
//! so a reader sees either the previous or the next state.

use std::path::{Path, PathBuf};

use chrono::Utc;
use fs2::FileExt;
use tokio::sync::Mutex;

use crate::tables::Tables;
use crate::{Codec, JsonCodec, Record, RecordStore, StoreError};

/// A [`RecordStore`] persisted to one file through a [`Codec`].
#[derive(Debug)]
pub struct FileStore<C: Codec = JsonCodec> {
    path: PathBuf,
    codec: C,
    /// Queues this handle's own writers so they don't each park a
    /// blocking thread on the file lock.
    writer: Mutex<()>,
}

impl FileStore<JsonCodec> {
    /// Opens (or prepares to create) a JSON store file at `path`.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with_codec(path, JsonCodec).await
    }
}

impl<C: Codec> FileStore<C> {
    /// Opens a store file using a custom codec.
    ///
    /// A missing file is not an error: the store starts empty and the
    /// file is created by the first mutation. An existing file must
    /// decode, so a corrupt store is reported here rather than on the
    /// first read.
    pub async fn open_with_codec(
        path: impl AsRef<Path>,
        codec: C,
    ) -> Result<Self, StoreError> {
        let store = Self {
            path: path.as_ref().to_path_buf(),
            codec,
            writer: Mutex::new(()),
        };
        store.load().await?;

        tracing::info!(path = %store.path.display(), "record store opened");
        Ok(store)
    }

    /// The file this store persists to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the committed tables. A missing file reads as empty.
    async fn load(&self) -> Result<Tables, StoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => self.codec.decode(&bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "store file absent, reading as empty");
                Ok(Tables::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Applies `op` to the tables currently on disk and persists the
    /// result, all under the exclusive file lock.
    async fn mutate<T>(
        &self,
        op: impl FnOnce(&mut Tables) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let _writer = self.writer.lock().await;
        self.ensure_parent().await?;
        // Released when the handle is dropped at the end of this scope.
        let _lock = self.lock_exclusive().await?;

        let mut tables = self.load().await?;
        let out = op(&mut tables)?;
        self.persist(&tables).await?;
        Ok(out)
    }

    async fn ensure_parent(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        Ok(())
    }

    /// Opens `<path>.lock` and blocks (off the async runtime) until the
    /// exclusive lock on it is granted.
    async fn lock_exclusive(&self) -> Result<std::fs::File, StoreError> {
        let lock_path = self.path.with_extension("lock");
        let locked = tokio::task::spawn_blocking(move || {
            let file = std::fs::OpenOptions::new()
                .read(true)
                .write(true)
                .create(true)
                .truncate(false)
                .open(&lock_path)?;
            file.lock_exclusive()?;
            Ok::<_, std::io::Error>(file)
        })
        .await
        .map_err(std::io::Error::other)??;
        Ok(locked)
    }

    async fn persist(&self, tables: &Tables) -> Result<(), StoreError> {
        let bytes = self.codec.encode(tables)?;
        let tmp = self.path.with_extension("tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

impl<C: Codec> RecordStore for FileStore<C> {
    async fn get_all<R: Record>(&self) -> Result<Vec<R>, StoreError> {
        self.load().await?.get_all()
    }

    async fn get<R: Record>(&self, key: &str) -> Result<Option<R>, StoreError> {
        self.load().await?.get(key)
    }

    async fn create<R: Record>(&self, record: R) -> Result<R, StoreError> {
        let now = Utc::now();
        self.mutate(move |tables| tables.create(record, now)).await
    }

    async fn update<R: Record>(&self, record: &R) -> Result<R, StoreError> {
        let now = Utc::now();
        self.mutate(|tables| tables.update(record, now)).await
    }

    async fn delete<R: Record>(&self, key: &str) -> Result<(), StoreError> {
        self.mutate(|tables| tables.delete::<R>(key)).await
    }

    async fn count<R: Record>(&self) -> Result<usize, StoreError> {
        Ok(self.load().await?.count::<R>())
    }
}
