//! Disk-backed storage for named asset caches.
//!
//! Each cache is a directory under the storage root. An entry is stored as two
//! files named after the hex SHA-256 digest of its request path: `<digest>.body`
//! holds the response body and `<digest>.json` holds the path and content type.
//! The body is written first, so an entry only becomes visible once it is complete.

use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::Error;

/// A response stored in a cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedAsset {
    /// The request path the response was fetched for, e.g. "/static/app.js".
    pub path: String,
    /// The value of the response's content-type header.
    pub content_type: String,
    /// The response body.
    pub body: Vec<u8>,
}

#[derive(Debug, Serialize, Deserialize)]
struct EntryMetadata {
    path: String,
    content_type: String,
}

/// The set of named caches kept under one directory.
#[derive(Debug, Clone)]
pub struct CacheStorage {
    root: PathBuf,
}

impl CacheStorage {
    /// Create a handle to the caches under `root`.
    ///
    /// Nothing is created on disk until a cache is opened.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The directory that holds the caches.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open the cache called `name`, creating it if it does not exist.
    ///
    /// # Errors
    /// Returns [Error::CacheIoError] if `name` is not a plain directory name or
    /// the cache directory cannot be created.
    pub async fn open(&self, name: &str) -> Result<Cache, Error> {
        let dir = self.cache_dir(name)?;
        tokio::fs::create_dir_all(&dir).await?;

        Ok(Cache {
            name: name.to_owned(),
            dir,
        })
    }

    /// The names of all caches in the storage, sorted.
    ///
    /// An empty list is returned if the storage root has not been created yet.
    pub async fn keys(&self) -> Result<Vec<String>, Error> {
        let mut entries = match tokio::fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_dir() {
                continue;
            }

            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_owned());
            }
        }

        names.sort();
        Ok(names)
    }

    /// Delete the cache called `name` and everything in it.
    ///
    /// Returns `false` if there was no such cache.
    pub async fn delete(&self, name: &str) -> Result<bool, Error> {
        let dir = self.cache_dir(name)?;

        match tokio::fs::remove_dir_all(&dir).await {
            Ok(()) => Ok(true),
            Err(error) if error.kind() == ErrorKind::NotFound => Ok(false),
            Err(error) => Err(error.into()),
        }
    }

    fn cache_dir(&self, name: &str) -> Result<PathBuf, Error> {
        let is_plain_name = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\']);

        if is_plain_name {
            Ok(self.root.join(name))
        } else {
            Err(Error::CacheIoError(format!("invalid cache name \"{name}\"")))
        }
    }
}

/// A single named cache of responses keyed by request path.
#[derive(Debug, Clone)]
pub struct Cache {
    name: String,
    dir: PathBuf,
}

impl Cache {
    /// The name of the cache, e.g. "expense-tracker-cache-v2".
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Store `asset` under its path, replacing any earlier entry for the same path.
    pub async fn put(&self, asset: &CachedAsset) -> Result<(), Error> {
        let (body_path, metadata_path) = self.entry_paths(&asset.path);
        let metadata = serde_json::to_vec(&EntryMetadata {
            path: asset.path.clone(),
            content_type: asset.content_type.clone(),
        })?;

        tokio::fs::write(&body_path, &asset.body).await?;
        tokio::fs::write(&metadata_path, metadata).await?;

        Ok(())
    }

    /// Look up the response stored for the request path `path`.
    ///
    /// Returns `Ok(None)` when there is no complete entry for `path`.
    pub async fn match_path(&self, path: &str) -> Result<Option<CachedAsset>, Error> {
        let (body_path, metadata_path) = self.entry_paths(path);

        let metadata = match tokio::fs::read(&metadata_path).await {
            Ok(metadata) => metadata,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(error.into()),
        };
        let metadata: EntryMetadata = serde_json::from_slice(&metadata)?;

        if metadata.path != path {
            tracing::warn!(
                "cache entry for {path} in {} belongs to {}, ignoring it",
                self.name,
                metadata.path
            );
            return Ok(None);
        }

        let body = tokio::fs::read(&body_path).await?;

        Ok(Some(CachedAsset {
            path: metadata.path,
            content_type: metadata.content_type,
            body,
        }))
    }

    fn entry_paths(&self, path: &str) -> (PathBuf, PathBuf) {
        let key = hex::encode(Sha256::digest(path.as_bytes()));

        (
            self.dir.join(format!("{key}.body")),
            self.dir.join(format!("{key}.json")),
        )
    }
}
