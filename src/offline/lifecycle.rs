//! Installing the current asset cache and clearing out stale ones.

use crate::{
    Error,
    offline::{AssetSource, Cache, CacheStorage},
};

/// What happened to each manifest path during [install].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstallReport {
    /// Paths that were fetched and stored.
    pub cached: Vec<String>,
    /// Paths that could not be fetched or stored.
    pub failed: Vec<String>,
}

/// Open the cache called `cache_name` and fill it with every path in `manifest`.
///
/// An asset that cannot be fetched or stored is logged and skipped, so one
/// missing file does not stop the rest of the app shell from being cached.
///
/// # Errors
/// Returns an error only if the cache itself cannot be opened.
pub async fn install(
    storage: &CacheStorage,
    cache_name: &str,
    manifest: &[&str],
    source: &impl AssetSource,
) -> Result<(Cache, InstallReport), Error> {
    let cache = storage.open(cache_name).await?;
    let mut report = InstallReport::default();

    for &path in manifest {
        let stored = match source.fetch(path).await {
            Ok(asset) => cache.put(&asset).await,
            Err(error) => Err(error),
        };

        match stored {
            Ok(()) => report.cached.push(path.to_owned()),
            Err(error) => {
                tracing::error!("could not cache {path} in {cache_name}: {error}");
                report.failed.push(path.to_owned());
            }
        }
    }

    tracing::info!(
        "installed cache {cache_name}: {} assets cached, {} failed",
        report.cached.len(),
        report.failed.len()
    );

    Ok((cache, report))
}

/// Delete every cache in `storage` except the one called `current_cache_name`.
///
/// Returns the names of the deleted caches.
pub async fn activate(
    storage: &CacheStorage,
    current_cache_name: &str,
) -> Result<Vec<String>, Error> {
    let mut deleted = Vec::new();

    for name in storage.keys().await? {
        if name == current_cache_name {
            continue;
        }

        if storage.delete(&name).await? {
            tracing::info!("deleted stale cache {name}");
            deleted.push(name);
        }
    }

    Ok(deleted)
}
