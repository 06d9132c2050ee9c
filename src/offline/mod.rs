//! Serving the app shell and its static assets from a versioned offline cache.
//!
//! The server keeps a disk-backed copy of every asset in [ASSET_MANIFEST]
//! under a cache named after the current [manifest::CACHE_REVISION]. The cache is filled
//! once at start up by [install], older revisions are removed by [activate],
//! and [cache_first] answers requests from it. Browsers get the same
//! behaviour from the generated service worker.

mod intercept;
mod lifecycle;
mod manifest;
mod service_worker;
mod source;
mod storage;

pub use intercept::cache_first;
pub use lifecycle::{InstallReport, activate, install};
pub use manifest::{ASSET_MANIFEST, cache_name};
pub use service_worker::get_service_worker;
pub use source::{AssetSource, StaticAssets};
pub use storage::{Cache, CacheStorage, CachedAsset};
