//! The assets that make up the offline app shell and the name of the cache that holds them.

use crate::endpoints;

/// Every cache created by the app starts with this prefix.
pub const CACHE_NAME_PREFIX: &str = "expense-tracker-cache-v";

/// Bump this whenever an asset in [ASSET_MANIFEST] changes so that clients
/// drop the stale copies on their next activation.
pub const CACHE_REVISION: u32 = 2;

/// The request paths stored in the cache at install time.
pub const ASSET_MANIFEST: [&str; 7] = [
    endpoints::ROOT,
    endpoints::INDEX_HTML,
    "/static/style.css",
    "/static/app.js",
    "/static/manifest.json",
    "/static/icons/icon-192x192.png",
    "/static/icons/icon-512x512.png",
];

/// The name of the current asset cache, e.g. "expense-tracker-cache-v2".
pub fn cache_name() -> String {
    format!("{CACHE_NAME_PREFIX}{CACHE_REVISION}")
}
