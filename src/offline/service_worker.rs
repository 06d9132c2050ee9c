//! The browser service worker, generated from the same manifest the server caches.

use axum::{
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{IntoResponse, Response},
};

use crate::{
    Error,
    offline::{ASSET_MANIFEST, cache_name},
};

/// Serve the service worker script.
///
/// The script is never cached by the browser's HTTP cache, so a new cache
/// revision reaches clients on their next visit.
pub async fn get_service_worker() -> Response {
    match service_worker_script(&cache_name(), &ASSET_MANIFEST) {
        Ok(script) => (
            [
                (CONTENT_TYPE, "text/javascript"),
                (CACHE_CONTROL, "no-cache"),
            ],
            script,
        )
            .into_response(),
        Err(error) => error.into_response(),
    }
}

/// Build the service worker script for the cache `cache_name` holding `manifest`.
///
/// Install pre-caches every path and logs a failure instead of aborting the
/// install. Activate deletes every other cache. Fetch answers from the cache
/// first and falls back to the network without storing what it fetched.
pub fn service_worker_script(cache_name: &str, manifest: &[&str]) -> Result<String, Error> {
    let cache_name = serde_json::to_string(cache_name)?;
    let urls_to_cache = serde_json::to_string_pretty(manifest)?;

    Ok(format!(
        r#"const CACHE_NAME = {cache_name};
const urlsToCache = {urls_to_cache};

self.addEventListener("install", (event) => {{
    event.waitUntil(
        caches
            .open(CACHE_NAME)
            .then((cache) => cache.addAll(urlsToCache))
            .catch((error) => console.log("could not pre-cache assets", error)),
    );
}});

self.addEventListener("activate", (event) => {{
    event.waitUntil(
        caches.keys().then((cacheNames) =>
            Promise.all(
                cacheNames
                    .filter((cacheName) => cacheName !== CACHE_NAME)
                    .map((cacheName) => caches.delete(cacheName)),
            ),
        ),
    );
}});

self.addEventListener("fetch", (event) => {{
    if (event.request.method !== "GET") {{
        return;
    }}

    event.respondWith(
        caches
            .match(event.request)
            .then((response) => response || fetch(event.request)),
    );
}});
"#
    ))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::{
        offline::{ASSET_MANIFEST, cache_name},
        test_utils::get_header,
    };

    use super::{get_service_worker, service_worker_script};

    #[test]
    fn script_embeds_cache_name_and_manifest() {
        let script = service_worker_script(&cache_name(), &ASSET_MANIFEST).unwrap();

        assert!(script.starts_with("const CACHE_NAME = \"expense-tracker-cache-v2\";"));
        for path in ASSET_MANIFEST {
            assert!(script.contains(&format!("\"{path}\"")), "{path} missing");
        }
    }

    #[test]
    fn script_escapes_cache_name() {
        let script = service_worker_script("v\"1", &[]).unwrap();

        assert!(script.starts_with("const CACHE_NAME = \"v\\\"1\";"));
    }

    #[tokio::test]
    async fn served_as_uncached_javascript() {
        let response = get_service_worker().await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(get_header(&response, "content-type"), "text/javascript");
        assert_eq!(get_header(&response, "cache-control"), "no-cache");
    }
}
