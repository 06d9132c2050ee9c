//! Where cached assets come from when the cache is populated.

use std::{
    future::Future,
    path::{Component, Path, PathBuf},
};

use crate::{Error, endpoints, expense::app_shell_view, offline::CachedAsset};

/// Something that can produce the response for an asset path.
///
/// On the server this is the static directory plus the rendered app shell.
/// Tests use in-memory sources.
pub trait AssetSource {
    /// Fetch the asset at the request path `path`, e.g. "/static/app.js".
    ///
    /// # Errors
    /// Returns [Error::AssetUnavailable] if the source has nothing for `path`.
    fn fetch(&self, path: &str) -> impl Future<Output = Result<CachedAsset, Error>> + Send;
}

/// The assets the server itself serves: the app shell and the files in the static directory.
#[derive(Debug, Clone)]
pub struct StaticAssets {
    static_dir: PathBuf,
}

impl StaticAssets {
    /// Serve `/static/...` paths from the files under `static_dir`.
    pub fn new(static_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_dir: static_dir.into(),
        }
    }

    fn file_path(&self, path: &str) -> Option<PathBuf> {
        let relative = path
            .strip_prefix(endpoints::STATIC)
            .and_then(|rest| rest.strip_prefix('/'))?;
        let relative = Path::new(relative);

        let is_plain = relative
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

        if is_plain && !relative.as_os_str().is_empty() {
            Some(self.static_dir.join(relative))
        } else {
            None
        }
    }
}

impl AssetSource for StaticAssets {
    async fn fetch(&self, path: &str) -> Result<CachedAsset, Error> {
        if path == endpoints::ROOT || path == endpoints::INDEX_HTML {
            return Ok(CachedAsset {
                path: path.to_owned(),
                content_type: "text/html; charset=utf-8".to_owned(),
                body: app_shell_view().into_string().into_bytes(),
            });
        }

        let Some(file_path) = self.file_path(path) else {
            return Err(Error::AssetUnavailable(path.to_owned()));
        };

        let body = tokio::fs::read(&file_path).await.map_err(|error| {
            tracing::debug!("could not read {}: {error}", file_path.display());
            Error::AssetUnavailable(path.to_owned())
        })?;

        Ok(CachedAsset {
            path: path.to_owned(),
            content_type: content_type_for(&file_path).to_owned(),
            body,
        })
    }
}

/// Guess the content type of a static file from its extension.
pub fn content_type_for(path: &Path) -> &'static str {
    match path.extension().and_then(|extension| extension.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("js") => "text/javascript",
        Some("json") => "application/json",
        Some("webmanifest") => "application/manifest+json",
        Some("png") => "image/png",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::{Error, offline::AssetSource};

    use super::{StaticAssets, content_type_for};

    #[tokio::test]
    async fn fetches_static_file_with_content_type() {
        let directory = tempfile::tempdir().unwrap();
        std::fs::write(directory.path().join("app.js"), "console.log(1);").unwrap();
        let source = StaticAssets::new(directory.path());

        let asset = source.fetch("/static/app.js").await.unwrap();

        assert_eq!(asset.path, "/static/app.js");
        assert_eq!(asset.content_type, "text/javascript");
        assert_eq!(asset.body, b"console.log(1);");
    }

    #[tokio::test]
    async fn renders_app_shell_for_root_and_index() {
        let directory = tempfile::tempdir().unwrap();
        let source = StaticAssets::new(directory.path());

        for path in ["/", "/index.html"] {
            let asset = source.fetch(path).await.unwrap();

            assert_eq!(asset.content_type, "text/html; charset=utf-8");
            assert!(String::from_utf8(asset.body).unwrap().contains("Expense Tracker"));
        }
    }

    #[tokio::test]
    async fn missing_file_is_unavailable() {
        let directory = tempfile::tempdir().unwrap();
        let source = StaticAssets::new(directory.path());

        assert_eq!(
            source.fetch("/static/missing.css").await,
            Err(Error::AssetUnavailable("/static/missing.css".to_owned()))
        );
    }

    #[tokio::test]
    async fn refuses_paths_outside_static_dir() {
        let directory = tempfile::tempdir().unwrap();
        let static_dir = directory.path().join("static");
        std::fs::create_dir(&static_dir).unwrap();
        std::fs::write(directory.path().join("secret.txt"), "secret").unwrap();
        let source = StaticAssets::new(&static_dir);

        for path in ["/static/../secret.txt", "/secret.txt", "/static/"] {
            assert_eq!(
                source.fetch(path).await,
                Err(Error::AssetUnavailable(path.to_owned()))
            );
        }
    }

    #[test]
    fn guesses_content_types() {
        assert_eq!(content_type_for(Path::new("style.css")), "text/css");
        assert_eq!(content_type_for(Path::new("icon-192x192.png")), "image/png");
        assert_eq!(content_type_for(Path::new("manifest.json")), "application/json");
        assert_eq!(
            content_type_for(Path::new("README")),
            "application/octet-stream"
        );
    }
}
