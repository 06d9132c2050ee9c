//! Cache-first middleware for the offline assets.

use axum::{
    extract::{OriginalUri, Request, State},
    http::{Method, header::CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::offline::Cache;

/// Answer GET requests from `cache` when it has the path, otherwise pass the
/// request on to the wrapped route.
///
/// Responses from the wrapped route are not written back to the cache. The
/// cache only changes when it is installed.
pub async fn cache_first(State(cache): State<Cache>, request: Request, next: Next) -> Response {
    if request.method() != Method::GET {
        return next.run(request).await;
    }

    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map_or_else(|| request.uri().path(), |uri| uri.path())
        .to_owned();

    match cache.match_path(&path).await {
        Ok(Some(asset)) => {
            tracing::debug!("serving {path} from cache {}", cache.name());
            ([(CONTENT_TYPE, asset.content_type)], asset.body).into_response()
        }
        Ok(None) => next.run(request).await,
        Err(error) => {
            tracing::error!("could not read {path} from cache {}: {error}", cache.name());
            next.run(request).await
        }
    }
}
