//! Route wiring for the HTTP surface
//!
//! Filters only; all behavior lives in [`crate::handlers`].

use crate::{handlers, AppContext};
use std::sync::Arc;
use warp::{Filter, Reply};

/// Headroom for multipart framing on top of the raw file ceiling
const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Cap for the JSON analyze body
const ANALYZE_BODY_LIMIT_BYTES: u64 = 64 * 1024;

/// Build the complete route tree over shared state
pub fn routes(
    ctx: Arc<AppContext>,
) -> impl Filter<Extract = (impl Reply,), Error = std::convert::Infallible> + Clone {
    let policy = *ctx.staging.policy();
    let upload_body_limit =
        policy.max_files as u64 * policy.max_file_bytes + MULTIPART_OVERHEAD_BYTES;

    let index = warp::path::end().and(warp::get()).and_then(handlers::index);

    let upload = warp::path("upload")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::multipart::form().max_length(upload_body_limit))
        .and(with_ctx(ctx.clone()))
        .and_then(handlers::upload);

    let analyze = warp::path("analyze")
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::content_length_limit(ANALYZE_BODY_LIMIT_BYTES))
        .and(warp::body::json())
        .and(with_ctx(ctx))
        .and_then(handlers::analyze);

    // The browser frontend calls from another origin, as the service has
    // always allowed.
    let cors = warp::cors()
        .allow_any_origin()
        .allow_methods(vec!["GET", "POST"])
        .allow_headers(vec!["content-type"]);

    index
        .or(upload)
        .or(analyze)
        .with(cors)
        .recover(handlers::handle_rejection)
        .with(warp::trace::request())
}

fn with_ctx(
    ctx: Arc<AppContext>,
) -> impl Filter<Extract = (Arc<AppContext>,), Error = std::convert::Infallible> + Clone {
    warp::any().map(move || ctx.clone())
}
