//! Request handlers for the upload and analyze endpoints
//!
//! Control flow for one analysis request:
//! upload → validate batch → stage files → (later) analyze → normalize
//! → purge. The staged-file guards make the purge unconditional on every
//! exit path once analysis is attempted.

use crate::AppContext;
use bytes::Buf;
use futures::{StreamExt, TryStreamExt};
use rapport_inference::{normalize, AnalysisError, AnalysisReport, EncodedImage};
use rapport_staging::{StagedBatch, StagedImage, StagingArea};
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::multipart::{FormData, Part};
use warp::reply::Response;
use warp::{Rejection, Reply};

/// Multipart field name carrying the image files
const UPLOAD_FIELD: &str = "images";

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadResponse {
    files: Vec<StagedImage>,
    file_count: usize,
}

/// One staged-batch entry referenced by an analyze request
///
/// Clients echo back the objects from the upload response; only the
/// handle and media type matter here, extra fields are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedRef {
    /// Opaque staging handle from the upload response
    pub handle: String,
    /// Media type to pair with the encoded bytes
    #[serde(default = "default_media_type")]
    pub media_type: String,
}

fn default_media_type() -> String {
    "image/jpeg".to_string()
}

/// Body of `POST /analyze`
#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    /// References to a previously staged batch
    pub files: Vec<StagedRef>,
}

#[derive(Debug, Serialize)]
struct AnalyzeResponse {
    result: AnalysisReport,
}

fn error_reply(status: StatusCode, message: &str) -> Response {
    warp::reply::with_status(warp::reply::json(&ErrorBody { error: message }), status)
        .into_response()
}

/// `GET /` service banner
pub async fn index() -> Result<Response, Rejection> {
    #[derive(Serialize)]
    struct Banner {
        message: &'static str,
    }
    Ok(warp::reply::json(&Banner {
        message: "rapport image analysis service",
    })
    .into_response())
}

/// `POST /upload`: stage a multipart batch of images
///
/// Per-file faults (wrong media type, oversize) reject that file only;
/// the batch is then judged against the minimum count. A rejected batch
/// is purged before the error goes out, and the guard purges on the IO
/// failure path too.
pub async fn upload(mut form: FormData, ctx: Arc<AppContext>) -> Result<Response, Rejection> {
    let policy = *ctx.staging.policy();
    let mut batch = StagedBatch::new(ctx.staging.clone());
    let mut rejected = 0usize;

    while let Some(item) = form.next().await {
        let part = match item {
            Ok(part) => part,
            Err(e) => {
                tracing::warn!(error = %e, "malformed multipart body");
                return Ok(error_reply(StatusCode::BAD_REQUEST, "malformed upload body"));
            }
        };
        if part.name() != UPLOAD_FIELD {
            continue;
        }
        // Transport boundary: parts beyond the maximum never enter the batch.
        if batch.len() >= policy.max_files {
            tracing::warn!(max = policy.max_files, "batch full, ignoring extra file");
            continue;
        }

        let filename = part.filename().unwrap_or("upload").to_string();
        let media_type = part
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = match collect_part(part, policy.max_file_bytes).await {
            Ok(PartBody::Complete(bytes)) => bytes,
            Ok(PartBody::Oversized) => {
                tracing::warn!(
                    file = %filename,
                    limit = policy.max_file_bytes,
                    "rejected upload file over size ceiling"
                );
                rejected += 1;
                continue;
            }
            Err(e) => {
                tracing::warn!(file = %filename, error = %e, "failed to read upload part");
                return Ok(error_reply(StatusCode::BAD_REQUEST, "malformed upload body"));
            }
        };

        match ctx.staging.stage(&bytes, &media_type, &filename).await {
            Ok(staged) => batch.push(staged),
            Err(e) if e.is_per_file() => {
                tracing::warn!(file = %filename, error = %e, "rejected upload file");
                rejected += 1;
            }
            Err(e) => {
                // Guard drop purges whatever was already staged.
                tracing::error!(file = %filename, error = %e, "staging failure");
                return Ok(error_reply(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "upload failed",
                ));
            }
        }
    }

    if let Err(e) = policy.check_count(batch.len()) {
        tracing::info!(staged = batch.len(), rejected, "upload batch rejected");
        batch.purge();
        return Ok(error_reply(StatusCode::BAD_REQUEST, &e.to_string()));
    }

    let files = batch.into_images();
    tracing::info!(count = files.len(), rejected, "upload batch staged");
    let file_count = files.len();
    Ok(warp::reply::json(&UploadResponse { files, file_count }).into_response())
}

/// `POST /analyze`: run the staged batch through the provider
///
/// The referenced files are purged on every exit path once analysis is
/// attempted. Provider faults never surface: the normalizer trades them
/// for the fallback report. Only a missing credential or vanished staged
/// bytes produce an error response.
pub async fn analyze(req: AnalyzeRequest, ctx: Arc<AppContext>) -> Result<Response, Rejection> {
    // Rejection is terminal for the referenced batch too: whichever way
    // this request ends, the staged files get purged.
    let _purge = ReleaseOnDrop::new(
        ctx.staging.clone(),
        req.files.iter().map(|f| f.handle.clone()).collect(),
    );

    if let Err(e) = ctx.staging.policy().check_count(req.files.len()) {
        return Ok(error_reply(StatusCode::BAD_REQUEST, &e.to_string()));
    }

    let mut images = Vec::with_capacity(req.files.len());
    for file in &req.files {
        match ctx.staging.load(&file.handle).await {
            Ok(bytes) => images.push(EncodedImage::from_bytes(&bytes, file.media_type.clone())),
            Err(e) => {
                tracing::error!(handle = %file.handle, error = %e, "staged file unreadable");
                return Ok(error_reply(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "referenced image is no longer staged",
                ));
            }
        }
    }

    // The fallback policy lives here, in the open: provider faults are
    // normalized away, configuration faults are surfaced.
    let report = match ctx.analyzer.analyze(&images).await {
        Ok(report) => normalize(Ok(report)),
        Err(AnalysisError::Provider(fault)) => normalize(Err(fault)),
        Err(e @ AnalysisError::MissingCredential) => {
            tracing::error!(error = %e, "analysis refused");
            return Ok(error_reply(
                StatusCode::INTERNAL_SERVER_ERROR,
                &e.to_string(),
            ));
        }
    };

    tracing::info!(images = images.len(), "analysis completed");
    Ok(warp::reply::json(&AnalyzeResponse { result: report }).into_response())
}

/// Map filter rejections to the JSON error shape
pub async fn handle_rejection(err: Rejection) -> Result<Response, Infallible> {
    if err.is_not_found() {
        return Ok(error_reply(StatusCode::NOT_FOUND, "not found"));
    }
    if err.find::<warp::filters::body::BodyDeserializeError>().is_some()
        || err.find::<warp::reject::InvalidHeader>().is_some()
        || err.find::<warp::reject::PayloadTooLarge>().is_some()
    {
        return Ok(error_reply(StatusCode::BAD_REQUEST, "invalid request body"));
    }
    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(error_reply(
            StatusCode::METHOD_NOT_ALLOWED,
            "method not allowed",
        ));
    }
    if err.find::<warp::cors::CorsForbidden>().is_some() {
        return Ok(error_reply(StatusCode::FORBIDDEN, "cross-origin request refused"));
    }
    tracing::error!(?err, "unhandled rejection");
    Ok(error_reply(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal error",
    ))
}

/// Outcome of buffering one multipart part
enum PartBody {
    /// The whole part, within the size ceiling
    Complete(Vec<u8>),
    /// The part grew past the ceiling and was abandoned mid-stream
    Oversized,
}

/// Buffer one multipart part into memory, capped at `limit` bytes
///
/// Stops reading as soon as the accumulated bytes exceed the ceiling so
/// an oversized part never occupies more than `limit` plus one chunk.
async fn collect_part(part: Part, limit: u64) -> Result<PartBody, warp::Error> {
    let stream = part.stream();
    futures::pin_mut!(stream);

    let mut acc = Vec::new();
    while let Some(mut buf) = stream.try_next().await? {
        while buf.has_remaining() {
            let chunk = buf.chunk();
            acc.extend_from_slice(chunk);
            let advanced = chunk.len();
            buf.advance(advanced);
        }
        if acc.len() as u64 > limit {
            return Ok(PartBody::Oversized);
        }
    }
    Ok(PartBody::Complete(acc))
}

/// Releases the referenced handles when dropped
///
/// Release is idempotent, so dropping after an explicit release or over
/// handles that never existed is harmless.
struct ReleaseOnDrop {
    area: StagingArea,
    handles: Vec<String>,
}

impl ReleaseOnDrop {
    fn new(area: StagingArea, handles: Vec<String>) -> Self {
        Self { area, handles }
    }
}

impl Drop for ReleaseOnDrop {
    fn drop(&mut self) {
        for handle in &self.handles {
            self.area.release(handle);
        }
    }
}
