//! # Receipt Routes
//!
//! ```text
//! GET     /receipts             stored filenames, sorted
//! POST    /receipts             multipart upload, file in field "receipt"
//! GET     /receipts/{filename}  download as an attachment
//! OPTIONS /receipts, /receipts/{filename}   empty 200
//! ```
//!
//! ## Upload Limits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  request body ── DefaultBodyLimit (cap + multipart framing) ──✗──▶ 400  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  "receipt" field bytes ── ReceiptStore cap (exact) ──────────✗──▶ 400  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  written to disk ──▶ 201                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::body::Body;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, Path, State};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;
use tokio_util::io::ReaderStream;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};
use crate::routes::preflight;
use crate::state::AppState;

/// Multipart form field carrying the file.
pub const RECEIPT_FIELD: &str = "receipt";

/// Room for boundaries and part headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn routes(max_upload: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/receipts",
            get(list_receipts)
                .post(upload_receipt)
                .options(preflight)
                .layer(DefaultBodyLimit::max(max_upload + MULTIPART_OVERHEAD)),
        )
        .route(
            "/receipts/{filename}",
            get(download_receipt).options(preflight),
        )
}

/// Body of a successful upload.
#[derive(Debug, Serialize)]
struct Uploaded {
    filename: String,
    size: u64,
}

async fn list_receipts(State(state): State<AppState>) -> ApiResult<Json<Vec<String>>> {
    let names = state.receipts.list().await?;
    debug!(count = names.len(), "Listed receipts");
    Ok(Json(names))
}

async fn upload_receipt(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<impl IntoResponse> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(RECEIPT_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_owned)
            .ok_or_else(|| ApiError::validation("receipt field has no filename"))?;

        let size = state.receipts.save(&filename, field).await?;
        info!(filename = %filename, size, "Receipt uploaded");

        return Ok((StatusCode::CREATED, Json(Uploaded { filename, size })));
    }

    Err(ApiError::validation(format!(
        "multipart field '{}' is missing",
        RECEIPT_FIELD
    )))
}

async fn download_receipt(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let download = state.receipts.open(&filename).await?;
    debug!(
        filename = %download.filename,
        content_type = download.content_type,
        size = download.size,
        "Serving receipt"
    );

    let headers = [
        (
            header::CONTENT_TYPE,
            HeaderValue::from_static(download.content_type),
        ),
        (header::CONTENT_LENGTH, HeaderValue::from(download.size)),
        (
            header::CONTENT_DISPOSITION,
            content_disposition(&download.filename),
        ),
    ];
    let body = Body::from_stream(ReaderStream::new(download.file));

    Ok((headers, body).into_response())
}

/// `attachment; filename="..."`, or a bare `attachment` when the name
/// can't be carried in a header value.
fn content_disposition(filename: &str) -> HeaderValue {
    let escaped = filename.replace('\\', "\\\\").replace('"', "\\\"");
    HeaderValue::from_str(&format!("attachment; filename=\"{}\"", escaped))
        .unwrap_or_else(|_| HeaderValue::from_static("attachment"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::*;
    use axum::body::Bytes;
    use axum::http::Request;

    const BOUNDARY: &str = "X-INVENTORY-TEST-BOUNDARY";

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn multipart_request(field: &str, filename: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::post("/api/receipts")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_upload_then_download() {
        let (app, _state, _dir) = app().await;

        let response = send(&app, multipart_request("receipt", "scan.png", PNG)).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let uploaded = body_json(response).await;
        assert_eq!(uploaded["filename"], "scan.png");
        assert_eq!(uploaded["size"], PNG.len());

        let response = send(&app, get("/api/receipts/scan.png")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let headers = response.headers().clone();
        assert_eq!(headers[header::CONTENT_TYPE], "image/png");
        assert_eq!(headers[header::CONTENT_LENGTH], PNG.len().to_string().as_str());
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"scan.png\""
        );
        assert_eq!(body_bytes(response).await, PNG);
    }

    #[tokio::test]
    async fn test_list_is_sorted() {
        let (app, _state, _dir) = app().await;
        for name in ["b.txt", "a.txt"] {
            let response = send(&app, multipart_request("receipt", name, b"hello")).await;
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = send(&app, get("/api/receipts")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body_json(response).await,
            serde_json::json!(["a.txt", "b.txt"])
        );
    }

    #[tokio::test]
    async fn test_oversized_upload_is_rejected() {
        let (app, state, _dir) = app_with_upload_limit(16).await;

        let response = send(&app, multipart_request("receipt", "big.bin", &[7u8; 17])).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "PAYLOAD_TOO_LARGE");
        assert!(state.receipts.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_request_limit_hit_mid_field_is_payload_too_large() {
        let (app, state, _dir) = app_with_upload_limit(16).await;

        // Part headers arrive first, then a chunk past the request body limit
        let head = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"receipt\"; filename=\"big.bin\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        );
        let chunks = vec![
            Ok::<_, std::io::Error>(Bytes::from(head)),
            Ok(Bytes::from(vec![7u8; 16 + MULTIPART_OVERHEAD + 1024])),
            Ok(Bytes::from(format!("\r\n--{BOUNDARY}--\r\n"))),
        ];
        let request = Request::post("/api/receipts")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from_stream(futures_util::stream::iter(chunks)))
            .unwrap();

        let response = send(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "PAYLOAD_TOO_LARGE");
        assert!(state.receipts.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_upload_at_exact_limit_is_accepted() {
        let (app, _state, _dir) = app_with_upload_limit(16).await;

        let response = send(&app, multipart_request("receipt", "edge.bin", &[7u8; 16])).await;

        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_missing_receipt_field_is_400() {
        let (app, _state, _dir) = app().await;

        let response = send(&app, multipart_request("attachment", "scan.png", PNG)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_non_multipart_body_is_400() {
        let (app, _state, _dir) = app().await;

        let request = Request::post("/api/receipts")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{}"))
            .unwrap();
        let response = send(&app, request).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_download_missing_receipt_is_404() {
        let (app, _state, _dir) = app().await;

        let response = send(&app, get("/api/receipts/nope.pdf")).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_download_rejects_path_escape() {
        let (app, _state, _dir) = app().await;

        let response = send(&app, get("/api/receipts/..%2Fsecret")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_preflight() {
        let (app, _state, _dir) = app().await;

        for uri in ["/api/receipts", "/api/receipts/scan.png"] {
            let request = Request::options(uri).body(Body::empty()).unwrap();
            assert_eq!(send(&app, request).await.status(), StatusCode::OK);
        }
    }

    #[test]
    fn test_content_disposition_escapes_quotes() {
        assert_eq!(
            content_disposition("a\"b.txt"),
            "attachment; filename=\"a\\\"b.txt\""
        );
        assert_eq!(content_disposition("a\nb.txt"), "attachment");
    }
}
