//! HTTP surface for MediClarity.
//!
//! Two endpoints are exposed:
//!
//! - `POST /api/send-email` – Send the contact-form acknowledgement to `{name, email, message}`.
//!   Returns `{ "message": "Email sent successfully", "data": <receipt> }` or `400 { "error" }`
//!   carrying the mail provider's message.
//! - `POST /api/upload-file` – Accept a multipart `file` field holding a PDF report, summarize
//!   its first page, and return `{ "summary": <text> }`.
//!
//! Errors are always JSON `{ "error": <message> }`. Upstream summarization failures are logged
//! server-side and reported with a generic message. Extraction failures answer `422`.
//!
//! Only the configured `CORS_ORIGIN` may call the API from a browser.

use crate::config::Config;
use crate::mail::{MailReceipt, Mailer, contact_acknowledgement};
use crate::processing::{ProcessingError, ReportApi};
use crate::upload::{self, UploadError};
use axum::{
    Json, Router,
    extract::{
        DefaultBodyLimit, Multipart, State, multipart::MultipartRejection,
        rejection::JsonRejection,
    },
    http::{HeaderValue, Method, StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

const NO_FILE_UPLOADED: &str = "No file uploaded";
const UPLOAD_FAILED: &str = "An error occurred while uploading the file";
const EXTRACTION_FAILED: &str = "Failed to extract text from the uploaded file";
const EMAIL_SENT: &str = "Email sent successfully";

/// Shared, immutable state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// Process-wide configuration.
    pub config: Arc<Config>,
    /// Report summarization pipeline.
    pub reports: Arc<dyn ReportApi>,
    /// Outbound mail backend.
    pub mailer: Arc<dyn Mailer>,
}

/// Build the HTTP router exposing the API surface.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors_origin);
    let upload_limit = state.config.upload_limit_bytes;

    Router::new()
        .route("/api/send-email", post(send_email))
        .route(
            "/api/upload-file",
            post(upload_file).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn cors_layer(origin: &str) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);
    match HeaderValue::from_str(origin) {
        Ok(origin) => layer.allow_origin(origin),
        Err(error) => {
            tracing::warn!(origin, %error, "Ignoring invalid CORS origin; cross-origin calls disabled");
            layer
        }
    }
}

/// Request body for `POST /api/send-email`.
#[derive(Deserialize)]
struct SendEmailRequest {
    name: String,
    email: String,
    message: String,
}

/// Success response for `POST /api/send-email`.
#[derive(Serialize)]
struct SendEmailResponse {
    message: &'static str,
    data: MailReceipt,
}

/// Send the contact-form acknowledgement to the submitter.
async fn send_email(
    State(state): State<AppState>,
    payload: Result<Json<SendEmailRequest>, JsonRejection>,
) -> Result<Json<SendEmailResponse>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(error = %rejection.body_text(), "Rejected contact form payload");
        ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text())
    })?;
    tracing::debug!(
        recipient = %request.email,
        message_chars = request.message.len(),
        "Contact form received"
    );

    let mail = contact_acknowledgement(&state.config, &request.name, &request.email);
    let data = state.mailer.send(mail).await.map_err(|error| {
        tracing::error!(%error, recipient = %request.email, "Mail provider rejected message");
        ApiError::new(StatusCode::BAD_REQUEST, error.to_string())
    })?;

    Ok(Json(SendEmailResponse {
        message: EMAIL_SENT,
        data,
    }))
}

/// Success response for `POST /api/upload-file`.
#[derive(Serialize)]
struct UploadResponse {
    summary: String,
}

/// Store the uploaded report and return its plain-language summary.
async fn upload_file(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(rejection) => {
            tracing::warn!(error = %rejection.body_text(), "Upload request is not multipart");
            return Err(ApiError::no_file());
        }
    };

    let upload = upload::receive_file(&mut multipart, &state.config.upload_dir)
        .await
        .map_err(|error| {
            tracing::error!(%error, "Failed to receive upload");
            ApiError::from(error)
        })?
        .ok_or_else(|| {
            tracing::warn!("Upload request with no file");
            ApiError::no_file()
        })?;

    let summary = state.reports.summarize_report(upload).await?;
    Ok(Json(UploadResponse {
        summary: summary.text,
    }))
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// JSON error response emitted by every handler.
#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    fn no_file() -> Self {
        Self::new(StatusCode::BAD_REQUEST, NO_FILE_UPLOADED)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

impl From<ProcessingError> for ApiError {
    fn from(inner: ProcessingError) -> Self {
        match inner {
            ProcessingError::Extraction(_) => {
                Self::new(StatusCode::UNPROCESSABLE_ENTITY, EXTRACTION_FAILED)
            }
            ProcessingError::Summarization(_) => {
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, UPLOAD_FAILED)
            }
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(inner: UploadError) -> Self {
        match inner {
            UploadError::Multipart(error) => Self::new(error.status(), error.body_text()),
            UploadError::Io(_) => Self::new(StatusCode::INTERNAL_SERVER_ERROR, UPLOAD_FAILED),
        }
    }
}
