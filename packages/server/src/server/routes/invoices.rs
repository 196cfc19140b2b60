//! Invoice submission endpoints.
//!
//! Both endpoints answer 202 as soon as the request is read; the run goes
//! on in a spawned task and reports through delivery.

use axum::{
    extract::{Extension, Multipart},
    http::StatusCode,
    Json,
};
use extraction::{DocumentFile, RunRequest};
use serde::{Deserialize, Serialize};
use tracing::{info, Instrument};

use crate::server::app::AppState;
use crate::server::error::ApiError;

const DEFAULT_FILENAME: &str = "attachment";
const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct AcceptedResponse {
    pub status: String,
    pub files_received: usize,
}

/// One base64 file in a JSON submission.
#[derive(Debug, Deserialize)]
pub struct JsonFile {
    #[serde(default)]
    pub filename: String,
    #[serde(default)]
    pub content_type: String,
    pub content_b64: String,
}

#[derive(Debug, Deserialize)]
pub struct JsonSubmission {
    #[serde(default)]
    pub vendor: String,
    #[serde(default)]
    pub callback_url: String,
    #[serde(default)]
    pub service_fee: f64,
    #[serde(default)]
    pub booking_type_hint: String,
    #[serde(default)]
    pub files: Vec<JsonFile>,
}

/// Form or JSON fields, before the files are attached.
#[derive(Debug, Default)]
struct Submission {
    vendor: Option<String>,
    callback_url: String,
    service_fee: f64,
    booking_type_hint: String,
    files: Vec<DocumentFile>,
}

impl Submission {
    fn into_request(self) -> Result<RunRequest, ApiError> {
        let vendor = self
            .vendor
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or(ApiError::MissingField("vendor"))?;

        Ok(RunRequest::new(vendor, self.files)
            .with_booking_type_hint(self.booking_type_hint.trim())
            .with_service_fee(self.service_fee)
            .with_callback_url(self.callback_url))
    }
}

/// Blank or unparseable fees count as no fee.
fn parse_service_fee(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|fee| fee.is_finite() && *fee > 0.0)
        .unwrap_or(0.0)
}

fn or_default(value: &str, default: &str) -> String {
    if value.trim().is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

/// Start the run in the background and answer 202.
fn accept(state: &AppState, request: RunRequest) -> (StatusCode, Json<AcceptedResponse>) {
    let files_received = request.files.len();
    let run_id = request.run_id;
    info!(
        %run_id,
        vendor_hint = %request.vendor_hint,
        files = files_received,
        "Invoice accepted"
    );

    let pipeline = state.pipeline.clone();
    tokio::spawn(
        async move {
            pipeline.run(request).await;
        }
        .in_current_span(),
    );

    (
        StatusCode::ACCEPTED,
        Json(AcceptedResponse {
            status: "accepted".to_string(),
            files_received,
        }),
    )
}

/// `POST /process-invoice` (multipart form)
pub async fn process_invoice_handler(
    Extension(state): Extension<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<AcceptedResponse>), ApiError> {
    let mut submission = Submission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == "files" {
            let filename = or_default(field.file_name().unwrap_or_default(), DEFAULT_FILENAME);
            let content_type =
                or_default(field.content_type().unwrap_or_default(), DEFAULT_CONTENT_TYPE);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| ApiError::BadRequest(e.to_string()))?;
            // Browsers send an empty part when no file was picked
            if filename == DEFAULT_FILENAME && bytes.is_empty() {
                continue;
            }
            submission
                .files
                .push(DocumentFile::new(filename, content_type, bytes.to_vec()));
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| ApiError::BadRequest(e.to_string()))?;
        match name.as_str() {
            "vendor" => submission.vendor = Some(value),
            "callback_url" => submission.callback_url = value,
            "service_fee" => submission.service_fee = parse_service_fee(&value),
            "booking_type_hint" => submission.booking_type_hint = value,
            _ => {}
        }
    }

    let request = submission.into_request()?;
    Ok(accept(&state, request))
}

/// `POST /process-invoice-json`
pub async fn process_invoice_json_handler(
    Extension(state): Extension<AppState>,
    Json(body): Json<JsonSubmission>,
) -> Result<(StatusCode, Json<AcceptedResponse>), ApiError> {
    let files = body
        .files
        .iter()
        .map(|file| {
            DocumentFile::from_base64(
                or_default(&file.filename, DEFAULT_FILENAME),
                or_default(&file.content_type, DEFAULT_CONTENT_TYPE),
                &file.content_b64,
            )
            .map_err(|e| {
                ApiError::BadRequest(format!("file '{}' is not valid base64: {}", file.filename, e))
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    let submission = Submission {
        vendor: Some(body.vendor),
        callback_url: body.callback_url,
        service_fee: if body.service_fee.is_finite() && body.service_fee > 0.0 {
            body.service_fee
        } else {
            0.0
        },
        booking_type_hint: body.booking_type_hint,
        files,
    };

    let request = submission.into_request()?;
    Ok(accept(&state, request))
}
