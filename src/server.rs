//! HTTP surface: the upload form and the conversion endpoint.
//!
//! Two routes:
//!
//! * `GET /` — a static HTML form mirroring the conversion settings
//!   (DPI, quality, page range, format) with their defaults.
//! * `POST /convert` — multipart upload; runs one conversion and answers
//!   with the ZIP as an attachment, or a JSON `{"error": …}` body.
//!
//! Each request drives its own [`Session`] through the full state machine;
//! nothing is shared between requests except the immutable [`ServerConfig`].

use crate::config::{ConversionSettings, OutputFormat};
use crate::convert;
use crate::error::Pdf2ZipError;
use crate::output::ArchiveArtifact;
use crate::session::Session;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Uploads larger than this are rejected before the handler runs.
const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;

/// Deployment configuration for the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path to the Ghostscript executable used for every conversion.
    pub ghostscript: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            ghostscript: PathBuf::from("gs"),
        }
    }
}

/// JSON body for every error response.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

/// Build the application router.
pub fn app(config: ServerConfig) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/convert", post(convert_handler))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(config))
}

/// Serve the upload form.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Run one conversion for one multipart submission.
async fn convert_handler(
    State(config): State<Arc<ServerConfig>>,
    multipart: Multipart,
) -> Response {
    let mut session = Session::new();

    let outcome = run_session(&config, multipart, &mut session).await;
    match outcome {
        Ok(artifact) => {
            session.succeed(artifact);
        }
        Err(error) => {
            warn!("Conversion failed: {error}");
            session.fail(error);
        }
    }

    match session.finish() {
        Ok(artifact) => download_response(artifact),
        Err(error) => error_response(&error),
    }
}

/// Drive the session from upload receipt through conversion.
async fn run_session(
    config: &ServerConfig,
    multipart: Multipart,
    session: &mut Session,
) -> Result<ArchiveArtifact, Pdf2ZipError> {
    session.begin_upload();
    let form = read_form(multipart).await?;

    session.configure();
    let settings = form.to_settings(config)?;
    let pdf = form
        .pdf
        .as_deref()
        .ok_or_else(|| Pdf2ZipError::InvalidSettings("No PDF file was uploaded".into()))?;

    session.begin_conversion();
    let output = convert::convert_bytes(pdf, &settings).await?;
    Ok(output.artifact)
}

/// Raw multipart fields, before validation.
#[derive(Debug, Default)]
struct RawForm {
    pdf: Option<Vec<u8>>,
    dpi: Option<String>,
    quality: Option<String>,
    first_page: Option<String>,
    last_page: Option<String>,
    format: Option<String>,
}

/// Collect the multipart fields.
///
/// The file field is gated on its extension/MIME here; the `%PDF` magic check
/// happens again inside the pipeline on the raw bytes.
async fn read_form(mut multipart: Multipart) -> Result<RawForm, Pdf2ZipError> {
    let mut form = RawForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Pdf2ZipError::Internal(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let looks_like_pdf = field
                    .file_name()
                    .map(|n| n.to_ascii_lowercase().ends_with(".pdf"))
                    .or_else(|| field.content_type().map(|ct| ct == "application/pdf"))
                    .unwrap_or(false);
                if !looks_like_pdf {
                    return Err(Pdf2ZipError::InvalidSettings(
                        "The uploaded file must be a PDF".into(),
                    ));
                }
                let bytes = field.bytes().await.map_err(|e| {
                    Pdf2ZipError::Internal(format!("Failed to read upload: {e}"))
                })?;
                form.pdf = Some(bytes.to_vec());
            }
            "dpi" => form.dpi = Some(read_text(field).await?),
            "quality" => form.quality = Some(read_text(field).await?),
            "first_page" => form.first_page = Some(read_text(field).await?),
            "last_page" => form.last_page = Some(read_text(field).await?),
            "format" => form.format = Some(read_text(field).await?),
            other => {
                warn!("Ignoring unknown form field '{other}'");
            }
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, Pdf2ZipError> {
    field
        .text()
        .await
        .map_err(|e| Pdf2ZipError::Internal(format!("Failed to read form field: {e}")))
}

impl RawForm {
    /// Validate the fields into settings; absent fields take their defaults.
    fn to_settings(&self, config: &ServerConfig) -> Result<ConversionSettings, Pdf2ZipError> {
        let defaults = ConversionSettings::default();

        let format = match self.format.as_deref() {
            Some(s) => s.parse::<OutputFormat>()?,
            None => defaults.format,
        };

        ConversionSettings::builder()
            .dpi(parse_number(self.dpi.as_deref(), "dpi", defaults.dpi)?)
            .quality(parse_number(self.quality.as_deref(), "quality", defaults.quality)?)
            .pages(
                parse_number(self.first_page.as_deref(), "first_page", defaults.first_page)?,
                parse_number(self.last_page.as_deref(), "last_page", defaults.last_page)?,
            )
            .format(format)
            .ghostscript(config.ghostscript.clone())
            .build()
    }
}

fn parse_number<T: std::str::FromStr>(
    value: Option<&str>,
    name: &str,
    default: T,
) -> Result<T, Pdf2ZipError> {
    match value {
        None => Ok(default),
        Some(s) if s.trim().is_empty() => Ok(default),
        Some(s) => s.trim().parse().map_err(|_| {
            Pdf2ZipError::InvalidSettings(format!("'{s}' is not a valid value for {name}"))
        }),
    }
}

/// 200 with the archive as an attachment.
fn download_response(artifact: ArchiveArtifact) -> Response {
    info!(
        "Serving {} ({} bytes)",
        artifact.file_name,
        artifact.bytes.len()
    );
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, artifact.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", artifact.file_name),
            ),
        ],
        artifact.bytes,
    )
        .into_response()
}

/// Map a failure to its status code and JSON body.
fn error_response(error: &Pdf2ZipError) -> Response {
    let status = match error {
        Pdf2ZipError::NotAPdf { .. }
        | Pdf2ZipError::UnsupportedFormat { .. }
        | Pdf2ZipError::InvalidSettings(_)
        | Pdf2ZipError::RasterizationFailed { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Pdf2ZipError::RasterizerNotFound { .. }
        | Pdf2ZipError::ArchiveWriteFailed { .. }
        | Pdf2ZipError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
        }),
    )
        .into_response()
}

// ── Form page ────────────────────────────────────────────────────────────

const INDEX_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>PDF to Image Converter</title>
<style>
  body { font-family: system-ui, sans-serif; max-width: 40rem; margin: 2rem auto; padding: 0 1rem; }
  fieldset { border: 1px solid #ccc; border-radius: 6px; margin-bottom: 1rem; }
  label { display: block; margin: 0.75rem 0 0.25rem; font-weight: 600; }
  output { margin-left: 0.5rem; }
  button { font-size: 1rem; padding: 0.5rem 1.5rem; }
</style>
</head>
<body>
<h1>PDF to Image Converter</h1>
<form method="post" action="/convert" enctype="multipart/form-data">
  <fieldset>
    <legend>Upload</legend>
    <label for="file">PDF file</label>
    <input id="file" name="file" type="file" accept=".pdf,application/pdf" required>
  </fieldset>
  <fieldset>
    <legend>Conversion Settings</legend>
    <label for="dpi">DPI (Resolution)</label>
    <input id="dpi" name="dpi" type="range" min="150" max="1200" step="50" value="300"
           oninput="this.nextElementSibling.value = this.value">
    <output>300</output>
    <label for="quality">JPEG Quality</label>
    <input id="quality" name="quality" type="range" min="1" max="100" value="95"
           oninput="this.nextElementSibling.value = this.value">
    <output>95</output>
    <label for="first_page">First Page</label>
    <input id="first_page" name="first_page" type="number" min="1" value="1">
    <label for="last_page">Last Page</label>
    <input id="last_page" name="last_page" type="number" min="1" value="9999">
    <label for="format">Output Format</label>
    <select id="format" name="format">
      <option value="JPEG" selected>JPEG</option>
      <option value="PNG">PNG</option>
      <option value="TIFF">TIFF</option>
    </select>
  </fieldset>
  <button type="submit">Convert Now</button>
</form>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    const BOUNDARY: &str = "pdf2zip-test-boundary";

    fn text_part(name: &str, value: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
    }

    fn multipart_request(parts: &[String]) -> Request<Body> {
        let mut body = parts.concat();
        body.push_str(&format!("--{BOUNDARY}--\r\n"));
        Request::builder()
            .method("POST")
            .uri("/convert")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_string(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8_lossy(&bytes).into_owned()
    }

    #[tokio::test]
    async fn index_serves_the_form() {
        let response = app(ServerConfig::default())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("Convert Now"));
        for field in ["dpi", "quality", "first_page", "last_page", "format"] {
            assert!(body.contains(field), "form is missing the {field} control");
        }
    }

    #[tokio::test]
    async fn missing_file_is_a_client_error() {
        let request = multipart_request(&[text_part("dpi", "300")]);
        let response = app(ServerConfig::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_string(response).await;
        assert!(body.contains("No PDF file"), "got: {body}");
    }

    #[tokio::test]
    async fn unknown_format_is_rejected() {
        let request = multipart_request(&[text_part("format", "BMP")]);
        let response = app(ServerConfig::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_string(response).await;
        assert!(body.contains("Unsupported output format"), "got: {body}");
    }

    #[tokio::test]
    async fn non_numeric_dpi_is_rejected() {
        let request = multipart_request(&[text_part("dpi", "very high")]);
        let response = app(ServerConfig::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_string(response).await;
        assert!(body.contains("dpi"), "got: {body}");
    }

    #[tokio::test]
    async fn non_pdf_upload_is_rejected_by_extension_gate() {
        let file_part = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; \
             filename=\"photo.jpg\"\r\nContent-Type: image/jpeg\r\n\r\nnot a pdf\r\n"
        );
        let request = multipart_request(&[file_part]);
        let response = app(ServerConfig::default()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_string(response).await;
        assert!(body.contains("must be a PDF"), "got: {body}");
    }
}
