use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use serde_json::{Map, Value};

use crate::api::errors::ApiError;
use crate::api::extract::ApiJson;
use crate::api::validation::ensure_upload_size;
use crate::core::state::AppState;

const IMAGE_FIELD: &str = "image";

pub(super) struct ImageUpload {
    pub(super) filename: String,
    pub(super) content_type: String,
    pub(super) bytes: Vec<u8>,
}

/// Course creation input before normalization: every form field as a string value
/// (JSON bodies keep their own types) plus the optional cover image.
pub(super) struct CourseSubmission {
    pub(super) fields: Map<String, Value>,
    pub(super) image: Option<ImageUpload>,
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}

pub(super) async fn read_submission(
    request: Request,
    state: &AppState,
) -> Result<CourseSubmission, ApiError> {
    if is_multipart(&request) {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| ApiError::BadRequest(e.body_text()))?;
        return read_multipart(multipart, state).await;
    }

    let ApiJson(body) = ApiJson::<Value>::from_request(request, state).await?;

    match body {
        Value::Object(fields) => Ok(CourseSubmission { fields, image: None }),
        _ => Err(ApiError::BadRequest("Course payload must be a JSON object".to_string())),
    }
}

async fn read_multipart(
    mut multipart: Multipart,
    state: &AppState,
) -> Result<CourseSubmission, ApiError> {
    let storage = state.settings().storage();
    let max_bytes = storage.max_upload_bytes();
    let mut fields = Map::new();
    let mut image = None;

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        if name.is_empty() {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        if name == IMAGE_FIELD && file_name.is_some() {
            let filename = file_name.unwrap_or_default();
            let content_type =
                field.content_type().unwrap_or("application/octet-stream").to_string();

            let mut bytes = Vec::new();
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|_| ApiError::BadRequest("Failed to read image".to_string()))?
            {
                ensure_upload_size(bytes.len() + chunk.len(), max_bytes, storage.max_upload_size_mb)?;
                bytes.extend_from_slice(&chunk);
            }

            // Browsers submit an empty, unnamed part when no file was chosen.
            if filename.is_empty() && bytes.is_empty() {
                continue;
            }
            image = Some(ImageUpload { filename, content_type, bytes });
            continue;
        }

        let text = field
            .text()
            .await
            .map_err(|_| ApiError::BadRequest(format!("Invalid form field '{name}'")))?;
        fields.insert(name, Value::String(text));
    }

    Ok(CourseSubmission { fields, image })
}
