use crate::api::errors::ApiError;
use std::path::Path;

pub(crate) fn validate_image_upload(
    filename: &str,
    content_type: &str,
    allowed_extensions: &[String],
) -> Result<(), ApiError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| ApiError::BadRequest("Image file must have an extension".to_string()))?;

    if !allowed_extensions.iter().any(|allowed| allowed == &extension) {
        return Err(ApiError::BadRequest(format!("Image extension '{extension}' is not allowed")));
    }

    let mime = content_type.trim().to_ascii_lowercase();
    if mime_allowed_for_extension(&mime, &extension) {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "MIME type '{mime}' does not match extension '.{extension}'"
        )))
    }
}

pub(crate) fn ensure_upload_size(size: usize, max_bytes: u64, max_mb: u64) -> Result<(), ApiError> {
    if size as u64 > max_bytes {
        return Err(ApiError::BadRequest(format!("Image size exceeds {max_mb}MB limit")));
    }
    Ok(())
}

fn mime_allowed_for_extension(mime: &str, extension: &str) -> bool {
    match extension {
        "jpg" | "jpeg" => matches!(mime, "image/jpeg" | "image/jpg"),
        "png" => mime == "image/png",
        "webp" => mime == "image/webp",
        "gif" => mime == "image/gif",
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        ["jpg", "jpeg", "png", "webp"].iter().map(|ext| ext.to_string()).collect()
    }

    #[test]
    fn accepts_matching_extension_and_mime() {
        assert!(validate_image_upload("cover.PNG", "image/png", &allowed()).is_ok());
        assert!(validate_image_upload("cover.jpg", "image/jpeg", &allowed()).is_ok());
    }

    #[test]
    fn rejects_unknown_extension() {
        let err = validate_image_upload("script.exe", "image/png", &allowed()).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
        assert!(validate_image_upload("noext", "image/png", &allowed()).is_err());
    }

    #[test]
    fn rejects_mime_mismatch() {
        assert!(validate_image_upload("cover.png", "text/html", &allowed()).is_err());
    }

    #[test]
    fn size_limit_is_inclusive() {
        assert!(ensure_upload_size(1024, 1024, 1).is_ok());
        assert!(ensure_upload_size(1025, 1024, 1).is_err());
    }
}
