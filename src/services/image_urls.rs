//! Stored course images are relative (`/uploads/<file>`) or external URLs; clients always
//! receive something they can fetch directly.

pub(crate) const UPLOADS_ROUTE: &str = "/uploads";

/// `scheme://host` of the current request (or the configured public base URL).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RequestOrigin {
    base: String,
}

impl RequestOrigin {
    pub(crate) fn new(scheme: &str, host: &str) -> Self {
        Self { base: format!("{scheme}://{host}") }
    }

    pub(crate) fn from_base_url(base_url: &str) -> Self {
        Self { base: base_url.trim_end_matches('/').to_string() }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.base
    }
}

pub(crate) fn is_absolute_url(image: &str) -> bool {
    image.starts_with("http://") || image.starts_with("https://")
}

pub(crate) fn resolve_image_url(image: &str, origin: &RequestOrigin) -> String {
    if image.is_empty() || is_absolute_url(image) {
        return image.to_string();
    }

    let base = origin.as_str();
    if image.starts_with('/') {
        format!("{base}{image}")
    } else if image.starts_with("uploads/") {
        format!("{base}/{image}")
    } else {
        format!("{base}{UPLOADS_ROUTE}/{image}")
    }
}
