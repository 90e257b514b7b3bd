use std::collections::HashMap;

use serde::Serialize;

pub(crate) mod booking;
pub(crate) mod course;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
    pub(crate) api_prefix: String,
}

/// `{ "success": true, "message": ... }`
#[derive(Debug, Serialize)]
pub(crate) struct MessageResponse {
    pub(crate) success: bool,
    pub(crate) message: String,
}

impl MessageResponse {
    pub(crate) fn ok(message: impl Into<String>) -> Self {
        Self { success: true, message: message.into() }
    }
}
