use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap};

use crate::core::state::AppState;
use crate::services::image_urls::RequestOrigin;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FORWARDED_HOST: &str = "x-forwarded-host";

/// Origin used to turn stored image paths into absolute URLs. `PUBLIC_BASE_URL` wins;
/// otherwise the proxy headers, then `Host`, then the bind address.
pub(crate) struct ClientOrigin(pub(crate) RequestOrigin);

#[async_trait]
impl FromRequestParts<AppState> for ClientOrigin {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let settings = state.settings();
        if let Some(base_url) = settings.api().public_base_url.as_deref() {
            return Ok(ClientOrigin(RequestOrigin::from_base_url(base_url)));
        }

        let fallback_host = settings.server_addr();
        Ok(ClientOrigin(origin_from_headers(&parts.headers, &fallback_host)))
    }
}

fn first_header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty())
}

pub(crate) fn origin_from_headers(headers: &HeaderMap, fallback_host: &str) -> RequestOrigin {
    let scheme = match first_header_value(headers, FORWARDED_PROTO) {
        Some(proto) if proto.eq_ignore_ascii_case("https") => "https",
        _ => "http",
    };
    let host = first_header_value(headers, FORWARDED_HOST)
        .or_else(|| first_header_value(headers, header::HOST.as_str()))
        .unwrap_or(fallback_host);

    RequestOrigin::new(scheme, host)
}
