//! Per-request state.
//!
//! Each request gets its own owned [`RequestContext`]; the sitemap is shared
//! read-only through a snapshot.

use tiny_http::{Method, Request};

use crate::core::UrlPath;

#[derive(Debug, Clone)]
pub struct RequestContext {
    pub method: Method,
    /// Raw request target, still percent-encoded.
    pub url: String,
    /// Raw `Range` header value.
    pub range: Option<String>,
}

impl RequestContext {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            range: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::Get, url)
    }

    pub fn with_range(mut self, range: impl Into<String>) -> Self {
        self.range = Some(range.into());
        self
    }

    pub fn from_request(request: &Request) -> Self {
        let range = request
            .headers()
            .iter()
            .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case("range"))
            .map(|h| h.value.to_string());

        Self {
            method: request.method().clone(),
            url: request.url().to_string(),
            range,
        }
    }

    pub fn is_head(&self) -> bool {
        self.method == Method::Head
    }

    /// Decoded, normalized request path.
    ///
    /// Accepts both origin-form (`/a/b`) and absolute-form
    /// (`http://host/a/b`) request targets.
    pub fn path(&self) -> UrlPath {
        UrlPath::from_absolute_url(&self.url).unwrap_or_else(|| UrlPath::from_browser(&self.url))
    }
}
