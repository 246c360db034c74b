//! Fetch and timer transport shared by the HTTP and demo adapters.
//!
//! Calls route to the wasm implementation in the browser and to a failing shim elsewhere so
//! the crate still builds and tests on the host target.

use serde::de::DeserializeOwned;

#[cfg(not(target_arch = "wasm32"))]
mod non_wasm;
#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(not(target_arch = "wasm32"))]
use non_wasm as imp;
#[cfg(target_arch = "wasm32")]
use wasm as imp;

/// HTTP method subset used by the FocusDeck API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// One API request. `body` is a serialized JSON document.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            bearer: None,
            body: None,
        }
    }

    pub fn post_json<T: serde::Serialize>(url: impl Into<String>, body: &T) -> Result<Self, String> {
        Ok(Self {
            method: Method::Post,
            url: url.into(),
            bearer: None,
            body: Some(serde_json::to_string(body).map_err(|e| e.to_string())?),
        })
    }

    pub fn bearer(mut self, token: Option<String>) -> Self {
        self.bearer = token;
        self
    }
}

/// Sends `request` and deserializes a 2xx JSON response.
pub async fn fetch_json<T: DeserializeOwned>(request: &ApiRequest) -> Result<T, String> {
    imp::fetch_json(request).await
}

/// Sends `request` and returns only the status code.
pub async fn fetch_status(request: &ApiRequest) -> Result<u16, String> {
    imp::fetch_status(request).await
}

/// Resolves after `ms` milliseconds.
pub async fn sleep_ms(ms: u32) {
    imp::sleep_ms(ms).await
}
