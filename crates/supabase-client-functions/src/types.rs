use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;

use supabase_client_core::{SupabaseError, SupabaseResult};

/// Body types for Edge Function invocation.
#[derive(Debug, Clone, PartialEq)]
pub enum InvokeBody {
    Json(Value),
    Bytes(Vec<u8>),
    Text(String),
    None,
}

/// Options for invoking an Edge Function.
///
/// # Example
/// ```
/// use supabase_client_functions::InvokeOptions;
/// use serde_json::json;
///
/// let opts = InvokeOptions::new()
///     .body(json!({"name": "World"}))
///     .header("x-custom", "value");
/// ```
#[derive(Debug, Clone)]
pub struct InvokeOptions {
    pub(crate) body: InvokeBody,
    pub(crate) method: Method,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) region: Option<String>,
    pub(crate) content_type: Option<String>,
    pub(crate) authorization: Option<String>,
}

impl Default for InvokeOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl InvokeOptions {
    /// POST with no body.
    pub fn new() -> Self {
        Self {
            body: InvokeBody::None,
            method: Method::POST,
            headers: Vec::new(),
            region: None,
            content_type: None,
            authorization: None,
        }
    }

    /// Set a JSON body.
    pub fn body(mut self, value: Value) -> Self {
        self.body = InvokeBody::Json(value);
        self
    }

    /// Set a raw binary body.
    pub fn body_bytes(mut self, bytes: Vec<u8>) -> Self {
        self.body = InvokeBody::Bytes(bytes);
        self
    }

    /// Set a text body.
    pub fn body_text(mut self, text: impl Into<String>) -> Self {
        self.body = InvokeBody::Text(text.into());
        self
    }

    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Add a custom header. Later values for the same name win.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }

    /// Route the call to a region, e.g. `"eu-central-1"` (sent as `x-region`).
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    /// Override the Content-Type header explicitly.
    pub fn content_type(mut self, ct: impl Into<String>) -> Self {
        self.content_type = Some(ct.into());
        self
    }

    /// Override the Authorization header (e.g., `"Bearer <user-jwt>"`).
    pub fn authorization(mut self, auth: impl Into<String>) -> Self {
        self.authorization = Some(auth.into());
        self
    }
}

/// Response from an Edge Function invocation.
#[derive(Debug, Clone)]
pub struct FunctionResponse {
    status: u16,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl FunctionResponse {
    pub(crate) fn new(status: u16, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A response header, if present and valid ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Deserialize the response body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> SupabaseResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// The response body as a UTF-8 string.
    pub fn text(&self) -> SupabaseResult<String> {
        String::from_utf8(self.body.clone())
            .map_err(|e| SupabaseError::decode(format!("Response body is not valid UTF-8: {e}")))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }
}
