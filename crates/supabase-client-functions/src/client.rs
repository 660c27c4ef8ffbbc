use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value as JsonValue;
use tracing::debug;

use supabase_client_core::{Dispatcher, RequestIntent, SupabaseError, SupabaseResult};

use crate::error::{function_error, relay_error};
use crate::types::{FunctionResponse, InvokeBody, InvokeOptions};

/// Path prefix of the Edge Functions service.
pub const FUNCTIONS_PREFIX: &str = "/functions/v1";

/// HTTP client for Supabase Edge Functions.
///
/// Communicates with Edge Functions at `/functions/v1/{function_name}`.
///
/// # Example
/// ```ignore
/// use supabase_client_functions::{InvokeOptions, SupabaseClientFunctionsExt};
/// use serde_json::json;
///
/// let body = client.functions().invoke("hello", json!({"name": "World"})).await?;
///
/// let response = client
///     .functions()
///     .invoke_with("hello", InvokeOptions::new().region("eu-west-1"))
///     .await?;
/// let data: serde_json::Value = response.json()?;
/// ```
#[derive(Debug, Clone)]
pub struct FunctionsClient {
    dispatcher: Dispatcher,
}

impl FunctionsClient {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// POST `payload` as JSON and return the response body as text.
    pub async fn invoke(&self, function_name: &str, payload: JsonValue) -> SupabaseResult<String> {
        self.invoke_with(function_name, InvokeOptions::new().body(payload))
            .await?
            .text()
    }

    /// Invoke an Edge Function with full control over the request.
    ///
    /// # Errors
    /// * `HttpStatus` with a `relay error:` message if the Supabase relay
    ///   answered instead of the function (`x-relay-error: true`).
    /// * `HttpStatus` if the function returned a non-2xx status.
    /// * `Network` on transport failure, `Config` for unusable names or headers.
    pub async fn invoke_with(
        &self,
        function_name: &str,
        options: InvokeOptions,
    ) -> SupabaseResult<FunctionResponse> {
        let intent = build_invoke_request(function_name, options)?;
        debug!(function = function_name, method = %intent.method, "Invoking edge function");

        let raw = self.dispatcher.execute(intent).await?;

        let is_relay_error = raw
            .header("x-relay-error")
            .map(|v| v == "true")
            .unwrap_or(false);
        if is_relay_error {
            debug!(status = raw.status, "Relay error from edge function");
            return Err(relay_error(raw.status, raw.body));
        }
        if !raw.is_success() {
            debug!(status = raw.status, "HTTP error from edge function");
            return Err(function_error(raw.status, raw.body));
        }

        Ok(FunctionResponse::new(raw.status, raw.headers, raw.body))
    }
}

pub(crate) fn build_invoke_request(
    function_name: &str,
    options: InvokeOptions,
) -> SupabaseResult<RequestIntent> {
    let name = function_name.trim().trim_matches('/');
    if name.is_empty() {
        return Err(SupabaseError::config("function name must not be empty"));
    }

    let mut intent = RequestIntent::new(options.method, format!("{FUNCTIONS_PREFIX}/{name}"));

    if let Some(auth) = &options.authorization {
        intent = intent.try_header(AUTHORIZATION.as_str(), auth)?;
    }
    if let Some(region) = &options.region {
        intent = intent.try_header("x-region", region)?;
    }
    for (key, value) in &options.headers {
        intent = intent.try_header(key, value)?;
    }

    let (default_type, body) = match options.body {
        InvokeBody::Json(value) => ("application/json", Some(serde_json::to_vec(&value)?)),
        InvokeBody::Bytes(bytes) => ("application/octet-stream", Some(bytes)),
        InvokeBody::Text(text) => ("text/plain", Some(text.into_bytes())),
        InvokeBody::None => ("", None),
    };
    // An explicit content type wins, then a Content-Type passed as a custom
    // header, then the default for the body kind.
    if let Some(content_type) = &options.content_type {
        intent = intent.try_header(CONTENT_TYPE.as_str(), content_type)?;
    } else if !default_type.is_empty() && !intent.headers.contains_key(CONTENT_TYPE) {
        intent = intent.try_header(CONTENT_TYPE.as_str(), default_type)?;
    }
    if let Some(body) = body {
        intent = intent.body(body);
    }

    Ok(intent)
}
