use reqwest::Method;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};

use supabase_client_core::{Dispatcher, RequestIntent, SupabaseError, SupabaseResult};

use crate::count::CountMode;
use crate::postgrest::REST_PREFIX;

/// Build the POST request for a stored procedure call.
///
/// `params` must be a JSON object or `null` (sent as `{}`).
pub fn build_rpc_request(
    function: &str,
    count: CountMode,
    params: &JsonValue,
    schema: &str,
) -> SupabaseResult<RequestIntent> {
    let function = function.trim();
    if function.is_empty() {
        return Err(SupabaseError::config("function name must not be empty"));
    }

    let body = match params {
        JsonValue::Null => JsonValue::Object(Default::default()),
        JsonValue::Object(_) => params.clone(),
        _ => {
            return Err(SupabaseError::config(
                "RPC arguments must be a JSON object or null",
            ))
        }
    };

    let mut intent = RequestIntent::new(Method::POST, format!("{REST_PREFIX}/rpc/{function}"))
        .json(&body)?
        .try_header("Accept", "application/json")?;
    if let Some(prefer) = count.prefer_value() {
        intent = intent.try_header("Prefer", prefer)?;
    }
    if schema != "public" {
        intent = intent.try_header("Content-Profile", schema)?;
    }
    Ok(intent)
}

/// Call a stored procedure and return its body as text.
///
/// The body is returned for every HTTP status; PostgREST reports failures
/// inside it. Only configuration, transport and UTF-8 problems are `Err`.
pub async fn call(
    dispatcher: &Dispatcher,
    schema: &str,
    function: &str,
    count: CountMode,
    params: &JsonValue,
) -> SupabaseResult<String> {
    let intent = build_rpc_request(function, count, params, schema)?;
    debug!(function, "Calling RPC");

    let raw = dispatcher.execute(intent).await?;
    if !raw.is_success() {
        warn!(function, status = raw.status, "RPC returned a non-success status");
    }
    raw.text()
}
