use serde::Deserialize;
use supabase_client_core::SupabaseError;

/// Error response format from Supabase Edge Functions.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionsApiErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl FunctionsApiErrorResponse {
    pub fn error_message(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}

/// Error message from a function body: JSON `message`/`error` first, then
/// the body text, then the bare status.
pub(crate) fn parse_error_message(status: u16, body: &[u8]) -> String {
    if let Ok(api_err) = serde_json::from_slice::<FunctionsApiErrorResponse>(body) {
        if let Some(message) = api_err.error_message() {
            return message.to_string();
        }
    }
    let text = String::from_utf8_lossy(body);
    if text.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        text.into_owned()
    }
}

/// The relay (`x-relay-error: true`) could not reach the function.
pub(crate) fn relay_error(status: u16, body: Vec<u8>) -> SupabaseError {
    let message = format!("relay error: {}", parse_error_message(status, &body));
    SupabaseError::http_status(status, message, Some(body))
}

/// The function itself answered with a non-2xx status.
pub(crate) fn function_error(status: u16, body: Vec<u8>) -> SupabaseError {
    let message = parse_error_message(status, &body);
    SupabaseError::http_status(status, message, Some(body))
}
