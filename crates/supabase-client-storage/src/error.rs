use serde::Deserialize;
use supabase_client_core::SupabaseError;

/// Error response format from the Supabase Storage API.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageApiErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "statusCode")]
    pub status_code: Option<String>,
}

impl StorageApiErrorResponse {
    /// Extract the most informative error message from the response.
    pub fn error_message(&self) -> Option<&str> {
        self.message.as_deref().or(self.error.as_deref())
    }
}

/// Build the `HttpStatus` error for a failed storage call, keeping the body.
pub(crate) fn status_error(status: u16, body: Vec<u8>) -> SupabaseError {
    let message = serde_json::from_slice::<StorageApiErrorResponse>(&body)
        .ok()
        .and_then(|resp| resp.error_message().map(str::to_string))
        .unwrap_or_else(|| format!("HTTP {status}"));
    SupabaseError::http_status(status, message, Some(body))
}
