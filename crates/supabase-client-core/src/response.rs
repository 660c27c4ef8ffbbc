use serde::de::DeserializeOwned;

use crate::error::{SupabaseError, SupabaseResult};

/// Row count reported when no count was requested or the server could not
/// provide one.
pub const UNKNOWN_COUNT: i64 = -1;

/// Result of a terminal query call, matching Supabase's
/// `{ data, error, count, status }` pattern.
///
/// When `error` is set, `data` is empty and `count` is [`UNKNOWN_COUNT`].
#[derive(Debug, Clone)]
pub struct SupabaseResponse {
    /// Raw response payload, unchanged.
    pub data: Vec<u8>,
    /// Row count, or `-1` if unknown or not requested.
    pub count: i64,
    /// Error, if any.
    pub error: Option<SupabaseError>,
    /// HTTP status code (0 when no response was received).
    pub status: u16,
}

impl SupabaseResponse {
    /// Create a successful response.
    pub fn ok(data: Vec<u8>, count: i64, status: u16) -> Self {
        Self {
            data,
            count,
            error: None,
            status,
        }
    }

    /// Create an error response.
    pub fn error(err: SupabaseError) -> Self {
        let status = err.status().unwrap_or(0);
        Self {
            data: Vec::new(),
            count: UNKNOWN_COUNT,
            error: Some(err),
            status,
        }
    }

    /// Check if the response is successful.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Check if the response has an error.
    pub fn is_err(&self) -> bool {
        self.error.is_some()
    }

    /// Convert into a Result of `(payload, count)`, consuming the response.
    pub fn into_result(self) -> SupabaseResult<(Vec<u8>, i64)> {
        match self.error {
            Some(err) => Err(err),
            None => Ok((self.data, self.count)),
        }
    }

    /// The payload as UTF-8 text.
    pub fn text(&self) -> SupabaseResult<String> {
        if let Some(ref err) = self.error {
            return Err(SupabaseError::decode(format!("response carries an error: {err}")));
        }
        String::from_utf8(self.data.clone())
            .map_err(|e| SupabaseError::decode(format!("Response body is not valid UTF-8: {e}")))
    }

    /// Deserialize the payload as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> SupabaseResult<T> {
        if let Some(ref err) = self.error {
            return Err(SupabaseError::decode(format!("response carries an error: {err}")));
        }
        Ok(serde_json::from_slice(&self.data)?)
    }
}
