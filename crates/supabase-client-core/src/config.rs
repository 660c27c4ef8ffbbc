use std::collections::HashMap;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::error::{SupabaseError, SupabaseResult};

/// Optional settings accepted when constructing a client.
///
/// # Example
/// ```
/// use supabase_client_core::ClientOptions;
///
/// let opts = ClientOptions::new()
///     .proxy("http://127.0.0.1:8080")
///     .header("x-client-info", "my-app/1.0");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    pub(crate) proxy: Option<String>,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) schema: Option<String>,
    pub(crate) timeout: Option<Duration>,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send every request to this origin instead of the project URL.
    ///
    /// Only the scheme, host and port are taken from the proxy; paths and
    /// query strings are preserved.
    pub fn proxy(mut self, url: impl Into<String>) -> Self {
        self.proxy = Some(url.into());
        self
    }

    /// Add a default header sent with every request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Add several default headers.
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    /// Set the default PostgREST schema (defaults to "public").
    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Set the transport-level request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Validated, immutable configuration shared by all sub-clients.
#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    supabase_url: Url,
    api_key: String,
    proxy: Option<Url>,
    headers: HeaderMap,
    schema: String,
    timeout: Option<Duration>,
}

impl SupabaseConfig {
    /// Validate the project URL, API key and options.
    ///
    /// Fails with [`SupabaseError::Config`] when the URL is empty or not an
    /// absolute http(s) URL, when the proxy is invalid, or when a header
    /// name or value cannot be sent over HTTP.
    pub fn new(
        supabase_url: &str,
        api_key: &str,
        options: ClientOptions,
    ) -> SupabaseResult<Self> {
        let supabase_url = parse_base_url(supabase_url, "supabase_url")?;

        HeaderValue::from_str(api_key)
            .map_err(|e| SupabaseError::config(format!("Invalid API key header: {e}")))?;

        let proxy = options
            .proxy
            .as_deref()
            .map(|p| parse_base_url(p, "proxy"))
            .transpose()?;

        let mut headers = HeaderMap::new();
        for (name, value) in &options.headers {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
                SupabaseError::config(format!("Invalid header name '{name}': {e}"))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|e| {
                SupabaseError::config(format!("Invalid header value for '{name}': {e}"))
            })?;
            headers.insert(header_name, header_value);
        }

        Ok(Self {
            supabase_url,
            api_key: api_key.to_string(),
            proxy,
            headers,
            schema: options.schema.unwrap_or_else(|| "public".to_string()),
            timeout: options.timeout,
        })
    }

    /// The project URL every logical path is resolved against.
    pub fn supabase_url(&self) -> &Url {
        &self.supabase_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The origin substituted into outgoing requests, if any.
    pub fn proxy(&self) -> Option<&Url> {
        self.proxy.as_ref()
    }

    /// Extra default headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Default schema.
    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

fn parse_base_url(raw: &str, field: &str) -> SupabaseResult<Url> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SupabaseError::config(format!("{field} must not be empty")));
    }
    let url = Url::parse(trimmed)
        .map_err(|e| SupabaseError::config(format!("Invalid {field} '{trimmed}': {e}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return Err(SupabaseError::config(format!(
            "{field} must be an absolute http(s) URL, got '{trimmed}'"
        )));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn config_defaults() {
        let config =
            SupabaseConfig::new("https://example.supabase.co", "key", ClientOptions::new())
                .unwrap();
        assert_eq!(config.supabase_url().host_str(), Some("example.supabase.co"));
        assert_eq!(config.api_key(), "key");
        assert_eq!(config.schema(), "public");
        assert!(config.proxy().is_none());
        assert!(config.headers().is_empty());
        assert!(config.timeout().is_none());
    }

    #[test]
    fn config_empty_url_rejected() {
        let err = SupabaseConfig::new("", "key", ClientOptions::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        let err = SupabaseConfig::new("   ", "key", ClientOptions::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn config_invalid_url_rejected() {
        let err = SupabaseConfig::new("not a url", "key", ClientOptions::new()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
        let err = SupabaseConfig::new("ftp://example.com", "key", ClientOptions::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn config_invalid_proxy_rejected() {
        let err = SupabaseConfig::new(
            "https://example.supabase.co",
            "key",
            ClientOptions::new().proxy("::nope::"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn config_invalid_header_rejected() {
        let err = SupabaseConfig::new(
            "https://example.supabase.co",
            "key",
            ClientOptions::new().header("bad header", "v"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);

        let err = SupabaseConfig::new(
            "https://example.supabase.co",
            "key",
            ClientOptions::new().header("x-ok", "line\nbreak"),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn config_invalid_api_key_rejected() {
        let err = SupabaseConfig::new("https://example.supabase.co", "a\nb", ClientOptions::new())
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn config_options_applied() {
        let config = SupabaseConfig::new(
            "https://example.supabase.co",
            "key",
            ClientOptions::new()
                .proxy("http://127.0.0.1:9999")
                .header("x-client-info", "test")
                .schema("private")
                .timeout(Duration::from_secs(5)),
        )
        .unwrap();
        assert_eq!(config.proxy().unwrap().port(), Some(9999));
        assert_eq!(config.headers().get("x-client-info").unwrap(), "test");
        assert_eq!(config.schema(), "private");
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
    }
}
