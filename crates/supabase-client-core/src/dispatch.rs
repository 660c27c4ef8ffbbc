//! Authenticated HTTP dispatch shared by every sub-client.
//!
//! A [`RequestIntent`] describes one logical request (method, path relative
//! to the project URL, ordered query pairs, headers, optional body). The
//! [`Dispatcher`] resolves it against the configured project URL, applies
//! the proxy substitution, injects authentication headers and performs a
//! single buffered round trip.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, IntoHeaderName, AUTHORIZATION};
use reqwest::Method;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::config::SupabaseConfig;
use crate::error::{SupabaseError, SupabaseResult};

/// Description of a single HTTP request, built by a facade and consumed by
/// [`Dispatcher::execute`].
#[derive(Debug, Clone)]
pub struct RequestIntent {
    pub method: Method,
    /// Path relative to the project URL, always starting with `/`.
    pub path: String,
    /// Query parameters in the order they will appear on the wire.
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl RequestIntent {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        Self {
            method,
            path,
            query: Vec::new(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Append a query parameter. Existing pairs with the same key are kept.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set a header, replacing any previous value under the same name.
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Set a header from arbitrary strings, validating both parts.
    pub fn try_header(self, name: &str, value: &str) -> SupabaseResult<Self> {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| SupabaseError::config(format!("Invalid header name '{name}': {e}")))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| SupabaseError::config(format!("Invalid header value for '{name}': {e}")))?;
        Ok(self.header(header_name, header_value))
    }

    /// Raw request body.
    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Serialize `value` as the JSON body and set `Content-Type: application/json`.
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> SupabaseResult<Self> {
        let body = serde_json::to_vec(value)
            .map_err(|e| SupabaseError::config(format!("Failed to encode JSON body: {e}")))?;
        Ok(self
            .header(
                reqwest::header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            )
            .body(body))
    }
}

/// Unmodified response components returned by the dispatcher.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header as a string, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The body as UTF-8 text.
    pub fn text(&self) -> SupabaseResult<String> {
        String::from_utf8(self.body.clone())
            .map_err(|e| SupabaseError::decode(format!("Response body is not valid UTF-8: {e}")))
    }
}

/// Performs authenticated round trips against the configured project.
///
/// Cheap to clone: the HTTP client and the configuration are shared.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    http: reqwest::Client,
    config: Arc<SupabaseConfig>,
    default_headers: HeaderMap,
}

impl Dispatcher {
    pub fn new(config: Arc<SupabaseConfig>) -> SupabaseResult<Self> {
        // The proxy option substitutes the request origin; environment proxies
        // would route around it.
        let mut builder = reqwest::Client::builder().no_proxy();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let http = builder
            .build()
            .map_err(|e| SupabaseError::config(format!("Failed to build HTTP client: {e}")))?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(
            "apikey",
            HeaderValue::from_str(config.api_key())
                .map_err(|e| SupabaseError::config(format!("Invalid API key header: {e}")))?,
        );
        default_headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key()))
                .map_err(|e| SupabaseError::config(format!("Invalid auth header: {e}")))?,
        );
        for (name, value) in config.headers() {
            default_headers.insert(name.clone(), value.clone());
        }

        Ok(Self {
            http,
            config,
            default_headers,
        })
    }

    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    /// Compute the URL the intent will be sent to.
    ///
    /// The logical URL is the project URL followed by the intent path and
    /// query. With a proxy configured, only scheme, host and port change.
    /// The path is set through [`Url::set_path`], so `?` and `#` inside
    /// resource names are percent-encoded instead of starting a query or
    /// fragment.
    pub fn resolve_url(&self, intent: &RequestIntent) -> SupabaseResult<Url> {
        let mut url = self.config.supabase_url().clone();
        let base_path = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{}{}", base_path, intent.path));
        url.set_query(None);
        url.set_fragment(None);

        if !intent.query.is_empty() {
            url.query_pairs_mut().extend_pairs(
                intent
                    .query
                    .iter()
                    .map(|(k, v)| (k.as_str(), v.as_str())),
            );
        }

        if let Some(proxy) = self.config.proxy() {
            substitute_origin(&mut url, proxy)?;
        }

        Ok(url)
    }

    /// Headers that will accompany the intent: auth, then config extras,
    /// then the intent's own headers. Later sources win on collision.
    pub fn merged_headers(&self, intent: &RequestIntent) -> HeaderMap {
        let mut headers = self.default_headers.clone();
        for (name, value) in &intent.headers {
            headers.insert(name.clone(), value.clone());
        }
        headers
    }

    /// Perform one HTTP round trip and return the raw response.
    ///
    /// Non-2xx responses are returned as-is; only transport failures are
    /// reported as [`SupabaseError::Network`].
    pub async fn execute(&self, intent: RequestIntent) -> SupabaseResult<RawResponse> {
        let url = self.resolve_url(&intent)?;
        let headers = self.merged_headers(&intent);

        debug!(method = %intent.method, url = %url, "Dispatching request");

        let mut request = self.http.request(intent.method, url).headers(headers);
        if let Some(body) = intent.body {
            request = request.body(body);
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        debug!(status, bytes = body.len(), "Received response");

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

fn substitute_origin(url: &mut Url, proxy: &Url) -> SupabaseResult<()> {
    url.set_scheme(proxy.scheme())
        .map_err(|_| SupabaseError::config(format!("Cannot use proxy scheme '{}'", proxy.scheme())))?;
    url.set_host(proxy.host_str())?;
    url.set_port(proxy.port())
        .map_err(|_| SupabaseError::config("Cannot apply proxy port"))?;
    Ok(())
}
