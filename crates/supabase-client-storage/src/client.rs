use reqwest::Method;
use serde_json::json;
use tracing::warn;
use url::Url;

use supabase_client_core::{Dispatcher, RawResponse, RequestIntent, SupabaseResult};

use crate::bucket_api::StorageBucketApi;
use crate::error::status_error;
use crate::types::{BucketOptions, BucketRequest};

/// Path prefix of the Storage service.
pub const STORAGE_PREFIX: &str = "/storage/v1";

/// HTTP client for Supabase Storage API.
///
/// Shares the dispatcher (and therefore the auth headers and proxy
/// settings) of the [`SupabaseClient`](supabase_client_core::SupabaseClient)
/// it came from. Calls return the raw response body; decode it into
/// [`Bucket`](crate::Bucket) or [`FileObject`](crate::FileObject) as needed.
///
/// # Example
/// ```ignore
/// let storage = client.storage();
/// let body = storage.get_bucket("avatars").await?;
/// let bucket: Bucket = serde_json::from_str(&body)?;
/// let file_api = storage.from("avatars");
/// ```
#[derive(Debug, Clone)]
pub struct StorageClient {
    dispatcher: Dispatcher,
}

impl StorageClient {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self { dispatcher }
    }

    /// Public base URL of the storage API (`<project>/storage/v1`).
    pub fn base_url(&self) -> String {
        let project = self.dispatcher.config().supabase_url().as_str();
        format!("{}{}", project.trim_end_matches('/'), STORAGE_PREFIX)
    }

    /// Absolute project URL for a storage path, with reserved characters in
    /// the path percent-encoded.
    pub(crate) fn url(&self, path: &str) -> Url {
        let mut url = self.dispatcher.config().supabase_url().clone();
        let current = url.path().trim_end_matches('/').to_string();
        url.set_path(&format!("{current}{STORAGE_PREFIX}{path}"));
        url.set_query(None);
        url.set_fragment(None);
        url
    }

    // ─── Bucket Operations ───────────────────────────────────────

    /// List all buckets.
    pub async fn list_buckets(&self) -> SupabaseResult<String> {
        self.send_text(self.intent(Method::GET, "/bucket")).await
    }

    /// Get a bucket by ID.
    pub async fn get_bucket(&self, id: &str) -> SupabaseResult<String> {
        self.send_text(self.intent(Method::GET, &format!("/bucket/{id}")))
            .await
    }

    /// Create a new bucket.
    pub async fn create_bucket(&self, id: &str, options: BucketOptions) -> SupabaseResult<String> {
        let body = BucketRequest {
            id,
            name: id,
            options: &options,
        };
        let intent = self.intent(Method::POST, "/bucket").json(&body)?;
        self.send_text(intent).await
    }

    /// Update a bucket.
    pub async fn update_bucket(&self, id: &str, options: BucketOptions) -> SupabaseResult<String> {
        let body = BucketRequest {
            id,
            name: id,
            options: &options,
        };
        let intent = self
            .intent(Method::PUT, &format!("/bucket/{id}"))
            .json(&body)?;
        self.send_text(intent).await
    }

    /// Empty a bucket (remove all files).
    pub async fn empty_bucket(&self, id: &str) -> SupabaseResult<String> {
        let intent = self
            .intent(Method::POST, &format!("/bucket/{id}/empty"))
            .json(&json!({}))?;
        self.send_text(intent).await
    }

    /// Delete a bucket. The bucket must be empty first.
    pub async fn delete_bucket(&self, id: &str) -> SupabaseResult<String> {
        let intent = self
            .intent(Method::DELETE, &format!("/bucket/{id}"))
            .json(&json!({}))?;
        self.send_text(intent).await
    }

    // ─── File API Factory ────────────────────────────────────────

    /// Create a file operations API scoped to a bucket.
    pub fn from(&self, bucket: &str) -> StorageBucketApi {
        StorageBucketApi::new(self.clone(), bucket.to_string())
    }

    // ─── Internal Helpers ────────────────────────────────────────

    pub(crate) fn intent(&self, method: Method, path: &str) -> RequestIntent {
        RequestIntent::new(method, format!("{STORAGE_PREFIX}{path}"))
    }

    /// Dispatch and turn non-2xx statuses into `HttpStatus` errors.
    pub(crate) async fn send(&self, intent: RequestIntent) -> SupabaseResult<RawResponse> {
        let path = intent.path.clone();
        let raw = self.dispatcher.execute(intent).await?;
        if !raw.is_success() {
            warn!(path = %path, status = raw.status, "Storage request failed");
            return Err(status_error(raw.status, raw.body));
        }
        Ok(raw)
    }

    pub(crate) async fn send_text(&self, intent: RequestIntent) -> SupabaseResult<String> {
        self.send(intent).await?.text()
    }
}
