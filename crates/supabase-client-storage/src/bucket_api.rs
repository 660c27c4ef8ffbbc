use reqwest::header::CONTENT_TYPE;
use reqwest::Method;
use serde_json::json;

use supabase_client_core::{RequestIntent, SupabaseError, SupabaseResult};

use crate::client::StorageClient;
use crate::types::{FileOptions, SearchOptions, SignedUrlResponse};

/// File operations API scoped to a specific bucket.
///
/// Created via `StorageClient::from("bucket_name")`.
///
/// # Example
/// ```ignore
/// let file_api = storage.from("avatars");
/// file_api.upload("photo.png", data, FileOptions::new()).await?;
/// let bytes = file_api.download("photo.png").await?;
/// ```
#[derive(Debug, Clone)]
pub struct StorageBucketApi {
    client: StorageClient,
    bucket_id: String,
}

impl StorageBucketApi {
    pub(crate) fn new(client: StorageClient, bucket_id: String) -> Self {
        Self { client, bucket_id }
    }

    fn object_path(&self, path: &str) -> String {
        format!("/object/{}/{}", self.bucket_id, path.trim_start_matches('/'))
    }

    fn file_intent(
        &self,
        method: Method,
        path: &str,
        data: Vec<u8>,
        options: &FileOptions,
    ) -> SupabaseResult<RequestIntent> {
        let content_type = options
            .content_type
            .as_deref()
            .unwrap_or("application/octet-stream");

        let mut intent = self
            .client
            .intent(method, &self.object_path(path))
            .try_header(CONTENT_TYPE.as_str(), content_type)?
            .body(data);

        if let Some(cache) = &options.cache_control {
            intent = intent.try_header("cache-control", &format!("max-age={cache}"))?;
        }
        if let Some(upsert) = options.upsert {
            intent = intent.try_header("x-upsert", if upsert { "true" } else { "false" })?;
        }
        Ok(intent)
    }

    /// Upload a file to the bucket.
    pub async fn upload(
        &self,
        path: &str,
        data: Vec<u8>,
        options: FileOptions,
    ) -> SupabaseResult<String> {
        let intent = self.file_intent(Method::POST, path, data, &options)?;
        self.client.send_text(intent).await
    }

    /// Update (replace) a file in the bucket.
    pub async fn update(
        &self,
        path: &str,
        data: Vec<u8>,
        options: FileOptions,
    ) -> SupabaseResult<String> {
        let intent = self.file_intent(Method::PUT, path, data, &options)?;
        self.client.send_text(intent).await
    }

    /// Download a file from the bucket.
    ///
    /// Returns the raw file bytes.
    pub async fn download(&self, path: &str) -> SupabaseResult<Vec<u8>> {
        let intent = self.client.intent(Method::GET, &self.object_path(path));
        Ok(self.client.send(intent).await?.body)
    }

    /// List files in the bucket under `prefix` (`""` for the root).
    pub async fn list(&self, prefix: &str, options: SearchOptions) -> SupabaseResult<String> {
        let mut body = serde_json::to_value(&options)?;
        body["prefix"] = json!(prefix);

        let intent = self
            .client
            .intent(Method::POST, &format!("/object/list/{}", self.bucket_id))
            .json(&body)?;
        self.client.send_text(intent).await
    }

    /// Remove files from the bucket.
    pub async fn remove(&self, paths: &[&str]) -> SupabaseResult<String> {
        let intent = self
            .client
            .intent(Method::DELETE, &format!("/object/{}", self.bucket_id))
            .json(&json!({ "prefixes": paths }))?;
        self.client.send_text(intent).await
    }

    /// Move a file within the bucket.
    pub async fn move_object(&self, from: &str, to: &str) -> SupabaseResult<String> {
        let intent = self
            .client
            .intent(Method::POST, "/object/move")
            .json(&json!({
                "bucketId": self.bucket_id,
                "sourceKey": from,
                "destinationKey": to,
            }))?;
        self.client.send_text(intent).await
    }

    /// Copy a file within the bucket.
    pub async fn copy_object(&self, from: &str, to: &str) -> SupabaseResult<String> {
        let intent = self
            .client
            .intent(Method::POST, "/object/copy")
            .json(&json!({
                "bucketId": self.bucket_id,
                "sourceKey": from,
                "destinationKey": to,
            }))?;
        self.client.send_text(intent).await
    }

    /// Create a signed URL for time-limited access to a file.
    ///
    /// `expires_in` is the number of seconds until the URL expires. The
    /// returned URL is absolute.
    pub async fn create_signed_url(&self, path: &str, expires_in: u64) -> SupabaseResult<String> {
        let intent = self
            .client
            .intent(
                Method::POST,
                &format!("/object/sign/{}/{}", self.bucket_id, path.trim_start_matches('/')),
            )
            .json(&json!({ "expiresIn": expires_in }))?;
        let body = self.client.send(intent).await?.body;
        let resp: SignedUrlResponse = serde_json::from_slice(&body)
            .map_err(|e| SupabaseError::decode(format!("Invalid signed URL response: {e}")))?;

        // Relative signed URLs are resolved against the storage base
        if resp.signed_url.starts_with('/') {
            Ok(format!("{}{}", self.client.base_url(), resp.signed_url))
        } else {
            Ok(resp.signed_url)
        }
    }

    /// Get the public URL for a file (no HTTP call, just URL construction).
    ///
    /// Only works for files in public buckets.
    pub fn get_public_url(&self, path: &str) -> String {
        self.client
            .url(&format!(
                "/object/public/{}/{}",
                self.bucket_id,
                path.trim_start_matches('/')
            ))
            .to_string()
    }

    /// Get the bucket ID this API is scoped to.
    pub fn bucket_id(&self) -> &str {
        &self.bucket_id
    }
}
