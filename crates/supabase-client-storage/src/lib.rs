//! Supabase Storage facade.
//!
//! Talks to the Storage REST endpoints at `/storage/v1/...` through the
//! dispatcher of a [`SupabaseClient`].
//!
//! # Usage
//!
//! ```ignore
//! use supabase_client_storage::{BucketOptions, FileOptions, SupabaseClientStorageExt};
//!
//! let storage = client.storage();
//!
//! // Bucket operations
//! let buckets = storage.list_buckets().await?;
//! storage.create_bucket("photos", BucketOptions::new().public(true)).await?;
//!
//! // File operations
//! let file_api = storage.from("photos");
//! file_api.upload("photo.png", data, FileOptions::new().content_type("image/png")).await?;
//! let bytes = file_api.download("photo.png").await?;
//! ```

pub mod bucket_api;
pub mod client;
pub mod error;
pub mod types;

pub use bucket_api::StorageBucketApi;
pub use client::StorageClient;
pub use error::StorageApiErrorResponse;
pub use types::{Bucket, BucketOptions, FileObject, FileOptions, SearchOptions, SortBy, SortOrder};

use supabase_client_core::SupabaseClient;

/// Extension trait to create a [`StorageClient`] from a [`SupabaseClient`].
pub trait SupabaseClientStorageExt {
    /// A storage client sharing this client's dispatcher.
    fn storage(&self) -> StorageClient;
}

impl SupabaseClientStorageExt for SupabaseClient {
    fn storage(&self) -> StorageClient {
        StorageClient::new(self.dispatcher().clone())
    }
}
