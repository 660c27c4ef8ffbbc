//! Async Supabase client.
//!
//! One [`SupabaseClient`] holds the project URL, API key and options; the
//! query, storage and functions facades borrow its dispatcher through
//! extension traits.
//!
//! ```ignore
//! use supabase_client::prelude::*;
//! use serde_json::{json, Value as JsonValue};
//!
//! let client = SupabaseClient::new("https://your-project.supabase.co", "anon-key", None)?;
//!
//! let resp = client.from("countries").select("*", CountMode::Exact, false).execute().await;
//! let greeting = client.rpc("hello_world", CountMode::None, JsonValue::Null).await?;
//! let bucket = client.storage().get_bucket("avatars").await?;
//! let reply = client.functions().invoke("hello", json!({"name": "world"})).await?;
//! ```

// Re-export core (always available)
pub use supabase_client_core::*;

// Re-export query builder (feature-gated)
#[cfg(feature = "query")]
pub use supabase_client_query::*;

#[cfg(feature = "storage")]
pub use supabase_client_storage;

#[cfg(feature = "functions")]
pub use supabase_client_functions;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use supabase_client::prelude::*;
/// ```
pub mod prelude {
    pub use supabase_client_core::{
        ClientOptions, ErrorKind, SupabaseClient, SupabaseConfig, SupabaseError,
        SupabaseResponse, SupabaseResult,
    };

    #[cfg(feature = "query")]
    pub use supabase_client_query::{
        CountMode, Filterable, IsValue, Modifiable, NullsPosition, OrderDirection, Returning,
        SupabaseClientQueryExt, TextSearchType,
    };

    #[cfg(feature = "storage")]
    pub use supabase_client_storage::{
        Bucket, BucketOptions, FileObject, FileOptions, SearchOptions, SortOrder,
        StorageBucketApi, StorageClient, SupabaseClientStorageExt,
    };

    #[cfg(feature = "functions")]
    pub use supabase_client_functions::{
        FunctionResponse, FunctionsClient, InvokeBody, InvokeOptions,
        SupabaseClientFunctionsExt,
    };
}
