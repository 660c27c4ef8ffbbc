//! Supabase Edge Functions facade.
//!
//! Invokes functions deployed at `/functions/v1/{function_name}` through the
//! dispatcher of a [`SupabaseClient`].
//!
//! # Usage
//!
//! ```ignore
//! use supabase_client_functions::SupabaseClientFunctionsExt;
//! use serde_json::json;
//!
//! let body = client.functions().invoke("hello", json!({"name": "World"})).await?;
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::FunctionsClient;
pub use error::FunctionsApiErrorResponse;
pub use types::{FunctionResponse, InvokeBody, InvokeOptions};

use supabase_client_core::SupabaseClient;

/// Extension trait to create a [`FunctionsClient`] from a [`SupabaseClient`].
pub trait SupabaseClientFunctionsExt {
    /// A functions client sharing this client's dispatcher.
    fn functions(&self) -> FunctionsClient;
}

impl SupabaseClientFunctionsExt for SupabaseClient {
    fn functions(&self) -> FunctionsClient {
        FunctionsClient::new(self.dispatcher().clone())
    }
}
