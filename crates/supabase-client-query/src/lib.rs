//! PostgREST query builder and RPC invoker for [`SupabaseClient`].
//!
//! ```ignore
//! use supabase_client_query::{CountMode, Filterable, SupabaseClientQueryExt};
//!
//! let resp = client
//!     .from("countries")
//!     .select("*", CountMode::Exact, false)
//!     .eq("id", 1)
//!     .execute()
//!     .await;
//! ```

pub mod builder;
pub mod count;
pub mod filter;
pub mod modifier;
pub mod parts;
pub mod postgrest;
pub mod rpc;

pub use builder::QueryBuilder;
pub use count::{extract_count, CountMode};
pub use filter::{FilterOperator, FilterPredicate, Filterable, IsValue, TextSearchType};
pub use modifier::{Modifiable, NullsPosition, OrderClause, OrderDirection};
pub use parts::{Operation, QueryParts, Returning, SelectSpec};

use std::future::Future;

use serde_json::Value as JsonValue;
use supabase_client_core::{SupabaseClient, SupabaseResult};

/// Extension trait adding query builder methods to SupabaseClient.
pub trait SupabaseClientQueryExt {
    /// Start a query on a table.
    fn from(&self, table: &str) -> QueryBuilder;

    /// Call a stored procedure and return the raw response body.
    fn rpc(
        &self,
        function: &str,
        count: CountMode,
        params: JsonValue,
    ) -> impl Future<Output = SupabaseResult<String>> + Send;
}

impl SupabaseClientQueryExt for SupabaseClient {
    fn from(&self, table: &str) -> QueryBuilder {
        QueryBuilder::new(
            self.dispatcher().clone(),
            self.schema().to_string(),
            table.to_string(),
        )
    }

    fn rpc(
        &self,
        function: &str,
        count: CountMode,
        params: JsonValue,
    ) -> impl Future<Output = SupabaseResult<String>> + Send {
        let dispatcher = self.dispatcher().clone();
        let schema = self.schema().to_string();
        let function = function.to_string();
        async move { rpc::call(&dispatcher, &schema, &function, count, &params).await }
    }
}
