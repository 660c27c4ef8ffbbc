use serde::Serialize;
use tracing::debug;

use supabase_client_core::{
    Dispatcher, RequestIntent, SupabaseError, SupabaseResponse, SupabaseResult,
};

use crate::count::CountMode;
use crate::filter::{FilterPredicate, Filterable};
use crate::modifier::Modifiable;
use crate::parts::{split_columns, Operation, QueryParts, Returning};
use crate::postgrest;

/// Query builder created by `client.from("table")`.
///
/// Every method consumes and returns the builder; nothing touches the
/// network until [`execute`](Self::execute). Argument problems (a bad
/// column list, an unserializable body) are remembered and reported by
/// `execute` or [`build_request`](Self::build_request); the first one wins.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    dispatcher: Dispatcher,
    default_schema: String,
    parts: QueryParts,
    error: Option<SupabaseError>,
}

impl QueryBuilder {
    pub fn new(dispatcher: Dispatcher, default_schema: String, table: String) -> Self {
        Self {
            dispatcher,
            default_schema,
            parts: QueryParts::new(table),
            error: None,
        }
    }

    fn fail(&mut self, err: SupabaseError) {
        if self.error.is_none() {
            self.error = Some(err);
        }
    }

    fn write<T: Serialize + ?Sized>(
        mut self,
        make: impl FnOnce(serde_json::Value) -> Operation,
        body: &T,
    ) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => self.parts.operation = make(value),
            Err(err) => self.fail(err.into()),
        }
        self
    }

    /// Project columns, e.g. `"*"` or `"id, name, cities(name)"`.
    pub fn select(mut self, columns: &str, count: CountMode, head: bool) -> Self {
        match split_columns(columns) {
            Some(cols) => self.parts.select.columns = cols,
            None => self.fail(SupabaseError::config(format!(
                "Invalid select column list '{columns}'"
            ))),
        }
        self.parts.select.count = count;
        self.parts.select.head = head;
        self
    }

    /// Insert one row (object) or many rows (array).
    pub fn insert<T: Serialize + ?Sized>(self, rows: &T) -> Self {
        self.write(Operation::Insert, rows)
    }

    /// Insert, merging rows that collide on the conflict target.
    pub fn upsert<T: Serialize + ?Sized>(self, rows: &T) -> Self {
        self.write(Operation::Upsert, rows)
    }

    /// Update the rows matched by the filters.
    pub fn update<T: Serialize + ?Sized>(self, values: &T) -> Self {
        self.write(Operation::Update, values)
    }

    /// Delete the rows matched by the filters.
    pub fn delete(mut self) -> Self {
        self.parts.operation = Operation::Delete;
        self
    }

    /// Conflict target for upserts, e.g. `"id"` or `"country_id, name"`.
    pub fn on_conflict(mut self, columns: &str) -> Self {
        match split_columns(columns) {
            Some(cols) => self.parts.on_conflict = cols,
            None => self.fail(SupabaseError::config(format!(
                "Invalid on_conflict column list '{columns}'"
            ))),
        }
        self
    }

    /// Skip duplicate rows on upsert instead of merging them.
    pub fn ignore_duplicates(mut self) -> Self {
        self.parts.ignore_duplicates = true;
        self
    }

    pub fn returning(mut self, returning: Returning) -> Self {
        self.parts.returning = returning;
        self
    }

    /// Request a row count without changing the projection.
    pub fn count(mut self, count: CountMode) -> Self {
        self.parts.select.count = count;
        self
    }

    /// Target a schema other than the client's default.
    pub fn schema(mut self, schema: &str) -> Self {
        self.parts.schema_override = Some(schema.to_string());
        self
    }

    /// The accumulated query state.
    pub fn parts(&self) -> &QueryParts {
        &self.parts
    }

    /// Build the request without sending it.
    pub fn build_request(&self) -> SupabaseResult<RequestIntent> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        postgrest::build_request(&self.parts, &self.default_schema)
    }

    /// Send the query.
    ///
    /// Failures are reported through [`SupabaseResponse::error`]; the data is
    /// empty and the count is `-1` in that case.
    pub async fn execute(self) -> SupabaseResponse {
        let intent = match self.build_request() {
            Ok(intent) => intent,
            Err(err) => return SupabaseResponse::error(err),
        };
        debug!(table = %self.parts.table, method = %intent.method, "Executing PostgREST query");

        match self.dispatcher.execute(intent).await {
            Ok(raw) => postgrest::interpret_response(raw, self.parts.select.count),
            Err(err) => SupabaseResponse::error(err),
        }
    }
}

impl Filterable for QueryBuilder {
    fn filters_mut(&mut self) -> &mut Vec<FilterPredicate> {
        &mut self.parts.filters
    }
}

impl Modifiable for QueryBuilder {
    fn parts_mut(&mut self) -> &mut QueryParts {
        &mut self.parts
    }
}
