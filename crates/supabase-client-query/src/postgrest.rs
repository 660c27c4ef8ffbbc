use reqwest::Method;
use serde_json::Value as JsonValue;
use tracing::warn;

use supabase_client_core::{
    RawResponse, RequestIntent, SupabaseError, SupabaseResponse, SupabaseResult,
};

use crate::count::{extract_count, CountMode};
use crate::modifier::OrderClause;
use crate::parts::{Operation, QueryParts};

/// Path prefix of the PostgREST service.
pub const REST_PREFIX: &str = "/rest/v1";

/// Build the request for a query.
///
/// Query parameter order is fixed: `select`, filters in call order,
/// `order`, `limit`, `offset`, `on_conflict`.
pub fn build_request(parts: &QueryParts, default_schema: &str) -> SupabaseResult<RequestIntent> {
    let table = parts.table.trim();
    if table.is_empty() {
        return Err(SupabaseError::config("table name must not be empty"));
    }

    let method = match parts.operation {
        Operation::Select if parts.select.head => Method::HEAD,
        Operation::Select => Method::GET,
        Operation::Insert(_) | Operation::Upsert(_) => Method::POST,
        Operation::Update(_) => Method::PATCH,
        Operation::Delete => Method::DELETE,
    };

    let mut intent = RequestIntent::new(method, format!("{REST_PREFIX}/{table}"));

    if !parts.select.columns.is_empty() {
        intent = intent.query("select", parts.select.columns.join(","));
    }

    for filter in &parts.filters {
        let (key, value) = filter.to_query_pair();
        intent = intent.query(key, value);
    }

    if !parts.orders.is_empty() {
        let order = parts
            .orders
            .iter()
            .map(OrderClause::render)
            .collect::<Vec<_>>()
            .join(",");
        intent = intent.query("order", order);
    }

    if let Some(limit) = parts.limit {
        intent = intent.query("limit", limit.to_string());
    }
    if let Some(offset) = parts.offset {
        intent = intent.query("offset", offset.to_string());
    }

    if matches!(parts.operation, Operation::Upsert(_)) && !parts.on_conflict.is_empty() {
        intent = intent.query("on_conflict", parts.on_conflict.join(","));
    }

    // Prefer header (compose resolution + return + count)
    let mut prefer: Vec<&str> = Vec::new();
    if let Operation::Upsert(_) = parts.operation {
        prefer.push(if parts.ignore_duplicates {
            "resolution=ignore-duplicates"
        } else {
            "resolution=merge-duplicates"
        });
    }
    if !parts.is_read() {
        prefer.push(parts.returning.prefer_value());
    }
    if let Some(count) = parts.select.count.prefer_value() {
        prefer.push(count);
    }
    if !prefer.is_empty() {
        intent = intent.try_header("Prefer", &prefer.join(","))?;
    }

    intent = intent.try_header("Accept", "application/json")?;

    let schema = parts.schema_override.as_deref().unwrap_or(default_schema);
    if parts.schema_override.is_some() || schema != "public" {
        let profile = if parts.is_read() {
            "Accept-Profile"
        } else {
            "Content-Profile"
        };
        intent = intent.try_header(profile, schema)?;
    }

    match &parts.operation {
        Operation::Insert(body) | Operation::Upsert(body) | Operation::Update(body) => {
            intent = intent.json(body)?;
        }
        Operation::Select | Operation::Delete => {}
    }

    Ok(intent)
}

/// Turn a raw PostgREST response into a [`SupabaseResponse`].
///
/// 2xx responses keep the body untouched and carry the extracted count;
/// anything else becomes an `HttpStatus` error with the PostgREST message.
pub fn interpret_response(raw: RawResponse, count: CountMode) -> SupabaseResponse {
    if !raw.is_success() {
        let message = parse_error_message(raw.status, &raw.body);
        warn!(status = raw.status, message = %message, "PostgREST request failed");
        return SupabaseResponse::error(SupabaseError::http_status(
            raw.status,
            message,
            Some(raw.body),
        ));
    }

    match extract_count(&raw.headers, count) {
        Ok(count) => SupabaseResponse::ok(raw.body, count, raw.status),
        Err(err) => {
            // A response did arrive; keep its status alongside the decode error.
            let mut resp = SupabaseResponse::error(err);
            resp.status = raw.status;
            resp
        }
    }
}

/// PostgREST error format: `{ "message": "...", "code": "...", "details": "...", "hint": "..." }`.
pub fn parse_error_message(status: u16, body: &[u8]) -> String {
    if let Ok(error_obj) = serde_json::from_slice::<JsonValue>(body) {
        let message = error_obj.get("message").and_then(|v| v.as_str());
        let code = error_obj.get("code").and_then(|v| v.as_str());
        match (message, code) {
            (Some(m), Some(c)) => return format!("{m} (code {c})"),
            (Some(m), None) => return m.to_string(),
            _ => {}
        }
    }
    let text = String::from_utf8_lossy(body);
    if text.trim().is_empty() {
        format!("HTTP {status}")
    } else {
        text.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterPredicate, Filterable};
    use crate::modifier::{Modifiable, OrderDirection};
    use crate::parts::{Returning, SelectSpec};
    use reqwest::header::{HeaderMap, HeaderValue};
    use supabase_client_core::ErrorKind;

    struct Parts(QueryParts);

    impl Filterable for Parts {
        fn filters_mut(&mut self) -> &mut Vec<FilterPredicate> {
            &mut self.0.filters
        }
    }

    impl Modifiable for Parts {
        fn parts_mut(&mut self) -> &mut QueryParts {
            &mut self.0
        }
    }

    fn query_of(intent: &RequestIntent) -> Vec<(&str, &str)> {
        intent
            .query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect()
    }

    #[test]
    fn select_simple() {
        let parts = QueryParts::new("cities");
        let intent = build_request(&parts, "public").unwrap();
        assert_eq!(intent.method, Method::GET);
        assert_eq!(intent.path, "/rest/v1/cities");
        assert!(intent.query.is_empty());
        assert!(intent.headers.get("prefer").is_none());
        assert!(intent.body.is_none());
    }

    #[test]
    fn select_with_count_and_filters() {
        let mut parts = QueryParts::new("countries");
        parts.select = SelectSpec {
            columns: vec!["*".into()],
            count: CountMode::Exact,
            head: false,
        };
        let parts = Parts(parts).eq("id", 1).gt("population", 100).0;
        let intent = build_request(&parts, "public").unwrap();
        assert_eq!(
            query_of(&intent),
            vec![("select", "*"), ("id", "eq.1"), ("population", "gt.100")]
        );
        assert_eq!(intent.headers.get("prefer").unwrap(), "count=exact");
    }

    #[test]
    fn head_uses_head_method() {
        let mut parts = QueryParts::new("countries");
        parts.select.count = CountMode::Planned;
        parts.select.head = true;
        let intent = build_request(&parts, "public").unwrap();
        assert_eq!(intent.method, Method::HEAD);
        assert_eq!(intent.headers.get("prefer").unwrap(), "count=planned");
    }

    #[test]
    fn modifiers_follow_filters() {
        let parts = Parts(QueryParts::new("cities"))
            .limit(5)
            .eq("country_id", 1)
            .order("name", OrderDirection::Descending)
            .offset(10)
            .0;
        let intent = build_request(&parts, "public").unwrap();
        assert_eq!(
            query_of(&intent),
            vec![
                ("country_id", "eq.1"),
                ("order", "name.desc"),
                ("limit", "5"),
                ("offset", "10"),
            ]
        );
    }

    #[test]
    fn empty_table_is_config_error() {
        let err = build_request(&QueryParts::new("  "), "public").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn insert_request() {
        let mut parts = QueryParts::new("cities");
        parts.operation = Operation::Insert(serde_json::json!({"name": "Auckland"}));
        let intent = build_request(&parts, "public").unwrap();
        assert_eq!(intent.method, Method::POST);
        assert_eq!(intent.headers.get("prefer").unwrap(), "return=representation");
        assert_eq!(intent.headers.get("content-type").unwrap(), "application/json");
        assert_eq!(intent.body.as_deref(), Some(&br#"{"name":"Auckland"}"#[..]));
    }

    #[test]
    fn upsert_request() {
        let mut parts = QueryParts::new("cities");
        parts.operation = Operation::Upsert(serde_json::json!([{"id": 1}]));
        parts.on_conflict = vec!["id".into()];
        parts.returning = Returning::Minimal;
        parts.select.count = CountMode::Exact;
        let intent = build_request(&parts, "public").unwrap();
        assert_eq!(query_of(&intent), vec![("on_conflict", "id")]);
        assert_eq!(
            intent.headers.get("prefer").unwrap(),
            "resolution=merge-duplicates,return=minimal,count=exact"
        );
    }

    #[test]
    fn update_and_delete_methods() {
        let mut parts = QueryParts::new("cities");
        parts.operation = Operation::Update(serde_json::json!({"name": "Wellington"}));
        let parts = Parts(parts).eq("id", 2).0;
        let intent = build_request(&parts, "public").unwrap();
        assert_eq!(intent.method, Method::PATCH);
        assert_eq!(query_of(&intent), vec![("id", "eq.2")]);

        let mut parts = QueryParts::new("cities");
        parts.operation = Operation::Delete;
        let intent = build_request(&parts, "public").unwrap();
        assert_eq!(intent.method, Method::DELETE);
        assert!(intent.body.is_none());
    }

    #[test]
    fn schema_profiles() {
        let parts = QueryParts::new("cities");
        let intent = build_request(&parts, "api").unwrap();
        assert_eq!(intent.headers.get("accept-profile").unwrap(), "api");

        let mut parts = QueryParts::new("cities");
        parts.operation = Operation::Delete;
        parts.schema_override = Some("public".into());
        let intent = build_request(&parts, "api").unwrap();
        assert_eq!(intent.headers.get("content-profile").unwrap(), "public");
        assert!(intent.headers.get("accept-profile").is_none());
    }

    #[test]
    fn interpret_success_with_count() {
        let mut headers = HeaderMap::new();
        headers.insert("content-range", HeaderValue::from_static("0-0/1"));
        let raw = RawResponse {
            status: 200,
            headers,
            body: br#"[{"id":1}]"#.to_vec(),
        };
        let resp = interpret_response(raw, CountMode::Exact);
        assert!(resp.is_ok());
        assert_eq!(resp.count, 1);
        assert_eq!(resp.data, br#"[{"id":1}]"#.to_vec());
    }

    #[test]
    fn interpret_error_status() {
        let raw = RawResponse {
            status: 400,
            headers: HeaderMap::new(),
            body: br#"{"message":"column x does not exist","code":"42703"}"#.to_vec(),
        };
        let resp = interpret_response(raw, CountMode::Exact);
        let err = resp.error.as_ref().unwrap();
        assert_eq!(err.kind(), ErrorKind::HttpStatus);
        assert_eq!(err.status(), Some(400));
        assert_eq!(
            err.to_string(),
            "HTTP error (400): column x does not exist (code 42703)"
        );
        assert!(err.raw().is_some());
        assert_eq!(resp.count, -1);
        assert!(resp.data.is_empty());
    }

    #[test]
    fn interpret_malformed_count() {
        let mut headers = HeaderMap::new();
        headers.insert("content-range", HeaderValue::from_static("0-0/lots"));
        let raw = RawResponse {
            status: 200,
            headers,
            body: b"[]".to_vec(),
        };
        let resp = interpret_response(raw, CountMode::Exact);
        assert_eq!(resp.status, 200);
        assert_eq!(resp.count, -1);
        assert_eq!(resp.error.unwrap().kind(), ErrorKind::Decode);
    }

    #[test]
    fn error_message_fallbacks() {
        assert_eq!(parse_error_message(502, b""), "HTTP 502");
        assert_eq!(parse_error_message(500, b"upstream down"), "upstream down");
        assert_eq!(parse_error_message(404, br#"{"message":"nope"}"#), "nope");
    }
}
