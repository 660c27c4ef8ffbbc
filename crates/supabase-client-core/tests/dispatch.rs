//! Dispatcher round trips against a local mock server.

use mockito::Matcher;
use supabase_client_core::{
    ClientOptions, ErrorKind, Method, RequestIntent, SupabaseClient,
};

const API_URL: &str = "https://your-company.supabase.co";
const API_KEY: &str = "your-api-key";

fn proxied_client(proxy: &str, options: ClientOptions) -> SupabaseClient {
    SupabaseClient::new(API_URL, API_KEY, Some(options.proxy(proxy)))
        .expect("Failed to create client")
}

#[tokio::test]
async fn execute_sends_auth_headers_and_query() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/rest/v1/countries")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("select".into(), "*".into()),
            Matcher::UrlEncoded("id".into(), "eq.1".into()),
        ]))
        .match_header("apikey", API_KEY)
        .match_header("authorization", format!("Bearer {API_KEY}").as_str())
        .with_status(200)
        .with_header("content-range", "0-0/1")
        .with_body(r#"[{"id":1}]"#)
        .create_async()
        .await;

    let client = proxied_client(&server.url(), ClientOptions::new());
    let intent = RequestIntent::new(Method::GET, "/rest/v1/countries")
        .query("select", "*")
        .query("id", "eq.1");
    let resp = client.dispatcher().execute(intent).await.unwrap();

    mock.assert_async().await;
    assert_eq!(resp.status, 200);
    assert_eq!(resp.header("content-range"), Some("0-0/1"));
    assert_eq!(resp.body, br#"[{"id":1}]"#.to_vec());
}

#[tokio::test]
async fn execute_returns_non_success_status_unmodified() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("DELETE", "/storage/v1/bucket/missing")
        .with_status(404)
        .with_body(r#"{"message":"Bucket not found"}"#)
        .create_async()
        .await;

    let client = proxied_client(&server.url(), ClientOptions::new());
    let resp = client
        .dispatcher()
        .execute(RequestIntent::new(Method::DELETE, "/storage/v1/bucket/missing"))
        .await
        .expect("non-2xx is not a dispatcher error");

    mock.assert_async().await;
    assert_eq!(resp.status, 404);
    assert!(!resp.is_success());
    assert_eq!(resp.text().unwrap(), r#"{"message":"Bucket not found"}"#);
}

#[tokio::test]
async fn execute_sends_body_and_merged_headers() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/functions/v1/echo")
        .match_header("x-client-info", "intent")
        .match_header("x-tenant", "acme")
        .match_header("content-type", "application/json")
        .match_body(Matcher::Json(serde_json::json!({"name": "world"})))
        .with_status(200)
        .with_body("ok")
        .create_async()
        .await;

    let client = proxied_client(
        &server.url(),
        ClientOptions::new()
            .header("x-client-info", "config")
            .header("x-tenant", "acme"),
    );
    let intent = RequestIntent::new(Method::POST, "/functions/v1/echo")
        .try_header("x-client-info", "intent")
        .unwrap()
        .json(&serde_json::json!({"name": "world"}))
        .unwrap();
    let resp = client.dispatcher().execute(intent).await.unwrap();

    mock.assert_async().await;
    assert_eq!(resp.body, b"ok".to_vec());
}

#[tokio::test]
async fn connection_failure_is_network_error() {
    // Bind then drop a listener so the port is very likely closed.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let url = format!("http://127.0.0.1:{port}");
    let client = proxied_client(&url, ClientOptions::new());
    let err = client
        .dispatcher()
        .execute(RequestIntent::new(Method::GET, "/rest/v1/countries"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
}
