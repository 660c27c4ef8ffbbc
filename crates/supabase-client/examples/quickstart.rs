//! Tour of the client against a local Supabase instance.
//!
//! Run with: cargo run --example quickstart -p supabase-client
//!
//! Requires: `supabase start` in the project root. `RUST_LOG=debug` shows
//! every dispatched request.

use serde_json::{json, Value as JsonValue};
use supabase_client::prelude::*;

const DEFAULT_URL: &str = "http://127.0.0.1:54321";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let url = std::env::var("SUPABASE_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let key = std::env::var("SUPABASE_ANON_KEY")?;
    let client = SupabaseClient::new(
        &url,
        &key,
        Some(ClientOptions::new().header("x-client-info", "supabase-client-quickstart")),
    )?;

    // ── SELECT with count ──
    println!("=== Countries ===");
    let (data, count) = client
        .from("countries")
        .select("id, name", CountMode::Exact, false)
        .order("name", OrderDirection::Ascending)
        .limit(5)
        .execute()
        .await
        .into_result()?;
    let rows: Vec<JsonValue> = serde_json::from_slice(&data)?;
    println!("  {} of {} rows", rows.len(), count);
    for row in rows {
        println!("  {}", row);
    }

    // ── RPC ──
    println!("\n=== RPC hello_world ===");
    let body = client
        .rpc("hello_world", CountMode::None, JsonValue::Null)
        .await?;
    println!("  {}", body);

    // ── Storage ──
    println!("\n=== Buckets ===");
    match client.storage().list_buckets().await {
        Ok(body) => {
            let buckets: Vec<Bucket> = serde_json::from_str(&body)?;
            for bucket in buckets {
                println!("  {} (public: {})", bucket.name, bucket.public);
            }
        }
        Err(e) => println!("  Error: {}", e),
    }

    // ── Edge Functions ──
    println!("\n=== Invoke 'hello' ===");
    match client
        .functions()
        .invoke("hello", json!({"name": "Rust"}))
        .await
    {
        Ok(body) => println!("  {}", body),
        Err(e) => println!("  Error (is `supabase functions serve` running?): {}", e),
    }

    Ok(())
}
