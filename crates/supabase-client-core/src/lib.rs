//! Shared building blocks for the Supabase sub-clients: configuration,
//! the error taxonomy, the authenticated [`Dispatcher`] and the
//! [`SupabaseResponse`] returned by query calls.

pub mod client;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod response;

pub use client::SupabaseClient;
pub use config::{ClientOptions, SupabaseConfig};
pub use dispatch::{Dispatcher, RawResponse, RequestIntent};
pub use error::{ErrorKind, SupabaseError, SupabaseResult};
pub use response::{SupabaseResponse, UNKNOWN_COUNT};

// Transport types used in the public API.
pub use reqwest::header::{HeaderMap, HeaderValue};
pub use reqwest::Method;
