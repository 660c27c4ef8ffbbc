use std::sync::Arc;

use crate::config::{ClientOptions, SupabaseConfig};
use crate::dispatch::Dispatcher;
use crate::error::SupabaseResult;

/// The main client for interacting with a Supabase project.
///
/// Holds the validated configuration and the shared [`Dispatcher`]. The
/// query, storage and functions crates add their entry points through
/// extension traits. Cloning is cheap.
#[derive(Debug, Clone)]
pub struct SupabaseClient {
    config: Arc<SupabaseConfig>,
    dispatcher: Dispatcher,
}

impl SupabaseClient {
    /// Create a client for `supabase_url` authenticated with `api_key`.
    ///
    /// Fails with a configuration error, before any network access, when the
    /// URL is empty or invalid or when an option cannot be applied.
    pub fn new(
        supabase_url: &str,
        api_key: &str,
        options: Option<ClientOptions>,
    ) -> SupabaseResult<Self> {
        let config = SupabaseConfig::new(supabase_url, api_key, options.unwrap_or_default())?;
        Self::from_config(config)
    }

    /// Create a client from an already validated configuration.
    pub fn from_config(config: SupabaseConfig) -> SupabaseResult<Self> {
        let config = Arc::new(config);
        let dispatcher = Dispatcher::new(Arc::clone(&config))?;
        Ok(Self { config, dispatcher })
    }

    /// The dispatcher shared by every sub-client.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Get the full config.
    pub fn config(&self) -> &SupabaseConfig {
        &self.config
    }

    /// Get the default schema.
    pub fn schema(&self) -> &str {
        self.config.schema()
    }

    pub fn supabase_url(&self) -> &str {
        self.config.supabase_url().as_str()
    }

    pub fn api_key(&self) -> &str {
        self.config.api_key()
    }
}
