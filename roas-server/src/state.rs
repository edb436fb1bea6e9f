//! Application state shared across all request handlers.

use crate::config::LoadedConfig;
use roas_core::catalog::CourseCatalog;
use roas_core::enrollment::GraphyClient;
use roas_core::gateway::RazorpayClient;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Course catalog (can be reloaded via SIGHUP).
    pub catalog: Arc<RwLock<CourseCatalog>>,
    /// Razorpay orders client; holds the key pair for the process lifetime.
    pub gateway: Arc<RazorpayClient>,
    /// Graphy enrollment client, when configured.
    pub enrollment: Option<Arc<GraphyClient>>,
}

impl AppState {
    /// Build the state from a loaded configuration.
    pub fn new(config: LoadedConfig) -> Self {
        let gateway = RazorpayClient::new(
            config.razorpay.api_base,
            config.razorpay.key_id,
            config.razorpay.key_secret,
        );

        let enrollment = config.graphy.map(|g| {
            Arc::new(GraphyClient::new(
                g.api_base,
                g.mid,
                g.api_key,
                g.products,
            ))
        });

        Self {
            catalog: Arc::new(RwLock::new(config.catalog)),
            gateway: Arc::new(gateway),
            enrollment,
        }
    }

    /// Swap in a reloaded course catalog.
    ///
    /// Gateway and enrollment credentials are wired into long-lived
    /// clients and require a restart to change.
    pub async fn apply_reload(&self, config: LoadedConfig) {
        *self.catalog.write().await = config.catalog;
    }
}
