//! TOML file configuration structures.
//!
//! These structs directly map to the `roas-config.toml` file format.

use serde::Deserialize;
use std::collections::HashMap;
use std::net::SocketAddr;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub razorpay: RazorpayConfig,
    #[serde(default)]
    pub graphy: Option<GraphyConfig>,
    /// Course id → course entry. Empty means the built-in table.
    #[serde(default)]
    pub courses: HashMap<String, CourseEntry>,
}

/// Server configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// The address and port to listen on (e.g., "0.0.0.0:8080").
    #[serde(default = "default_listen_addr")]
    pub listen: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5500))
}

/// Razorpay gateway section. The key secret comes from the
/// `RAZORPAY_KEY_SECRET` environment variable, never the file.
#[derive(Debug, Clone, Deserialize)]
pub struct RazorpayConfig {
    /// Public key id (`rzp_live_...` / `rzp_test_...`).
    pub key_id: String,
    #[serde(default = "default_razorpay_api_base")]
    pub api_base: String,
}

fn default_razorpay_api_base() -> String {
    roas_core::gateway::DEFAULT_API_BASE.to_owned()
}

/// Graphy enrollment section. Credentials come from the `GRAPHY_MID`
/// and `GRAPHY_API_KEY` environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphyConfig {
    #[serde(default = "default_graphy_api_base")]
    pub api_base: String,
    /// Course id → Graphy product id.
    #[serde(default)]
    pub products: HashMap<String, String>,
}

fn default_graphy_api_base() -> String {
    roas_core::enrollment::DEFAULT_API_BASE.to_owned()
}

/// One configured course.
#[derive(Debug, Clone, Deserialize)]
pub struct CourseEntry {
    pub name: String,
    /// Price in minor currency units.
    pub amount: u64,
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Absolute site path for the post-purchase redirect.
    pub thank_you_page: String,
}

fn default_currency() -> String {
    "INR".to_owned()
}
