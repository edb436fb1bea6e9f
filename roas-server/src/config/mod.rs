//! Configuration module for roas-server.
//!
//! Handles loading configuration from the TOML file, CLI overrides, and
//! environment-variable secrets, and validates the course table before
//! the server starts taking payments.

pub mod file;

use crate::config::file::{CourseEntry, FileConfig};
use roas_core::catalog::{Course, CourseCatalog, CourseId};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("invalid url in config: {0}")]
    Url(#[from] url::ParseError),

    #[error("RAZORPAY_KEY_SECRET environment variable not set")]
    MissingRazorpaySecret,

    #[error("GRAPHY_MID / GRAPHY_API_KEY environment variables not set")]
    MissingGraphyCredentials,
}

/// Razorpay settings assembled from file + environment.
#[derive(Debug, Clone)]
pub struct RazorpaySettings {
    pub key_id: String,
    pub key_secret: String,
    pub api_base: Url,
}

/// Graphy settings assembled from file + environment.
#[derive(Debug, Clone)]
pub struct GraphySettings {
    pub api_base: Url,
    pub mid: String,
    pub api_key: String,
    pub products: HashMap<CourseId, String>,
}

/// Loaded configuration result containing all parts.
pub struct LoadedConfig {
    pub listen: SocketAddr,
    pub catalog: CourseCatalog,
    pub razorpay: RazorpaySettings,
    pub graphy: Option<GraphySettings>,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: std::path::PathBuf,
    listen_override: Option<SocketAddr>,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, listen_override: Option<SocketAddr>) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            listen_override,
        }
    }

    /// Load and process the configuration.
    ///
    /// Reads the TOML file, applies CLI overrides, validates the course
    /// table, and pulls secrets from the environment.
    pub fn load(&self) -> Result<LoadedConfig, ConfigError> {
        let config_content = std::fs::read_to_string(&self.config_path)?;
        let mut file_config: FileConfig = toml::from_str(&config_content)?;

        if let Some(listen) = self.listen_override {
            file_config.server.listen = listen;
        }

        let catalog = build_catalog(&file_config.courses)?;

        if file_config.razorpay.key_id.trim().is_empty() {
            return Err(ConfigError::Validation(
                "razorpay.key_id must not be empty".to_owned(),
            ));
        }

        let razorpay = RazorpaySettings {
            key_id: file_config.razorpay.key_id.clone(),
            key_secret: razorpay_key_secret_from_env()?,
            api_base: Url::parse(&file_config.razorpay.api_base)?,
        };

        let graphy = match &file_config.graphy {
            Some(section) => {
                let (mid, api_key) = graphy_credentials_from_env()?;
                Some(GraphySettings {
                    api_base: Url::parse(&section.api_base)?,
                    mid,
                    api_key,
                    products: build_product_map(&section.products)?,
                })
            }
            None => None,
        };

        Ok(LoadedConfig {
            listen: file_config.server.listen,
            catalog,
            razorpay,
            graphy,
        })
    }

    /// Reload the configuration (used during SIGHUP).
    pub fn reload(&self) -> Result<LoadedConfig, ConfigError> {
        self.load()
    }
}

/// Build and validate the course catalog; an empty `[courses]` table
/// falls back to the built-in five-course table.
fn build_catalog(entries: &HashMap<String, CourseEntry>) -> Result<CourseCatalog, ConfigError> {
    if entries.is_empty() {
        return Ok(CourseCatalog::standard());
    }

    let mut courses = HashMap::with_capacity(entries.len());
    for (raw_id, entry) in entries {
        let id: CourseId = raw_id
            .parse()
            .map_err(|e| ConfigError::Validation(format!("{e}")))?;
        if entry.amount == 0 {
            return Err(ConfigError::Validation(format!(
                "course {raw_id} has a zero amount"
            )));
        }
        if !entry.thank_you_page.starts_with('/') {
            return Err(ConfigError::Validation(format!(
                "course {raw_id} thank_you_page must be an absolute site path"
            )));
        }
        if entry.currency.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "course {raw_id} has an empty currency"
            )));
        }
        courses.insert(
            id,
            Course {
                name: entry.name.clone(),
                amount: entry.amount,
                currency: entry.currency.clone(),
                thank_you_page: entry.thank_you_page.clone(),
            },
        );
    }
    Ok(CourseCatalog::new(courses))
}

fn build_product_map(
    products: &HashMap<String, String>,
) -> Result<HashMap<CourseId, String>, ConfigError> {
    products
        .iter()
        .map(|(raw_id, product)| {
            let id: CourseId = raw_id
                .parse()
                .map_err(|e| ConfigError::Validation(format!("{e}")))?;
            Ok((id, product.clone()))
        })
        .collect()
}

/// Get the Razorpay key secret from the environment.
pub fn razorpay_key_secret_from_env() -> Result<String, ConfigError> {
    std::env::var("RAZORPAY_KEY_SECRET").map_err(|_| ConfigError::MissingRazorpaySecret)
}

/// Get the Graphy credentials from the environment.
pub fn graphy_credentials_from_env() -> Result<(String, String), ConfigError> {
    let mid = std::env::var("GRAPHY_MID").map_err(|_| ConfigError::MissingGraphyCredentials)?;
    let key = std::env::var("GRAPHY_API_KEY").map_err(|_| ConfigError::MissingGraphyCredentials)?;
    Ok((mid, key))
}
