//! Postergen
//!
//! A client for a quote poster / moodboard generation service. Form state is
//! validated locally, marshalled into a single `multipart/form-data` POST, and
//! the outcome is folded into a [`GenerationResult`] the caller can display or
//! download from.
//!
//! # Features
//!
//! - **http** (default): reqwest-backed [`HttpTransport`], the async
//!   [`AsyncClient`] facade, and the `postergen` binary
//! - Without `http` the request model, validation, and [`Transport`] seam are
//!   still available for custom transports
//!
//! # Example
//!
//! ```no_run
//! use postergen::{ClientConfig, GenerationClient, QuotePosterForm};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GenerationClient::new(ClientConfig::new("http://localhost:8000")?)?;
//! let result = client.submit(&QuotePosterForm::new("Stay hungry, stay foolish"));
//! if let Some(url) = result.artifact_url() {
//!     client.trigger_download(url, "quote-poster.png", ".")?;
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use url::Url;

pub mod error;
pub use error::{Error, FailureKind, Result};

pub mod client;
pub mod moodboard;
pub mod poster;
pub mod request;
pub mod result;
pub mod transport;

// Async-friendly facade (worker-thread backed)
#[cfg(feature = "http")]
pub mod async_api;

pub use client::{resolve_artifact_url, GenerationClient, ServiceInfo};
pub use moodboard::{Layout, MoodboardForm};
pub use poster::{Alignment, Orientation, QuotePosterForm};
pub use request::{Attachment, Endpoint, FormPayload, GenerationForm, GenerationRequest};
pub use result::{FormSession, GenerationResult, GenerationStatus};
pub use transport::{Transport, TransportResponse};

#[cfg(feature = "http")]
pub use async_api::{AsyncClient, AsyncSession};
#[cfg(feature = "http")]
pub use transport::HttpTransport;

/// Origin used when nothing else is configured
pub const DEFAULT_ORIGIN: &str = "http://localhost:8000";

/// Environment variable holding the service origin
pub const ORIGIN_ENV: &str = "POSTERGEN_ORIGIN";

/// Environment variable overriding the user agent
pub const USER_AGENT_ENV: &str = "POSTERGEN_USER_AGENT";

/// Configuration for the generation client
///
/// # Examples
///
/// ```
/// let cfg = postergen::ClientConfig::default();
/// assert_eq!(cfg.origin.as_str(), "http://localhost:8000/");
/// assert!(cfg.user_agent.starts_with("postergen/"));
/// ```
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base address of the generation service; relative paths resolve against it
    pub origin: Url,
    /// User agent string to send with requests
    pub user_agent: String,
    /// Extra HTTP headers sent with every request
    pub headers: HashMap<String, String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            origin: Url::parse(DEFAULT_ORIGIN).expect("DEFAULT_ORIGIN is a valid URL"),
            user_agent: format!("postergen/{}", env!("CARGO_PKG_VERSION")),
            headers: HashMap::new(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at `origin` (must be an http or https URL)
    pub fn new(origin: &str) -> Result<Self> {
        Ok(Self {
            origin: parse_origin(origin)?,
            ..Default::default()
        })
    }

    /// Read `POSTERGEN_ORIGIN` / `POSTERGEN_USER_AGENT`, defaulting anything unset.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var(ORIGIN_ENV) {
            Ok(origin) if !origin.trim().is_empty() => Self::new(origin.trim())?,
            _ => Self::default(),
        };
        if let Ok(ua) = std::env::var(USER_AGENT_ENV) {
            if !ua.trim().is_empty() {
                config.user_agent = ua;
            }
        }
        Ok(config)
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

fn parse_origin(origin: &str) -> Result<Url> {
    let url = Url::parse(origin)
        .map_err(|e| Error::ConfigError(format!("Invalid origin '{}': {}", origin, e)))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(Error::ConfigError(format!(
            "Origin must use http or https, not '{}'",
            url.scheme()
        )));
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(Error::ConfigError(format!(
            "Origin must not carry a query or fragment: '{}'",
            origin
        )));
    }
    Ok(url)
}
