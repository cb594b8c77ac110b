//! Gateway client configuration.
//!
//! Configuration is immutable once handed to the
//! [`GatewayClient`](crate::GatewayClient). It can be built in code or loaded
//! from TOML:
//!
//! ```toml
//! login = "app.example.com"
//! password = "TGT-1-abc"
//! test = true
//!
//! [http]
//! timeout_secs = 30
//! ```

use std::{fmt, path::Path, time::Duration};

use serde::Deserialize;
use url::Url;

use crate::error::{GatewayError, Result};

/// Gateway endpoint used when `test = true`.
pub const TEST_URL: &str = "https://merchantaccount.ptc.quickbooks.com/j/AppGateway";

/// Gateway endpoint used in production.
pub const LIVE_URL: &str = "https://merchantaccount.quickbooks.com/j/AppGateway";

/// Application login and connection ticket sent in every signon section.
///
/// `Debug` output redacts the connection ticket.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    /// QBMS `ApplicationLogin`.
    pub login: String,
    /// QBMS `ConnectionTicket`.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self { login: login.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("login", &self.login)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Client configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Login and connection ticket.
    #[serde(flatten)]
    pub credentials: Credentials,

    /// Send requests to the test endpoint.
    #[serde(default)]
    pub test: bool,

    /// Test endpoint override.
    #[serde(default = "default_test_url")]
    pub test_url: String,

    /// Live endpoint override.
    #[serde(default = "default_live_url")]
    pub live_url: String,

    /// HTTP transport settings, the `[http]` table.
    #[serde(default)]
    pub http: HttpSettings,
}

/// Settings for the default HTTP transport.
///
/// Every call is one POST to one endpoint, so only the timeouts and the
/// protocol are tunable. Unknown keys under `[http]` are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HttpSettings {
    /// Whole-exchange timeout, 1 to 300 seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// TCP and TLS connect timeout, 1 to 60 seconds.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Protocol the transport speaks.
    #[serde(default, rename = "http_version")]
    pub protocol: HttpProtocol,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            protocol: HttpProtocol::default(),
        }
    }
}

impl HttpSettings {
    /// Checks both timeouts against their bounds.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidConfig`] naming the offending `http.` key.
    pub fn validate(&self) -> Result<()> {
        check_secs("http.timeout_secs", self.timeout_secs, MAX_TIMEOUT_SECS)?;
        check_secs("http.connect_timeout_secs", self.connect_timeout_secs, MAX_CONNECT_TIMEOUT_SECS)
    }

    #[must_use]
    pub(crate) const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub(crate) const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

/// HTTP protocol selection, `http_version` in TOML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HttpProtocol {
    /// HTTP/1.1 only.
    Http1,
    /// HTTP/2 with prior knowledge.
    Http2,
    /// Whatever ALPN settles on.
    #[default]
    Auto,
}

impl HttpProtocol {
    /// Label recorded in the `protocol` field of request spans.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Http1 => "http/1.1",
            Self::Http2 => "http/2",
            Self::Auto => "http",
        }
    }
}

const MAX_TIMEOUT_SECS: u64 = 300;
const MAX_CONNECT_TIMEOUT_SECS: u64 = 60;

fn check_secs(key: &str, value: u64, max: u64) -> Result<()> {
    if (1..=max).contains(&value) {
        Ok(())
    } else {
        Err(GatewayError::InvalidConfig(format!(
            "{key} must be between 1 and {max} seconds, got {value}"
        )))
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

impl GatewayConfig {
    /// Creates a configuration with default endpoints and HTTP settings.
    #[must_use]
    pub fn new(login: impl Into<String>, password: impl Into<String>, test: bool) -> Self {
        Self {
            credentials: Credentials::new(login, password),
            test,
            test_url: default_test_url(),
            live_url: default_live_url(),
            http: HttpSettings::default(),
        }
    }

    /// Parses and validates a TOML configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidConfig`] if parsing or validation fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use qbms_gateway::GatewayConfig;
    ///
    /// let config = GatewayConfig::from_toml(
    ///     r#"
    ///     login = "app.example.com"
    ///     password = "TGT-1-abc"
    ///     test = true
    ///     "#,
    /// )?;
    /// assert!(config.endpoint().contains(".ptc."));
    /// # Ok::<(), qbms_gateway::GatewayError>(())
    /// ```
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| GatewayError::InvalidConfig(format!("invalid TOML config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidConfig`] if the file cannot be read, parsed
    /// or validated.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| GatewayError::InvalidConfig(format!("cannot read config file: {e}")))?;
        Self::from_toml(&content)
    }

    /// Validates credentials, endpoints and HTTP settings.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidConfig`] if login or password is empty, an
    /// endpoint is not an `https` URL, or HTTP timeouts are out of range.
    pub fn validate(&self) -> Result<()> {
        if self.credentials.login.trim().is_empty() {
            return Err(GatewayError::InvalidConfig("login is required".to_owned()));
        }
        if self.credentials.password.trim().is_empty() {
            return Err(GatewayError::InvalidConfig("password is required".to_owned()));
        }
        validate_endpoint("test_url", &self.test_url)?;
        validate_endpoint("live_url", &self.live_url)?;
        self.http.validate()
    }

    /// Returns the endpoint selected by the `test` flag.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        if self.test { &self.test_url } else { &self.live_url }
    }
}

fn validate_endpoint(name: &str, value: &str) -> Result<()> {
    let url = Url::parse(value)
        .map_err(|e| GatewayError::InvalidConfig(format!("{name} is not a valid URL: {e}")))?;
    if url.scheme() != "https" {
        return Err(GatewayError::InvalidConfig(format!("{name} must use https")));
    }
    Ok(())
}

fn default_test_url() -> String {
    TEST_URL.to_owned()
}

fn default_live_url() -> String {
    LIVE_URL.to_owned()
}
