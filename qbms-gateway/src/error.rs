//! Error types for the QBMS gateway client.
//!
//! All errors implement the standard [`std::error::Error`] trait via [`thiserror::Error`].
//!
//! # Error Categories
//!
//! - **Validation Errors** ([`GatewayError::MissingField`]): a required request option was
//!   absent or empty. Raised before any XML is written or any network traffic happens.
//! - **Network Errors** ([`GatewayError::HttpError`], [`GatewayError::TransportError`]):
//!   the exchange with the gateway failed.
//! - **Protocol Errors** ([`GatewayError::MalformedResponse`]): the gateway answered with
//!   something that is not well-formed XML.
//! - **Configuration Errors** ([`GatewayError::InvalidConfig`]): credentials or endpoints
//!   are unusable.
//!
//! Declined charges, unknown wallet entries and other vendor-side rejections are **not**
//! errors. They come back as a [`GatewayResponse`](crate::GatewayResponse) whose `success`
//! flag is `false`.
//!
//! # Examples
//!
//! ```
//! use qbms_gateway::error::{GatewayError, Result};
//!
//! fn require(field: &'static str, value: Option<&str>) -> Result<String> {
//!     match value {
//!         Some(v) if !v.is_empty() => Ok(v.to_owned()),
//!         _ => Err(GatewayError::MissingField { field }),
//!     }
//! }
//!
//! assert!(require("customer_id", Some("3187")).is_ok());
//! assert!(require("customer_id", None).is_err());
//! ```

use thiserror::Error;

/// Result type alias for gateway operations.
///
/// All fallible functions in this crate return this type.
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Errors that can occur while talking to the gateway.
///
/// # Error Recovery
///
/// - **Validation errors** ([`MissingField`](Self::MissingField)): fix input, never retried
/// - **Transient errors** ([`HttpError`](Self::HttpError),
///   [`TransportError`](Self::TransportError)): surfaced as-is, retry policy belongs to
///   the caller
/// - **Protocol errors** ([`MalformedResponse`](Self::MalformedResponse)): contact the
///   gateway operator
/// - **Configuration errors** ([`InvalidConfig`](Self::InvalidConfig)): fix configuration
#[must_use = "errors should be handled, propagated, or explicitly panicked"]
#[derive(Debug, Error)]
pub enum GatewayError {
    /// A required request option is missing or empty.
    ///
    /// `field` is the option name as used in
    /// [`OptionField::name`](crate::action::OptionField::name), e.g. `wallet_entry_id`.
    ///
    /// # Examples
    ///
    /// ```
    /// use qbms_gateway::error::GatewayError;
    ///
    /// let err = GatewayError::MissingField { field: "customer_id" };
    /// assert_eq!(err.to_string(), "Missing required option: customer_id");
    /// ```
    #[error("Missing required option: {field}")]
    MissingField {
        /// Name of the missing option.
        field: &'static str,
    },

    /// HTTP request failed.
    ///
    /// Wraps [`reqwest::Error`]: timeouts, refused connections, DNS or TLS failures.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Transport refused or failed the exchange.
    ///
    /// Covers non-2xx statuses and endpoints or content types rejected before sending.
    #[error("Transport error: {0}")]
    TransportError(String),

    /// The gateway response is not well-formed XML.
    #[error("Malformed gateway response: {0}")]
    MalformedResponse(String),

    /// Client configuration is invalid.
    ///
    /// Raised for missing credentials, unparsable TOML, non-HTTPS endpoints and
    /// out-of-range HTTP timeouts.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// An amount string could not be parsed as a decimal.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// The request document could not be written.
    #[error("Request encoding failed: {0}")]
    RequestEncoding(String),
}

impl GatewayError {
    /// Returns `true` if the error was raised before anything was sent.
    ///
    /// ```
    /// use qbms_gateway::error::GatewayError;
    ///
    /// assert!(GatewayError::MissingField { field: "amount" }.is_local());
    /// assert!(!GatewayError::TransportError("status 502".into()).is_local());
    /// ```
    #[must_use]
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            Self::MissingField { .. }
                | Self::InvalidAmount(_)
                | Self::InvalidConfig(_)
                | Self::RequestEncoding(_)
        )
    }
}
