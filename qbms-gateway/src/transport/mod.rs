//! Transport abstraction layer.
//!
//! The gateway client only needs one primitive: POST a body to a URL and get
//! the response bytes back. [`Transport`] captures that; [`HttpTransport`] is
//! the production implementation on top of reqwest, and tests substitute an
//! in-memory fake.
//!
//! # Examples
//!
//! ```rust,no_run
//! use qbms_gateway::transport::{HttpTransport, RequestContext, Transport};
//!
//! # async fn example() -> qbms_gateway::error::Result<()> {
//! let transport = HttpTransport::new()?;
//!
//! let ctx = RequestContext {
//!     url: "https://merchantaccount.ptc.quickbooks.com/j/AppGateway",
//!     content_type: Some("application/x-qbmsxml"),
//! };
//!
//! let response = transport.post(ctx, b"<?xml version=\"1.0\"?><QBMSXML/>").await?;
//! println!("Status: {}", response.status);
//! # Ok(())
//! # }
//! ```

#[allow(
    redundant_imports,
    reason = "Future needed for RPITIT despite being in Edition 2024 prelude"
)]
use std::future::Future;

use crate::error::Result;

pub mod http;

pub use http::HttpTransport;

/// Where and how a request body is sent.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    /// Absolute endpoint URL.
    pub url: &'a str,
    /// `Content-Type` of the body, if any.
    pub content_type: Option<&'a str>,
}

/// A successful reply.
#[derive(Debug)]
pub struct TransportResponse {
    /// HTTP status, always 2xx for [`HttpTransport`].
    pub status: u16,
    /// Raw reply body.
    pub body: Vec<u8>,
}

/// Transport protocol abstraction.
///
/// Implementations perform exactly one exchange per call, apply their own
/// timeout policy and never retry. A non-success status must be reported as
/// an error rather than a response.
///
/// Implementations must be safe to share between concurrent calls.
pub trait Transport: Send + Sync {
    /// Executes a POST request with body.
    ///
    /// # Errors
    ///
    /// Returns error if the URL or content type is rejected, the exchange fails, or
    /// the peer answers with a non-success status.
    fn post<'a>(
        &'a self,
        ctx: RequestContext<'a>,
        body: &'a [u8],
    ) -> impl Future<Output = Result<TransportResponse>> + Send + 'a;

    /// Returns the protocol name for logging.
    ///
    /// Examples: "http/1.1", "http/2"
    fn protocol_name(&self) -> &'static str;
}
