//! HTTP transport on reqwest.

use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use crate::{
    config::{HttpProtocol, HttpSettings},
    error::{GatewayError, Result},
    transport::{RequestContext, Transport, TransportResponse},
};

/// Rejects anything but an `https` URL to a non-loopback host.
fn validate_url(url: &Url) -> Result<()> {
    if url.scheme() != "https" {
        return Err(GatewayError::TransportError(format!(
            "refusing {} endpoint, https required",
            url.scheme()
        )));
    }

    if let Some(host) = url.host_str()
        && matches!(host, "localhost" | "127.0.0.1" | "::1" | "[::1]")
    {
        return Err(GatewayError::TransportError(format!("refusing loopback endpoint {host}")));
    }

    Ok(())
}

/// Rejects a content type that would split the header block.
fn validate_content_type(value: &str) -> Result<()> {
    if value.contains(['\r', '\n', '\0']) {
        return Err(GatewayError::TransportError(
            "content type contains control characters".to_owned(),
        ));
    }
    Ok(())
}

/// Maps a reply status to the transport contract: 2xx passes, anything else
/// is a [`GatewayError::TransportError`].
fn check_status(status: StatusCode) -> Result<()> {
    if status.is_success() {
        Ok(())
    } else {
        Err(GatewayError::TransportError(format!("gateway returned status {}", status.as_u16())))
    }
}

/// Production transport: one pooled reqwest client, one POST per call.
///
/// # Examples
///
/// ```rust,no_run
/// use qbms_gateway::transport::{HttpTransport, RequestContext, Transport};
///
/// # async fn example() -> qbms_gateway::error::Result<()> {
/// let transport = HttpTransport::new()?;
///
/// let ctx = RequestContext {
///     url: "https://merchantaccount.ptc.quickbooks.com/j/AppGateway",
///     content_type: Some("application/x-qbmsxml"),
/// };
///
/// let response = transport.post(ctx, b"<QBMSXML/>").await?;
/// println!("Status: {}", response.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    protocol: HttpProtocol,
}

impl HttpTransport {
    /// Creates a transport with [`HttpSettings::default`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::HttpError`] if the TLS backend cannot be
    /// initialized.
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpSettings::default())
    }

    /// Creates a transport from the `[http]` settings.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::HttpError`] if the client cannot be built.
    ///
    /// # Examples
    ///
    /// ```
    /// use qbms_gateway::{config::{HttpProtocol, HttpSettings}, transport::HttpTransport};
    ///
    /// let settings = HttpSettings {
    ///     timeout_secs: 60,
    ///     protocol: HttpProtocol::Http1,
    ///     ..Default::default()
    /// };
    /// let transport = HttpTransport::with_config(&settings)?;
    /// # Ok::<(), qbms_gateway::GatewayError>(())
    /// ```
    pub fn with_config(settings: &HttpSettings) -> Result<Self> {
        let builder =
            Client::builder().timeout(settings.timeout()).connect_timeout(settings.connect_timeout());

        let builder = match settings.protocol {
            HttpProtocol::Http1 => builder.http1_only(),
            HttpProtocol::Http2 => builder.http2_prior_knowledge(),
            HttpProtocol::Auto => builder,
        };

        let client = builder.build().map_err(GatewayError::HttpError)?;
        Ok(Self { client, protocol: settings.protocol })
    }

    #[instrument(skip(self, ctx, body), fields(url = ctx.url, request_bytes = body.len()))]
    async fn execute_post(&self, ctx: RequestContext<'_>, body: &[u8]) -> Result<TransportResponse> {
        let url = Url::parse(ctx.url)
            .map_err(|e| GatewayError::TransportError(format!("invalid url: {e}")))?;
        validate_url(&url)?;

        let mut request = self.client.post(url);
        if let Some(content_type) = ctx.content_type {
            validate_content_type(content_type)?;
            request = request.header(reqwest::header::CONTENT_TYPE, content_type);
        }

        let response = request.body(body.to_vec()).send().await?;
        let status = response.status();
        check_status(status)?;

        let body = response.bytes().await?.to_vec();
        debug!(status = status.as_u16(), response_bytes = body.len(), "gateway responded");

        Ok(TransportResponse { status: status.as_u16(), body })
    }
}

impl Transport for HttpTransport {
    async fn post<'a>(
        &'a self,
        ctx: RequestContext<'a>,
        body: &'a [u8],
    ) -> Result<TransportResponse> {
        self.execute_post(ctx, body).await
    }

    fn protocol_name(&self) -> &'static str {
        self.protocol.label()
    }
}
