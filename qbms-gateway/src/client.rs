//! Gateway client.
//!
//! Every operation runs the same pipeline: validate options, build the request
//! document, post it once, parse the response element and classify it. The
//! client holds only its configuration and transport, so one instance can
//! serve concurrent calls.

use tracing::{debug, info, instrument, warn};

use crate::{
    action::Action,
    builder,
    config::GatewayConfig,
    error::Result,
    options::{Amount, RequestOptions},
    parser,
    response::GatewayResponse,
    transport::{HttpTransport, RequestContext, Transport},
};

/// Content type the gateway expects on request bodies.
pub const CONTENT_TYPE: &str = "application/x-qbmsxml";

/// QBMS gateway client.
///
/// # Examples
///
/// ```rust,no_run
/// use qbms_gateway::{GatewayClient, GatewayConfig, RequestOptions};
///
/// # async fn example() -> qbms_gateway::Result<()> {
/// let client = GatewayClient::new(GatewayConfig::new("app.example.com", "TGT-1-abc", true))?;
///
/// let options = RequestOptions::new()
///     .wallet_entry_id("102138136671000089895100")
///     .customer_id("3187")
///     .amount(100_u32);
///
/// let response = client.authorize_wallet_entry(&options).await?;
/// if let Some(authorization) = response.authorization.as_deref() {
///     client.capture(None, authorization).await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct GatewayClient<T: Transport = HttpTransport> {
    config: GatewayConfig,
    transport: T,
}

impl GatewayClient<HttpTransport> {
    /// Creates a client that talks HTTP with the configured settings.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidConfig`](crate::GatewayError::InvalidConfig)
    /// if the configuration does not validate, or an HTTP error if the client
    /// cannot be created.
    pub fn new(config: GatewayConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::with_config(&config.http)?;
        Ok(Self { config, transport })
    }
}

impl<T: Transport> GatewayClient<T> {
    /// Creates a client over a custom transport.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidConfig`](crate::GatewayError::InvalidConfig)
    /// if the configuration does not validate.
    pub fn with_transport(config: GatewayConfig, transport: T) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Returns the transport.
    #[must_use]
    pub const fn transport(&self) -> &T {
        &self.transport
    }

    /// Stores a card as a new wallet entry.
    ///
    /// Requires `customer_id`, `credit_card`, `credit_card_address` and
    /// `credit_card_postal_code`. The new entry id is in
    /// `params["wallet_entry_id"]`.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn create_wallet_entry(&self, options: &RequestOptions) -> Result<GatewayResponse> {
        self.execute(Action::CreateWalletEntry, options).await
    }

    /// Updates expiration, name and optionally address of a wallet entry.
    ///
    /// Requires `wallet_entry_id`, `customer_id` and `credit_card`; the card
    /// number itself is not sent.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn update_wallet_entry(&self, options: &RequestOptions) -> Result<GatewayResponse> {
        self.execute(Action::UpdateWalletEntry, options).await
    }

    /// Removes a wallet entry. Requires `wallet_entry_id` and `customer_id`.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn delete_wallet_entry(&self, options: &RequestOptions) -> Result<GatewayResponse> {
        self.execute(Action::DeleteWalletEntry, options).await
    }

    /// Fetches a wallet entry. Requires `wallet_entry_id` and `customer_id`.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn get_wallet_entry(&self, options: &RequestOptions) -> Result<GatewayResponse> {
        self.execute(Action::GetWalletEntry, options).await
    }

    /// Authorizes and captures an amount against a wallet entry.
    ///
    /// Requires `wallet_entry_id`, `customer_id` and `amount`.
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn charge_wallet_entry(&self, options: &RequestOptions) -> Result<GatewayResponse> {
        self.execute(Action::ChargeWalletEntry, options).await
    }

    /// Authorizes an amount against a wallet entry.
    ///
    /// Requires `wallet_entry_id`, `customer_id` and `amount`. Pass the
    /// returned `authorization` to [`capture`](Self::capture) or
    /// [`void`](Self::void).
    ///
    /// # Errors
    ///
    /// See [`execute`](Self::execute).
    pub async fn authorize_wallet_entry(
        &self,
        options: &RequestOptions,
    ) -> Result<GatewayResponse> {
        self.execute(Action::AuthorizeWalletEntry, options).await
    }

    /// Captures a prior authorization, optionally for a different amount.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingField`](crate::GatewayError::MissingField)
    /// if `authorization` is empty; otherwise see [`execute`](Self::execute).
    pub async fn capture(
        &self,
        amount: Option<Amount>,
        authorization: &str,
    ) -> Result<GatewayResponse> {
        let mut options = RequestOptions::new().credit_card_trans_id(authorization);
        options.amount = amount;
        self.execute(Action::Capture, &options).await
    }

    /// Voids a prior transaction.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingField`](crate::GatewayError::MissingField)
    /// if `authorization` is empty; otherwise see [`execute`](Self::execute).
    pub async fn void(&self, authorization: &str) -> Result<GatewayResponse> {
        let options = RequestOptions::new().credit_card_trans_id(authorization);
        self.execute(Action::Void, &options).await
    }

    /// Runs one action end to end.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::MissingField`](crate::GatewayError::MissingField): a
    ///   required option is absent; nothing was sent
    /// - [`GatewayError::HttpError`](crate::GatewayError::HttpError) or
    ///   [`GatewayError::TransportError`](crate::GatewayError::TransportError):
    ///   the exchange failed
    /// - [`GatewayError::MalformedResponse`](crate::GatewayError::MalformedResponse):
    ///   the body is not XML
    ///
    /// A gateway-side rejection is returned as `Ok` with `success == false`.
    #[instrument(
        skip(self, options),
        fields(action = %action, test = self.config.test, protocol = self.transport.protocol_name())
    )]
    pub async fn execute(&self, action: Action, options: &RequestOptions) -> Result<GatewayResponse> {
        info!("sending gateway request");

        let body = builder::build(action, options, &self.config.credentials)?;
        debug!(request_bytes = body.len(), "request built");

        let ctx = RequestContext {
            url: self.config.endpoint(),
            content_type: Some(CONTENT_TYPE),
        };
        let reply = self.transport.post(ctx, &body).await?;
        debug!(status = reply.status, response_bytes = reply.body.len(), "response received");

        let params = parser::parse_response(action, &reply.body)?;
        let response = GatewayResponse::from_params(params, self.config.test);

        if response.success {
            info!(success = true, status_code = response.status_code(), "gateway request completed");
        } else {
            warn!(
                success = false,
                status_code = response.status_code(),
                status_message = %response.message,
                "gateway rejected request"
            );
        }

        Ok(response)
    }
}
