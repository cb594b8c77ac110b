//! QBMS Gateway: QuickBooks Merchant Service XML client
//!
//! A Rust client for the QuickBooks Merchant Service (QBMS) XML payment
//! gateway, covering card wallet management (store, update, fetch and delete a
//! card on file) and wallet-based transactions (charge, authorize, capture and
//! void).
//!
//! # Architecture
//!
//! ```text
//! RequestOptions ──► builder ──► XML bytes ──► Transport ──► XML bytes
//!                                                               │
//!  GatewayResponse ◄── classify ◄── XmlMap ◄── parser ◄─────────┘
//! ```
//!
//! - [`action`]: the closed set of operations, their wire element names and
//!   the options each one requires
//! - [`builder`]: writes the `QBMSXML` request envelope and per-action payload
//! - [`parser`]: reads the `<Stem>Rs` element into an [`XmlValue`] map with
//!   snake-case keys
//! - [`classify`]: derives success, message, AVS, CVV and authorization
//! - [`client`]: runs the pipeline over a [`transport::Transport`]
//!
//! Each call is independent. The client keeps no state between calls besides
//! its configuration.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use qbms_gateway::{CreditCard, GatewayClient, GatewayConfig, RequestOptions};
//!
//! # async fn example() -> qbms_gateway::Result<()> {
//! let client = GatewayClient::new(GatewayConfig::new("app.example.com", "TGT-1-abc", true))?;
//!
//! let stored = client
//!     .create_wallet_entry(
//!         &RequestOptions::new()
//!             .customer_id("3187")
//!             .credit_card(CreditCard::new("4111111111111111", 9, 2030, "Longbob Longsen"))
//!             .credit_card_address("1234 Fake Street")
//!             .credit_card_postal_code("94086"),
//!     )
//!     .await?;
//!
//! let wallet_entry_id = stored.params["wallet_entry_id"].as_str().unwrap_or_default();
//!
//! let charge = client
//!     .charge_wallet_entry(
//!         &RequestOptions::new()
//!             .wallet_entry_id(wallet_entry_id)
//!             .customer_id("3187")
//!             .amount(100_u32),
//!     )
//!     .await?;
//!
//! println!("success={} authorization={:?}", charge.success, charge.authorization);
//! # Ok(())
//! # }
//! ```
//!
//! # Error Handling
//!
//! Local and transport failures are [`GatewayError`]s. A declined or rejected
//! request is not an error; it is a [`GatewayResponse`] with `success == false`
//! and the gateway's status in `message` and `params`.
//!
//! ```rust
//! use qbms_gateway::{GatewayClient, GatewayError, RequestOptions};
//! # use qbms_gateway::transport::Transport;
//!
//! # async fn example<T: Transport>(client: &GatewayClient<T>) {
//! let options = RequestOptions::new().customer_id("3187");
//!
//! match client.get_wallet_entry(&options).await {
//!     Ok(response) if response.success => println!("found: {:?}", response.params),
//!     Ok(response) => eprintln!("rejected: {}", response.message),
//!     Err(GatewayError::MissingField { field }) => eprintln!("missing option: {field}"),
//!     Err(e) => eprintln!("gateway call failed: {e}"),
//! }
//! # }
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![allow(
    clippy::multiple_crate_versions,
    reason = "transitive dependencies from reqwest and criterion"
)]

pub mod action;
pub mod builder;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod options;
pub mod parser;
pub mod response;
pub mod transport;
pub mod value;

pub use action::Action;
pub use client::GatewayClient;
pub use config::{Credentials, GatewayConfig};
pub use error::{GatewayError, Result};
pub use options::{Amount, CreditCard, RequestOptions};
pub use response::GatewayResponse;
pub use value::{XmlMap, XmlValue};
