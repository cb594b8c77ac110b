//! Request document construction.
//!
//! Every request shares one envelope:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <?qbmsxml version="4.1"?>
//! <QBMSXML>
//!   <SignonMsgsRq>
//!     <SignonDesktopRq>
//!       <ClientDateTime>2030-01-01T12:00:00</ClientDateTime>
//!       <ApplicationLogin>...</ApplicationLogin>
//!       <ConnectionTicket>...</ConnectionTicket>
//!     </SignonDesktopRq>
//!   </SignonMsgsRq>
//!   <QBMSXMLMsgsRq>
//!     <{Stem}Rq>...</{Stem}Rq>
//!   </QBMSXMLMsgsRq>
//! </QBMSXML>
//! ```
//!
//! Only the `<{Stem}Rq>` payload differs between actions.

use chrono::{DateTime, Utc};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event},
};
use uuid::Uuid;

use crate::{
    action::{Action, OptionField},
    config::Credentials,
    error::{GatewayError, Result},
    options::RequestOptions,
};

/// Protocol version announced in the `qbmsxml` processing instruction.
pub const API_VERSION: &str = "4.1";

const CLIENT_DATE_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Per-request values that are not derived from options or credentials.
///
/// [`RequestStamp::now`] is what the client uses; tests pin both fields to get
/// byte-stable documents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestStamp {
    /// Value of `ClientDateTime`.
    pub client_date_time: DateTime<Utc>,
    /// Value of `TransRequestID` for actions that carry one.
    pub trans_request_id: String,
}

impl RequestStamp {
    /// Current UTC time and a fresh request id.
    #[must_use]
    pub fn now() -> Self {
        Self { client_date_time: Utc::now(), trans_request_id: new_request_id() }
    }
}

/// Generates a `TransRequestID`: 32 lowercase hex characters.
///
/// ```
/// let id = qbms_gateway::builder::new_request_id();
/// assert_eq!(id.len(), 32);
/// assert!(id.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn new_request_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Validates `options` for `action` and writes the full request document.
///
/// # Errors
///
/// Returns [`GatewayError::MissingField`] if a required option is absent, in
/// which case nothing is written.
pub fn build(action: Action, options: &RequestOptions, credentials: &Credentials) -> Result<Vec<u8>> {
    build_stamped(action, options, credentials, &RequestStamp::now())
}

/// Same as [`build`] with caller-supplied timestamp and request id.
///
/// # Errors
///
/// Returns [`GatewayError::MissingField`] if a required option is absent, or
/// [`GatewayError::RequestEncoding`] if the document cannot be written.
///
/// # Examples
///
/// ```
/// use qbms_gateway::{
///     Credentials, RequestOptions,
///     action::Action,
///     builder::{RequestStamp, build_stamped},
/// };
///
/// let stamp = RequestStamp {
///     client_date_time: chrono::DateTime::from_timestamp(0, 0).unwrap(),
///     trans_request_id: "0".repeat(32),
/// };
/// let options = RequestOptions::new().credit_card_trans_id("YY1000045060");
/// let body = build_stamped(Action::Void, &options, &Credentials::new("login", "ticket"), &stamp)?;
///
/// let xml = String::from_utf8(body).unwrap();
/// assert!(xml.contains("<CreditCardTransID>YY1000045060</CreditCardTransID>"));
/// # Ok::<(), qbms_gateway::GatewayError>(())
/// ```
pub fn build_stamped(
    action: Action,
    options: &RequestOptions,
    credentials: &Credentials,
    stamp: &RequestStamp,
) -> Result<Vec<u8>> {
    options.validate(action)?;

    let mut doc = Document::new();
    doc.declaration()?;
    doc.open("QBMSXML")?;

    doc.open("SignonMsgsRq")?;
    doc.open("SignonDesktopRq")?;
    let client_date_time = stamp.client_date_time.format(CLIENT_DATE_TIME_FORMAT).to_string();
    doc.leaf("ClientDateTime", &client_date_time)?;
    doc.leaf("ApplicationLogin", &credentials.login)?;
    doc.leaf("ConnectionTicket", &credentials.password)?;
    doc.close("SignonDesktopRq")?;
    doc.close("SignonMsgsRq")?;

    doc.open("QBMSXMLMsgsRq")?;
    let request_tag = action.request_tag();
    doc.open(&request_tag)?;
    write_payload(&mut doc, action, options, stamp)?;
    doc.close(&request_tag)?;
    doc.close("QBMSXMLMsgsRq")?;

    doc.close("QBMSXML")?;
    Ok(doc.finish())
}

fn write_payload(
    doc: &mut Document,
    action: Action,
    options: &RequestOptions,
    stamp: &RequestStamp,
) -> Result<()> {
    match action {
        Action::CreateWalletEntry => {
            let card = options.require_card()?;
            doc.leaf("CustomerID", options.require_text(OptionField::CustomerId)?)?;
            doc.leaf("CreditCardNumber", &card.number)?;
            doc.leaf("ExpirationMonth", &card.month.to_string())?;
            doc.leaf("ExpirationYear", &card.year.to_string())?;
            doc.leaf("NameOnCard", &card.name)?;
            doc.leaf("CreditCardAddress", options.require_text(OptionField::CreditCardAddress)?)?;
            doc.leaf(
                "CreditCardPostalCode",
                options.require_text(OptionField::CreditCardPostalCode)?,
            )
        }
        Action::UpdateWalletEntry => {
            let card = options.require_card()?;
            write_wallet_entry(doc, options)?;
            doc.leaf("ExpirationMonth", &card.month.to_string())?;
            doc.leaf("ExpirationYear", &card.year.to_string())?;
            doc.leaf("NameOnCard", &card.name)?;
            if let Some(address) = options.text(OptionField::CreditCardAddress) {
                doc.leaf("CreditCardAddress", address)?;
            }
            if let Some(postal_code) = options.text(OptionField::CreditCardPostalCode) {
                doc.leaf("CreditCardPostalCode", postal_code)?;
            }
            Ok(())
        }
        Action::DeleteWalletEntry | Action::GetWalletEntry => write_wallet_entry(doc, options),
        Action::ChargeWalletEntry | Action::AuthorizeWalletEntry => {
            doc.leaf("TransRequestID", &stamp.trans_request_id)?;
            write_wallet_entry(doc, options)?;
            doc.leaf("Amount", &options.require_amount()?.to_wire())
        }
        Action::Capture => {
            doc.leaf("TransRequestID", &stamp.trans_request_id)?;
            doc.leaf("CreditCardTransID", options.require_text(OptionField::CreditCardTransId)?)?;
            if let Some(amount) = options.amount {
                doc.leaf("Amount", &amount.to_wire())?;
            }
            Ok(())
        }
        Action::Void => {
            doc.leaf("TransRequestID", &stamp.trans_request_id)?;
            doc.leaf("CreditCardTransID", options.require_text(OptionField::CreditCardTransId)?)
        }
    }
}

fn write_wallet_entry(doc: &mut Document, options: &RequestOptions) -> Result<()> {
    doc.leaf("WalletEntryID", options.require_text(OptionField::WalletEntryId)?)?;
    doc.leaf("CustomerID", options.require_text(OptionField::CustomerId)?)
}

/// Indented in-memory XML writer.
struct Document {
    writer: Writer<Vec<u8>>,
}

impl Document {
    fn new() -> Self {
        Self { writer: Writer::new_with_indent(Vec::new(), b' ', 2) }
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| GatewayError::RequestEncoding(e.to_string()))
    }

    fn declaration(&mut self) -> Result<()> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.write(Event::PI(BytesPI::new(format!("qbmsxml version=\"{API_VERSION}\""))))
    }

    fn open(&mut self, name: &str) -> Result<()> {
        self.write(Event::Start(BytesStart::new(name)))
    }

    fn close(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    fn leaf(&mut self, name: &str, text: &str) -> Result<()> {
        self.open(name)?;
        self.write(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }
}
