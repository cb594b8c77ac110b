//! Per-call request options and the value types they carry.
//!
//! [`RequestOptions`] is built fresh for every call and checked against
//! [`Action::required_options`] before any XML is written.

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;

use crate::{
    action::{Action, OptionField},
    error::{GatewayError, Result},
};

/// Card details sent when storing or updating a wallet entry.
///
/// `Debug` output masks the card number down to its last four digits.
#[derive(Clone, PartialEq, Eq)]
pub struct CreditCard {
    /// Primary account number.
    pub number: String,
    /// Expiration month (1-12).
    pub month: u8,
    /// Four-digit expiration year.
    pub year: u16,
    /// Cardholder name as printed on the card.
    pub name: String,
}

impl CreditCard {
    /// Creates a card.
    #[must_use]
    pub fn new(number: impl Into<String>, month: u8, year: u16, name: impl Into<String>) -> Self {
        Self { number: number.into(), month, year, name: name.into() }
    }

    /// Returns the number with all but the last four characters replaced by `*`.
    ///
    /// ```
    /// use qbms_gateway::CreditCard;
    ///
    /// let card = CreditCard::new("5105105105105100", 9, 2030, "Longbob Longsen");
    /// assert_eq!(card.masked_number(), "************5100");
    /// ```
    #[must_use]
    pub fn masked_number(&self) -> String {
        let len = self.number.chars().count();
        let visible = len.saturating_sub(4);
        self.number
            .chars()
            .enumerate()
            .map(|(i, c)| if i < visible { '*' } else { c })
            .collect()
    }
}

impl fmt::Debug for CreditCard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreditCard")
            .field("number", &self.masked_number())
            .field("month", &self.month)
            .field("year", &self.year)
            .field("name", &self.name)
            .finish()
    }
}

/// A money amount in the merchant account's currency.
///
/// ```
/// use qbms_gateway::Amount;
///
/// assert_eq!(Amount::from(100_u32).to_wire(), "100.00");
/// assert_eq!("12.5".parse::<Amount>().unwrap().to_wire(), "12.50");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(Decimal);

impl Amount {
    /// Wraps a decimal amount.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying decimal.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Formats the amount with exactly two decimal places.
    #[must_use]
    pub fn to_wire(self) -> String {
        let mut value = self.0.round_dp(2);
        value.rescale(2);
        value.to_string()
    }
}

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<u32> for Amount {
    fn from(value: u32) -> Self {
        Self(Decimal::from(value))
    }
}

impl FromStr for Amount {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|e| GatewayError::InvalidAmount(format!("{s:?}: {e}")))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_wire())
    }
}

/// Named parameters for one gateway call.
///
/// Which fields must be set depends on the [`Action`]; see
/// [`Action::required_options`].
///
/// # Examples
///
/// ```
/// use qbms_gateway::{RequestOptions, action::Action};
///
/// let options = RequestOptions::new()
///     .wallet_entry_id("102138136671000089895100")
///     .customer_id("3187");
///
/// assert!(options.validate(Action::GetWalletEntry).is_ok());
/// assert!(options.validate(Action::ChargeWalletEntry).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Merchant-side customer identifier.
    pub customer_id: Option<String>,
    /// Gateway wallet entry identifier.
    pub wallet_entry_id: Option<String>,
    /// Card to store or update.
    pub credit_card: Option<CreditCard>,
    /// Billing street address.
    pub credit_card_address: Option<String>,
    /// Billing postal code.
    pub credit_card_postal_code: Option<String>,
    /// Transaction amount.
    pub amount: Option<Amount>,
    /// Identifier of a prior transaction (capture and void).
    pub credit_card_trans_id: Option<String>,
}

impl RequestOptions {
    /// Creates empty options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the customer identifier.
    #[must_use]
    pub fn customer_id(mut self, value: impl Into<String>) -> Self {
        self.customer_id = Some(value.into());
        self
    }

    /// Sets the wallet entry identifier.
    #[must_use]
    pub fn wallet_entry_id(mut self, value: impl Into<String>) -> Self {
        self.wallet_entry_id = Some(value.into());
        self
    }

    /// Sets the card.
    #[must_use]
    pub fn credit_card(mut self, card: CreditCard) -> Self {
        self.credit_card = Some(card);
        self
    }

    /// Sets the billing street address.
    #[must_use]
    pub fn credit_card_address(mut self, value: impl Into<String>) -> Self {
        self.credit_card_address = Some(value.into());
        self
    }

    /// Sets the billing postal code.
    #[must_use]
    pub fn credit_card_postal_code(mut self, value: impl Into<String>) -> Self {
        self.credit_card_postal_code = Some(value.into());
        self
    }

    /// Sets the amount.
    #[must_use]
    pub fn amount(mut self, amount: impl Into<Amount>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    /// Sets the prior transaction identifier.
    #[must_use]
    pub fn credit_card_trans_id(mut self, value: impl Into<String>) -> Self {
        self.credit_card_trans_id = Some(value.into());
        self
    }

    /// Returns `true` if `field` is set and, for text fields, non-empty.
    #[must_use]
    pub fn is_present(&self, field: OptionField) -> bool {
        match field {
            OptionField::CreditCard => self.credit_card.is_some(),
            OptionField::Amount => self.amount.is_some(),
            _ => self.text(field).is_some(),
        }
    }

    /// Checks that every option `action` requires is present.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingField`] naming the first missing option,
    /// in the order listed by [`Action::required_options`].
    pub fn validate(&self, action: Action) -> Result<()> {
        match action.required_options().iter().find(|field| !self.is_present(**field)) {
            Some(field) => Err(GatewayError::MissingField { field: field.name() }),
            None => Ok(()),
        }
    }

    /// Returns a text option if it is set and non-empty.
    #[must_use]
    pub fn text(&self, field: OptionField) -> Option<&str> {
        let value = match field {
            OptionField::CustomerId => self.customer_id.as_deref(),
            OptionField::WalletEntryId => self.wallet_entry_id.as_deref(),
            OptionField::CreditCardAddress => self.credit_card_address.as_deref(),
            OptionField::CreditCardPostalCode => self.credit_card_postal_code.as_deref(),
            OptionField::CreditCardTransId => self.credit_card_trans_id.as_deref(),
            OptionField::CreditCard | OptionField::Amount => None,
        };
        value.filter(|v| !v.is_empty())
    }

    /// Returns a text option or a [`GatewayError::MissingField`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingField`] if the option is unset or empty.
    pub fn require_text(&self, field: OptionField) -> Result<&str> {
        self.text(field).ok_or(GatewayError::MissingField { field: field.name() })
    }

    /// Returns the card or a [`GatewayError::MissingField`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingField`] if no card is set.
    pub fn require_card(&self) -> Result<&CreditCard> {
        self.credit_card
            .as_ref()
            .ok_or(GatewayError::MissingField { field: OptionField::CreditCard.name() })
    }

    /// Returns the amount or a [`GatewayError::MissingField`].
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::MissingField`] if no amount is set.
    pub fn require_amount(&self) -> Result<Amount> {
        self.amount.ok_or(GatewayError::MissingField { field: OptionField::Amount.name() })
    }
}
