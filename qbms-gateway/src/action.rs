//! Gateway actions and their wire contract.
//!
//! Each [`Action`] maps to a wire stem used to name its request and response
//! elements (`<Stem>Rq` / `<Stem>Rs`) and to the set of options that must be
//! present before a request for it is built.

use std::fmt;

/// An operation supported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Store a card as a new wallet entry.
    CreateWalletEntry,
    /// Change expiration, name or address of a wallet entry.
    UpdateWalletEntry,
    /// Remove a wallet entry.
    DeleteWalletEntry,
    /// Fetch a wallet entry.
    GetWalletEntry,
    /// Authorize and capture against a wallet entry.
    ChargeWalletEntry,
    /// Authorize against a wallet entry.
    AuthorizeWalletEntry,
    /// Capture a prior authorization.
    Capture,
    /// Void a prior transaction.
    Void,
}

impl Action {
    /// All actions, in catalog order.
    pub const ALL: [Self; 8] = [
        Self::CreateWalletEntry,
        Self::UpdateWalletEntry,
        Self::DeleteWalletEntry,
        Self::GetWalletEntry,
        Self::ChargeWalletEntry,
        Self::AuthorizeWalletEntry,
        Self::Capture,
        Self::Void,
    ];

    /// Returns the wire stem for this action.
    ///
    /// ```
    /// use qbms_gateway::action::Action;
    ///
    /// assert_eq!(Action::CreateWalletEntry.wire_name(), "CustomerCreditCardWalletAdd");
    /// assert_eq!(Action::GetWalletEntry.wire_name(), "CustomerWalletQuery");
    /// ```
    #[must_use]
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::CreateWalletEntry => "CustomerCreditCardWalletAdd",
            Self::UpdateWalletEntry => "CustomerCreditCardWalletMod",
            Self::DeleteWalletEntry => "CustomerCreditCardWalletDel",
            Self::GetWalletEntry => "CustomerWalletQuery",
            Self::ChargeWalletEntry => "CustomerCreditCardWalletCharge",
            Self::AuthorizeWalletEntry => "CustomerCreditCardWalletAuth",
            Self::Capture => "CustomerCreditCardCapture",
            Self::Void => "CustomerCreditCardTxnVoid",
        }
    }

    /// Returns the options that must be present for this action.
    #[must_use]
    pub const fn required_options(self) -> &'static [OptionField] {
        use OptionField::{
            Amount, CreditCard, CreditCardAddress, CreditCardPostalCode, CreditCardTransId,
            CustomerId, WalletEntryId,
        };

        match self {
            Self::CreateWalletEntry => {
                &[CustomerId, CreditCard, CreditCardAddress, CreditCardPostalCode]
            }
            Self::UpdateWalletEntry => &[WalletEntryId, CustomerId, CreditCard],
            Self::DeleteWalletEntry | Self::GetWalletEntry => &[WalletEntryId, CustomerId],
            Self::ChargeWalletEntry | Self::AuthorizeWalletEntry => {
                &[WalletEntryId, CustomerId, Amount]
            }
            Self::Capture | Self::Void => &[CreditCardTransId],
        }
    }

    /// Name of the request element, e.g. `CustomerCreditCardWalletAddRq`.
    #[must_use]
    pub fn request_tag(self) -> String {
        format!("{}Rq", self.wire_name())
    }

    /// Name of the response element, e.g. `CustomerCreditCardWalletAddRs`.
    #[must_use]
    pub fn response_tag(self) -> String {
        format!("{}Rs", self.wire_name())
    }

    /// Short snake-case label used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::CreateWalletEntry => "create_wallet_entry",
            Self::UpdateWalletEntry => "update_wallet_entry",
            Self::DeleteWalletEntry => "delete_wallet_entry",
            Self::GetWalletEntry => "get_wallet_entry",
            Self::ChargeWalletEntry => "charge_wallet_entry",
            Self::AuthorizeWalletEntry => "authorize_wallet_entry",
            Self::Capture => "capture",
            Self::Void => "void",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named request option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionField {
    /// Merchant-side customer identifier.
    CustomerId,
    /// Gateway wallet entry identifier.
    WalletEntryId,
    /// Card number, expiration and name.
    CreditCard,
    /// Billing street address.
    CreditCardAddress,
    /// Billing postal code.
    CreditCardPostalCode,
    /// Transaction amount.
    Amount,
    /// Identifier of a prior transaction.
    CreditCardTransId,
}

impl OptionField {
    /// Option name as reported in [`GatewayError::MissingField`](crate::GatewayError::MissingField).
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CustomerId => "customer_id",
            Self::WalletEntryId => "wallet_entry_id",
            Self::CreditCard => "credit_card",
            Self::CreditCardAddress => "credit_card_address",
            Self::CreditCardPostalCode => "credit_card_postal_code",
            Self::Amount => "amount",
            Self::CreditCardTransId => "credit_card_trans_id",
        }
    }
}

impl fmt::Display for OptionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
