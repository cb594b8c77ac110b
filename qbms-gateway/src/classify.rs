//! Result classification.
//!
//! Derives the success flag, message, AVS/CVV results and authorization token
//! from parsed response params. Pure functions over an [`XmlMap`]; nothing here
//! fails.

use serde::Serialize;

use crate::value::{XmlMap, XmlValue};

/// Address verification outcome.
///
/// Each field is `Some("Y")` when the gateway reported `Pass`, `Some("N")` for
/// any other reported value, and `None` when the gateway did not report it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AvsResult {
    /// Street address match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street_match: Option<&'static str>,
    /// Postal code match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postal_match: Option<&'static str>,
}

impl AvsResult {
    /// Returns `true` if neither indicator was reported.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.street_match.is_none() && self.postal_match.is_none()
    }
}

/// Card security code outcome: `M` (match), `N` (no match) or `X` (anything
/// else, including `NotAvailable`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CvvResult {
    /// Single-letter match code.
    pub code: &'static str,
}

/// Everything derived from a response's params.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// `status_code == "0"`.
    pub success: bool,
    /// `status_message`, or empty.
    pub message: String,
    /// Address verification.
    pub avs: AvsResult,
    /// Card security code verification, absent if not reported.
    pub cvv: Option<CvvResult>,
    /// Transaction id to pass to capture or void.
    pub authorization: Option<String>,
}

/// Classifies parsed response params.
///
/// # Examples
///
/// ```
/// use qbms_gateway::{classify::classify, value::{XmlMap, XmlValue}};
///
/// let mut params = XmlMap::new();
/// params.insert("status_code".into(), XmlValue::from("0"));
/// params.insert("avs_street".into(), XmlValue::from("Pass"));
/// params.insert("card_security_code_match".into(), XmlValue::from("NotAvailable"));
///
/// let result = classify(&params);
/// assert!(result.success);
/// assert_eq!(result.avs.street_match, Some("Y"));
/// assert_eq!(result.avs.postal_match, None);
/// assert_eq!(result.cvv.map(|c| c.code), Some("X"));
/// ```
#[must_use]
pub fn classify(params: &XmlMap) -> Classification {
    Classification {
        success: text(params, "status_code") == Some("0"),
        message: text(params, "status_message").unwrap_or_default().to_owned(),
        avs: avs_result(params),
        cvv: cvv_result(params),
        authorization: text(params, "credit_card_trans_id").map(str::to_owned),
    }
}

/// Maps `avs_street` / `avs_zip` to match indicators.
#[must_use]
pub fn avs_result(params: &XmlMap) -> AvsResult {
    AvsResult {
        street_match: params.get("avs_street").map(|v| avs_indicator(v.as_str())),
        postal_match: params.get("avs_zip").map(|v| avs_indicator(v.as_str())),
    }
}

/// Maps `card_security_code_match` to a CVV code.
#[must_use]
pub fn cvv_result(params: &XmlMap) -> Option<CvvResult> {
    let code = match params.get("card_security_code_match")?.as_str() {
        Some("Y") => "M",
        Some("N") => "N",
        _ => "X",
    };
    Some(CvvResult { code })
}

fn avs_indicator(value: Option<&str>) -> &'static str {
    if value == Some("Pass") { "Y" } else { "N" }
}

fn text<'a>(params: &'a XmlMap, key: &str) -> Option<&'a str> {
    params.get(key).and_then(XmlValue::as_str)
}
