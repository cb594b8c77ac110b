//! Uniform result of a gateway call.

use serde::Serialize;

use crate::{
    classify::{AvsResult, Classification, CvvResult},
    value::{XmlMap, XmlValue},
};

/// Result of one gateway call.
///
/// A vendor-side rejection (declined card, unknown wallet entry, invalid field)
/// is a response with `success == false`, never an error.
///
/// # Examples
///
/// ```
/// use qbms_gateway::{GatewayResponse, value::{XmlMap, XmlValue}};
///
/// let mut params = XmlMap::new();
/// params.insert("status_code".into(), XmlValue::from("10315"));
/// params.insert("status_message".into(), XmlValue::from("No wallet-related records found in database."));
/// params.insert("status_severity".into(), XmlValue::from("ERROR"));
///
/// let response = GatewayResponse::from_params(params, true);
/// assert!(!response.success);
/// assert_eq!(response.status_code(), Some("10315"));
/// assert_eq!(response.status_severity(), Some("ERROR"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayResponse {
    /// `true` if the gateway reported status code `0`.
    pub success: bool,
    /// Gateway status message, empty if none was sent.
    pub message: String,
    /// Every value parsed from the response element.
    pub params: XmlMap,
    /// Address verification.
    pub avs: AvsResult,
    /// Card security code verification.
    pub cvv: Option<CvvResult>,
    /// Transaction id of this call, used for capture and void.
    pub authorization: Option<String>,
    /// Whether the call went to the test endpoint.
    pub test: bool,
}

impl GatewayResponse {
    /// Classifies `params` and wraps them.
    #[must_use]
    pub fn from_params(params: XmlMap, test: bool) -> Self {
        let Classification { success, message, avs, cvv, authorization } =
            crate::classify::classify(&params);
        Self { success, message, params, avs, cvv, authorization, test }
    }

    /// Looks up a top-level param.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&XmlValue> {
        self.params.get(key)
    }

    /// The `statusCode` attribute.
    #[must_use]
    pub fn status_code(&self) -> Option<&str> {
        self.param("status_code").and_then(XmlValue::as_str)
    }

    /// The `statusSeverity` attribute (`INFO`, `WARN` or `ERROR`).
    #[must_use]
    pub fn status_severity(&self) -> Option<&str> {
        self.param("status_severity").and_then(XmlValue::as_str)
    }
}
