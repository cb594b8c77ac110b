//! Gateway response parsing.
//!
//! Turns a raw response body into an [`XmlMap`] keyed by normalized element
//! names. Only the element `QBMSXML/QBMSXMLMsgsRs/<Stem>Rs` for the requested
//! action is read; everything else in the document (the signon section in
//! particular) is ignored.
//!
//! # Examples
//!
//! ```
//! use qbms_gateway::{action::Action, parser::parse_response};
//!
//! let body = br#"<?xml version="1.0"?>
//! <QBMSXML>
//!   <QBMSXMLMsgsRs>
//!     <CustomerCreditCardWalletAddRs statusCode="0" statusMessage="Status OK">
//!       <WalletEntryID>101123456789012345671111</WalletEntryID>
//!       <IsDuplicate>false</IsDuplicate>
//!     </CustomerCreditCardWalletAddRs>
//!   </QBMSXMLMsgsRs>
//! </QBMSXML>"#;
//!
//! let params = parse_response(Action::CreateWalletEntry, body)?;
//! assert_eq!(params["status_code"].as_str(), Some("0"));
//! assert_eq!(params["is_duplicate"].as_str(), Some("false"));
//! # Ok::<(), qbms_gateway::GatewayError>(())
//! ```

use std::borrow::Cow;

use roxmltree::{Document, Node, ParsingOptions};

use crate::{
    action::Action,
    error::{GatewayError, Result},
    value::{XmlMap, XmlValue},
};

const ROOT_ELEMENT: &str = "QBMSXML";
const MESSAGES_ELEMENT: &str = "QBMSXMLMsgsRs";

/// Parses a gateway response for `action`.
///
/// Returns an empty map when the document does not contain the response
/// element for `action`; that happens on signon-level failures.
///
/// # Errors
///
/// Returns [`GatewayError::MalformedResponse`] if `body` is not well-formed XML.
pub fn parse_response(action: Action, body: &[u8]) -> Result<XmlMap> {
    let text = decode_body(body);

    let mut options = ParsingOptions::default();
    // The gateway always sends a DOCTYPE with an external DTD reference.
    options.allow_dtd = true;

    let document = Document::parse_with_options(&text, options)
        .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

    let Some(root) = find_response_element(&document, &action.response_tag()) else {
        return Ok(XmlMap::new());
    };

    let mut params = match parse_element(root) {
        XmlValue::Map(map) => map,
        _ => XmlMap::new(),
    };

    for attribute in root.attributes() {
        params.insert(underscore(attribute.name()), XmlValue::from(attribute.value()));
    }

    Ok(params)
}

/// Converts one element into a value.
///
/// Leaves become their text. Elements with child elements become a map in
/// which repeated tag names are promoted to arrays.
#[must_use]
pub fn parse_element(node: Node<'_, '_>) -> XmlValue {
    let mut children = node.children().filter(Node::is_element).peekable();

    if children.peek().is_none() {
        let text = node.children().find(Node::is_text).and_then(|n| n.text());
        return XmlValue::from(text.unwrap_or_default());
    }

    let mut map = XmlMap::new();
    for child in children {
        XmlValue::append_to(&mut map, underscore(child.tag_name().name()), parse_element(child));
    }
    XmlValue::Map(map)
}

/// Normalizes a camel-case wire name into a lowercase, underscore-separated key.
///
/// An underscore is inserted before an uppercase letter that follows a
/// lowercase letter or digit, and before the last capital of an acronym when
/// a lowercase letter follows it. Hyphens become underscores.
///
/// ```
/// use qbms_gateway::parser::underscore;
///
/// assert_eq!(underscore("CreditCardTransID"), "credit_card_trans_id");
/// assert_eq!(underscore("AVSStreet"), "avs_street");
/// assert_eq!(underscore("statusCode"), "status_code");
/// ```
#[must_use]
pub fn underscore(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut key = String::with_capacity(name.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(char::is_ascii_lowercase);
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                key.push('_');
            }
        }
        match c {
            '-' => key.push('_'),
            _ => key.push(c.to_ascii_lowercase()),
        }
    }

    key
}

/// Decodes the body as UTF-8, falling back to ISO-8859-1.
fn decode_body(body: &[u8]) -> Cow<'_, str> {
    match std::str::from_utf8(body) {
        Ok(text) => Cow::Borrowed(text),
        Err(_) => Cow::Owned(body.iter().map(|&b| char::from(b)).collect()),
    }
}

fn find_response_element<'a, 'input>(
    document: &'a Document<'input>,
    response_tag: &str,
) -> Option<Node<'a, 'input>> {
    document
        .descendants()
        .filter(|node| node.has_tag_name(ROOT_ELEMENT))
        .flat_map(|root| root.children().filter(|n| n.has_tag_name(MESSAGES_ELEMENT)))
        .flat_map(|messages| messages.children().filter(|n| n.has_tag_name(response_tag)))
        .next()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wrap(inner: &str) -> String {
        format!(
            "<?xml version=\"1.0\"?><QBMSXML><QBMSXMLMsgsRs>{inner}</QBMSXMLMsgsRs></QBMSXML>"
        )
    }

    #[test]
    fn test_underscore_wire_names() {
        assert_eq!(underscore("WalletEntryID"), "wallet_entry_id");
        assert_eq!(underscore("IsDuplicate"), "is_duplicate");
        assert_eq!(underscore("CreditCardTransID"), "credit_card_trans_id");
        assert_eq!(underscore("AVSStreet"), "avs_street");
        assert_eq!(underscore("AVSZip"), "avs_zip");
        assert_eq!(underscore("CardSecurityCodeMatch"), "card_security_code_match");
        assert_eq!(underscore("MaskedCreditCardNumber"), "masked_credit_card_number");
        assert_eq!(underscore("ReconBatchID"), "recon_batch_id");
    }

    #[test]
    fn test_underscore_attribute_names() {
        assert_eq!(underscore("statusCode"), "status_code");
        assert_eq!(underscore("statusMessage"), "status_message");
        assert_eq!(underscore("statusSeverity"), "status_severity");
    }

    #[test]
    fn test_underscore_edge_cases() {
        assert_eq!(underscore(""), "");
        assert_eq!(underscore("QBMSXML"), "qbmsxml");
        assert_eq!(underscore("already_snake"), "already_snake");
        assert_eq!(underscore("Line2Address"), "line2_address");
        assert_eq!(underscore("x-custom-Tag"), "x_custom_tag");
    }

    #[test]
    fn test_parse_leaf_children_and_attributes() {
        let body = wrap(
            r#"<CustomerCreditCardWalletAddRs statusCode="0" statusMessage="Status OK" statusSeverity="INFO">
                 <WalletEntryID>101123456789012345671111</WalletEntryID>
                 <IsDuplicate>false</IsDuplicate>
               </CustomerCreditCardWalletAddRs>"#,
        );

        let params = parse_response(Action::CreateWalletEntry, body.as_bytes()).unwrap();
        assert_eq!(params["wallet_entry_id"].as_str(), Some("101123456789012345671111"));
        assert_eq!(params["is_duplicate"].as_str(), Some("false"));
        assert_eq!(params["status_code"].as_str(), Some("0"));
        assert_eq!(params["status_message"].as_str(), Some("Status OK"));
        assert_eq!(params["status_severity"].as_str(), Some("INFO"));
        assert_eq!(params.len(), 5);
    }

    #[test]
    fn test_parse_repeated_siblings_become_array() {
        let body = wrap(
            "<CustomerWalletQueryRs statusCode=\"0\">\
               <Item>one</Item><Item>two</Item><Item>three</Item>\
             </CustomerWalletQueryRs>",
        );

        let params = parse_response(Action::GetWalletEntry, body.as_bytes()).unwrap();
        let items = params["item"].as_array().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_str(), Some("one"));
        assert_eq!(items[1].as_str(), Some("two"));
        assert_eq!(items[2].as_str(), Some("three"));
    }

    #[test]
    fn test_parse_single_child_stays_scalar() {
        let body = wrap("<CustomerWalletQueryRs><Item>only</Item></CustomerWalletQueryRs>");

        let params = parse_response(Action::GetWalletEntry, body.as_bytes()).unwrap();
        assert_eq!(params["item"], XmlValue::from("only"));
    }

    #[test]
    fn test_parse_interleaved_repeats_keep_document_order() {
        let body = wrap(
            "<CustomerWalletQueryRs>\
               <Item>1</Item><Other>x</Other><Item>2</Item>\
             </CustomerWalletQueryRs>",
        );

        let params = parse_response(Action::GetWalletEntry, body.as_bytes()).unwrap();
        assert_eq!(params["item"], XmlValue::Array(vec![XmlValue::from("1"), XmlValue::from("2")]));
        assert_eq!(params["other"], XmlValue::from("x"));
    }

    #[test]
    fn test_parse_nested_elements() {
        let body = wrap(
            "<CustomerWalletQueryRs>\
               <Entry><ExpirationMonth>09</ExpirationMonth></Entry>\
               <Entry><ExpirationMonth>10</ExpirationMonth></Entry>\
             </CustomerWalletQueryRs>",
        );

        let params = parse_response(Action::GetWalletEntry, body.as_bytes()).unwrap();
        let entries = params["entry"].as_array().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].get("expiration_month").and_then(XmlValue::as_str), Some("09"));
        assert_eq!(entries[1].get("expiration_month").and_then(XmlValue::as_str), Some("10"));
    }

    #[test]
    fn test_parse_empty_leaf_is_empty_text() {
        let body = wrap("<CustomerWalletQueryRs><NameOnCard/><Other>x</Other></CustomerWalletQueryRs>");

        let params = parse_response(Action::GetWalletEntry, body.as_bytes()).unwrap();
        assert_eq!(params["name_on_card"], XmlValue::from(""));
    }

    #[test]
    fn test_parse_leaf_text_skips_leading_comment() {
        let body = wrap(
            "<CustomerWalletQueryRs>\
               <NameOnCard><!--masked-->Bob</NameOnCard>\
               <WalletEntryID>1021</WalletEntryID>\
             </CustomerWalletQueryRs>",
        );

        let params = parse_response(Action::GetWalletEntry, body.as_bytes()).unwrap();
        assert_eq!(params["name_on_card"], XmlValue::from("Bob"));
        assert_eq!(params["wallet_entry_id"], XmlValue::from("1021"));
    }

    #[test]
    fn test_parse_leaf_text_is_not_trimmed() {
        let body = wrap(
            "<CustomerCreditCardWalletChargeRs>\
               <ReconBatchID>420101222 1Q13075247711076653800AUTO04</ReconBatchID>\
             </CustomerCreditCardWalletChargeRs>",
        );

        let params = parse_response(Action::ChargeWalletEntry, body.as_bytes()).unwrap();
        assert_eq!(
            params["recon_batch_id"].as_str(),
            Some("420101222 1Q13075247711076653800AUTO04")
        );
    }

    #[test]
    fn test_parse_childless_response_has_only_attributes() {
        let body = wrap(
            r#"<CustomerCreditCardWalletModRs statusCode="0" statusMessage="Status OK" statusSeverity="INFO"/>"#,
        );

        let params = parse_response(Action::UpdateWalletEntry, body.as_bytes()).unwrap();
        assert_eq!(params.len(), 3);
        assert_eq!(params["status_code"].as_str(), Some("0"));
    }

    #[test]
    fn test_parse_missing_response_element_is_empty() {
        let body = "<?xml version=\"1.0\"?>\
            <QBMSXML><SignonMsgsRs>\
              <SignonDesktopRs statusCode=\"2000\" statusMessage=\"Signon failed\"/>\
            </SignonMsgsRs></QBMSXML>";

        let params = parse_response(Action::ChargeWalletEntry, body.as_bytes()).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_parse_other_action_element_is_ignored() {
        let body = wrap(r#"<CustomerCreditCardWalletAddRs statusCode="0"/>"#);

        let params = parse_response(Action::DeleteWalletEntry, body.as_bytes()).unwrap();
        assert!(params.is_empty());
    }

    #[test]
    fn test_parse_malformed_xml() {
        let result = parse_response(Action::GetWalletEntry, b"<QBMSXML><QBMSXMLMsgsRs>");
        assert!(matches!(result, Err(GatewayError::MalformedResponse(_))));

        let result = parse_response(Action::GetWalletEntry, b"not xml at all");
        assert!(matches!(result, Err(GatewayError::MalformedResponse(_))));
    }

    #[test]
    fn test_parse_accepts_doctype_and_latin1() {
        let mut body = br#"<?xml version="1.0" encoding="ISO-8859-1"?>
<!DOCTYPE QBMSXML PUBLIC "-//INTUIT//DTD QBMSXML QBMS 4.1//EN" "http://merchantaccount.ptc.quickbooks.com/dtds/qbmsxml41.dtd">
<QBMSXML><QBMSXMLMsgsRs><CustomerWalletQueryRs statusCode="0"><NameOnCard>Jos"#
            .to_vec();
        body.push(0xE9); // 'é' in ISO-8859-1
        body.extend_from_slice(b"</NameOnCard></CustomerWalletQueryRs></QBMSXMLMsgsRs></QBMSXML>");

        let params = parse_response(Action::GetWalletEntry, &body).unwrap();
        assert_eq!(params["name_on_card"].as_str(), Some("Jos\u{e9}"));
    }

    #[test]
    fn test_parse_is_idempotent() {
        let body = wrap(
            "<CustomerCreditCardCaptureRs statusCode=\"0\">\
               <CreditCardTransID>YY1000045083</CreditCardTransID>\
               <Item>a</Item><Item>b</Item>\
             </CustomerCreditCardCaptureRs>",
        );

        let first = parse_response(Action::Capture, body.as_bytes()).unwrap();
        let second = parse_response(Action::Capture, body.as_bytes()).unwrap();
        assert_eq!(first, second);
    }
}
