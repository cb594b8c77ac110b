//! Structured value produced by parsing a gateway response.
//!
//! A response element becomes one of three shapes:
//!
//! - [`XmlValue::Text`]: an element with no child elements, holding its text
//! - [`XmlValue::Map`]: an element with child elements, keyed by normalized tag name
//! - [`XmlValue::Array`]: the value under a key whose tag appeared more than once
//!   among its siblings, in document order
//!
//! # Examples
//!
//! ```
//! use qbms_gateway::value::{XmlMap, XmlValue};
//!
//! let mut params = XmlMap::new();
//! params.insert("status_code".to_owned(), XmlValue::from("0"));
//! let value = XmlValue::Map(params);
//!
//! assert_eq!(value.get("status_code").and_then(XmlValue::as_str), Some("0"));
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

/// Mapping from normalized key to value.
pub type XmlMap = BTreeMap<String, XmlValue>;

/// Recursive value parsed from a response element.
///
/// Serializes untagged: text becomes a JSON string, arrays a JSON array and
/// maps a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum XmlValue {
    /// Text content of a leaf element (possibly empty).
    Text(String),
    /// Values of repeated sibling elements, in document order.
    Array(Vec<XmlValue>),
    /// Child elements by normalized name.
    Map(XmlMap),
}

impl XmlValue {
    /// Returns the text if this is a leaf.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the elements if this is an array.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the mapping if this is a map.
    #[must_use]
    pub fn as_map(&self) -> Option<&XmlMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// Looks up `key` if this is a map.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_map().and_then(|map| map.get(key))
    }

    /// Returns `true` if this is an array.
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array(_))
    }

    /// Adds `value` under `key`, promoting repeated keys to an array.
    ///
    /// A first occurrence is stored as-is. A second occurrence replaces the
    /// stored value with a two-element array; later occurrences are appended.
    ///
    /// ```
    /// use qbms_gateway::value::{XmlMap, XmlValue};
    ///
    /// let mut map = XmlMap::new();
    /// XmlValue::append_to(&mut map, "item".to_owned(), XmlValue::from("a"));
    /// assert_eq!(map["item"], XmlValue::from("a"));
    ///
    /// XmlValue::append_to(&mut map, "item".to_owned(), XmlValue::from("b"));
    /// assert_eq!(map["item"].as_array().map(<[_]>::len), Some(2));
    /// ```
    pub fn append_to(map: &mut XmlMap, key: String, value: Self) {
        match map.get_mut(&key) {
            None => {
                map.insert(key, value);
            }
            Some(Self::Array(items)) => items.push(value),
            Some(existing) => {
                let first = std::mem::replace(existing, Self::Array(Vec::with_capacity(2)));
                *existing = Self::Array(vec![first, value]);
            }
        }
    }
}

impl From<&str> for XmlValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for XmlValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<XmlMap> for XmlValue {
    fn from(map: XmlMap) -> Self {
        Self::Map(map)
    }
}
