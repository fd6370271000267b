//! Core types shared by the builder, fetcher and transport.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Media type requested when fetching a profile document.
pub const SCHEMA_MEDIA_TYPE: &str = "application/schema+json";

/// Media type of every body the builder produces.
pub const JSON_MEDIA_TYPE: &str = "application/json";

/// Prefix of the navigation marker recorded after a write.
pub const NON_GET_PREFIX: &str = "NON-GET:";

/// Returns the JSON type name for error messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Strip a URI template suffix from a HAL href.
///
/// `/people{?page,size,sort}` becomes `/people`.
pub fn strip_template(href: &str) -> &str {
    match href.find('{') {
        Some(idx) => &href[..idx],
        None => href,
    }
}

/// Where the headers of a write request come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeaderSource {
    /// Fixed `Content-Type: application/json`, header text is ignored.
    #[default]
    Json,
    /// Parsed from the form's free-text header block.
    UserText,
}

/// The form controls surrounding the generated fields.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormState {
    pub url: String,
    pub method: String,
    /// Newline-delimited `Name: Value` block.
    pub headers: String,
}

impl FormState {
    pub fn new(url: impl Into<String>, method: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: method.into(),
            headers: String::new(),
        }
    }

    /// Replace the header text.
    pub fn headers(mut self, headers: impl Into<String>) -> Self {
        self.headers = headers.into();
        self
    }
}

/// A fully built write request, ready for a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteRequest {
    pub url: String,
    pub method: String,
    pub headers: BTreeMap<String, String>,
    /// Where `headers` came from. User-edited headers are sent as they are.
    pub header_source: HeaderSource,
    /// Serialized JSON object of data field name to string value.
    pub body: String,
}

impl WriteRequest {
    /// Navigation marker recorded once the request has been sent.
    pub fn navigation_marker(&self) -> String {
        format!("{}{}", NON_GET_PREFIX, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_template_removes_suffix() {
        assert_eq!(strip_template("/people{?page,size,sort}"), "/people");
        assert_eq!(
            strip_template("http://localhost:8080/orders{/id}"),
            "http://localhost:8080/orders"
        );
    }

    #[test]
    fn strip_template_without_template() {
        assert_eq!(strip_template("/people"), "/people");
        assert_eq!(strip_template(""), "");
    }

    #[test]
    fn header_source_defaults_to_json() {
        assert_eq!(HeaderSource::default(), HeaderSource::Json);
    }

    #[test]
    fn navigation_marker_prefixes_url() {
        let request = WriteRequest {
            url: "/people".into(),
            method: "POST".into(),
            headers: BTreeMap::new(),
            header_source: HeaderSource::Json,
            body: "{}".into(),
        };
        assert_eq!(request.navigation_marker(), "NON-GET:/people");
    }
}
