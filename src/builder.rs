//! Request construction from a schema and harvested field values.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use serde_json::{Map, Value};

use crate::headers::parse_headers;
use crate::schema::{Property, Schema};
use crate::types::{FormState, HeaderSource, WriteRequest, JSON_MEDIA_TYPE};

/// A source of form field values, looked up by property name.
pub trait FieldValues {
    fn value(&self, name: &str) -> Option<&str>;
}

impl<S: BuildHasher> FieldValues for HashMap<String, String, S> {
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl FieldValues for BTreeMap<String, String> {
    fn value(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

impl FieldValues for [(&str, &str)] {
    fn value(&self, name: &str) -> Option<&str> {
        self.iter().rev().find(|(n, _)| *n == name).map(|(_, v)| *v)
    }
}

impl<const N: usize> FieldValues for [(&str, &str); N] {
    fn value(&self, name: &str) -> Option<&str> {
        self.as_slice().value(name)
    }
}

/// Build the request body: every data field of `schema`, in schema order.
///
/// A data field without a value is sent as an empty string. Link fields and
/// values for names the schema does not know are never included.
pub fn build_body<V: FieldValues + ?Sized>(schema: &Schema, values: &V) -> Map<String, Value> {
    schema
        .properties()
        .filter_map(|(name, prop)| match prop {
            Property::DataField { .. } => {
                let value = values.value(name).unwrap_or_default();
                Some((name.to_string(), Value::String(value.to_string())))
            }
            Property::LinkField { .. } => None,
        })
        .collect()
}

/// Turns form state into write requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestBuilder {
    header_source: HeaderSource,
}

impl RequestBuilder {
    pub fn new(header_source: HeaderSource) -> Self {
        Self { header_source }
    }

    pub fn header_source(&self) -> HeaderSource {
        self.header_source
    }

    /// Build a write request.
    ///
    /// URL is taken verbatim from the form and the method is upper-cased.
    /// Headers follow the builder's `HeaderSource`.
    pub fn build<V: FieldValues + ?Sized>(
        &self,
        schema: &Schema,
        form: &FormState,
        values: &V,
    ) -> WriteRequest {
        let headers = match self.header_source {
            HeaderSource::Json => {
                let mut headers = BTreeMap::new();
                headers.insert("Content-Type".to_string(), JSON_MEDIA_TYPE.to_string());
                headers
            }
            HeaderSource::UserText => parse_headers(&form.headers),
        };

        // A map of strings always serializes.
        let body = Value::Object(build_body(schema, values)).to_string();

        WriteRequest {
            url: form.url.clone(),
            method: form.method.trim().to_uppercase(),
            headers,
            header_source: self.header_source,
            body,
        }
    }
}
