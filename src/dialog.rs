//! Form dialog lifecycle: open, submit, close.
//!
//! Opening fetches the schema; submitting builds and sends one write request
//! and closes the dialog whatever the outcome. The schema lives exactly as
//! long as the open dialog.

use std::collections::BTreeMap;

use serde_json::Value;
use tracing::{info, warn};

use crate::builder::{FieldValues, RequestBuilder};
use crate::error::FetchError;
use crate::fetcher::{fetch_schema, HalClient};
use crate::headers::format_headers;
use crate::schema::Schema;
use crate::transport::{Submission, Transport};
use crate::types::{strip_template, FormState, HeaderSource, JSON_MEDIA_TYPE};

/// Options for opening a dialog.
#[derive(Debug, Clone, Default)]
pub struct DialogOptions {
    pub header_source: HeaderSource,
    /// Headers pre-filled in the editable header block.
    pub default_headers: BTreeMap<String, String>,
}

impl DialogOptions {
    pub fn new(header_source: HeaderSource) -> Self {
        Self {
            header_source,
            default_headers: BTreeMap::new(),
        }
    }

    pub fn default_headers(mut self, headers: BTreeMap<String, String>) -> Self {
        self.default_headers = headers;
        self
    }
}

/// An open form dialog for one resource.
#[derive(Debug)]
pub struct FormDialog {
    href: String,
    schema: Schema,
    header_text: String,
    builder: RequestBuilder,
}

impl FormDialog {
    /// Fetch the resource's schema and open the dialog.
    ///
    /// # Errors
    ///
    /// Returns the first fetch failure; no dialog is opened.
    pub fn open<C: HalClient + ?Sized>(
        client: &C,
        href: &str,
        options: DialogOptions,
    ) -> Result<Self, FetchError> {
        let href = strip_template(href).to_string();
        let schema = fetch_schema(client, &href)?;

        let mut prefill = options.default_headers;
        prefill
            .entry("Content-Type".to_string())
            .or_insert_with(|| JSON_MEDIA_TYPE.to_string());

        Ok(Self {
            href,
            schema,
            header_text: format_headers(&prefill),
            builder: RequestBuilder::new(options.header_source),
        })
    }

    pub fn href(&self) -> &str {
        &self.href
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The schema a renderer should draw: links removed.
    pub fn form_schema(&self) -> Value {
        self.schema.form_schema()
    }

    /// Pre-filled header block.
    pub fn header_text(&self) -> &str {
        &self.header_text
    }

    /// Initial form controls: the resource URL, `method`, pre-filled headers.
    pub fn form_state(&self, method: &str) -> FormState {
        FormState::new(self.href.clone(), method).headers(self.header_text.clone())
    }

    /// Build and send the write request, closing the dialog.
    pub fn submit<T, V>(self, transport: &T, form: &FormState, values: &V) -> Submission
    where
        T: Transport + ?Sized,
        V: FieldValues + ?Sized,
    {
        let request = self.builder.build(&self.schema, form, values);
        let outcome = transport.execute(&request);

        match &outcome {
            Ok(exchange) => info!(
                method = %request.method,
                url = %request.url,
                status = exchange.status,
                "write request succeeded"
            ),
            Err(failure) => warn!(
                method = %request.method,
                url = %request.url,
                error = %failure,
                "write request failed"
            ),
        }

        Submission { request, outcome }
    }

    /// Close without submitting.
    pub fn close(self) {}
}
