//! HAL Forms
//!
//! Schema-driven write requests for HAL APIs.
//!
//! A HAL resource links to a JSON-Schema profile describing its shape. This
//! library fetches that profile, separates editable data properties from
//! hypermedia link properties, and turns user-entered field values into a
//! POST/PUT request whose body only carries the data properties.
//!
//! # Example
//!
//! ```
//! use hal_forms::{FormState, HeaderSource, RequestBuilder, Schema};
//! use serde_json::json;
//!
//! let schema = Schema::parse(json!({
//!     "properties": {
//!         "name": { "type": "string" },
//!         "self": { "type": "string", "format": "uri" }
//!     }
//! }))
//! .unwrap();
//!
//! let form = FormState::new("/widgets", "POST");
//! let request = RequestBuilder::new(HeaderSource::Json).build(&schema, &form, &[("name", "Widget")]);
//!
//! // Link properties never reach the body
//! assert_eq!(request.body, r#"{"name":"Widget"}"#);
//! assert_eq!(request.headers["Content-Type"], "application/json");
//! ```
//!
//! # Property Kinds
//!
//! | Descriptor | Kind | In form | In body |
//! |------------|------|---------|---------|
//! | no `format` | `DataField` | yes | yes (empty string if unset) |
//! | has `format` | `LinkField` | no | never |
//!
//! # Outcome Events
//!
//! | Outcome | Events, in order |
//! |---------|------------------|
//! | success | `response`, `response-headers` |
//! | failure | `fail-response`, `response-headers` |

mod builder;
#[cfg(feature = "remote")]
mod client;
mod dialog;
mod error;
mod fetcher;
mod headers;
mod schema;
mod transport;
mod types;

pub use builder::{build_body, FieldValues, RequestBuilder};
pub use dialog::{DialogOptions, FormDialog};
pub use error::{FetchError, SchemaError};
pub use fetcher::{fetch_schema, profile_href, resolve_href, HalClient};
pub use headers::{format_headers, parse_headers};
pub use schema::{Property, Schema, LINK_MARKER};
pub use transport::{
    outcome_events, Event, Exchange, Outcome, Submission, Transport, TransportFailure,
};
pub use types::{
    strip_template, FormState, HeaderSource, WriteRequest, JSON_MEDIA_TYPE, NON_GET_PREFIX,
    SCHEMA_MEDIA_TYPE,
};

#[cfg(feature = "remote")]
pub use client::{ClientOptions, HttpClient, HTTP_TIMEOUT};
