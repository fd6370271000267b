//! Schema resolution for HAL resources.
//!
//! Two steps, each feeding the next:
//!
//! 1. `GET {resource}` and read `_links.profile.href` from the HAL document.
//! 2. `GET {profile}` with `Accept: application/schema+json`.
//!
//! The first failure aborts; the profile is never requested when the resource
//! could not be read.

use serde_json::Value;
use tracing::debug;

use crate::error::FetchError;
use crate::schema::Schema;
use crate::types::{strip_template, SCHEMA_MEDIA_TYPE};

/// Reads JSON documents over HTTP.
pub trait HalClient {
    /// GET `url` and parse the body as JSON.
    ///
    /// `accept` overrides the client's default `Accept` header.
    fn get_json(&self, url: &str, accept: Option<&str>) -> Result<Value, FetchError>;
}

impl<C: HalClient + ?Sized> HalClient for &C {
    fn get_json(&self, url: &str, accept: Option<&str>) -> Result<Value, FetchError> {
        (**self).get_json(url, accept)
    }
}

/// Extract the `profile` link href from a HAL document.
///
/// When `profile` is an array of links the first one wins.
pub fn profile_href(hal: &Value) -> Option<&str> {
    let profile = hal.get("_links")?.get("profile")?;
    let link = match profile {
        Value::Array(links) => links.first()?,
        link => link,
    };
    link.get("href")?.as_str()
}

/// Resolve a possibly relative `href` against the document it came from.
#[cfg(feature = "remote")]
pub fn resolve_href(base: &str, href: &str) -> Result<String, FetchError> {
    let base_url = reqwest::Url::parse(base).map_err(|e| FetchError::InvalidUrl {
        url: base.to_string(),
        message: e.to_string(),
    })?;
    base_url
        .join(href)
        .map(String::from)
        .map_err(|e| FetchError::InvalidUrl {
            url: href.to_string(),
            message: e.to_string(),
        })
}

/// Without URL parsing, hrefs are used as given.
#[cfg(not(feature = "remote"))]
pub fn resolve_href(_base: &str, href: &str) -> Result<String, FetchError> {
    Ok(href.to_string())
}

/// Fetch and parse the profile schema of the resource at `href`.
///
/// Any URI template suffix on `href` is ignored.
///
/// # Errors
///
/// Returns the first failure: the resource GET, a missing profile link, the
/// profile GET, or a profile that is not a usable schema.
pub fn fetch_schema<C: HalClient + ?Sized>(client: &C, href: &str) -> Result<Schema, FetchError> {
    let resource_url = strip_template(href);

    debug!(url = resource_url, "fetching resource");
    let hal = client.get_json(resource_url, None)?;

    let profile = profile_href(&hal).ok_or_else(|| FetchError::MissingProfileLink {
        url: resource_url.to_string(),
    })?;
    let profile_url = resolve_href(resource_url, profile)?;

    debug!(url = %profile_url, "fetching profile schema");
    let document = client.get_json(&profile_url, Some(SCHEMA_MEDIA_TYPE))?;

    Ok(Schema::parse(document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::collections::HashMap;

    /// Serves canned documents and records every request.
    #[derive(Default)]
    struct CannedClient {
        documents: HashMap<String, Value>,
        requests: RefCell<Vec<(String, Option<String>)>>,
    }

    impl CannedClient {
        fn with(mut self, url: &str, doc: Value) -> Self {
            self.documents.insert(url.to_string(), doc);
            self
        }
    }

    impl HalClient for CannedClient {
        fn get_json(&self, url: &str, accept: Option<&str>) -> Result<Value, FetchError> {
            self.requests
                .borrow_mut()
                .push((url.to_string(), accept.map(str::to_string)));
            self.documents
                .get(url)
                .cloned()
                .ok_or_else(|| FetchError::Network {
                    url: url.to_string(),
                    message: "404 Not Found".to_string(),
                })
        }
    }

    fn people() -> Value {
        json!({
            "_embedded": { "people": [] },
            "_links": {
                "self": { "href": "http://localhost/people{?page,size,sort}", "templated": true },
                "profile": { "href": "http://localhost/profile/people" }
            }
        })
    }

    fn person_schema() -> Value {
        json!({
            "title": "Person",
            "properties": {
                "name": { "type": "string" },
                "address": { "type": "string", "format": "uri" }
            }
        })
    }

    #[test]
    fn profile_href_single_link() {
        assert_eq!(profile_href(&people()), Some("http://localhost/profile/people"));
    }

    #[test]
    fn profile_href_first_of_array() {
        let hal = json!({
            "_links": { "profile": [{ "href": "/profile/a" }, { "href": "/profile/b" }] }
        });
        assert_eq!(profile_href(&hal), Some("/profile/a"));
    }

    #[test]
    fn profile_href_missing() {
        assert_eq!(profile_href(&json!({ "_links": { "self": { "href": "/" } } })), None);
        assert_eq!(profile_href(&json!({})), None);
        assert_eq!(profile_href(&json!({ "_links": { "profile": [] } })), None);
    }

    #[test]
    fn fetches_resource_then_profile_with_schema_accept() {
        let client = CannedClient::default()
            .with("http://localhost/people", people())
            .with("http://localhost/profile/people", person_schema());

        let schema = fetch_schema(&client, "http://localhost/people{?page,size,sort}").unwrap();
        assert_eq!(schema.title(), Some("Person"));

        let requests = client.requests.borrow();
        assert_eq!(
            *requests,
            vec![
                ("http://localhost/people".to_string(), None),
                (
                    "http://localhost/profile/people".to_string(),
                    Some("application/schema+json".to_string())
                ),
            ]
        );
    }

    #[test]
    fn resource_failure_skips_profile_fetch() {
        let client = CannedClient::default();

        let result = fetch_schema(&client, "http://localhost/people");
        assert!(matches!(result, Err(FetchError::Network { .. })));
        assert_eq!(client.requests.borrow().len(), 1);
    }

    #[test]
    fn missing_profile_link_is_an_error() {
        let client =
            CannedClient::default().with("http://localhost/people", json!({ "_links": {} }));

        let result = fetch_schema(&client, "http://localhost/people");
        assert!(matches!(result, Err(FetchError::MissingProfileLink { .. })));
    }

    #[test]
    fn profile_without_properties_is_a_schema_error() {
        let client = CannedClient::default()
            .with("http://localhost/people", people())
            .with("http://localhost/profile/people", json!({ "title": "Person" }));

        let result = fetch_schema(&client, "http://localhost/people");
        assert!(matches!(result, Err(FetchError::Schema(_))));
    }

    #[cfg(feature = "remote")]
    #[test]
    fn relative_profile_href_resolves_against_resource() {
        let hal = json!({ "_links": { "profile": { "href": "/profile/people" } } });
        let client = CannedClient::default()
            .with("http://localhost:8080/api/people", hal)
            .with("http://localhost:8080/profile/people", person_schema());

        let schema = fetch_schema(&client, "http://localhost:8080/api/people").unwrap();
        assert_eq!(schema.data_fields().collect::<Vec<_>>(), ["name"]);
    }
}
