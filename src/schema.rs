//! Profile schemas as form descriptions.
//!
//! A profile document lists every property of a resource, including the ones
//! that are really hypermedia relations. Those carry a `format` marker
//! (`"format": "uri"` in Spring Data REST profiles) and can only be changed
//! through their own association endpoints, so they never appear in a form.
//!
//! The split is decided once, when the document is parsed:
//!
//! | Descriptor                                 | Property            |
//! |--------------------------------------------|---------------------|
//! | `{ "type": "string" }`                     | `DataField`         |
//! | `{ "type": "string", "format": "uri" }`    | `LinkField`         |
//! | `true`                                     | `DataField`         |

use serde_json::Value;

use crate::error::SchemaError;
use crate::types::json_type_name;

/// Key whose presence marks a property as a hypermedia link.
pub const LINK_MARKER: &str = "format";

/// A single schema property, tagged by how a form treats it.
///
/// `descriptor` is the property's schema: an object, or a boolean schema.
#[derive(Debug, Clone, PartialEq)]
pub enum Property {
    /// Editable data; rendered as a form field and sent in the body.
    DataField { descriptor: Value },
    /// Hypermedia relation; never rendered, never sent.
    LinkField { descriptor: Value },
}

impl Property {
    fn from_descriptor(descriptor: Value) -> Self {
        // Boolean schemas carry no keywords, so they are always data.
        if descriptor.get(LINK_MARKER).is_some() {
            Property::LinkField { descriptor }
        } else {
            Property::DataField { descriptor }
        }
    }

    pub fn is_link(&self) -> bool {
        matches!(self, Property::LinkField { .. })
    }

    pub fn descriptor(&self) -> &Value {
        match self {
            Property::DataField { descriptor } | Property::LinkField { descriptor } => descriptor,
        }
    }
}

/// A parsed profile schema.
#[derive(Debug, Clone)]
pub struct Schema {
    document: Value,
    properties: Vec<(String, Property)>,
}

impl Schema {
    /// Parse a profile document.
    ///
    /// Only the shape a form needs is checked: a `properties` object whose
    /// members are object or boolean schemas. The rest of the document is
    /// taken as-is; use [`Schema::parse_strict`] to also require a valid
    /// JSON Schema.
    ///
    /// # Errors
    ///
    /// Returns `SchemaError::MissingProperties` / `InvalidProperties` when the
    /// document has no usable `properties` object, and `InvalidDescriptor`
    /// when a property is described by neither an object nor a boolean.
    pub fn parse(document: Value) -> Result<Self, SchemaError> {
        let properties = match document.get("properties") {
            None => return Err(SchemaError::MissingProperties),
            Some(Value::Object(props)) => props,
            Some(other) => {
                return Err(SchemaError::InvalidProperties {
                    actual: json_type_name(other).to_string(),
                })
            }
        };

        let mut parsed = Vec::with_capacity(properties.len());
        for (name, descriptor) in properties {
            match descriptor {
                Value::Object(_) | Value::Bool(_) => {
                    parsed.push((name.clone(), Property::from_descriptor(descriptor.clone())));
                }
                other => {
                    return Err(SchemaError::InvalidDescriptor {
                        name: name.clone(),
                        actual: json_type_name(other).to_string(),
                    })
                }
            }
        }

        Ok(Self {
            document,
            properties: parsed,
        })
    }

    /// Parse a profile document that must also compile as a JSON Schema.
    ///
    /// # Errors
    ///
    /// Everything [`Schema::parse`] returns, plus `InvalidSchema` when the
    /// document fails the JSON Schema meta-schema.
    pub fn parse_strict(document: Value) -> Result<Self, SchemaError> {
        jsonschema::validator_for(&document).map_err(|e| SchemaError::InvalidSchema {
            message: e.to_string(),
        })?;
        Self::parse(document)
    }

    /// The schema `title`, used as the form's root name.
    pub fn title(&self) -> Option<&str> {
        self.document.get("title").and_then(Value::as_str)
    }

    /// All properties in document order.
    pub fn properties(&self) -> impl Iterator<Item = (&str, &Property)> {
        self.properties.iter().map(|(name, prop)| (name.as_str(), prop))
    }

    pub fn get(&self, name: &str) -> Option<&Property> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, prop)| prop)
    }

    /// Names of the editable properties, in document order.
    pub fn data_fields(&self) -> impl Iterator<Item = &str> {
        self.properties()
            .filter(|(_, prop)| !prop.is_link())
            .map(|(name, _)| name)
    }

    /// Names of the link properties, in document order.
    pub fn link_fields(&self) -> impl Iterator<Item = &str> {
        self.properties()
            .filter(|(_, prop)| prop.is_link())
            .map(|(name, _)| name)
    }

    /// The raw profile document as fetched.
    pub fn document(&self) -> &Value {
        &self.document
    }

    /// The schema a form renderer should draw.
    ///
    /// Link properties are removed from `properties` and from `required`;
    /// everything else in the document is kept as-is.
    pub fn form_schema(&self) -> Value {
        let mut form = self.document.clone();
        let links: Vec<&str> = self.link_fields().collect();

        if let Some(Value::Object(props)) = form.get_mut("properties") {
            for name in &links {
                props.shift_remove(*name);
            }
        }
        if let Some(Value::Array(required)) = form.get_mut("required") {
            required.retain(|r| r.as_str().map_or(true, |name| !links.contains(&name)));
        }

        form
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person_schema() -> Value {
        json!({
            "title": "Person",
            "properties": {
                "firstName": { "type": "string" },
                "address": { "type": "string", "format": "uri" },
                "lastName": { "type": "string" }
            },
            "required": ["firstName", "address"]
        })
    }

    #[test]
    fn parse_tags_properties_by_format_marker() {
        let schema = Schema::parse(person_schema()).unwrap();

        assert!(!schema.get("firstName").unwrap().is_link());
        assert!(schema.get("address").unwrap().is_link());
        assert!(schema.get("missing").is_none());
    }

    #[test]
    fn any_format_value_marks_a_link() {
        let schema = Schema::parse(json!({
            "properties": { "born": { "type": "string", "format": "date-time" } }
        }))
        .unwrap();

        assert_eq!(schema.link_fields().collect::<Vec<_>>(), ["born"]);
    }

    #[test]
    fn data_and_link_fields_keep_document_order() {
        let schema = Schema::parse(person_schema()).unwrap();

        assert_eq!(
            schema.data_fields().collect::<Vec<_>>(),
            ["firstName", "lastName"]
        );
        assert_eq!(schema.link_fields().collect::<Vec<_>>(), ["address"]);
    }

    #[test]
    fn title_is_exposed() {
        let schema = Schema::parse(person_schema()).unwrap();
        assert_eq!(schema.title(), Some("Person"));

        let untitled = Schema::parse(json!({ "properties": {} })).unwrap();
        assert_eq!(untitled.title(), None);
    }

    #[test]
    fn missing_properties_is_an_error() {
        let result = Schema::parse(json!({ "title": "Person" }));
        assert!(matches!(result, Err(SchemaError::MissingProperties)));
    }

    #[test]
    fn non_object_properties_is_an_error() {
        let result = Schema::parse(json!({ "properties": ["name"] }));
        match result {
            Err(SchemaError::InvalidProperties { actual }) => assert_eq!(actual, "array"),
            other => panic!("expected InvalidProperties, got {:?}", other),
        }
    }

    #[test]
    fn non_object_descriptor_is_an_error() {
        let result = Schema::parse(json!({ "properties": { "name": "string" } }));
        assert!(matches!(
            result,
            Err(SchemaError::InvalidDescriptor { ref name, .. }) if name == "name"
        ));
    }

    #[test]
    fn boolean_property_schema_is_data() {
        let schema = Schema::parse(json!({
            "properties": {
                "name": { "type": "string" },
                "extra": true,
                "self": { "type": "string", "format": "uri" }
            }
        }))
        .unwrap();

        assert_eq!(schema.data_fields().collect::<Vec<_>>(), ["name", "extra"]);
        assert_eq!(schema.get("extra").unwrap().descriptor(), &json!(true));
    }

    #[test]
    fn meta_schema_violations_are_tolerated() {
        let document = json!({
            "properties": { "age": { "type": "not-a-type" } }
        });

        let schema = Schema::parse(document.clone()).unwrap();
        assert_eq!(schema.data_fields().collect::<Vec<_>>(), ["age"]);

        let result = Schema::parse_strict(document);
        assert!(matches!(result, Err(SchemaError::InvalidSchema { .. })));
    }

    #[test]
    fn parse_strict_accepts_valid_schema() {
        let schema = Schema::parse_strict(person_schema()).unwrap();
        assert_eq!(schema.link_fields().collect::<Vec<_>>(), ["address"]);
    }

    #[test]
    fn form_schema_drops_links_from_properties_and_required() {
        let schema = Schema::parse(person_schema()).unwrap();
        let form = schema.form_schema();

        assert!(form["properties"].get("address").is_none());
        assert!(form["properties"].get("firstName").is_some());
        assert_eq!(form["required"], json!(["firstName"]));
        assert_eq!(form["title"], "Person");
    }

    #[test]
    fn form_schema_leaves_document_untouched() {
        let schema = Schema::parse(person_schema()).unwrap();
        let _ = schema.form_schema();

        assert!(schema.document()["properties"].get("address").is_some());
    }
}
