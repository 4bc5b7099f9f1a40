//! Panelist records.
//!
//! A panelist is kept as the ordered JSON object returned by the upstream API.
//! Only `id` is required; `email` and `name` are read through accessors and
//! every other field is carried along untouched.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::Error;

/// Field holding the panelist identifier.
pub const ID_FIELD: &str = "id";

/// Field holding the panelist email address.
pub const EMAIL_FIELD: &str = "email";

/// Field holding the panelist display name.
pub const NAME_FIELD: &str = "name";

/// A single webinar panelist.
///
/// Field order is preserved through serialization, so a record read from the
/// API and written to a snapshot serializes to the same bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct Panelist {
    id: String,
    fields: Map<String, Value>,
}

impl Panelist {
    /// Create a panelist with an id and email.
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        let id = id.into();
        let mut fields = Map::new();
        fields.insert(ID_FIELD.to_string(), Value::String(id.clone()));
        fields.insert(EMAIL_FIELD.to_string(), Value::String(email.into()));
        Self { id, fields }
    }

    /// Build a panelist from a raw JSON object.
    ///
    /// The `id` field must be a string or a number; numbers are rendered in
    /// decimal. Any string is accepted as is, including the empty string.
    pub fn from_fields(fields: Map<String, Value>) -> Result<Self, Error> {
        let id = match fields.get(ID_FIELD) {
            Some(Value::String(id)) => id.clone(),
            Some(Value::Number(id)) => id.to_string(),
            Some(other) => {
                return Err(Error::InvalidPanelist(format!(
                    "unsupported id value: {}",
                    other
                )))
            }
            None => return Err(Error::InvalidPanelist("missing id field".to_string())),
        };

        Ok(Self { id, fields })
    }

    /// Set the display name.
    pub fn with_name(self, name: impl Into<String>) -> Self {
        self.with_field(NAME_FIELD, Value::String(name.into()))
    }

    /// Set an arbitrary field. Setting `id` is ignored.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if key != ID_FIELD {
            self.fields.insert(key, value.into());
        }
        self
    }

    /// The stable panelist identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The panelist email, if present.
    pub fn email(&self) -> Option<&str> {
        self.fields.get(EMAIL_FIELD).and_then(Value::as_str)
    }

    /// The panelist display name, if present and non-empty.
    pub fn name(&self) -> Option<&str> {
        self.fields
            .get(NAME_FIELD)
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }

    /// Look up a raw field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// All fields in upstream order.
    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Consume the panelist, returning its fields.
    pub fn into_fields(self) -> Map<String, Value> {
        self.fields
    }
}

impl TryFrom<Value> for Panelist {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Self::from_fields(fields),
            other => Err(Error::InvalidPanelist(format!(
                "expected object, got {}",
                other
            ))),
        }
    }
}

impl Serialize for Panelist {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Panelist {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Map::deserialize(deserializer)?;
        Panelist::from_fields(fields).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_panelist() {
        let panelist = Panelist::new("1", "a@x.com");
        assert_eq!(panelist.id(), "1");
        assert_eq!(panelist.email(), Some("a@x.com"));
        assert_eq!(panelist.name(), None);
    }

    #[test]
    fn test_with_name() {
        let panelist = Panelist::new("1", "a@x.com").with_name("Al");
        assert_eq!(panelist.name(), Some("Al"));
    }

    #[test]
    fn test_empty_name_is_absent() {
        let panelist = Panelist::new("1", "a@x.com").with_name("");
        assert_eq!(panelist.name(), None);
    }

    #[test]
    fn test_with_field_cannot_replace_id() {
        let panelist = Panelist::new("1", "a@x.com").with_field("id", "2");
        assert_eq!(panelist.id(), "1");
        assert_eq!(panelist.get("id"), Some(&json!("1")));
    }

    #[test]
    fn test_deserialize_keeps_unknown_fields_in_order() {
        let raw = r#"{"join_url":"https://x/j","id":"p1","email":"a@x.com","name":"Al"}"#;
        let panelist: Panelist = serde_json::from_str(raw).unwrap();

        assert_eq!(panelist.id(), "p1");
        assert_eq!(panelist.get("join_url"), Some(&json!("https://x/j")));

        let keys: Vec<_> = panelist.fields().keys().cloned().collect();
        assert_eq!(keys, vec!["join_url", "id", "email", "name"]);
        assert_eq!(serde_json::to_string(&panelist).unwrap(), raw);
    }

    #[test]
    fn test_numeric_id() {
        let panelist = Panelist::try_from(json!({"id": 42, "email": "a@x.com"})).unwrap();
        assert_eq!(panelist.id(), "42");
    }

    #[test]
    fn test_empty_string_id_accepted() {
        let panelist = Panelist::try_from(json!({"id": "", "email": "a@x.com"})).unwrap();
        assert_eq!(panelist.id(), "");
        assert_eq!(panelist.email(), Some("a@x.com"));
    }

    #[test]
    fn test_null_id_rejected() {
        let result = Panelist::try_from(json!({"id": null, "email": "a@x.com"}));
        assert!(matches!(result, Err(Error::InvalidPanelist(_))));
    }

    #[test]
    fn test_missing_id_rejected() {
        let result: Result<Panelist, _> = serde_json::from_str(r#"{"email":"a@x.com"}"#);
        assert!(result.is_err());

        let result = Panelist::try_from(json!({"id": true}));
        assert!(matches!(result, Err(Error::InvalidPanelist(_))));
    }

    #[test]
    fn test_non_object_rejected() {
        let result = Panelist::try_from(json!(["id", "1"]));
        assert!(matches!(result, Err(Error::InvalidPanelist(_))));
    }
}
