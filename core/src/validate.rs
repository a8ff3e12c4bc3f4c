//! Required-field validation for raw JSON mappings.
//!
//! Every domain object declares a `Schema`: its type name plus the ordered
//! list of keys that must be present. `Schema::check` verifies presence in
//! declaration order and hands back a `Fields` view whose typed getters name
//! the offending key when a value has the wrong JSON shape.

use serde_json::{Map, Value};

/// Errors raised while building a domain object from a raw mapping.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Cannot create a {entity} with missing field: {field}")]
    MissingField {
        entity: &'static str,
        field: &'static str,
    },

    /// The key is present but holds the wrong kind of JSON value.
    #[error("Cannot create a {entity} with invalid field: {field} (expected {expected})")]
    InvalidField {
        entity: &'static str,
        field: &'static str,
        expected: &'static str,
    },

    #[error("Cannot create a {entity} from a value that is not a JSON object")]
    NotAnObject { entity: &'static str },

    #[error("Participants field must be a list")]
    ParticipantsNotAList,

    /// `scope` is either `"waiver"` or `"participant"`.
    #[error("Custom {scope} fields must be a dictionary")]
    CustomFieldsNotAMapping { scope: &'static str },
}

/// Returns the first key of `required` that `map` lacks, in declaration order.
pub fn first_missing<'k>(map: &Map<String, Value>, required: &[&'k str]) -> Option<&'k str> {
    required.iter().copied().find(|key| !map.contains_key(*key))
}

/// The required-key contract of one domain object type.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub entity: &'static str,
    pub required: &'static [&'static str],
}

impl Schema {
    pub const fn new(entity: &'static str, required: &'static [&'static str]) -> Self {
        Self { entity, required }
    }

    /// Checks that `raw` is an object holding every required key.
    pub fn check<'a>(&self, raw: &'a Value) -> Result<Fields<'a>, ValidationError> {
        let map = raw
            .as_object()
            .ok_or(ValidationError::NotAnObject { entity: self.entity })?;
        if let Some(field) = first_missing(map, self.required) {
            return Err(ValidationError::MissingField {
                entity: self.entity,
                field,
            });
        }
        Ok(Fields {
            entity: self.entity,
            map,
        })
    }
}

/// Typed read access to a mapping that already passed `Schema::check`.
#[derive(Debug, Clone, Copy)]
pub struct Fields<'a> {
    entity: &'static str,
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    pub fn value(&self, field: &'static str) -> Result<&'a Value, ValidationError> {
        self.map.get(field).ok_or(ValidationError::MissingField {
            entity: self.entity,
            field,
        })
    }

    pub fn string(&self, field: &'static str) -> Result<String, ValidationError> {
        self.value(field)?
            .as_str()
            .map(str::to_string)
            .ok_or(self.invalid(field, "string"))
    }

    pub fn integer(&self, field: &'static str) -> Result<i64, ValidationError> {
        self.value(field)?
            .as_i64()
            .ok_or(self.invalid(field, "integer"))
    }

    pub fn boolean(&self, field: &'static str) -> Result<bool, ValidationError> {
        self.value(field)?
            .as_bool()
            .ok_or(self.invalid(field, "boolean"))
    }

    pub fn strings(&self, field: &'static str) -> Result<Vec<String>, ValidationError> {
        let items = self
            .value(field)?
            .as_array()
            .ok_or(self.invalid(field, "list of strings"))?;
        items
            .iter()
            .map(|item| {
                item.as_str()
                    .map(str::to_string)
                    .ok_or(self.invalid(field, "list of strings"))
            })
            .collect()
    }

    pub fn invalid(&self, field: &'static str, expected: &'static str) -> ValidationError {
        ValidationError::InvalidField {
            entity: self.entity,
            field,
            expected,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const THING: Schema = Schema::new("Thing", &["alpha", "beta", "gamma"]);

    #[test]
    fn all_keys_present_passes() {
        let raw = json!({"alpha": "a", "beta": 2, "gamma": true});
        let fields = THING.check(&raw).unwrap();
        assert_eq!(fields.entity(), "Thing");
        assert_eq!(fields.string("alpha").unwrap(), "a");
        assert_eq!(fields.integer("beta").unwrap(), 2);
        assert!(fields.boolean("gamma").unwrap());
    }

    #[test]
    fn reports_first_missing_key_in_declaration_order() {
        let raw = json!({"alpha": "a"});
        let err = THING.check(&raw).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                entity: "Thing",
                field: "beta"
            }
        );
        assert_eq!(err.to_string(), "Cannot create a Thing with missing field: beta");
    }

    #[test]
    fn extra_keys_are_ignored() {
        let raw = json!({"alpha": 1, "beta": 2, "gamma": 3, "delta": 4});
        assert!(THING.check(&raw).is_ok());
    }

    #[test]
    fn null_counts_as_present() {
        let raw = json!({"alpha": null, "beta": null, "gamma": null});
        assert!(THING.check(&raw).is_ok());
    }

    #[test]
    fn non_object_is_rejected() {
        let err = THING.check(&json!(["alpha", "beta"])).unwrap_err();
        assert_eq!(err, ValidationError::NotAnObject { entity: "Thing" });
    }

    #[test]
    fn wrong_shape_names_the_field() {
        let raw = json!({"alpha": 1, "beta": "two", "gamma": "true"});
        let fields = THING.check(&raw).unwrap();
        assert_eq!(
            fields.string("alpha").unwrap_err().to_string(),
            "Cannot create a Thing with invalid field: alpha (expected string)"
        );
        assert!(matches!(
            fields.integer("beta"),
            Err(ValidationError::InvalidField { field: "beta", .. })
        ));
        assert!(matches!(
            fields.boolean("gamma"),
            Err(ValidationError::InvalidField { field: "gamma", .. })
        ));
    }

    #[test]
    fn strings_rejects_mixed_lists() {
        let raw = json!({"alpha": ["x", 1], "beta": [], "gamma": ["y", "z"]});
        let fields = THING.check(&raw).unwrap();
        assert!(fields.strings("alpha").is_err());
        assert!(fields.strings("beta").unwrap().is_empty());
        assert_eq!(fields.strings("gamma").unwrap(), vec!["y", "z"]);
    }

    #[test]
    fn first_missing_helper() {
        let map = json!({"version": 4, "id": "x"});
        let map = map.as_object().unwrap();
        assert_eq!(first_missing(map, &["version", "id", "ts", "type"]), Some("ts"));
        assert_eq!(first_missing(map, &["version"]), None);
    }

    #[test]
    fn container_shape_messages() {
        assert_eq!(
            ValidationError::ParticipantsNotAList.to_string(),
            "Participants field must be a list"
        );
        assert_eq!(
            ValidationError::CustomFieldsNotAMapping { scope: "waiver" }.to_string(),
            "Custom waiver fields must be a dictionary"
        );
    }
}
