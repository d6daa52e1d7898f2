//! Record shapes accepted by the JSON transform.
//!
//! A JSON upload is an array of [`PersonEnvelope`]s, each wrapping one [`PersonRecord`] under the
//! `data` key. Field names serialize as camelCase; the PascalCase spelling (`Name`,
//! `CityLocation`, ...) is accepted on input as well.

use serde::{Deserialize, Serialize};

/// One person entry.
///
/// `age` defaults to `0` when absent; an explicit JSON `null` is a type error. Every other field is
/// an optional string and is omitted from output when absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonRecord {
    #[serde(default, alias = "Name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "Age")]
    pub age: i64,
    #[serde(default, alias = "Rank", skip_serializing_if = "Option::is_none")]
    pub rank: Option<String>,
    #[serde(default, alias = "Tenure", skip_serializing_if = "Option::is_none")]
    pub tenure: Option<String>,
    #[serde(default, alias = "CityLocation", skip_serializing_if = "Option::is_none")]
    pub city_location: Option<String>,
    #[serde(default, alias = "Position", skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(default, alias = "Department", skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, alias = "Team", skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
}

impl PersonRecord {
    /// Create a record with only `name` and `age` set.
    pub fn new(name: impl Into<String>, age: i64) -> Self {
        Self {
            name: Some(name.into()),
            age,
            ..Default::default()
        }
    }
}

/// Wrapper pairing a [`PersonRecord`] with the fixed `data` key.
///
/// The key is also accepted as `Data`. `data` is `None` when the key is absent or `null`; such
/// envelopes never match a filter.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonEnvelope {
    #[serde(default, alias = "Data")]
    pub data: Option<PersonRecord>,
}

impl PersonEnvelope {
    /// Wrap a record.
    pub fn new(data: PersonRecord) -> Self {
        Self { data: Some(data) }
    }
}

#[cfg(test)]
mod tests {
    use super::{PersonEnvelope, PersonRecord};

    #[test]
    fn deserializes_camel_and_pascal_case() {
        let camel: PersonEnvelope =
            serde_json::from_str(r#"{"data":{"name":"Ada","age":36,"cityLocation":"London"}}"#).unwrap();
        let pascal: PersonEnvelope =
            serde_json::from_str(r#"{"data":{"Name":"Ada","Age":36,"CityLocation":"London"}}"#).unwrap();

        assert_eq!(camel, pascal);
        let rec = camel.data.unwrap();
        assert_eq!(rec.name.as_deref(), Some("Ada"));
        assert_eq!(rec.age, 36);
        assert_eq!(rec.city_location.as_deref(), Some("London"));
    }

    #[test]
    fn absent_age_defaults_to_zero() {
        let env: PersonEnvelope = serde_json::from_str(r#"{"data":{"name":"Ada"}}"#).unwrap();
        assert_eq!(env.data.unwrap().age, 0);
    }

    #[test]
    fn null_age_is_rejected() {
        let err = serde_json::from_str::<PersonEnvelope>(r#"{"data":{"name":"Ada","age":null}}"#)
            .unwrap_err();
        assert!(err.is_data());
    }

    #[test]
    fn missing_or_null_data_is_none() {
        let missing: PersonEnvelope = serde_json::from_str("{}").unwrap();
        let null: PersonEnvelope = serde_json::from_str(r#"{"data":null}"#).unwrap();
        assert!(missing.data.is_none());
        assert!(null.data.is_none());
    }

    #[test]
    fn envelope_key_accepts_pascal_case() {
        let env: PersonEnvelope = serde_json::from_str(r#"{"Data":{"Name":"Ada","Age":36}}"#).unwrap();
        assert_eq!(env, PersonEnvelope::new(PersonRecord::new("Ada", 36)));
    }

    #[test]
    fn serializes_camel_case_and_omits_absent_fields() {
        let mut rec = PersonRecord::new("John", 40);
        rec.city_location = Some("Austin".to_string());
        let out = serde_json::to_string(&PersonEnvelope::new(rec)).unwrap();
        assert_eq!(out, r#"{"data":{"name":"John","age":40,"cityLocation":"Austin"}}"#);
    }
}
