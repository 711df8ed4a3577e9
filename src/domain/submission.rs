use std::collections::HashMap;

use serde_json::Value;

const EMAIL_FIELD: &str = "email";
const FIRST_NAME_FIELD: &str = "firstname";
const LAST_NAME_FIELD: &str = "lastname";
const WEBINAR_FIELD: &str = "webinar";
const UTM_SOURCE_FIELD: &str = "utm_bmcr_source";

/// A submitted value that must be present for BigMarker to accept the subscriber.
#[derive(Debug, Clone, PartialEq)]
pub struct RequiredField(String);

impl RequiredField {
    /// Returns `None` for empty or whitespace-only input.
    pub fn parse(s: &str) -> Option<RequiredField> {
        if s.trim().is_empty() {
            None
        } else {
            Some(Self(s.to_string()))
        }
    }
}

impl AsRef<str> for RequiredField {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub email: RequiredField,
    pub first_name: RequiredField,
    pub last_name: RequiredField,
}

/// Normalized form submission: field id to submitted value.
///
/// Form builders post fields either as plain values or as objects carrying
/// a `value` key next to field metadata; both shapes collapse to the value.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize)]
#[serde(from = "HashMap<String, Value>")]
pub struct Submission {
    fields: HashMap<String, String>,
}

impl Submission {
    /// Returns the submitted value for `field`, treating blank values as absent.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields
            .get(field)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    /// The identity BigMarker needs, checked in order email, first name, last name.
    pub fn identity(&self) -> Option<Identity> {
        let email = RequiredField::parse(self.get(EMAIL_FIELD)?)?;
        let first_name = RequiredField::parse(self.get(FIRST_NAME_FIELD)?)?;
        let last_name = RequiredField::parse(self.get(LAST_NAME_FIELD)?)?;
        Some(Identity {
            email,
            first_name,
            last_name,
        })
    }

    pub fn webinar(&self) -> Option<&str> {
        self.get(WEBINAR_FIELD)
    }

    pub fn utm_source(&self) -> Option<&str> {
        self.get(UTM_SOURCE_FIELD)
    }
}

impl From<HashMap<String, Value>> for Submission {
    fn from(raw_fields: HashMap<String, Value>) -> Self {
        let fields = raw_fields
            .into_iter()
            .filter_map(|(id, raw)| {
                let value = match raw {
                    Value::Object(mut field) => field.remove("value").and_then(field_text),
                    other => field_text(other),
                };
                value.map(|value| (id, value))
            })
            .collect();
        Self { fields }
    }
}

impl<K, V> FromIterator<(K, V)> for Submission
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(id, value)| (id.into(), value.into()))
                .collect(),
        }
    }
}

fn field_text(value: Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}
