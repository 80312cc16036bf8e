//! Data bound into fragment placeholders.
//!
//! A [`DataRecord`] maps placeholder names to scalar text or to a list of
//! nested records (for `{{#key}}...{{/key}}` blocks). Records are built from
//! JSON at the input boundary and rejected there when their shape cannot be
//! rendered:
//!
//! | JSON                     | Value                                   |
//! |--------------------------|-----------------------------------------|
//! | string / number / bool   | `Text`                                  |
//! | `null`                   | `Null` (renders as empty string)        |
//! | array of objects         | `List` (items may not contain arrays)   |
//! | object                   | flattened into dotted keys (`a.b`)      |
//! | anything else            | [`RecordError`]                         |

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;
use thiserror::Error;

/// Reasons a JSON value cannot become a [`DataRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("data record must be a JSON object")]
    NotAnObject,

    #[error("`{0}` is a list nested inside a repeated block")]
    NestedList(String),

    #[error("list `{0}` must only contain objects")]
    ScalarListItem(String),
}

/// A single placeholder value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Text(String),
    List(Vec<DataRecord>),
}

impl Value {
    /// Text for scalar placeholders; `None` for lists.
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            Self::Null => Some(""),
            Self::Text(text) => Some(text),
            Self::List(_) => None,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Self::Text(text.to_owned())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<Vec<DataRecord>> for Value {
    fn from(items: Vec<DataRecord>) -> Self {
        Self::List(items)
    }
}

/// Placeholder name to value mapping, ordered by key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataRecord(BTreeMap<String, Value>);

impl DataRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Scalar lookup, `None` when absent or bound to a list.
    pub fn scalar(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_scalar)
    }

    /// Build a record from a JSON object.
    ///
    /// `allow_lists` is false for items of a repeated block, since blocks
    /// do not nest.
    fn from_object(object: Map<String, Json>, allow_lists: bool) -> Result<Self, RecordError> {
        let mut record = Self::new();
        for (key, value) in object {
            record.absorb(key, value, allow_lists)?;
        }
        Ok(record)
    }

    fn absorb(&mut self, key: String, value: Json, allow_lists: bool) -> Result<(), RecordError> {
        let value = match value {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Text(b.to_string()),
            Json::Number(n) => Value::Text(n.to_string()),
            Json::String(s) => Value::Text(s),
            Json::Array(_) if !allow_lists => return Err(RecordError::NestedList(key)),
            Json::Array(items) => {
                let items = items
                    .into_iter()
                    .map(|item| match item {
                        Json::Object(object) => Self::from_object(object, false),
                        _ => Err(RecordError::ScalarListItem(key.clone())),
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Value::List(items)
            }
            Json::Object(object) => {
                for (sub_key, sub_value) in object {
                    self.absorb(format!("{key}.{sub_key}"), sub_value, allow_lists)?;
                }
                return Ok(());
            }
        };
        self.0.insert(key, value);
        Ok(())
    }
}

impl TryFrom<Json> for DataRecord {
    type Error = RecordError;

    fn try_from(value: Json) -> Result<Self, Self::Error> {
        match value {
            Json::Object(object) => Self::from_object(object, true),
            _ => Err(RecordError::NotAnObject),
        }
    }
}

impl Serialize for DataRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for DataRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Json::deserialize(deserializer)?;
        Self::try_from(value).map_err(serde::de::Error::custom)
    }
}
