//! Property bag carried by bodies and agent memories
//!
//! Keys follow the `<name>`, `<name>-min`, `<name>-max` convention. The bag
//! itself never enforces bounds; writers clamp through [`Properties::clamp`]
//! or [`Properties::set_bounded`] before committing a change.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::types::BodyId;

pub const SUFFIX_MIN: &str = "-min";
pub const SUFFIX_MAX: &str = "-max";

/// Reserved memory key holding the body an agent is pursuing
pub const TARGET: &str = "target";

/// Known properties plus an open slot for ad hoc ones
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Health,
    Feed,
    Named(String),
}

impl Property {
    pub fn key(&self) -> &str {
        match self {
            Property::Health => "health",
            Property::Feed => "feed",
            Property::Named(name) => name,
        }
    }

    pub fn min_key(&self) -> String {
        format!("{}{}", self.key(), SUFFIX_MIN)
    }

    pub fn max_key(&self) -> String {
        format!("{}{}", self.key(), SUFFIX_MAX)
    }
}

impl From<&str> for Property {
    fn from(key: &str) -> Self {
        match key {
            "health" => Property::Health,
            "feed" => Property::Feed,
            other => Property::Named(other.to_string()),
        }
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A stored value; body references serialize as `{"body": <id>}` so they
/// never collide with text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Int(i64),
    Float(f64),
    Body(#[serde(with = "body_ref")] BodyId),
    Text(String),
}

mod body_ref {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use crate::core::types::BodyId;

    #[derive(Serialize, Deserialize)]
    #[serde(deny_unknown_fields)]
    struct BodyRef {
        body: BodyId,
    }

    pub fn serialize<S: Serializer>(id: &BodyId, serializer: S) -> Result<S::Ok, S::Error> {
        BodyRef { body: *id }.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BodyId, D::Error> {
        BodyRef::deserialize(deserializer).map(|r| r.body)
    }
}

impl PropertyValue {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(v) => Some(*v),
            PropertyValue::Int(v) => Some(*v as f64),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_body(&self) -> Option<BodyId> {
        match self {
            PropertyValue::Body(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<i64> for PropertyValue {
    fn from(v: i64) -> Self {
        PropertyValue::Int(v)
    }
}

impl From<i32> for PropertyValue {
    fn from(v: i32) -> Self {
        PropertyValue::Int(i64::from(v))
    }
}

impl From<f64> for PropertyValue {
    fn from(v: f64) -> Self {
        PropertyValue::Float(v)
    }
}

impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::Text(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::Text(s.to_string())
    }
}

impl From<BodyId> for PropertyValue {
    fn from(id: BodyId) -> Self {
        PropertyValue::Body(id)
    }
}

/// Inclusive bounds declared through `-min` / `-max` keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Bounds {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl Bounds {
    pub fn clamp(&self, value: i64) -> i64 {
        let value = self.max.map_or(value, |max| value.min(max));
        self.min.map_or(value, |min| value.max(min))
    }
}

/// How an influence rewrites a property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PropertyChange {
    Set(i64),
    Add(i64),
}

impl PropertyChange {
    /// Value after applying this change to `current` (missing counts as 0)
    pub fn resolve(&self, current: Option<i64>) -> i64 {
        match *self {
            PropertyChange::Set(v) => v,
            PropertyChange::Add(delta) => current.unwrap_or(0).saturating_add(delta),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Properties {
    values: BTreeMap<String, PropertyValue>,
}

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.values.get(key)
    }

    /// Upsert, returning the previous value
    pub fn set(&mut self, key: &str, value: impl Into<PropertyValue>) -> Option<PropertyValue> {
        self.values.insert(key.to_string(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<PropertyValue> {
        self.values.remove(key)
    }

    pub fn int(&self, property: &Property) -> Option<i64> {
        self.get(property.key()).and_then(PropertyValue::as_int)
    }

    pub fn bounds(&self, property: &Property) -> Bounds {
        Bounds {
            min: self.get(&property.min_key()).and_then(PropertyValue::as_int),
            max: self.get(&property.max_key()).and_then(PropertyValue::as_int),
        }
    }

    pub fn clamp(&self, property: &Property, value: i64) -> i64 {
        self.bounds(property).clamp(value)
    }

    /// Declare a property together with its bounds
    pub fn set_bounded(&mut self, property: &Property, value: i64, min: i64, max: i64) {
        self.set(&property.min_key(), min);
        self.set(&property.max_key(), max);
        self.set(property.key(), value);
    }

    /// True when the property is declared and sits at (or under) its minimum
    pub fn is_depleted(&self, property: &Property) -> bool {
        match (self.int(property), self.bounds(property).min) {
            (Some(value), Some(min)) => value <= min,
            _ => false,
        }
    }

    /// Body stored under the reserved `target` key
    pub fn target(&self) -> Option<BodyId> {
        self.get(TARGET).and_then(PropertyValue::as_body)
    }

    pub fn set_target(&mut self, target: Option<BodyId>) {
        match target {
            Some(body) => {
                self.set(TARGET, body);
            }
            None => {
                self.remove(TARGET);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
