//! Closed-schema editable models and server-record reconciliation.
//!
//! # Design
//! A `ResourceModel` is created from a fixed list of `FieldSpec`s and its key
//! set never changes afterwards: `set` refuses unknown keys and `reconcile`
//! walks the model's own field list, so keys the server sends that the form
//! does not know about are simply never looked at.
//!
//! Reconciliation is shallow. A nested JSON value replaces the field
//! wholesale; it is not merged key by key.

use serde_json::{Map, Value};
use tracing::debug;

/// The shape a field starts out with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    List,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::Text,
        }
    }

    pub const fn list(name: &'static str) -> Self {
        Self {
            name,
            kind: FieldKind::List,
        }
    }
}

/// A value the form layer can bind to. There is no null.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Nested(Value),
}

impl FieldValue {
    fn empty(kind: FieldKind) -> Self {
        match kind {
            FieldKind::Text => FieldValue::Text(String::new()),
            FieldKind::List => FieldValue::List(Vec::new()),
        }
    }

    /// Convert a server value: `null` becomes an empty string, everything
    /// else is kept as sent.
    pub fn from_server(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Text(String::new()),
            Value::String(text) => FieldValue::Text(text.clone()),
            Value::Array(items) if items.iter().all(Value::is_string) => FieldValue::List(
                items
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect(),
            ),
            other => FieldValue::Nested(other.clone()),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            FieldValue::Text(text) => Value::String(text.clone()),
            FieldValue::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
            FieldValue::Nested(value) => value.clone(),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(text: &str) -> Self {
        FieldValue::Text(text.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(text: String) -> Self {
        FieldValue::Text(text)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        FieldValue::List(items)
    }
}

/// An editable record with a key set fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceModel {
    fields: Vec<(&'static str, FieldValue)>,
}

impl ResourceModel {
    /// A repeated field name keeps its first spec.
    pub fn new(schema: &[FieldSpec]) -> Self {
        let mut fields: Vec<(&'static str, FieldValue)> = Vec::with_capacity(schema.len());
        for spec in schema {
            if !fields.iter().any(|(name, _)| *name == spec.name) {
                fields.push((spec.name, FieldValue::empty(spec.kind)));
            }
        }
        Self { fields }
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields.iter().map(|(name, _)| *name)
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, value)| value)
    }

    /// The field as text, or `""` when it is missing or not text.
    pub fn text(&self, name: &str) -> &str {
        self.get(name).and_then(FieldValue::as_text).unwrap_or_default()
    }

    /// Replace a field's value. Returns `false` for keys outside the schema.
    pub fn set(&mut self, name: &str, value: impl Into<FieldValue>) -> bool {
        match self.fields.iter_mut().find(|(field, _)| *field == name) {
            Some((_, slot)) => {
                *slot = value.into();
                true
            }
            None => false,
        }
    }

    /// Merge a server record into the model and return how many fields were
    /// taken from it. Non-object records apply nothing.
    pub fn reconcile(&mut self, record: &Value) -> usize {
        let Some(record) = record.as_object() else {
            return 0;
        };

        let mut applied = 0;
        for (name, slot) in &mut self.fields {
            if let Some(value) = record.get(*name) {
                *slot = FieldValue::from_server(value);
                applied += 1;
            }
        }
        debug!(applied, ignored = record.len().saturating_sub(applied), "record reconciled");
        applied
    }

    /// The model as a JSON object, in schema order.
    pub fn to_payload(&self) -> Map<String, Value> {
        self.fields
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_json()))
            .collect()
    }
}
