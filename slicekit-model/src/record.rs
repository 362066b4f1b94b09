use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use slicekit_types::{Config, EntityKey, Error, Keyed, Result};

/// A JSON-object entity.
///
/// The payload is always an object, so top-level fields can hold both the
/// caller's data and the key an index assigns.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "Value", into = "Value")]
pub struct Record {
    data: Map<String, Value>,
}

impl Record {
    /// An empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(data) => Ok(Self { data }),
            other => Err(Error::NotAnObject(type_name(&other).to_string())),
        }
    }

    /// Parses a record from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(json)?)
    }

    /// Builder form of [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, field: &str, value: impl Into<Value>) -> Self {
        self.set(field, value);
        self
    }

    /// Sets a top-level field, replacing any previous value.
    pub fn set(&mut self, field: &str, value: impl Into<Value>) {
        self.data.insert(field.to_string(), value.into());
    }

    /// Removes a top-level field and returns its value.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.data.remove(field)
    }

    /// A top-level field.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.data.get(field)
    }

    /// Extract a string value using a JSON pointer (e.g., "/title").
    pub fn get_str(&self, pointer: &str) -> Option<&str> {
        self.pointer(pointer).and_then(|v| v.as_str())
    }

    /// Extract a boolean value using a JSON pointer.
    pub fn get_bool(&self, pointer: &str) -> Option<bool> {
        self.pointer(pointer).and_then(|v| v.as_bool())
    }

    /// Extract a numeric value using a JSON pointer.
    pub fn get_number(&self, pointer: &str) -> Option<f64> {
        self.pointer(pointer).and_then(|v| v.as_f64())
    }

    /// The caller-owned identifier stored under `config.id_key`, if any.
    pub fn id(&self, config: &Config) -> Option<&Value> {
        self.data.get(&config.id_key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.data
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.data)
    }

    fn pointer(&self, pointer: &str) -> Option<&Value> {
        let rest = pointer.strip_prefix('/')?;
        let (head, tail) = match rest.find('/') {
            Some(idx) => (&rest[..idx], &rest[idx..]),
            None => (rest, ""),
        };
        let head = head.replace("~1", "/").replace("~0", "~");
        let value = self.data.get(&head)?;
        if tail.is_empty() {
            Some(value)
        } else {
            value.pointer(tail)
        }
    }
}

impl Keyed for Record {
    fn key(&self, field: &str) -> Option<EntityKey> {
        self.data
            .get(field)
            .and_then(Value::as_str)
            .and_then(|s| EntityKey::parse(s).ok())
    }

    fn set_key(&mut self, field: &str, key: EntityKey) {
        self.data
            .insert(field.to_string(), Value::String(key.as_str().to_string()));
    }
}

impl TryFrom<Value> for Record {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        record.into_value()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
