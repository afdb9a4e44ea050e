/// Resource manifest - the JSON document describing one asset on disk
///
/// Every asset file consumed by the cache is a JSON document with at minimum
/// a `"type"` string field naming the registered loader that applies; all
/// other fields are loader-specific and opaque to the cache itself.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Parsed resource manifest
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Declared resource type, selects the loader
    #[serde(rename = "type")]
    pub resource_type: String,

    /// All remaining fields, interpreted by the loader
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Manifest {
    /// Parse a manifest from JSON text.
    ///
    /// Fails with [`Error::ResourceParse`] when the document is malformed or
    /// the `"type"` field is missing.
    pub fn parse(path: &str, text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| Error::ResourceParse(format!("{}: {}", path, e)))
    }

    /// Required string field
    pub fn str_field(&self, name: &str) -> Result<&str> {
        self.fields
            .get(name)
            .and_then(Value::as_str)
            .ok_or_else(|| self.missing(name, "string"))
    }

    /// Required unsigned integer field
    pub fn u32_field(&self, name: &str) -> Result<u32> {
        self.fields
            .get(name)
            .and_then(Value::as_u64)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| self.missing(name, "u32"))
    }

    /// Required array of floats (vertex data)
    pub fn f32_array(&self, name: &str) -> Result<Vec<f32>> {
        self.array(name)?
            .iter()
            .map(|v| v.as_f64().map(|f| f as f32))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| self.missing(name, "array of numbers"))
    }

    /// Required array of 16-bit indices
    pub fn u16_array(&self, name: &str) -> Result<Vec<u16>> {
        self.array(name)?
            .iter()
            .map(|v| v.as_u64().and_then(|u| u16::try_from(u).ok()))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| self.missing(name, "array of u16"))
    }

    fn array(&self, name: &str) -> Result<&Vec<Value>> {
        self.fields
            .get(name)
            .and_then(Value::as_array)
            .ok_or_else(|| self.missing(name, "array"))
    }

    fn missing(&self, name: &str, expected: &str) -> Error {
        Error::ResourceParse(format!(
            "'{}' manifest is missing {} field '{}'",
            self.resource_type, expected, name
        ))
    }
}
