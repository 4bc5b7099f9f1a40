//! Content fingerprints for panelist records.
//!
//! A fingerprint is the hex SHA-256 of the record's JSON serialization. In
//! [`FingerprintMode::Ordered`] the serialization keeps the upstream field
//! order, so the same data in a different key order hashes differently.
//! [`FingerprintMode::Canonical`] sorts object keys recursively first.

use std::fmt;
use std::str::FromStr;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use panelwatch_proto::Panelist;

use crate::error::Error;

/// How a record is serialized before hashing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FingerprintMode {
    /// Hash the record exactly as received, field order included.
    #[default]
    Ordered,
    /// Sort object keys at every level before hashing.
    Canonical,
}

impl FingerprintMode {
    /// Name used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            FingerprintMode::Ordered => "ordered",
            FingerprintMode::Canonical => "canonical",
        }
    }
}

impl fmt::Display for FingerprintMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FingerprintMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ordered" => Ok(FingerprintMode::Ordered),
            "canonical" => Ok(FingerprintMode::Canonical),
            other => Err(format!(
                "unknown fingerprint mode '{}', expected 'ordered' or 'canonical'",
                other
            )),
        }
    }
}

/// Compute the fingerprint of a panelist record.
pub fn fingerprint(panelist: &Panelist, mode: FingerprintMode) -> Result<String, Error> {
    let bytes = match mode {
        FingerprintMode::Ordered => serde_json::to_vec(panelist),
        FingerprintMode::Canonical => {
            serde_json::to_vec(&canonicalize(&Value::Object(panelist.fields().clone())))
        }
    }
    .map_err(|e| Error::Serialization(e.to_string()))?;

    Ok(hash_bytes(&bytes))
}

/// Hex SHA-256 of a byte string.
pub fn hash_bytes(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

/// Rebuild a JSON value with every object's keys in ascending order.
fn canonicalize(value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            let mut sorted = Map::new();
            for key in keys {
                sorted.insert(key.clone(), canonicalize(&map[key]));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.iter().map(canonicalize).collect()),
        other => other.clone(),
    }
}
