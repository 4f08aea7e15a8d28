//! Wire-level record representation.
//!
//! A `Record` is a named-field property bag. The two-part composite
//! identity lives inside the bag itself, under the reserved property names
//! `PartitionKey` and `RowKey`, so that a record round-trips through the
//! backend without a parallel key structure. Backends additionally stamp
//! an opaque etag and a timestamp on every write; both ride outside the
//! bag and never participate in filter evaluation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Reserved property name holding the partition key.
pub const PARTITION_KEY: &str = "PartitionKey";

/// Reserved property name holding the row key.
pub const ROW_KEY: &str = "RowKey";

/// A single stored record: property bag plus backend bookkeeping.
///
/// Within a partition the row key is unique. A row key alone is unique
/// only if the caller guarantees global row-key uniqueness across
/// partitions; nothing in GridTable enforces that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    properties: Map<String, Value>,

    /// Opaque version tag assigned by the backend on every write.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    etag: Option<String>,

    /// Last-write time in epoch milliseconds, assigned by the backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    timestamp: Option<u64>,
}

impl Record {
    /// Creates a record carrying only its composite identity.
    pub fn new(partition_key: impl Into<String>, row_key: impl Into<String>) -> Self {
        let mut properties = Map::new();
        properties.insert(PARTITION_KEY.to_string(), Value::String(partition_key.into()));
        properties.insert(ROW_KEY.to_string(), Value::String(row_key.into()));
        Self {
            properties,
            etag: None,
            timestamp: None,
        }
    }

    /// Wraps an existing property map. The map is taken as-is; identity
    /// properties are whatever the map contains.
    pub fn from_properties(properties: Map<String, Value>) -> Self {
        Self {
            properties,
            etag: None,
            timestamp: None,
        }
    }

    pub fn partition_key(&self) -> Option<&str> {
        self.properties.get(PARTITION_KEY).and_then(Value::as_str)
    }

    pub fn row_key(&self) -> Option<&str> {
        self.properties.get(ROW_KEY).and_then(Value::as_str)
    }

    /// Returns the composite identity when both keys are present.
    pub fn key(&self) -> Option<(&str, &str)> {
        match (self.partition_key(), self.row_key()) {
            (Some(pk), Some(rk)) => Some((pk, rk)),
            _ => None,
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Sets a property, replacing any previous value.
    pub fn set(&mut self, name: impl Into<String>, value: Value) -> &mut Self {
        self.properties.insert(name.into(), value);
        self
    }

    pub fn properties(&self) -> &Map<String, Value> {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut Map<String, Value> {
        &mut self.properties
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    pub fn set_etag(&mut self, etag: impl Into<String>) {
        self.etag = Some(etag.into());
    }

    pub fn timestamp(&self) -> Option<u64> {
        self.timestamp
    }

    pub fn set_timestamp(&mut self, millis: u64) {
        self.timestamp = Some(millis);
    }
}
