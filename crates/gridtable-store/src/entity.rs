//! Typed entity binding for table records.
//!
//! An entity type is a serde struct whose serialized object map is the
//! record's property bag, including the reserved `PartitionKey` and
//! `RowKey` properties. The trait names the backend table the type lives
//! in and exposes the identity for dispatching point lookups; record
//! conversion is provided through serde and can be overridden when a type
//! needs a different wire shape.
//!
//! ## Example
//!
//! ```rust,ignore
//! use gridtable_store::TableEntity;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! #[serde(rename_all = "PascalCase")]
//! struct Customer {
//!     partition_key: Option<String>,
//!     row_key: Option<String>,
//!     name: Option<String>,
//! }
//!
//! impl TableEntity for Customer {
//!     const TABLE: &'static str = "customers";
//!
//!     fn partition_key(&self) -> Option<&str> {
//!         self.partition_key.as_deref()
//!     }
//!
//!     fn row_key(&self) -> Option<&str> {
//!         self.row_key.as_deref()
//!     }
//! }
//! ```

use gridtable_commons::Record;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::backend::{Result, StoreError};

/// A typed view over records of one backend table.
pub trait TableEntity: Serialize + DeserializeOwned + Send + Sync + Sized + 'static {
    /// Backend table this entity type is stored in.
    const TABLE: &'static str;

    /// Partition key, when set on this instance.
    fn partition_key(&self) -> Option<&str>;

    /// Row key, when set on this instance.
    fn row_key(&self) -> Option<&str>;

    /// Serializes the entity into a record property bag.
    ///
    /// The default goes through the serde object map; types with a
    /// non-JSON-object representation must override it.
    fn to_record(&self) -> Result<Record> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => Ok(Record::from_properties(map)),
            Ok(_) => Err(StoreError::Serialization(format!(
                "entity for table {} did not serialize to an object",
                Self::TABLE
            ))),
            Err(e) => Err(StoreError::Serialization(e.to_string())),
        }
    }

    /// Rebuilds the entity from a record property bag.
    fn from_record(record: &Record) -> Result<Self> {
        serde_json::from_value(Value::Object(record.properties().clone()))
            .map_err(|e| StoreError::Serialization(e.to_string()))
    }
}
