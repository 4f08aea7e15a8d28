//! Model binding for the record service.
//!
//! A model is the domain-shaped projection of an entity. Every model type
//! converts losslessly to and from exactly one entity type; both sides
//! are plain values with no shared state, built ephemerally around a
//! store operation and never persisted themselves.

use gridtable_store::TableEntity;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Domain model stored through one entity type.
///
/// The serde bounds exist for the field-patch machinery: partial updates
/// work on the model's serialized object map, so a model's field names
/// for patching purposes are its serde names.
pub trait TableModel: Serialize + DeserializeOwned + Send + Sync + Sized + 'static {
    type Entity: TableEntity;

    /// Partition key, when set on this instance.
    fn partition_key(&self) -> Option<&str>;

    /// Row key, when set on this instance.
    fn row_key(&self) -> Option<&str>;

    /// Converts this model into its entity shape.
    fn to_entity(&self) -> Self::Entity;

    /// Rebuilds the model from its entity shape.
    fn from_entity(entity: Self::Entity) -> Self;

    /// Explicit `(field, value)` pairs for query-by-example: one pair per
    /// field this instance considers set, in declaration order, with
    /// values rendered as filter strings.
    ///
    /// The default participates in nothing; override it on models used
    /// with `get_by_example`. Identity keys do not belong here, the
    /// service scopes the scan to the sample's partition key itself.
    fn example_pairs(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}
