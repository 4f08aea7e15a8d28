//! Explicit field-level partial updates.
//!
//! Partial updates are an explicit data structure rather than anything
//! reflective: a `FieldPatch` is an ordered mapping from field name to
//! replacement value, built from a source model's serde object map and
//! applied to a target of the same type. What counts as a model's fields
//! is therefore exactly its serde field names.
//!
//! Unknown field names follow an explicit [`UnknownFieldPolicy`]. The
//! default `Skip` reproduces the legacy behavior where a bad name is
//! silently ignored; `Reject` surfaces it as an error instead.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Result, ServiceError};

/// What to do with a field name the model type does not have.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownFieldPolicy {
    /// Ignore the name, change nothing, surface nothing.
    #[default]
    Skip,
    /// Fail the whole patch with `ServiceError::UnknownField`.
    Reject,
}

/// An ordered set of field replacements.
#[derive(Debug, Clone, Default)]
pub struct FieldPatch {
    entries: Vec<(String, Value)>,
}

impl FieldPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one replacement, last write winning at apply time.
    pub fn set(mut self, field: impl Into<String>, value: Value) -> Self {
        self.entries.push((field.into(), value));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Builds a patch copying the named fields out of `source`.
    ///
    /// The copied value may be null; naming a field always transfers
    /// whatever the source holds. Names the model type does not have are
    /// skipped or rejected per `policy`.
    pub fn from_named<M: Serialize>(
        source: &M,
        fields: &[&str],
        policy: UnknownFieldPolicy,
    ) -> Result<Self> {
        let map = object_map(source)?;
        let mut patch = FieldPatch::new();
        for &field in fields {
            match map.get(field) {
                Some(value) => patch = patch.set(field, value.clone()),
                None => match policy {
                    UnknownFieldPolicy::Skip => {}
                    UnknownFieldPolicy::Reject => {
                        return Err(ServiceError::UnknownField(field.to_string()))
                    }
                },
            }
        }
        Ok(patch)
    }

    /// Builds a patch copying every non-null field of `source`.
    ///
    /// A field is "not set" for merge purposes if and only if it
    /// serializes to null, which is how whole-model updates express
    /// partial-update-by-omission.
    pub fn from_non_null<M: Serialize>(source: &M) -> Result<Self> {
        let map = object_map(source)?;
        let mut patch = FieldPatch::new();
        for (field, value) in map {
            if !value.is_null() {
                patch = patch.set(field, value);
            }
        }
        Ok(patch)
    }

    /// Applies the patch to `current`, producing the merged model.
    pub fn apply<M: Serialize + DeserializeOwned>(&self, current: &M) -> Result<M> {
        let mut map = object_map(current)?;
        for (field, value) in &self.entries {
            map.insert(field.clone(), value.clone());
        }
        serde_json::from_value(Value::Object(map))
            .map_err(|e| ServiceError::Serialization(e.to_string()))
    }
}

fn object_map<M: Serialize>(model: &M) -> Result<Map<String, Value>> {
    match serde_json::to_value(model) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ServiceError::Serialization(
            "model did not serialize to an object".to_string(),
        )),
        Err(e) => Err(ServiceError::Serialization(e.to_string())),
    }
}
