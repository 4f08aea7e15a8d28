//! Model-oriented record service.
//!
//! `RecordService<M>` is the facade callers talk to in domain terms. It
//! converts between models and entities around a [`TableClient`], applies
//! field-level partial updates through [`FieldPatch`], and reports every
//! outcome through the closed [`StatusCode`] vocabulary. Lookup failures
//! inside mutating operations read as "absent", matching the legacy
//! behavior where the lookup itself swallowed backend errors; the log
//! carries the distinction.

use gridtable_commons::PageResponse;
use gridtable_store::{Filter, TableBackend, TableClient};
use std::sync::Arc;

use crate::model::TableModel;
use crate::patch::{FieldPatch, UnknownFieldPolicy};
use crate::status::StatusCode;

pub struct RecordService<M: TableModel> {
    client: TableClient<M::Entity>,
    unknown_fields: UnknownFieldPolicy,
}

impl<M: TableModel> RecordService<M> {
    /// Builds a service over the model's own table.
    pub fn new(backend: Arc<dyn TableBackend>) -> gridtable_store::Result<Self> {
        Ok(Self::with_client(TableClient::new(backend)?))
    }

    pub fn with_client(client: TableClient<M::Entity>) -> Self {
        Self {
            client,
            unknown_fields: UnknownFieldPolicy::default(),
        }
    }

    /// Sets the policy for unknown field names in `update_fields`.
    pub fn unknown_field_policy(mut self, policy: UnknownFieldPolicy) -> Self {
        self.unknown_fields = policy;
        self
    }

    pub fn client(&self) -> &TableClient<M::Entity> {
        &self.client
    }

    /// Inserts a new record, refusing to overwrite an existing identity.
    ///
    /// The existence check and the write are two separate backend calls;
    /// a concurrent insert between them can still produce a duplicate.
    /// That race is inherited behavior, not a guarantee.
    pub fn insert(&self, model: &M) -> StatusCode {
        if self.lookup_current(model).is_some() {
            return StatusCode::Conflict;
        }
        match self.client.upsert_replace(&model.to_entity()) {
            Ok(()) => StatusCode::Created,
            Err(e) => {
                log::error!("insert failed: {e}");
                StatusCode::InternalServerError
            }
        }
    }

    /// Copies the named fields from `model` onto the stored record.
    ///
    /// Fields keep whatever value the input holds, null included. Names
    /// the model type does not have follow the configured
    /// [`UnknownFieldPolicy`]; the default skips them silently.
    pub fn update_fields(&self, model: &M, fields: &[&str]) -> StatusCode {
        let Some(current) = self.lookup_current(model) else {
            return StatusCode::NotFound;
        };
        let patch = match FieldPatch::from_named(model, fields, self.unknown_fields) {
            Ok(patch) => patch,
            Err(e) => {
                log::error!("field patch rejected: {e}");
                return StatusCode::InternalServerError;
            }
        };
        self.replace_merged(current, patch)
    }

    /// Copies every non-null field from `model` onto the stored record.
    /// Null fields are "not set" and leave the stored values alone.
    pub fn update_whole(&self, model: &M) -> StatusCode {
        let Some(current) = self.lookup_current(model) else {
            return StatusCode::NotFound;
        };
        let patch = match FieldPatch::from_non_null(model) {
            Ok(patch) => patch,
            Err(e) => {
                log::error!("field patch rejected: {e}");
                return StatusCode::InternalServerError;
            }
        };
        self.replace_merged(current, patch)
    }

    fn replace_merged(&self, current: M::Entity, patch: FieldPatch) -> StatusCode {
        let merged = match patch.apply(&M::from_entity(current)) {
            Ok(merged) => merged,
            Err(e) => {
                log::error!("field patch failed to apply: {e}");
                return StatusCode::InternalServerError;
            }
        };
        match self.client.upsert_replace(&merged.to_entity()) {
            Ok(()) => StatusCode::Ok,
            Err(e) => {
                log::error!("update write-back failed: {e}");
                StatusCode::InternalServerError
            }
        }
    }

    /// Deletes the record with the model's identity.
    pub fn remove(&self, model: &M) -> StatusCode {
        let Some(current) = self.lookup_current(model) else {
            return StatusCode::NotFound;
        };
        match self.client.delete(&current) {
            Ok(Some(_)) => StatusCode::Ok,
            Ok(None) => StatusCode::InternalServerError,
            Err(e) => {
                log::error!("delete failed: {e}");
                StatusCode::InternalServerError
            }
        }
    }

    /// Fetches the model by whichever identity parts it carries: both
    /// keys run a point lookup, a lone row key runs the row-key scan.
    pub fn get(&self, model: &M) -> Option<M> {
        let result = match (model.partition_key(), model.row_key()) {
            (Some(pk), Some(rk)) => self.client.get(pk, rk),
            (None, Some(rk)) => self.client.get_by_row_key(rk),
            _ => return None,
        };
        match result {
            Ok(entity) => entity.map(M::from_entity),
            Err(e) => {
                log::error!("get failed: {e}");
                None
            }
        }
    }

    /// Query by example: one equality filter per set field of `sample`,
    /// scoped to the sample's partition key.
    ///
    /// Field names are normalized to the backend's property naming by
    /// capitalizing the first letter. Never returns null; failures log
    /// and come back empty.
    pub fn get_by_example(&self, sample: &M) -> Vec<M> {
        let filters = sample
            .example_pairs()
            .into_iter()
            .map(|(field, value)| Some(Filter::equal(capitalize(field), value)));
        self.get_all(sample.partition_key(), Filter::combine(filters))
    }

    /// Filtered full scan, converted to models. Empty on failure.
    pub fn get_all(&self, partition_key: Option<&str>, conditions: Option<Filter>) -> Vec<M> {
        match self.client.query(partition_key, conditions) {
            Ok(entities) => entities.into_iter().map(M::from_entity).collect(),
            Err(e) => {
                log::error!("query failed: {e}");
                Vec::new()
            }
        }
    }

    /// One page of the filtered scan, converted to models.
    ///
    /// Failures below the conversion step surface as the empty
    /// failure-shaped page, so the `None` arm is practically vestigial.
    /// The `Option` stays in the signature for contract compatibility.
    pub fn get_page(
        &self,
        rows_per_page: usize,
        page_number: usize,
        partition_key: Option<&str>,
        conditions: Option<Filter>,
    ) -> Option<PageResponse<M>> {
        let page = match self
            .client
            .query_page(rows_per_page, page_number, partition_key, conditions)
        {
            Ok(page) => page,
            Err(e) => {
                log::error!("page query failed: {e}");
                PageResponse::empty()
            }
        };
        Some(page.map(M::from_entity))
    }

    /// Point lookup by the model's identity, treating every failure as
    /// "absent". Mutating operations share this so their status mapping
    /// matches the legacy lookup behavior.
    fn lookup_current(&self, model: &M) -> Option<M::Entity> {
        let (Some(pk), Some(rk)) = (model.partition_key(), model.row_key()) else {
            return None;
        };
        match self.client.get(pk, rk) {
            Ok(entity) => entity,
            Err(e) => {
                log::warn!("existence check failed, treating as absent: {e}");
                None
            }
        }
    }
}

/// Uppercases the first letter, which is all the normalization the
/// backend's property naming needs for single-word field names.
fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
