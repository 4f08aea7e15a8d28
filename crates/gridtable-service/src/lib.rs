//! # gridtable-service
//!
//! Model-oriented facade over the GridTable storage layer. Callers work
//! with domain models; this crate converts them to and from their entity
//! shapes, performs explicit field-level partial updates, and reports
//! outcomes through a closed status vocabulary.
//!
//! ## Architecture
//!
//! ```text
//! RecordService<M>        ← facade: insert/update/remove/get/pages (service.rs)
//!     ↓ TableModel        ← model ↔ entity conversion (model.rs)
//!     ↓ FieldPatch        ← explicit partial updates (patch.rs)
//! TableClient<E>          ← gridtable-store
//! ```

pub mod error;
pub mod model;
pub mod patch;
pub mod service;
pub mod status;

pub use error::{Result, ServiceError};
pub use model::TableModel;
pub use patch::{FieldPatch, UnknownFieldPolicy};
pub use service::RecordService;
pub use status::StatusCode;
