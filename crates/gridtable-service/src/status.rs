//! Closed status enumeration surfaced to service consumers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of a record service operation.
///
/// This is the whole vocabulary: no other values are produced, and every
/// internal failure collapses into `InternalServerError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusCode {
    Created,
    Ok,
    NotFound,
    Conflict,
    InternalServerError,
}

impl StatusCode {
    /// The conventional numeric code.
    pub fn code(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::Created => 201,
            StatusCode::NotFound => 404,
            StatusCode::Conflict => 409,
            StatusCode::InternalServerError => 500,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Ok | StatusCode::Created)
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusCode::Ok => write!(f, "OK"),
            StatusCode::Created => write!(f, "Created"),
            StatusCode::NotFound => write!(f, "Not Found"),
            StatusCode::Conflict => write!(f, "Conflict"),
            StatusCode::InternalServerError => write!(f, "Internal Server Error"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(StatusCode::Ok.code(), 200);
        assert_eq!(StatusCode::Created.code(), 201);
        assert_eq!(StatusCode::NotFound.code(), 404);
        assert_eq!(StatusCode::Conflict.code(), 409);
        assert_eq!(StatusCode::InternalServerError.code(), 500);
    }

    #[test]
    fn test_success_split() {
        assert!(StatusCode::Ok.is_success());
        assert!(StatusCode::Created.is_success());
        assert!(!StatusCode::Conflict.is_success());
        assert!(!StatusCode::NotFound.is_success());
        assert!(!StatusCode::InternalServerError.is_success());
    }
}
