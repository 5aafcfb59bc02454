//! Application-wide error taxonomy.
//!
//! Every engine operation surfaces one of these kinds together with a
//! human-readable detail string. Storage-level integrity violations are
//! translated into this taxonomy at the repository layer rather than
//! leaked as raw driver errors.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error kinds.
#[derive(Debug, Error)]
pub enum AppError {
    /// Unique-key violation on create (duplicate id or name).
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Lookup by id or name found nothing.
    #[error("Not found: {0}")]
    NotFound(String),

    /// A referenced id does not exist at write time.
    #[error("Referenced record missing: {0}")]
    ForeignKeyMissing(String),

    /// Delete or update blocked because a dependent row still exists.
    #[error("Referential conflict: {0}")]
    ReferentialConflict(String),

    /// Semantic validation failure (unbalanced journal, type mismatch,
    /// currency rule violated, immutable field changed).
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// FX lookup exhausted the live source and all fallbacks.
    #[error("Exchange rate unavailable: {0}")]
    RateUnavailable(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),

    /// External service error.
    #[error("External service error: {0}")]
    ExternalService(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::AlreadyExists(_) | Self::ReferentialConflict(_) => 409,
            Self::NotFound(_) => 404,
            Self::ForeignKeyMissing(_) | Self::BusinessRule(_) => 422,
            Self::RateUnavailable(_) => 503,
            Self::Database(_) | Self::ExternalService(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the stable machine-readable code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::AlreadyExists(_) => "ALREADY_EXISTS",
            Self::NotFound(_) => "NOT_FOUND",
            Self::ForeignKeyMissing(_) => "FOREIGN_KEY_MISSING",
            Self::ReferentialConflict(_) => "REFERENTIAL_CONFLICT",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::RateUnavailable(_) => "RATE_UNAVAILABLE",
            Self::Database(_) => "DATABASE_ERROR",
            Self::ExternalService(_) => "EXTERNAL_SERVICE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::AlreadyExists(String::new()).status_code(), 409);
        assert_eq!(AppError::NotFound(String::new()).status_code(), 404);
        assert_eq!(
            AppError::ForeignKeyMissing(String::new()).status_code(),
            422
        );
        assert_eq!(
            AppError::ReferentialConflict(String::new()).status_code(),
            409
        );
        assert_eq!(AppError::BusinessRule(String::new()).status_code(), 422);
        assert_eq!(AppError::RateUnavailable(String::new()).status_code(), 503);
        assert_eq!(AppError::Database(String::new()).status_code(), 500);
        assert_eq!(AppError::ExternalService(String::new()).status_code(), 500);
        assert_eq!(AppError::Internal(String::new()).status_code(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::AlreadyExists(String::new()).error_code(),
            "ALREADY_EXISTS"
        );
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::ForeignKeyMissing(String::new()).error_code(),
            "FOREIGN_KEY_MISSING"
        );
        assert_eq!(
            AppError::ReferentialConflict(String::new()).error_code(),
            "REFERENTIAL_CONFLICT"
        );
        assert_eq!(
            AppError::BusinessRule(String::new()).error_code(),
            "BUSINESS_RULE_VIOLATION"
        );
        assert_eq!(
            AppError::RateUnavailable(String::new()).error_code(),
            "RATE_UNAVAILABLE"
        );
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::BusinessRule("unbalanced journal".into()).to_string(),
            "Business rule violation: unbalanced journal"
        );
        assert_eq!(
            AppError::NotFound("journal 42".into()).to_string(),
            "Not found: journal 42"
        );
        assert_eq!(
            AppError::RateUnavailable("JPY@2024-01-01".into()).to_string(),
            "Exchange rate unavailable: JPY@2024-01-01"
        );
    }
}
