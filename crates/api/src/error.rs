//! Error translation from repository errors to HTTP responses.
//!
//! Every repository error converts into the shared [`AppError`]
//! taxonomy here, once, instead of per-handler matching. Responses
//! serialize as `{ "error": <code>, "message": <detail> }`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use ledgerbook_core::chart::ChartError;
use ledgerbook_core::fx::FxError;
use ledgerbook_core::journal::JournalError;
use ledgerbook_core::reporting::ReportingError;
use ledgerbook_db::repositories::{
    AccountError, ChartRepoError, FxRateError, JournalRepoError,
};
use ledgerbook_shared::AppError;

/// HTTP-facing wrapper around [`AppError`].
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if status.is_server_error() {
            tracing::error!(error = %self.0, "request failed");
        }
        let body = Json(json!({
            "error": self.0.error_code(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ChartError> for ApiError {
    fn from(err: ChartError) -> Self {
        let app = match &err {
            ChartError::NodeNotFound(_) => AppError::NotFound(err.to_string()),
            ChartError::DuplicateNode(_) => AppError::AlreadyExists(err.to_string()),
            ChartError::TypeMismatch { .. } | ChartError::WouldCycle(_) => {
                AppError::BusinessRule(err.to_string())
            }
        };
        Self(app)
    }
}

impl From<ChartRepoError> for ApiError {
    fn from(err: ChartRepoError) -> Self {
        let app = match &err {
            ChartRepoError::NotFound(_)
            | ChartRepoError::Structure(ChartError::NodeNotFound(_)) => {
                AppError::NotFound(err.to_string())
            }
            ChartRepoError::Structure(ChartError::DuplicateNode(_)) => {
                AppError::AlreadyExists(err.to_string())
            }
            ChartRepoError::Structure(_) => AppError::BusinessRule(err.to_string()),
            ChartRepoError::AccountsAttached { .. } => {
                AppError::ReferentialConflict(err.to_string())
            }
            ChartRepoError::Database(_) => AppError::Database(err.to_string()),
        };
        Self(app)
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        let app = match &err {
            AccountError::AlreadyExists(_) => AppError::AlreadyExists(err.to_string()),
            AccountError::NotFound(_) => AppError::NotFound(err.to_string()),
            AccountError::ChartNotFound(_) => AppError::ForeignKeyMissing(err.to_string()),
            AccountError::CurrencyRequired(_)
            | AccountError::CurrencyForbidden(_)
            | AccountError::MoveChangesType { .. } => AppError::BusinessRule(err.to_string()),
            AccountError::HasEntries { .. } => AppError::ReferentialConflict(err.to_string()),
            AccountError::InvalidStoredCurrency(_) => AppError::Internal(err.to_string()),
            AccountError::Database(_) => AppError::Database(err.to_string()),
        };
        Self(app)
    }
}

impl From<JournalError> for ApiError {
    fn from(err: JournalError) -> Self {
        let app = match &err {
            JournalError::AccountNotFound(_) => AppError::ForeignKeyMissing(err.to_string()),
            JournalError::NoRate { .. } => AppError::RateUnavailable(err.to_string()),
            JournalError::Empty
            | JournalError::SingleSided
            | JournalError::NonPositiveAmount
            | JournalError::MissingCurrency(_)
            | JournalError::Unbalanced { .. } => AppError::BusinessRule(err.to_string()),
        };
        Self(app)
    }
}

impl From<JournalRepoError> for ApiError {
    fn from(err: JournalRepoError) -> Self {
        match err {
            JournalRepoError::Validation(inner) => Self::from(inner),
            JournalRepoError::NotFound(_) => Self(AppError::NotFound(err.to_string())),
            JournalRepoError::InvalidStoredData(_) => Self(AppError::Internal(err.to_string())),
            JournalRepoError::Database(_) => Self(AppError::Database(err.to_string())),
        }
    }
}

impl From<FxError> for ApiError {
    fn from(err: FxError) -> Self {
        let app = match &err {
            FxError::RateUnavailable { .. } => AppError::RateUnavailable(err.to_string()),
            FxError::NonPositiveRate { .. } => AppError::BusinessRule(err.to_string()),
            FxError::Source(_) => AppError::ExternalService(err.to_string()),
        };
        Self(app)
    }
}

impl From<FxRateError> for ApiError {
    fn from(err: FxRateError) -> Self {
        match err {
            FxRateError::Fx(inner) => Self::from(inner),
            FxRateError::Database(inner) => Self(AppError::Database(inner.to_string())),
        }
    }
}

impl From<ReportingError> for ApiError {
    fn from(err: ReportingError) -> Self {
        Self(AppError::Internal(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerbook_shared::types::AccountId;

    #[test]
    fn test_account_not_found_maps_to_404() {
        let api: ApiError = AccountError::NotFound(AccountId::new()).into();
        assert_eq!(api.0.status_code(), 404);
        assert_eq!(api.0.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_unbalanced_journal_maps_to_422() {
        let api: ApiError = JournalError::SingleSided.into();
        assert_eq!(api.0.status_code(), 422);
        assert_eq!(api.0.error_code(), "BUSINESS_RULE_VIOLATION");
    }

    #[test]
    fn test_rate_unavailable_maps_to_503() {
        let api: ApiError = FxError::RateUnavailable {
            currency: ledgerbook_shared::types::Currency::Jpy,
            date: chrono::NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        }
        .into();
        assert_eq!(api.0.status_code(), 503);
    }
}
