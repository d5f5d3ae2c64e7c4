//! # CLI Error Type
//!
//! Unified error type for commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Kirana                                 │
//! │                                                                         │
//! │  kirana bill edit BILL-009 --line 3:2                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Command handler → Result<Reply, CliError>                       │  │
//! │  │         │                                                        │  │
//! │  │         ├── DbError::QueryFailed ──────────┐                     │  │
//! │  │         ├── CoreError::BillNotFound ───────┼──► CliError         │  │
//! │  │         └── ConfigError::InvalidValue ─────┘    { code, message }│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  stderr: "[NOT_FOUND] Bill not found: BILL-009", exit status non-zero   │
//! │  --json: {"code":"NOT_FOUND","message":"Bill not found: BILL-009"}      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use kirana_core::{CoreError, ValidationError};
use kirana_db::DbError;
use serde::Serialize;

use crate::config::ConfigError;

/// Error reported by a command.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CliError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for command failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    DatabaseError,
    InsufficientStock,
    ConfigError,
    Internal,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::Internal => "INTERNAL",
        }
    }

    /// Process exit status for this code.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorCode::ValidationError => 2,
            ErrorCode::NotFound => 3,
            ErrorCode::InsufficientStock => 4,
            ErrorCode::ConfigError => 5,
            ErrorCode::DatabaseError | ErrorCode::Internal => 1,
        }
    }
}

impl CliError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        CliError {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &str, id: &str) -> Self {
        CliError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    pub fn validation(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::ValidationError, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        CliError::new(ErrorCode::Internal, message)
    }
}

pub type CliResult<T> = Result<T, CliError>;

/// Converts database errors to CLI errors.
impl From<DbError> for CliError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => CliError::not_found(&entity, &id),
            DbError::Domain(core) => CliError::from(core),
            DbError::ConnectionFailed(e) => {
                tracing::error!("Database connection failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(e) => {
                tracing::error!("Database migration failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::Serialization(e) => CliError::new(
                ErrorCode::DatabaseError,
                format!("Stored data could not be read: {}", e),
            ),
            DbError::PoolExhausted => {
                CliError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                CliError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

/// Converts core errors to CLI errors.
impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotFound(id) => CliError::not_found("Item", &id.to_string()),
            CoreError::BillNotFound(number) => CliError::not_found("Bill", &number),
            CoreError::NotInCart(_) | CoreError::LineNotFound { .. } => {
                CliError::new(ErrorCode::NotFound, err.to_string())
            }
            CoreError::InsufficientStock { .. } => {
                CliError::new(ErrorCode::InsufficientStock, err.to_string())
            }
            CoreError::CorruptBill { .. } => {
                CliError::new(ErrorCode::DatabaseError, err.to_string())
            }
            CoreError::EmptyCart | CoreError::DuplicateBill(_) => {
                CliError::validation(err.to_string())
            }
            CoreError::Validation(e) => CliError::from(e),
        }
    }
}

impl From<ValidationError> for CliError {
    fn from(err: ValidationError) -> Self {
        CliError::validation(err.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        CliError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(err: serde_json::Error) -> Self {
        CliError::internal(format!("JSON error: {}", err))
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code.as_str(), self.message)
    }
}

impl std::error::Error for CliError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_domain_errors_keep_their_code() {
        let err = CliError::from(DbError::Domain(CoreError::BillNotFound("BILL-009".into())));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.to_string(), "[NOT_FOUND] Bill not found: BILL-009");

        let err = CliError::from(CoreError::InsufficientStock {
            item_id: 1,
            item_name: "RICE".into(),
            available: 1.0,
            requested: 2.0,
        });
        assert_eq!(err.code, ErrorCode::InsufficientStock);
        assert_eq!(err.code.exit_code(), 4);
    }

    #[test]
    fn test_serializes_code_and_message() {
        let err = CliError::from(ConfigError::InvalidValue("KIRANA_OVERSELL".into()));
        let json = serde_json::to_value(&err).unwrap();

        assert_eq!(json["code"], "CONFIG_ERROR");
        assert_eq!(json["message"], "Invalid value for KIRANA_OVERSELL");
    }
}
