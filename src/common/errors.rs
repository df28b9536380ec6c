use sea_orm::{DbErr, SqlErr};
use std::fmt;

/// Error taxonomy shared by every store and view operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusinessError {
    /// Client-side validation failure, detected before any store call
    ValidationError { field: String, message: String },
    /// No authenticated identity at save time
    Unauthenticated,
    /// Resource not found
    NotFound { resource: String, id: String },
    /// Duplicate resource (unique constraint)
    Duplicate { resource: String, field: String },
    /// The store rejected a read or write
    PersistenceError { operation: String, message: String },
    /// A store call did not resolve within the configured bound
    Timeout { operation: String },
    /// Generic application error
    InternalError { message: String },
}

impl fmt::Display for BusinessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BusinessError::ValidationError { field, message } => {
                write!(f, "Validation error in field '{field}': {message}")
            }
            BusinessError::Unauthenticated => write!(f, "User not authenticated"),
            BusinessError::NotFound { resource, id } => {
                write!(f, "{resource} with id '{id}' not found")
            }
            BusinessError::Duplicate { resource, field } => {
                write!(f, "{resource} with this {field} already exists")
            }
            BusinessError::PersistenceError { operation, message } => {
                write!(f, "Store error during '{operation}': {message}")
            }
            BusinessError::Timeout { operation } => {
                write!(f, "'{operation}' did not complete in time")
            }
            BusinessError::InternalError { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for BusinessError {}

impl BusinessError {
    /// Text shown inline next to the form or list that triggered the error
    pub fn user_message(&self) -> String {
        match self {
            BusinessError::ValidationError { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// Validation and authentication errors are handled locally and never
    /// reach the store.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            BusinessError::ValidationError { .. } | BusinessError::Unauthenticated
        )
    }
}

/// Maps `DbErr` into the business taxonomy with some context
pub struct ErrorMapper;

impl ErrorMapper {
    pub fn map_db_error(err: DbErr, context: &str) -> BusinessError {
        if let Some(SqlErr::UniqueConstraintViolation(msg)) = err.sql_err() {
            return BusinessError::Duplicate {
                resource: Self::extract_resource_from_context(context),
                field: Self::extract_field_from_constraint(&msg),
            };
        }

        match err {
            DbErr::RecordNotFound(msg) => BusinessError::NotFound {
                resource: Self::extract_resource_from_context(context),
                id: Self::extract_id_from_message(&msg),
            },
            DbErr::Custom(msg) => {
                if msg.starts_with("Validation failed:") {
                    let field = Self::extract_field_from_validation(&msg);
                    let message = msg.replace("Validation failed:", "").trim().to_string();
                    BusinessError::ValidationError { field, message }
                } else {
                    BusinessError::InternalError { message: msg }
                }
            }
            DbErr::Conn(conn_err) => BusinessError::PersistenceError {
                operation: context.to_string(),
                message: conn_err.to_string(),
            },
            other => BusinessError::PersistenceError {
                operation: context.to_string(),
                message: other.to_string(),
            },
        }
    }

    fn extract_resource_from_context(context: &str) -> String {
        context.replace('_', " ")
    }

    fn extract_id_from_message(msg: &str) -> String {
        // Look for patterns like "id 'value'"
        if let Some(start_pos) = msg.find(" id '") {
            let after_id = &msg[start_pos + 5..];
            if let Some(end_pos) = after_id.find('\'') {
                return after_id[..end_pos].to_string();
            }
        }

        msg.split_whitespace()
            .find_map(|word| {
                let cleaned = word.trim_matches('\'').trim_matches('"');
                (cleaned.len() == 36 && cleaned.matches('-').count() == 4)
                    .then(|| cleaned.to_string())
            })
            .unwrap_or_else(|| "unknown".to_string())
    }

    fn extract_field_from_validation(msg: &str) -> String {
        // "Validation failed: replications must be positive"
        msg.split(':')
            .nth(1)
            .and_then(|part| part.split_whitespace().next())
            .unwrap_or("unknown")
            .to_string()
    }

    fn extract_field_from_constraint(msg: &str) -> String {
        // SQLite: "UNIQUE constraint failed: field_trials.trial_code"
        if let Some(rest) = msg.split("constraint failed:").nth(1) {
            let columns: Vec<&str> = rest
                .split(',')
                .filter_map(|qualified| qualified.trim().rsplit('.').next())
                .filter(|column| !column.is_empty())
                .collect();
            if !columns.is_empty() {
                return columns.join(", ");
            }
        }
        if msg.contains("trial_code") {
            "trial_code".to_string()
        } else if msg.contains("trial_id") {
            "trial_id".to_string()
        } else {
            "field".to_string()
        }
    }
}

/// Convenience macros for creating business errors
#[macro_export]
macro_rules! validation_error {
    ($field:expr, $message:expr) => {
        $crate::common::errors::BusinessError::ValidationError {
            field: $field.to_string(),
            message: $message.to_string(),
        }
    };
}

#[macro_export]
macro_rules! not_found {
    ($resource:expr, $id:expr) => {
        $crate::common::errors::BusinessError::NotFound {
            resource: $resource.to_string(),
            id: $id.to_string(),
        }
    };
}

#[macro_export]
macro_rules! duplicate_resource {
    ($resource:expr, $field:expr) => {
        $crate::common::errors::BusinessError::Duplicate {
            resource: $resource.to_string(),
            field: $field.to_string(),
        }
    };
}

/// Extension trait to add business error conversion to `DbErr`
pub trait DbErrorExt {
    fn to_business_error(self, context: &str) -> BusinessError;
}

impl DbErrorExt for DbErr {
    fn to_business_error(self, context: &str) -> BusinessError {
        ErrorMapper::map_db_error(self, context)
    }
}

/// Result type alias for business operations
pub type BusinessResult<T> = Result<T, BusinessError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_creation() {
        let err = validation_error!("plot_id", "Please select a valid plot.");
        assert!(matches!(err, BusinessError::ValidationError { .. }));
        assert_eq!(err.user_message(), "Please select a valid plot.");
        assert!(err.is_local());
    }

    #[test]
    fn test_error_mapper_validation() {
        let db_err = DbErr::Custom("Validation failed: replications must be positive".to_string());
        let business_err = ErrorMapper::map_db_error(db_err, "field_trial_layout");

        match business_err {
            BusinessError::ValidationError { field, message } => {
                assert_eq!(field, "replications");
                assert!(message.contains("must be positive"));
            }
            _ => panic!("Expected validation error"),
        }
    }

    #[test]
    fn test_error_mapper_not_found() {
        let db_err = DbErr::RecordNotFound(
            "Field trial with id '0b6f1c9e-3a57-4c1e-9a4b-8f0e5b2d7c11' not found".to_string(),
        );
        let business_err = ErrorMapper::map_db_error(db_err, "field_trial");

        match business_err {
            BusinessError::NotFound { resource, id } => {
                assert_eq!(resource, "field trial");
                assert_eq!(id, "0b6f1c9e-3a57-4c1e-9a4b-8f0e5b2d7c11");
            }
            _ => panic!("Expected not found error"),
        }
    }

    #[test]
    fn test_constraint_field_extraction() {
        assert_eq!(
            ErrorMapper::extract_field_from_constraint(
                "UNIQUE constraint failed: field_trial_teams.trial_id, field_trial_teams.user_id"
            ),
            "trial_id, user_id"
        );
        assert_eq!(
            ErrorMapper::extract_field_from_constraint(
                "duplicate key value violates unique constraint \"field_trials_trial_code_key\""
            ),
            "trial_code"
        );
    }

    #[test]
    fn test_unauthenticated_is_local_but_persistence_is_not() {
        assert!(BusinessError::Unauthenticated.is_local());
        let persistence = BusinessError::PersistenceError {
            operation: "create_measurement".to_string(),
            message: "connection reset".to_string(),
        };
        assert!(!persistence.is_local());
        assert!(persistence.user_message().contains("connection reset"));
    }
}
