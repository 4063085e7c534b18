use mongodb::error::{ErrorKind, WriteFailure};
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    /// A model was asked for a field it does not expose.
    UnknownKey(String),
    /// No factory is registered under this model type tag.
    InvalidModelType(String),
    /// A factory is already registered under this model type tag.
    DuplicateModelType(String),
    DatabaseError(String),
    NotFound(String),
    /// A write was rejected by a unique index.
    DuplicateKey(String),
    Serialization(String),
    InvalidRequest(String),
    Unauthorized(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::UnknownKey(key) => write!(f, "Unknown key: '{}'", key),
            AppError::InvalidModelType(tag) => write!(f, "Invalid model type: '{}'", tag),
            AppError::DuplicateModelType(tag) => {
                write!(f, "Model type already registered: '{}'", tag)
            }
            AppError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::DuplicateKey(msg) => write!(f, "Duplicate key: {}", msg),
            AppError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            AppError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}

const DUPLICATE_KEY_CODE: i32 = 11000;

impl From<mongodb::error::Error> for AppError {
    fn from(e: mongodb::error::Error) -> Self {
        match e.kind.as_ref() {
            ErrorKind::Write(WriteFailure::WriteError(write_error))
                if write_error.code == DUPLICATE_KEY_CODE =>
            {
                AppError::DuplicateKey(write_error.message.clone())
            }
            _ => AppError::DatabaseError(e.to_string()),
        }
    }
}

impl From<mongodb::bson::de::Error> for AppError {
    fn from(e: mongodb::bson::de::Error) -> Self {
        AppError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_model_type_message() {
        let err = AppError::InvalidModelType("Trip".to_string());
        assert_eq!(err.to_string(), "Invalid model type: 'Trip'");
    }
}
