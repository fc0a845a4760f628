//! # Error Traits
//!
//! Conversion traits for error handling.

use crate::{AppError, Result};

/// Extension methods for Result types.
pub trait ResultExt<T> {
    fn with_context<C: ToString>(self, context: C) -> Result<T>;
    fn context<C: ToString>(self, context: C) -> Result<T>
    where
        Self: Sized;
    fn log_error(self) -> Result<T>;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<AppError> + std::fmt::Display,
{
    fn with_context<C: ToString>(self, context: C) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            err.context(context)
        })
    }

    fn context<C: ToString>(self, context: C) -> Result<T>
    where
        Self: Sized,
    {
        self.with_context(context)
    }

    fn log_error(self) -> Result<T> {
        self.map_err(|e| {
            let err: AppError = e.into();
            tracing::error!(error = %err, code = err.code(), "Error occurred");
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_context() {
        let result: Result<i32> = Err(AppError::database("timeout"));
        let err = result.context("Scanning data fields").unwrap_err();

        assert_eq!(err.message(), "Scanning data fields: timeout");
    }

    #[test]
    fn test_db_err_context() {
        let result: std::result::Result<(), sea_orm::DbErr> = Err(sea_orm::DbErr::Custom("gone".to_string()));
        let err = result.context("Creating junction table").unwrap_err();

        assert_eq!(err.code(), "DATABASE_ERROR");
        assert!(err.message().starts_with("Creating junction table: "));
    }

    #[test]
    fn test_log_error() {
        let result: Result<i32> = Err(AppError::config("PULSE_DATABASE_PORT"));
        assert!(result.log_error().is_err());
    }
}
