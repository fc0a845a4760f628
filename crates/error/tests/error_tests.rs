//! # Error Crate Tests
//!
//! Tests for error construction, context chaining, and conversions.

#[cfg(test)]
mod error_construction_tests {
    use error::AppError;

    #[test]
    fn test_error_creation() {
        let error = AppError::config("Invalid port");
        assert!(matches!(error, AppError::Config { .. }));
    }

    #[test]
    fn test_error_codes_are_distinct() {
        let errors: Vec<AppError> = vec![
            sea_orm::DbErr::RecordNotFound("a".to_string()).into(),
            anyhow::anyhow!("b").into(),
            AppError::database("c"),
            std::io::Error::other("d").into(),
            AppError::config("e"),
            sea_orm::DbErr::Migration("f".to_string()).into(),
        ];

        let mut codes: Vec<&str> = errors.iter().map(AppError::code).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}

#[cfg(test)]
mod error_context_tests {
    use error::{AppError, ResultExt};

    fn failing_step() -> Result<(), sea_orm::DbErr> {
        Err(sea_orm::DbErr::Migration("unique violation".to_string()))
    }

    #[test]
    fn test_context_chaining_keeps_variant() {
        let err = failing_step()
            .context("Adding uq_data_field_org_variable")
            .unwrap_err();

        assert!(matches!(err, AppError::Migration { .. }));
        assert_eq!(err.message(), "Adding uq_data_field_org_variable: unique violation");
    }

    #[test]
    fn test_nested_context() {
        let err = AppError::database("closed")
            .context("inner")
            .context("outer");
        assert_eq!(err.message(), "outer: inner: closed");
    }
}
