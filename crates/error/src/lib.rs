//! # Pulse Error Infrastructure
//!
//! Error types shared by the persistence crates: configuration loading,
//! database access and schema migrations.

pub mod traits;

pub use traits::ResultExt;

/// Convenience type alias for Result with AppError.
pub type Result<T, E = AppError> = std::result::Result<T, E>;

/// Main application error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("NotFound: {message}")]
    NotFound {
        message: String,
    },

    #[error("Internal: {message}")]
    Internal {
        message: String,
    },

    #[error("Database: {message}")]
    Database {
        message: String,
    },

    #[error("IO: {message}")]
    Io {
        message: String,
    },

    #[error("Config: {message}")]
    Config {
        message: String,
    },

    #[error("Migration: {message}")]
    Migration {
        message: String,
    },
}

impl AppError {
    /// Create a database error.
    #[inline]
    pub fn database(message: impl ToString) -> Self {
        Self::Database {
            message: message.to_string(),
        }
    }

    /// Create a config error.
    #[inline]
    pub fn config(message: impl ToString) -> Self {
        Self::Config {
            message: message.to_string(),
        }
    }

    /// Get the error code.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound {
                ..
            } => "NOT_FOUND",
            AppError::Internal {
                ..
            } => "INTERNAL_ERROR",
            AppError::Database {
                ..
            } => "DATABASE_ERROR",
            AppError::Io {
                ..
            } => "IO_ERROR",
            AppError::Config {
                ..
            } => "CONFIG_ERROR",
            AppError::Migration {
                ..
            } => "MIGRATION_ERROR",
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound {
                message,
            } |
            AppError::Internal {
                message,
            } |
            AppError::Database {
                message,
            } |
            AppError::Io {
                message,
            } |
            AppError::Config {
                message,
            } |
            AppError::Migration {
                message,
            } => message.clone(),
        }
    }

    /// Process exit code used by the CLI when this error aborts a command.
    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Config {
                ..
            } => 2,
            AppError::Database {
                ..
            } => 3,
            AppError::Migration {
                ..
            } => 4,
            _ => 1,
        }
    }

    /// Add context to the error.
    #[inline]
    pub fn context(self, context: impl ToString) -> Self {
        let context_msg = context.to_string();
        let wrap = |message: String| format!("{}: {}", context_msg, message);
        match self {
            AppError::NotFound {
                message,
            } => {
                Self::NotFound {
                    message: wrap(message),
                }
            },
            AppError::Internal {
                message,
            } => {
                Self::Internal {
                    message: wrap(message),
                }
            },
            AppError::Database {
                message,
            } => {
                Self::Database {
                    message: wrap(message),
                }
            },
            AppError::Io {
                message,
            } => {
                Self::Io {
                    message: wrap(message),
                }
            },
            AppError::Config {
                message,
            } => {
                Self::Config {
                    message: wrap(message),
                }
            },
            AppError::Migration {
                message,
            } => {
                Self::Migration {
                    message: wrap(message),
                }
            },
        }
    }
}

/// Convert anyhow errors to AppError.
impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal {
            message: err.to_string(),
        }
    }
}

/// Convert std::io errors to AppError.
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: err.to_string(),
        }
    }
}

/// Convert Sea-ORM database errors to AppError.
///
/// Migration failures raised by the schema manager keep their own variant so
/// the CLI can tell a rejected migration apart from a lost connection.
impl From<sea_orm::DbErr> for AppError {
    fn from(err: sea_orm::DbErr) -> Self {
        match err {
            sea_orm::DbErr::Migration(message) => {
                Self::Migration {
                    message,
                }
            },
            sea_orm::DbErr::RecordNotFound(message) => {
                Self::NotFound {
                    message,
                }
            },
            other => {
                Self::Database {
                    message: other.to_string(),
                }
            },
        }
    }
}
