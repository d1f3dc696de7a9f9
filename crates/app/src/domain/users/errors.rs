//! Users service errors.

use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::validation::ValidationErrors;

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error(transparent)]
    Invalid(#[from] ValidationErrors),

    #[error("user not found")]
    NotFound,

    #[error("username or email already exists")]
    AlreadyExists,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for UsersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::Other | _) | None => Self::Sql(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_not_found_maps_to_not_found() {
        assert!(matches!(
            UsersServiceError::from(Error::RowNotFound),
            UsersServiceError::NotFound
        ));
    }

    #[test]
    fn other_errors_are_storage_errors() {
        assert!(matches!(
            UsersServiceError::from(Error::PoolTimedOut),
            UsersServiceError::Sql(Error::PoolTimedOut)
        ));
    }
}
