//! User Errors

use salvo::http::StatusError;
use tracing::error;

use benchmark_app::domain::users::UsersServiceError;

pub(crate) fn into_status_error(error: UsersServiceError) -> StatusError {
    match error {
        UsersServiceError::Invalid(errors) => StatusError::bad_request()
            .brief("Invalid user payload")
            .detail(errors.to_string()),
        UsersServiceError::NotFound => StatusError::not_found().brief("User not found"),
        UsersServiceError::AlreadyExists => {
            StatusError::conflict().brief("Username or email already exists")
        }
        UsersServiceError::Sql(source) => {
            error!("user storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
