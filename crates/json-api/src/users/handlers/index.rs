//! User Index Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use benchmark_app::domain::pagination::Page;

use crate::{
    extensions::*,
    state::State,
    users::{errors::into_status_error, models::UserResponse},
};

/// User Index Handler
///
/// Returns a page of users, newest first.
#[endpoint(
    tags("users"),
    summary = "List Users",
    responses(
        (status_code = StatusCode::OK, description = "Users"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid pagination"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    limit: QueryParam<String, false>,
    offset: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<Vec<UserResponse>>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let page = Page::new(
        limit.into_page_value("limit")?,
        offset.into_page_value("offset")?,
    )
    .or_400("Invalid pagination parameters")?;

    let users = state
        .users
        .list_users(page)
        .await
        .map_err(into_status_error)?;

    Ok(Json(users.into_iter().map(Into::into).collect()))
}
