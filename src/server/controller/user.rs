use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, ListParams, Paginated},
        user::{Role, UpdateUserDto, UserDto, UserFilter},
    },
    server::{
        controller::util::get_user::require_role, error::Error, model::app::AppState,
        service::user::UserService,
    },
};

pub static USER_TAG: &str = "user";

/// List users
///
/// Searches name and email, sortable by `name`, `email`, `role` and `created_at`.
#[utoipa::path(
    get,
    path = "/api/users",
    tag = USER_TAG,
    params(ListParams, UserFilter),
    responses(
        (status = 200, description = "Page of users", body = Paginated<UserDto>),
        (status = 400, description = "Invalid sort column", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Admin role required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_users(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListParams>,
    Query(filter): Query<UserFilter>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Admin).await?;

    let users = UserService::new(&state.db).list(&params, &filter).await?;

    Ok((StatusCode::OK, Json(users)))
}

/// Update a user's name, role or active flag
///
/// Administrators cannot demote or deactivate themselves.
#[utoipa::path(
    patch,
    path = "/api/users/{id}",
    tag = USER_TAG,
    params(("id" = i32, Path, description = "User ID")),
    request_body = UpdateUserDto,
    responses(
        (status = 200, description = "Updated user", body = UserDto),
        (status = 400, description = "Blank name", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Admin role required", body = ErrorDto),
        (status = 404, description = "User not found", body = ErrorDto),
        (status = 409, description = "Admin tried to demote or deactivate themselves", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_user(
    State(state): State<AppState>,
    session: Session,
    Path(user_id): Path<i32>,
    Json(update): Json<UpdateUserDto>,
) -> Result<impl IntoResponse, Error> {
    let actor = require_role(&state, &session, Role::Admin).await?;

    let user = UserService::new(&state.db)
        .update(actor.id, user_id, update)
        .await?;

    Ok((StatusCode::OK, Json(user)))
}
