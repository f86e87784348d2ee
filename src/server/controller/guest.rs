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
        guest::{CreateGuestDto, GuestDetailDto, GuestDto, GuestFilter, UpdateGuestDto},
        user::Role,
    },
    server::{
        controller::util::get_user::require_role, error::Error, model::app::AppState,
        service::guest::GuestService,
    },
};

pub static GUEST_TAG: &str = "guest";

/// List guests
///
/// Searches first and last name, email and phone.
#[utoipa::path(
    get,
    path = "/api/guests",
    tag = GUEST_TAG,
    params(ListParams, GuestFilter),
    responses(
        (status = 200, description = "Page of guests", body = Paginated<GuestDto>),
        (status = 400, description = "Invalid sort column", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_guests(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListParams>,
    Query(filter): Query<GuestFilter>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let guests = GuestService::new(&state.db).list(&params, &filter).await?;

    Ok((StatusCode::OK, Json(guests)))
}

#[utoipa::path(
    post,
    path = "/api/guests",
    tag = GUEST_TAG,
    request_body = CreateGuestDto,
    responses(
        (status = 201, description = "Guest created", body = GuestDto),
        (status = 400, description = "Missing or invalid fields", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 409, description = "Email already used by another guest", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_guest(
    State(state): State<AppState>,
    session: Session,
    Json(guest): Json<CreateGuestDto>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let guest = GuestService::new(&state.db).create(guest).await?;

    Ok((StatusCode::CREATED, Json(guest)))
}

/// Get a guest with their booking history
#[utoipa::path(
    get,
    path = "/api/guests/{id}",
    tag = GUEST_TAG,
    params(("id" = i32, Path, description = "Guest ID")),
    responses(
        (status = 200, description = "Guest found", body = GuestDetailDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Guest not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_guest(
    State(state): State<AppState>,
    session: Session,
    Path(guest_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let guest = GuestService::new(&state.db).get(guest_id).await?;

    Ok((StatusCode::OK, Json(guest)))
}

#[utoipa::path(
    patch,
    path = "/api/guests/{id}",
    tag = GUEST_TAG,
    params(("id" = i32, Path, description = "Guest ID")),
    request_body = UpdateGuestDto,
    responses(
        (status = 200, description = "Guest updated", body = GuestDto),
        (status = 400, description = "Invalid fields", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Guest not found", body = ErrorDto),
        (status = 409, description = "Email already used by another guest", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_guest(
    State(state): State<AppState>,
    session: Session,
    Path(guest_id): Path<i32>,
    Json(update): Json<UpdateGuestDto>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let guest = GuestService::new(&state.db).update(guest_id, update).await?;

    Ok((StatusCode::OK, Json(guest)))
}

#[utoipa::path(
    delete,
    path = "/api/guests/{id}",
    tag = GUEST_TAG,
    params(("id" = i32, Path, description = "Guest ID")),
    responses(
        (status = 204, description = "Guest deleted"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Guest not found", body = ErrorDto),
        (status = 409, description = "Guest has an active booking", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_guest(
    State(state): State<AppState>,
    session: Session,
    Path(guest_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    GuestService::new(&state.db).delete(guest_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
