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
        inventory::AssignmentDto,
        unit::{CreateUnitDto, UnitDto, UnitFilter, UnitStatusDto, UpdateUnitDto},
        user::Role,
    },
    server::{
        controller::util::get_user::require_role,
        error::Error,
        model::app::AppState,
        service::{inventory::InventoryService, unit::UnitService},
    },
};

pub static UNIT_TAG: &str = "unit";

/// List the units of a property
#[utoipa::path(
    get,
    path = "/api/properties/{id}/units",
    tag = UNIT_TAG,
    params(("id" = i32, Path, description = "Property ID"), ListParams, UnitFilter),
    responses(
        (status = 200, description = "Page of units", body = Paginated<UnitDto>),
        (status = 400, description = "Invalid sort column", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Property not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_units(
    State(state): State<AppState>,
    session: Session,
    Path(property_id): Path<i32>,
    Query(params): Query<ListParams>,
    Query(filter): Query<UnitFilter>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let units = UnitService::new(&state.db)
        .list(property_id, &params, &filter)
        .await?;

    Ok((StatusCode::OK, Json(units)))
}

#[utoipa::path(
    post,
    path = "/api/units",
    tag = UNIT_TAG,
    request_body = CreateUnitDto,
    responses(
        (status = 201, description = "Unit created", body = UnitDto),
        (status = 400, description = "Missing or invalid fields", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Manager role required", body = ErrorDto),
        (status = 404, description = "Property not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_unit(
    State(state): State<AppState>,
    session: Session,
    Json(unit): Json<CreateUnitDto>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Manager).await?;

    let unit = UnitService::new(&state.db).create(unit).await?;

    Ok((StatusCode::CREATED, Json(unit)))
}

#[utoipa::path(
    get,
    path = "/api/units/{id}",
    tag = UNIT_TAG,
    params(("id" = i32, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Unit found", body = UnitDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Unit not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_unit(
    State(state): State<AppState>,
    session: Session,
    Path(unit_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let unit = UnitService::new(&state.db).get(unit_id).await?;

    Ok((StatusCode::OK, Json(unit)))
}

#[utoipa::path(
    patch,
    path = "/api/units/{id}",
    tag = UNIT_TAG,
    params(("id" = i32, Path, description = "Unit ID")),
    request_body = UpdateUnitDto,
    responses(
        (status = 200, description = "Unit updated", body = UnitDto),
        (status = 400, description = "Invalid fields", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Manager role required", body = ErrorDto),
        (status = 404, description = "Unit not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_unit(
    State(state): State<AppState>,
    session: Session,
    Path(unit_id): Path<i32>,
    Json(update): Json<UpdateUnitDto>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Manager).await?;

    let unit = UnitService::new(&state.db).update(unit_id, update).await?;

    Ok((StatusCode::OK, Json(unit)))
}

#[utoipa::path(
    delete,
    path = "/api/units/{id}",
    tag = UNIT_TAG,
    params(("id" = i32, Path, description = "Unit ID")),
    responses(
        (status = 204, description = "Unit deleted"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Manager role required", body = ErrorDto),
        (status = 404, description = "Unit not found", body = ErrorDto),
        (status = 409, description = "Unit has active bookings", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_unit(
    State(state): State<AppState>,
    session: Session,
    Path(unit_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Manager).await?;

    UnitService::new(&state.db).delete(unit_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Put a unit into or out of maintenance
///
/// Only `available` and `maintenance` can be set by hand, other statuses follow the unit's
/// bookings.
#[utoipa::path(
    put,
    path = "/api/units/{id}/status",
    tag = UNIT_TAG,
    params(("id" = i32, Path, description = "Unit ID")),
    request_body = UnitStatusDto,
    responses(
        (status = 200, description = "Status changed", body = UnitDto),
        (status = 400, description = "Status cannot be set by hand", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Manager role required", body = ErrorDto),
        (status = 404, description = "Unit not found", body = ErrorDto),
        (status = 409, description = "Unit is reserved or occupied", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn set_unit_status(
    State(state): State<AppState>,
    session: Session,
    Path(unit_id): Path<i32>,
    Json(status): Json<UnitStatusDto>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Manager).await?;

    let unit = UnitService::new(&state.db)
        .set_status(unit_id, status.status)
        .await?;

    Ok((StatusCode::OK, Json(unit)))
}

/// List the inventory assigned to a unit
#[utoipa::path(
    get,
    path = "/api/units/{id}/inventory",
    tag = UNIT_TAG,
    params(("id" = i32, Path, description = "Unit ID")),
    responses(
        (status = 200, description = "Unit inventory", body = Vec<AssignmentDto>),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Unit not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_unit_inventory(
    State(state): State<AppState>,
    session: Session,
    Path(unit_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let inventory = InventoryService::new(&state.db)
        .unit_inventory(unit_id)
        .await?;

    Ok((StatusCode::OK, Json(inventory)))
}
