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
        inventory::{
            AssignmentDto, CreateAssignmentDto, CreateInventoryItemDto, InventoryFilter,
            InventoryItemDto, UpdateAssignmentDto, UpdateInventoryItemDto,
        },
        user::Role,
    },
    server::{
        controller::util::get_user::require_role, error::Error, model::app::AppState,
        service::inventory::InventoryService,
    },
};

pub static INVENTORY_TAG: &str = "inventory";

/// List inventory items with the quantity assigned to units
#[utoipa::path(
    get,
    path = "/api/inventory",
    tag = INVENTORY_TAG,
    params(ListParams, InventoryFilter),
    responses(
        (status = 200, description = "Page of items", body = Paginated<InventoryItemDto>),
        (status = 400, description = "Invalid sort column", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_items(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListParams>,
    Query(filter): Query<InventoryFilter>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let items = InventoryService::new(&state.db)
        .list_items(&params, &filter)
        .await?;

    Ok((StatusCode::OK, Json(items)))
}

#[utoipa::path(
    post,
    path = "/api/inventory",
    tag = INVENTORY_TAG,
    request_body = CreateInventoryItemDto,
    responses(
        (status = 201, description = "Item created", body = InventoryItemDto),
        (status = 400, description = "Missing or invalid fields", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Manager role required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_item(
    State(state): State<AppState>,
    session: Session,
    Json(item): Json<CreateInventoryItemDto>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Manager).await?;

    let item = InventoryService::new(&state.db).create_item(item).await?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    get,
    path = "/api/inventory/{id}",
    tag = INVENTORY_TAG,
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 200, description = "Item found", body = InventoryItemDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Item not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_item(
    State(state): State<AppState>,
    session: Session,
    Path(item_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let item = InventoryService::new(&state.db).get_item(item_id).await?;

    Ok((StatusCode::OK, Json(item)))
}

#[utoipa::path(
    patch,
    path = "/api/inventory/{id}",
    tag = INVENTORY_TAG,
    params(("id" = i32, Path, description = "Item ID")),
    request_body = UpdateInventoryItemDto,
    responses(
        (status = 200, description = "Item updated", body = InventoryItemDto),
        (status = 400, description = "Invalid fields", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Manager role required", body = ErrorDto),
        (status = 404, description = "Item not found", body = ErrorDto),
        (status = 409, description = "Stock below the assigned quantity", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_item(
    State(state): State<AppState>,
    session: Session,
    Path(item_id): Path<i32>,
    Json(update): Json<UpdateInventoryItemDto>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Manager).await?;

    let item = InventoryService::new(&state.db)
        .update_item(item_id, update)
        .await?;

    Ok((StatusCode::OK, Json(item)))
}

#[utoipa::path(
    delete,
    path = "/api/inventory/{id}",
    tag = INVENTORY_TAG,
    params(("id" = i32, Path, description = "Item ID")),
    responses(
        (status = 204, description = "Item deleted"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Manager role required", body = ErrorDto),
        (status = 404, description = "Item not found", body = ErrorDto),
        (status = 409, description = "Item is assigned to units", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_item(
    State(state): State<AppState>,
    session: Session,
    Path(item_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Manager).await?;

    InventoryService::new(&state.db).delete_item(item_id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Assign part of an item's stock to a unit
#[utoipa::path(
    post,
    path = "/api/inventory/assignments",
    tag = INVENTORY_TAG,
    request_body = CreateAssignmentDto,
    responses(
        (status = 201, description = "Item assigned", body = AssignmentDto),
        (status = 400, description = "Invalid quantity", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Manager role required", body = ErrorDto),
        (status = 404, description = "Item or unit not found", body = ErrorDto),
        (status = 409, description = "Already assigned or not enough stock", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_assignment(
    State(state): State<AppState>,
    session: Session,
    Json(assignment): Json<CreateAssignmentDto>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Manager).await?;

    let assignment = InventoryService::new(&state.db).assign(assignment).await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}

#[utoipa::path(
    patch,
    path = "/api/inventory/assignments/{id}",
    tag = INVENTORY_TAG,
    params(("id" = i32, Path, description = "Assignment ID")),
    request_body = UpdateAssignmentDto,
    responses(
        (status = 200, description = "Assignment updated", body = AssignmentDto),
        (status = 400, description = "Invalid quantity", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Manager role required", body = ErrorDto),
        (status = 404, description = "Assignment not found", body = ErrorDto),
        (status = 409, description = "Not enough stock", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_assignment(
    State(state): State<AppState>,
    session: Session,
    Path(assignment_id): Path<i32>,
    Json(update): Json<UpdateAssignmentDto>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Manager).await?;

    let assignment = InventoryService::new(&state.db)
        .update_assignment(assignment_id, update)
        .await?;

    Ok((StatusCode::OK, Json(assignment)))
}

#[utoipa::path(
    delete,
    path = "/api/inventory/assignments/{id}",
    tag = INVENTORY_TAG,
    params(("id" = i32, Path, description = "Assignment ID")),
    responses(
        (status = 204, description = "Assignment removed"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Manager role required", body = ErrorDto),
        (status = 404, description = "Assignment not found", body = ErrorDto),
        (status = 409, description = "Assignment is referenced by checkout reports", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_assignment(
    State(state): State<AppState>,
    session: Session,
    Path(assignment_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Manager).await?;

    InventoryService::new(&state.db)
        .remove_assignment(assignment_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
