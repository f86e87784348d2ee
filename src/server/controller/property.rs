use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ErrorDto, ListParams, Paginated},
        property::{
            CreatePropertyDto, CreatePropertyForm, PropertyDetailDto, PropertyDto,
            PropertyFilter, UpdatePropertyDto,
        },
        user::Role,
    },
    server::{
        controller::util::{get_user::require_role, multipart::MultipartForm},
        error::Error,
        model::app::AppState,
        service::property::PropertyService,
    },
};

pub static PROPERTY_TAG: &str = "property";

/// List properties
///
/// Searches name, city and address.
#[utoipa::path(
    get,
    path = "/api/properties",
    tag = PROPERTY_TAG,
    params(ListParams, PropertyFilter),
    responses(
        (status = 200, description = "Page of properties", body = Paginated<PropertyDto>),
        (status = 400, description = "Invalid sort column", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_properties(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListParams>,
    Query(filter): Query<PropertyFilter>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let properties = PropertyService::new(&state.db)
        .list(&params, &filter)
        .await?;

    Ok((StatusCode::OK, Json(properties)))
}

#[utoipa::path(
    post,
    path = "/api/properties",
    tag = PROPERTY_TAG,
    request_body = CreatePropertyDto,
    responses(
        (status = 201, description = "Property created", body = PropertyDto),
        (status = 400, description = "Missing or invalid fields", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Manager role required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_property(
    State(state): State<AppState>,
    session: Session,
    Json(property): Json<CreatePropertyDto>,
) -> Result<impl IntoResponse, Error> {
    let user = require_role(&state, &session, Role::Manager).await?;

    let property = PropertyService::new(&state.db)
        .create(user.id, property)
        .await?;

    Ok((StatusCode::CREATED, Json(property)))
}

/// Create a property together with its images
///
/// The `property` part holds the property as JSON, every `images` part is an image. Either the
/// property and all images are stored or nothing is.
#[utoipa::path(
    post,
    path = "/api/properties/with-images",
    tag = PROPERTY_TAG,
    request_body(content = CreatePropertyForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Property created with its images", body = PropertyDetailDto),
        (status = 400, description = "Invalid property or rejected image", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Manager role required", body = ErrorDto),
        (status = 413, description = "Request body too large", body = ErrorDto),
        (status = 500, description = "Internal server error or timeout", body = ErrorDto)
    ),
)]
pub async fn create_property_with_images(
    State(state): State<AppState>,
    session: Session,
    multipart: Multipart,
) -> Result<impl IntoResponse, Error> {
    let user = require_role(&state, &session, Role::Manager).await?;

    let form = MultipartForm::read(multipart, "images").await?;
    let property: CreatePropertyDto = form.json("property")?;

    let property = PropertyService::new(&state.db)
        .create_with_images(
            &state.storage,
            user.id,
            property,
            form.files,
            state.config.media_max_upload_bytes,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(property)))
}

/// Get a property with its units and images
#[utoipa::path(
    get,
    path = "/api/properties/{id}",
    tag = PROPERTY_TAG,
    params(("id" = i32, Path, description = "Property ID")),
    responses(
        (status = 200, description = "Property found", body = PropertyDetailDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Property not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_property(
    State(state): State<AppState>,
    session: Session,
    Path(property_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let property = PropertyService::new(&state.db).get(property_id).await?;

    Ok((StatusCode::OK, Json(property)))
}

#[utoipa::path(
    patch,
    path = "/api/properties/{id}",
    tag = PROPERTY_TAG,
    params(("id" = i32, Path, description = "Property ID")),
    request_body = UpdatePropertyDto,
    responses(
        (status = 200, description = "Property updated", body = PropertyDto),
        (status = 400, description = "Blank fields", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Manager role required", body = ErrorDto),
        (status = 404, description = "Property not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_property(
    State(state): State<AppState>,
    session: Session,
    Path(property_id): Path<i32>,
    Json(update): Json<UpdatePropertyDto>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Manager).await?;

    let property = PropertyService::new(&state.db)
        .update(property_id, update)
        .await?;

    Ok((StatusCode::OK, Json(property)))
}

/// Delete a property and its units
#[utoipa::path(
    delete,
    path = "/api/properties/{id}",
    tag = PROPERTY_TAG,
    params(("id" = i32, Path, description = "Property ID")),
    responses(
        (status = 204, description = "Property deleted"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Manager role required", body = ErrorDto),
        (status = 404, description = "Property not found", body = ErrorDto),
        (status = 409, description = "A unit has active bookings", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn delete_property(
    State(state): State<AppState>,
    session: Session,
    Path(property_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Manager).await?;

    PropertyService::new(&state.db).delete(property_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
