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
        checkout::{
            CheckoutDraft, CheckoutReportDetailDto, CheckoutReportDto, CheckoutReportFilter,
            ConditionStepDto, InventoryStepDto, PhotosStepDto, StartCheckoutDto,
        },
        user::Role,
    },
    server::{
        controller::util::get_user::require_role, error::Error, model::app::AppState,
        service::checkout::CheckoutService,
    },
};

pub static CHECKOUT_TAG: &str = "checkout";

/// Get the checkout in progress in this session
#[utoipa::path(
    get,
    path = "/api/checkout",
    tag = CHECKOUT_TAG,
    responses(
        (status = 200, description = "Current draft and step", body = CheckoutDraft),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "No checkout in progress", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_checkout(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let draft = CheckoutService::new(&state.db).get(&session).await?;

    Ok((StatusCode::OK, Json(draft)))
}

/// Discard the checkout in progress
#[utoipa::path(
    delete,
    path = "/api/checkout",
    tag = CHECKOUT_TAG,
    responses(
        (status = 204, description = "Draft discarded"),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn cancel_checkout(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    CheckoutService::new(&state.db).cancel(&session).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Start checking out a checked in booking
///
/// Replaces any checkout already in progress in this session.
#[utoipa::path(
    post,
    path = "/api/checkout/start",
    tag = CHECKOUT_TAG,
    request_body = StartCheckoutDto,
    responses(
        (status = 200, description = "Draft at the inventory step", body = CheckoutDraft),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Booking not found", body = ErrorDto),
        (status = 409, description = "Booking not checked in or already inspected", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn start_checkout(
    State(state): State<AppState>,
    session: Session,
    Json(start): Json<StartCheckoutDto>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let draft = CheckoutService::new(&state.db)
        .start(&session, start.booking_id)
        .await?;

    Ok((StatusCode::OK, Json(draft)))
}

/// Record what was found for each expected item
#[utoipa::path(
    put,
    path = "/api/checkout/inventory",
    tag = CHECKOUT_TAG,
    request_body = InventoryStepDto,
    responses(
        (status = 200, description = "Draft at the condition step", body = CheckoutDraft),
        (status = 400, description = "Checks do not match the expected items", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 409, description = "No checkout or not at the inventory step", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn checkout_inventory(
    State(state): State<AppState>,
    session: Session,
    Json(step): Json<InventoryStepDto>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let draft = CheckoutService::new(&state.db)
        .inventory(&session, step.checks)
        .await?;

    Ok((StatusCode::OK, Json(draft)))
}

/// Record cleanliness and damages
#[utoipa::path(
    put,
    path = "/api/checkout/condition",
    tag = CHECKOUT_TAG,
    request_body = ConditionStepDto,
    responses(
        (status = 200, description = "Draft at the photos step", body = CheckoutDraft),
        (status = 400, description = "Invalid rating, charge or missing damage description", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 409, description = "No checkout or not at the condition step", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn checkout_condition(
    State(state): State<AppState>,
    session: Session,
    Json(step): Json<ConditionStepDto>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let draft = CheckoutService::new(&state.db)
        .condition(&session, step)
        .await?;

    Ok((StatusCode::OK, Json(draft)))
}

/// Select photos uploaded for the booking to attach to the report
#[utoipa::path(
    put,
    path = "/api/checkout/photos",
    tag = CHECKOUT_TAG,
    request_body = PhotosStepDto,
    responses(
        (status = 200, description = "Draft ready for review", body = CheckoutDraft),
        (status = 400, description = "Media does not belong to the booking", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 409, description = "No checkout or not at the photos step", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn checkout_photos(
    State(state): State<AppState>,
    session: Session,
    Json(step): Json<PhotosStepDto>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let draft = CheckoutService::new(&state.db)
        .photos(&session, step.media_ids)
        .await?;

    Ok((StatusCode::OK, Json(draft)))
}

/// Go back one step
#[utoipa::path(
    post,
    path = "/api/checkout/back",
    tag = CHECKOUT_TAG,
    responses(
        (status = 200, description = "Draft at the previous step", body = CheckoutDraft),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 409, description = "No checkout in progress", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn checkout_back(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let draft = CheckoutService::new(&state.db).back(&session).await?;

    Ok((StatusCode::OK, Json(draft)))
}

/// Submit the checkout
///
/// Stores the report, updates the unit's inventory from the item checks and checks the booking
/// out.
#[utoipa::path(
    post,
    path = "/api/checkout/submit",
    tag = CHECKOUT_TAG,
    responses(
        (status = 201, description = "Report created", body = CheckoutReportDetailDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 409, description = "Steps incomplete or booking changed", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn submit_checkout(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse, Error> {
    let user = require_role(&state, &session, Role::Staff).await?;

    let report = CheckoutService::new(&state.db)
        .submit(&session, user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(report)))
}

#[utoipa::path(
    get,
    path = "/api/checkout/reports",
    tag = CHECKOUT_TAG,
    params(ListParams, CheckoutReportFilter),
    responses(
        (status = 200, description = "Page of reports", body = Paginated<CheckoutReportDto>),
        (status = 400, description = "Invalid sort column", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_reports(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListParams>,
    Query(filter): Query<CheckoutReportFilter>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let reports = CheckoutService::new(&state.db)
        .list_reports(&params, &filter)
        .await?;

    Ok((StatusCode::OK, Json(reports)))
}

/// Get a report with its item checks and photos
#[utoipa::path(
    get,
    path = "/api/checkout/reports/{id}",
    tag = CHECKOUT_TAG,
    params(("id" = i32, Path, description = "Report ID")),
    responses(
        (status = 200, description = "Report found", body = CheckoutReportDetailDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Report not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_report(
    State(state): State<AppState>,
    session: Session,
    Path(report_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let report = CheckoutService::new(&state.db).get_report(report_id).await?;

    Ok((StatusCode::OK, Json(report)))
}
