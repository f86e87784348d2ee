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
        booking::{
            BookingDetailDto, BookingDto, BookingFilter, BookingStatusDto, CreateBookingDto,
            UpdateBookingDto,
        },
        user::Role,
    },
    server::{
        controller::util::get_user::require_role, error::Error, model::app::AppState,
        service::booking::BookingService,
    },
};

pub static BOOKING_TAG: &str = "booking";

/// List bookings
///
/// `from` and `to` select bookings whose stay overlaps that window.
#[utoipa::path(
    get,
    path = "/api/bookings",
    tag = BOOKING_TAG,
    params(ListParams, BookingFilter),
    responses(
        (status = 200, description = "Page of bookings", body = Paginated<BookingDto>),
        (status = 400, description = "Invalid sort column or date window", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_bookings(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListParams>,
    Query(filter): Query<BookingFilter>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let bookings = BookingService::new(&state.db)
        .list(&params, &filter)
        .await?;

    Ok((StatusCode::OK, Json(bookings)))
}

/// Create a pending booking
///
/// `total_amount` defaults to the number of nights times the unit's nightly rate.
#[utoipa::path(
    post,
    path = "/api/bookings",
    tag = BOOKING_TAG,
    request_body = CreateBookingDto,
    responses(
        (status = 201, description = "Booking created", body = BookingDto),
        (status = 400, description = "Invalid dates or guest count", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Unit or guest not found", body = ErrorDto),
        (status = 409, description = "Unit in maintenance or already booked", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_booking(
    State(state): State<AppState>,
    session: Session,
    Json(booking): Json<CreateBookingDto>,
) -> Result<impl IntoResponse, Error> {
    let user = require_role(&state, &session, Role::Staff).await?;

    let booking = BookingService::new(&state.db)
        .create(user.id, booking)
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

/// Get a booking with its guest, unit and checkout report
#[utoipa::path(
    get,
    path = "/api/bookings/{id}",
    tag = BOOKING_TAG,
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking found", body = BookingDetailDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Booking not found", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn get_booking(
    State(state): State<AppState>,
    session: Session,
    Path(booking_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let booking = BookingService::new(&state.db).get(booking_id).await?;

    Ok((StatusCode::OK, Json(booking)))
}

/// Change the dates, guests, total or notes of a pending or confirmed booking
#[utoipa::path(
    patch,
    path = "/api/bookings/{id}",
    tag = BOOKING_TAG,
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = UpdateBookingDto,
    responses(
        (status = 200, description = "Booking updated", body = BookingDto),
        (status = 400, description = "Invalid dates or guest count", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Booking not found", body = ErrorDto),
        (status = 409, description = "Booking can no longer change or dates overlap", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn update_booking(
    State(state): State<AppState>,
    session: Session,
    Path(booking_id): Path<i32>,
    Json(update): Json<UpdateBookingDto>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let booking = BookingService::new(&state.db)
        .update(booking_id, update)
        .await?;

    Ok((StatusCode::OK, Json(booking)))
}

/// Move a booking to its next status, the unit's status follows
#[utoipa::path(
    put,
    path = "/api/bookings/{id}/status",
    tag = BOOKING_TAG,
    params(("id" = i32, Path, description = "Booking ID")),
    request_body = BookingStatusDto,
    responses(
        (status = 200, description = "Status changed", body = BookingDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Booking not found", body = ErrorDto),
        (status = 409, description = "Transition not allowed", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn change_booking_status(
    State(state): State<AppState>,
    session: Session,
    Path(booking_id): Path<i32>,
    Json(status): Json<BookingStatusDto>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let booking = BookingService::new(&state.db)
        .change_status(booking_id, status.status)
        .await?;

    Ok((StatusCode::OK, Json(booking)))
}

#[utoipa::path(
    post,
    path = "/api/bookings/{id}/cancel",
    tag = BOOKING_TAG,
    params(("id" = i32, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = BookingDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 404, description = "Booking not found", body = ErrorDto),
        (status = 409, description = "Booking is checked in or already finished", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn cancel_booking(
    State(state): State<AppState>,
    session: Session,
    Path(booking_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Staff).await?;

    let booking = BookingService::new(&state.db).cancel(booking_id).await?;

    Ok((StatusCode::OK, Json(booking)))
}
