//! HTTP routing and OpenAPI documentation configuration.
//!
//! Every API endpoint is registered here with its OpenAPI documentation, and Swagger UI is
//! served at `/api/docs` with the document at `/api/docs/openapi.json`.

use axum::{extract::DefaultBodyLimit, Router};
use utoipa::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use utoipa_swagger_ui::SwaggerUi;

use crate::server::{controller, model::app::AppState};

/// Files accepted in a single multipart request
pub const MAX_FILES_PER_REQUEST: usize = 10;

/// Room for multipart boundaries, part headers and text fields
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Builds the application's HTTP router with all API endpoints and Swagger UI documentation.
///
/// `max_upload_bytes` bounds each uploaded file, request bodies are limited to
/// [`MAX_FILES_PER_REQUEST`] such files.
///
/// # Returns
/// An Axum `Router<AppState>` with all routes registered, the session layer is added by the
/// caller.
pub fn routes(max_upload_bytes: usize) -> Router<AppState> {
    #[derive(OpenApi)]
    #[openapi(info(title = "Roost", description = "Roost property and rental management API"), tags(
        (name = controller::auth::AUTH_TAG, description = "Session login and logout"),
        (name = controller::user::USER_TAG, description = "User administration"),
        (name = controller::invitation::INVITATION_TAG, description = "Invitations to join"),
        (name = controller::property::PROPERTY_TAG, description = "Properties"),
        (name = controller::unit::UNIT_TAG, description = "Rentable units of a property"),
        (name = controller::guest::GUEST_TAG, description = "Guests"),
        (name = controller::booking::BOOKING_TAG, description = "Bookings and their statuses"),
        (name = controller::inventory::INVENTORY_TAG, description = "Inventory items and unit assignments"),
        (name = controller::checkout::CHECKOUT_TAG, description = "Checkout inspections"),
        (name = controller::media::MEDIA_TAG, description = "Image uploads"),
    ))]
    struct ApiDoc;

    let body_limit = max_upload_bytes
        .saturating_mul(MAX_FILES_PER_REQUEST)
        .saturating_add(MULTIPART_OVERHEAD_BYTES);

    let (routes, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .routes(routes!(controller::auth::login))
        .routes(routes!(controller::auth::get_user))
        .routes(routes!(controller::auth::logout))
        .routes(routes!(controller::user::list_users))
        .routes(routes!(controller::user::update_user))
        .routes(routes!(
            controller::invitation::create_invitation,
            controller::invitation::list_invitations
        ))
        .routes(routes!(controller::invitation::revoke_invitation))
        .routes(routes!(controller::invitation::lookup_invitation))
        .routes(routes!(controller::invitation::accept_invitation))
        .routes(routes!(
            controller::property::list_properties,
            controller::property::create_property
        ))
        .routes(routes!(controller::property::create_property_with_images))
        .routes(routes!(
            controller::property::get_property,
            controller::property::update_property,
            controller::property::delete_property
        ))
        .routes(routes!(controller::unit::list_units))
        .routes(routes!(controller::unit::create_unit))
        .routes(routes!(
            controller::unit::get_unit,
            controller::unit::update_unit,
            controller::unit::delete_unit
        ))
        .routes(routes!(controller::unit::set_unit_status))
        .routes(routes!(controller::unit::get_unit_inventory))
        .routes(routes!(
            controller::guest::list_guests,
            controller::guest::create_guest
        ))
        .routes(routes!(
            controller::guest::get_guest,
            controller::guest::update_guest,
            controller::guest::delete_guest
        ))
        .routes(routes!(
            controller::booking::list_bookings,
            controller::booking::create_booking
        ))
        .routes(routes!(
            controller::booking::get_booking,
            controller::booking::update_booking
        ))
        .routes(routes!(controller::booking::change_booking_status))
        .routes(routes!(controller::booking::cancel_booking))
        .routes(routes!(
            controller::inventory::list_items,
            controller::inventory::create_item
        ))
        .routes(routes!(
            controller::inventory::get_item,
            controller::inventory::update_item,
            controller::inventory::delete_item
        ))
        .routes(routes!(controller::inventory::create_assignment))
        .routes(routes!(
            controller::inventory::update_assignment,
            controller::inventory::delete_assignment
        ))
        .routes(routes!(
            controller::checkout::get_checkout,
            controller::checkout::cancel_checkout
        ))
        .routes(routes!(controller::checkout::start_checkout))
        .routes(routes!(controller::checkout::checkout_inventory))
        .routes(routes!(controller::checkout::checkout_condition))
        .routes(routes!(controller::checkout::checkout_photos))
        .routes(routes!(controller::checkout::checkout_back))
        .routes(routes!(controller::checkout::submit_checkout))
        .routes(routes!(controller::checkout::list_reports))
        .routes(routes!(controller::checkout::get_report))
        .routes(routes!(
            controller::media::upload_media,
            controller::media::list_media
        ))
        .routes(routes!(
            controller::media::get_media,
            controller::media::delete_media
        ))
        .routes(routes!(controller::media::download_media))
        .split_for_parts();

    routes
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", api))
        .layer(DefaultBodyLimit::max(body_limit))
}
