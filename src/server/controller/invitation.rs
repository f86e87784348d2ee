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
        invitation::{
            AcceptInvitationDto, CreateInvitationDto, InvitationDto, InvitationFilter,
            PublicInvitationDto,
        },
        user::{Role, UserDto},
    },
    server::{
        controller::util::get_user::require_role,
        error::Error,
        model::{app::AppState, session::user::SessionUserId},
        service::invitation::InvitationService,
    },
};

pub static INVITATION_TAG: &str = "invitation";

/// Invite someone to join with a role
#[utoipa::path(
    post,
    path = "/api/invitations",
    tag = INVITATION_TAG,
    request_body = CreateInvitationDto,
    responses(
        (status = 201, description = "Invitation created", body = InvitationDto),
        (status = 400, description = "Invalid email", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Admin role required", body = ErrorDto),
        (status = 409, description = "Email already has an account or a pending invitation", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn create_invitation(
    State(state): State<AppState>,
    session: Session,
    Json(invitation): Json<CreateInvitationDto>,
) -> Result<impl IntoResponse, Error> {
    let admin = require_role(&state, &session, Role::Admin).await?;

    let invitation = InvitationService::new(&state.db, &state.config)
        .create(admin.id, invitation)
        .await?;

    Ok((StatusCode::CREATED, Json(invitation)))
}

/// List invitations
#[utoipa::path(
    get,
    path = "/api/invitations",
    tag = INVITATION_TAG,
    params(ListParams, InvitationFilter),
    responses(
        (status = 200, description = "Page of invitations", body = Paginated<InvitationDto>),
        (status = 400, description = "Invalid sort column", body = ErrorDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Admin role required", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn list_invitations(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<ListParams>,
    Query(filter): Query<InvitationFilter>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Admin).await?;

    let invitations = InvitationService::new(&state.db, &state.config)
        .list(&params, &filter)
        .await?;

    Ok((StatusCode::OK, Json(invitations)))
}

/// Revoke a pending invitation
#[utoipa::path(
    delete,
    path = "/api/invitations/{id}",
    tag = INVITATION_TAG,
    params(("id" = i32, Path, description = "Invitation ID")),
    responses(
        (status = 200, description = "Revoked invitation", body = InvitationDto),
        (status = 401, description = "Not logged in", body = ErrorDto),
        (status = 403, description = "Admin role required", body = ErrorDto),
        (status = 404, description = "Invitation not found", body = ErrorDto),
        (status = 409, description = "Invitation is no longer pending", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn revoke_invitation(
    State(state): State<AppState>,
    session: Session,
    Path(invitation_id): Path<i32>,
) -> Result<impl IntoResponse, Error> {
    require_role(&state, &session, Role::Admin).await?;

    let invitation = InvitationService::new(&state.db, &state.config)
        .revoke(invitation_id)
        .await?;

    Ok((StatusCode::OK, Json(invitation)))
}

/// Look up an invitation by its token, no login required
#[utoipa::path(
    get,
    path = "/api/invitations/token/{token}",
    tag = INVITATION_TAG,
    params(("token" = String, Path, description = "Invitation token")),
    responses(
        (status = 200, description = "Open invitation", body = PublicInvitationDto),
        (status = 404, description = "Unknown token", body = ErrorDto),
        (status = 409, description = "Invitation was accepted, revoked or has expired", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn lookup_invitation(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<impl IntoResponse, Error> {
    let invitation = InvitationService::new(&state.db, &state.config)
        .lookup(&token)
        .await?;

    Ok((StatusCode::OK, Json(invitation)))
}

/// Accept an invitation with an access token from the authentication provider
///
/// Creates the account with the invited role and logs it in.
#[utoipa::path(
    post,
    path = "/api/invitations/token/{token}/accept",
    tag = INVITATION_TAG,
    params(("token" = String, Path, description = "Invitation token")),
    request_body = AcceptInvitationDto,
    responses(
        (status = 201, description = "Account created and logged in", body = UserDto),
        (status = 401, description = "Access token failed verification", body = ErrorDto),
        (status = 403, description = "Access token email does not match the invitation", body = ErrorDto),
        (status = 404, description = "Unknown token", body = ErrorDto),
        (status = 409, description = "Invitation is not open or the account already exists", body = ErrorDto),
        (status = 500, description = "Internal server error", body = ErrorDto)
    ),
)]
pub async fn accept_invitation(
    State(state): State<AppState>,
    session: Session,
    Path(token): Path<String>,
    Json(accept): Json<AcceptInvitationDto>,
) -> Result<impl IntoResponse, Error> {
    let user = InvitationService::new(&state.db, &state.config)
        .accept(&token, accept)
        .await?;

    session.cycle_id().await?;
    SessionUserId::insert(&session, user.id).await?;

    Ok((StatusCode::CREATED, Json(user)))
}
