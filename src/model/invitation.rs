use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::user::Role;

define_status_enum!(InvitationStatus {
    Pending => "pending",
    Accepted => "accepted",
    Revoked => "revoked",
    Expired => "expired",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InvitationDto {
    pub id: i32,
    pub email: String,
    pub role: Role,
    pub token: String,
    pub status: InvitationStatus,
    pub invited_by: i32,
    pub expires_at: NaiveDateTime,
    pub accepted_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

/// What an invitee sees before accepting, without the token or inviter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PublicInvitationDto {
    pub email: String,
    pub role: Role,
    pub expires_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateInvitationDto {
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AcceptInvitationDto {
    /// Access token issued by the authentication provider for the invitee
    pub access_token: String,
    pub name: String,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InvitationFilter {
    pub status: Option<InvitationStatus>,
}
