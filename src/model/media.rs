use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

define_status_enum!(MediaOwnerType {
    Property => "property",
    Unit => "unit",
    Booking => "booking",
    CheckoutReport => "checkout_report",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MediaDto {
    pub id: i32,
    pub owner_type: MediaOwnerType,
    pub owner_id: i32,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    /// Path to download the stored file
    pub url: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MediaQuery {
    pub owner_type: MediaOwnerType,
    pub owner_id: i32,
}

/// Multipart form for uploading media.
///
/// `owner_type` and `owner_id` must precede the `files` parts.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct MediaUploadForm {
    pub owner_type: MediaOwnerType,
    pub owner_id: i32,
    #[schema(value_type = Vec<String>, format = Binary)]
    pub files: Vec<Vec<u8>>,
}
