use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::{media::MediaDto, unit::UnitDto};

define_status_enum!(PropertyType {
    Apartment => "apartment",
    House => "house",
    Villa => "villa",
    Cabin => "cabin",
    Other => "other",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PropertyDto {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub description: Option<String>,
    pub property_type: PropertyType,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// A property together with its active units and images
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PropertyDetailDto {
    pub property: PropertyDto,
    pub units: Vec<UnitDto>,
    pub media: Vec<MediaDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreatePropertyDto {
    pub name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub description: Option<String>,
    pub property_type: PropertyType,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdatePropertyDto {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub description: Option<String>,
    pub property_type: Option<PropertyType>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PropertyFilter {
    pub property_type: Option<PropertyType>,
    pub city: Option<String>,
}

/// Multipart form for creating a property with images in one request.
///
/// The `property` part carries a JSON encoded [`CreatePropertyDto`], every `images` part is a file.
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct CreatePropertyForm {
    pub property: CreatePropertyDto,
    #[schema(value_type = Vec<String>, format = Binary)]
    pub images: Vec<Vec<u8>>,
}
