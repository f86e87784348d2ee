use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::booking::BookingStatus;

define_status_enum!(UnitType {
    Room => "room",
    Studio => "studio",
    Apartment => "apartment",
    Suite => "suite",
    Other => "other",
});

define_status_enum!(UnitStatus {
    Available => "available",
    Reserved => "reserved",
    Occupied => "occupied",
    Maintenance => "maintenance",
});

impl UnitStatus {
    /// Unit status implied by a booking entering `status`
    pub fn for_booking_status(status: BookingStatus) -> UnitStatus {
        match status {
            BookingStatus::Pending | BookingStatus::Confirmed => UnitStatus::Reserved,
            BookingStatus::CheckedIn => UnitStatus::Occupied,
            BookingStatus::CheckedOut | BookingStatus::Cancelled => UnitStatus::Available,
        }
    }

    /// Statuses staff may set by hand, everything else follows the unit's bookings
    pub fn is_manual(&self) -> bool {
        matches!(self, UnitStatus::Available | UnitStatus::Maintenance)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UnitDto {
    pub id: i32,
    pub property_id: i32,
    pub name: String,
    pub unit_type: UnitType,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub max_guests: i32,
    pub nightly_rate: f64,
    pub status: UnitStatus,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateUnitDto {
    pub property_id: i32,
    pub name: String,
    pub unit_type: UnitType,
    pub bedrooms: i32,
    pub bathrooms: i32,
    pub max_guests: i32,
    pub nightly_rate: f64,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateUnitDto {
    pub name: Option<String>,
    pub unit_type: Option<UnitType>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub max_guests: Option<i32>,
    pub nightly_rate: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UnitStatusDto {
    pub status: UnitStatus,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UnitFilter {
    pub status: Option<UnitStatus>,
}
