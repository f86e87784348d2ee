use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::{guest::GuestDto, unit::UnitDto};

define_status_enum!(BookingStatus {
    Pending => "pending",
    Confirmed => "confirmed",
    CheckedIn => "checked_in",
    CheckedOut => "checked_out",
    Cancelled => "cancelled",
});

impl BookingStatus {
    /// Whether a booking may move from this status to `next`
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;

        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, CheckedIn)
                | (Confirmed, Cancelled)
                | (CheckedIn, CheckedOut)
        )
    }

    /// Bookings in these statuses hold the unit and block overlapping bookings
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            BookingStatus::Pending | BookingStatus::Confirmed | BookingStatus::CheckedIn
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BookingDto {
    pub id: i32,
    pub unit_id: i32,
    pub guest_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub guests_count: i32,
    pub total_amount: f64,
    pub status: BookingStatus,
    pub notes: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingDetailDto {
    pub booking: BookingDto,
    pub guest: GuestDto,
    pub unit: UnitDto,
    pub checkout_report_id: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateBookingDto {
    pub unit_id: i32,
    pub guest_id: i32,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub guests_count: i32,
    /// Defaults to nights multiplied by the unit's nightly rate
    pub total_amount: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateBookingDto {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub guests_count: Option<i32>,
    pub total_amount: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookingStatusDto {
    pub status: BookingStatus,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookingFilter {
    pub unit_id: Option<i32>,
    pub guest_id: Option<i32>,
    pub property_id: Option<i32>,
    pub status: Option<BookingStatus>,
    /// Only bookings that overlap `[from, to)`
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}
