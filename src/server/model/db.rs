//! Database model type aliases and their conversions into API DTOs.
//!
//! Status and type columns are stored as strings, converting a model parses them into their
//! typed enums. A value that fails to parse means the row was written outside of Roost and is
//! reported as [`Error::ParseError`].

use chrono::NaiveDate;

use crate::{
    model::{
        booking::BookingDto,
        checkout::{CheckoutReportDto, ItemCheckDto},
        guest::GuestDto,
        inventory::AssignmentDto,
        invitation::{InvitationDto, PublicInvitationDto},
        media::MediaDto,
        property::PropertyDto,
        unit::UnitDto,
        user::UserDto,
    },
    server::error::Error,
};

pub type UserModel = entity::app_user::Model;
pub type PropertyModel = entity::property::Model;
pub type UnitModel = entity::unit::Model;
pub type GuestModel = entity::guest::Model;
pub type BookingModel = entity::booking::Model;
pub type InventoryItemModel = entity::inventory_item::Model;
pub type AssignmentModel = entity::inventory_assignment::Model;
pub type CheckoutReportModel = entity::checkout_report::Model;
pub type ItemCheckModel = entity::checkout_item_check::Model;
pub type MediaModel = entity::media::Model;
pub type InvitationModel = entity::invitation::Model;

/// Parses a stored string column into its typed enum
pub fn parse_column<T>(value: &str) -> Result<T, Error>
where
    T: std::str::FromStr<Err = String>,
{
    value.parse::<T>().map_err(Error::ParseError)
}

/// Nights between two dates, zero when `check_out` is not after `check_in`
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days().max(0)
}

impl TryFrom<UserModel> for UserDto {
    type Error = Error;

    fn try_from(user: UserModel) -> Result<Self, Self::Error> {
        Ok(UserDto {
            id: user.id,
            role: parse_column(&user.role)?,
            email: user.email,
            name: user.name,
            is_active: user.is_active,
            created_at: user.created_at,
        })
    }
}

impl TryFrom<PropertyModel> for PropertyDto {
    type Error = Error;

    fn try_from(property: PropertyModel) -> Result<Self, Self::Error> {
        Ok(PropertyDto {
            id: property.id,
            property_type: parse_column(&property.property_type)?,
            name: property.name,
            address: property.address,
            city: property.city,
            country: property.country,
            description: property.description,
            created_at: property.created_at,
            updated_at: property.updated_at,
        })
    }
}

impl TryFrom<UnitModel> for UnitDto {
    type Error = Error;

    fn try_from(unit: UnitModel) -> Result<Self, Self::Error> {
        Ok(UnitDto {
            id: unit.id,
            property_id: unit.property_id,
            unit_type: parse_column(&unit.unit_type)?,
            status: parse_column(&unit.status)?,
            name: unit.name,
            bedrooms: unit.bedrooms,
            bathrooms: unit.bathrooms,
            max_guests: unit.max_guests,
            nightly_rate: unit.nightly_rate,
            created_at: unit.created_at,
            updated_at: unit.updated_at,
        })
    }
}

impl From<GuestModel> for GuestDto {
    fn from(guest: GuestModel) -> Self {
        GuestDto {
            id: guest.id,
            first_name: guest.first_name,
            last_name: guest.last_name,
            email: guest.email,
            phone: guest.phone,
            nationality: guest.nationality,
            document_number: guest.document_number,
            notes: guest.notes,
            created_at: guest.created_at,
            updated_at: guest.updated_at,
        }
    }
}

impl TryFrom<BookingModel> for BookingDto {
    type Error = Error;

    fn try_from(booking: BookingModel) -> Result<Self, Self::Error> {
        Ok(BookingDto {
            id: booking.id,
            unit_id: booking.unit_id,
            guest_id: booking.guest_id,
            nights: nights(booking.check_in, booking.check_out),
            check_in: booking.check_in,
            check_out: booking.check_out,
            guests_count: booking.guests_count,
            total_amount: booking.total_amount,
            status: parse_column(&booking.status)?,
            notes: booking.notes,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        })
    }
}

/// Converts an assignment joined with its item
pub fn assignment_dto(
    assignment: AssignmentModel,
    item_name: String,
) -> Result<AssignmentDto, Error> {
    Ok(AssignmentDto {
        id: assignment.id,
        item_id: assignment.item_id,
        item_name,
        unit_id: assignment.unit_id,
        quantity: assignment.quantity,
        condition: parse_column(&assignment.condition)?,
        updated_at: assignment.updated_at,
    })
}

impl From<CheckoutReportModel> for CheckoutReportDto {
    fn from(report: CheckoutReportModel) -> Self {
        CheckoutReportDto {
            id: report.id,
            booking_id: report.booking_id,
            inspector_id: report.inspector_id,
            cleanliness_rating: report.cleanliness_rating,
            damages_found: report.damages_found,
            damage_description: report.damage_description,
            damage_charge: report.damage_charge,
            notes: report.notes,
            completed_at: report.completed_at,
        }
    }
}

impl TryFrom<ItemCheckModel> for ItemCheckDto {
    type Error = Error;

    fn try_from(check: ItemCheckModel) -> Result<Self, Self::Error> {
        Ok(ItemCheckDto {
            id: check.id,
            assignment_id: check.assignment_id,
            expected_quantity: check.expected_quantity,
            found_quantity: check.found_quantity,
            condition: parse_column(&check.condition)?,
            notes: check.notes,
        })
    }
}

impl TryFrom<MediaModel> for MediaDto {
    type Error = Error;

    fn try_from(media: MediaModel) -> Result<Self, Self::Error> {
        Ok(MediaDto {
            id: media.id,
            owner_type: parse_column(&media.owner_type)?,
            owner_id: media.owner_id,
            url: format!("/api/media/{}/file", media.id),
            file_name: media.file_name,
            mime_type: media.mime_type,
            size_bytes: media.size_bytes,
            width: media.width,
            height: media.height,
            created_at: media.created_at,
        })
    }
}

impl TryFrom<InvitationModel> for InvitationDto {
    type Error = Error;

    fn try_from(invitation: InvitationModel) -> Result<Self, Self::Error> {
        Ok(InvitationDto {
            id: invitation.id,
            role: parse_column(&invitation.role)?,
            status: parse_column(&invitation.status)?,
            email: invitation.email,
            token: invitation.token,
            invited_by: invitation.invited_by,
            expires_at: invitation.expires_at,
            accepted_at: invitation.accepted_at,
            created_at: invitation.created_at,
        })
    }
}

impl TryFrom<InvitationModel> for PublicInvitationDto {
    type Error = Error;

    fn try_from(invitation: InvitationModel) -> Result<Self, Self::Error> {
        Ok(PublicInvitationDto {
            role: parse_column(&invitation.role)?,
            email: invitation.email,
            expires_at: invitation.expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::model::unit::{UnitStatus, UnitType};

    fn unit(status: &str) -> UnitModel {
        let now = Utc::now().naive_utc();
        UnitModel {
            id: 1,
            property_id: 1,
            name: "Loft".to_string(),
            unit_type: "studio".to_string(),
            bedrooms: 1,
            bathrooms: 1,
            max_guests: 2,
            nightly_rate: 80.0,
            status: status.to_string(),
            deleted_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Expect typed enums when stored columns hold known values
    #[test]
    fn converts_unit_with_known_columns() {
        let dto = UnitDto::try_from(unit("maintenance")).unwrap();

        assert_eq!(dto.status, UnitStatus::Maintenance);
        assert_eq!(dto.unit_type, UnitType::Studio);
    }

    /// Expect ParseError when a stored status is unknown
    #[test]
    fn rejects_unknown_status() {
        let result = UnitDto::try_from(unit("haunted"));

        assert!(matches!(result, Err(Error::ParseError(_))));
    }

    /// Expect nights to count the days between check in and check out
    #[test]
    fn counts_nights() {
        let check_in = NaiveDate::from_ymd_opt(2025, 3, 30).unwrap();
        let check_out = NaiveDate::from_ymd_opt(2025, 4, 2).unwrap();

        assert_eq!(nights(check_in, check_out), 3);
        assert_eq!(nights(check_out, check_in), 0);
    }
}
