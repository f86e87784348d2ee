use chrono::{NaiveDate, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue};

use crate::error::TestError;

pub struct RentalFixtures<'a> {
    pub(crate) db: &'a sea_orm::DatabaseConnection,
}

impl<'a> RentalFixtures<'a> {
    /// Insert an apartment property in Lisbon created by `created_by`
    pub async fn insert_property(
        &self,
        created_by: i32,
    ) -> Result<entity::property::Model, TestError> {
        self.insert_named_property(created_by, "Harbour View", "Lisbon")
            .await
    }

    pub async fn insert_named_property(
        &self,
        created_by: i32,
        name: &str,
        city: &str,
    ) -> Result<entity::property::Model, TestError> {
        let now = Utc::now().naive_utc();

        let property = entity::property::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            address: ActiveValue::Set("1 Rua Augusta".to_string()),
            city: ActiveValue::Set(city.to_string()),
            country: ActiveValue::Set("Portugal".to_string()),
            description: ActiveValue::Set(None),
            property_type: ActiveValue::Set("apartment".to_string()),
            created_by: ActiveValue::Set(created_by),
            deleted_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(property.insert(self.db).await?)
    }

    /// Insert an available studio for up to 2 guests at 100.0 per night
    pub async fn insert_unit(&self, property_id: i32) -> Result<entity::unit::Model, TestError> {
        self.insert_unit_with_status(property_id, "available").await
    }

    pub async fn insert_unit_with_status(
        &self,
        property_id: i32,
        status: &str,
    ) -> Result<entity::unit::Model, TestError> {
        let now = Utc::now().naive_utc();

        let unit = entity::unit::ActiveModel {
            property_id: ActiveValue::Set(property_id),
            name: ActiveValue::Set("Unit 1".to_string()),
            unit_type: ActiveValue::Set("studio".to_string()),
            bedrooms: ActiveValue::Set(1),
            bathrooms: ActiveValue::Set(1),
            max_guests: ActiveValue::Set(2),
            nightly_rate: ActiveValue::Set(100.0),
            status: ActiveValue::Set(status.to_string()),
            deleted_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(unit.insert(self.db).await?)
    }

    pub async fn insert_guest(&self, email: &str) -> Result<entity::guest::Model, TestError> {
        let now = Utc::now().naive_utc();

        let guest = entity::guest::ActiveModel {
            first_name: ActiveValue::Set("Ada".to_string()),
            last_name: ActiveValue::Set("Lovelace".to_string()),
            email: ActiveValue::Set(email.to_string()),
            phone: ActiveValue::Set(None),
            nationality: ActiveValue::Set(Some("GB".to_string())),
            document_number: ActiveValue::Set(None),
            notes: ActiveValue::Set(None),
            deleted_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(guest.insert(self.db).await?)
    }

    /// Insert a booking for one guest with the given status and dates.
    ///
    /// Unit status is left untouched, tests set it explicitly when it matters.
    pub async fn insert_booking(
        &self,
        unit_id: i32,
        guest_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
        status: &str,
    ) -> Result<entity::booking::Model, TestError> {
        let now = Utc::now().naive_utc();

        let booking = entity::booking::ActiveModel {
            unit_id: ActiveValue::Set(unit_id),
            guest_id: ActiveValue::Set(guest_id),
            check_in: ActiveValue::Set(check_in),
            check_out: ActiveValue::Set(check_out),
            guests_count: ActiveValue::Set(1),
            total_amount: ActiveValue::Set(200.0),
            status: ActiveValue::Set(status.to_string()),
            notes: ActiveValue::Set(None),
            created_by: ActiveValue::Set(1),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(booking.insert(self.db).await?)
    }
}

/// Shorthand for building dates in tests
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
