use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
};

use crate::{
    model::{
        api::Paginated,
        booking::{BookingFilter, BookingStatus, CreateBookingDto, UpdateBookingDto},
    },
    server::util::pagination::{fetch_page, ListQuery},
};

use entity::booking::Column;

pub const BOOKING_SORTABLE: &[(&str, Column)] = &[
    ("check_in", Column::CheckIn),
    ("check_out", Column::CheckOut),
    ("status", Column::Status),
    ("total_amount", Column::TotalAmount),
    ("created_at", Column::CreatedAt),
];

/// Statuses that hold a unit
fn active_statuses() -> Vec<&'static str> {
    BookingStatus::ALL
        .iter()
        .filter(|status| status.is_active())
        .map(|status| status.as_str())
        .collect()
}

pub struct BookingRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> BookingRepository<'a, C> {
    /// Creates a new instance of [`BookingRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates a pending booking
    pub async fn create(
        &self,
        booking: &CreateBookingDto,
        total_amount: f64,
        created_by: i32,
    ) -> Result<entity::booking::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let booking = entity::booking::ActiveModel {
            unit_id: ActiveValue::Set(booking.unit_id),
            guest_id: ActiveValue::Set(booking.guest_id),
            check_in: ActiveValue::Set(booking.check_in),
            check_out: ActiveValue::Set(booking.check_out),
            guests_count: ActiveValue::Set(booking.guests_count),
            total_amount: ActiveValue::Set(total_amount),
            status: ActiveValue::Set(BookingStatus::Pending.as_str().to_string()),
            notes: ActiveValue::Set(booking.notes.clone()),
            created_by: ActiveValue::Set(created_by),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        booking.insert(self.db).await
    }

    pub async fn get(&self, booking_id: i32) -> Result<Option<entity::booking::Model>, DbErr> {
        entity::prelude::Booking::find_by_id(booking_id)
            .one(self.db)
            .await
    }

    /// Lists bookings.
    ///
    /// The `from`/`to` window keeps bookings whose stay overlaps `[from, to)`, either bound
    /// may be omitted.
    pub async fn list(
        &self,
        query: &ListQuery<Column>,
        filter: &BookingFilter,
    ) -> Result<Paginated<entity::booking::Model>, DbErr> {
        let mut select = entity::prelude::Booking::find();

        if let Some(unit_id) = filter.unit_id {
            select = select.filter(Column::UnitId.eq(unit_id));
        }
        if let Some(guest_id) = filter.guest_id {
            select = select.filter(Column::GuestId.eq(guest_id));
        }
        if let Some(property_id) = filter.property_id {
            select = select
                .join(
                    sea_orm::JoinType::InnerJoin,
                    entity::booking::Relation::Unit.def(),
                )
                .filter(entity::unit::Column::PropertyId.eq(property_id));
        }
        if let Some(status) = filter.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }
        if let Some(from) = filter.from {
            select = select.filter(Column::CheckOut.gt(from));
        }
        if let Some(to) = filter.to {
            select = select.filter(Column::CheckIn.lt(to));
        }

        let select = select
            .order_by(query.sort, query.order.clone())
            .order_by_asc(Column::Id);

        fetch_page(self.db, select, query.page, query.per_page).await
    }

    /// Finds a booking of the unit, other than `exclude_id`, that is not cancelled and
    /// overlaps `[check_in, check_out)`
    pub async fn find_overlapping(
        &self,
        unit_id: i32,
        check_in: NaiveDate,
        check_out: NaiveDate,
        exclude_id: Option<i32>,
    ) -> Result<Option<entity::booking::Model>, DbErr> {
        let mut select = entity::prelude::Booking::find()
            .filter(Column::UnitId.eq(unit_id))
            .filter(Column::Status.ne(BookingStatus::Cancelled.as_str()))
            .filter(Column::CheckIn.lt(check_out))
            .filter(Column::CheckOut.gt(check_in));

        if let Some(exclude_id) = exclude_id {
            select = select.filter(Column::Id.ne(exclude_id));
        }

        select.order_by_asc(Column::CheckIn).one(self.db).await
    }

    /// Pending, confirmed and checked in bookings of a unit
    pub async fn active_for_unit(&self, unit_id: i32) -> Result<Vec<entity::booking::Model>, DbErr> {
        entity::prelude::Booking::find()
            .filter(Column::UnitId.eq(unit_id))
            .filter(Column::Status.is_in(active_statuses()))
            .order_by_asc(Column::CheckIn)
            .all(self.db)
            .await
    }

    /// Whether the unit has a pending, confirmed or checked in booking
    pub async fn has_active_for_unit(&self, unit_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::Booking::find()
            .filter(Column::UnitId.eq(unit_id))
            .filter(Column::Status.is_in(active_statuses()))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Whether the guest has a pending, confirmed or checked in booking
    pub async fn has_active_for_guest(&self, guest_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::Booking::find()
            .filter(Column::GuestId.eq(guest_id))
            .filter(Column::Status.is_in(active_statuses()))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Booking history of a guest, most recent stay first
    pub async fn for_guest(&self, guest_id: i32) -> Result<Vec<entity::booking::Model>, DbErr> {
        entity::prelude::Booking::find()
            .filter(Column::GuestId.eq(guest_id))
            .order_by_desc(Column::CheckIn)
            .order_by_asc(Column::Id)
            .all(self.db)
            .await
    }

    /// Applies an update whose dates and total were already resolved by the caller
    pub async fn update(
        &self,
        booking: entity::booking::Model,
        update: &UpdateBookingDto,
        total_amount: f64,
    ) -> Result<entity::booking::Model, DbErr> {
        let mut booking_am = booking.into_active_model();

        if let Some(check_in) = update.check_in {
            booking_am.check_in = ActiveValue::Set(check_in);
        }
        if let Some(check_out) = update.check_out {
            booking_am.check_out = ActiveValue::Set(check_out);
        }
        if let Some(guests_count) = update.guests_count {
            booking_am.guests_count = ActiveValue::Set(guests_count);
        }
        if let Some(notes) = &update.notes {
            booking_am.notes = ActiveValue::Set(Some(notes.clone()));
        }
        booking_am.total_amount = ActiveValue::Set(total_amount);
        booking_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        booking_am.update(self.db).await
    }

    pub async fn set_status(
        &self,
        booking: entity::booking::Model,
        status: BookingStatus,
    ) -> Result<entity::booking::Model, DbErr> {
        let mut booking_am = booking.into_active_model();
        booking_am.status = ActiveValue::Set(status.as_str().to_string());
        booking_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        booking_am.update(self.db).await
    }
}

#[cfg(test)]
mod tests {
    mod find_overlapping {
        use roost_test_utils::prelude::*;

        use crate::server::data::booking::BookingRepository;

        /// Expect back to back stays not to overlap since ranges are half open
        #[tokio::test]
        async fn allows_back_to_back_stays() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let property = test.rental().insert_property(admin.id).await?;
            let unit = test.rental().insert_unit(property.id).await?;
            let guest = test.rental().insert_guest("ada@example.com").await?;
            test.rental()
                .insert_booking(unit.id, guest.id, date(2025, 6, 1), date(2025, 6, 5), "confirmed")
                .await?;

            let repo = BookingRepository::new(&test.db);

            let after = repo
                .find_overlapping(unit.id, date(2025, 6, 5), date(2025, 6, 8), None)
                .await?;
            let before = repo
                .find_overlapping(unit.id, date(2025, 5, 28), date(2025, 6, 1), None)
                .await?;

            assert!(after.is_none());
            assert!(before.is_none());

            Ok(())
        }

        /// Expect an overlapping stay to be found
        #[tokio::test]
        async fn finds_overlap() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let property = test.rental().insert_property(admin.id).await?;
            let unit = test.rental().insert_unit(property.id).await?;
            let guest = test.rental().insert_guest("ada@example.com").await?;
            let booking = test
                .rental()
                .insert_booking(unit.id, guest.id, date(2025, 6, 1), date(2025, 6, 5), "pending")
                .await?;

            let repo = BookingRepository::new(&test.db);
            let found = repo
                .find_overlapping(unit.id, date(2025, 6, 4), date(2025, 6, 6), None)
                .await?;

            assert_eq!(found.map(|b| b.id), Some(booking.id));

            Ok(())
        }

        /// Expect cancelled bookings and the excluded booking to be ignored
        #[tokio::test]
        async fn ignores_cancelled_and_excluded() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let property = test.rental().insert_property(admin.id).await?;
            let unit = test.rental().insert_unit(property.id).await?;
            let guest = test.rental().insert_guest("ada@example.com").await?;
            test.rental()
                .insert_booking(unit.id, guest.id, date(2025, 6, 1), date(2025, 6, 5), "cancelled")
                .await?;
            let own = test
                .rental()
                .insert_booking(unit.id, guest.id, date(2025, 6, 10), date(2025, 6, 12), "pending")
                .await?;

            let repo = BookingRepository::new(&test.db);

            assert!(repo
                .find_overlapping(unit.id, date(2025, 6, 2), date(2025, 6, 3), None)
                .await?
                .is_none());
            assert!(repo
                .find_overlapping(unit.id, date(2025, 6, 10), date(2025, 6, 11), Some(own.id))
                .await?
                .is_none());

            Ok(())
        }
    }

    mod list {
        use roost_test_utils::prelude::*;

        use crate::{
            model::{api::ListParams, booking::BookingFilter},
            server::{
                data::booking::{BookingRepository, BOOKING_SORTABLE},
                util::pagination::ListQuery,
            },
        };

        /// Expect the property filter to only return bookings of units in that property
        #[tokio::test]
        async fn filters_by_property() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let property = test.rental().insert_property(admin.id).await?;
            let other = test.rental().insert_property(admin.id).await?;
            let unit = test.rental().insert_unit(property.id).await?;
            let other_unit = test.rental().insert_unit(other.id).await?;
            let guest = test.rental().insert_guest("ada@example.com").await?;
            let booking = test
                .rental()
                .insert_booking(unit.id, guest.id, date(2025, 6, 1), date(2025, 6, 5), "pending")
                .await?;
            test.rental()
                .insert_booking(other_unit.id, guest.id, date(2025, 6, 1), date(2025, 6, 5), "pending")
                .await?;

            let query = ListQuery::from_params(
                &ListParams::default(),
                BOOKING_SORTABLE,
                entity::booking::Column::CreatedAt,
            )
            .unwrap();
            let filter = BookingFilter {
                property_id: Some(property.id),
                ..Default::default()
            };

            let page = BookingRepository::new(&test.db).list(&query, &filter).await?;

            assert_eq!(page.total, 1);
            assert_eq!(page.items[0].id, booking.id);

            Ok(())
        }

        /// Expect the date window to keep only stays overlapping it
        #[tokio::test]
        async fn filters_by_date_window() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let property = test.rental().insert_property(admin.id).await?;
            let unit = test.rental().insert_unit(property.id).await?;
            let guest = test.rental().insert_guest("ada@example.com").await?;
            test.rental()
                .insert_booking(unit.id, guest.id, date(2025, 6, 1), date(2025, 6, 5), "pending")
                .await?;
            let july = test
                .rental()
                .insert_booking(unit.id, guest.id, date(2025, 7, 1), date(2025, 7, 5), "pending")
                .await?;

            let query = ListQuery::from_params(
                &ListParams::default(),
                BOOKING_SORTABLE,
                entity::booking::Column::CreatedAt,
            )
            .unwrap();
            let filter = BookingFilter {
                from: Some(date(2025, 6, 5)),
                to: Some(date(2025, 7, 2)),
                ..Default::default()
            };

            let page = BookingRepository::new(&test.db).list(&query, &filter).await?;

            assert_eq!(page.total, 1);
            assert_eq!(page.items[0].id, july.id);

            Ok(())
        }
    }
}
