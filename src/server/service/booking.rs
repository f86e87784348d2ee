//! Bookings and the unit statuses that follow them.

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        api::{ListParams, Paginated},
        booking::{
            BookingDetailDto, BookingDto, BookingFilter, BookingStatus, CreateBookingDto,
            UpdateBookingDto,
        },
        guest::GuestDto,
        unit::{UnitDto, UnitStatus},
    },
    server::{
        data::{
            booking::{BookingRepository, BOOKING_SORTABLE},
            checkout::CheckoutRepository,
            guest::GuestRepository,
            unit::UnitRepository,
        },
        error::{domain::DomainError, Error},
        model::db::{nights, parse_column, UnitModel},
        util::{
            pagination::ListQuery,
            validate::{amount, at_least, optional_text},
        },
    },
};

/// Derives a unit's status from its active bookings and stores it.
///
/// A checked in booking makes the unit occupied, otherwise a pending or confirmed booking makes
/// it reserved, otherwise it is available. Units in maintenance are left untouched.
///
/// # Returns
/// - `Ok(Some(UnitStatus))` - Status of the unit afterwards
/// - `Ok(None)` - No unit with `unit_id`
pub async fn sync_unit_status<C: ConnectionTrait>(
    db: &C,
    unit_id: i32,
) -> Result<Option<UnitStatus>, Error> {
    let unit_repo = UnitRepository::new(db);

    let Some(unit) = unit_repo.find_by_id(unit_id).await? else {
        return Ok(None);
    };

    let current: UnitStatus = parse_column(&unit.status)?;
    if current == UnitStatus::Maintenance {
        return Ok(Some(current));
    }

    let mut target = UnitStatus::Available;
    for booking in BookingRepository::new(db).active_for_unit(unit_id).await? {
        let status: BookingStatus = parse_column(&booking.status)?;

        match UnitStatus::for_booking_status(status) {
            UnitStatus::Occupied => target = UnitStatus::Occupied,
            UnitStatus::Reserved if target == UnitStatus::Available => {
                target = UnitStatus::Reserved
            }
            _ => {}
        }
    }

    if target != current {
        unit_repo.set_status(unit, target).await?;

        tracing::debug!("Unit ID {} is now {}", unit_id, target);
    }

    Ok(Some(target))
}

/// Checks a stay against the unit and the unit's other bookings
async fn validate_stay<C: ConnectionTrait>(
    db: &C,
    unit: &UnitModel,
    check_in: NaiveDate,
    check_out: NaiveDate,
    guests_count: i32,
    exclude_id: Option<i32>,
) -> Result<(), Error> {
    if check_out <= check_in {
        return Err(DomainError::validation("check_out: must be after check_in").into());
    }

    at_least("guests_count", guests_count, 1)?;
    if guests_count > unit.max_guests {
        return Err(DomainError::validation(format!(
            "guests_count: unit {} sleeps at most {} guests",
            unit.id, unit.max_guests
        ))
        .into());
    }

    let unit_status: UnitStatus = parse_column(&unit.status)?;
    if unit_status == UnitStatus::Maintenance {
        return Err(DomainError::conflict(format!("Unit {} is under maintenance", unit.id)).into());
    }

    if let Some(existing) = BookingRepository::new(db)
        .find_overlapping(unit.id, check_in, check_out, exclude_id)
        .await?
    {
        return Err(DomainError::conflict(format!(
            "Unit {} is already booked from {} to {} (booking {})",
            unit.id, existing.check_in, existing.check_out, existing.id
        ))
        .into());
    }

    Ok(())
}

fn default_total(unit: &UnitModel, check_in: NaiveDate, check_out: NaiveDate) -> f64 {
    nights(check_in, check_out) as f64 * unit.nightly_rate
}

pub struct BookingService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> BookingService<'a> {
    /// Creates a new instance of [`BookingService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find(&self, booking_id: i32) -> Result<entity::booking::Model, Error> {
        Ok(BookingRepository::new(self.db)
            .get(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", booking_id))?)
    }

    pub async fn list(
        &self,
        params: &ListParams,
        filter: &BookingFilter,
    ) -> Result<Paginated<BookingDto>, Error> {
        let query =
            ListQuery::from_params(params, BOOKING_SORTABLE, entity::booking::Column::CreatedAt)?;

        if let (Some(from), Some(to)) = (filter.from, filter.to) {
            if to <= from {
                return Err(DomainError::validation("to: must be after from").into());
            }
        }

        BookingRepository::new(self.db)
            .list(&query, filter)
            .await?
            .try_map(BookingDto::try_from)
    }

    /// Gets a booking with its guest, unit and checkout report ID
    pub async fn get(&self, booking_id: i32) -> Result<BookingDetailDto, Error> {
        let booking = self.find(booking_id).await?;

        let guest = GuestRepository::new(self.db)
            .find_by_id(booking.guest_id)
            .await?
            .ok_or_else(|| {
                Error::InternalError(format!(
                    "Guest ID {} of booking ID {} is missing",
                    booking.guest_id, booking.id
                ))
            })?;
        let unit = UnitRepository::new(self.db)
            .find_by_id(booking.unit_id)
            .await?
            .ok_or_else(|| {
                Error::InternalError(format!(
                    "Unit ID {} of booking ID {} is missing",
                    booking.unit_id, booking.id
                ))
            })?;
        let report = CheckoutRepository::new(self.db)
            .find_by_booking(booking.id)
            .await?;

        Ok(BookingDetailDto {
            booking: BookingDto::try_from(booking)?,
            guest: GuestDto::from(guest),
            unit: UnitDto::try_from(unit)?,
            checkout_report_id: report.map(|r| r.id),
        })
    }

    /// Creates a pending booking and reserves the unit.
    ///
    /// `total_amount` defaults to nights times the unit's nightly rate.
    ///
    /// # Returns
    /// - `Ok(BookingDto)` - The pending booking
    /// - `Err(DomainError::Validation)` - Dates out of order or guest count out of range
    /// - `Err(DomainError::NotFound)` - Unit or guest missing
    /// - `Err(DomainError::Conflict)` - Unit in maintenance or already booked for those dates
    pub async fn create(
        &self,
        created_by: i32,
        booking: CreateBookingDto,
    ) -> Result<BookingDto, Error> {
        let total_amount = booking
            .total_amount
            .map(|total| amount("total_amount", total))
            .transpose()?;
        let booking = CreateBookingDto {
            notes: optional_text(booking.notes),
            ..booking
        };

        let txn = self.db.begin().await?;

        let unit = UnitRepository::new(&txn)
            .get(booking.unit_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Unit", booking.unit_id))?;
        GuestRepository::new(&txn)
            .get(booking.guest_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Guest", booking.guest_id))?;

        validate_stay(
            &txn,
            &unit,
            booking.check_in,
            booking.check_out,
            booking.guests_count,
            None,
        )
        .await?;

        let total_amount = total_amount
            .unwrap_or_else(|| default_total(&unit, booking.check_in, booking.check_out));

        let created = BookingRepository::new(&txn)
            .create(&booking, total_amount, created_by)
            .await?;
        sync_unit_status(&txn, unit.id).await?;

        txn.commit().await?;

        tracing::info!(
            "User ID {} created booking ID {} for unit ID {}",
            created_by,
            created.id,
            created.unit_id
        );

        BookingDto::try_from(created)
    }

    /// Changes dates, guest count, total or notes of a pending or confirmed booking.
    ///
    /// When dates change and no total is given the total is recalculated. The availability
    /// checks and the write share one transaction.
    pub async fn update(
        &self,
        booking_id: i32,
        update: UpdateBookingDto,
    ) -> Result<BookingDto, Error> {
        let txn = self.db.begin().await?;
        let booking_repo = BookingRepository::new(&txn);

        let booking = booking_repo
            .get(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", booking_id))?;

        let status: BookingStatus = parse_column(&booking.status)?;
        if !matches!(status, BookingStatus::Pending | BookingStatus::Confirmed) {
            return Err(DomainError::conflict(format!(
                "Booking {} is {} and can no longer be changed",
                booking.id, status
            ))
            .into());
        }

        let unit = UnitRepository::new(self.db)
            .find_by_id(booking.unit_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Unit", booking.unit_id))?;

        let check_in = update.check_in.unwrap_or(booking.check_in);
        let check_out = update.check_out.unwrap_or(booking.check_out);
        let guests_count = update.guests_count.unwrap_or(booking.guests_count);

        validate_stay(
            &txn,
            &unit,
            check_in,
            check_out,
            guests_count,
            Some(booking.id),
        )
        .await?;

        let dates_changed = check_in != booking.check_in || check_out != booking.check_out;
        let total_amount = match update.total_amount {
            Some(total) => amount("total_amount", total)?,
            None if dates_changed => default_total(&unit, check_in, check_out),
            None => booking.total_amount,
        };

        let updated = booking_repo.update(booking, &update, total_amount).await?;

        txn.commit().await?;

        tracing::info!("Updated booking ID {}", updated.id);

        BookingDto::try_from(updated)
    }

    /// Moves a booking to `next` and updates its unit in one transaction.
    ///
    /// # Returns
    /// - `Ok(BookingDto)` - Booking with its new status
    /// - `Err(DomainError::NotFound)` - No booking with `booking_id`
    /// - `Err(DomainError::Conflict)` - The transition is not allowed
    pub async fn change_status(
        &self,
        booking_id: i32,
        next: BookingStatus,
    ) -> Result<BookingDto, Error> {
        let txn = self.db.begin().await?;
        let booking_repo = BookingRepository::new(&txn);

        let booking = booking_repo
            .get(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", booking_id))?;

        let current: BookingStatus = parse_column(&booking.status)?;
        if !current.can_transition_to(next) {
            return Err(DomainError::conflict(format!(
                "Booking {} cannot go from {} to {}",
                booking.id, current, next
            ))
            .into());
        }

        let updated = booking_repo.set_status(booking, next).await?;
        sync_unit_status(&txn, updated.unit_id).await?;

        txn.commit().await?;

        tracing::info!("Booking ID {} moved from {} to {}", updated.id, current, next);

        BookingDto::try_from(updated)
    }

    pub async fn cancel(&self, booking_id: i32) -> Result<BookingDto, Error> {
        self.change_status(booking_id, BookingStatus::Cancelled)
            .await
    }
}
