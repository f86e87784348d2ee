//! Checkout inspections.
//!
//! An inspector walks through [`wizard`] steps with the draft kept in their session. Submitting
//! the draft writes the report, updates the unit's inventory from the item checks and checks
//! the booking out in a single transaction.

pub mod wizard;

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};
use tower_sessions::Session;

use crate::{
    model::{
        api::{ListParams, Paginated},
        booking::BookingStatus,
        checkout::{
            CheckoutDraft, CheckoutReportDetailDto, CheckoutReportDto, CheckoutReportFilter,
            ConditionStepDto, ExpectedItemDto, ItemCheckDto, ItemCheckInput,
        },
        media::{MediaDto, MediaOwnerType},
    },
    server::{
        data::{
            booking::BookingRepository,
            checkout::{CheckoutRepository, CHECKOUT_REPORT_SORTABLE},
            inventory::assignment::AssignmentRepository,
            media::MediaRepository,
        },
        error::{domain::DomainError, Error},
        model::{
            db::{parse_column, BookingModel},
            session::checkout::SessionCheckoutDraft,
        },
        service::booking::sync_unit_status,
        util::pagination::ListQuery,
    },
};

fn no_checkout() -> Error {
    DomainError::conflict("No checkout is in progress, start one first").into()
}

/// Conflict unless the booking is checked in and has not been inspected yet
async fn ensure_inspectable<C: sea_orm::ConnectionTrait>(
    db: &C,
    booking: &BookingModel,
) -> Result<(), Error> {
    let status: BookingStatus = parse_column(&booking.status)?;
    if status != BookingStatus::CheckedIn {
        return Err(DomainError::conflict(format!(
            "Booking {} is {}, only checked in bookings can be checked out",
            booking.id, status
        ))
        .into());
    }

    if CheckoutRepository::new(db)
        .find_by_booking(booking.id)
        .await?
        .is_some()
    {
        return Err(DomainError::conflict(format!(
            "Booking {} already has a checkout report",
            booking.id
        ))
        .into());
    }

    Ok(())
}

pub struct CheckoutService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> CheckoutService<'a> {
    /// Creates a new instance of [`CheckoutService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    async fn draft(&self, session: &Session) -> Result<CheckoutDraft, Error> {
        SessionCheckoutDraft::get(session)
            .await?
            .ok_or_else(no_checkout)
    }

    async fn save(&self, session: &Session, draft: CheckoutDraft) -> Result<CheckoutDraft, Error> {
        SessionCheckoutDraft::insert(session, &draft).await?;

        Ok(draft)
    }

    /// Starts a checkout for a checked in booking, replacing any draft in the session.
    ///
    /// The unit's current inventory assignments become the expected items.
    ///
    /// # Returns
    /// - `Ok(CheckoutDraft)` - Draft at the inventory step
    /// - `Err(DomainError::NotFound)` - No booking with `booking_id`
    /// - `Err(DomainError::Conflict)` - Booking not checked in or already inspected
    pub async fn start(&self, session: &Session, booking_id: i32) -> Result<CheckoutDraft, Error> {
        let booking = BookingRepository::new(self.db)
            .get(booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", booking_id))?;

        ensure_inspectable(self.db, &booking).await?;

        let expected = AssignmentRepository::new(self.db)
            .for_unit(booking.unit_id)
            .await?
            .into_iter()
            .map(|(assignment, item)| {
                Ok(ExpectedItemDto {
                    assignment_id: assignment.id,
                    item_id: assignment.item_id,
                    item_name: item.map(|item| item.name).unwrap_or_default(),
                    expected_quantity: assignment.quantity,
                    condition: parse_column(&assignment.condition)?,
                })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        let draft = wizard::new_draft(
            booking.id,
            booking.unit_id,
            expected,
            Utc::now().naive_utc(),
        );

        tracing::debug!(
            "Started checkout of booking ID {} with {} expected item(s)",
            booking.id,
            draft.expected.len()
        );

        self.save(session, draft).await
    }

    /// Current draft of the session
    pub async fn get(&self, session: &Session) -> Result<CheckoutDraft, Error> {
        SessionCheckoutDraft::get(session)
            .await?
            .ok_or_else(|| DomainError::NotFound("No checkout is in progress".to_string()).into())
    }

    pub async fn inventory(
        &self,
        session: &Session,
        checks: Vec<ItemCheckInput>,
    ) -> Result<CheckoutDraft, Error> {
        let draft = wizard::apply_inventory(self.draft(session).await?, checks)?;

        self.save(session, draft).await
    }

    pub async fn condition(
        &self,
        session: &Session,
        condition: ConditionStepDto,
    ) -> Result<CheckoutDraft, Error> {
        let draft = wizard::apply_condition(self.draft(session).await?, condition)?;

        self.save(session, draft).await
    }

    /// Selects photos of the booking to attach to the report
    pub async fn photos(
        &self,
        session: &Session,
        media_ids: Vec<i32>,
    ) -> Result<CheckoutDraft, Error> {
        let draft = self.draft(session).await?;

        let requested: HashSet<i32> = media_ids.iter().copied().collect();
        let owned = MediaRepository::new(self.db)
            .find_for_owner(MediaOwnerType::Booking, draft.booking_id, &media_ids)
            .await?;

        if owned.len() != requested.len() {
            let owned: HashSet<i32> = owned.iter().map(|media| media.id).collect();
            let mut foreign: Vec<i32> = requested.difference(&owned).copied().collect();
            foreign.sort_unstable();

            return Err(DomainError::validation(format!(
                "media_ids: {:?} do not belong to booking {}",
                foreign, draft.booking_id
            ))
            .into());
        }

        let draft = wizard::apply_photos(draft, media_ids)?;

        self.save(session, draft).await
    }

    pub async fn back(&self, session: &Session) -> Result<CheckoutDraft, Error> {
        let draft = wizard::back(self.draft(session).await?);

        self.save(session, draft).await
    }

    /// Discards the draft, does nothing when no checkout is in progress
    pub async fn cancel(&self, session: &Session) -> Result<(), Error> {
        SessionCheckoutDraft::remove(session).await?;

        Ok(())
    }

    /// Writes the report and checks the booking out.
    ///
    /// In one transaction: creates the report and its item checks, sets each assignment to the
    /// found quantity and condition, moves the selected photos to the report, checks the booking
    /// out and updates the unit. The draft is removed once committed.
    ///
    /// # Returns
    /// - `Ok(CheckoutReportDetailDto)` - The stored report
    /// - `Err(DomainError::Conflict)` - No draft, steps incomplete, or the booking, inventory or
    ///   photos changed since the checkout started
    pub async fn submit(
        &self,
        session: &Session,
        inspector_id: i32,
    ) -> Result<CheckoutReportDetailDto, Error> {
        let draft = self.draft(session).await?;
        let (checks, condition) = wizard::ready_to_submit(&draft)?;

        let txn = self.db.begin().await?;
        let booking_repo = BookingRepository::new(&txn);
        let checkout_repo = CheckoutRepository::new(&txn);
        let assignment_repo = AssignmentRepository::new(&txn);
        let media_repo = MediaRepository::new(&txn);

        let booking = booking_repo
            .get(draft.booking_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Booking", draft.booking_id))?;
        ensure_inspectable(&txn, &booking).await?;

        let report = checkout_repo
            .create_report(booking.id, inspector_id, condition, Utc::now().naive_utc())
            .await?;

        let mut item_checks = Vec::with_capacity(checks.len());
        for check in checks {
            let assignment = assignment_repo
                .get(check.assignment_id)
                .await?
                .ok_or_else(|| {
                    DomainError::conflict(format!(
                        "Assignment {} was removed after the checkout started",
                        check.assignment_id
                    ))
                })?;
            let expected = wizard::expected_quantity(&draft, assignment.id)
                .unwrap_or(assignment.quantity);

            item_checks.push(checkout_repo.create_check(report.id, expected, check).await?);
            assignment_repo
                .update(assignment, Some(check.found_quantity), Some(check.condition))
                .await?;
        }

        let photos = media_repo
            .find_for_owner(MediaOwnerType::Booking, booking.id, &draft.media_ids)
            .await?;
        if photos.len() != draft.media_ids.len() {
            return Err(DomainError::conflict(
                "Selected photos changed after they were chosen, select them again",
            )
            .into());
        }
        media_repo
            .reassign(&draft.media_ids, MediaOwnerType::CheckoutReport, report.id)
            .await?;

        let booking = booking_repo
            .set_status(booking, BookingStatus::CheckedOut)
            .await?;
        sync_unit_status(&txn, booking.unit_id).await?;

        txn.commit().await?;

        SessionCheckoutDraft::remove(session).await?;

        tracing::info!(
            "User ID {} checked out booking ID {} with report ID {}",
            inspector_id,
            booking.id,
            report.id
        );

        self.report_detail(report).await
    }

    pub async fn list_reports(
        &self,
        params: &ListParams,
        filter: &CheckoutReportFilter,
    ) -> Result<Paginated<CheckoutReportDto>, Error> {
        let query = ListQuery::from_params(
            params,
            CHECKOUT_REPORT_SORTABLE,
            entity::checkout_report::Column::CreatedAt,
        )?;

        Ok(CheckoutRepository::new(self.db)
            .list(&query, filter)
            .await?
            .map(CheckoutReportDto::from))
    }

    /// Gets a report with its item checks and photos
    pub async fn get_report(&self, report_id: i32) -> Result<CheckoutReportDetailDto, Error> {
        let report = CheckoutRepository::new(self.db)
            .get(report_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Checkout report", report_id))?;

        self.report_detail(report).await
    }

    async fn report_detail(
        &self,
        report: entity::checkout_report::Model,
    ) -> Result<CheckoutReportDetailDto, Error> {
        let checks = CheckoutRepository::new(self.db)
            .checks_for_report(report.id)
            .await?
            .into_iter()
            .map(ItemCheckDto::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        let media = MediaRepository::new(self.db)
            .list_by_owner(MediaOwnerType::CheckoutReport, report.id)
            .await?
            .into_iter()
            .map(MediaDto::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CheckoutReportDetailDto {
            report: CheckoutReportDto::from(report),
            checks,
            media,
        })
    }
}
