use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::{
    model::{
        api::{ListParams, Paginated},
        booking::BookingDto,
        guest::{CreateGuestDto, GuestDetailDto, GuestDto, GuestFilter, UpdateGuestDto},
    },
    server::{
        data::{
            booking::BookingRepository,
            guest::{GuestRepository, GUEST_SORTABLE},
        },
        error::{domain::DomainError, Error},
        service::invitation::normalize_email,
        util::{
            pagination::ListQuery,
            validate::{optional_text, required_text, updated_text},
        },
    },
};

pub struct GuestService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> GuestService<'a> {
    /// Creates a new instance of [`GuestService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find(&self, guest_id: i32) -> Result<entity::guest::Model, Error> {
        Ok(GuestRepository::new(self.db)
            .get(guest_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Guest", guest_id))?)
    }

    /// Conflict when another guest that has not been deleted uses `email`
    async fn ensure_email_free(&self, email: &str, exclude_id: Option<i32>) -> Result<(), Error> {
        if GuestRepository::new(self.db)
            .find_by_email(email, exclude_id)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(format!(
                "A guest with email {} already exists",
                email
            ))
            .into());
        }

        Ok(())
    }

    pub async fn list(
        &self,
        params: &ListParams,
        filter: &GuestFilter,
    ) -> Result<Paginated<GuestDto>, Error> {
        let query = ListQuery::from_params(params, GUEST_SORTABLE, entity::guest::Column::CreatedAt)?;

        Ok(GuestRepository::new(self.db)
            .list(&query, filter)
            .await?
            .map(GuestDto::from))
    }

    /// Gets a guest with their booking history
    pub async fn get(&self, guest_id: i32) -> Result<GuestDetailDto, Error> {
        let guest = self.find(guest_id).await?;

        let bookings = BookingRepository::new(self.db)
            .for_guest(guest.id)
            .await?
            .into_iter()
            .map(BookingDto::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(GuestDetailDto {
            guest: GuestDto::from(guest),
            bookings,
        })
    }

    pub async fn create(&self, guest: CreateGuestDto) -> Result<GuestDto, Error> {
        let guest = CreateGuestDto {
            first_name: required_text("first_name", &guest.first_name)?,
            last_name: required_text("last_name", &guest.last_name)?,
            email: normalize_email(&guest.email)?,
            phone: optional_text(guest.phone),
            nationality: optional_text(guest.nationality),
            document_number: optional_text(guest.document_number),
            notes: optional_text(guest.notes),
        };

        self.ensure_email_free(&guest.email, None).await?;

        let created = GuestRepository::new(self.db).create(&guest).await?;

        Ok(GuestDto::from(created))
    }

    /// Updates the given fields, blank optional fields clear the stored value
    pub async fn update(&self, guest_id: i32, update: UpdateGuestDto) -> Result<GuestDto, Error> {
        let update = UpdateGuestDto {
            first_name: updated_text("first_name", update.first_name)?,
            last_name: updated_text("last_name", update.last_name)?,
            email: update
                .email
                .as_deref()
                .map(normalize_email)
                .transpose()?,
            ..update
        };

        let guest = self.find(guest_id).await?;

        if let Some(email) = &update.email {
            self.ensure_email_free(email, Some(guest.id)).await?;
        }

        let updated = GuestRepository::new(self.db).update(guest, &update).await?;

        Ok(GuestDto::from(updated))
    }

    /// Soft deletes a guest without pending, confirmed or checked in bookings
    pub async fn delete(&self, guest_id: i32) -> Result<(), Error> {
        let guest = self.find(guest_id).await?;

        if BookingRepository::new(self.db)
            .has_active_for_guest(guest.id)
            .await?
        {
            return Err(DomainError::conflict(format!(
                "Guest {} has active bookings",
                guest.id
            ))
            .into());
        }

        GuestRepository::new(self.db)
            .soft_delete(guest, Utc::now().naive_utc())
            .await?;

        Ok(())
    }
}
