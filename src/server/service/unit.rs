use chrono::Utc;
use sea_orm::DatabaseConnection;

use crate::{
    model::{
        api::{ListParams, Paginated},
        unit::{CreateUnitDto, UnitDto, UnitFilter, UnitStatus, UpdateUnitDto},
    },
    server::{
        data::{
            booking::BookingRepository,
            property::PropertyRepository,
            unit::{UnitRepository, UNIT_SORTABLE},
        },
        error::{domain::DomainError, Error},
        model::db::parse_column,
        util::{
            pagination::ListQuery,
            validate::{amount, at_least, required_text, updated_text},
        },
    },
};

pub struct UnitService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> UnitService<'a> {
    /// Creates a new instance of [`UnitService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    async fn ensure_property(&self, property_id: i32) -> Result<(), Error> {
        PropertyRepository::new(self.db)
            .get(property_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Property", property_id))?;

        Ok(())
    }

    async fn find(&self, unit_id: i32) -> Result<entity::unit::Model, Error> {
        Ok(UnitRepository::new(self.db)
            .get(unit_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Unit", unit_id))?)
    }

    pub async fn list(
        &self,
        property_id: i32,
        params: &ListParams,
        filter: &UnitFilter,
    ) -> Result<Paginated<UnitDto>, Error> {
        let query = ListQuery::from_params(params, UNIT_SORTABLE, entity::unit::Column::CreatedAt)?;

        self.ensure_property(property_id).await?;

        UnitRepository::new(self.db)
            .list(property_id, &query, filter)
            .await?
            .try_map(UnitDto::try_from)
    }

    pub async fn get(&self, unit_id: i32) -> Result<UnitDto, Error> {
        UnitDto::try_from(self.find(unit_id).await?)
    }

    pub async fn create(&self, unit: CreateUnitDto) -> Result<UnitDto, Error> {
        let unit = CreateUnitDto {
            name: required_text("name", &unit.name)?,
            bedrooms: at_least("bedrooms", unit.bedrooms, 0)?,
            bathrooms: at_least("bathrooms", unit.bathrooms, 0)?,
            max_guests: at_least("max_guests", unit.max_guests, 1)?,
            nightly_rate: amount("nightly_rate", unit.nightly_rate)?,
            ..unit
        };

        self.ensure_property(unit.property_id).await?;

        let created = UnitRepository::new(self.db).create(&unit).await?;

        tracing::info!(
            "Created unit ID {} in property ID {}",
            created.id,
            created.property_id
        );

        UnitDto::try_from(created)
    }

    pub async fn update(&self, unit_id: i32, update: UpdateUnitDto) -> Result<UnitDto, Error> {
        let update = UpdateUnitDto {
            name: updated_text("name", update.name)?,
            unit_type: update.unit_type,
            bedrooms: update
                .bedrooms
                .map(|v| at_least("bedrooms", v, 0))
                .transpose()?,
            bathrooms: update
                .bathrooms
                .map(|v| at_least("bathrooms", v, 0))
                .transpose()?,
            max_guests: update
                .max_guests
                .map(|v| at_least("max_guests", v, 1))
                .transpose()?,
            nightly_rate: update
                .nightly_rate
                .map(|v| amount("nightly_rate", v))
                .transpose()?,
        };

        let unit = self.find(unit_id).await?;
        let updated = UnitRepository::new(self.db).update(unit, &update).await?;

        UnitDto::try_from(updated)
    }

    /// Soft deletes a unit without pending, confirmed or checked in bookings
    pub async fn delete(&self, unit_id: i32) -> Result<(), Error> {
        let unit = self.find(unit_id).await?;

        if BookingRepository::new(self.db)
            .has_active_for_unit(unit.id)
            .await?
        {
            return Err(DomainError::conflict(format!(
                "Unit {} has active bookings",
                unit.id
            ))
            .into());
        }

        UnitRepository::new(self.db)
            .soft_delete(unit, Utc::now().naive_utc())
            .await?;

        Ok(())
    }

    /// Moves a unit between available and maintenance.
    ///
    /// # Returns
    /// - `Ok(UnitDto)` - Unit with its new status
    /// - `Err(DomainError::Validation)` - `status` is reserved or occupied, which follow bookings
    /// - `Err(DomainError::Conflict)` - The unit is currently reserved or occupied
    pub async fn set_status(&self, unit_id: i32, status: UnitStatus) -> Result<UnitDto, Error> {
        if !status.is_manual() {
            return Err(DomainError::validation(format!(
                "status: {} is set by bookings, only available and maintenance can be set",
                status
            ))
            .into());
        }

        let unit = self.find(unit_id).await?;
        let current: UnitStatus = parse_column(&unit.status)?;

        if !current.is_manual() {
            return Err(DomainError::conflict(format!(
                "Unit {} is {}, its status follows its bookings",
                unit.id, current
            ))
            .into());
        }

        let updated = UnitRepository::new(self.db).set_status(unit, status).await?;

        tracing::info!("Unit ID {} set to {}", updated.id, status);

        UnitDto::try_from(updated)
    }
}
