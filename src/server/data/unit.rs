use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityTrait, IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::{
    model::{
        api::Paginated,
        unit::{CreateUnitDto, UnitFilter, UnitStatus, UpdateUnitDto},
    },
    server::util::pagination::{fetch_page, ListQuery},
};

use entity::unit::Column;

pub const UNIT_SORTABLE: &[(&str, Column)] = &[
    ("name", Column::Name),
    ("nightly_rate", Column::NightlyRate),
    ("max_guests", Column::MaxGuests),
    ("status", Column::Status),
    ("created_at", Column::CreatedAt),
];

pub struct UnitRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UnitRepository<'a, C> {
    /// Creates a new instance of [`UnitRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    /// Creates an available unit
    pub async fn create(&self, unit: &CreateUnitDto) -> Result<entity::unit::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let unit = entity::unit::ActiveModel {
            property_id: ActiveValue::Set(unit.property_id),
            name: ActiveValue::Set(unit.name.clone()),
            unit_type: ActiveValue::Set(unit.unit_type.as_str().to_string()),
            bedrooms: ActiveValue::Set(unit.bedrooms),
            bathrooms: ActiveValue::Set(unit.bathrooms),
            max_guests: ActiveValue::Set(unit.max_guests),
            nightly_rate: ActiveValue::Set(unit.nightly_rate),
            status: ActiveValue::Set(UnitStatus::Available.as_str().to_string()),
            deleted_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        unit.insert(self.db).await
    }

    /// Gets a unit that has not been deleted
    pub async fn get(&self, unit_id: i32) -> Result<Option<entity::unit::Model>, DbErr> {
        entity::prelude::Unit::find_by_id(unit_id)
            .filter(Column::DeletedAt.is_null())
            .one(self.db)
            .await
    }

    /// Gets a unit including deleted ones, for history views
    pub async fn find_by_id(&self, unit_id: i32) -> Result<Option<entity::unit::Model>, DbErr> {
        entity::prelude::Unit::find_by_id(unit_id).one(self.db).await
    }

    /// Lists the units of a property that have not been deleted
    pub async fn list(
        &self,
        property_id: i32,
        query: &ListQuery<Column>,
        filter: &UnitFilter,
    ) -> Result<Paginated<entity::unit::Model>, DbErr> {
        let mut select = entity::prelude::Unit::find()
            .filter(Column::PropertyId.eq(property_id))
            .filter(Column::DeletedAt.is_null());

        if let Some(status) = filter.status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        if let Some(term) = &query.search {
            select = select.filter(Column::Name.contains(term));
        }

        let select = select
            .order_by(query.sort, query.order.clone())
            .order_by_asc(Column::Id);

        fetch_page(self.db, select, query.page, query.per_page).await
    }

    /// All units of a property that have not been deleted, by name
    pub async fn all_for_property(
        &self,
        property_id: i32,
    ) -> Result<Vec<entity::unit::Model>, DbErr> {
        entity::prelude::Unit::find()
            .filter(Column::PropertyId.eq(property_id))
            .filter(Column::DeletedAt.is_null())
            .order_by_asc(Column::Name)
            .all(self.db)
            .await
    }

    pub async fn update(
        &self,
        unit: entity::unit::Model,
        update: &UpdateUnitDto,
    ) -> Result<entity::unit::Model, DbErr> {
        let mut unit_am = unit.into_active_model();

        if let Some(name) = &update.name {
            unit_am.name = ActiveValue::Set(name.clone());
        }
        if let Some(unit_type) = update.unit_type {
            unit_am.unit_type = ActiveValue::Set(unit_type.as_str().to_string());
        }
        if let Some(bedrooms) = update.bedrooms {
            unit_am.bedrooms = ActiveValue::Set(bedrooms);
        }
        if let Some(bathrooms) = update.bathrooms {
            unit_am.bathrooms = ActiveValue::Set(bathrooms);
        }
        if let Some(max_guests) = update.max_guests {
            unit_am.max_guests = ActiveValue::Set(max_guests);
        }
        if let Some(nightly_rate) = update.nightly_rate {
            unit_am.nightly_rate = ActiveValue::Set(nightly_rate);
        }
        unit_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        unit_am.update(self.db).await
    }

    pub async fn set_status(
        &self,
        unit: entity::unit::Model,
        status: UnitStatus,
    ) -> Result<entity::unit::Model, DbErr> {
        let mut unit_am = unit.into_active_model();
        unit_am.status = ActiveValue::Set(status.as_str().to_string());
        unit_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        unit_am.update(self.db).await
    }

    pub async fn soft_delete(
        &self,
        unit: entity::unit::Model,
        now: NaiveDateTime,
    ) -> Result<entity::unit::Model, DbErr> {
        let mut unit_am = unit.into_active_model();
        unit_am.deleted_at = ActiveValue::Set(Some(now));
        unit_am.updated_at = ActiveValue::Set(now);

        unit_am.update(self.db).await
    }

    /// Soft deletes every remaining unit of a property, returning how many were deleted
    pub async fn soft_delete_for_property(
        &self,
        property_id: i32,
        now: NaiveDateTime,
    ) -> Result<u64, DbErr> {
        let result = entity::prelude::Unit::update_many()
            .col_expr(Column::DeletedAt, Expr::value(Some(now)))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::PropertyId.eq(property_id))
            .filter(Column::DeletedAt.is_null())
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }
}

#[cfg(test)]
mod tests {
    mod soft_delete_for_property {
        use chrono::Utc;
        use roost_test_utils::prelude::*;

        use crate::server::data::unit::UnitRepository;

        /// Expect all units of the property to be hidden and units of other properties untouched
        #[tokio::test]
        async fn deletes_only_units_of_property() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let property = test.rental().insert_property(admin.id).await?;
            let other = test.rental().insert_property(admin.id).await?;
            test.rental().insert_unit(property.id).await?;
            test.rental().insert_unit(property.id).await?;
            let kept = test.rental().insert_unit(other.id).await?;

            let repo = UnitRepository::new(&test.db);
            let deleted = repo
                .soft_delete_for_property(property.id, Utc::now().naive_utc())
                .await?;

            assert_eq!(deleted, 2);
            assert!(repo.all_for_property(property.id).await?.is_empty());
            assert!(repo.get(kept.id).await?.is_some());

            Ok(())
        }
    }

    mod list {
        use roost_test_utils::prelude::*;

        use crate::{
            model::{
                api::ListParams,
                unit::{UnitFilter, UnitStatus},
            },
            server::{
                data::unit::{UnitRepository, UNIT_SORTABLE},
                util::pagination::ListQuery,
            },
        };

        /// Expect the status filter to apply within the property
        #[tokio::test]
        async fn filters_by_status() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let property = test.rental().insert_property(admin.id).await?;
            test.rental().insert_unit(property.id).await?;
            let repair = test
                .rental()
                .insert_unit_with_status(property.id, "maintenance")
                .await?;

            let query = ListQuery::from_params(
                &ListParams::default(),
                UNIT_SORTABLE,
                entity::unit::Column::CreatedAt,
            )
            .unwrap();
            let filter = UnitFilter {
                status: Some(UnitStatus::Maintenance),
            };

            let repo = UnitRepository::new(&test.db);
            let page = repo.list(property.id, &query, &filter).await?;

            assert_eq!(page.total, 1);
            assert_eq!(page.items[0].id, repair.id);

            Ok(())
        }
    }
}
