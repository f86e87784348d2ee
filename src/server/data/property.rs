use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder,
};

use crate::{
    model::{
        api::Paginated,
        property::{CreatePropertyDto, PropertyFilter, UpdatePropertyDto},
    },
    server::util::{
        pagination::{fetch_page, ListQuery},
        validate::optional_text,
    },
};

use entity::property::Column;

pub const PROPERTY_SORTABLE: &[(&str, Column)] = &[
    ("name", Column::Name),
    ("city", Column::City),
    ("country", Column::Country),
    ("property_type", Column::PropertyType),
    ("created_at", Column::CreatedAt),
    ("updated_at", Column::UpdatedAt),
];

pub struct PropertyRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PropertyRepository<'a, C> {
    /// Creates a new instance of [`PropertyRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        property: &CreatePropertyDto,
        created_by: i32,
    ) -> Result<entity::property::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let property = entity::property::ActiveModel {
            name: ActiveValue::Set(property.name.clone()),
            address: ActiveValue::Set(property.address.clone()),
            city: ActiveValue::Set(property.city.clone()),
            country: ActiveValue::Set(property.country.clone()),
            description: ActiveValue::Set(property.description.clone()),
            property_type: ActiveValue::Set(property.property_type.as_str().to_string()),
            created_by: ActiveValue::Set(created_by),
            deleted_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        property.insert(self.db).await
    }

    /// Gets a property that has not been deleted
    pub async fn get(&self, property_id: i32) -> Result<Option<entity::property::Model>, DbErr> {
        entity::prelude::Property::find_by_id(property_id)
            .filter(Column::DeletedAt.is_null())
            .one(self.db)
            .await
    }

    /// Lists properties that have not been deleted, searching name, city and address
    pub async fn list(
        &self,
        query: &ListQuery<Column>,
        filter: &PropertyFilter,
    ) -> Result<Paginated<entity::property::Model>, DbErr> {
        let mut select = entity::prelude::Property::find().filter(Column::DeletedAt.is_null());

        if let Some(property_type) = filter.property_type {
            select = select.filter(Column::PropertyType.eq(property_type.as_str()));
        }

        if let Some(city) = filter.city.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
            select = select.filter(Column::City.eq(city));
        }

        if let Some(term) = &query.search {
            select = select.filter(
                Condition::any()
                    .add(Column::Name.contains(term))
                    .add(Column::City.contains(term))
                    .add(Column::Address.contains(term)),
            );
        }

        let select = select
            .order_by(query.sort, query.order.clone())
            .order_by_asc(Column::Id);

        fetch_page(self.db, select, query.page, query.per_page).await
    }

    /// Applies the set fields of `update`, returns `Ok(None)` for missing or deleted properties
    pub async fn update(
        &self,
        property_id: i32,
        update: &UpdatePropertyDto,
    ) -> Result<Option<entity::property::Model>, DbErr> {
        let Some(property) = self.get(property_id).await? else {
            return Ok(None);
        };

        let mut property_am = property.into_active_model();

        if let Some(name) = &update.name {
            property_am.name = ActiveValue::Set(name.clone());
        }
        if let Some(address) = &update.address {
            property_am.address = ActiveValue::Set(address.clone());
        }
        if let Some(city) = &update.city {
            property_am.city = ActiveValue::Set(city.clone());
        }
        if let Some(country) = &update.country {
            property_am.country = ActiveValue::Set(country.clone());
        }
        if let Some(description) = &update.description {
            property_am.description = ActiveValue::Set(optional_text(Some(description.clone())));
        }
        if let Some(property_type) = update.property_type {
            property_am.property_type = ActiveValue::Set(property_type.as_str().to_string());
        }
        property_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        Ok(Some(property_am.update(self.db).await?))
    }

    /// Sets `deleted_at`, returns false when the property was missing or already deleted
    pub async fn soft_delete(&self, property_id: i32, now: NaiveDateTime) -> Result<bool, DbErr> {
        let Some(property) = self.get(property_id).await? else {
            return Ok(false);
        };

        let mut property_am = property.into_active_model();
        property_am.deleted_at = ActiveValue::Set(Some(now));
        property_am.updated_at = ActiveValue::Set(now);
        property_am.update(self.db).await?;

        Ok(true)
    }
}
