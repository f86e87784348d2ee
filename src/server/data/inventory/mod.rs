pub mod assignment;

use std::collections::HashMap;

use chrono::{NaiveDateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, Condition, ConnectionTrait, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, QuerySelect,
};

use crate::{
    model::{
        api::Paginated,
        inventory::{CreateInventoryItemDto, InventoryFilter, UpdateInventoryItemDto},
    },
    server::util::{
        pagination::{fetch_page, ListQuery},
        validate::optional_text,
    },
};

use entity::inventory_item::Column;

pub const INVENTORY_SORTABLE: &[(&str, Column)] = &[
    ("name", Column::Name),
    ("category", Column::Category),
    ("quantity", Column::Quantity),
    ("unit_cost", Column::UnitCost),
    ("created_at", Column::CreatedAt),
];

pub struct InventoryItemRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> InventoryItemRepository<'a, C> {
    /// Creates a new instance of [`InventoryItemRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        item: &CreateInventoryItemDto,
    ) -> Result<entity::inventory_item::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let item = entity::inventory_item::ActiveModel {
            name: ActiveValue::Set(item.name.clone()),
            category: ActiveValue::Set(item.category.clone()),
            description: ActiveValue::Set(item.description.clone()),
            quantity: ActiveValue::Set(item.quantity),
            unit_cost: ActiveValue::Set(item.unit_cost),
            deleted_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        item.insert(self.db).await
    }

    /// Gets an item that has not been deleted
    pub async fn get(&self, item_id: i32) -> Result<Option<entity::inventory_item::Model>, DbErr> {
        entity::prelude::InventoryItem::find_by_id(item_id)
            .filter(Column::DeletedAt.is_null())
            .one(self.db)
            .await
    }

    /// Gets an item including deleted ones, for rows that still reference it
    pub async fn find_by_id(
        &self,
        item_id: i32,
    ) -> Result<Option<entity::inventory_item::Model>, DbErr> {
        entity::prelude::InventoryItem::find_by_id(item_id)
            .one(self.db)
            .await
    }

    /// Lists items that have not been deleted, searching name and category
    pub async fn list(
        &self,
        query: &ListQuery<Column>,
        filter: &InventoryFilter,
    ) -> Result<Paginated<entity::inventory_item::Model>, DbErr> {
        let mut select = entity::prelude::InventoryItem::find().filter(Column::DeletedAt.is_null());

        if let Some(category) = filter
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            select = select.filter(Column::Category.eq(category));
        }

        if let Some(term) = &query.search {
            select = select.filter(
                Condition::any()
                    .add(Column::Name.contains(term))
                    .add(Column::Category.contains(term)),
            );
        }

        let select = select
            .order_by(query.sort, query.order.clone())
            .order_by_asc(Column::Id);

        fetch_page(self.db, select, query.page, query.per_page).await
    }

    /// Quantity of each item currently assigned to units, items without assignments are absent
    pub async fn assigned_quantities(&self, item_ids: &[i32]) -> Result<HashMap<i32, i64>, DbErr> {
        if item_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows: Vec<(i32, Option<i64>)> = entity::prelude::InventoryAssignment::find()
            .select_only()
            .column(entity::inventory_assignment::Column::ItemId)
            .column_as(entity::inventory_assignment::Column::Quantity.sum(), "assigned")
            .filter(entity::inventory_assignment::Column::ItemId.is_in(item_ids.to_vec()))
            .group_by(entity::inventory_assignment::Column::ItemId)
            .into_tuple()
            .all(self.db)
            .await?;

        Ok(rows
            .into_iter()
            .map(|(item_id, assigned)| (item_id, assigned.unwrap_or(0)))
            .collect())
    }

    /// Quantity of an item assigned to units, ignoring `exclude_assignment`
    pub async fn assigned_quantity(
        &self,
        item_id: i32,
        exclude_assignment: Option<i32>,
    ) -> Result<i64, DbErr> {
        let mut select = entity::prelude::InventoryAssignment::find()
            .select_only()
            .column_as(entity::inventory_assignment::Column::Quantity.sum(), "assigned")
            .filter(entity::inventory_assignment::Column::ItemId.eq(item_id));

        if let Some(assignment_id) = exclude_assignment {
            select = select.filter(entity::inventory_assignment::Column::Id.ne(assignment_id));
        }

        let assigned: Option<Option<i64>> = select.into_tuple().one(self.db).await?;

        Ok(assigned.flatten().unwrap_or(0))
    }

    pub async fn update(
        &self,
        item: entity::inventory_item::Model,
        update: &UpdateInventoryItemDto,
    ) -> Result<entity::inventory_item::Model, DbErr> {
        let mut item_am = item.into_active_model();

        if let Some(name) = &update.name {
            item_am.name = ActiveValue::Set(name.clone());
        }
        if let Some(category) = &update.category {
            item_am.category = ActiveValue::Set(category.clone());
        }
        if let Some(description) = &update.description {
            item_am.description = ActiveValue::Set(optional_text(Some(description.clone())));
        }
        if let Some(quantity) = update.quantity {
            item_am.quantity = ActiveValue::Set(quantity);
        }
        if let Some(unit_cost) = update.unit_cost {
            item_am.unit_cost = ActiveValue::Set(unit_cost);
        }
        item_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        item_am.update(self.db).await
    }

    pub async fn soft_delete(
        &self,
        item: entity::inventory_item::Model,
        now: NaiveDateTime,
    ) -> Result<entity::inventory_item::Model, DbErr> {
        let mut item_am = item.into_active_model();
        item_am.deleted_at = ActiveValue::Set(Some(now));
        item_am.updated_at = ActiveValue::Set(now);

        item_am.update(self.db).await
    }
}
