use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr, DeleteResult,
    EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
};

use crate::model::inventory::ItemCondition;

use entity::inventory_assignment::Column;

pub struct AssignmentRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> AssignmentRepository<'a, C> {
    /// Creates a new instance of [`AssignmentRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        item_id: i32,
        unit_id: i32,
        quantity: i32,
        condition: ItemCondition,
    ) -> Result<entity::inventory_assignment::Model, DbErr> {
        let now = Utc::now().naive_utc();

        let assignment = entity::inventory_assignment::ActiveModel {
            item_id: ActiveValue::Set(item_id),
            unit_id: ActiveValue::Set(unit_id),
            quantity: ActiveValue::Set(quantity),
            condition: ActiveValue::Set(condition.as_str().to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        assignment.insert(self.db).await
    }

    pub async fn get(
        &self,
        assignment_id: i32,
    ) -> Result<Option<entity::inventory_assignment::Model>, DbErr> {
        entity::prelude::InventoryAssignment::find_by_id(assignment_id)
            .one(self.db)
            .await
    }

    pub async fn find(
        &self,
        item_id: i32,
        unit_id: i32,
    ) -> Result<Option<entity::inventory_assignment::Model>, DbErr> {
        entity::prelude::InventoryAssignment::find()
            .filter(Column::ItemId.eq(item_id))
            .filter(Column::UnitId.eq(unit_id))
            .one(self.db)
            .await
    }

    /// Assignments of a unit with their items, by assignment ID
    pub async fn for_unit(
        &self,
        unit_id: i32,
    ) -> Result<
        Vec<(
            entity::inventory_assignment::Model,
            Option<entity::inventory_item::Model>,
        )>,
        DbErr,
    > {
        entity::prelude::InventoryAssignment::find()
            .filter(Column::UnitId.eq(unit_id))
            .find_also_related(entity::prelude::InventoryItem)
            .order_by_asc(Column::Id)
            .all(self.db)
            .await
    }

    /// Whether the item is assigned to any unit
    pub async fn exists_for_item(&self, item_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::InventoryAssignment::find()
            .filter(Column::ItemId.eq(item_id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    /// Whether a checkout report recorded a check against the assignment
    pub async fn has_item_checks(&self, assignment_id: i32) -> Result<bool, DbErr> {
        let count = entity::prelude::CheckoutItemCheck::find()
            .filter(entity::checkout_item_check::Column::AssignmentId.eq(assignment_id))
            .count(self.db)
            .await?;

        Ok(count > 0)
    }

    pub async fn update(
        &self,
        assignment: entity::inventory_assignment::Model,
        quantity: Option<i32>,
        condition: Option<ItemCondition>,
    ) -> Result<entity::inventory_assignment::Model, DbErr> {
        let mut assignment_am = assignment.into_active_model();

        if let Some(quantity) = quantity {
            assignment_am.quantity = ActiveValue::Set(quantity);
        }
        if let Some(condition) = condition {
            assignment_am.condition = ActiveValue::Set(condition.as_str().to_string());
        }
        assignment_am.updated_at = ActiveValue::Set(Utc::now().naive_utc());

        assignment_am.update(self.db).await
    }

    pub async fn delete(&self, assignment_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::InventoryAssignment::delete_by_id(assignment_id)
            .exec(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use roost_test_utils::prelude::*;

    use crate::{
        model::inventory::ItemCondition, server::data::inventory::assignment::AssignmentRepository,
    };

    /// Expect unit assignments to come back with their item
    #[tokio::test]
    async fn lists_unit_assignments_with_items() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let admin = test.user().insert_admin().await?;
        let property = test.rental().insert_property(admin.id).await?;
        let unit = test.rental().insert_unit(property.id).await?;
        let other = test.rental().insert_unit(property.id).await?;
        let towels = test.inventory().insert_item("Towel", 10).await?;

        let repo = AssignmentRepository::new(&test.db);
        let assignment = repo
            .create(towels.id, unit.id, 4, ItemCondition::Good)
            .await?;
        repo.create(towels.id, other.id, 2, ItemCondition::Good)
            .await?;

        let listed = repo.for_unit(unit.id).await?;

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].0.id, assignment.id);
        assert_eq!(listed[0].1.as_ref().map(|i| i.name.as_str()), Some("Towel"));
        assert!(repo.find(towels.id, other.id).await?.is_some());
        assert!(repo.exists_for_item(towels.id).await?);

        Ok(())
    }
}
