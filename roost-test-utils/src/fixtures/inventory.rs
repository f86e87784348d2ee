use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue};

use crate::error::TestError;

pub struct InventoryFixtures<'a> {
    pub(crate) db: &'a sea_orm::DatabaseConnection,
}

impl<'a> InventoryFixtures<'a> {
    pub async fn insert_item(
        &self,
        name: &str,
        quantity: i32,
    ) -> Result<entity::inventory_item::Model, TestError> {
        let now = Utc::now().naive_utc();

        let item = entity::inventory_item::ActiveModel {
            name: ActiveValue::Set(name.to_string()),
            category: ActiveValue::Set("linen".to_string()),
            description: ActiveValue::Set(None),
            quantity: ActiveValue::Set(quantity),
            unit_cost: ActiveValue::Set(12.5),
            deleted_at: ActiveValue::Set(None),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(item.insert(self.db).await?)
    }

    /// Assign `quantity` of an item to a unit in good condition
    pub async fn insert_assignment(
        &self,
        item_id: i32,
        unit_id: i32,
        quantity: i32,
    ) -> Result<entity::inventory_assignment::Model, TestError> {
        let now = Utc::now().naive_utc();

        let assignment = entity::inventory_assignment::ActiveModel {
            item_id: ActiveValue::Set(item_id),
            unit_id: ActiveValue::Set(unit_id),
            quantity: ActiveValue::Set(quantity),
            condition: ActiveValue::Set("good".to_string()),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
            ..Default::default()
        };

        Ok(assignment.insert(self.db).await?)
    }
}
