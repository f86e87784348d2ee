use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

define_status_enum!(ItemCondition {
    Good => "good",
    Damaged => "damaged",
    Missing => "missing",
});

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct InventoryItemDto {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    /// Total stock owned
    pub quantity: i32,
    /// Stock currently assigned to units
    pub assigned_quantity: i32,
    pub unit_cost: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateInventoryItemDto {
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub quantity: i32,
    pub unit_cost: f64,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateInventoryItemDto {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i32>,
    pub unit_cost: Option<f64>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InventoryFilter {
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AssignmentDto {
    pub id: i32,
    pub item_id: i32,
    pub item_name: String,
    pub unit_id: i32,
    pub quantity: i32,
    pub condition: ItemCondition,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateAssignmentDto {
    pub item_id: i32,
    pub unit_id: i32,
    pub quantity: i32,
    pub condition: Option<ItemCondition>,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateAssignmentDto {
    pub quantity: Option<i32>,
    pub condition: Option<ItemCondition>,
}
