use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::model::{inventory::ItemCondition, media::MediaDto};

define_status_enum!(
    /// Steps of the checkout wizard in the order they are completed
    CheckoutStep {
        Inventory => "inventory",
        Condition => "condition",
        Photos => "photos",
        Review => "review",
    }
);

impl CheckoutStep {
    fn index(&self) -> usize {
        Self::ALL.iter().position(|step| step == self).unwrap_or(0)
    }

    /// The step following this one, `Review` is the last step
    pub fn next(&self) -> CheckoutStep {
        Self::ALL
            .get(self.index() + 1)
            .copied()
            .unwrap_or(CheckoutStep::Review)
    }

    /// The step before this one, `Inventory` is the first step
    pub fn prev(&self) -> CheckoutStep {
        match self.index() {
            0 => CheckoutStep::Inventory,
            i => Self::ALL[i - 1],
        }
    }

    /// Whether this step comes at or after `other`
    pub fn reached(&self, other: CheckoutStep) -> bool {
        self.index() >= other.index()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StartCheckoutDto {
    pub booking_id: i32,
}

/// Inventory expected in the unit when the checkout was started
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ExpectedItemDto {
    pub assignment_id: i32,
    pub item_id: i32,
    pub item_name: String,
    pub expected_quantity: i32,
    pub condition: ItemCondition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemCheckInput {
    pub assignment_id: i32,
    pub found_quantity: i32,
    pub condition: ItemCondition,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct InventoryStepDto {
    pub checks: Vec<ItemCheckInput>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ConditionStepDto {
    /// 1 (poor) to 5 (spotless)
    pub cleanliness_rating: i32,
    pub damages_found: bool,
    pub damage_description: Option<String>,
    pub damage_charge: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PhotosStepDto {
    /// Media previously uploaded for the booking
    pub media_ids: Vec<i32>,
}

/// In-progress checkout kept in the inspector's session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CheckoutDraft {
    pub booking_id: i32,
    pub unit_id: i32,
    pub step: CheckoutStep,
    pub expected: Vec<ExpectedItemDto>,
    pub inventory: Option<Vec<ItemCheckInput>>,
    pub condition: Option<ConditionStepDto>,
    pub media_ids: Vec<i32>,
    pub started_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct CheckoutReportDto {
    pub id: i32,
    pub booking_id: i32,
    pub inspector_id: i32,
    pub cleanliness_rating: i32,
    pub damages_found: bool,
    pub damage_description: Option<String>,
    pub damage_charge: f64,
    pub notes: Option<String>,
    pub completed_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ItemCheckDto {
    pub id: i32,
    pub assignment_id: i32,
    pub expected_quantity: i32,
    pub found_quantity: i32,
    pub condition: ItemCondition,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CheckoutReportDetailDto {
    pub report: CheckoutReportDto,
    pub checks: Vec<ItemCheckDto>,
    pub media: Vec<MediaDto>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CheckoutReportFilter {
    pub property_id: Option<i32>,
    pub unit_id: Option<i32>,
}
