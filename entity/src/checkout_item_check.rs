use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "checkout_item_check")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub report_id: i32,
    pub assignment_id: i32,
    pub expected_quantity: i32,
    pub found_quantity: i32,
    pub condition: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::checkout_report::Entity",
        from = "Column::ReportId",
        to = "super::checkout_report::Column::Id"
    )]
    CheckoutReport,
    #[sea_orm(
        belongs_to = "super::inventory_assignment::Entity",
        from = "Column::AssignmentId",
        to = "super::inventory_assignment::Column::Id"
    )]
    InventoryAssignment,
}

impl Related<super::checkout_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CheckoutReport.def()
    }
}

impl Related<super::inventory_assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryAssignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
