use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "checkout_report")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub booking_id: i32,
    pub inspector_id: i32,
    pub cleanliness_rating: i32,
    pub damages_found: bool,
    #[sea_orm(column_type = "Text", nullable)]
    pub damage_description: Option<String>,
    pub damage_charge: f64,
    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,
    pub completed_at: DateTime,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::booking::Entity",
        from = "Column::BookingId",
        to = "super::booking::Column::Id"
    )]
    Booking,
    #[sea_orm(has_many = "super::checkout_item_check::Entity")]
    CheckoutItemCheck,
}

impl Related<super::booking::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Booking.def()
    }
}

impl Related<super::checkout_item_check::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CheckoutItemCheck.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
