use sea_orm::entity::prelude::*;

/// Uploaded file metadata. The bytes live in object storage under `storage_key`;
/// `owner_type`/`owner_id` form a polymorphic reference, so no foreign key exists.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "media")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub owner_type: String,
    pub owner_id: i32,
    #[sea_orm(unique)]
    pub storage_key: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
