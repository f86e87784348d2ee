use chrono::Utc;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    DeleteResult, EntityTrait, QueryFilter, QueryOrder,
};

use crate::model::media::MediaOwnerType;

use entity::media::Column;

/// Metadata of a stored object
pub struct NewMedia<'a> {
    pub owner_type: MediaOwnerType,
    pub owner_id: i32,
    pub storage_key: &'a str,
    pub file_name: &'a str,
    pub mime_type: &'a str,
    pub size_bytes: i64,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

pub struct MediaRepository<'a, C: ConnectionTrait> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> MediaRepository<'a, C> {
    /// Creates a new instance of [`MediaRepository`]
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(&self, media: NewMedia<'_>) -> Result<entity::media::Model, DbErr> {
        let media = entity::media::ActiveModel {
            owner_type: ActiveValue::Set(media.owner_type.as_str().to_string()),
            owner_id: ActiveValue::Set(media.owner_id),
            storage_key: ActiveValue::Set(media.storage_key.to_string()),
            file_name: ActiveValue::Set(media.file_name.to_string()),
            mime_type: ActiveValue::Set(media.mime_type.to_string()),
            size_bytes: ActiveValue::Set(media.size_bytes),
            width: ActiveValue::Set(media.width),
            height: ActiveValue::Set(media.height),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        media.insert(self.db).await
    }

    pub async fn get(&self, media_id: i32) -> Result<Option<entity::media::Model>, DbErr> {
        entity::prelude::Media::find_by_id(media_id).one(self.db).await
    }

    /// Media of an owner in upload order
    pub async fn list_by_owner(
        &self,
        owner_type: MediaOwnerType,
        owner_id: i32,
    ) -> Result<Vec<entity::media::Model>, DbErr> {
        entity::prelude::Media::find()
            .filter(Column::OwnerType.eq(owner_type.as_str()))
            .filter(Column::OwnerId.eq(owner_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .all(self.db)
            .await
    }

    /// Media among `media_ids` that belong to the owner
    pub async fn find_for_owner(
        &self,
        owner_type: MediaOwnerType,
        owner_id: i32,
        media_ids: &[i32],
    ) -> Result<Vec<entity::media::Model>, DbErr> {
        if media_ids.is_empty() {
            return Ok(Vec::new());
        }

        entity::prelude::Media::find()
            .filter(Column::OwnerType.eq(owner_type.as_str()))
            .filter(Column::OwnerId.eq(owner_id))
            .filter(Column::Id.is_in(media_ids.to_vec()))
            .order_by_asc(Column::Id)
            .all(self.db)
            .await
    }

    /// Moves media to a new owner, returning how many rows moved
    pub async fn reassign(
        &self,
        media_ids: &[i32],
        owner_type: MediaOwnerType,
        owner_id: i32,
    ) -> Result<u64, DbErr> {
        if media_ids.is_empty() {
            return Ok(0);
        }

        let result = entity::prelude::Media::update_many()
            .col_expr(Column::OwnerType, Expr::value(owner_type.as_str()))
            .col_expr(Column::OwnerId, Expr::value(owner_id))
            .filter(Column::Id.is_in(media_ids.to_vec()))
            .exec(self.db)
            .await?;

        Ok(result.rows_affected)
    }

    pub async fn delete(&self, media_id: i32) -> Result<DeleteResult, DbErr> {
        entity::prelude::Media::delete_by_id(media_id)
            .exec(self.db)
            .await
    }
}

#[cfg(test)]
mod tests {
    use roost_test_utils::prelude::*;

    use crate::{model::media::MediaOwnerType, server::data::media::MediaRepository};

    /// Expect only media of the owner to be returned and reassignment to move them
    #[tokio::test]
    async fn finds_and_reassigns_owner_media() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let first = test.media().insert_media("booking", 1, "a.jpg").await?;
        let second = test.media().insert_media("booking", 1, "b.jpg").await?;
        let foreign = test.media().insert_media("booking", 2, "c.jpg").await?;

        let repo = MediaRepository::new(&test.db);
        let found = repo
            .find_for_owner(
                MediaOwnerType::Booking,
                1,
                &[first.id, second.id, foreign.id],
            )
            .await?;

        assert_eq!(found.len(), 2);

        let moved = repo
            .reassign(&[first.id], MediaOwnerType::CheckoutReport, 7)
            .await?;

        assert_eq!(moved, 1);
        assert_eq!(
            repo.list_by_owner(MediaOwnerType::CheckoutReport, 7)
                .await?
                .len(),
            1
        );
        assert_eq!(repo.list_by_owner(MediaOwnerType::Booking, 1).await?.len(), 1);

        Ok(())
    }
}
