use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue};

use crate::error::TestError;

pub struct MediaFixtures<'a> {
    pub(crate) db: &'a sea_orm::DatabaseConnection,
}

impl<'a> MediaFixtures<'a> {
    /// Insert a media row pointing at `{owner_type}/{owner_id}/{file_name}`, no object is stored.
    pub async fn insert_media(
        &self,
        owner_type: &str,
        owner_id: i32,
        file_name: &str,
    ) -> Result<entity::media::Model, TestError> {
        let media = entity::media::ActiveModel {
            owner_type: ActiveValue::Set(owner_type.to_string()),
            owner_id: ActiveValue::Set(owner_id),
            storage_key: ActiveValue::Set(format!("{}/{}/{}", owner_type, owner_id, file_name)),
            file_name: ActiveValue::Set(file_name.to_string()),
            mime_type: ActiveValue::Set("image/jpeg".to_string()),
            size_bytes: ActiveValue::Set(1024),
            width: ActiveValue::Set(Some(640)),
            height: ActiveValue::Set(Some(480)),
            created_at: ActiveValue::Set(Utc::now().naive_utc()),
            ..Default::default()
        };

        Ok(media.insert(self.db).await?)
    }
}
