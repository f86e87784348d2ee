//! Media uploads: validation and compression, object storage and metadata rows.

pub mod compress;
pub mod storage;

use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::{
    model::media::{MediaDto, MediaOwnerType},
    server::{
        data::{
            booking::BookingRepository,
            checkout::CheckoutRepository,
            media::{MediaRepository, NewMedia},
            property::PropertyRepository,
            unit::UnitRepository,
        },
        error::{domain::DomainError, media::MediaError, Error},
        model::db::MediaModel,
        service::media::{compress::process_upload, storage::StorageService},
        util::token::{random_token, STORAGE_KEY_TOKEN_LEN},
    },
};

/// A file received in a multipart request
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Last path segment of a client supplied file name, `None` when nothing usable remains
fn clean_file_name(file_name: Option<&str>) -> Option<String> {
    file_name
        .and_then(|name| name.rsplit(['/', '\\']).next())
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
        .map(str::to_string)
}

/// Validates, compresses and stores one upload, then records it for the owner.
///
/// The storage key is pushed to `stored_keys` before the object is written so callers can
/// remove it if the write or anything after it fails or is cancelled.
pub async fn store_upload<C: ConnectionTrait>(
    db: &C,
    storage: &StorageService,
    owner_type: MediaOwnerType,
    owner_id: i32,
    file: UploadedFile,
    max_bytes: usize,
    stored_keys: &mut Vec<String>,
) -> Result<MediaModel, Error> {
    let UploadedFile {
        file_name,
        content_type,
        bytes,
    } = file;

    let processed =
        tokio::task::spawn_blocking(move || process_upload(&content_type, bytes, max_bytes))
            .await
            .map_err(MediaError::from)??;

    let object_name = format!(
        "{}.{}",
        random_token(STORAGE_KEY_TOKEN_LEN),
        processed.extension
    );
    let key = format!("{}/{}/{}", owner_type, owner_id, object_name);
    let file_name = clean_file_name(file_name.as_deref()).unwrap_or(object_name);
    let size_bytes = processed.bytes.len() as i64;

    stored_keys.push(key.clone());
    storage.put(&key, processed.bytes).await?;

    let media = MediaRepository::new(db)
        .create(NewMedia {
            owner_type,
            owner_id,
            storage_key: &key,
            file_name: &file_name,
            mime_type: processed.mime_type,
            size_bytes,
            width: i32::try_from(processed.width).ok(),
            height: i32::try_from(processed.height).ok(),
        })
        .await?;

    Ok(media)
}

pub struct MediaService<'a> {
    db: &'a DatabaseConnection,
    storage: &'a StorageService,
}

impl<'a> MediaService<'a> {
    /// Creates a new instance of [`MediaService`]
    pub fn new(db: &'a DatabaseConnection, storage: &'a StorageService) -> Self {
        Self { db, storage }
    }

    async fn ensure_owner_exists(
        &self,
        owner_type: MediaOwnerType,
        owner_id: i32,
    ) -> Result<(), Error> {
        let (resource, exists) = match owner_type {
            MediaOwnerType::Property => (
                "Property",
                PropertyRepository::new(self.db).get(owner_id).await?.is_some(),
            ),
            MediaOwnerType::Unit => (
                "Unit",
                UnitRepository::new(self.db).get(owner_id).await?.is_some(),
            ),
            MediaOwnerType::Booking => (
                "Booking",
                BookingRepository::new(self.db).get(owner_id).await?.is_some(),
            ),
            MediaOwnerType::CheckoutReport => (
                "Checkout report",
                CheckoutRepository::new(self.db).get(owner_id).await?.is_some(),
            ),
        };

        if exists {
            Ok(())
        } else {
            Err(DomainError::not_found(resource, owner_id).into())
        }
    }

    /// Uploads files for an owner, either every file is stored or none is.
    ///
    /// # Returns
    /// - `Ok(Vec<MediaDto>)` - Stored media in upload order
    /// - `Err(DomainError::Validation)` - No files were sent
    /// - `Err(DomainError::NotFound)` - The owner does not exist
    /// - `Err(MediaError)` - A file was rejected or could not be stored
    pub async fn upload(
        &self,
        owner_type: MediaOwnerType,
        owner_id: i32,
        files: Vec<UploadedFile>,
        max_bytes: usize,
    ) -> Result<Vec<MediaDto>, Error> {
        if files.is_empty() {
            return Err(DomainError::validation("files: at least one file is required").into());
        }

        self.ensure_owner_exists(owner_type, owner_id).await?;

        let mut stored_keys = Vec::new();

        let result = async {
            let txn = self.db.begin().await?;
            let mut created = Vec::with_capacity(files.len());

            for file in files {
                let media = store_upload(
                    &txn,
                    self.storage,
                    owner_type,
                    owner_id,
                    file,
                    max_bytes,
                    &mut stored_keys,
                )
                .await?;
                created.push(media);
            }

            txn.commit().await?;

            Ok::<_, Error>(created)
        }
        .await;

        match result {
            Ok(created) => {
                tracing::debug!(
                    "Stored {} file(s) for {} {}",
                    created.len(),
                    owner_type,
                    owner_id
                );

                created.into_iter().map(MediaDto::try_from).collect()
            }
            Err(e) => {
                self.storage.delete_all(&stored_keys).await;

                Err(e)
            }
        }
    }

    pub async fn list(
        &self,
        owner_type: MediaOwnerType,
        owner_id: i32,
    ) -> Result<Vec<MediaDto>, Error> {
        MediaRepository::new(self.db)
            .list_by_owner(owner_type, owner_id)
            .await?
            .into_iter()
            .map(MediaDto::try_from)
            .collect()
    }

    pub async fn get(&self, media_id: i32) -> Result<MediaDto, Error> {
        let media = MediaRepository::new(self.db)
            .get(media_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Media", media_id))?;

        MediaDto::try_from(media)
    }

    /// Returns the stored row together with the object bytes
    pub async fn download(&self, media_id: i32) -> Result<(MediaModel, Vec<u8>), Error> {
        let media = MediaRepository::new(self.db)
            .get(media_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Media", media_id))?;

        let bytes = self.storage.get(&media.storage_key).await?;

        Ok((media, bytes))
    }

    /// Deletes the row, then the object
    pub async fn delete(&self, media_id: i32) -> Result<(), Error> {
        let media_repo = MediaRepository::new(self.db);

        let media = media_repo
            .get(media_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Media", media_id))?;

        media_repo.delete(media.id).await?;

        if let Err(e) = self.storage.delete(&media.storage_key).await {
            tracing::warn!(
                "Deleted media ID {} but failed to delete object {:?}: {}",
                media.id,
                media.storage_key,
                e
            );
        }

        Ok(())
    }
}
