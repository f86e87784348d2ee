use std::time::Duration;

use chrono::Utc;
use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        api::{ListParams, Paginated},
        media::{MediaDto, MediaOwnerType},
        property::{
            CreatePropertyDto, PropertyDetailDto, PropertyDto, PropertyFilter, UpdatePropertyDto,
        },
        unit::UnitDto,
    },
    server::{
        data::{
            booking::BookingRepository,
            media::MediaRepository,
            property::{PropertyRepository, PROPERTY_SORTABLE},
            unit::UnitRepository,
        },
        error::{domain::DomainError, Error},
        service::media::{store_upload, storage::StorageService, UploadedFile},
        util::{
            pagination::ListQuery,
            validate::{optional_text, required_text, updated_text},
        },
    },
};

/// Time allowed for creating a property together with its images
pub const CREATE_WITH_IMAGES_TIMEOUT: Duration = Duration::from_secs(30);

fn validate_create(property: CreatePropertyDto) -> Result<CreatePropertyDto, DomainError> {
    Ok(CreatePropertyDto {
        name: required_text("name", &property.name)?,
        address: required_text("address", &property.address)?,
        city: required_text("city", &property.city)?,
        country: required_text("country", &property.country)?,
        description: optional_text(property.description),
        property_type: property.property_type,
    })
}

pub struct PropertyService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> PropertyService<'a> {
    /// Creates a new instance of [`PropertyService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn list(
        &self,
        params: &ListParams,
        filter: &PropertyFilter,
    ) -> Result<Paginated<PropertyDto>, Error> {
        let query =
            ListQuery::from_params(params, PROPERTY_SORTABLE, entity::property::Column::CreatedAt)?;

        PropertyRepository::new(self.db)
            .list(&query, filter)
            .await?
            .try_map(PropertyDto::try_from)
    }

    /// Gets a property with its units and images
    pub async fn get(&self, property_id: i32) -> Result<PropertyDetailDto, Error> {
        let property = PropertyRepository::new(self.db)
            .get(property_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Property", property_id))?;

        let units = UnitRepository::new(self.db)
            .all_for_property(property.id)
            .await?
            .into_iter()
            .map(UnitDto::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let media = MediaRepository::new(self.db)
            .list_by_owner(MediaOwnerType::Property, property.id)
            .await?
            .into_iter()
            .map(MediaDto::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PropertyDetailDto {
            property: PropertyDto::try_from(property)?,
            units,
            media,
        })
    }

    pub async fn create(
        &self,
        created_by: i32,
        property: CreatePropertyDto,
    ) -> Result<PropertyDto, Error> {
        let property = validate_create(property)?;

        let created = PropertyRepository::new(self.db)
            .create(&property, created_by)
            .await?;

        tracing::info!("User ID {} created property ID {}", created_by, created.id);

        PropertyDto::try_from(created)
    }

    /// Creates a property and stores its images in one transaction.
    ///
    /// Gives up after [`CREATE_WITH_IMAGES_TIMEOUT`]. When anything fails the transaction is
    /// rolled back and objects already written to storage are deleted.
    ///
    /// # Returns
    /// - `Ok(PropertyDetailDto)` - Created property with its images
    /// - `Err(DomainError::Validation)` - Missing property fields
    /// - `Err(MediaError)` - An image was rejected or could not be stored
    /// - `Err(Error::Timeout)` - The operation did not finish in time
    pub async fn create_with_images(
        &self,
        storage: &StorageService,
        created_by: i32,
        property: CreatePropertyDto,
        images: Vec<UploadedFile>,
        max_bytes: usize,
    ) -> Result<PropertyDetailDto, Error> {
        let property = validate_create(property)?;
        let mut stored_keys = Vec::new();

        let work = async {
            let txn = self.db.begin().await?;

            let created = PropertyRepository::new(&txn)
                .create(&property, created_by)
                .await?;

            let mut media = Vec::with_capacity(images.len());
            for image in images {
                let stored = store_upload(
                    &txn,
                    storage,
                    MediaOwnerType::Property,
                    created.id,
                    image,
                    max_bytes,
                    &mut stored_keys,
                )
                .await?;
                media.push(stored);
            }

            txn.commit().await?;

            Ok::<_, Error>((created, media))
        };

        let outcome = tokio::time::timeout(CREATE_WITH_IMAGES_TIMEOUT, work).await;

        let result = match outcome {
            Ok(result) => result,
            Err(_) => Err(Error::Timeout(format!(
                "creating property {:?} with images took longer than {:?}",
                property.name, CREATE_WITH_IMAGES_TIMEOUT
            ))),
        };

        let (created, media) = match result {
            Ok(created) => created,
            Err(e) => {
                storage.delete_all(&stored_keys).await;

                return Err(e);
            }
        };

        tracing::info!(
            "User ID {} created property ID {} with {} image(s)",
            created_by,
            created.id,
            media.len()
        );

        Ok(PropertyDetailDto {
            property: PropertyDto::try_from(created)?,
            units: Vec::new(),
            media: media
                .into_iter()
                .map(MediaDto::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }

    pub async fn update(
        &self,
        property_id: i32,
        update: UpdatePropertyDto,
    ) -> Result<PropertyDto, Error> {
        let update = UpdatePropertyDto {
            name: updated_text("name", update.name)?,
            address: updated_text("address", update.address)?,
            city: updated_text("city", update.city)?,
            country: updated_text("country", update.country)?,
            description: update.description,
            property_type: update.property_type,
        };

        let property = PropertyRepository::new(self.db)
            .update(property_id, &update)
            .await?
            .ok_or_else(|| DomainError::not_found("Property", property_id))?;

        PropertyDto::try_from(property)
    }

    /// Soft deletes a property and its units.
    ///
    /// Rejected with a conflict while any of its units has an active booking.
    pub async fn delete(&self, property_id: i32) -> Result<(), Error> {
        let txn = self.db.begin().await?;
        let property_repo = PropertyRepository::new(&txn);
        let unit_repo = UnitRepository::new(&txn);
        let booking_repo = BookingRepository::new(&txn);

        if property_repo.get(property_id).await?.is_none() {
            return Err(DomainError::not_found("Property", property_id).into());
        }

        for unit in unit_repo.all_for_property(property_id).await? {
            if booking_repo.has_active_for_unit(unit.id).await? {
                return Err(DomainError::conflict(format!(
                    "Unit {} of property {} has active bookings",
                    unit.id, property_id
                ))
                .into());
            }
        }

        let now = Utc::now().naive_utc();
        property_repo.soft_delete(property_id, now).await?;
        let units = unit_repo.soft_delete_for_property(property_id, now).await?;

        txn.commit().await?;

        tracing::info!(
            "Deleted property ID {} along with {} unit(s)",
            property_id,
            units
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::model::property::{CreatePropertyDto, PropertyType};

    fn new_property(name: &str) -> CreatePropertyDto {
        CreatePropertyDto {
            name: name.to_string(),
            address: "Rua das Flores 12".to_string(),
            city: "Porto".to_string(),
            country: "PT".to_string(),
            description: None,
            property_type: PropertyType::Apartment,
        }
    }

    mod create {
        use roost_test_utils::prelude::*;

        use super::new_property;
        use crate::server::{
            error::{domain::DomainError, Error},
            service::property::PropertyService,
        };

        /// Expect Validation naming the field when the name is blank
        #[tokio::test]
        async fn rejects_blank_name() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;

            let result = PropertyService::new(&test.db)
                .create(admin.id, new_property("  "))
                .await;

            assert!(matches!(
                result,
                Err(Error::DomainError(DomainError::Validation(msg))) if msg.starts_with("name")
            ));

            Ok(())
        }
    }

    mod create_with_images {
        use std::sync::Arc;

        use async_trait::async_trait;
        use image::ImageFormat;
        use roost_test_utils::prelude::*;
        use tokio::sync::Notify;

        use super::new_property;
        use crate::{
            model::{api::ListParams, property::PropertyFilter},
            server::{
                error::{media::MediaError, Error},
                service::{
                    media::{
                        compress::tests::sample_image,
                        storage::{MemoryStorage, ObjectStore, StorageService},
                        UploadedFile,
                    },
                    property::PropertyService,
                },
            },
        };

        /// Writes to memory, signals `stalled` and then never returns
        struct StallingStorage {
            memory: Arc<MemoryStorage>,
            stalled: Arc<Notify>,
        }

        #[async_trait]
        impl ObjectStore for StallingStorage {
            async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), MediaError> {
                self.memory.put(key, bytes).await?;
                self.stalled.notify_one();

                std::future::pending().await
            }

            async fn get(&self, key: &str) -> Result<Vec<u8>, MediaError> {
                self.memory.get(key).await
            }

            async fn delete(&self, key: &str) -> Result<(), MediaError> {
                self.memory.delete(key).await
            }
        }

        fn image(content_type: &str, format: ImageFormat) -> UploadedFile {
            UploadedFile {
                file_name: Some("photo".to_string()),
                content_type: content_type.to_string(),
                bytes: sample_image(40, 30, format),
            }
        }

        /// Expect the property and its images to be created together
        #[tokio::test]
        async fn creates_property_with_images() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let storage = StorageService::in_memory();

            let detail = PropertyService::new(&test.db)
                .create_with_images(
                    &storage,
                    admin.id,
                    new_property("Sea Breeze"),
                    vec![
                        image("image/png", ImageFormat::Png),
                        image("image/jpeg", ImageFormat::Jpeg),
                    ],
                    1024 * 1024,
                )
                .await
                .unwrap();

            assert_eq!(detail.property.name, "Sea Breeze");
            assert_eq!(detail.media.len(), 2);

            Ok(())
        }

        /// Expect no property and no stored objects to remain when an image is rejected
        #[tokio::test]
        async fn rolls_back_on_rejected_image() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let memory = Arc::new(MemoryStorage::default());
            let storage = StorageService::new(memory.clone());
            let service = PropertyService::new(&test.db);

            let result = service
                .create_with_images(
                    &storage,
                    admin.id,
                    new_property("Sea Breeze"),
                    vec![
                        image("image/png", ImageFormat::Png),
                        image("image/webp", ImageFormat::Png),
                    ],
                    1024 * 1024,
                )
                .await;

            assert!(matches!(
                result,
                Err(Error::MediaError(MediaError::TypeMismatch { .. }))
            ));

            let page = service
                .list(&ListParams::default(), &PropertyFilter::default())
                .await
                .unwrap();
            assert_eq!(page.total, 0);
            assert_eq!(memory.object_count().await, 0);

            Ok(())
        }

        /// Expect Timeout when storage hangs, with the property rolled back and the object removed
        #[tokio::test]
        async fn times_out_and_cleans_up() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let memory = Arc::new(MemoryStorage::default());
            let stalled = Arc::new(Notify::new());
            let storage = StorageService::new(StallingStorage {
                memory: memory.clone(),
                stalled: stalled.clone(),
            });
            let service = PropertyService::new(&test.db);

            // The clock is frozen only once storage hangs, so the remaining time elapses at once
            let (result, ()) = tokio::join!(
                service.create_with_images(
                    &storage,
                    admin.id,
                    new_property("Sea Breeze"),
                    vec![image("image/png", ImageFormat::Png)],
                    1024 * 1024,
                ),
                async {
                    stalled.notified().await;
                    tokio::time::pause();
                }
            );
            tokio::time::resume();

            assert!(matches!(result, Err(Error::Timeout(_))));
            assert_eq!(memory.object_count().await, 0);

            let page = service
                .list(&ListParams::default(), &PropertyFilter::default())
                .await
                .unwrap();
            assert_eq!(page.total, 0);

            Ok(())
        }
    }

    mod update {
        use roost_test_utils::prelude::*;

        use crate::{model::property::UpdatePropertyDto, server::service::property::PropertyService};

        /// Expect the description trimmed, and cleared when blank
        #[tokio::test]
        async fn trims_and_clears_description() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let property = test.rental().insert_property(admin.id).await?;
            let service = PropertyService::new(&test.db);

            let described = service
                .update(
                    property.id,
                    UpdatePropertyDto {
                        description: Some("  Sea view  ".to_string()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            let cleared = service
                .update(
                    property.id,
                    UpdatePropertyDto {
                        description: Some("   ".to_string()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();

            assert_eq!(described.description.as_deref(), Some("Sea view"));
            assert_eq!(cleared.description, None);

            Ok(())
        }
    }

    mod delete {
        use roost_test_utils::prelude::*;

        use crate::server::{
            data::unit::UnitRepository,
            error::{domain::DomainError, Error},
            service::property::PropertyService,
        };

        /// Expect the property and its units to be hidden afterwards
        #[tokio::test]
        async fn cascades_to_units() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let property = test.rental().insert_property(admin.id).await?;
            let unit = test.rental().insert_unit(property.id).await?;
            let service = PropertyService::new(&test.db);

            service.delete(property.id).await.unwrap();

            assert!(matches!(
                service.get(property.id).await,
                Err(Error::DomainError(DomainError::NotFound(_)))
            ));
            assert!(UnitRepository::new(&test.db).get(unit.id).await?.is_none());

            Ok(())
        }

        /// Expect Conflict while a unit has an active booking
        #[tokio::test]
        async fn rejects_with_active_booking() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let property = test.rental().insert_property(admin.id).await?;
            let unit = test.rental().insert_unit(property.id).await?;
            let guest = test.rental().insert_guest("ada@example.com").await?;
            test.rental()
                .insert_booking(unit.id, guest.id, date(2025, 6, 1), date(2025, 6, 5), "confirmed")
                .await?;

            let result = PropertyService::new(&test.db).delete(property.id).await;

            assert!(matches!(
                result,
                Err(Error::DomainError(DomainError::Conflict(_)))
            ));

            Ok(())
        }
    }
}
