//! Inventory items and their assignment to units.
//!
//! The quantity of an item assigned across all units never exceeds the item's stock.

use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};

use crate::{
    model::{
        api::{ListParams, Paginated},
        inventory::{
            AssignmentDto, CreateAssignmentDto, CreateInventoryItemDto, InventoryFilter,
            InventoryItemDto, ItemCondition, UpdateAssignmentDto, UpdateInventoryItemDto,
        },
    },
    server::{
        data::{
            inventory::{assignment::AssignmentRepository, InventoryItemRepository, INVENTORY_SORTABLE},
            unit::UnitRepository,
        },
        error::{domain::DomainError, Error},
        model::db::{assignment_dto, InventoryItemModel},
        util::{
            pagination::ListQuery,
            validate::{amount, at_least, optional_text, required_text, updated_text},
        },
    },
};

fn item_dto(item: InventoryItemModel, assigned: i64) -> InventoryItemDto {
    InventoryItemDto {
        id: item.id,
        name: item.name,
        category: item.category,
        description: item.description,
        quantity: item.quantity,
        assigned_quantity: i32::try_from(assigned).unwrap_or(i32::MAX),
        unit_cost: item.unit_cost,
        created_at: item.created_at,
        updated_at: item.updated_at,
    }
}

/// Conflict when assigning `quantity` more of an item would exceed its stock
async fn ensure_stock<C: ConnectionTrait>(
    db: &C,
    item: &InventoryItemModel,
    quantity: i32,
    exclude_assignment: Option<i32>,
) -> Result<(), Error> {
    let assigned = InventoryItemRepository::new(db)
        .assigned_quantity(item.id, exclude_assignment)
        .await?;

    if assigned + i64::from(quantity) > i64::from(item.quantity) {
        return Err(DomainError::conflict(format!(
            "Only {} of {} {} are unassigned",
            (i64::from(item.quantity) - assigned).max(0),
            item.quantity,
            item.name
        ))
        .into());
    }

    Ok(())
}

pub struct InventoryService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> InventoryService<'a> {
    /// Creates a new instance of [`InventoryService`]
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_item(&self, item_id: i32) -> Result<InventoryItemModel, Error> {
        Ok(InventoryItemRepository::new(self.db)
            .get(item_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Inventory item", item_id))?)
    }

    /// Lists items along with how many of each are assigned to units
    pub async fn list_items(
        &self,
        params: &ListParams,
        filter: &InventoryFilter,
    ) -> Result<Paginated<InventoryItemDto>, Error> {
        let query = ListQuery::from_params(
            params,
            INVENTORY_SORTABLE,
            entity::inventory_item::Column::CreatedAt,
        )?;
        let item_repo = InventoryItemRepository::new(self.db);

        let page = item_repo.list(&query, filter).await?;

        let ids: Vec<i32> = page.items.iter().map(|item| item.id).collect();
        let assigned = item_repo.assigned_quantities(&ids).await?;

        Ok(page.map(|item| {
            let quantity = assigned.get(&item.id).copied().unwrap_or(0);
            item_dto(item, quantity)
        }))
    }

    pub async fn get_item(&self, item_id: i32) -> Result<InventoryItemDto, Error> {
        let item = self.find_item(item_id).await?;

        let assigned = InventoryItemRepository::new(self.db)
            .assigned_quantity(item.id, None)
            .await?;

        Ok(item_dto(item, assigned))
    }

    pub async fn create_item(
        &self,
        item: CreateInventoryItemDto,
    ) -> Result<InventoryItemDto, Error> {
        let item = CreateInventoryItemDto {
            name: required_text("name", &item.name)?,
            category: required_text("category", &item.category)?,
            description: optional_text(item.description),
            quantity: at_least("quantity", item.quantity, 0)?,
            unit_cost: amount("unit_cost", item.unit_cost)?,
        };

        let created = InventoryItemRepository::new(self.db).create(&item).await?;

        tracing::info!("Created inventory item ID {} ({})", created.id, created.name);

        Ok(item_dto(created, 0))
    }

    /// Updates an item, stock may not drop below what is assigned to units.
    ///
    /// # Returns
    /// - `Ok(InventoryItemDto)` - The updated item
    /// - `Err(DomainError::NotFound)` - No item with `item_id`
    /// - `Err(DomainError::Conflict)` - New stock is below the assigned quantity
    pub async fn update_item(
        &self,
        item_id: i32,
        update: UpdateInventoryItemDto,
    ) -> Result<InventoryItemDto, Error> {
        let update = UpdateInventoryItemDto {
            name: updated_text("name", update.name)?,
            category: updated_text("category", update.category)?,
            description: update.description,
            quantity: update
                .quantity
                .map(|quantity| at_least("quantity", quantity, 0))
                .transpose()?,
            unit_cost: update
                .unit_cost
                .map(|cost| amount("unit_cost", cost))
                .transpose()?,
        };

        let txn = self.db.begin().await?;
        let item_repo = InventoryItemRepository::new(&txn);

        let item = item_repo
            .get(item_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Inventory item", item_id))?;
        let assigned = item_repo.assigned_quantity(item.id, None).await?;

        if let Some(quantity) = update.quantity {
            if i64::from(quantity) < assigned {
                return Err(DomainError::conflict(format!(
                    "{} of {} are assigned to units, stock cannot drop to {}",
                    assigned, item.name, quantity
                ))
                .into());
            }
        }

        let updated = item_repo.update(item, &update).await?;

        txn.commit().await?;

        Ok(item_dto(updated, assigned))
    }

    /// Soft deletes an item that is not assigned to any unit
    pub async fn delete_item(&self, item_id: i32) -> Result<(), Error> {
        let item = self.find_item(item_id).await?;

        if AssignmentRepository::new(self.db)
            .exists_for_item(item.id)
            .await?
        {
            return Err(DomainError::conflict(format!(
                "{} is still assigned to units",
                item.name
            ))
            .into());
        }

        InventoryItemRepository::new(self.db)
            .soft_delete(item, Utc::now().naive_utc())
            .await?;

        tracing::info!("Deleted inventory item ID {}", item_id);

        Ok(())
    }

    /// Assignments of a unit with their item names
    pub async fn unit_inventory(&self, unit_id: i32) -> Result<Vec<AssignmentDto>, Error> {
        UnitRepository::new(self.db)
            .get(unit_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Unit", unit_id))?;

        AssignmentRepository::new(self.db)
            .for_unit(unit_id)
            .await?
            .into_iter()
            .map(|(assignment, item)| {
                let item_name = item.map(|item| item.name).unwrap_or_default();
                assignment_dto(assignment, item_name)
            })
            .collect()
    }

    /// Assigns part of an item's stock to a unit.
    ///
    /// # Returns
    /// - `Ok(AssignmentDto)` - The new assignment
    /// - `Err(DomainError::Validation)` - Quantity below 1
    /// - `Err(DomainError::NotFound)` - Item or unit missing
    /// - `Err(DomainError::Conflict)` - Item already assigned to the unit or not enough stock
    pub async fn assign(&self, assignment: CreateAssignmentDto) -> Result<AssignmentDto, Error> {
        let quantity = at_least("quantity", assignment.quantity, 1)?;

        let txn = self.db.begin().await?;
        let assignment_repo = AssignmentRepository::new(&txn);

        let item = InventoryItemRepository::new(&txn)
            .get(assignment.item_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Inventory item", assignment.item_id))?;
        UnitRepository::new(&txn)
            .get(assignment.unit_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Unit", assignment.unit_id))?;

        if assignment_repo
            .find(item.id, assignment.unit_id)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(format!(
                "{} is already assigned to unit {}",
                item.name, assignment.unit_id
            ))
            .into());
        }

        ensure_stock(&txn, &item, quantity, None).await?;

        let created = assignment_repo
            .create(
                item.id,
                assignment.unit_id,
                quantity,
                assignment.condition.unwrap_or(ItemCondition::Good),
            )
            .await?;

        txn.commit().await?;

        tracing::info!(
            "Assigned {} of item ID {} to unit ID {}",
            quantity,
            item.id,
            created.unit_id
        );

        assignment_dto(created, item.name)
    }

    pub async fn update_assignment(
        &self,
        assignment_id: i32,
        update: UpdateAssignmentDto,
    ) -> Result<AssignmentDto, Error> {
        let quantity = update
            .quantity
            .map(|quantity| at_least("quantity", quantity, 0))
            .transpose()?;

        let txn = self.db.begin().await?;
        let assignment_repo = AssignmentRepository::new(&txn);

        let assignment = assignment_repo
            .get(assignment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Assignment", assignment_id))?;
        let item = InventoryItemRepository::new(&txn)
            .find_by_id(assignment.item_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Inventory item", assignment.item_id))?;

        if let Some(quantity) = quantity {
            ensure_stock(&txn, &item, quantity, Some(assignment.id)).await?;
        }

        let updated = assignment_repo
            .update(assignment, quantity, update.condition)
            .await?;

        txn.commit().await?;

        assignment_dto(updated, item.name)
    }

    /// Removes an assignment, those recorded by a checkout report are kept
    pub async fn remove_assignment(&self, assignment_id: i32) -> Result<(), Error> {
        let assignment_repo = AssignmentRepository::new(self.db);

        let assignment = assignment_repo
            .get(assignment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Assignment", assignment_id))?;

        if assignment_repo.has_item_checks(assignment.id).await? {
            return Err(DomainError::conflict(format!(
                "Assignment {} is referenced by checkout reports",
                assignment.id
            ))
            .into());
        }

        assignment_repo.delete(assignment.id).await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    mod items {
        use roost_test_utils::prelude::*;

        use crate::{
            model::inventory::UpdateInventoryItemDto,
            server::{
                error::{domain::DomainError, Error},
                service::inventory::InventoryService,
            },
        };

        /// Expect Conflict when stock would drop below the assigned quantity
        #[tokio::test]
        async fn stock_covers_assignments() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let property = test.rental().insert_property(admin.id).await?;
            let unit = test.rental().insert_unit(property.id).await?;
            let towels = test.inventory().insert_item("Towel", 10).await?;
            test.inventory().insert_assignment(towels.id, unit.id, 6).await?;
            let service = InventoryService::new(&test.db);

            let too_low = service
                .update_item(
                    towels.id,
                    UpdateInventoryItemDto {
                        quantity: Some(5),
                        ..Default::default()
                    },
                )
                .await;
            let enough = service
                .update_item(
                    towels.id,
                    UpdateInventoryItemDto {
                        quantity: Some(6),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();

            assert!(matches!(
                too_low,
                Err(Error::DomainError(DomainError::Conflict(_)))
            ));
            assert_eq!(enough.quantity, 6);
            assert_eq!(enough.assigned_quantity, 6);

            Ok(())
        }

        /// Expect a blank description to clear the stored one
        #[tokio::test]
        async fn blank_description_clears() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let towels = test.inventory().insert_item("Towel", 10).await?;
            let service = InventoryService::new(&test.db);

            let described = service
                .update_item(
                    towels.id,
                    UpdateInventoryItemDto {
                        description: Some(" Bath, white ".to_string()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
            let cleared = service
                .update_item(
                    towels.id,
                    UpdateInventoryItemDto {
                        description: Some(String::new()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();

            assert_eq!(described.description.as_deref(), Some("Bath, white"));
            assert_eq!(cleared.description, None);

            Ok(())
        }

        /// Expect Conflict while the item is assigned
        #[tokio::test]
        async fn delete_requires_no_assignments() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let property = test.rental().insert_property(admin.id).await?;
            let unit = test.rental().insert_unit(property.id).await?;
            let towels = test.inventory().insert_item("Towel", 10).await?;
            let kettle = test.inventory().insert_item("Kettle", 1).await?;
            test.inventory().insert_assignment(towels.id, unit.id, 2).await?;
            let service = InventoryService::new(&test.db);

            assert!(matches!(
                service.delete_item(towels.id).await,
                Err(Error::DomainError(DomainError::Conflict(_)))
            ));
            service.delete_item(kettle.id).await.unwrap();
            assert!(matches!(
                service.get_item(kettle.id).await,
                Err(Error::DomainError(DomainError::NotFound(_)))
            ));

            Ok(())
        }
    }

    mod assignments {
        use roost_test_utils::prelude::*;

        use crate::{
            model::inventory::{CreateAssignmentDto, ItemCondition, UpdateAssignmentDto},
            server::{
                error::{domain::DomainError, Error},
                service::inventory::InventoryService,
            },
        };

        fn assignment(item_id: i32, unit_id: i32, quantity: i32) -> CreateAssignmentDto {
            CreateAssignmentDto {
                item_id,
                unit_id,
                quantity,
                condition: None,
            }
        }

        /// Expect assignments across units to be limited by the item's stock
        #[tokio::test]
        async fn limits_assignments_to_stock() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let property = test.rental().insert_property(admin.id).await?;
            let first = test.rental().insert_unit(property.id).await?;
            let second = test.rental().insert_unit(property.id).await?;
            let towels = test.inventory().insert_item("Towel", 10).await?;
            let service = InventoryService::new(&test.db);

            let created = service.assign(assignment(towels.id, first.id, 7)).await.unwrap();
            let over = service.assign(assignment(towels.id, second.id, 4)).await;
            let rest = service.assign(assignment(towels.id, second.id, 3)).await;

            assert_eq!(created.item_name, "Towel");
            assert_eq!(created.condition, ItemCondition::Good);
            assert!(matches!(
                over,
                Err(Error::DomainError(DomainError::Conflict(_)))
            ));
            assert!(rest.is_ok());

            Ok(())
        }

        /// Expect Conflict when the item is already assigned to the unit
        #[tokio::test]
        async fn rejects_duplicate_assignment() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let property = test.rental().insert_property(admin.id).await?;
            let unit = test.rental().insert_unit(property.id).await?;
            let towels = test.inventory().insert_item("Towel", 10).await?;
            test.inventory().insert_assignment(towels.id, unit.id, 2).await?;

            let result = InventoryService::new(&test.db)
                .assign(assignment(towels.id, unit.id, 1))
                .await;

            assert!(matches!(
                result,
                Err(Error::DomainError(DomainError::Conflict(_)))
            ));

            Ok(())
        }

        /// Expect an update to count only the other assignments against the stock
        #[tokio::test]
        async fn update_excludes_itself_from_stock() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let property = test.rental().insert_property(admin.id).await?;
            let unit = test.rental().insert_unit(property.id).await?;
            let towels = test.inventory().insert_item("Towel", 10).await?;
            let existing = test.inventory().insert_assignment(towels.id, unit.id, 8).await?;

            let updated = InventoryService::new(&test.db)
                .update_assignment(
                    existing.id,
                    UpdateAssignmentDto {
                        quantity: Some(10),
                        condition: Some(ItemCondition::Damaged),
                    },
                )
                .await
                .unwrap();

            assert_eq!(updated.quantity, 10);
            assert_eq!(updated.condition, ItemCondition::Damaged);

            Ok(())
        }

        /// Expect the unit's assignments to be listed with item names
        #[tokio::test]
        async fn lists_unit_inventory() -> Result<(), TestError> {
            let test = TestBuilder::new().with_all_tables().build().await?;
            let admin = test.user().insert_admin().await?;
            let property = test.rental().insert_property(admin.id).await?;
            let unit = test.rental().insert_unit(property.id).await?;
            let towels = test.inventory().insert_item("Towel", 10).await?;
            test.inventory().insert_assignment(towels.id, unit.id, 2).await?;

            let inventory = InventoryService::new(&test.db)
                .unit_inventory(unit.id)
                .await
                .unwrap();

            assert_eq!(inventory.len(), 1);
            assert_eq!(inventory[0].item_name, "Towel");
            assert_eq!(inventory[0].quantity, 2);

            Ok(())
        }
    }
}
