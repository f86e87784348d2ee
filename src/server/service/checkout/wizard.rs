//! Step transitions of the checkout wizard.
//!
//! These functions only look at the draft itself, anything that needs the database is checked
//! by [`CheckoutService`](super::CheckoutService) before a step is applied.

use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::{
    model::checkout::{
        CheckoutDraft, CheckoutStep, ConditionStepDto, ExpectedItemDto, ItemCheckInput,
    },
    server::{
        error::domain::DomainError,
        util::validate::{amount, at_least, optional_text},
    },
};

pub fn new_draft(
    booking_id: i32,
    unit_id: i32,
    expected: Vec<ExpectedItemDto>,
    started_at: NaiveDateTime,
) -> CheckoutDraft {
    CheckoutDraft {
        booking_id,
        unit_id,
        step: CheckoutStep::Inventory,
        expected,
        inventory: None,
        condition: None,
        media_ids: Vec::new(),
        started_at,
    }
}

/// Conflict unless the draft is waiting for `step`
fn expect_step(draft: &CheckoutDraft, step: CheckoutStep) -> Result<(), DomainError> {
    if draft.step != step {
        return Err(DomainError::conflict(format!(
            "Checkout is at the {} step, cannot complete the {} step",
            draft.step, step
        )));
    }

    Ok(())
}

/// Records the item checks, one per expected assignment.
///
/// # Returns
/// - `Ok(CheckoutDraft)` - Draft moved to the condition step
/// - `Err(DomainError::Conflict)` - Draft is not at the inventory step
/// - `Err(DomainError::Validation)` - Unknown, duplicate or missing assignments, or a found
///   quantity outside of 0 to the expected quantity
pub fn apply_inventory(
    mut draft: CheckoutDraft,
    checks: Vec<ItemCheckInput>,
) -> Result<CheckoutDraft, DomainError> {
    expect_step(&draft, CheckoutStep::Inventory)?;

    let mut seen = HashSet::new();
    let mut cleaned = Vec::with_capacity(checks.len());

    for check in checks {
        let Some(expected) = draft
            .expected
            .iter()
            .find(|item| item.assignment_id == check.assignment_id)
        else {
            return Err(DomainError::validation(format!(
                "checks: assignment {} is not part of this checkout",
                check.assignment_id
            )));
        };

        if !seen.insert(check.assignment_id) {
            return Err(DomainError::validation(format!(
                "checks: assignment {} is listed more than once",
                check.assignment_id
            )));
        }

        at_least("found_quantity", check.found_quantity, 0)?;
        if check.found_quantity > expected.expected_quantity {
            return Err(DomainError::validation(format!(
                "found_quantity: {} exceeds the {} expected for {}",
                check.found_quantity, expected.expected_quantity, expected.item_name
            )));
        }

        cleaned.push(ItemCheckInput {
            notes: optional_text(check.notes),
            ..check
        });
    }

    if let Some(missing) = draft
        .expected
        .iter()
        .find(|item| !seen.contains(&item.assignment_id))
    {
        return Err(DomainError::validation(format!(
            "checks: missing a check for {} (assignment {})",
            missing.item_name, missing.assignment_id
        )));
    }

    draft.inventory = Some(cleaned);
    draft.step = CheckoutStep::Condition;

    Ok(draft)
}

/// Records cleanliness and damages, a description is required when damages were found
pub fn apply_condition(
    mut draft: CheckoutDraft,
    condition: ConditionStepDto,
) -> Result<CheckoutDraft, DomainError> {
    expect_step(&draft, CheckoutStep::Condition)?;

    if !(1..=5).contains(&condition.cleanliness_rating) {
        return Err(DomainError::validation(
            "cleanliness_rating: must be between 1 and 5",
        ));
    }

    let damage_charge = amount("damage_charge", condition.damage_charge)?;
    let damage_description = optional_text(condition.damage_description);

    if condition.damages_found && damage_description.is_none() {
        return Err(DomainError::validation(
            "damage_description: required when damages were found",
        ));
    }

    draft.condition = Some(ConditionStepDto {
        cleanliness_rating: condition.cleanliness_rating,
        damages_found: condition.damages_found,
        damage_description,
        damage_charge,
        notes: optional_text(condition.notes),
    });
    draft.step = CheckoutStep::Photos;

    Ok(draft)
}

/// Selects photos already verified to belong to the booking
pub fn apply_photos(
    mut draft: CheckoutDraft,
    media_ids: Vec<i32>,
) -> Result<CheckoutDraft, DomainError> {
    expect_step(&draft, CheckoutStep::Photos)?;

    let mut seen = HashSet::new();
    draft.media_ids = media_ids
        .into_iter()
        .filter(|id| seen.insert(*id))
        .collect();
    draft.step = CheckoutStep::Review;

    Ok(draft)
}

pub fn back(mut draft: CheckoutDraft) -> CheckoutDraft {
    draft.step = draft.step.prev();
    draft
}

/// Item checks and condition of a draft that can be submitted.
///
/// Photos are optional, so a draft at the photos step can be submitted as is.
pub fn ready_to_submit(
    draft: &CheckoutDraft,
) -> Result<(&[ItemCheckInput], &ConditionStepDto), DomainError> {
    let not_ready =
        || DomainError::conflict("Complete the inventory and condition steps before submitting");

    if !draft.step.reached(CheckoutStep::Photos) {
        return Err(not_ready());
    }

    match (&draft.inventory, &draft.condition) {
        (Some(inventory), Some(condition)) => Ok((inventory, condition)),
        _ => Err(not_ready()),
    }
}

/// Quantity snapshotted for an assignment when the checkout started
pub fn expected_quantity(draft: &CheckoutDraft, assignment_id: i32) -> Option<i32> {
    draft
        .expected
        .iter()
        .find(|item| item.assignment_id == assignment_id)
        .map(|item| item.expected_quantity)
}
