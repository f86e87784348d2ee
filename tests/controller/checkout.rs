use roost_test_utils::prelude::*;

/// A checked in booking with one towel assignment and one booking photo
struct Stay {
    booking_id: i32,
    assignment_id: i32,
    media_id: i32,
}

async fn checked_in_stay(test: &TestContext, staff_id: i32) -> Result<Stay, TestError> {
    let property = test.rental().insert_property(staff_id).await?;
    let unit = test
        .rental()
        .insert_unit_with_status(property.id, "occupied")
        .await?;
    let guest = test.rental().insert_guest("ada@example.com").await?;
    let booking = test
        .rental()
        .insert_booking(unit.id, guest.id, date(2025, 6, 1), date(2025, 6, 4), "checked_in")
        .await?;
    let towels = test.inventory().insert_item("Towel", 10).await?;
    let assignment = test
        .inventory()
        .insert_assignment(towels.id, unit.id, 3)
        .await?;
    let photo = test
        .media()
        .insert_media("booking", booking.id, "bathroom.jpg")
        .await?;

    Ok(Stay {
        booking_id: booking.id,
        assignment_id: assignment.id,
        media_id: photo.id,
    })
}

mod wizard {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
        Json,
    };
    use roost::{
        model::{
            booking::{BookingDto, BookingStatus},
            checkout::{
                CheckoutDraft, CheckoutReportDetailDto, CheckoutStep, ConditionStepDto,
                InventoryStepDto, ItemCheckInput, PhotosStepDto, StartCheckoutDto,
            },
            inventory::ItemCondition,
        },
        server::controller::{
            booking::get_booking,
            checkout::{
                checkout_condition, checkout_inventory, checkout_photos, get_checkout,
                start_checkout, submit_checkout,
            },
        },
    };
    use roost_test_utils::prelude::*;

    use super::checked_in_stay;
    use crate::util::{json_body, login_as, TestContextExt};

    fn condition() -> ConditionStepDto {
        ConditionStepDto {
            cleanliness_rating: 4,
            damages_found: false,
            damage_description: None,
            damage_charge: 0.0,
            notes: None,
        }
    }

    /// Expect every step to advance the draft and submit to create the report
    #[tokio::test]
    async fn completes_checkout() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let staff = login_as(&test, &test.session, "staff@example.com", "staff").await?;
        let stay = checked_in_stay(&test, staff.id).await?;
        let state = test.into_app_state();

        let response = start_checkout(
            State(state.clone()),
            test.session.clone(),
            Json(StartCheckoutDto {
                booking_id: stay.booking_id,
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let draft: CheckoutDraft = json_body(response).await;
        assert_eq!(draft.step, CheckoutStep::Inventory);
        assert_eq!(draft.expected.len(), 1);
        assert_eq!(draft.expected[0].expected_quantity, 3);

        let response = checkout_inventory(
            State(state.clone()),
            test.session.clone(),
            Json(InventoryStepDto {
                checks: vec![ItemCheckInput {
                    assignment_id: stay.assignment_id,
                    found_quantity: 2,
                    condition: ItemCondition::Damaged,
                    notes: Some("One towel torn".to_string()),
                }],
            }),
        )
        .await
        .into_response();
        let draft: CheckoutDraft = json_body(response).await;
        assert_eq!(draft.step, CheckoutStep::Condition);

        let response = checkout_condition(State(state.clone()), test.session.clone(), Json(condition()))
            .await
            .into_response();
        let draft: CheckoutDraft = json_body(response).await;
        assert_eq!(draft.step, CheckoutStep::Photos);

        let response = checkout_photos(
            State(state.clone()),
            test.session.clone(),
            Json(PhotosStepDto {
                media_ids: vec![stay.media_id],
            }),
        )
        .await
        .into_response();
        let draft: CheckoutDraft = json_body(response).await;
        assert_eq!(draft.step, CheckoutStep::Review);

        let response = submit_checkout(State(state.clone()), test.session.clone())
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        let report: CheckoutReportDetailDto = json_body(response).await;
        assert_eq!(report.report.booking_id, stay.booking_id);
        assert_eq!(report.report.inspector_id, staff.id);
        assert_eq!(report.checks.len(), 1);
        assert_eq!(report.checks[0].expected_quantity, 3);
        assert_eq!(report.checks[0].found_quantity, 2);
        assert_eq!(report.media.len(), 1);

        let response = get_checkout(State(state.clone()), test.session.clone())
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = get_booking(State(state), test.session.clone(), Path(stay.booking_id))
            .await
            .into_response();
        let booking: BookingDto = json_body(response).await;
        assert_eq!(booking.status, BookingStatus::CheckedOut);

        Ok(())
    }

    /// Expect 409 when a step is posted before the previous one
    #[tokio::test]
    async fn rejects_out_of_order_step() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let staff = login_as(&test, &test.session, "staff@example.com", "staff").await?;
        let stay = checked_in_stay(&test, staff.id).await?;
        let state = test.into_app_state();

        start_checkout(
            State(state.clone()),
            test.session.clone(),
            Json(StartCheckoutDto {
                booking_id: stay.booking_id,
            }),
        )
        .await
        .into_response();

        let response = checkout_condition(State(state), test.session.clone(), Json(condition()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);

        Ok(())
    }

    /// Expect 409 when submitting without a checkout in progress
    #[tokio::test]
    async fn rejects_submit_without_draft() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        login_as(&test, &test.session, "staff@example.com", "staff").await?;

        let response = submit_checkout(State(test.into_app_state()), test.session.clone())
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);

        Ok(())
    }

    /// Expect 409 when the booking is not checked in
    #[tokio::test]
    async fn rejects_confirmed_booking() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let staff = login_as(&test, &test.session, "staff@example.com", "staff").await?;
        let property = test.rental().insert_property(staff.id).await?;
        let unit = test.rental().insert_unit(property.id).await?;
        let guest = test.rental().insert_guest("ada@example.com").await?;
        let booking = test
            .rental()
            .insert_booking(unit.id, guest.id, date(2025, 6, 1), date(2025, 6, 4), "confirmed")
            .await?;

        let response = start_checkout(
            State(test.into_app_state()),
            test.session.clone(),
            Json(StartCheckoutDto {
                booking_id: booking.id,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);

        Ok(())
    }
}
