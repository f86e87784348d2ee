use roost::model::booking::CreateBookingDto;
use roost_test_utils::prelude::*;

fn stay(unit_id: i32, guest_id: i32, check_in: (u32, u32), check_out: (u32, u32)) -> CreateBookingDto {
    CreateBookingDto {
        unit_id,
        guest_id,
        check_in: date(2025, check_in.0, check_in.1),
        check_out: date(2025, check_out.0, check_out.1),
        guests_count: 2,
        total_amount: None,
        notes: None,
    }
}

mod create_booking {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
        Json,
    };
    use roost::{
        model::{
            booking::{BookingDto, BookingStatus},
            unit::{UnitDto, UnitStatus},
        },
        server::controller::{booking::create_booking, unit::get_unit},
    };
    use roost_test_utils::prelude::*;

    use super::stay;
    use crate::util::{json_body, login_as, TestContextExt};

    /// Expect 201 with a pending booking priced from the nightly rate and the unit reserved
    #[tokio::test]
    async fn creates_pending_booking() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let staff = login_as(&test, &test.session, "staff@example.com", "staff").await?;
        let property = test.rental().insert_property(staff.id).await?;
        let unit = test.rental().insert_unit(property.id).await?;
        let guest = test.rental().insert_guest("ada@example.com").await?;
        let state = test.into_app_state();

        let response = create_booking(
            State(state.clone()),
            test.session.clone(),
            Json(stay(unit.id, guest.id, (6, 1), (6, 4))),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        let booking: BookingDto = json_body(response).await;
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.nights, 3);
        assert_eq!(booking.total_amount, 300.0);

        let response = get_unit(State(state), test.session.clone(), Path(unit.id))
            .await
            .into_response();
        let unit: UnitDto = json_body(response).await;
        assert_eq!(unit.status, UnitStatus::Reserved);

        Ok(())
    }

    /// Expect 409 when the stay overlaps an existing booking
    #[tokio::test]
    async fn rejects_overlapping_stay() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let staff = login_as(&test, &test.session, "staff@example.com", "staff").await?;
        let property = test.rental().insert_property(staff.id).await?;
        let unit = test.rental().insert_unit(property.id).await?;
        let guest = test.rental().insert_guest("ada@example.com").await?;
        test.rental()
            .insert_booking(unit.id, guest.id, date(2025, 6, 1), date(2025, 6, 4), "confirmed")
            .await?;

        let response = create_booking(
            State(test.into_app_state()),
            test.session.clone(),
            Json(stay(unit.id, guest.id, (6, 3), (6, 6))),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);

        Ok(())
    }

    /// Expect 400 when check out is not after check in
    #[tokio::test]
    async fn rejects_inverted_dates() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let staff = login_as(&test, &test.session, "staff@example.com", "staff").await?;
        let property = test.rental().insert_property(staff.id).await?;
        let unit = test.rental().insert_unit(property.id).await?;
        let guest = test.rental().insert_guest("ada@example.com").await?;

        let response = create_booking(
            State(test.into_app_state()),
            test.session.clone(),
            Json(stay(unit.id, guest.id, (6, 4), (6, 4))),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        Ok(())
    }

    /// Expect 401 without a logged in user
    #[tokio::test]
    async fn rejects_anonymous_session() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;

        let response = create_booking(
            State(test.into_app_state()),
            test.session.clone(),
            Json(stay(1, 1, (6, 1), (6, 4))),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        Ok(())
    }
}

mod change_booking_status {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
        Json,
    };
    use roost::{
        model::booking::{BookingDto, BookingStatus, BookingStatusDto},
        server::controller::booking::change_booking_status,
    };
    use roost_test_utils::prelude::*;

    use crate::util::{json_body, login_as, TestContextExt};

    /// Expect 200 when a confirmed booking checks in
    #[tokio::test]
    async fn checks_in_confirmed_booking() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let staff = login_as(&test, &test.session, "staff@example.com", "staff").await?;
        let property = test.rental().insert_property(staff.id).await?;
        let unit = test.rental().insert_unit(property.id).await?;
        let guest = test.rental().insert_guest("ada@example.com").await?;
        let booking = test
            .rental()
            .insert_booking(unit.id, guest.id, date(2025, 6, 1), date(2025, 6, 4), "confirmed")
            .await?;

        let response = change_booking_status(
            State(test.into_app_state()),
            test.session.clone(),
            Path(booking.id),
            Json(BookingStatusDto {
                status: BookingStatus::CheckedIn,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let booking: BookingDto = json_body(response).await;
        assert_eq!(booking.status, BookingStatus::CheckedIn);

        Ok(())
    }

    /// Expect 409 when a pending booking skips straight to checked out
    #[tokio::test]
    async fn rejects_invalid_transition() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let staff = login_as(&test, &test.session, "staff@example.com", "staff").await?;
        let property = test.rental().insert_property(staff.id).await?;
        let unit = test.rental().insert_unit(property.id).await?;
        let guest = test.rental().insert_guest("ada@example.com").await?;
        let booking = test
            .rental()
            .insert_booking(unit.id, guest.id, date(2025, 6, 1), date(2025, 6, 4), "pending")
            .await?;

        let response = change_booking_status(
            State(test.into_app_state()),
            test.session.clone(),
            Path(booking.id),
            Json(BookingStatusDto {
                status: BookingStatus::CheckedOut,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);

        Ok(())
    }
}
