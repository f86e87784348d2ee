use roost::model::property::{CreatePropertyDto, PropertyType};

fn harbour_view() -> CreatePropertyDto {
    CreatePropertyDto {
        name: "Harbour View".to_string(),
        address: "1 Rua Augusta".to_string(),
        city: "Lisbon".to_string(),
        country: "Portugal".to_string(),
        description: None,
        property_type: PropertyType::Apartment,
    }
}

mod create_property {
    use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
    use roost::{model::property::PropertyDto, server::controller::property::create_property};
    use roost_test_utils::prelude::*;

    use super::harbour_view;
    use crate::util::{json_body, login_as, TestContextExt};

    /// Expect 201 with the created property for a manager
    #[tokio::test]
    async fn creates_property_for_manager() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        login_as(&test, &test.session, "manager@example.com", "manager").await?;

        let response = create_property(
            State(test.into_app_state()),
            test.session.clone(),
            Json(harbour_view()),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        let property: PropertyDto = json_body(response).await;
        assert_eq!(property.name, "Harbour View");
        assert_eq!(property.city, "Lisbon");

        Ok(())
    }

    /// Expect 403 when staff try to create a property
    #[tokio::test]
    async fn rejects_staff() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        login_as(&test, &test.session, "staff@example.com", "staff").await?;

        let response = create_property(
            State(test.into_app_state()),
            test.session.clone(),
            Json(harbour_view()),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        Ok(())
    }

    /// Expect 400 when the name is blank
    #[tokio::test]
    async fn rejects_blank_name() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        login_as(&test, &test.session, "manager@example.com", "manager").await?;

        let mut property = harbour_view();
        property.name = "   ".to_string();

        let response = create_property(
            State(test.into_app_state()),
            test.session.clone(),
            Json(property),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        Ok(())
    }
}

mod get_property {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use roost::server::controller::property::get_property;
    use roost_test_utils::prelude::*;

    use crate::util::{login_as, TestContextExt};

    /// Expect 404 for a property that does not exist
    #[tokio::test]
    async fn returns_not_found() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        login_as(&test, &test.session, "staff@example.com", "staff").await?;

        let response = get_property(State(test.into_app_state()), test.session.clone(), Path(42))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        Ok(())
    }
}

mod delete_property {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use roost::server::controller::property::{delete_property, get_property};
    use roost_test_utils::prelude::*;

    use crate::util::{login_as, TestContextExt};

    /// Expect 204 and the property gone afterwards
    #[tokio::test]
    async fn deletes_property_without_bookings() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let manager = login_as(&test, &test.session, "manager@example.com", "manager").await?;
        let property = test.rental().insert_property(manager.id).await?;
        test.rental().insert_unit(property.id).await?;
        let state = test.into_app_state();

        let response = delete_property(State(state.clone()), test.session.clone(), Path(property.id))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = get_property(State(state), test.session.clone(), Path(property.id))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        Ok(())
    }

    /// Expect 409 while a unit of the property has an active booking
    #[tokio::test]
    async fn rejects_property_with_active_booking() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let manager = login_as(&test, &test.session, "manager@example.com", "manager").await?;
        let property = test.rental().insert_property(manager.id).await?;
        let unit = test.rental().insert_unit(property.id).await?;
        let guest = test.rental().insert_guest("ada@example.com").await?;
        test.rental()
            .insert_booking(unit.id, guest.id, date(2025, 6, 1), date(2025, 6, 4), "confirmed")
            .await?;

        let response = delete_property(
            State(test.into_app_state()),
            test.session.clone(),
            Path(property.id),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);

        Ok(())
    }
}
