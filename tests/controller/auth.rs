mod get_user {
    use axum::{extract::State, http::StatusCode, response::IntoResponse};
    use roost::server::{
        controller::auth::get_user,
        model::session::user::{SessionUserId, SESSION_USER_ID_KEY},
    };
    use roost_test_utils::prelude::*;

    use crate::util::{login_as, TestContextExt};

    /// Expect 200 for a logged in user
    #[tokio::test]
    async fn returns_logged_in_user() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        login_as(&test, &test.session, "staff@example.com", "staff").await?;

        let response = get_user(State(test.into_app_state()), test.session.clone())
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);

        Ok(())
    }

    /// Expect 401 when nobody is logged in
    #[tokio::test]
    async fn rejects_anonymous_session() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;

        let response = get_user(State(test.into_app_state()), test.session.clone())
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        Ok(())
    }

    /// Expect 403 for a deactivated account
    #[tokio::test]
    async fn rejects_inactive_user() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let user = test
            .user()
            .insert_inactive_user("gone@example.com", "staff")
            .await?;
        test.session
            .insert(SESSION_USER_ID_KEY, SessionUserId(user.id.to_string()))
            .await?;

        let response = get_user(State(test.into_app_state()), test.session.clone())
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        Ok(())
    }
}

mod login {
    use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
    use roost::{
        model::user::SessionLoginDto,
        server::{controller::auth::login, model::session::user::SessionUserId},
    };
    use roost_test_utils::prelude::*;

    use crate::util::TestContextExt;

    /// Expect 200 and the user stored in the session for a known subject
    #[tokio::test]
    async fn stores_user_in_session() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        let user = test.user().insert_user("staff@example.com", "staff").await?;
        let token = access_token(&subject_for("staff@example.com"), "staff@example.com")?;

        let response = login(
            State(test.into_app_state()),
            test.session.clone(),
            Json(SessionLoginDto {
                access_token: token,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(matches!(SessionUserId::get(&test.session).await, Ok(Some(id)) if id == user.id));

        Ok(())
    }

    /// Expect 401 for a token signed with another secret
    #[tokio::test]
    async fn rejects_forged_token() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        test.user().insert_user("staff@example.com", "staff").await?;
        let token = signed_token(
            &subject_for("staff@example.com"),
            "staff@example.com",
            "not-the-secret",
            chrono::Duration::hours(1),
        )?;

        let response = login(
            State(test.into_app_state()),
            test.session.clone(),
            Json(SessionLoginDto {
                access_token: token,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        Ok(())
    }
}

mod logout {
    use axum::{http::StatusCode, response::IntoResponse};
    use roost::server::{controller::auth::logout, model::session::user::SessionUserId};
    use roost_test_utils::prelude::*;

    use crate::util::login_as;

    /// Expect 204 and an empty session after logging out
    #[tokio::test]
    async fn clears_session() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        login_as(&test, &test.session, "staff@example.com", "staff").await?;

        let response = logout(test.session.clone()).await.into_response();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(matches!(SessionUserId::get(&test.session).await, Ok(None)));

        Ok(())
    }
}
