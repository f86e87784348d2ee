mod accept_invitation {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
        Json,
    };
    use roost::{
        model::{
            invitation::{AcceptInvitationDto, CreateInvitationDto, InvitationDto},
            user::{Role, UserDto},
        },
        server::controller::{
            auth::get_user,
            invitation::{accept_invitation, create_invitation, lookup_invitation},
        },
    };
    use roost_test_utils::prelude::*;

    use crate::util::{json_body, login_as, TestContextExt};

    /// Expect an invited user to join with the invited role and be logged in
    #[tokio::test]
    async fn joins_with_invited_role() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        login_as(&test, &test.session, "admin@example.com", "admin").await?;
        let state = test.into_app_state();

        let response = create_invitation(
            State(state.clone()),
            test.session.clone(),
            Json(CreateInvitationDto {
                email: "New@Example.com".to_string(),
                role: Role::Manager,
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
        let invitation: InvitationDto = json_body(response).await;
        assert_eq!(invitation.email, "new@example.com");

        let response = lookup_invitation(State(state.clone()), Path(invitation.token.clone()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let invitee_session = test.new_session();
        let response = accept_invitation(
            State(state.clone()),
            invitee_session.clone(),
            Path(invitation.token),
            Json(AcceptInvitationDto {
                access_token: access_token(&subject_for("new@example.com"), "new@example.com")?,
                name: "Grace Hopper".to_string(),
            }),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = get_user(State(state), invitee_session).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let user: UserDto = json_body(response).await;
        assert_eq!(user.role, Role::Manager);
        assert_eq!(user.email, "new@example.com");

        Ok(())
    }

    /// Expect 404 for an unknown token
    #[tokio::test]
    async fn rejects_unknown_token() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;

        let response = lookup_invitation(State(test.into_app_state()), Path("nope".to_string()))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        Ok(())
    }

    /// Expect 403 when a manager tries to invite
    #[tokio::test]
    async fn rejects_non_admin() -> Result<(), TestError> {
        let test = TestBuilder::new().with_all_tables().build().await?;
        login_as(&test, &test.session, "manager@example.com", "manager").await?;

        let response = create_invitation(
            State(test.into_app_state()),
            test.session.clone(),
            Json(CreateInvitationDto {
                email: "new@example.com".to_string(),
                role: Role::Staff,
            }),
        )
        .await
        .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        Ok(())
    }
}
