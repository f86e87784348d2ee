use tower_sessions::Session;

use crate::{
    model::user::{Role, UserDto},
    server::{
        error::{auth::AuthError, Error},
        model::{app::AppState, session::user::SessionUserId},
        service::user::UserService,
    },
};

/// Retrieves user information from session and then from database
///
/// # Arguments
/// - `state`: Application state with database connection
/// - `session`: The user's session
///
/// # Returns
/// - `Ok(UserDto)`: Active user found
/// - `Err(Error::AuthError(AuthError::UserNotInSession))`: User ID not present in session
/// - `Err(Error::AuthError(AuthError::UserNotInDatabase))`: User ID exists in session but not
///   found in database (session is cleared)
/// - `Err(Error::AuthError(AuthError::UserInactive))`: User was deactivated (session is cleared)
/// - `Err(Error)`: Internal errors (database query failures, session errors, etc.)
pub async fn get_user_from_session(state: &AppState, session: &Session) -> Result<UserDto, Error> {
    let Some(user_id) = SessionUserId::get(session).await? else {
        return Err(Error::AuthError(AuthError::UserNotInSession));
    };

    let Some(user) = UserService::new(&state.db).get_user(user_id).await? else {
        session.clear().await;

        tracing::debug!(
            "Session cleared for user ID {} with active session but was not found in database",
            user_id
        );

        return Err(Error::AuthError(AuthError::UserNotInDatabase(user_id)));
    };

    if !user.is_active {
        session.clear().await;

        tracing::debug!("Session cleared for deactivated user ID {}", user_id);

        return Err(Error::AuthError(AuthError::UserInactive(user_id)));
    }

    Ok(user)
}

/// Retrieves the session user and checks that their role is at least `required`
///
/// # Returns
/// - `Ok(UserDto)`: User with a sufficient role
/// - `Err(Error::AuthError(AuthError::InsufficientRole))`: User's role is below `required`
/// - `Err(Error)`: Any error of [`get_user_from_session`]
pub async fn require_role(
    state: &AppState,
    session: &Session,
    required: Role,
) -> Result<UserDto, Error> {
    let user = get_user_from_session(state, session).await?;

    if !user.role.at_least(required) {
        return Err(Error::AuthError(AuthError::InsufficientRole {
            user_id: user.id,
            required,
        }));
    }

    Ok(user)
}
