use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

define_status_enum!(
    /// Access level of a user, ordered from most to least privileged
    Role {
        Admin => "admin",
        Manager => "manager",
        Staff => "staff",
    }
);

impl Role {
    fn rank(&self) -> u8 {
        match self {
            Role::Admin => 3,
            Role::Manager => 2,
            Role::Staff => 1,
        }
    }

    /// Returns true when this role grants at least the permissions of `required`
    pub fn at_least(&self, required: Role) -> bool {
        self.rank() >= required.rank()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
}

/// Access token issued by the authentication provider
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionLoginDto {
    pub access_token: String,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserDto {
    pub name: Option<String>,
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Default, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}
