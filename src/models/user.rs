use serde::{Deserialize, Serialize};

/// Application roles (many-to-many on users).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Technician,
    Cashier,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Technician => "technician",
            Role::Cashier => "cashier",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub status: UserStatus,
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Signed-in user as carried in the auth snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<Role>,
}

/// Response of POST /login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResult {
    pub token: String,
    pub user: AuthUser,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserPayload {
    pub name: String,
    pub email: String,
    pub password: String,
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserPayload {
    pub name: String,
    pub email: String,
    pub roles: Vec<Role>,
}
