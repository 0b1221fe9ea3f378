use serde::{Deserialize, Serialize};

use crate::models::{Account, Role};

// -- JWT Claims --

/// JWT claims shared between token creation (auth handlers) and the
/// request middleware. Canonical definition lives here in helpdesk-types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub email: String,
    pub role: Role,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub account_id: i64,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Optional role filter: a login form scoped to one panel can require
    /// the account to hold that role.
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub account: Account,
    pub token: String,
}

// -- Tickets --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitTicketRequest {
    pub heading: String,
    pub description: String,
    pub phone: String,
}
