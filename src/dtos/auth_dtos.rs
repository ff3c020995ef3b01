use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::profile::Profile;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Token bundle passed through from the hosted auth service.
#[derive(Debug, Serialize)]
pub struct SessionOut {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub token_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupOut {
    pub user_id: Uuid,
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct LoginOut {
    pub session: SessionOut,
    pub profile: Option<Profile>,
}
