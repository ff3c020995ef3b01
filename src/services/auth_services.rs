use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::dtos::auth_dtos::{LoginRequest, SessionOut, SignupRequest};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("supabase error: {0}")]
    Supabase(String),
    #[error("parse uuid error")]
    UuidError(#[from] uuid::Error),
}

/// Thin forwarder for the hosted auth endpoints. Credentials never touch
/// this service beyond the pass-through; the anon key authenticates the
/// calls the way a browser client would.
#[derive(Clone)]
pub struct AuthService {
    client: reqwest::Client,
    supabase_url: String,
    anon_key: String,
}

impl AuthService {
    pub fn new(client: reqwest::Client, cfg: &AppConfig) -> Self {
        Self {
            client,
            supabase_url: cfg.supabase_url.clone(),
            // Signup/login act on behalf of the end user, not the service.
            anon_key: cfg
                .anon_key
                .clone()
                .unwrap_or_else(|| cfg.service_role_key.clone()),
        }
    }

    /// Create the auth user and return its id. Profile creation is the
    /// caller's follow-up step.
    pub async fn signup(&self, input: &SignupRequest) -> Result<Uuid, AuthError> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
        }

        let body = Body {
            email: input.email.trim(),
            password: &input.password,
        };

        let url = format!("{}/auth/v1/signup", self.supabase_url.trim_end_matches('/'));
        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if !status.is_success() {
            if let Ok(error_json) = serde_json::from_str::<serde_json::Value>(&text) {
                if let Some(msg) = error_json.get("msg").or_else(|| error_json.get("message")) {
                    return Err(AuthError::Supabase(
                        msg.as_str().unwrap_or("Signup failed").to_string(),
                    ));
                }
            }
            return Err(AuthError::Supabase(format!(
                "signup failed: {} {}",
                status, text
            )));
        }

        let json_val: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| AuthError::Supabase(format!("invalid json: {}", e)))?;

        let user_id_str = json_val
            .get("user")
            .and_then(|u| u.get("id"))
            .or_else(|| json_val.get("id"))
            .and_then(|v| v.as_str())
            .ok_or_else(|| AuthError::Supabase("signup returned no user id".to_string()))?;

        Ok(Uuid::parse_str(user_id_str)?)
    }

    /// Password grant against the hosted token endpoint; returns the session
    /// plus the user id taken from the token response.
    pub async fn login(&self, input: &LoginRequest) -> Result<(SessionOut, Uuid), AuthError> {
        #[derive(Serialize)]
        struct Body<'a> {
            email: &'a str,
            password: &'a str,
        }

        #[derive(Deserialize)]
        struct TokenResp {
            access_token: String,
            refresh_token: Option<String>,
            expires_in: Option<i64>,
            token_type: Option<String>,
            user: Option<UserInfo>,
        }

        #[derive(Deserialize)]
        struct UserInfo {
            id: String,
        }

        let body = Body {
            email: input.email.trim(),
            password: &input.password,
        };

        let url = format!(
            "{}/auth/v1/token?grant_type=password",
            self.supabase_url.trim_end_matches('/')
        );

        let resp = self
            .client
            .post(&url)
            .header("apikey", &self.anon_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();

        if status != StatusCode::OK {
            return Err(AuthError::Supabase(format!(
                "login failed: {} {}",
                status, text
            )));
        }

        let tr: TokenResp = serde_json::from_str(&text)
            .map_err(|e| AuthError::Supabase(format!("invalid json in login response: {}", e)))?;

        let user_id = match tr.user {
            Some(user) => Uuid::parse_str(&user.id)?,
            None => {
                return Err(AuthError::Supabase(
                    "no user info in login response".to_string(),
                ));
            }
        };

        let session = SessionOut {
            access_token: tr.access_token,
            refresh_token: tr.refresh_token,
            expires_in: tr.expires_in,
            token_type: tr.token_type,
        };

        Ok((session, user_id))
    }
}
