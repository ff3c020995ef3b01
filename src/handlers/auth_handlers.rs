use actix_web::{HttpResponse, Responder, get, post, web};
use log::error;
use regex::Regex;

use crate::AppState;
use crate::dtos::auth_dtos::{LoginOut, LoginRequest, SignupOut, SignupRequest};
use crate::handlers::ApiResponse;
use crate::repositories::profile_repository::ProfileRepository;
use crate::services::auth_services::AuthService;

fn looks_like_email(email: &str) -> bool {
    let re = Regex::new(r"(?i)^[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}$").unwrap();
    re.is_match(email)
}

fn valid_username(username: &str) -> bool {
    let re = Regex::new(r"^[A-Za-z0-9_]{3,24}$").unwrap();
    re.is_match(username)
}

/// POST /auth/signup
/// Creates the auth user on the hosted service, then upserts the profile
/// row that carries the public username. There is no compensating delete if
/// the second step fails.
#[post("/signup")]
pub async fn signup(
    state: web::Data<AppState>,
    svc: web::Data<AuthService>,
    body: web::Json<SignupRequest>,
) -> impl Responder {
    let email = body.email.trim().to_lowercase();

    if !looks_like_email(&email) {
        return HttpResponse::BadRequest().json(ApiResponse::error("Invalid email format"));
    }

    if body.password.len() < 6 {
        return HttpResponse::BadRequest()
            .json(ApiResponse::error("Password must be at least 6 characters long"));
    }

    let username = body.username.trim();
    if !valid_username(username) {
        return HttpResponse::BadRequest().json(ApiResponse::error(
            "Username must be 3-24 characters: letters, digits or underscore",
        ));
    }

    match ProfileRepository::get_by_username(&state.supabase, username).await {
        Ok(Some(_)) => {
            return HttpResponse::Conflict().json(ApiResponse::error("Username already taken"));
        }
        Ok(None) => {}
        Err(e) => {
            error!("failed to check username {}: {}", username, e);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to create account"));
        }
    }

    let signup_data = SignupRequest {
        email: email.clone(),
        password: body.password.clone(),
        username: username.to_string(),
    };

    let user_id = match svc.signup(&signup_data).await {
        Ok(user_id) => user_id,
        Err(e) => {
            error!("signup failed: {}", e);
            let message = if e.to_string().contains("already registered") {
                "Email already exists. Please login instead."
            } else {
                "Failed to create account. Please try again."
            };
            return HttpResponse::BadRequest().json(ApiResponse::error(message));
        }
    };

    match ProfileRepository::create(&state.supabase, user_id, username, Some(&email)).await {
        Ok(profile) => HttpResponse::Created().json(ApiResponse::success(
            "Account created",
            SignupOut {
                user_id,
                username: profile.username,
            },
        )),
        Err(e) => {
            error!("failed to create profile for {}: {}", user_id, e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to set up profile. Please try again."))
        }
    }
}

/// POST /auth/login
/// Forwards the password grant and returns the session together with the
/// profile when one exists.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    svc: web::Data<AuthService>,
    body: web::Json<LoginRequest>,
) -> impl Responder {
    let (session, user_id) = match svc.login(&body).await {
        Ok(ok) => ok,
        Err(e) => {
            error!("login failed: {}", e);
            return HttpResponse::Unauthorized()
                .json(ApiResponse::error("Invalid email or password"));
        }
    };

    match ProfileRepository::get(&state.supabase, user_id).await {
        Ok(profile) => HttpResponse::Ok().json(ApiResponse::success(
            "Login successful",
            LoginOut { session, profile },
        )),
        Err(e) => {
            error!("failed to load profile {}: {}", user_id, e);
            HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to verify account status"))
        }
    }
}

/// Liveness plus a one-row probe against the backend.
#[get("/healthz")]
pub async fn health(state: web::Data<AppState>) -> impl Responder {
    let url = format!("{}?select=id&limit=1", state.supabase.table_url("profiles"));

    let resp = state
        .supabase
        .client
        .get(&url)
        .headers(state.supabase.headers())
        .send()
        .await;

    match resp {
        Ok(r) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ok",
            "backend_status": r.status().as_u16(),
        })),
        Err(e) => {
            error!("backend unreachable: {}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "degraded",
                "message": "backend unreachable",
            }))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shapes() {
        assert!(looks_like_email("user@example.com"));
        assert!(looks_like_email("USER+tag@sub.example.co"));
        assert!(!looks_like_email("user@"));
        assert!(!looks_like_email("user@example"));
        assert!(!looks_like_email("not an email"));
    }

    #[test]
    fn username_shapes() {
        assert!(valid_username("mika_01"));
        assert!(valid_username("abc"));
        assert!(!valid_username("ab"));
        assert!(!valid_username("way_too_long_for_a_username_here"));
        assert!(!valid_username("spaces no"));
        assert!(!valid_username("dash-not-ok"));
    }
}
