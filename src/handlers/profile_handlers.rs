use actix_web::{HttpResponse, Responder, get, web};
use log::error;
use uuid::Uuid;

use crate::AppState;
use crate::handlers::ApiResponse;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::repositories::profile_repository::ProfileRepository;

/// The caller's own profile, the other half of the request session context.
#[get("/me")]
pub async fn get_me(state: web::Data<AppState>, user: AuthenticatedUser) -> impl Responder {
    match ProfileRepository::get(&state.supabase, user.user_id).await {
        Ok(Some(profile)) => {
            HttpResponse::Ok().json(ApiResponse::success("Profile retrieved", profile))
        }
        Ok(None) => HttpResponse::NotFound().json(ApiResponse::error("Profile not found")),
        Err(e) => {
            error!("failed to load profile {}: {}", user.user_id, e);
            HttpResponse::InternalServerError().json(ApiResponse::error("Failed to load profile"))
        }
    }
}

#[get("/profiles/by-username/{username}")]
pub async fn get_profile_by_username(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> impl Responder {
    let username = path.into_inner();

    match ProfileRepository::get_by_username(&state.supabase, &username).await {
        Ok(Some(profile)) => {
            HttpResponse::Ok().json(ApiResponse::success("Profile retrieved", profile))
        }
        Ok(None) => HttpResponse::NotFound().json(ApiResponse::error("Profile not found")),
        Err(e) => {
            error!("failed to load profile {}: {}", username, e);
            HttpResponse::InternalServerError().json(ApiResponse::error("Failed to load profile"))
        }
    }
}

#[get("/profiles/{id}")]
pub async fn get_profile(state: web::Data<AppState>, path: web::Path<Uuid>) -> impl Responder {
    let id = path.into_inner();

    match ProfileRepository::get(&state.supabase, id).await {
        Ok(Some(profile)) => {
            HttpResponse::Ok().json(ApiResponse::success("Profile retrieved", profile))
        }
        Ok(None) => HttpResponse::NotFound().json(ApiResponse::error("Profile not found")),
        Err(e) => {
            error!("failed to load profile {}: {}", id, e);
            HttpResponse::InternalServerError().json(ApiResponse::error("Failed to load profile"))
        }
    }
}
