use actix_web::{HttpResponse, Responder, delete, get, put, web};
use log::error;
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;
use crate::handlers::ApiResponse;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::repositories::like_repository::LikeRepository;
use crate::repositories::post_repository::PostRepository;
use crate::repositories::profile_repository::ProfileRepository;

#[derive(Serialize)]
struct LikedOut {
    liked: bool,
}

#[derive(Serialize)]
struct LikeStateOut {
    liked: bool,
    likes_count: i64,
}

#[get("/posts/{id}/like")]
pub async fn get_like_status(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> impl Responder {
    let post_id = path.into_inner();

    match LikeRepository::check(&state.supabase, post_id, user.user_id).await {
        Ok(liked) => {
            HttpResponse::Ok().json(ApiResponse::success("Like status", LikedOut { liked }))
        }
        Err(e) => {
            error!("failed to check like on {}: {}", post_id, e);
            HttpResponse::InternalServerError().json(ApiResponse::error("Failed to check like"))
        }
    }
}

/// Idempotent like. Both this and the unlike below are keyed on the
/// (post, user) unique pair, so repeated or concurrent calls settle on the
/// same final state instead of racing a check-then-act sequence.
#[put("/posts/{id}/like")]
pub async fn like_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> impl Responder {
    let post_id = path.into_inner();

    match PostRepository::get(&state.supabase, post_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiResponse::error("Post not found")),
        Err(e) => {
            error!("failed to load post {}: {}", post_id, e);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to update like"));
        }
    }

    let profile = match ProfileRepository::get(&state.supabase, user.user_id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            return HttpResponse::Forbidden()
                .json(ApiResponse::error("No profile for this account"));
        }
        Err(e) => {
            error!("failed to load profile {}: {}", user.user_id, e);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to update like"));
        }
    };

    if let Err(e) =
        LikeRepository::insert(&state.supabase, post_id, user.user_id, &profile.username).await
    {
        error!("failed to like {}: {}", post_id, e);
        return HttpResponse::InternalServerError()
            .json(ApiResponse::error("Failed to update like"));
    }

    respond_with_state(state.get_ref(), post_id, true).await
}

#[delete("/posts/{id}/like")]
pub async fn unlike_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> impl Responder {
    let post_id = path.into_inner();

    match PostRepository::get(&state.supabase, post_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiResponse::error("Post not found")),
        Err(e) => {
            error!("failed to load post {}: {}", post_id, e);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to update like"));
        }
    }

    if let Err(e) = LikeRepository::remove(&state.supabase, post_id, user.user_id).await {
        error!("failed to unlike {}: {}", post_id, e);
        return HttpResponse::InternalServerError()
            .json(ApiResponse::error("Failed to update like"));
    }

    respond_with_state(state.get_ref(), post_id, false).await
}

/// Re-read the trigger-maintained counter so the caller renders the real
/// count instead of a locally adjusted one.
async fn respond_with_state(state: &AppState, post_id: Uuid, liked: bool) -> HttpResponse {
    match PostRepository::get(&state.supabase, post_id).await {
        Ok(Some(post)) => HttpResponse::Ok().json(ApiResponse::success(
            "Like updated",
            LikeStateOut {
                liked,
                likes_count: post.likes_count,
            },
        )),
        Ok(None) => HttpResponse::NotFound().json(ApiResponse::error("Post not found")),
        Err(e) => {
            error!("failed to reload post {}: {}", post_id, e);
            HttpResponse::InternalServerError().json(ApiResponse::error("Failed to update like"))
        }
    }
}
