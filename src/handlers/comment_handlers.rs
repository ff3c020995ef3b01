use actix_web::{HttpResponse, Responder, delete, get, post, web};
use log::error;
use uuid::Uuid;

use crate::AppState;
use crate::dtos::comment_dtos::{CommentView, CreateCommentRequest};
use crate::handlers::ApiResponse;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::repositories::comment_repository::CommentRepository;
use crate::repositories::post_repository::PostRepository;
use crate::repositories::profile_repository::ProfileRepository;

#[get("/posts/{id}/comments")]
pub async fn list_comments(
    state: web::Data<AppState>,
    viewer: Option<AuthenticatedUser>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let post_id = path.into_inner();
    let viewer_id = viewer.map(|v| v.user_id);

    match CommentRepository::list(&state.supabase, post_id).await {
        Ok(comments) => {
            let views: Vec<CommentView> = comments
                .into_iter()
                .map(|c| CommentView::from_comment(c, viewer_id))
                .collect();
            HttpResponse::Ok().json(ApiResponse::success("Comments retrieved", views))
        }
        Err(e) => {
            error!("failed to list comments for {}: {}", post_id, e);
            HttpResponse::InternalServerError().json(ApiResponse::error("Failed to load comments"))
        }
    }
}

#[post("/posts/{id}/comments")]
pub async fn create_comment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
    body: web::Json<CreateCommentRequest>,
) -> impl Responder {
    let post_id = path.into_inner();

    let content = body.content.trim();
    if content.is_empty() {
        return HttpResponse::BadRequest().json(ApiResponse::error("Please enter a comment"));
    }

    match PostRepository::get(&state.supabase, post_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return HttpResponse::NotFound().json(ApiResponse::error("Post not found")),
        Err(e) => {
            error!("failed to load post {}: {}", post_id, e);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to add comment"));
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
                .json(ApiResponse::error("Failed to add comment"));
        }
    };

    match CommentRepository::create(
        &state.supabase,
        post_id,
        user.user_id,
        &profile.username,
        content,
    )
    .await
    {
        Ok(created) => HttpResponse::Created().json(ApiResponse::success(
            "Comment added",
            CommentView::from_comment(created, Some(user.user_id)),
        )),
        Err(e) => {
            error!("failed to add comment on {}: {}", post_id, e);
            HttpResponse::InternalServerError().json(ApiResponse::error("Failed to add comment"))
        }
    }
}

#[delete("/comments/{id}")]
pub async fn delete_comment(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> impl Responder {
    let comment_id = path.into_inner();

    let comment = match CommentRepository::get(&state.supabase, comment_id).await {
        Ok(Some(comment)) => comment,
        Ok(None) => {
            return HttpResponse::NotFound().json(ApiResponse::error("Comment not found"));
        }
        Err(e) => {
            error!("failed to load comment {}: {}", comment_id, e);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to delete comment"));
        }
    };

    if comment.user_id != user.user_id {
        return HttpResponse::Forbidden()
            .json(ApiResponse::error("You can only delete your own comments"));
    }

    match CommentRepository::delete(&state.supabase, comment_id).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::<()> {
            status: "success".to_string(),
            message: "Comment deleted".to_string(),
            data: None,
        }),
        Err(e) => {
            error!("failed to delete comment {}: {}", comment_id, e);
            HttpResponse::InternalServerError().json(ApiResponse::error("Failed to delete comment"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, http::StatusCode, test};
    use jsonwebtoken::{EncodingKey, Header, encode};

    use crate::middleware::auth_extractor::AccessClaims;
    use crate::repositories::supabase::Supabase;

    const SECRET: &str = "test-jwt-secret";

    fn test_state() -> web::Data<AppState> {
        web::Data::new(AppState {
            supabase: Supabase::new(
                reqwest::Client::new(),
                "http://127.0.0.1:1",
                "service-key",
                None,
            ),
            jwt_secret: SECRET.to_string(),
            storage_bucket: "post_images".to_string(),
        })
    }

    fn bearer(user_id: Uuid) -> (&'static str, String) {
        let claims = AccessClaims {
            sub: user_id.to_string(),
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
            aud: "authenticated".to_string(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        ("Authorization", format!("Bearer {}", token))
    }

    #[actix_web::test]
    async fn empty_comment_is_rejected_before_any_remote_call() {
        let app =
            test::init_service(App::new().app_data(test_state()).service(create_comment)).await;

        let req = test::TestRequest::post()
            .uri(&format!("/posts/{}/comments", Uuid::new_v4()))
            .insert_header(bearer(Uuid::new_v4()))
            .set_json(serde_json::json!({ "content": "  \n " }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn commenting_requires_token() {
        let app =
            test::init_service(App::new().app_data(test_state()).service(create_comment)).await;

        let req = test::TestRequest::post()
            .uri(&format!("/posts/{}/comments", Uuid::new_v4()))
            .set_json(serde_json::json!({ "content": "hello" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
