use actix_web::{HttpResponse, Responder, delete, get, post, web};
use log::error;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;
use crate::dtos::comment_dtos::CommentView;
use crate::dtos::post_dtos::{CreatePostRequest, PostView};
use crate::handlers::ApiResponse;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::repositories::comment_repository::CommentRepository;
use crate::repositories::like_repository::LikeRepository;
use crate::repositories::post_repository::PostRepository;
use crate::repositories::profile_repository::ProfileRepository;

const DEFAULT_PAGE_SIZE: u32 = 10;
const MAX_PAGE_SIZE: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Serialize)]
struct FeedPageOut {
    posts: Vec<PostView>,
    count: u64,
    page: u32,
    total_pages: u64,
}

#[derive(Serialize)]
struct PostDetailOut {
    post: PostView,
    comments: Vec<CommentView>,
}

fn clamp_page(page: Option<u32>) -> u32 {
    page.unwrap_or(1).max(1)
}

fn clamp_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
}

fn total_pages(count: u64, limit: u32) -> u64 {
    count.div_ceil(limit as u64)
}

/// Trim the input and enforce that at least one of content/image survives.
fn validate_new_post(input: &CreatePostRequest) -> Result<CreatePostRequest, &'static str> {
    let content = input
        .content
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string);
    let image_url = input
        .image_url
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .map(str::to_string);

    if content.is_none() && image_url.is_none() {
        return Err("Please add some content or an image");
    }
    Ok(CreatePostRequest { content, image_url })
}

#[get("/posts")]
pub async fn list_posts(
    state: web::Data<AppState>,
    viewer: Option<AuthenticatedUser>,
    query: web::Query<FeedQuery>,
) -> impl Responder {
    let page = clamp_page(query.page);
    let limit = clamp_limit(query.limit);

    let (posts, count) = match PostRepository::list(&state.supabase, page, limit).await {
        Ok(res) => res,
        Err(e) => {
            error!("failed to list posts: {}", e);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to load posts"));
        }
    };

    let viewer_id = viewer.map(|v| v.user_id);
    let liked = match viewer_id {
        Some(user_id) => {
            let ids: Vec<Uuid> = posts.iter().map(|p| p.id).collect();
            match LikeRepository::liked_post_ids(&state.supabase, user_id, &ids).await {
                Ok(set) => Some(set),
                Err(e) => {
                    error!("failed to load like state: {}", e);
                    return HttpResponse::InternalServerError()
                        .json(ApiResponse::error("Failed to load posts"));
                }
            }
        }
        None => None,
    };

    let views: Vec<PostView> = posts
        .into_iter()
        .map(|p| {
            let liked_by_viewer = liked.as_ref().map(|set| set.contains(&p.id));
            PostView::from_post(p, viewer_id, liked_by_viewer)
        })
        .collect();

    HttpResponse::Ok().json(ApiResponse::success(
        "Posts retrieved",
        FeedPageOut {
            posts: views,
            count,
            page,
            total_pages: total_pages(count, limit),
        },
    ))
}

#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<AppState>,
    viewer: Option<AuthenticatedUser>,
    path: web::Path<Uuid>,
) -> impl Responder {
    let post_id = path.into_inner();

    let post = match PostRepository::get(&state.supabase, post_id).await {
        Ok(Some(post)) => post,
        Ok(None) => {
            return HttpResponse::NotFound().json(ApiResponse::error("Post not found"));
        }
        Err(e) => {
            error!("failed to load post {}: {}", post_id, e);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to load post"));
        }
    };

    let comments = match CommentRepository::list(&state.supabase, post_id).await {
        Ok(comments) => comments,
        Err(e) => {
            error!("failed to load comments for {}: {}", post_id, e);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to load post"));
        }
    };

    let viewer_id = viewer.map(|v| v.user_id);
    let liked_by_viewer = match viewer_id {
        Some(user_id) => match LikeRepository::check(&state.supabase, post_id, user_id).await {
            Ok(liked) => Some(liked),
            Err(e) => {
                error!("failed to load like state for {}: {}", post_id, e);
                return HttpResponse::InternalServerError()
                    .json(ApiResponse::error("Failed to load post"));
            }
        },
        None => None,
    };

    let comments = comments
        .into_iter()
        .map(|c| CommentView::from_comment(c, viewer_id))
        .collect();

    HttpResponse::Ok().json(ApiResponse::success(
        "Post retrieved",
        PostDetailOut {
            post: PostView::from_post(post, viewer_id, liked_by_viewer),
            comments,
        },
    ))
}

#[post("/posts")]
pub async fn create_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<CreatePostRequest>,
) -> impl Responder {
    let input = match validate_new_post(&body) {
        Ok(input) => input,
        Err(msg) => return HttpResponse::BadRequest().json(ApiResponse::error(msg)),
    };

    let profile = match ProfileRepository::get(&state.supabase, user.user_id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => {
            return HttpResponse::Forbidden()
                .json(ApiResponse::error("No profile for this account"));
        }
        Err(e) => {
            error!("failed to load profile {}: {}", user.user_id, e);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to create post"));
        }
    };

    match PostRepository::create(&state.supabase, user.user_id, &profile.username, &input).await {
        Ok(created) => HttpResponse::Created().json(ApiResponse::success(
            "Post created",
            PostView::from_post(created, Some(user.user_id), Some(false)),
        )),
        Err(e) => {
            error!("failed to create post for {}: {}", user.user_id, e);
            HttpResponse::InternalServerError().json(ApiResponse::error("Failed to create post"))
        }
    }
}

#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<Uuid>,
) -> impl Responder {
    let post_id = path.into_inner();

    let post = match PostRepository::get(&state.supabase, post_id).await {
        Ok(Some(post)) => post,
        Ok(None) => {
            return HttpResponse::NotFound().json(ApiResponse::error("Post not found"));
        }
        Err(e) => {
            error!("failed to load post {}: {}", post_id, e);
            return HttpResponse::InternalServerError()
                .json(ApiResponse::error("Failed to delete post"));
        }
    };

    if post.user_id != user.user_id {
        return HttpResponse::Forbidden()
            .json(ApiResponse::error("You can only delete your own posts"));
    }

    match PostRepository::delete(&state.supabase, post_id).await {
        Ok(()) => HttpResponse::Ok().json(ApiResponse::<()> {
            status: "success".to_string(),
            message: "Post deleted".to_string(),
            data: None,
        }),
        Err(e) => {
            error!("failed to delete post {}: {}", post_id, e);
            HttpResponse::InternalServerError().json(ApiResponse::error("Failed to delete post"))
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

    #[test]
    fn pagination_math() {
        // 25 rows at 10 per page render as pages of 10, 10 and 5.
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(30, 10), 3);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(0, 10), 0);
    }

    #[test]
    fn page_and_limit_are_clamped() {
        assert_eq!(clamp_page(None), 1);
        assert_eq!(clamp_page(Some(0)), 1);
        assert_eq!(clamp_page(Some(7)), 7);
        assert_eq!(clamp_limit(None), 10);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(500)), 50);
    }

    #[test]
    fn new_post_needs_content_or_image() {
        let both_absent = CreatePostRequest {
            content: Some("   ".to_string()),
            image_url: None,
        };
        assert!(validate_new_post(&both_absent).is_err());

        let content_only = CreatePostRequest {
            content: Some(" hello ".to_string()),
            image_url: None,
        };
        let cleaned = validate_new_post(&content_only).unwrap();
        assert_eq!(cleaned.content.as_deref(), Some("hello"));
        assert!(cleaned.image_url.is_none());

        let image_only = CreatePostRequest {
            content: None,
            image_url: Some("https://cdn.example/x.png".to_string()),
        };
        assert!(validate_new_post(&image_only).is_ok());

        let both = CreatePostRequest {
            content: Some("hi".to_string()),
            image_url: Some("https://cdn.example/x.png".to_string()),
        };
        assert!(validate_new_post(&both).is_ok());
    }

    #[actix_web::test]
    async fn create_post_rejects_empty_input() {
        let app =
            test::init_service(App::new().app_data(test_state()).service(create_post)).await;

        let req = test::TestRequest::post()
            .uri("/posts")
            .insert_header(bearer(Uuid::new_v4()))
            .set_json(serde_json::json!({ "content": "   " }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn create_post_requires_token() {
        let app =
            test::init_service(App::new().app_data(test_state()).service(create_post)).await;

        let req = test::TestRequest::post()
            .uri("/posts")
            .set_json(serde_json::json!({ "content": "hello" }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }
}
