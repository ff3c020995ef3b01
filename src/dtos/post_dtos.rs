use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::post::Post;

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: Option<String>,
    pub image_url: Option<String>,
}

/// A post shaped for one particular viewer. `liked_by_viewer` is populated
/// from the likes table at load time (never assumed false) and stays `None`
/// for anonymous viewers; `is_own_post` gates the delete affordance.
#[derive(Debug, Serialize)]
pub struct PostView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub likes_count: i64,
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub liked_by_viewer: Option<bool>,
    pub is_own_post: bool,
}

impl PostView {
    pub fn from_post(post: Post, viewer: Option<Uuid>, liked_by_viewer: Option<bool>) -> Self {
        let is_own_post = viewer == Some(post.user_id);
        Self {
            id: post.id,
            user_id: post.user_id,
            username: post.username,
            content: post.content,
            image_url: post.image_url,
            likes_count: post.likes_count,
            comments_count: post.comments_count,
            created_at: post.created_at,
            updated_at: post.updated_at,
            liked_by_viewer,
            is_own_post,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_post(author: Uuid) -> Post {
        serde_json::from_value(serde_json::json!({
            "id": "3e0f8d8a-5b7c-4f21-8a9d-2b4c6e8f0a1c",
            "user_id": author,
            "username": "rosa",
            "content": null,
            "image_url": "https://cdn.example/x.png",
            "likes_count": 4,
            "comments_count": 2,
            "created_at": "2026-07-02T08:30:00+00:00",
            "updated_at": "2026-07-02T08:30:00+00:00"
        }))
        .unwrap()
    }

    #[test]
    fn image_only_posts_keep_empty_content() {
        let view = PostView::from_post(sample_post(Uuid::new_v4()), None, None);
        assert!(view.content.is_none());
        assert_eq!(view.image_url.as_deref(), Some("https://cdn.example/x.png"));
    }

    #[test]
    fn ownership_flag_matches_author_only() {
        let author = Uuid::new_v4();
        let stranger = Uuid::new_v4();

        let own = PostView::from_post(sample_post(author), Some(author), Some(true));
        assert!(own.is_own_post);
        assert_eq!(own.liked_by_viewer, Some(true));

        let other = PostView::from_post(sample_post(author), Some(stranger), Some(false));
        assert!(!other.is_own_post);
    }

    #[test]
    fn anonymous_viewer_has_no_like_state() {
        let view = PostView::from_post(sample_post(Uuid::new_v4()), None, None);
        assert!(!view.is_own_post);
        assert_eq!(view.liked_by_viewer, None);
    }
}
