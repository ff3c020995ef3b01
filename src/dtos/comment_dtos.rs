use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::comment::Comment;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

/// A comment shaped for one viewer; `is_own_comment` gates the delete
/// affordance.
#[derive(Debug, Serialize)]
pub struct CommentView {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub username: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_own_comment: bool,
}

impl CommentView {
    pub fn from_comment(comment: Comment, viewer: Option<Uuid>) -> Self {
        let is_own_comment = viewer == Some(comment.user_id);
        Self {
            id: comment.id,
            post_id: comment.post_id,
            user_id: comment.user_id,
            username: comment.username,
            content: comment.content,
            created_at: comment.created_at,
            updated_at: comment.updated_at,
            is_own_comment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_comment(author: Uuid) -> Comment {
        serde_json::from_value(serde_json::json!({
            "id": "9d1e2f3a-4b5c-6d7e-8f90-a1b2c3d4e5f6",
            "post_id": "3e0f8d8a-5b7c-4f21-8a9d-2b4c6e8f0a1c",
            "user_id": author,
            "username": "theo",
            "content": "nice shot",
            "created_at": "2026-07-02T09:00:00+00:00",
            "updated_at": "2026-07-02T09:00:00+00:00"
        }))
        .unwrap()
    }

    #[test]
    fn delete_is_gated_to_the_author() {
        let author = Uuid::new_v4();
        let viewer = Uuid::new_v4();

        assert!(CommentView::from_comment(sample_comment(author), Some(author)).is_own_comment);
        assert!(!CommentView::from_comment(sample_comment(author), Some(viewer)).is_own_comment);
        assert!(!CommentView::from_comment(sample_comment(author), None).is_own_comment);
    }
}
