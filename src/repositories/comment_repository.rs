use serde_json::json;
use uuid::Uuid;

use crate::models::comment::Comment;
use crate::repositories::supabase::{RepoError, Supabase};

pub struct CommentRepository;

impl CommentRepository {
    /// Comments for a post in ascending creation order.
    pub async fn list(sb: &Supabase, post_id: Uuid) -> Result<Vec<Comment>, RepoError> {
        let url = format!(
            "{}?post_id=eq.{}&select=*&order=created_at.asc",
            sb.table_url("comments"),
            post_id
        );

        let resp = sb.client.get(&url).headers(sb.headers()).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(RepoError::Supabase(format!("{} -> {}", status, body)));
        }

        let comments: Vec<Comment> = serde_json::from_str(&body)?;
        Ok(comments)
    }

    pub async fn get(sb: &Supabase, id: Uuid) -> Result<Option<Comment>, RepoError> {
        let url = format!("{}?id=eq.{}&select=*", sb.table_url("comments"), id);

        let resp = sb.client.get(&url).headers(sb.headers()).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(RepoError::Supabase(format!("{} -> {}", status, body)));
        }

        let rows: Vec<Comment> = serde_json::from_str(&body)?;
        Ok(rows.into_iter().next())
    }

    pub async fn create(
        sb: &Supabase,
        post_id: Uuid,
        user_id: Uuid,
        username: &str,
        content: &str,
    ) -> Result<Comment, RepoError> {
        let payload = json!({
            "post_id": post_id,
            "user_id": user_id,
            "username": username,
            "content": content,
        });

        let resp = sb
            .client
            .post(sb.table_url("comments"))
            .headers(sb.headers())
            .header("Prefer", "return=representation")
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(RepoError::Supabase(format!("{} -> {}", status, body)));
        }

        let rows: Vec<Comment> = serde_json::from_str(&body)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::Other("empty response from insert".to_string()))
    }

    pub async fn delete(sb: &Supabase, id: Uuid) -> Result<(), RepoError> {
        let url = format!("{}?id=eq.{}", sb.table_url("comments"), id);

        let resp = sb.client.delete(&url).headers(sb.headers()).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(RepoError::Supabase(format!("{} -> {}", status, body)));
        }
        Ok(())
    }
}
