use serde_json::json;
use uuid::Uuid;

use crate::dtos::post_dtos::CreatePostRequest;
use crate::models::post::Post;
use crate::repositories::supabase::{RepoError, Supabase, content_range_total};

pub struct PostRepository;

impl PostRepository {
    /// One feed page, newest first, plus the exact total row count. A page
    /// past the end comes back as an empty vec, not an error.
    pub async fn list(sb: &Supabase, page: u32, limit: u32) -> Result<(Vec<Post>, u64), RepoError> {
        let offset = (page.saturating_sub(1) as u64) * limit as u64;
        let url = format!(
            "{}?select=*&order=created_at.desc&offset={}&limit={}",
            sb.table_url("posts"),
            offset,
            limit
        );

        let resp = sb
            .client
            .get(&url)
            .headers(sb.headers())
            .header("Prefer", "count=exact")
            .send()
            .await?;

        let status = resp.status();
        let total = resp
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(content_range_total);
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(RepoError::Supabase(format!("{} -> {}", status, body)));
        }

        let total =
            total.ok_or_else(|| RepoError::Other("missing content-range header".to_string()))?;
        let posts: Vec<Post> = serde_json::from_str(&body)?;
        Ok((posts, total))
    }

    /// No-match is `None`, not an error.
    pub async fn get(sb: &Supabase, id: Uuid) -> Result<Option<Post>, RepoError> {
        let url = format!("{}?id=eq.{}&select=*", sb.table_url("posts"), id);

        let resp = sb.client.get(&url).headers(sb.headers()).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(RepoError::Supabase(format!("{} -> {}", status, body)));
        }

        let rows: Vec<Post> = serde_json::from_str(&body)?;
        Ok(rows.into_iter().next())
    }

    pub async fn create(
        sb: &Supabase,
        user_id: Uuid,
        username: &str,
        input: &CreatePostRequest,
    ) -> Result<Post, RepoError> {
        let payload = json!({
            "user_id": user_id,
            "username": username,
            "content": input.content,
            "image_url": input.image_url,
        });

        let resp = sb
            .client
            .post(sb.table_url("posts"))
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

        let rows: Vec<Post> = serde_json::from_str(&body)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::Other("empty response from insert".to_string()))
    }

    /// Unconditional delete by id; the calling handler owns the ownership
    /// check.
    pub async fn delete(sb: &Supabase, id: Uuid) -> Result<(), RepoError> {
        let url = format!("{}?id=eq.{}", sb.table_url("posts"), id);

        let resp = sb.client.delete(&url).headers(sb.headers()).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(RepoError::Supabase(format!("{} -> {}", status, body)));
        }
        Ok(())
    }
}
