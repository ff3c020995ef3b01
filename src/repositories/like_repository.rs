use std::collections::HashSet;

use serde::Deserialize;
use serde_json::{Value, json};
use uuid::Uuid;

use crate::models::post::Like;
use crate::repositories::supabase::{RepoError, Supabase};

pub struct LikeRepository;

impl LikeRepository {
    pub async fn check(sb: &Supabase, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let url = format!(
            "{}?post_id=eq.{}&user_id=eq.{}&select=id&limit=1",
            sb.table_url("likes"),
            post_id,
            user_id
        );

        let resp = sb.client.get(&url).headers(sb.headers()).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(RepoError::Supabase(format!("{} -> {}", status, body)));
        }

        let rows: Vec<Value> = serde_json::from_str(&body)?;
        Ok(!rows.is_empty())
    }

    /// Which of the given posts the user has liked, in one round trip. Used
    /// to embed like state into feed payloads instead of assuming unliked.
    pub async fn liked_post_ids(
        sb: &Supabase,
        user_id: Uuid,
        post_ids: &[Uuid],
    ) -> Result<HashSet<Uuid>, RepoError> {
        if post_ids.is_empty() {
            return Ok(HashSet::new());
        }

        let id_list = post_ids
            .iter()
            .map(Uuid::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let url = format!(
            "{}?user_id=eq.{}&post_id=in.({})&select=post_id",
            sb.table_url("likes"),
            user_id,
            id_list
        );

        let resp = sb.client.get(&url).headers(sb.headers()).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(RepoError::Supabase(format!("{} -> {}", status, body)));
        }

        #[derive(Deserialize)]
        struct Row {
            post_id: Uuid,
        }

        let rows: Vec<Row> = serde_json::from_str(&body)?;
        Ok(rows.into_iter().map(|r| r.post_id).collect())
    }

    /// Idempotent like: an upsert that ignores duplicates on the
    /// (post_id, user_id) unique key. Returns whether a row was created, so
    /// repeating the call reports `false` without erroring.
    pub async fn insert(
        sb: &Supabase,
        post_id: Uuid,
        user_id: Uuid,
        username: &str,
    ) -> Result<bool, RepoError> {
        let url = format!(
            "{}?on_conflict=post_id,user_id",
            sb.table_url("likes")
        );
        let payload = json!({
            "post_id": post_id,
            "user_id": user_id,
            "username": username,
        });

        let resp = sb
            .client
            .post(&url)
            .headers(sb.headers())
            .header("Prefer", "resolution=ignore-duplicates,return=representation")
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(RepoError::Supabase(format!("{} -> {}", status, body)));
        }

        let rows: Vec<Like> = serde_json::from_str(&body)?;
        Ok(!rows.is_empty())
    }

    /// Idempotent unlike keyed on the same pair. Returns whether a row was
    /// actually removed.
    pub async fn remove(sb: &Supabase, post_id: Uuid, user_id: Uuid) -> Result<bool, RepoError> {
        let url = format!(
            "{}?post_id=eq.{}&user_id=eq.{}",
            sb.table_url("likes"),
            post_id,
            user_id
        );

        let resp = sb
            .client
            .delete(&url)
            .headers(sb.headers())
            .header("Prefer", "return=representation")
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(RepoError::Supabase(format!("{} -> {}", status, body)));
        }

        let rows: Vec<Like> = serde_json::from_str(&body)?;
        Ok(!rows.is_empty())
    }
}
