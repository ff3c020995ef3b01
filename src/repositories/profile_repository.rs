use serde_json::json;
use urlencoding::encode;
use uuid::Uuid;

use crate::models::profile::Profile;
use crate::repositories::supabase::{RepoError, Supabase};

pub struct ProfileRepository;

impl ProfileRepository {
    pub async fn get(sb: &Supabase, id: Uuid) -> Result<Option<Profile>, RepoError> {
        let url = format!("{}?id=eq.{}&select=*", sb.table_url("profiles"), id);
        Self::fetch_one(sb, &url).await
    }

    pub async fn get_by_username(
        sb: &Supabase,
        username: &str,
    ) -> Result<Option<Profile>, RepoError> {
        let url = format!(
            "{}?username=eq.{}&select=*",
            sb.table_url("profiles"),
            encode(username)
        );
        Self::fetch_one(sb, &url).await
    }

    /// Upsert the profile row for a freshly signed-up auth user. Merge on
    /// the id so a retried signup does not fail on the primary key.
    pub async fn create(
        sb: &Supabase,
        id: Uuid,
        username: &str,
        email: Option<&str>,
    ) -> Result<Profile, RepoError> {
        let payload = json!({
            "id": id,
            "username": username,
            "email": email,
            "role": "user",
        });

        let resp = sb
            .client
            .post(sb.table_url("profiles"))
            .headers(sb.headers())
            .header("Prefer", "resolution=merge-duplicates,return=representation")
            .json(&payload)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(RepoError::Supabase(format!("{} -> {}", status, body)));
        }

        let rows: Vec<Profile> = serde_json::from_str(&body)?;
        rows.into_iter()
            .next()
            .ok_or_else(|| RepoError::Other("empty response from upsert".to_string()))
    }

    async fn fetch_one(sb: &Supabase, url: &str) -> Result<Option<Profile>, RepoError> {
        let resp = sb.client.get(url).headers(sb.headers()).send().await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(RepoError::Supabase(format!("{} -> {}", status, body)));
        }

        let rows: Vec<Profile> = serde_json::from_str(&body)?;
        Ok(rows.into_iter().next())
    }
}
