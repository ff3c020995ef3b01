use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("supabase error: {0}")]
    Supabase(String),
    #[error("other: {0}")]
    Other(String),
}

/// Shared handle for the hosted backend's REST surfaces (PostgREST tables,
/// GoTrue auth, object storage). Repositories borrow this and add nothing
/// beyond parameter shaping; remote errors propagate as [`RepoError`].
#[derive(Clone)]
pub struct Supabase {
    pub client: Client,
    base_url: String,
    service_role_key: String,
    anon_key: Option<String>,
}

impl Supabase {
    pub fn new(
        client: Client,
        base_url: &str,
        service_role_key: &str,
        anon_key: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            service_role_key: service_role_key.to_string(),
            anon_key,
        }
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    pub fn object_url(&self, bucket: &str, object: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, object)
    }

    pub fn public_object_url(&self, bucket: &str, object: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, bucket, object
        )
    }

    /// Standard headers for server-to-backend calls. The service role key is
    /// the bearer identity; `apikey` falls back to it when no anon key is
    /// configured.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let apikey = self.anon_key.as_deref().unwrap_or(&self.service_role_key);
        headers.insert("apikey", HeaderValue::from_str(apikey).unwrap());
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.service_role_key)).unwrap(),
        );
        headers
    }

    pub fn service_role_key(&self) -> &str {
        &self.service_role_key
    }
}

/// Total row count from a PostgREST `Content-Range` header. The header reads
/// `0-9/25` for a populated page and `*/0` for an empty result set.
pub fn content_range_total(value: &str) -> Option<u64> {
    value.rsplit('/').next()?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_range_with_window() {
        assert_eq!(content_range_total("0-9/25"), Some(25));
        assert_eq!(content_range_total("20-24/25"), Some(25));
    }

    #[test]
    fn content_range_empty_page() {
        assert_eq!(content_range_total("*/0"), Some(0));
        assert_eq!(content_range_total("*/31"), Some(31));
    }

    #[test]
    fn content_range_malformed() {
        assert_eq!(content_range_total("0-9/*"), None);
        assert_eq!(content_range_total("garbage"), None);
        assert_eq!(content_range_total(""), None);
    }

    #[test]
    fn urls_are_rooted_once() {
        let sb = Supabase::new(
            Client::new(),
            "https://example.supabase.co/",
            "service-key",
            None,
        );
        assert_eq!(
            sb.table_url("posts"),
            "https://example.supabase.co/rest/v1/posts"
        );
        assert_eq!(
            sb.auth_url("token?grant_type=password"),
            "https://example.supabase.co/auth/v1/token?grant_type=password"
        );
        assert_eq!(
            sb.public_object_url("images", "a_1.png"),
            "https://example.supabase.co/storage/v1/object/public/images/a_1.png"
        );
    }
}
