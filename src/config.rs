use std::env;

use anyhow::{Context, Result};

/// Runtime configuration, loaded once at startup from the environment.
#[derive(Clone)]
pub struct AppConfig {
    pub supabase_url: String,
    pub service_role_key: String,
    pub anon_key: Option<String>,
    pub jwt_secret: String,
    pub storage_bucket: String,
    pub allowed_origins: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let supabase_url = env::var("SUPABASE_URL")
            .context("SUPABASE_URL not set")?
            .trim()
            .trim_end_matches('/')
            .to_string();

        let service_role_key = env::var("SUPABASE_SERVICE_ROLE_KEY")
            .context("SUPABASE_SERVICE_ROLE_KEY not set")?
            .trim()
            .to_string();

        let anon_key = env::var("SUPABASE_ANON_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty());

        let jwt_secret = env::var("SUPABASE_JWT_SECRET")
            .context("SUPABASE_JWT_SECRET not set")?
            .trim()
            .to_string();

        let storage_bucket = env::var("STORAGE_BUCKET")
            .unwrap_or_else(|_| "app-9be0q97dakn5_post_images".to_string());

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("PORT must be a number")?;

        Ok(Self {
            supabase_url,
            service_role_key,
            anon_key,
            jwt_secret,
            storage_bucket,
            allowed_origins,
            port,
        })
    }
}
