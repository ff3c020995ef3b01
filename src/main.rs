mod config;
mod dtos;
mod handlers;
mod middleware;
mod models;
mod repositories;
mod services;

use actix_cors::Cors;
use actix_web::{App, HttpServer, middleware::Logger, web};
use log::{error, info};
use reqwest::Client;

use crate::config::AppConfig;
use crate::handlers::auth_handlers::{health, login, signup};
use crate::handlers::comment_handlers::{create_comment, delete_comment, list_comments};
use crate::handlers::like_handlers::{get_like_status, like_post, unlike_post};
use crate::handlers::post_handlers::{create_post, delete_post, get_post, list_posts};
use crate::handlers::profile_handlers::{get_me, get_profile, get_profile_by_username};
use crate::handlers::upload_handlers::upload_image;
use crate::repositories::supabase::Supabase;
use crate::services::auth_services::AuthService;

fn mask_key(k: &str) -> String {
    if k.len() <= 8 {
        "[REDACTED]".to_string()
    } else {
        format!("{}***{}", &k[..4], &k[k.len() - 4..])
    }
}

#[derive(Clone)]
pub struct AppState {
    pub supabase: Supabase,
    pub jwt_secret: String,
    pub storage_bucket: String,
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();
    dotenv::dotenv().ok();

    let cfg = match AppConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    info!("Supabase URL: {}", cfg.supabase_url);
    info!("Supabase key: {}", mask_key(&cfg.service_role_key));

    let http_client = Client::builder()
        .user_agent("feedhub-be/0.1")
        .build()
        .expect("failed to build http client");

    let supabase = Supabase::new(
        http_client.clone(),
        &cfg.supabase_url,
        &cfg.service_role_key,
        cfg.anon_key.clone(),
    );

    let auth_data = web::Data::new(AuthService::new(http_client, &cfg));
    let state = web::Data::new(AppState {
        supabase,
        jwt_secret: cfg.jwt_secret.clone(),
        storage_bucket: cfg.storage_bucket.clone(),
    });

    let allowed_origins = cfg.allowed_origins.clone();
    let bind_address = format!("0.0.0.0:{}", cfg.port);
    info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        let mut cors = Cors::default()
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                "authorization",
                "content-type",
                "accept",
                "x-requested-with",
            ])
            .supports_credentials()
            .max_age(3600);

        for origin in allowed_origins
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
        {
            cors = cors.allowed_origin(origin);
        }

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(state.clone())
            .app_data(auth_data.clone())
            .service(
                web::scope("/auth")
                    .service(signup) // POST /auth/signup
                    .service(login), // POST /auth/login
            )
            .service(
                web::scope("/api")
                    .service(list_posts) // GET    /api/posts
                    .service(create_post) // POST   /api/posts
                    .service(get_like_status) // GET    /api/posts/{id}/like
                    .service(like_post) // PUT    /api/posts/{id}/like
                    .service(unlike_post) // DELETE /api/posts/{id}/like
                    .service(list_comments) // GET    /api/posts/{id}/comments
                    .service(create_comment) // POST   /api/posts/{id}/comments
                    .service(get_post) // GET    /api/posts/{id}
                    .service(delete_post) // DELETE /api/posts/{id}
                    .service(delete_comment) // DELETE /api/comments/{id}
                    .service(get_me) // GET    /api/me
                    .service(get_profile_by_username) // GET /api/profiles/by-username/{username}
                    .service(get_profile) // GET    /api/profiles/{id}
                    .service(upload_image), // POST   /api/uploads/images
            )
            .service(health) // GET /healthz
    })
    .bind(&bind_address)?
    .run()
    .await
}
