pub mod auth_handlers;
pub mod comment_handlers;
pub mod like_handlers;
pub mod post_handlers;
pub mod profile_handlers;
pub mod upload_handlers;

use serde::Serialize;

/// Uniform response envelope. Remote error detail is logged server-side and
/// never echoed into `message`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status: "success".to_string(),
            message: message.to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: &str) -> Self {
        Self {
            status: "error".to_string(),
            message: message.to_string(),
            data: None,
        }
    }
}
