use serde::{Deserialize, Serialize};

/// Image payload as submitted by the composer: base64 body (optionally with
/// a data-URL prefix) plus the original file name and MIME type.
#[derive(Debug, Deserialize)]
pub struct UploadImageRequest {
    pub file_name: String,
    pub content_type: String,
    pub image_data: String,
}

#[derive(Debug, Serialize)]
pub struct ImageUploadOut {
    pub image_url: String,
}
