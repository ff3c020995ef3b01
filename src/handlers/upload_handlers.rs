use actix_web::{HttpResponse, Responder, post, web};
use base64::{Engine as _, engine::general_purpose};
use log::error;

use crate::AppState;
use crate::dtos::upload_dtos::{ImageUploadOut, UploadImageRequest};
use crate::handlers::ApiResponse;
use crate::middleware::auth_extractor::AuthenticatedUser;
use crate::repositories::storage_repository::StorageRepository;

pub const MAX_IMAGE_BYTES: usize = 1_048_576;

/// Gate an upload before any storage call: image MIME type, well-formed
/// base64 (data-URL prefix tolerated), decoded size within the 1 MiB cap.
fn decode_image(content_type: &str, image_data: &str) -> Result<Vec<u8>, &'static str> {
    let is_image = content_type
        .parse::<mime::Mime>()
        .map(|m| m.type_() == mime::IMAGE)
        .unwrap_or(false);
    if !is_image {
        return Err("Please select an image file");
    }

    let raw = if image_data.contains(',') {
        image_data.split(',').nth(1).unwrap_or(image_data)
    } else {
        image_data
    };

    let bytes = general_purpose::STANDARD
        .decode(raw.trim())
        .map_err(|_| "Invalid base64 image data")?;

    if bytes.len() > MAX_IMAGE_BYTES {
        return Err("Image must be 1MB or smaller");
    }
    Ok(bytes)
}

#[post("/uploads/images")]
pub async fn upload_image(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    body: web::Json<UploadImageRequest>,
) -> impl Responder {
    let bytes = match decode_image(&body.content_type, &body.image_data) {
        Ok(bytes) => bytes,
        Err(msg) => return HttpResponse::BadRequest().json(ApiResponse::error(msg)),
    };

    match StorageRepository::upload_image(
        &state.supabase,
        &state.storage_bucket,
        &body.file_name,
        &body.content_type,
        bytes,
    )
    .await
    {
        Ok(image_url) => HttpResponse::Created().json(ApiResponse::success(
            "Image uploaded",
            ImageUploadOut { image_url },
        )),
        Err(e) => {
            error!("failed to upload image: {}", e);
            HttpResponse::InternalServerError().json(ApiResponse::error("Failed to upload image"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b64(bytes: &[u8]) -> String {
        general_purpose::STANDARD.encode(bytes)
    }

    #[test]
    fn non_image_types_are_rejected() {
        assert!(decode_image("text/plain", &b64(b"abc")).is_err());
        assert!(decode_image("application/octet-stream", &b64(b"abc")).is_err());
        assert!(decode_image("not a mime", &b64(b"abc")).is_err());
    }

    #[test]
    fn image_types_are_accepted() {
        assert!(decode_image("image/png", &b64(b"abc")).is_ok());
        assert!(decode_image("image/jpeg", &b64(b"abc")).is_ok());
        assert!(decode_image("image/webp", &b64(b"abc")).is_ok());
    }

    #[test]
    fn data_url_prefix_is_stripped() {
        let payload = format!("data:image/png;base64,{}", b64(b"pixels"));
        assert_eq!(decode_image("image/png", &payload).unwrap(), b"pixels");
    }

    #[test]
    fn invalid_base64_is_rejected() {
        assert_eq!(
            decode_image("image/png", "!!not base64!!"),
            Err("Invalid base64 image data")
        );
    }

    #[test]
    fn size_cap_is_exact() {
        let at_cap = vec![0u8; MAX_IMAGE_BYTES];
        assert!(decode_image("image/png", &b64(&at_cap)).is_ok());

        let over_cap = vec![0u8; MAX_IMAGE_BYTES + 1];
        assert_eq!(
            decode_image("image/png", &b64(&over_cap)),
            Err("Image must be 1MB or smaller")
        );
    }
}
