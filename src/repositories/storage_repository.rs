use chrono::Utc;
use reqwest::header::AUTHORIZATION;
use uuid::Uuid;

use crate::repositories::supabase::{RepoError, Supabase};

pub struct StorageRepository;

impl StorageRepository {
    /// Upload already-validated image bytes to the bucket and return the
    /// public URL. The object name is randomized to avoid collisions; the
    /// caller is responsible for MIME and size checks.
    pub async fn upload_image(
        sb: &Supabase,
        bucket: &str,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, RepoError> {
        let object = object_name(file_name);

        let resp = sb
            .client
            .post(sb.object_url(bucket, &object))
            .header("apikey", sb.service_role_key())
            .header(
                AUTHORIZATION,
                format!("Bearer {}", sb.service_role_key()),
            )
            .header("Content-Type", content_type)
            .header("cache-control", "max-age=3600")
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(RepoError::Supabase(format!("{} -> {}", status, body)));
        }

        Ok(sb.public_object_url(bucket, &object))
    }
}

/// `{random-base36}_{epoch-ms}.{ext}`, with the extension taken from the
/// submitted file name and `bin` as the fallback.
fn object_name(file_name: &str) -> String {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
        .unwrap_or("bin");
    format!(
        "{}_{}.{}",
        to_base36(Uuid::new_v4().as_u128()),
        Utc::now().timestamp_millis(),
        ext
    )
}

fn to_base36(mut n: u128) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = String::new();
    while n > 0 {
        buf.push(DIGITS[(n % 36) as usize] as char);
        n /= 36;
    }
    buf.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base36_digits() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(to_base36(36 * 36 + 1), "101");
    }

    #[test]
    fn object_name_keeps_extension() {
        let name = object_name("holiday.snap.PNG");
        assert!(name.ends_with(".PNG"));

        let (stem, _) = name.rsplit_once('.').unwrap();
        let (random, millis) = stem.split_once('_').unwrap();
        assert!(!random.is_empty());
        assert!(random.chars().all(|c| c.is_ascii_alphanumeric()));
        assert!(millis.parse::<i64>().unwrap() > 0);
    }

    #[test]
    fn object_name_falls_back_without_extension() {
        assert!(object_name("noext").ends_with(".bin"));
        assert!(object_name("trailingdot.").ends_with(".bin"));
    }

    #[test]
    fn object_names_do_not_collide() {
        assert_ne!(object_name("a.png"), object_name("a.png"));
    }
}
