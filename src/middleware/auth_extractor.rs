use actix_web::error::{ErrorInternalServerError, ErrorUnauthorized};
use actix_web::{Error, FromRequest, HttpRequest, dev::Payload, web};
use futures::future::{Ready, ready};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::AppState;

/// Request-scoped identity, extracted from the Supabase access token. This
/// is the only way handlers learn who is calling; there is no ambient
/// process-wide user state.
pub struct AuthenticatedUser {
    pub user_id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub exp: usize,
    pub aud: String,
}

/// Validate an HS256 access token against the project JWT secret and return
/// the subject id. Supabase mints user tokens with audience `authenticated`.
pub fn verify_access_token(token: &str, secret: &str) -> Result<Uuid, String> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&["authenticated"]);

    let data = decode::<AccessClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| format!("invalid token: {}", e))?;

    Uuid::parse_str(&data.claims.sub).map_err(|e| format!("invalid subject: {}", e))
}

impl FromRequest for AuthenticatedUser {
    type Error = Error;
    type Future = Ready<Result<AuthenticatedUser, Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = match req.app_data::<web::Data<AppState>>() {
            Some(state) => state,
            None => return ready(Err(ErrorInternalServerError("app state missing"))),
        };

        let auth_header = match req.headers().get("Authorization") {
            Some(header) => match header.to_str() {
                Ok(h) => h,
                Err(_) => return ready(Err(ErrorUnauthorized("Invalid header format"))),
            },
            None => return ready(Err(ErrorUnauthorized("Missing Authorization header"))),
        };

        if !auth_header.starts_with("Bearer ") {
            return ready(Err(ErrorUnauthorized("Invalid auth header format")));
        }
        let token = auth_header.trim_start_matches("Bearer ").trim();

        match verify_access_token(token, &state.jwt_secret) {
            Ok(user_id) => ready(Ok(AuthenticatedUser { user_id })),
            Err(e) => {
                log::debug!("rejected bearer token: {}", e);
                ready(Err(ErrorUnauthorized("Invalid token")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};

    const SECRET: &str = "test-jwt-secret";

    fn token_for(sub: &str, aud: &str, exp_offset: i64) -> String {
        let claims = AccessClaims {
            sub: sub.to_string(),
            exp: (chrono::Utc::now().timestamp() + exp_offset) as usize,
            aud: aud.to_string(),
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_yields_subject() {
        let id = Uuid::new_v4();
        let token = token_for(&id.to_string(), "authenticated", 3600);
        assert_eq!(verify_access_token(&token, SECRET).unwrap(), id);
    }

    #[test]
    fn expired_token_is_rejected() {
        let token = token_for(&Uuid::new_v4().to_string(), "authenticated", -3600);
        assert!(verify_access_token(&token, SECRET).is_err());
    }

    #[test]
    fn wrong_audience_is_rejected() {
        let token = token_for(&Uuid::new_v4().to_string(), "anon", 3600);
        assert!(verify_access_token(&token, SECRET).is_err());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = token_for(&Uuid::new_v4().to_string(), "authenticated", 3600);
        assert!(verify_access_token(&token, "other-secret").is_err());
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let token = token_for("service-role", "authenticated", 3600);
        assert!(verify_access_token(&token, SECRET).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(verify_access_token("not.a.jwt", SECRET).is_err());
    }
}
