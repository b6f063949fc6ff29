//! Session cookie carrying the caller's user id.
//!
//! The cookie holds an HS256 JWT. A missing, expired or tampered cookie is
//! treated as no session.

use actix_web::HttpRequest;
use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{Config, SessionSettings};
use crate::error::{AppError, AppResult};

/// Session cookie name.
pub const SESSION_COOKIE: &str = "rpt_session";

const SESSION_ISSUER: &str = "report-upload-server";

#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub iss: String,
    pub exp: usize,
    pub iat: usize,
    pub user_id: i64,
}

/// Sign a session token for `user_id`.
pub fn create_session_token(user_id: i64, settings: &SessionSettings) -> AppResult<String> {
    let now = chrono::Utc::now();
    let exp = now + chrono::Duration::seconds(settings.ttl_secs as i64);

    let claims = SessionClaims {
        sub: user_id.to_string(),
        iss: SESSION_ISSUER.to_string(),
        exp: exp.timestamp() as usize,
        iat: now.timestamp() as usize,
        user_id,
    };

    let key = EncodingKey::from_secret(settings.secret.expose_secret().as_bytes());
    encode(&Header::default(), &claims, &key)
        .map_err(|e| AppError::Internal(format!("Failed to create session token: {}", e)))
}

/// Verify a session token and return its claims.
pub fn verify_session_token(token: &str, secret: &SecretString) -> Result<SessionClaims, String> {
    let key = DecodingKey::from_secret(secret.expose_secret().as_bytes());
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[SESSION_ISSUER]);
    validation.validate_aud = false;

    let token_data = decode::<SessionClaims>(token, &key, &validation)
        .map_err(|e| format!("Invalid session token: {}", e))?;

    Ok(token_data.claims)
}

/// Cookie carrying a freshly signed session token.
pub fn session_cookie(token: String, settings: &SessionSettings) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(settings.secure_cookie);
    cookie.set_max_age(CookieDuration::seconds(settings.ttl_secs as i64));
    cookie
}

/// Cookie that removes the session on the client.
pub fn clear_session_cookie(settings: &SessionSettings) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_secure(settings.secure_cookie);
    cookie.make_removal();
    cookie
}

/// User id from a valid session cookie, if any.
pub fn session_user_id(req: &HttpRequest, settings: &SessionSettings) -> Option<i64> {
    let cookie = req.cookie(SESSION_COOKIE)?;
    match verify_session_token(cookie.value(), &settings.secret) {
        Ok(claims) => Some(claims.user_id),
        Err(e) => {
            debug!("Ignoring session cookie: {}", e);
            None
        }
    }
}

/// Resolve the acting user: explicit request value, then session, then the
/// configured default.
pub fn resolve_user_id(explicit: Option<i64>, req: &HttpRequest, config: &Config) -> i64 {
    explicit
        .or_else(|| session_user_id(req, &config.session))
        .unwrap_or(config.upload.default_user_id)
}
