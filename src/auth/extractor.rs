//! Actix-web extractor guarding back-office routes.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError, web};
use secrecy::{ExposeSecret, SecretString};
use std::future::{Ready, ready};

use super::AdminKey;
use crate::config::ADMIN_KEY_HEADER;
use crate::error::ErrorResponse;

/// Extract a secret header value, wrapping it in SecretString.
/// Returns None if the header is missing or invalid UTF-8.
fn extract_secret_header(req: &HttpRequest, header_name: &str) -> Option<SecretString> {
    req.headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(|s| SecretString::from(s.to_string()))
}

/// Authentication error for extractors.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.message.clone(),
            fields: None,
        })
    }
}

/// Extractor that requires the admin key header.
///
/// ```ignore
/// async fn admin_handler(_auth: AdminAuth) -> impl Responder { ... }
/// ```
#[derive(Debug)]
pub struct AdminAuth;

impl FromRequest for AdminAuth {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(stored) = req.app_data::<web::Data<AdminKey>>() else {
            return ready(Err(AuthError {
                message: "Internal configuration error".to_string(),
            }));
        };

        let provided = match extract_secret_header(req, ADMIN_KEY_HEADER) {
            Some(key) => key,
            None => {
                return ready(Err(AuthError {
                    message: format!("Missing admin key. Provide {} header.", ADMIN_KEY_HEADER),
                }));
            }
        };

        if stored.verify(provided.expose_secret()) {
            ready(Ok(AdminAuth))
        } else {
            tracing::warn!(path = %req.path(), "Rejected back-office request with invalid admin key");
            ready(Err(AuthError {
                message: "Invalid admin key".to_string(),
            }))
        }
    }
}
