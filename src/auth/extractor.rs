use crate::auth::gate::Claims;
use crate::error::{AppError, AuthError};
use crate::AppState;
use actix_web::dev::Payload;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{web, FromRequest, HttpRequest};
use std::future::{ready, Ready};
use uuid::Uuid;

/// Authenticated request context.
///
/// Handlers that take `AuthContext` only run once the bearer token has been
/// verified; there is no partially-authenticated state. The accepted header
/// convention is `Authorization: Bearer <token>` — a raw token without the
/// scheme is rejected.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub claims: Claims,
}

fn bearer_token(req: &HttpRequest) -> Result<&str, AuthError> {
    let header = match req.headers().get(AUTHORIZATION) {
        Some(header) => header,
        None => return Err(AuthError::MissingToken),
    };

    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or(AuthError::MalformedHeader)
}

impl FromRequest for AuthContext {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(extract(req))
    }
}

fn extract(req: &HttpRequest) -> Result<AuthContext, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| AppError::InternalError("AppState not configured".into()))?;

    let token = bearer_token(req)?;
    let claims = state.gate.verify(token)?;
    let user_id = claims.user_id()?;

    Ok(AuthContext { user_id, claims })
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_missing_header_distinct_from_malformed() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(bearer_token(&req), Err(AuthError::MissingToken)));

        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "raw-token-without-scheme"))
            .to_http_request();
        assert!(matches!(bearer_token(&req), Err(AuthError::MalformedHeader)));
    }

    #[test]
    fn test_bearer_token_extracted() {
        let req = TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer abc.def.ghi"))
            .to_http_request();
        assert_eq!(bearer_token(&req).unwrap(), "abc.def.ghi");
    }
}
