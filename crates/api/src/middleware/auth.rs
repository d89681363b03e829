//! Access-token extractor.
//!
//! Every signed-in route takes an [`AuthUser`]: testimonial submission,
//! account settings, MFA enrollment and library downloads. Admin routes go
//! through [`super::rbac::RequireAdmin`], which builds on it.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use campus_core::error::CoreError;
use campus_core::roles::ROLE_ADMIN;
use campus_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Caller identity taken from a valid access token.
///
/// Refresh tokens are opaque and never accepted here.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
    /// Role name as issued at sign-in.
    pub role: String,
}

impl AuthUser {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Token part of an `Authorization` value. The scheme name is matched
/// case-insensitively.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn unauthorized(message: &str) -> AppError {
    AppError::Core(CoreError::Unauthorized(message.into()))
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| unauthorized("Sign in required"))?;

        let token = bearer_token(header)
            .ok_or_else(|| unauthorized("Expected an Authorization: Bearer <token> header"))?;

        let claims = validate_token(token, &state.config.jwt)
            .map_err(|_| unauthorized("Session expired, sign in again"))?;

        Ok(AuthUser {
            user_id: claims.sub,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use campus_core::roles::ROLE_USER;

    use super::*;

    #[test]
    fn bearer_scheme_is_case_insensitive() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("Basic YWxhZGRpbg=="), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc.def"), None);
    }

    #[test]
    fn only_admin_role_is_admin() {
        let admin = AuthUser {
            user_id: 1,
            role: ROLE_ADMIN.to_string(),
        };
        let student = AuthUser {
            user_id: 2,
            role: ROLE_USER.to_string(),
        };
        assert!(admin.is_admin());
        assert!(!student.is_admin());
    }
}
