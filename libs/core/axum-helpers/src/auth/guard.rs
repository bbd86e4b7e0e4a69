//! Role guards expressed as extractors.

use super::{config::ReadAccess, jwt::JwtClaims};
use crate::errors::AppError;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

/// A set of roles, any one of which grants access.
pub trait AccessRule: Send + Sync + 'static {
    const ROLES: &'static [&'static str];

    fn permits(claims: &JwtClaims) -> bool {
        Self::ROLES.iter().any(|role| claims.has_role(role))
    }
}

/// `ROLE_ADMIN` only.
pub struct Admin;

impl AccessRule for Admin {
    const ROLES: &'static [&'static str] = &["ROLE_ADMIN"];
}

/// `ROLE_OPERATOR` or `ROLE_ADMIN`.
pub struct Staff;

impl AccessRule for Staff {
    const ROLES: &'static [&'static str] = &["ROLE_OPERATOR", "ROLE_ADMIN"];
}

fn authorize<R: AccessRule>(parts: &Parts) -> Result<JwtClaims, AppError> {
    let claims = parts
        .extensions
        .get::<JwtClaims>()
        .cloned()
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    if !R::permits(&claims) {
        tracing::debug!(subject = %claims.sub, required = ?R::ROLES, "Missing required role");
        return Err(AppError::Forbidden("Access denied".to_string()));
    }

    Ok(claims)
}

/// Requires verified claims carrying one of `R::ROLES`.
///
/// No claims → 401, claims without a matching role → 403.
///
/// ```ignore
/// async fn delete(_: Authorized<Admin>, UuidPath(id): UuidPath) -> ... { }
/// ```
pub struct Authorized<R: AccessRule> {
    pub claims: JwtClaims,
    _rule: PhantomData<fn() -> R>,
}

impl<S, R> FromRequestParts<S> for Authorized<R>
where
    S: Send + Sync,
    R: AccessRule,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self {
            claims: authorize::<R>(parts)?,
            _rule: PhantomData,
        })
    }
}

/// Like [`Authorized`], but lets anonymous callers through when the request
/// carries [`ReadAccess::Public`].
pub struct Reader<R: AccessRule> {
    pub claims: Option<JwtClaims>,
    _rule: PhantomData<fn() -> R>,
}

impl<S, R> FromRequestParts<S> for Reader<R>
where
    S: Send + Sync,
    R: AccessRule,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let access = parts
            .extensions
            .get::<ReadAccess>()
            .copied()
            .unwrap_or_default();

        let claims = match access {
            ReadAccess::Public => parts.extensions.get::<JwtClaims>().cloned(),
            ReadAccess::Restricted => Some(authorize::<R>(parts)?),
        };

        Ok(Self {
            claims,
            _rule: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use axum::response::IntoResponse;

    fn claims(roles: &[&str]) -> JwtClaims {
        JwtClaims {
            sub: "maria@gmail.com".to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            iat: 0,
            exp: i64::MAX,
        }
    }

    fn parts(claims: Option<JwtClaims>, access: Option<ReadAccess>) -> Parts {
        let mut request = Request::builder().uri("/").body(()).unwrap();
        if let Some(claims) = claims {
            request.extensions_mut().insert(claims);
        }
        if let Some(access) = access {
            request.extensions_mut().insert(access);
        }
        request.into_parts().0
    }

    async fn status_of<R: AccessRule>(mut parts: Parts) -> StatusCode {
        match Authorized::<R>::from_request_parts(&mut parts, &()).await {
            Ok(_) => StatusCode::OK,
            Err(e) => e.into_response().status(),
        }
    }

    #[tokio::test]
    async fn test_admin_rule() {
        assert_eq!(status_of::<Admin>(parts(None, None)).await, StatusCode::UNAUTHORIZED);
        assert_eq!(
            status_of::<Admin>(parts(Some(claims(&["ROLE_OPERATOR"])), None)).await,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_of::<Admin>(parts(Some(claims(&["ROLE_OPERATOR", "ROLE_ADMIN"])), None)).await,
            StatusCode::OK
        );
    }

    #[tokio::test]
    async fn test_staff_rule_accepts_operator() {
        assert_eq!(
            status_of::<Staff>(parts(Some(claims(&["ROLE_OPERATOR"])), None)).await,
            StatusCode::OK
        );
        assert_eq!(
            status_of::<Staff>(parts(Some(claims(&[])), None)).await,
            StatusCode::FORBIDDEN
        );
    }

    #[tokio::test]
    async fn test_reader_public_allows_anonymous() {
        let mut parts = parts(None, Some(ReadAccess::Public));
        let reader = Reader::<Staff>::from_request_parts(&mut parts, &())
            .await
            .unwrap_or_else(|_| panic!("public read should pass"));
        assert!(reader.claims.is_none());
    }

    #[tokio::test]
    async fn test_reader_restricted_by_default() {
        let mut parts = parts(None, None);
        let result = Reader::<Staff>::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AppError::Unauthorized(_))));
    }
}
