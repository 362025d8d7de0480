// src/middleware/tenancy.rs

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use uuid::Uuid;
use crate::common::error::AppError;

// O nome do nosso cabeçalho HTTP customizado
pub const ORGANIZATION_ID_HEADER: &str = "x-organization-id";

// A organização que o utilizador quer aceder.
#[derive(Debug, Clone, Copy)]
pub struct TenantContext(pub Uuid);

impl TenantContext {
    pub fn from_headers(headers: &HeaderMap) -> Result<Self, AppError> {
        let value = headers
            .get(ORGANIZATION_ID_HEADER)
            .ok_or_else(|| AppError::BadRequest("X-Organization-Id header is required".to_string()))?;

        let value_str = value
            .to_str()
            .map_err(|_| AppError::BadRequest("X-Organization-Id header is not valid text".to_string()))?;

        let organization_id = Uuid::parse_str(value_str.trim())
            .map_err(|_| AppError::BadRequest("X-Organization-Id header is not a UUID".to_string()))?;

        Ok(TenantContext(organization_id))
    }
}

// Nos handlers, o contexto já foi validado pelo `tenant_guard`.
impl<S> FromRequestParts<S> for TenantContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<TenantContext>() {
            Some(tenant) => Ok(*tenant),
            None => TenantContext::from_headers(&parts.headers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn parses_organization_header() {
        let id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(ORGANIZATION_ID_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());

        assert_eq!(TenantContext::from_headers(&headers).unwrap().0, id);
    }

    #[test]
    fn missing_or_malformed_header_is_bad_request() {
        let mut headers = HeaderMap::new();
        assert!(matches!(TenantContext::from_headers(&headers), Err(AppError::BadRequest(_))));

        headers.insert(ORGANIZATION_ID_HEADER, HeaderValue::from_static("loja-1"));
        assert!(matches!(TenantContext::from_headers(&headers), Err(AppError::BadRequest(_))));
    }
}
