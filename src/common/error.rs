use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{
    common::i18n::I18nStore,
    middleware::i18n::Locale,
    services::volume_ledger::LedgerError,
};

// Nosso tipo de erro, agora com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Regras do livro de volumes (erros do usuário, nunca do sistema)
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Usuário não pertence à organização")]
    NotOrganizationMember,

    #[error("Permissão necessária: {0}")]
    Forbidden(String),

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Registro duplicado: {0}")]
    UniqueConstraintViolation(String),

    #[error("Requisição inválida: {0}")]
    BadRequest(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro que efetivamente sai na resposta HTTP
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    /// Status HTTP, chave de mensagem no catálogo i18n e parâmetros da mensagem.
    fn describe(&self) -> (StatusCode, &'static str, Vec<(&'static str, String)>) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "validation.invalid_fields", vec![]),
            AppError::Ledger(err) => {
                let status = match err {
                    LedgerError::DecreaseNotPermitted { .. } => StatusCode::FORBIDDEN,
                    _ => StatusCode::UNPROCESSABLE_ENTITY,
                };
                (status, err.message_key(), err.message_params())
            }
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "auth.invalid_credentials", vec![]),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "auth.invalid_token", vec![]),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "auth.user_not_found", vec![]),
            AppError::NotOrganizationMember => (StatusCode::FORBIDDEN, "tenancy.not_a_member", vec![]),
            AppError::Forbidden(permission) => {
                (StatusCode::FORBIDDEN, "rbac.forbidden", vec![("permission", permission.clone())])
            }
            AppError::ResourceNotFound(resource) => {
                (StatusCode::NOT_FOUND, "common.not_found", vec![("resource", resource.clone())])
            }
            AppError::UniqueConstraintViolation(what) => {
                (StatusCode::CONFLICT, "common.already_exists", vec![("resource", what.clone())])
            }
            AppError::BadRequest(reason) => {
                (StatusCode::BAD_REQUEST, "common.bad_request", vec![("reason", reason.clone())])
            }
            // Todos os outros erros (banco, bcrypt, jwt, anyhow) viram 500.
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => (StatusCode::INTERNAL_SERVER_ERROR, "common.internal", vec![]),
        }
    }

    fn details(&self) -> Option<Value> {
        match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                Some(Value::Object(details))
            }
            AppError::Ledger(err) => Some(err.details()),
            _ => None,
        }
    }

    /// Converte o erro interno na resposta da API, traduzindo a mensagem.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let (status, key, params) = self.describe();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        ApiError {
            status,
            error: store.translate(&locale.0, key, &params),
            details: self.details(),
        }
    }
}

// Usado pelos middlewares, que rodam antes de sabermos o idioma.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), I18nStore::shared())
            .into_response()
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        err.to_api_error(&Locale::default(), I18nStore::shared())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn en() -> Locale {
        Locale("en".to_string())
    }

    #[test]
    fn ledger_rule_violations_are_unprocessable() {
        let err = AppError::from(LedgerError::VolumeExceedsPlan {
            finish_type_id: Uuid::nil(),
            volume: Decimal::new(21, 0),
            planned_area: Decimal::new(20, 0),
        });
        let api = err.to_api_error(&en(), I18nStore::shared());
        assert_eq!(api.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(api.error.contains("21.00"), "{}", api.error);
        assert!(api.error.contains("20.00"), "{}", api.error);
        let details = api.details.unwrap();
        assert_eq!(details["code"], "VOLUME_EXCEEDS_PLAN");
    }

    #[test]
    fn decrease_is_forbidden_status() {
        let err = AppError::from(LedgerError::DecreaseNotPermitted {
            finish_type_id: Uuid::nil(),
            previous_volume: Decimal::new(10, 0),
            previous_percentage: Decimal::new(50, 0),
            volume: Decimal::new(8, 0),
            completion_percentage: Decimal::new(40, 0),
        });
        let api = err.to_api_error(&en(), I18nStore::shared());
        assert_eq!(api.status, StatusCode::FORBIDDEN);
    }

    #[test]
    fn database_errors_hide_details() {
        let err = AppError::DatabaseError(sqlx::Error::RowNotFound);
        let api = err.to_api_error(&en(), I18nStore::shared());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(api.details.is_none());
        assert!(!api.error.contains("RowNotFound"));
    }

    #[test]
    fn validation_errors_list_fields() {
        let mut errors = validator::ValidationErrors::new();
        let mut field_error = validator::ValidationError::new("range");
        field_error.message = Some("O valor não pode ser negativo.".into());
        errors.add("volume", field_error);

        let api = AppError::ValidationError(errors).to_api_error(&en(), I18nStore::shared());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        assert_eq!(api.details.unwrap()["volume"][0], "O valor não pode ser negativo.");
    }
}
