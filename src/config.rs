// src/config.rs

use crate::{
    common::i18n::I18nStore,
    db::{CatalogRepository, LedgerRepository, OrganizationRepository, RbacRepository, RoomRepository, UserRepository},
    services::{
        auth::AuthService, catalog_service::CatalogService, ledger_service::LedgerService,
        report_service::ReportService, room_service::RoomService,
    },
};
use anyhow::Context;
use chrono::FixedOffset;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{collections::HashMap, env, net::SocketAddr, time::Duration};

/// Configuração lida do ambiente (com `.env` opcional).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: SocketAddr,
    pub db_max_connections: u32,
    pub token_ttl_days: i64,
    /// Fuso usado para formatar as datas do CSV.
    pub report_utc_offset: FixedOffset,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(&env::vars().collect())
    }

    fn from_vars(vars: &HashMap<String, String>) -> anyhow::Result<Self> {
        let required = |name: &str| {
            vars.get(name)
                .filter(|v| !v.trim().is_empty())
                .cloned()
                .with_context(|| format!("{name} deve ser definida"))
        };
        let optional = |name: &str| vars.get(name).map(|v| v.trim()).filter(|v| !v.is_empty());

        let bind_addr = optional("BIND_ADDR")
            .unwrap_or("0.0.0.0:3000")
            .parse::<SocketAddr>()
            .context("BIND_ADDR inválido")?;

        let db_max_connections = optional("DB_MAX_CONNECTIONS")
            .map(str::parse::<u32>)
            .transpose()
            .context("DB_MAX_CONNECTIONS deve ser um inteiro positivo")?
            .unwrap_or(5);

        let token_ttl_days = optional("TOKEN_TTL_DAYS")
            .map(str::parse::<i64>)
            .transpose()
            .context("TOKEN_TTL_DAYS deve ser um inteiro")?
            .unwrap_or(7);
        anyhow::ensure!(token_ttl_days > 0, "TOKEN_TTL_DAYS deve ser maior que zero");

        let offset_hours = optional("REPORT_UTC_OFFSET_HOURS")
            .map(str::parse::<i32>)
            .transpose()
            .context("REPORT_UTC_OFFSET_HOURS deve ser um inteiro")?
            .unwrap_or(3);
        let report_utc_offset = FixedOffset::east_opt(offset_hours * 3600)
            .with_context(|| format!("REPORT_UTC_OFFSET_HOURS fora do intervalo: {offset_hours}"))?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            bind_addr,
            db_max_connections,
            token_ttl_days,
            report_utc_offset,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: AppConfig,
    pub i18n_store: &'static I18nStore,

    pub organization_repo: OrganizationRepository,
    pub rbac_repo: RbacRepository,

    pub auth_service: AuthService,
    pub catalog_service: CatalogService,
    pub room_service: RoomService,
    pub ledger_service: LedgerService,
    pub report_service: ReportService,
}

impl AppState {
    pub async fn new(config: AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let organization_repo = OrganizationRepository::new(db_pool.clone());
        let rbac_repo = RbacRepository::new(db_pool.clone());
        let catalog_repo = CatalogRepository::new();
        let room_repo = RoomRepository::new();
        let ledger_repo = LedgerRepository::new();

        let auth_service = AuthService::new(user_repo, config.jwt_secret.clone(), config.token_ttl_days);
        let catalog_service = CatalogService::new(catalog_repo.clone(), db_pool.clone());
        let room_service = RoomService::new(
            organization_repo.clone(),
            room_repo.clone(),
            catalog_repo.clone(),
            ledger_repo.clone(),
        );
        let ledger_service = LedgerService::new(room_repo.clone(), catalog_repo, ledger_repo.clone());
        let report_service = ReportService::new(room_repo, ledger_repo, config.report_utc_offset);

        Ok(Self {
            db_pool,
            config,
            i18n_store: I18nStore::shared(),
            organization_repo,
            rbac_repo,
            auth_service,
            catalog_service,
            room_service,
            ledger_service,
            report_service,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/obra"),
        ("JWT_SECRET", "segredo"),
    ];

    #[test]
    fn defaults_apply_when_optional_vars_are_missing() {
        let config = AppConfig::from_vars(&vars(&REQUIRED)).unwrap();

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.token_ttl_days, 7);
        assert_eq!(config.report_utc_offset.local_minus_utc(), 3 * 3600);
    }

    #[test]
    fn missing_required_var_is_an_error() {
        let err = AppConfig::from_vars(&vars(&REQUIRED[..1])).unwrap_err();
        assert!(err.to_string().contains("JWT_SECRET"), "{err}");
    }

    #[test]
    fn invalid_numbers_are_rejected() {
        let mut env = vars(&REQUIRED);
        env.insert("DB_MAX_CONNECTIONS".into(), "muitas".into());
        assert!(AppConfig::from_vars(&env).is_err());

        let mut env = vars(&REQUIRED);
        env.insert("REPORT_UTC_OFFSET_HOURS".into(), "30".into());
        assert!(AppConfig::from_vars(&env).is_err());
    }

    #[test]
    fn overrides_are_parsed() {
        let mut env = vars(&REQUIRED);
        env.insert("BIND_ADDR".into(), "127.0.0.1:8080".into());
        env.insert("REPORT_UTC_OFFSET_HOURS".into(), "-3".into());

        let config = AppConfig::from_vars(&env).unwrap();
        assert_eq!(config.bind_addr.port(), 8080);
        assert_eq!(config.report_utc_offset.local_minus_utc(), -3 * 3600);
    }
}
