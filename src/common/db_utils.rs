use sqlx::{Postgres, Transaction};

use crate::common::error::AppError;
use crate::config::AppState;
use crate::middleware::auth::AuthenticatedUser;
use crate::middleware::tenancy::TenantContext;

// ---
// Helper RLS: A "Chave" para o Banco de Dados
// ---
/// Abre uma transação e define as variáveis RLS (`app.organization_id`, `app.user_id`).
/// `set_config(..., true)` só vale dentro da transação, por isso ela é aberta aqui;
/// o handler faz o commit no final.
pub(crate) async fn get_rls_connection(
    app_state: &AppState,
    tenant_ctx: &TenantContext,
    user: &AuthenticatedUser,
) -> Result<Transaction<'static, Postgres>, AppError> {
    let mut tx = app_state.db_pool.begin().await?;

    sqlx::query("SELECT set_config('app.organization_id', $1, true)")
        .bind(tenant_ctx.0.to_string())
        .execute(&mut *tx)
        .await?;

    sqlx::query("SELECT set_config('app.user_id', $1, true)")
        .bind(user.0.id.to_string())
        .execute(&mut *tx)
        .await?;

    Ok(tx)
}
