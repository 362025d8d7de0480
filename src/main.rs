//src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppConfig, AppState};
use crate::docs::ApiDoc;
use crate::middleware::auth::{auth_guard, tenant_guard};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Se a configuração falhar, a aplicação não deve iniciar.
    let config = AppConfig::from_env()?;
    let bind_addr = config.bind_addr;
    let app_state = AppState::new(config).await?;

    sqlx::migrate!().run(&app_state.db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (só token)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route("/me/organizations", get(handlers::auth::get_my_organizations))
        .route("/permissions", get(handlers::rbac::list_permissions))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Catálogo global (só token; criação restrita a superusuário no serviço)
    let catalog_routes = Router::new()
        .route("/"
               ,get(handlers::catalog::list_finish_types)
               .post(handlers::catalog::create_finish_type)
        )
        .route("/{id}", get(handlers::catalog::get_finish_type))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let project_routes = Router::new()
        .route("/"
               ,get(handlers::projects::list_projects)
               .post(handlers::projects::create_project)
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let room_routes = Router::new()
        .route("/"
               ,get(handlers::rooms::list_rooms)
               .post(handlers::rooms::create_room)
        )
        .route("/{room_id}", get(handlers::rooms::get_room))
        .route("/{room_id}/plan"
               ,get(handlers::rooms::list_plan)
               .post(handlers::rooms::add_planned_finish)
        )
        // Livro de volumes
        .route("/{room_id}/volumes", post(handlers::rooms::append_room_volumes))
        .route("/{room_id}/volumes/{element_kind}", post(handlers::rooms::append_volumes))
        .route("/{room_id}/latest", get(handlers::rooms::get_latest_volumes))
        .route("/{room_id}/history", get(handlers::rooms::get_volume_history))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    let report_routes = Router::new()
        .route("/volumes", get(handlers::reports::export_volumes))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            tenant_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/finish-types", catalog_routes)
        .nest("/api/projects", project_routes)
        .nest("/api/rooms", room_routes)
        .nest("/api/reports", report_routes)
        .with_state(app_state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
