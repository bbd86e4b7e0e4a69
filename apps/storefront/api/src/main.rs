use axum_helpers::{
    JwtAuth,
    server::{create_production_app, health_router},
};
use core_config::tracing::{init_tracing, install_color_eyre};
use migration::Migrator;
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // Load configuration from environment variables
    let config = Config::from_env()?;

    // Initialize tracing with ErrorLayer for span trace capture
    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config_with_retry(config.database.clone(), None)
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;

    if config.run_migrations {
        database::postgres::run_migrations::<Migrator>(&db, config.app.name)
            .await
            .map_err(|e| eyre::eyre!("Migration failed: {}", e))?;
    } else {
        info!("RUN_MIGRATIONS=false, skipping migrations");
    }

    let jwt_auth = JwtAuth::new(&config.jwt);
    info!(read_access = %config.read_access, "Catalog read access configured");

    let state = AppState {
        config,
        db,
        jwt_auth,
    };

    // Build router with API routes (pass reference, not ownership!)
    let api_routes = api::routes(&state);

    // create_router adds docs/middleware to our composed routes
    let router = axum_helpers::create_router::<openapi::ApiDoc>(
        api_routes,
        state.config.server.request_timeout(),
    )?;

    // - /health: liveness check with app name/version
    // - /ready: readiness check against PostgreSQL
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!("Starting storefront API with graceful shutdown (30s timeout)");

    create_production_app(
        app,
        &state.config.server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing database connections");
            match state.db.close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Storefront API shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
    };
    use axum_helpers::{JwtConfig, ReadAccess};
    use core_config::{AppInfo, Environment, server::ServerConfig};
    use database::postgres::PostgresConfig;
    use http_body_util::BodyExt;
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase};
    use serde_json::Value;
    use tower::ServiceExt;

    const SECRET: &str = "storefront-routing-test-secret-012345678";

    fn state(read_access: ReadAccess, db: MockDatabase) -> AppState {
        let jwt = JwtConfig::new(SECRET);
        AppState {
            config: Config {
                app: AppInfo {
                    name: "storefront_api",
                    version: "0.1.0",
                },
                database: PostgresConfig::default(),
                server: ServerConfig::default(),
                jwt: jwt.clone(),
                read_access,
                run_migrations: false,
                environment: Environment::Development,
            },
            db: db.into_connection(),
            jwt_auth: JwtAuth::new(&jwt),
        }
    }

    fn app(state: &AppState) -> Router {
        Router::new()
            .nest("/api", api::routes(state))
            .merge(api::ready_router(state.clone()))
    }

    async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_restricted_catalog_rejects_anonymous_reads() {
        let state = state(
            ReadAccess::Restricted,
            MockDatabase::new(DatabaseBackend::Postgres),
        );

        for uri in ["/api/categories", "/api/products", "/api/users"] {
            let (status, body) = get(app(&state), uri).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_eq!(body["error"], "UNAUTHORIZED");
        }
    }

    #[tokio::test]
    async fn test_ready_reports_database_failure() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection refused".to_string())]);
        let state = state(ReadAccess::Public, db);

        let (status, body) = get(app(&state), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["database"], "disconnected");
        assert_eq!(body["status"], "not ready");
    }
}
