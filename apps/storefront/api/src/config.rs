use axum_helpers::{JwtConfig, ReadAccess};
use core_config::{AppInfo, FromEnv, app_info, env_parse_or_default, server::ServerConfig};
use database::postgres::PostgresConfig;

pub use core_config::Environment;

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub read_access: ReadAccess,
    /// Apply pending migrations before serving
    pub run_migrations: bool,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // Required - will fail if not set
        let server = ServerConfig::from_env()?; // Uses defaults: HOST=0.0.0.0, PORT=8080
        let jwt = JwtConfig::from_env()?;
        let read_access = ReadAccess::from_env()?;
        let run_migrations = env_parse_or_default("RUN_MIGRATIONS", "true")?;

        Ok(Self {
            app: app_info!(),
            database,
            server,
            jwt,
            read_access,
            run_migrations,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "storefront-config-test-secret-0123456789";

    #[test]
    fn test_config_defaults() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/storefront")),
                ("JWT_SECRET", Some(SECRET)),
                ("CATALOG_READ_ACCESS", None),
                ("RUN_MIGRATIONS", None),
                ("PORT", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.read_access, ReadAccess::Restricted);
                assert!(config.run_migrations);
                assert_eq!(config.server.port, 8080);
                assert_eq!(config.app.name, "storefront_api");
            },
        );
    }

    #[test]
    fn test_config_requires_jwt_secret() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/storefront")),
                ("JWT_SECRET", None),
            ],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("JWT_SECRET"));
            },
        );
    }

    #[test]
    fn test_config_public_catalog_without_migrations() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgres://localhost/storefront")),
                ("JWT_SECRET", Some(SECRET)),
                ("CATALOG_READ_ACCESS", Some("public")),
                ("RUN_MIGRATIONS", Some("false")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.read_access, ReadAccess::Public);
                assert!(!config.run_migrations);
            },
        );
    }
}
