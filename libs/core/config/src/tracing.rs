use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, Layer, Registry, prelude::*};

/// Filter used when `RUST_LOG` is unset.
///
/// Production keeps the storefront crates at `info` and silences SQL chatter;
/// development shows the domain crates at `debug`.
fn default_filter(environment: Environment) -> EnvFilter {
    let directives = if environment.is_production() {
        "info,sqlx=warn,sea_orm=warn,tower_http=info"
    } else {
        "info,domain_catalog=debug,domain_users=debug,axum_helpers=debug,tower_http=debug,hyper=info"
    };
    EnvFilter::new(directives)
}

fn fmt_layer(environment: Environment) -> Box<dyn Layer<Registry> + Send + Sync> {
    if environment.is_production() {
        tracing_subscriber::fmt::layer()
            .json()
            .with_target(false)
            .flatten_event(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_target(true)
            .with_file(false)
            .with_line_number(false)
            .pretty()
            .boxed()
    }
}

/// Install color-eyre for startup error reports.
///
/// Call this first in `main()`. Repeated calls are ignored.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize the global subscriber.
///
/// Production writes flattened JSON lines; development writes pretty,
/// human-readable output. Both carry `tracing_error::ErrorLayer` so eyre
/// reports include span traces. `RUST_LOG` overrides the default filter.
///
/// Only the first call installs anything.
pub fn init_tracing(environment: &Environment) {
    let environment = *environment;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(environment));

    let result = tracing_subscriber::registry()
        .with(fmt_layer(environment))
        .with(tracing_error::ErrorLayer::default())
        .with(filter)
        .try_init();

    match result {
        Ok(_) => info!(?environment, "Tracing initialized"),
        Err(_) => debug!("Tracing already initialized"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_tracing_twice_is_harmless() {
        init_tracing(&Environment::Development);
        init_tracing(&Environment::Production);
    }

    #[test]
    fn test_default_filters_differ_by_environment() {
        let dev = default_filter(Environment::Development).to_string();
        let prod = default_filter(Environment::Production).to_string();
        assert!(dev.contains("domain_catalog=debug"));
        assert!(prod.contains("sea_orm=warn"));
    }
}
