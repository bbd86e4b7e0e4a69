//! Configuration types for authentication and read policy.
//!
//! Both implement `FromEnv` from `core_config`, following the same pattern
//! as `PostgresConfig` and `ServerConfig`.

use core_config::{ConfigError, FromEnv, env_parse_or_default, env_required};
use strum::{Display, EnumString};

/// JWT verification configuration.
///
/// Loaded from environment variables:
/// - `JWT_SECRET` (required) - Must be at least 32 characters for security
///
/// # Example
///
/// ```ignore
/// use axum_helpers::JwtConfig;
/// use core_config::FromEnv;
///
/// // From environment variables
/// let config = JwtConfig::from_env()?;
///
/// // Manual construction (for testing)
/// let config = JwtConfig::new("my-super-secret-key-that-is-at-least-32-chars");
/// ```
#[derive(Clone, Debug)]
pub struct JwtConfig {
    /// HS256 shared secret (minimum 32 characters)
    pub secret: String,
}

impl JwtConfig {
    /// Create a new JwtConfig with the given secret.
    ///
    /// # Panics
    /// Panics if the secret is less than 32 characters.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(
            secret.len() >= 32,
            "JWT secret must be at least 32 characters"
        );
        Self { secret }
    }
}

impl FromEnv for JwtConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;

        if secret.len() < 32 {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: format!(
                    "must be at least 32 characters for security (got {}). Generate one with: openssl rand -base64 32",
                    secret.len()
                ),
            });
        }

        Ok(Self { secret })
    }
}

/// Who may read the public catalog (categories and products).
///
/// Read from `CATALOG_READ_ACCESS` (`public` or `restricted`, default
/// `restricted`) and placed into request extensions, where
/// [`Reader`](super::Reader) picks it up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Display, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum ReadAccess {
    /// Anonymous callers may read
    Public,
    /// Callers need one of the reader roles
    #[default]
    Restricted,
}

impl FromEnv for ReadAccess {
    fn from_env() -> Result<Self, ConfigError> {
        env_parse_or_default("CATALOG_READ_ACCESS", "restricted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_config_new_valid() {
        let secret = "this-is-a-valid-secret-with-32-chars!";
        let config = JwtConfig::new(secret);
        assert_eq!(config.secret, secret);
    }

    #[test]
    #[should_panic(expected = "JWT secret must be at least 32 characters")]
    fn test_jwt_config_new_too_short() {
        JwtConfig::new("short");
    }

    #[test]
    fn test_jwt_config_from_env_missing() {
        temp_env::with_var_unset("JWT_SECRET", || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("JWT_SECRET"));
        });
    }

    #[test]
    fn test_jwt_config_from_env_too_short() {
        temp_env::with_var("JWT_SECRET", Some("short"), || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("32 characters"));
        });
    }

    #[test]
    fn test_read_access_defaults_to_restricted() {
        temp_env::with_var_unset("CATALOG_READ_ACCESS", || {
            assert_eq!(ReadAccess::from_env().unwrap(), ReadAccess::Restricted);
        });
    }

    #[test]
    fn test_read_access_public() {
        temp_env::with_var("CATALOG_READ_ACCESS", Some("PUBLIC"), || {
            assert_eq!(ReadAccess::from_env().unwrap(), ReadAccess::Public);
        });
    }

    #[test]
    fn test_read_access_rejects_unknown_value() {
        temp_env::with_var("CATALOG_READ_ACCESS", Some("everyone"), || {
            let err = ReadAccess::from_env().unwrap_err();
            assert!(err.to_string().contains("CATALOG_READ_ACCESS"));
        });
    }
}
