use crate::error::{AppError, AppResult};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// How long a freshly created billing stays payable.
    #[serde(default = "default_billing_ttl_hours")]
    pub billing_ttl_hours: i64,
    /// Digits in a generated virtual account number.
    #[serde(default = "default_virtual_account_length")]
    pub virtual_account_length: usize,
    /// Extra attempts after a virtual account collides with an existing one.
    #[serde(default = "default_virtual_account_retries")]
    pub virtual_account_retries: u32,
}

fn default_min_connections() -> u32 {
    1
}

fn default_connect_timeout_secs() -> u64 {
    8
}

fn default_billing_ttl_hours() -> i64 {
    24
}

fn default_virtual_account_length() -> usize {
    16
}

fn default_virtual_account_retries() -> u32 {
    3
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            billing_ttl_hours: default_billing_ttl_hours(),
            virtual_account_length: default_virtual_account_length(),
            virtual_account_retries: default_virtual_account_retries(),
        }
    }
}

impl CheckoutConfig {
    /// Reject values no billing could be created with.
    pub fn validate(&self) -> AppResult<()> {
        if self.billing_ttl_hours <= 0 || Duration::try_hours(self.billing_ttl_hours).is_none() {
            return Err(AppError::ConfigError(format!(
                "checkout.billing_ttl_hours out of range: {}",
                self.billing_ttl_hours
            )));
        }
        if self.virtual_account_length == 0 {
            return Err(AppError::ConfigError(
                "checkout.virtual_account_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// When a billing created at `created` stops being payable.
    pub fn billing_expiry(&self, created: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
        Duration::try_hours(self.billing_ttl_hours)
            .and_then(|ttl| created.checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::ConfigError(format!(
                    "checkout.billing_ttl_hours out of range: {}",
                    self.billing_ttl_hours
                ))
            })
    }
}

fn get_env(name: &str) -> Option<String> {
    env::var(name).ok()
}

fn get_env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_toml() -> AppResult<Self> {
        let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
        use std::io::ErrorKind;

        // Without a config file everything comes from the environment.
        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(config_str) => Self::parse(&config_str)?,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                let database_url = get_env("DATABASE_URL").ok_or_else(|| {
                    AppError::ConfigError(
                        "DATABASE_URL is not set and no config.toml was found".to_string(),
                    )
                })?;

                Config {
                    database: DatabaseConfig {
                        url: database_url,
                        max_connections: get_env_parse("DB_MAX_CONNECTIONS", 10u32),
                        min_connections: get_env_parse(
                            "DB_MIN_CONNECTIONS",
                            default_min_connections(),
                        ),
                        connect_timeout_secs: get_env_parse(
                            "DB_CONNECT_TIMEOUT_SECS",
                            default_connect_timeout_secs(),
                        ),
                        sqlx_logging: get_env_parse("DB_SQLX_LOGGING", false),
                    },
                    checkout: CheckoutConfig::default(),
                }
            }
            Err(e) => {
                return Err(AppError::ConfigError(format!(
                    "Failed to read config file {config_path}: {e}"
                )));
            }
        };

        config.apply_env_overrides();
        config.checkout.validate()?;
        Ok(config)
    }

    pub fn parse(config_str: &str) -> AppResult<Self> {
        let config: Self = toml::from_str(config_str)
            .map_err(|e| AppError::ConfigError(format!("Failed to parse config file: {e}")))?;
        config.checkout.validate()?;
        Ok(config)
    }

    /// Environment variables win over the file, even when the file exists.
    fn apply_env_overrides(&mut self) {
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DB_MAX_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.max_connections = mc;
        }
        if let Ok(v) = env::var("DB_MIN_CONNECTIONS")
            && let Ok(mc) = v.parse()
        {
            self.database.min_connections = mc;
        }
        if let Ok(v) = env::var("DB_CONNECT_TIMEOUT_SECS")
            && let Ok(n) = v.parse()
        {
            self.database.connect_timeout_secs = n;
        }
        if let Ok(v) = env::var("DB_SQLX_LOGGING")
            && let Ok(b) = v.parse()
        {
            self.database.sqlx_logging = b;
        }
        if let Ok(v) = env::var("CHECKOUT_BILLING_TTL_HOURS")
            && let Ok(n) = v.parse()
        {
            self.checkout.billing_ttl_hours = n;
        }
        if let Ok(v) = env::var("CHECKOUT_VIRTUAL_ACCOUNT_LENGTH")
            && let Ok(n) = v.parse()
        {
            self.checkout.virtual_account_length = n;
        }
        if let Ok(v) = env::var("CHECKOUT_VIRTUAL_ACCOUNT_RETRIES")
            && let Ok(n) = v.parse()
        {
            self.checkout.virtual_account_retries = n;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_applies_defaults() {
        let config = Config::parse(
            r#"
            [database]
            url = "postgres://localhost/checkout"
            max_connections = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.database.min_connections, 1);
        assert_eq!(config.database.connect_timeout_secs, 8);
        assert!(!config.database.sqlx_logging);
        assert_eq!(config.checkout.billing_ttl_hours, 24);
        assert_eq!(config.checkout.virtual_account_length, 16);
        assert_eq!(config.checkout.virtual_account_retries, 3);
    }

    #[test]
    fn test_parse_checkout_section() {
        let config = Config::parse(
            r#"
            [database]
            url = "sqlite::memory:"
            max_connections = 1

            [checkout]
            billing_ttl_hours = 2
            virtual_account_length = 10
            "#,
        )
        .unwrap();

        assert_eq!(config.checkout.billing_ttl_hours, 2);
        assert_eq!(config.checkout.virtual_account_length, 10);
        assert_eq!(config.checkout.virtual_account_retries, 3);
    }

    #[test]
    fn test_parse_rejects_unusable_billing_ttl() {
        let huge = (i64::MAX / 4).to_string();
        for ttl in ["0", "-3", huge.as_str()] {
            let err = Config::parse(&format!(
                "[database]\nurl = \"sqlite::memory:\"\nmax_connections = 1\n\n[checkout]\nbilling_ttl_hours = {ttl}\n"
            ))
            .unwrap_err();
            assert_eq!(err.code(), "CONFIG_ERROR", "ttl {ttl}");
        }
    }

    #[test]
    fn test_billing_expiry() {
        let created = Utc::now();
        let checkout = CheckoutConfig::default();
        assert_eq!(
            checkout.billing_expiry(created).unwrap(),
            created + Duration::hours(24)
        );

        let huge = CheckoutConfig {
            billing_ttl_hours: i64::MAX / 4,
            ..CheckoutConfig::default()
        };
        assert_eq!(huge.billing_expiry(created).unwrap_err().code(), "CONFIG_ERROR");
    }

    #[test]
    fn test_parse_rejects_missing_database() {
        let err = Config::parse("[checkout]\nbilling_ttl_hours = 1\n").unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }
}
