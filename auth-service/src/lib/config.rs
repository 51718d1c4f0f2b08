use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub password: PasswordConfig,
    #[serde(default)]
    pub bootstrap_admin: Option<BootstrapAdminConfig>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub http_port: u16,
}

/// Which `UserStore` implementation backs the service.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub backend: StorageBackend,
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub bcrypt_cost: u32,
}

/// Administrator account created at startup when it does not exist yet.
#[derive(Deserialize, Clone)]
pub struct BootstrapAdminConfig {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for BootstrapAdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootstrapAdminConfig")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Mode used when `RUN_MODE` is unset. No `config/production.toml` ships,
/// so this resolves to `config/default.toml` plus the environment.
const DEFAULT_RUN_MODE: &str = "production";

/// Shortest accepted HS256 signing secret, in bytes.
pub const MIN_SECRET_BYTES: usize = 32;

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. `HOST`, `PORT`, `DATABASE_URL`
    /// 2. Environment variables (AUTH_DATABASE__URL, AUTH_JWT__SECRET, etc.)
    /// 3. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 4. Default config file (config/default.toml)
    /// 5. Built-in defaults
    ///
    /// No signing secret ships in the config files; `AUTH_JWT__SECRET` must be set.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| DEFAULT_RUN_MODE.to_string());

        Self::load_from(&run_mode, Environment::default(), |key| env::var(key).ok())
    }

    fn load_from(
        run_mode: &str,
        environment: Environment,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let configuration = ConfigBuilder::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.http_port", 9999)?
            .set_default("database.backend", "postgres")?
            .set_default("database.url", "")?
            .set_default("database.max_connections", 5)?
            .set_default("jwt.expiration_hours", 24)?
            .set_default("password.bcrypt_cost", auth::PasswordHasher::DEFAULT_COST as i64)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: AUTH_JWT__SECRET=... overrides jwt.secret
            .add_source(environment.prefix("AUTH").prefix_separator("_").separator("__"))
            .set_override_option("server.host", lookup("HOST"))?
            .set_override_option("server.http_port", lookup("PORT"))?
            .set_override_option("database.url", lookup("DATABASE_URL"))?
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::Message(format!(
                "jwt.secret must be at least {} bytes",
                MIN_SECRET_BYTES
            )));
        }
        if self.jwt.expiration_hours <= 0 {
            return Err(ConfigError::Message(
                "jwt.expiration_hours must be positive".to_string(),
            ));
        }
        let cost_range = auth::PasswordHasher::MIN_COST..=auth::PasswordHasher::MAX_COST;
        if !cost_range.contains(&self.password.bcrypt_cost) {
            return Err(ConfigError::Message(format!(
                "password.bcrypt_cost must be within {}..={}",
                cost_range.start(),
                cost_range.end()
            )));
        }
        if self.database.backend == StorageBackend::Postgres && self.database.url.is_empty() {
            return Err(ConfigError::Message(
                "database.url is required for the postgres backend".to_string(),
            ));
        }
        Ok(())
    }
}
