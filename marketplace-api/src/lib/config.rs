use std::env;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use config::Map;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub session: SessionConfig,
    #[serde(default)]
    pub astra: AstraConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
}

/// Secret for signed cookies. Loaded and checked at startup with the other secrets.
#[derive(Debug, Deserialize, Clone)]
pub struct SessionConfig {
    pub secret: String,
}

/// Third-party API credentials; optional.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AstraConfig {
    pub api_key: Option<String>,
}

fn default_max_connections() -> u32 {
    5
}

fn default_expiration_hours() -> i64 {
    24
}

/// Keep only `SECTION__KEY` variables so unrelated process variables do not
/// land as top-level keys.
fn nested_variables(variables: impl Iterator<Item = (String, String)>) -> Map<String, String> {
    variables.filter(|(name, _)| name.contains("__")).collect()
}

/// Flat variable names used by existing deployments, mapped onto config keys.
const LEGACY_VARIABLES: [(&str, &str); 4] = [
    ("DATABASE_URL", "database.url"),
    ("JWT_SECRET_KEY", "jwt.secret"),
    ("SECRET_KEY", "session.secret"),
    ("ASTRA_API_KEY", "astra.api_key"),
];

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Flat variables (DATABASE_URL, JWT_SECRET_KEY, SECRET_KEY, ASTRA_API_KEY)
    /// 2. Environment variables (DATABASE__URL, SERVER__HTTP_PORT, etc.)
    /// 3. Environment-specific config file (config/{environment}.toml)
    /// 4. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let mut builder = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(
                Environment::default()
                    .separator("__")
                    .source(Some(nested_variables(env::vars()))),
            );

        for (variable, key) in LEGACY_VARIABLES {
            builder = builder.set_override_option(key, env::var(variable).ok())?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject configurations that would only fail once requests arrive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required = [
            ("database.url", &self.database.url),
            ("jwt.secret", &self.jwt.secret),
            ("session.secret", &self.session.secret),
        ];

        if let Some((key, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(ConfigError::Message(format!("{} must not be empty", key)));
        }

        if self.jwt.expiration_hours <= 0 {
            return Err(ConfigError::Message(
                "jwt.expiration_hours must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
