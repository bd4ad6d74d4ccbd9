use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub token: TokenConfig,
    pub lockout: LockoutConfig,
    pub hashing: HashingConfig,
    pub security: SecurityConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Dev,
    Prod,
}

#[derive(Debug, Clone)]
pub struct TokenConfig {
    pub ttl_seconds: i64,
}

#[derive(Debug, Clone)]
pub struct LockoutConfig {
    pub max_attempts: u32,
    pub lock_duration_seconds: u64,
}

/// Argon2id cost parameters. The defaults are tuned so a single hash costs
/// roughly as much compute as a bcrypt hash at cost factor 12.
#[derive(Debug, Clone)]
pub struct HashingConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub enabled: SwaggerMode,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum SwaggerMode {
    Public,
    Authenticated,
    Disabled,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;

        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = AuthConfig {
            common: common_config,
            environment,
            service_name: get_env("SERVICE_NAME", Some("auth-service"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            token: TokenConfig {
                ttl_seconds: parse_env("TOKEN_TTL_SECONDS", "3600", is_prod)?,
            },
            lockout: LockoutConfig {
                max_attempts: parse_env("LOCKOUT_MAX_ATTEMPTS", "3", is_prod)?,
                lock_duration_seconds: parse_env("LOCKOUT_DURATION_SECONDS", "900", is_prod)?,
            },
            hashing: HashingConfig {
                memory_kib: parse_env("ARGON2_MEMORY_KIB", "19456", is_prod)?,
                iterations: parse_env("ARGON2_ITERATIONS", "2", is_prod)?,
                parallelism: parse_env("ARGON2_PARALLELISM", "1", is_prod)?,
            },
            security: SecurityConfig {
                allowed_origins: get_env("ALLOWED_ORIGINS", Some("http://localhost:3000"), is_prod)?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            },
            swagger: SwaggerConfig {
                enabled: get_env("ENABLE_SWAGGER", Some("public"), is_prod)?
                    .parse()
                    .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.common.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        if self.token.ttl_seconds <= 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "TOKEN_TTL_SECONDS must be positive"
            )));
        }

        if self.lockout.max_attempts == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "LOCKOUT_MAX_ATTEMPTS must be greater than 0"
            )));
        }

        if self.hashing.memory_kib < 8 * self.hashing.parallelism || self.hashing.iterations == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Argon2 parameters below the minimum the hasher accepts"
            )));
        }

        if self.environment == Environment::Prod {
            if self.security.allowed_origins.iter().any(|o| o == "*") {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "Wildcard CORS origin not allowed in production"
                )));
            }

            if self.swagger.enabled == SwaggerMode::Public {
                tracing::error!("Swagger is publicly accessible in production - consider using 'authenticated' or 'disabled'");
            }
        }

        Ok(())
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

fn parse_env<T>(key: &str, default: &str, is_prod: bool) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env(key, Some(default), is_prod)?
        .parse()
        .map_err(|e: T::Err| {
            AppError::ConfigError(anyhow::anyhow!("{} is not a valid value: {}", key, e))
        })
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

impl std::str::FromStr for SwaggerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(SwaggerMode::Public),
            "authenticated" => Ok(SwaggerMode::Authenticated),
            "disabled" => Ok(SwaggerMode::Disabled),
            _ => Err(format!("Invalid swagger mode: {}", s)),
        }
    }
}
