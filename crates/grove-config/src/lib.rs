//! Configuration for the grove dashboard.
//!
//! A TOML file at the platform config directory, overlaid with
//! `GROVE_`-prefixed environment variables (nested keys split on `__`,
//! e.g. `GROVE_DEFAULTS__TIMEOUT=5`), translated into
//! [`grove_core::GroveConfig`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use grove_core::{DatabaseAuth, GroveConfig, TlsMode, config::ORIGIN_PLACEHOLDER};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Environment variable consulted first for the database password.
pub const PASSWORD_ENV: &str = "GROVE_DB_PASSWORD";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no password configured for database user '{username}'")]
    NoCredentials { username: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Recipe origin configured at startup.
    pub default_origin: Option<String>,

    #[serde(default)]
    pub origins: Origins,

    #[serde(default)]
    pub recipes: Recipes,

    #[serde(default)]
    pub api: Api,

    #[serde(default)]
    pub database: Database,

    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Origins {
    #[serde(default = "default_latest")]
    pub environmental_data_point_latest: String,
}

impl Default for Origins {
    fn default() -> Self {
        Self {
            environmental_data_point_latest: default_latest(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Recipes {
    /// Local recipe database.
    #[serde(default = "default_recipes_local")]
    pub local: String,

    /// Remote recipe database; `{origin}` is replaced by the origin.
    #[serde(default = "default_recipes_origin")]
    pub origin: String,
}

impl Default for Recipes {
    fn default() -> Self {
        Self {
            local: default_recipes_local(),
            origin: default_recipes_origin(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Api {
    #[serde(default = "default_start_recipe")]
    pub start_recipe: String,
}

impl Default for Api {
    fn default() -> Self {
        Self {
            start_recipe: default_start_recipe(),
        }
    }
}

/// Credentials for the local database. All optional: CouchDB in
/// "admin party" mode needs none.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Database {
    pub username: Option<String>,

    /// Password (plaintext; prefer `password_env` or `GROVE_DB_PASSWORD`).
    pub password: Option<String>,

    /// Environment variable name containing the password.
    pub password_env: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    #[serde(default = "default_poll_max_backoff")]
    pub poll_max_backoff_secs: u64,

    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate.
    pub ca_cert: Option<PathBuf>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            poll_interval_secs: default_poll_interval(),
            poll_max_backoff_secs: default_poll_max_backoff(),
            insecure: false,
            ca_cert: None,
        }
    }
}

fn default_latest() -> String {
    "http://localhost:5984/environmental_data_point/_design/openag/_view/latest".into()
}
fn default_recipes_local() -> String {
    "http://localhost:5984/recipes".into()
}
fn default_recipes_origin() -> String {
    format!("{ORIGIN_PLACEHOLDER}/recipes")
}
fn default_start_recipe() -> String {
    "http://localhost:5000/api/recipe/start".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_poll_interval() -> u64 {
    2
}
fn default_poll_max_backoff() -> u64 {
    60
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("org", "grove", "grove").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("grove");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from `path` (or the canonical path) + environment.
/// A missing file is not an error: defaults and environment still apply.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let path = path.map_or_else(config_path, Path::to_path_buf);

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("GROVE_").split("__"));

    let config: Config = figment.extract()?;
    Ok(config)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write it to `path`.
pub fn save_config(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Credential resolution ───────────────────────────────────────────

/// Resolve database credentials.
///
/// No username means no authentication. The password comes from
/// `GROVE_DB_PASSWORD`, then the variable named by `password_env`, then
/// the plaintext `password`.
pub fn resolve_database_auth(db: &Database) -> Result<Option<DatabaseAuth>, ConfigError> {
    let Some(username) = db.username.clone().filter(|u| !u.is_empty()) else {
        return Ok(None);
    };

    if let Ok(pw) = std::env::var(PASSWORD_ENV) {
        return Ok(Some(DatabaseAuth {
            username,
            password: SecretString::from(pw),
        }));
    }

    if let Some(pw) = db.password_env.as_deref().and_then(|name| std::env::var(name).ok()) {
        return Ok(Some(DatabaseAuth {
            username,
            password: SecretString::from(pw),
        }));
    }

    if let Some(ref pw) = db.password {
        return Ok(Some(DatabaseAuth {
            username,
            password: SecretString::from(pw.clone()),
        }));
    }

    Err(ConfigError::NoCredentials { username })
}

// ── Translation ─────────────────────────────────────────────────────

fn parse_url(field: &str, raw: &str) -> Result<Url, ConfigError> {
    raw.parse().map_err(|e| ConfigError::Validation {
        field: field.into(),
        reason: format!("invalid URL '{raw}': {e}"),
    })
}

/// Build the runtime configuration.
///
/// `origin_override` (e.g. from the command line) wins over
/// `default_origin`.
pub fn to_grove_config(
    cfg: &Config,
    origin_override: Option<&str>,
) -> Result<GroveConfig, ConfigError> {
    let latest_url = parse_url(
        "origins.environmental_data_point_latest",
        &cfg.origins.environmental_data_point_latest,
    )?;
    let recipes_local = parse_url("recipes.local", &cfg.recipes.local)?;
    let start_recipe_url = parse_url("api.start_recipe", &cfg.api.start_recipe)?;

    // The template must render to an absolute URL for some origin.
    let probe = Url::parse("http://origin.invalid").map_err(|e| ConfigError::Validation {
        field: "recipes.origin".into(),
        reason: e.to_string(),
    })?;
    grove_core::render_origin(&cfg.recipes.origin, &probe).map_err(|e| {
        ConfigError::Validation {
            field: "recipes.origin".into(),
            reason: format!("template '{}' does not yield a URL: {e}", cfg.recipes.origin),
        }
    })?;

    let default_origin = origin_override
        .or(cfg.default_origin.as_deref())
        .filter(|o| !o.is_empty())
        .map(|o| parse_url("default_origin", o))
        .transpose()?;

    if cfg.defaults.poll_interval_secs == 0 {
        return Err(ConfigError::Validation {
            field: "defaults.poll_interval_secs".into(),
            reason: "must be at least 1".into(),
        });
    }

    let tls = if cfg.defaults.insecure {
        TlsMode::DangerAcceptInvalid
    } else if let Some(ref ca_path) = cfg.defaults.ca_cert {
        TlsMode::CustomCa(ca_path.clone())
    } else {
        TlsMode::System
    };

    let poll_interval = Duration::from_secs(cfg.defaults.poll_interval_secs);
    let poll_max_backoff =
        Duration::from_secs(cfg.defaults.poll_max_backoff_secs).max(poll_interval);

    Ok(GroveConfig {
        latest_url,
        recipes_local,
        recipes_origin_template: cfg.recipes.origin.clone(),
        start_recipe_url,
        auth: resolve_database_auth(&cfg.database)?,
        tls,
        timeout: Duration::from_secs(cfg.defaults.timeout),
        poll_interval,
        poll_max_backoff,
        default_origin,
    })
}
