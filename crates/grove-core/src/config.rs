// ── Runtime configuration ──
//
// Where the dashboard reads from and writes to, plus transport tuning.
// Core never touches disk: the binary builds a `GroveConfig` (usually via
// `grove-config`) and hands it in.

use std::time::Duration;

use grove_api::TlsMode;
use secrecy::SecretString;
use url::Url;

/// Placeholder substituted in the recipe origin template.
pub const ORIGIN_PLACEHOLDER: &str = "{origin}";

/// Basic-auth credentials for the local document database.
#[derive(Debug, Clone)]
pub struct DatabaseAuth {
    pub username: String,
    pub password: SecretString,
}

#[derive(Debug, Clone)]
pub struct GroveConfig {
    /// View returning the latest environmental data points.
    pub latest_url: Url,
    /// Local recipe database.
    pub recipes_local: Url,
    /// Remote recipe database, with `{origin}` standing for the origin.
    pub recipes_origin_template: String,
    /// Device endpoint that starts a recipe.
    pub start_recipe_url: Url,
    pub auth: Option<DatabaseAuth>,
    pub tls: TlsMode,
    pub timeout: Duration,
    pub poll_interval: Duration,
    pub poll_max_backoff: Duration,
    /// Origin to configure at startup, if any.
    pub default_origin: Option<Url>,
}

/// Substitute `origin` into `template`.
///
/// A trailing `/` on the origin is dropped so `"{origin}/recipes"` never
/// yields a double slash.
pub fn render_origin(template: &str, origin: &Url) -> Result<Url, url::ParseError> {
    let origin = origin.as_str().trim_end_matches('/');
    Url::parse(&template.replace(ORIGIN_PLACEHOLDER, origin))
}
