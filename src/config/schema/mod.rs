use crate::automod::webhook_cache::{DEFAULT_WEBHOOK_NAME, DEFAULT_WEBHOOK_TTL};
use crate::errors::BarnacleError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Generates a `Debug` impl that redacts secret fields.
///
/// Field specifiers:
/// - `field_name`         : printed normally via `&self.field_name`
/// - `redact(field_name)` : `String` field: shows `[empty]` or `[REDACTED]`
macro_rules! redact_debug {
    (@field $builder:ident, $self:ident, redact($field:ident)) => {
        $builder.field(
            stringify!($field),
            &if $self.$field.is_empty() {
                "[empty]"
            } else {
                "[REDACTED]"
            },
        );
    };
    (@field $builder:ident, $self:ident, $field:ident) => {
        $builder.field(stringify!($field), &$self.$field);
    };

    (@fields $builder:ident, $self:ident,) => {};
    (@fields $builder:ident, $self:ident, redact($field:ident), $($rest:tt)*) => {
        redact_debug!(@field $builder, $self, redact($field));
        redact_debug!(@fields $builder, $self, $($rest)*);
    };
    (@fields $builder:ident, $self:ident, $field:ident, $($rest:tt)*) => {
        redact_debug!(@field $builder, $self, $field);
        redact_debug!(@fields $builder, $self, $($rest)*);
    };

    ($struct_name:ident, $($fields:tt)*) => {
        impl std::fmt::Debug for $struct_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let mut builder = f.debug_struct(stringify!($struct_name));
                redact_debug!(@fields builder, self, $($fields)*);
                builder.finish()
            }
        }
    };
}

pub const DEFAULT_API_BASE_URL: &str = "https://discord.com/api/v10";
pub const RULES_FILE_NAME: &str = "automod-messages.json";

/// Discord rejects webhook names longer than this.
const MAX_WEBHOOK_NAME_LEN: usize = 80;

// ---------------------------------------------------------------------------
// Discord
// ---------------------------------------------------------------------------

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

#[derive(Clone, Serialize, Deserialize)]
pub struct DiscordConfig {
    #[serde(default)]
    pub token: String,
    #[serde(default = "default_api_base_url", rename = "apiBaseUrl")]
    pub api_base_url: String,
}

impl Default for DiscordConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base_url: default_api_base_url(),
        }
    }
}

redact_debug!(DiscordConfig, redact(token), api_base_url,);

// ---------------------------------------------------------------------------
// Automod
// ---------------------------------------------------------------------------

fn default_webhook_name() -> String {
    DEFAULT_WEBHOOK_NAME.to_string()
}

fn default_webhook_cache_ttl_secs() -> u64 {
    DEFAULT_WEBHOOK_TTL.as_secs()
}

fn default_http_timeout_secs() -> u64 {
    15
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutomodConfig {
    /// Rule file location. Defaults to `automod-messages.json` in the barnacle home.
    #[serde(default, rename = "rulesPath", skip_serializing_if = "Option::is_none")]
    pub rules_path: Option<PathBuf>,
    /// Name given to webhooks created for republishing.
    #[serde(default = "default_webhook_name", rename = "webhookName")]
    pub webhook_name: String,
    #[serde(
        default = "default_webhook_cache_ttl_secs",
        rename = "webhookCacheTtlSecs"
    )]
    pub webhook_cache_ttl_secs: u64,
    /// Per-request timeout for Discord REST calls.
    #[serde(default = "default_http_timeout_secs", rename = "httpTimeoutSecs")]
    pub http_timeout_secs: u64,
}

impl Default for AutomodConfig {
    fn default() -> Self {
        Self {
            rules_path: None,
            webhook_name: default_webhook_name(),
            webhook_cache_ttl_secs: default_webhook_cache_ttl_secs(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

impl AutomodConfig {
    pub fn rules_path(&self) -> PathBuf {
        self.rules_path.clone().unwrap_or_else(|| {
            crate::utils::get_barnacle_home()
                .map_or_else(|_| PathBuf::from(RULES_FILE_NAME), |h| h.join(RULES_FILE_NAME))
        })
    }

    pub fn webhook_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.webhook_cache_ttl_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub automod: AutomodConfig,
}

impl Config {
    /// Validate configuration values
    pub fn validate(&self) -> Result<(), BarnacleError> {
        self.validate_discord()?;
        self.validate_automod()?;
        Ok(())
    }

    fn validate_discord(&self) -> Result<(), BarnacleError> {
        let parsed = url::Url::parse(&self.discord.api_base_url).map_err(|e| {
            BarnacleError::Config(format!(
                "discord.apiBaseUrl is not a valid URL ({}): {}",
                self.discord.api_base_url, e
            ))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(BarnacleError::Config(
                "discord.apiBaseUrl must use http or https".into(),
            ));
        }
        Ok(())
    }

    fn validate_automod(&self) -> Result<(), BarnacleError> {
        let a = &self.automod;

        let name = a.webhook_name.trim();
        if name.is_empty() {
            return Err(BarnacleError::Config(
                "automod.webhookName must not be empty".into(),
            ));
        }
        if name.chars().count() > MAX_WEBHOOK_NAME_LEN {
            return Err(BarnacleError::Config(format!(
                "automod.webhookName must be at most {} characters",
                MAX_WEBHOOK_NAME_LEN
            )));
        }
        // Discord refuses to create webhooks with these substrings in the name.
        let lowered = name.to_lowercase();
        if lowered.contains("discord") || lowered.contains("clyde") {
            return Err(BarnacleError::Config(
                "automod.webhookName must not contain \"discord\" or \"clyde\"".into(),
            ));
        }

        if a.webhook_cache_ttl_secs == 0 {
            return Err(BarnacleError::Config(
                "automod.webhookCacheTtlSecs must be > 0".into(),
            ));
        }
        if a.webhook_cache_ttl_secs > 86_400 {
            return Err(BarnacleError::Config(
                "automod.webhookCacheTtlSecs is unreasonably large (> 86400)".into(),
            ));
        }
        if a.http_timeout_secs == 0 {
            return Err(BarnacleError::Config(
                "automod.httpTimeoutSecs must be > 0".into(),
            ));
        }
        if a.http_timeout_secs > 300 {
            return Err(BarnacleError::Config(
                "automod.httpTimeoutSecs is unreasonably large (> 300)".into(),
            ));
        }
        Ok(())
    }
}
