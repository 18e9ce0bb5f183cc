//! Process configuration, read once from the environment at startup.

use std::time::Duration;

use anyhow::{Context, bail};
use vodlink_metadata::plan::Locales;
use vodlink_metadata::resolve::ResolveOptions;
use vodlink_metadata::tmdb::TmdbConfig;
use vodlink_xtream::ProviderConnection;
use vodlink_xtream::listing::XtreamConfig;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub tmdb: TmdbConfig,
    pub xtream: XtreamConfig,
    pub resolve: ResolveOptions,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let Some(api_key) = get("VODLINK_TMDB_KEY") else {
            bail!("VODLINK_TMDB_KEY is not set");
        };

        let secs = |key: &str, default: u64| -> anyhow::Result<Duration> {
            match get(key) {
                Some(v) => v
                    .parse()
                    .map(Duration::from_secs)
                    .with_context(|| format!("{key} must be a whole number of seconds")),
                None => Ok(Duration::from_secs(default)),
            }
        };
        let timeout = secs("VODLINK_HTTP_TIMEOUT_SECS", 10)?;
        let connect_timeout = secs("VODLINK_CONNECT_TIMEOUT_SECS", 5)?;
        if connect_timeout > timeout {
            bail!("VODLINK_CONNECT_TIMEOUT_SECS must not exceed VODLINK_HTTP_TIMEOUT_SECS");
        }

        let tmdb_defaults = TmdbConfig::default();
        let tmdb = TmdbConfig {
            api_key,
            base_url: get("VODLINK_TMDB_BASE_URL").unwrap_or(tmdb_defaults.base_url),
            image_base: get("VODLINK_TMDB_IMAGE_BASE").unwrap_or(tmdb_defaults.image_base),
            timeout,
            connect_timeout,
            user_agent: tmdb_defaults.user_agent,
        };
        let xtream = XtreamConfig {
            timeout,
            connect_timeout,
            ..XtreamConfig::default()
        };

        let locale_defaults = Locales::default();
        let fallback_connection = match (
            get("VODLINK_FALLBACK_DOMAIN"),
            get("VODLINK_FALLBACK_USERNAME"),
            get("VODLINK_FALLBACK_PASSWORD"),
        ) {
            (Some(domain), Some(username), Some(password)) => Some(ProviderConnection {
                domain: domain.trim_end_matches('/').to_string(),
                username,
                password,
            }),
            _ => None,
        };

        let resolve = ResolveOptions {
            locales: Locales {
                primary: get("VODLINK_PRIMARY_LOCALE").unwrap_or(locale_defaults.primary),
                fallback: get("VODLINK_FALLBACK_LOCALE").unwrap_or(locale_defaults.fallback),
            },
            classification_region: get("VODLINK_REGION").unwrap_or_else(|| "BR".to_string()),
            fallback_connection,
            ..ResolveOptions::default()
        };

        Ok(Self {
            bind_addr: get("VODLINK_BIND").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            tmdb,
            xtream,
            resolve,
        })
    }
}
