//! IPTV provider side of resolution: connection parameters, the native
//! episode index built from the provider's `player_api.php` listing, and
//! playback URL synthesis.

pub mod connection;
pub mod listing;
pub mod stream;

use std::collections::HashMap;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum XtreamError {
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed listing: {0}")]
    Payload(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// Domain and credentials used to build provider stream URLs.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProviderConnection {
    /// `scheme://host[:port]`, no trailing slash.
    pub domain: String,
    pub username: String,
    pub password: String,
}

/// A (season, episode) coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EpisodeKey {
    pub season: u32,
    pub episode: u32,
}

impl EpisodeKey {
    pub fn new(season: u32, episode: u32) -> Self {
        Self { season, episode }
    }
}

impl std::fmt::Display for EpisodeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.season, self.episode)
    }
}

/// Provider-native episode ids keyed by coordinate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProviderEpisodeMap {
    ids: HashMap<EpisodeKey, String>,
}

impl ProviderEpisodeMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later entries for the same coordinate replace earlier ones.
    pub fn insert(&mut self, key: EpisodeKey, id: String) {
        self.ids.insert(key, id);
    }

    pub fn get(&self, season: u32, episode: u32) -> Option<&str> {
        self.ids
            .get(&EpisodeKey::new(season, episode))
            .map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
