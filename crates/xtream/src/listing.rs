//! Provider listing client and the native episode index built from it.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use crate::{EpisodeKey, ProviderEpisodeMap, XtreamError};

/// Anything that can return the raw `get_series_info` payload for a URL.
#[async_trait::async_trait]
pub trait ListingSource: Send + Sync {
    async fn get_listing(&self, url: &str) -> Result<Value, XtreamError>;
}

#[derive(Debug, Clone)]
pub struct XtreamConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for XtreamConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            user_agent: "Mozilla/5.0 (compatible; vodlink/0.1)".to_string(),
        }
    }
}

pub struct XtreamClient {
    client: reqwest::Client,
}

impl XtreamClient {
    pub fn new(config: &XtreamConfig) -> Result<Self, XtreamError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(3))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| XtreamError::Network(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait::async_trait]
impl ListingSource for XtreamClient {
    async fn get_listing(&self, url: &str) -> Result<Value, XtreamError> {
        debug!(url = %url, "provider listing request");

        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| XtreamError::Network(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(XtreamError::Network(format!(
                "provider returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| XtreamError::Payload(format!("parse JSON: {e}")))
    }
}

/// Fetch the listing once and index it. Any failure yields an empty map.
pub async fn build_index(source: &dyn ListingSource, listing_url: &str) -> ProviderEpisodeMap {
    if listing_url.trim().is_empty() {
        return ProviderEpisodeMap::new();
    }

    match source.get_listing(listing_url).await {
        Ok(data) => {
            let index = parse_episode_index(&data);
            debug!(entries = index.len(), "provider episode index built");
            index
        }
        Err(e) => {
            warn!(error = %e, "provider listing unavailable; episode urls will be empty");
            ProviderEpisodeMap::new()
        }
    }
}

/// Index the `episodes` object of a listing payload.
///
/// `episodes` is keyed by season (`{"1": [...], "2": [...]}`); some panels
/// send a bare array instead, in which case the array position is the key.
/// An episode's own `season` field wins over the enclosing key. Entries
/// without an id or with a non-positive episode number are skipped.
pub fn parse_episode_index(data: &Value) -> ProviderEpisodeMap {
    let mut index = ProviderEpisodeMap::new();

    let seasons: Vec<(Option<u32>, &Value)> = match data.get("episodes") {
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, eps)| (key.trim().parse().ok(), eps))
            .collect(),
        Some(Value::Array(list)) => list
            .iter()
            .enumerate()
            .map(|(pos, eps)| (u32::try_from(pos).ok(), eps))
            .collect(),
        _ => return index,
    };

    for (season_key, eps) in seasons {
        let Some(eps) = eps.as_array() else {
            continue;
        };
        for ep in eps {
            let season = lenient_u32(&ep["season"]).or(season_key).unwrap_or(0);
            let episode = lenient_u32(&ep["episode_num"]).unwrap_or(0);
            let Some(id) = lenient_string(&ep["id"]) else {
                continue;
            };
            if episode > 0 {
                index.insert(EpisodeKey::new(season, episode), id);
            }
        }
    }

    index
}

/// Panels send numbers either as JSON numbers or numeric strings.
fn lenient_u32(v: &Value) -> Option<u32> {
    match v {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn lenient_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.trim().is_empty() && s.trim() != "0" => Some(s.trim().to_string()),
        Value::Number(n) if n.as_u64() != Some(0) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct StaticListing(Result<Value, ()>);

    #[async_trait::async_trait]
    impl ListingSource for StaticListing {
        async fn get_listing(&self, _url: &str) -> Result<Value, XtreamError> {
            self.0
                .clone()
                .map_err(|_| XtreamError::Network("connection refused".into()))
        }
    }

    #[test]
    fn indexes_episodes_by_season_key() {
        let data = json!({
            "info": { "name": "Dark" },
            "episodes": {
                "1": [
                    { "id": "655624", "episode_num": 1 },
                    { "id": "655625", "episode_num": "2" }
                ],
                "2": [
                    { "id": 700001, "episode_num": 1, "season": 2 }
                ]
            }
        });
        let index = parse_episode_index(&data);
        assert_eq!(index.len(), 3);
        assert_eq!(index.get(1, 1), Some("655624"));
        assert_eq!(index.get(1, 2), Some("655625"));
        assert_eq!(index.get(2, 1), Some("700001"));
    }

    #[test]
    fn episode_season_field_overrides_key() {
        let data = json!({
            "episodes": {
                "1": [ { "id": "9", "episode_num": 4, "season": "3" } ]
            }
        });
        let index = parse_episode_index(&data);
        assert_eq!(index.get(3, 4), Some("9"));
        assert_eq!(index.get(1, 4), None);
    }

    #[test]
    fn skips_missing_ids_and_zero_episode_numbers() {
        let data = json!({
            "episodes": {
                "1": [
                    { "episode_num": 1 },
                    { "id": "", "episode_num": 2 },
                    { "id": "12", "episode_num": 0 },
                    { "id": "13", "episode_num": 3 }
                ]
            }
        });
        let index = parse_episode_index(&data);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get(1, 3), Some("13"));
    }

    #[test]
    fn array_listing_uses_position_as_season() {
        let data = json!({
            "episodes": [
                [],
                [ { "id": "31", "episode_num": 1 } ]
            ]
        });
        assert_eq!(parse_episode_index(&data).get(1, 1), Some("31"));
    }

    #[test]
    fn payload_without_episodes_is_empty() {
        assert!(parse_episode_index(&json!({ "user_info": { "auth": 0 } })).is_empty());
        assert!(parse_episode_index(&json!([])).is_empty());
    }

    #[tokio::test]
    async fn unreachable_listing_gives_empty_index() {
        let source = StaticListing(Err(()));
        let index = build_index(&source, "http://h/player_api.php").await;
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn blank_url_is_not_fetched() {
        let source = StaticListing(Ok(json!({
            "episodes": { "1": [ { "id": "1", "episode_num": 1 } ] }
        })));
        assert!(build_index(&source, "  ").await.is_empty());
        assert_eq!(build_index(&source, "http://h").await.len(), 1);
    }
}
