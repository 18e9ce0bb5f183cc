//! TMDB (The Movie Database) catalog client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs

use std::time::Duration;

use tracing::debug;
use vodlink_core::types::MediaKind;

use crate::provider::CatalogProvider;
use crate::{
    CastMember, CatalogEpisode, CatalogRecord, Certification, Genre, MetadataError,
    SearchCandidate, SeasonPayload, SeasonSummary,
};

pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p";

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    /// Prefix for poster, still and profile paths.
    pub image_base: String,
    /// Whole-request budget; the connect timeout sits inside it.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://api.themoviedb.org/3".to_string(),
            image_base: DEFAULT_IMAGE_BASE.to_string(),
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            user_agent: "Mozilla/5.0 (compatible; vodlink/0.1)".to_string(),
        }
    }
}

pub struct TmdbClient {
    api_key: String,
    base_url: String,
    image_base: String,
    client: reqwest::Client,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig) -> Result<Self, MetadataError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .redirect(reqwest::redirect::Policy::limited(3))
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        Ok(Self {
            api_key: config.api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            image_base: config.image_base.trim_end_matches('/').to_string(),
            client,
        })
    }

    async fn get_json(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, MetadataError> {
        let mut all_params = vec![("api_key", self.api_key.as_str())];
        all_params.extend_from_slice(params);

        let url = format!("{}{path}", self.base_url);
        debug!(url = %url, "TMDB request");

        let resp = self
            .client
            .get(&url)
            .query(&all_params)
            .send()
            .await
            .map_err(|e| MetadataError::Network(e.to_string()))?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound);
        }

        if !resp.status().is_success() {
            return Err(MetadataError::Provider(format!(
                "TMDB returned {}",
                resp.status()
            )));
        }

        resp.json()
            .await
            .map_err(|e| MetadataError::Provider(format!("parse JSON: {e}")))
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbClient {
    fn name(&self) -> &str {
        "tmdb"
    }

    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
        locale: &str,
        year: Option<i32>,
    ) -> Result<Vec<SearchCandidate>, MetadataError> {
        let mut params = vec![("query", query), ("language", locale)];
        let year_str = year.map(|y| y.to_string());
        if let Some(ref y) = year_str {
            let key = match kind {
                MediaKind::Movie => "year",
                MediaKind::Series => "first_air_date_year",
            };
            params.push((key, y));
        }

        let data = self
            .get_json(&format!("/search/{}", kind.catalog_segment()), &params)
            .await?;
        parse_search_results(&data, kind)
    }

    async fn get_details(
        &self,
        kind: MediaKind,
        id: u64,
        locale: &str,
    ) -> Result<CatalogRecord, MetadataError> {
        let append = match kind {
            MediaKind::Movie => "credits,videos,release_dates",
            MediaKind::Series => "credits,videos,content_ratings",
        };
        let data = self
            .get_json(
                &format!("/{}/{id}", kind.catalog_segment()),
                &[("language", locale), ("append_to_response", append)],
            )
            .await?;

        parse_details(&data, kind, &self.image_base)
    }

    async fn get_season(
        &self,
        series_id: u64,
        season_number: u32,
        locale: &str,
    ) -> Result<SeasonPayload, MetadataError> {
        let data = self
            .get_json(
                &format!("/tv/{series_id}/season/{season_number}"),
                &[("language", locale)],
            )
            .await?;

        parse_season(&data, season_number, &self.image_base)
    }
}

fn str_field(v: &serde_json::Value) -> String {
    v.as_str().unwrap_or("").to_string()
}

fn image_url(image_base: &str, path: &serde_json::Value, size: &str) -> Option<String> {
    path.as_str()
        .filter(|p| !p.is_empty())
        .map(|p| format!("{image_base}/{size}{p}"))
}

fn parse_search_results(
    data: &serde_json::Value,
    kind: MediaKind,
) -> Result<Vec<SearchCandidate>, MetadataError> {
    let results = data["results"]
        .as_array()
        .ok_or_else(|| MetadataError::Provider("search payload has no results".into()))?;

    let (name_key, original_key, date_key) = match kind {
        MediaKind::Movie => ("title", "original_title", "release_date"),
        MediaKind::Series => ("name", "original_name", "first_air_date"),
    };

    Ok(results
        .iter()
        .filter_map(|r| {
            Some(SearchCandidate {
                id: r["id"].as_u64().filter(|id| *id > 0)?,
                name: str_field(&r[name_key]),
                original_name: str_field(&r[original_key]),
                popularity: r["popularity"].as_f64().unwrap_or(0.0).max(0.0),
                date: str_field(&r[date_key]),
                genre_ids: r["genre_ids"]
                    .as_array()
                    .map(|ids| {
                        ids.iter()
                            .filter_map(|g| g.as_u64())
                            .filter_map(|g| u32::try_from(g).ok())
                            .collect()
                    })
                    .unwrap_or_default(),
            })
        })
        .collect())
}

fn parse_details(
    data: &serde_json::Value,
    kind: MediaKind,
    image_base: &str,
) -> Result<CatalogRecord, MetadataError> {
    let id = data["id"]
        .as_u64()
        .ok_or_else(|| MetadataError::Provider("details payload has no id".into()))?;

    let (title_key, original_key, date_key) = match kind {
        MediaKind::Movie => ("title", "original_title", "release_date"),
        MediaKind::Series => ("name", "original_name", "first_air_date"),
    };

    let certifications = match kind {
        MediaKind::Movie => movie_certifications(data),
        MediaKind::Series => series_certifications(data),
    };

    Ok(CatalogRecord {
        id,
        kind,
        title: str_field(&data[title_key]),
        original_title: str_field(&data[original_key]),
        overview: data["overview"]
            .as_str()
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.to_string()),
        vote_average: data["vote_average"].as_f64().unwrap_or(0.0),
        vote_count: data["vote_count"].as_u64().unwrap_or(0),
        popularity: data["popularity"].as_f64().unwrap_or(0.0),
        release_date: str_field(&data[date_key]),
        runtime_minutes: match kind {
            MediaKind::Movie => data["runtime"].as_u64().map(|r| r as u32),
            MediaKind::Series => None,
        },
        number_of_seasons: data["number_of_seasons"].as_u64().unwrap_or(0) as u32,
        number_of_episodes: data["number_of_episodes"].as_u64().unwrap_or(0) as u32,
        genres: data["genres"]
            .as_array()
            .map(|gs| {
                gs.iter()
                    .filter_map(|g| {
                        Some(Genre {
                            id: g["id"].as_u64().unwrap_or(0) as u32,
                            name: g["name"].as_str()?.to_string(),
                        })
                    })
                    .collect()
            })
            .unwrap_or_default(),
        cast: extract_cast(data.get("credits"), image_base),
        seasons: data["seasons"]
            .as_array()
            .map(|ss| {
                ss.iter()
                    .map(|s| SeasonSummary {
                        season_number: s["season_number"].as_u64().unwrap_or(0) as u32,
                        name: str_field(&s["name"]),
                        episode_count: s["episode_count"].as_u64().unwrap_or(0) as u32,
                        poster_url: image_url(image_base, &s["poster_path"], "w500"),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        certifications,
        trailer_key: data["videos"]["results"].as_array().and_then(|vs| {
            vs.iter()
                .filter(|v| v["type"].as_str() == Some("Trailer"))
                .find_map(|v| v["key"].as_str().filter(|k| !k.is_empty()))
                .map(|k| k.to_string())
        }),
        poster_url: image_url(image_base, &data["poster_path"], "w500"),
        backdrop_url: image_url(image_base, &data["backdrop_path"], "w500"),
    })
}

fn series_certifications(data: &serde_json::Value) -> Vec<Certification> {
    data["content_ratings"]["results"]
        .as_array()
        .map(|rs| {
            rs.iter()
                .map(|r| Certification {
                    region: str_field(&r["iso_3166_1"]),
                    rating: str_field(&r["rating"]),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn movie_certifications(data: &serde_json::Value) -> Vec<Certification> {
    let mut certs = Vec::new();
    if let Some(regions) = data["release_dates"]["results"].as_array() {
        for region in regions {
            let code = str_field(&region["iso_3166_1"]);
            for release in region["release_dates"].as_array().into_iter().flatten() {
                certs.push(Certification {
                    region: code.clone(),
                    rating: str_field(&release["certification"]),
                });
            }
        }
    }
    certs
}

fn extract_cast(credits: Option<&serde_json::Value>, image_base: &str) -> Vec<CastMember> {
    credits
        .and_then(|c| c["cast"].as_array())
        .map(|cast| {
            cast.iter()
                .map(|person| CastMember {
                    name: str_field(&person["name"]),
                    photo_url: image_url(image_base, &person["profile_path"], "w200"),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn parse_season(
    data: &serde_json::Value,
    season_number: u32,
    image_base: &str,
) -> Result<SeasonPayload, MetadataError> {
    let episodes = data["episodes"]
        .as_array()
        .ok_or_else(|| MetadataError::Provider("season payload has no episodes".into()))?;

    Ok(SeasonPayload {
        season_number,
        episodes: episodes
            .iter()
            .map(|ep| CatalogEpisode {
                episode_number: ep["episode_number"].as_u64().unwrap_or(0) as u32,
                name: str_field(&ep["name"]),
                overview: str_field(&ep["overview"]),
                air_date: str_field(&ep["air_date"]),
                still_url: image_url(image_base, &ep["still_path"], "w300"),
            })
            .collect(),
    })
}
