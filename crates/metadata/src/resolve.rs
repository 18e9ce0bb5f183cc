//! End-to-end resolution of a provider entry into a catalog record, and
//! for series, a per-episode list with provider playback URLs.

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info};
use vodlink_core::types::MediaKind;
use vodlink_xtream::connection::{extract_connection, series_listing_url};
use vodlink_xtream::listing::{ListingSource, build_index};
use vodlink_xtream::stream::{movie_url, series_episode_url};
use vodlink_xtream::{EpisodeKey, ProviderConnection, ProviderEpisodeMap};

use crate::genres::genres_from_ids;
use crate::plan::{Locales, SearchStrategy, plan_and_search};
use crate::provider::CatalogProvider;
use crate::score::{ScoredCandidate, pick_best};
use crate::seasons::fetch_all_seasons;
use crate::{CatalogRecord, MetadataError, SeasonPayload};

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("no catalog candidate for {query:?} (cleaned: {cleaned:?})")]
    NoCandidate { query: String, cleaned: String },
    #[error("failed to fetch catalog details: {0}")]
    Details(#[source] MetadataError),
}

#[derive(Debug, Clone)]
pub struct ResolveOptions {
    pub locales: Locales,
    /// ISO 3166-1 region whose classification is preferred.
    pub classification_region: String,
    /// Used when a request carries no provider URL, or one without credentials.
    pub fallback_connection: Option<ProviderConnection>,
    pub cast_limit: usize,
}

impl Default for ResolveOptions {
    fn default() -> Self {
        Self {
            locales: Locales::default(),
            classification_region: "BR".to_string(),
            fallback_connection: None,
            cast_limit: 10,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeriesQuery {
    pub title: String,
    pub series_id: String,
    pub category_id: String,
    pub poster_url: Option<String>,
    /// Provider `get_series_info` URL.
    pub listing_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieQuery {
    pub title: String,
    pub stream_id: String,
    pub category_id: String,
    pub poster_url: Option<String>,
    pub stream_url: Option<String>,
}

/// One output row per (season, episode).
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct EpisodeAggregate {
    pub season_number: u32,
    pub episode_number: u32,
    pub name: String,
    pub overview: String,
    pub air_date: String,
    pub still_url: Option<String>,
    /// Empty when the provider has no id for this coordinate.
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct SeriesResolution {
    pub query: SeriesQuery,
    pub year_guess: Option<i32>,
    pub strategy: Option<SearchStrategy>,
    pub matched: ScoredCandidate,
    pub record: CatalogRecord,
    pub classification: String,
    pub episodes: Vec<EpisodeAggregate>,
}

#[derive(Debug, Clone)]
pub struct MovieResolution {
    pub query: MovieQuery,
    pub year_guess: Option<i32>,
    pub strategy: Option<SearchStrategy>,
    pub matched: ScoredCandidate,
    pub record: CatalogRecord,
    pub classification: String,
    pub stream_url: String,
}

struct Matched {
    year_guess: Option<i32>,
    strategy: Option<SearchStrategy>,
    best: ScoredCandidate,
    record: CatalogRecord,
}

pub struct Resolver {
    catalog: Arc<dyn CatalogProvider>,
    listings: Arc<dyn ListingSource>,
    options: ResolveOptions,
}

impl Resolver {
    pub fn new(
        catalog: Arc<dyn CatalogProvider>,
        listings: Arc<dyn ListingSource>,
        options: ResolveOptions,
    ) -> Self {
        Self {
            catalog,
            listings,
            options,
        }
    }

    pub async fn resolve_series(&self, query: &SeriesQuery) -> Result<SeriesResolution, ResolveError> {
        let matched = self.match_title(MediaKind::Series, &query.title).await?;
        let record = matched.record;

        let listing_url = self.listing_url(query);
        let fallback = self.options.fallback_connection.as_ref();
        let connection = listing_url
            .as_deref()
            .and_then(|url| extract_connection(url, fallback))
            .or_else(|| fallback.cloned());

        let season_numbers: Vec<u32> = record.seasons.iter().map(|s| s.season_number).collect();
        let (seasons, index) = tokio::join!(
            fetch_all_seasons(
                self.catalog.as_ref(),
                record.id,
                &season_numbers,
                &self.options.locales.primary,
            ),
            async {
                match listing_url.as_deref() {
                    Some(url) => build_index(self.listings.as_ref(), url).await,
                    None => ProviderEpisodeMap::new(),
                }
            }
        );

        let episodes = assemble_episodes(&seasons, &index, connection.as_ref());
        info!(
            tmdb_id = record.id,
            seasons = seasons.len(),
            episodes = episodes.len(),
            provider_ids = index.len(),
            "series resolved"
        );

        Ok(SeriesResolution {
            query: query.clone(),
            year_guess: matched.year_guess,
            strategy: matched.strategy,
            matched: matched.best,
            classification: record.classification(&self.options.classification_region),
            record,
            episodes,
        })
    }

    pub async fn resolve_movie(&self, query: &MovieQuery) -> Result<MovieResolution, ResolveError> {
        let matched = self.match_title(MediaKind::Movie, &query.title).await?;
        let record = matched.record;

        let stream_url = match query.stream_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => self
                .options
                .fallback_connection
                .as_ref()
                .map(|conn| movie_url(conn, Some(&query.stream_id)))
                .unwrap_or_default(),
        };

        info!(tmdb_id = record.id, "movie resolved");

        Ok(MovieResolution {
            query: query.clone(),
            year_guess: matched.year_guess,
            strategy: matched.strategy,
            matched: matched.best,
            classification: record.classification(&self.options.classification_region),
            record,
            stream_url,
        })
    }

    /// Search, score and fetch the winning record.
    async fn match_title(&self, kind: MediaKind, title: &str) -> Result<Matched, ResolveError> {
        let outcome =
            plan_and_search(self.catalog.as_ref(), kind, title, &self.options.locales).await;

        let Some(best) = pick_best(title, &outcome.candidates, outcome.plan.year) else {
            return Err(ResolveError::NoCandidate {
                query: title.to_string(),
                cleaned: outcome.plan.cleaned,
            });
        };
        debug!(
            id = best.candidate.id,
            name = %best.candidate.name,
            score = best.score,
            "best candidate"
        );

        let mut record = self
            .catalog
            .get_details(kind, best.candidate.id, &self.options.locales.primary)
            .await
            .map_err(ResolveError::Details)?;

        if record.genres.is_empty() && !best.candidate.genre_ids.is_empty() {
            record.genres = genres_from_ids(&best.candidate.genre_ids);
        }
        record.cast.truncate(self.options.cast_limit);

        Ok(Matched {
            year_guess: outcome.plan.year,
            strategy: outcome.strategy,
            best,
            record,
        })
    }

    fn listing_url(&self, query: &SeriesQuery) -> Option<String> {
        match query.listing_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => Some(url.to_string()),
            _ => self
                .options
                .fallback_connection
                .as_ref()
                .and_then(|conn| series_listing_url(conn, &query.series_id).ok()),
        }
    }
}

/// Join catalog episodes with provider ids, ordered by season then episode.
///
/// Each episode is filed under the season it was requested for. The first
/// occurrence of a coordinate wins.
pub fn assemble_episodes(
    seasons: &BTreeMap<u32, SeasonPayload>,
    index: &ProviderEpisodeMap,
    connection: Option<&ProviderConnection>,
) -> Vec<EpisodeAggregate> {
    let mut rows: BTreeMap<EpisodeKey, EpisodeAggregate> = BTreeMap::new();

    for (&season_number, payload) in seasons {
        for ep in &payload.episodes {
            let key = EpisodeKey::new(season_number, ep.episode_number);
            rows.entry(key).or_insert_with(|| EpisodeAggregate {
                season_number,
                episode_number: ep.episode_number,
                name: ep.name.clone(),
                overview: ep.overview.clone(),
                air_date: ep.air_date.clone(),
                still_url: ep.still_url.clone(),
                url: connection
                    .map(|conn| {
                        series_episode_url(conn, index.get(season_number, ep.episode_number))
                    })
                    .unwrap_or_default(),
            });
        }
    }

    rows.into_values().collect()
}
