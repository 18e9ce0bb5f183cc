//! In-memory catalog used by unit tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Barrier;

use vodlink_core::types::MediaKind;

use crate::provider::CatalogProvider;
use crate::{
    CatalogEpisode, CatalogRecord, MetadataError, SearchCandidate, SeasonPayload, SeasonSummary,
};

type SearchFn =
    dyn Fn(&str, &str, Option<i32>) -> Result<Vec<SearchCandidate>, MetadataError> + Send + Sync;

#[derive(Debug, Clone, PartialEq)]
pub struct SearchCall {
    pub query: String,
    pub locale: String,
    pub year: Option<i32>,
}

pub struct FakeCatalog {
    search_fn: Box<SearchFn>,
    details: HashMap<u64, CatalogRecord>,
    seasons: HashMap<u32, SeasonPayload>,
    failing_seasons: Vec<u32>,
    season_gate: Option<Arc<Barrier>>,
    search_log: Mutex<Vec<SearchCall>>,
    season_log: Mutex<Vec<u32>>,
}

impl FakeCatalog {
    pub fn new(
        search: impl Fn(&str, &str, Option<i32>) -> Result<Vec<SearchCandidate>, MetadataError>
        + Send
        + Sync
        + 'static,
    ) -> Self {
        Self {
            search_fn: Box::new(search),
            details: HashMap::new(),
            seasons: HashMap::new(),
            failing_seasons: Vec::new(),
            season_gate: None,
            search_log: Mutex::new(Vec::new()),
            season_log: Mutex::new(Vec::new()),
        }
    }

    pub fn with_details(mut self, record: CatalogRecord) -> Self {
        self.details.insert(record.id, record);
        self
    }

    pub fn with_season(mut self, payload: SeasonPayload) -> Self {
        self.seasons.insert(payload.season_number, payload);
        self
    }

    pub fn failing_season(mut self, season_number: u32) -> Self {
        self.failing_seasons.push(season_number);
        self
    }

    /// Every season request waits on `gate` before answering.
    pub fn gated_seasons(mut self, gate: Arc<Barrier>) -> Self {
        self.season_gate = Some(gate);
        self
    }

    pub fn searches(&self) -> Vec<SearchCall> {
        self.search_log.lock().unwrap().clone()
    }

    pub fn season_requests(&self) -> Vec<u32> {
        let mut log = self.season_log.lock().unwrap().clone();
        log.sort_unstable();
        log
    }
}

#[async_trait::async_trait]
impl CatalogProvider for FakeCatalog {
    fn name(&self) -> &str {
        "fake"
    }

    async fn search(
        &self,
        _kind: MediaKind,
        query: &str,
        locale: &str,
        year: Option<i32>,
    ) -> Result<Vec<SearchCandidate>, MetadataError> {
        self.search_log.lock().unwrap().push(SearchCall {
            query: query.to_string(),
            locale: locale.to_string(),
            year,
        });
        (self.search_fn)(query, locale, year)
    }

    async fn get_details(
        &self,
        _kind: MediaKind,
        id: u64,
        _locale: &str,
    ) -> Result<CatalogRecord, MetadataError> {
        self.details.get(&id).cloned().ok_or(MetadataError::NotFound)
    }

    async fn get_season(
        &self,
        _series_id: u64,
        season_number: u32,
        _locale: &str,
    ) -> Result<SeasonPayload, MetadataError> {
        self.season_log.lock().unwrap().push(season_number);
        match &self.season_gate {
            Some(gate) => {
                gate.wait().await;
            }
            None => tokio::task::yield_now().await,
        }
        if self.failing_seasons.contains(&season_number) {
            return Err(MetadataError::Provider("TMDB returned 500".into()));
        }
        self.seasons
            .get(&season_number)
            .cloned()
            .ok_or(MetadataError::NotFound)
    }
}

pub fn candidate(id: u64, name: &str, popularity: f64, date: &str) -> SearchCandidate {
    SearchCandidate {
        id,
        name: name.to_string(),
        original_name: name.to_string(),
        popularity,
        date: date.to_string(),
        genre_ids: Vec::new(),
    }
}

pub fn series_record(id: u64, name: &str, season_numbers: &[u32]) -> CatalogRecord {
    CatalogRecord {
        id,
        kind: MediaKind::Series,
        title: name.to_string(),
        original_title: name.to_string(),
        overview: Some(format!("{name} overview")),
        vote_average: 8.0,
        vote_count: 100,
        popularity: 50.0,
        release_date: "2017-12-01".to_string(),
        runtime_minutes: None,
        number_of_seasons: season_numbers.iter().filter(|n| **n > 0).count() as u32,
        number_of_episodes: 0,
        genres: Vec::new(),
        cast: Vec::new(),
        seasons: season_numbers
            .iter()
            .map(|&n| SeasonSummary {
                season_number: n,
                name: format!("Temporada {n}"),
                episode_count: 2,
                poster_url: None,
            })
            .collect(),
        certifications: Vec::new(),
        trailer_key: None,
        poster_url: None,
        backdrop_url: None,
    }
}

/// Season `n` with episodes numbered `1..=count`, listed in reverse.
pub fn season(n: u32, count: u32) -> SeasonPayload {
    SeasonPayload {
        season_number: n,
        episodes: (1..=count)
            .rev()
            .map(|e| CatalogEpisode {
                episode_number: e,
                name: format!("S{n}E{e}"),
                overview: format!("Episode {e} of season {n}"),
                air_date: format!("2017-12-{:02}", e),
                still_url: None,
            })
            .collect(),
    }
}
