#![allow(clippy::type_complexity)]
pub mod genres;
pub mod plan;
pub mod provider;
pub mod resolve;
pub mod score;
pub mod seasons;
pub mod title;
pub mod tmdb;

#[cfg(test)]
pub(crate) mod testing;

use thiserror::Error;
use vodlink_core::types::MediaKind;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("not found")]
    NotFound,
}

/// One result row of a catalog search.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SearchCandidate {
    pub id: u64,
    /// Localized display name (`name` for TV, `title` for movies).
    pub name: String,
    pub original_name: String,
    pub popularity: f64,
    /// First air date or release date, ISO `YYYY-MM-DD` or empty.
    pub date: String,
    pub genre_ids: Vec<u32>,
}

impl SearchCandidate {
    /// Year of `date`, if it starts with a positive 4-digit year.
    pub fn year(&self) -> Option<i32> {
        date_year(&self.date)
    }
}

pub(crate) fn date_year(date: &str) -> Option<i32> {
    date.get(..4)
        .and_then(|y| y.parse::<i32>().ok())
        .filter(|y| *y > 0)
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Genre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CastMember {
    pub name: String,
    pub photo_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SeasonSummary {
    pub season_number: u32,
    pub name: String,
    pub episode_count: u32,
    pub poster_url: Option<String>,
}

/// A rating issued for one region. Movies may carry several per region.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Certification {
    pub region: String,
    pub rating: String,
}

/// Full catalog record for the chosen candidate.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CatalogRecord {
    pub id: u64,
    pub kind: MediaKind,
    pub title: String,
    pub original_title: String,
    pub overview: Option<String>,
    pub vote_average: f64,
    pub vote_count: u64,
    pub popularity: f64,
    /// First air date (series) or release date (movies).
    pub release_date: String,
    /// Movies only.
    pub runtime_minutes: Option<u32>,
    pub number_of_seasons: u32,
    pub number_of_episodes: u32,
    pub genres: Vec<Genre>,
    pub cast: Vec<CastMember>,
    /// Series only.
    pub seasons: Vec<SeasonSummary>,
    pub certifications: Vec<Certification>,
    pub trailer_key: Option<String>,
    pub poster_url: Option<String>,
    pub backdrop_url: Option<String>,
}

impl CatalogRecord {
    /// Content classification for `region`.
    ///
    /// Series take the region's rating or else the first listed one.
    /// Movies take the first non-empty certification for the region, then
    /// for the US, then for any region.
    pub fn classification(&self, region: &str) -> String {
        match self.kind {
            MediaKind::Series => self
                .certifications
                .iter()
                .find(|c| c.region == region)
                .or_else(|| self.certifications.first())
                .map(|c| c.rating.clone())
                .unwrap_or_default(),
            MediaKind::Movie => {
                let non_empty = |c: &&Certification| !c.rating.trim().is_empty();
                self.certifications
                    .iter()
                    .filter(non_empty)
                    .find(|c| c.region == region)
                    .or_else(|| {
                        self.certifications
                            .iter()
                            .filter(non_empty)
                            .find(|c| c.region == "US")
                    })
                    .or_else(|| self.certifications.iter().find(non_empty))
                    .map(|c| c.rating.clone())
                    .unwrap_or_default()
            }
        }
    }

    pub fn trailer_url(&self) -> Option<String> {
        self.trailer_key
            .as_ref()
            .map(|key| format!("https://www.youtube.com/watch?v={key}"))
    }

    pub fn year(&self) -> Option<i32> {
        date_year(&self.release_date)
    }
}

/// One episode as listed by the catalog's season endpoint.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CatalogEpisode {
    pub episode_number: u32,
    pub name: String,
    pub overview: String,
    pub air_date: String,
    pub still_url: Option<String>,
}

/// Episodes of one season. Empty when the season could not be fetched.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SeasonPayload {
    pub season_number: u32,
    pub episodes: Vec<CatalogEpisode>,
}

impl SeasonPayload {
    pub fn empty(season_number: u32) -> Self {
        Self {
            season_number,
            episodes: Vec::new(),
        }
    }
}
