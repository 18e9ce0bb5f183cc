//! Output documents handed back to IPTV front-ends.
//!
//! Field names are the wire contract those players already consume.

use serde::Serialize;
use vodlink_metadata::resolve::{EpisodeAggregate, MovieResolution, SeriesResolution};
use vodlink_metadata::{CastMember, CatalogRecord};

const MISSING_OVERVIEW: &str = "Descrição não disponível";

#[derive(Debug, Serialize)]
pub struct CastEntry {
    pub name: String,
    #[serde(rename = "foto")]
    pub photo: String,
}

#[derive(Debug, Serialize)]
pub struct SeriesInfo {
    pub iptv_series_id: String,
    pub iptv_category_id: String,
    pub iptv_name: String,
    pub iptv_poster: String,
    #[serde(rename = "titulo_usado")]
    pub query_title: String,
    pub tmdb_id: u64,
    pub tmdb_name: String,
    pub tmdb_first_air_date: String,
    pub tmdb_popularity: f64,
    pub tmdb_vote_count: u64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "titulo_original")]
    pub original_title: String,
    #[serde(rename = "sinopse")]
    pub overview: String,
    #[serde(rename = "nota")]
    pub rating: f64,
    #[serde(rename = "lancamento")]
    pub first_air_date: String,
    #[serde(rename = "numero_temporadas")]
    pub season_count: u32,
    #[serde(rename = "numero_episodios")]
    pub episode_count: u32,
    #[serde(rename = "classificacao_indicativa")]
    pub classification: String,
    pub poster: String,
    pub backdrop: String,
    pub trailer: String,
    /// Comma-joined genre names.
    #[serde(rename = "generos")]
    pub genres: String,
    #[serde(rename = "elenco")]
    pub cast: Vec<CastEntry>,
}

#[derive(Debug, Serialize)]
pub struct SeasonRow {
    pub season_number: u32,
    pub name: String,
    #[serde(rename = "episodios_count")]
    pub episode_count: u32,
    pub poster: String,
}

#[derive(Debug, Serialize)]
pub struct EpisodeRow {
    pub season_number: u32,
    pub episode_number: u32,
    pub name: String,
    pub overview: String,
    pub air_date: String,
    pub still_path: String,
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct SeriesDocument {
    #[serde(rename = "serie")]
    pub series: SeriesInfo,
    #[serde(rename = "temporadas")]
    pub seasons: Vec<SeasonRow>,
    #[serde(rename = "episodios")]
    pub episodes: Vec<EpisodeRow>,
}

#[derive(Debug, Serialize)]
pub struct GenreEntry {
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct MovieDocument {
    pub iptv_stream_id: String,
    pub iptv_category_id: String,
    pub iptv_name: String,
    pub iptv_poster: String,
    pub iptv_stream_url: String,
    #[serde(rename = "titulo_usado")]
    pub query_title: String,
    #[serde(rename = "ano_usado")]
    pub year_guess: Option<i32>,
    pub tmdb_id: u64,
    pub tmdb_title: String,
    pub tmdb_release_date: String,
    pub tmdb_popularity: f64,
    pub tmdb_vote_count: u64,
    #[serde(rename = "titulo")]
    pub title: String,
    #[serde(rename = "titulo_original")]
    pub original_title: String,
    #[serde(rename = "sinopse")]
    pub overview: String,
    #[serde(rename = "nota")]
    pub rating: f64,
    #[serde(rename = "lancamento")]
    pub release_date: String,
    #[serde(rename = "duracao")]
    pub runtime_minutes: u32,
    #[serde(rename = "duracao_formatada")]
    pub runtime_label: String,
    #[serde(rename = "classificacao_indicativa")]
    pub classification: String,
    pub poster: String,
    pub backdrop: String,
    pub trailer: String,
    #[serde(rename = "generos")]
    pub genres: Vec<GenreEntry>,
    #[serde(rename = "elenco")]
    pub cast: Vec<CastEntry>,
}

/// `148` -> `"2h 28min"`, `45` -> `"45min"`, `120` -> `"2h 0min"`.
pub fn format_runtime(minutes: u32) -> String {
    if minutes == 0 {
        return "0min".to_string();
    }
    let (h, m) = (minutes / 60, minutes % 60);
    match (h, m) {
        (0, m) => format!("{m}min"),
        (h, m) => format!("{h}h {m}min"),
    }
}

fn overview(record: &CatalogRecord) -> String {
    record
        .overview
        .clone()
        .unwrap_or_else(|| MISSING_OVERVIEW.to_string())
}

fn cast_entries(cast: &[CastMember]) -> Vec<CastEntry> {
    cast.iter()
        .map(|c| CastEntry {
            name: c.name.clone(),
            photo: c.photo_url.clone().unwrap_or_default(),
        })
        .collect()
}

fn episode_row(ep: &EpisodeAggregate) -> EpisodeRow {
    EpisodeRow {
        season_number: ep.season_number,
        episode_number: ep.episode_number,
        name: ep.name.clone(),
        overview: ep.overview.clone(),
        air_date: ep.air_date.clone(),
        still_path: ep.still_url.clone().unwrap_or_default(),
        url: ep.url.clone(),
    }
}

pub fn series_document(res: &SeriesResolution) -> SeriesDocument {
    let record = &res.record;
    let query = &res.query;

    SeriesDocument {
        series: SeriesInfo {
            iptv_series_id: query.series_id.clone(),
            iptv_category_id: query.category_id.clone(),
            iptv_name: query.title.clone(),
            iptv_poster: query.poster_url.clone().unwrap_or_default(),
            query_title: query.title.clone(),
            tmdb_id: record.id,
            tmdb_name: record.title.clone(),
            tmdb_first_air_date: record.release_date.clone(),
            tmdb_popularity: record.popularity,
            tmdb_vote_count: record.vote_count,
            title: record.title.clone(),
            original_title: record.original_title.clone(),
            overview: overview(record),
            rating: record.vote_average,
            first_air_date: record.release_date.clone(),
            season_count: record.number_of_seasons,
            episode_count: record.number_of_episodes,
            classification: res.classification.clone(),
            poster: record.poster_url.clone().unwrap_or_default(),
            backdrop: record.backdrop_url.clone().unwrap_or_default(),
            trailer: record.trailer_url().unwrap_or_default(),
            genres: record
                .genres
                .iter()
                .map(|g| g.name.as_str())
                .filter(|n| !n.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
            cast: cast_entries(&record.cast),
        },
        seasons: record
            .seasons
            .iter()
            .map(|s| SeasonRow {
                season_number: s.season_number,
                name: s.name.clone(),
                episode_count: s.episode_count,
                poster: s.poster_url.clone().unwrap_or_default(),
            })
            .collect(),
        episodes: res.episodes.iter().map(episode_row).collect(),
    }
}

pub fn movie_document(res: &MovieResolution) -> MovieDocument {
    let record = &res.record;
    let query = &res.query;
    let runtime = record.runtime_minutes.unwrap_or(0);

    MovieDocument {
        iptv_stream_id: query.stream_id.clone(),
        iptv_category_id: query.category_id.clone(),
        iptv_name: query.title.clone(),
        iptv_poster: query.poster_url.clone().unwrap_or_default(),
        iptv_stream_url: res.stream_url.clone(),
        query_title: query.title.clone(),
        year_guess: res.year_guess,
        tmdb_id: record.id,
        tmdb_title: record.title.clone(),
        tmdb_release_date: record.release_date.clone(),
        tmdb_popularity: record.popularity,
        tmdb_vote_count: record.vote_count,
        title: record.title.clone(),
        original_title: record.original_title.clone(),
        overview: overview(record),
        rating: record.vote_average,
        release_date: record.release_date.clone(),
        runtime_minutes: runtime,
        runtime_label: format_runtime(runtime),
        classification: res.classification.clone(),
        poster: record.poster_url.clone().unwrap_or_default(),
        backdrop: record.backdrop_url.clone().unwrap_or_default(),
        trailer: record.trailer_url().unwrap_or_default(),
        genres: record
            .genres
            .iter()
            .map(|g| GenreEntry {
                name: g.name.clone(),
            })
            .collect(),
        cast: cast_entries(&record.cast),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_labels() {
        assert_eq!(format_runtime(0), "0min");
        assert_eq!(format_runtime(45), "45min");
        assert_eq!(format_runtime(148), "2h 28min");
        assert_eq!(format_runtime(120), "2h 0min");
    }
}
