use vodlink_core::types::MediaKind;

use crate::{CatalogRecord, MetadataError, SearchCandidate, SeasonPayload};

/// A media catalog that can search titles and return full records.
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    fn name(&self) -> &str;

    /// Search movies or series by free text, optionally biased by year.
    async fn search(
        &self,
        kind: MediaKind,
        query: &str,
        locale: &str,
        year: Option<i32>,
    ) -> Result<Vec<SearchCandidate>, MetadataError>;

    /// Full record with cast, trailers and classifications attached.
    async fn get_details(
        &self,
        kind: MediaKind,
        id: u64,
        locale: &str,
    ) -> Result<CatalogRecord, MetadataError>;

    /// Episode list for one season of a series.
    async fn get_season(
        &self,
        series_id: u64,
        season_number: u32,
        locale: &str,
    ) -> Result<SeasonPayload, MetadataError>;
}
