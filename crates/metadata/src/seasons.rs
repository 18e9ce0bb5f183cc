use std::collections::{BTreeMap, BTreeSet};

use futures::future::join_all;
use tracing::{debug, warn};

use crate::SeasonPayload;
use crate::provider::CatalogProvider;

/// Fetch every regular season of a series concurrently.
///
/// Season 0 (specials) is skipped and duplicates are requested once. A
/// season that fails comes back as an empty payload under its own key, so
/// the map always has one entry per requested season.
pub async fn fetch_all_seasons(
    catalog: &dyn CatalogProvider,
    series_id: u64,
    season_numbers: &[u32],
    locale: &str,
) -> BTreeMap<u32, SeasonPayload> {
    let wanted: BTreeSet<u32> = season_numbers.iter().copied().filter(|n| *n > 0).collect();

    let requests = wanted.into_iter().map(move |season_number| async move {
        match catalog.get_season(series_id, season_number, locale).await {
            Ok(mut payload) => {
                payload.season_number = season_number;
                debug!(
                    series_id,
                    season_number,
                    episodes = payload.episodes.len(),
                    "season fetched"
                );
                (season_number, payload)
            }
            Err(e) => {
                warn!(series_id, season_number, error = %e, "season fetch failed");
                (season_number, SeasonPayload::empty(season_number))
            }
        }
    });

    join_all(requests).await.into_iter().collect()
}
