//! Ordered fallback search.
//!
//! A title is tried against the catalog as a fixed priority list of
//! (locale, raw/cleaned text, with/without year) descriptors. Attempts run
//! one at a time and the first one that returns any candidate wins.

use tracing::{debug, info, warn};
use vodlink_core::types::MediaKind;

use crate::SearchCandidate;
use crate::provider::CatalogProvider;
use crate::title::{clean_query, guess_year};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locales {
    pub primary: String,
    pub fallback: String,
}

impl Default for Locales {
    fn default() -> Self {
        Self {
            primary: "pt-BR".to_string(),
            fallback: "en-US".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LocaleSlot {
    Primary,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryForm {
    Raw,
    Cleaned,
}

/// (locale, text form, send guessed year)
const PRIORITY: [(LocaleSlot, QueryForm, bool); 6] = [
    (LocaleSlot::Primary, QueryForm::Raw, true),
    (LocaleSlot::Fallback, QueryForm::Raw, true),
    (LocaleSlot::Primary, QueryForm::Cleaned, true),
    (LocaleSlot::Fallback, QueryForm::Cleaned, true),
    (LocaleSlot::Primary, QueryForm::Cleaned, false),
    (LocaleSlot::Fallback, QueryForm::Cleaned, false),
];

/// One planned catalog search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStrategy {
    /// 1-based position in the priority list.
    pub rank: usize,
    pub locale: String,
    pub form: QueryForm,
    pub query: String,
    pub year: Option<i32>,
}

/// Everything derived from the raw title before any request is made.
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub raw: String,
    pub cleaned: String,
    pub year: Option<i32>,
    locales: Locales,
}

impl QueryPlan {
    pub fn new(title: &str, locales: &Locales) -> Self {
        Self {
            raw: title.to_string(),
            cleaned: clean_query(title),
            year: guess_year(title),
            locales: locales.clone(),
        }
    }

    /// Applicable strategies in priority order, built on demand.
    ///
    /// Cleaned-text attempts with the year only exist when cleaning changed
    /// the title; year-less attempts only exist when a year was guessed.
    pub fn strategies(&self) -> impl Iterator<Item = SearchStrategy> + '_ {
        PRIORITY
            .iter()
            .enumerate()
            .filter(|(_, (_, form, with_year))| match (form, with_year) {
                (QueryForm::Raw, _) => true,
                (QueryForm::Cleaned, true) => self.cleaned != self.raw,
                (QueryForm::Cleaned, false) => self.year.is_some(),
            })
            .map(|(pos, (slot, form, with_year))| SearchStrategy {
                rank: pos + 1,
                locale: match slot {
                    LocaleSlot::Primary => self.locales.primary.clone(),
                    LocaleSlot::Fallback => self.locales.fallback.clone(),
                },
                form: *form,
                query: match form {
                    QueryForm::Raw => self.raw.clone(),
                    QueryForm::Cleaned => self.cleaned.clone(),
                },
                year: if *with_year { self.year } else { None },
            })
            .filter(|s| !s.query.trim().is_empty())
    }
}

/// Result of running a plan.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub plan: QueryPlan,
    /// The winning strategy, or the last one tried when nothing matched.
    pub strategy: Option<SearchStrategy>,
    pub candidates: Vec<SearchCandidate>,
    pub attempts: usize,
}

impl SearchOutcome {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Run the plan for `title`, stopping at the first non-empty response.
///
/// A failed attempt counts as an empty one.
pub async fn plan_and_search(
    catalog: &dyn CatalogProvider,
    kind: MediaKind,
    title: &str,
    locales: &Locales,
) -> SearchOutcome {
    let plan = QueryPlan::new(title, locales);
    let mut last = None;
    let mut found = None;
    let mut attempts = 0;

    for strategy in plan.strategies() {
        attempts += 1;
        debug!(
            rank = strategy.rank,
            query = %strategy.query,
            locale = %strategy.locale,
            year = ?strategy.year,
            "catalog search attempt"
        );

        let candidates = match catalog
            .search(kind, &strategy.query, &strategy.locale, strategy.year)
            .await
        {
            Ok(c) => c,
            Err(e) => {
                warn!(rank = strategy.rank, error = %e, "catalog search failed");
                Vec::new()
            }
        };

        if !candidates.is_empty() {
            found = Some((strategy, candidates));
            break;
        }
        last = Some(strategy);
    }

    match found {
        Some((strategy, candidates)) => {
            info!(
                rank = strategy.rank,
                hits = candidates.len(),
                query = %strategy.query,
                "catalog search matched"
            );
            SearchOutcome {
                plan,
                strategy: Some(strategy),
                candidates,
                attempts,
            }
        }
        None => {
            info!(title = %title, attempts, "no catalog candidates");
            SearchOutcome {
                plan,
                strategy: last,
                candidates: Vec::new(),
                attempts,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeCatalog, candidate};

    fn ranks(title: &str) -> Vec<usize> {
        QueryPlan::new(title, &Locales::default())
            .strategies()
            .map(|s| s.rank)
            .collect()
    }

    #[test]
    fn plain_title_only_tries_raw_in_both_locales() {
        assert_eq!(ranks("Dark"), vec![1, 2]);
    }

    #[test]
    fn decorated_title_without_year_skips_yearless_attempts() {
        assert_eq!(ranks("Dark [Dublado]"), vec![1, 2, 3, 4]);
    }

    #[test]
    fn year_in_brackets_enables_all_six() {
        let plan = QueryPlan::new("Dark (2017)", &Locales::default());
        let all: Vec<_> = plan.strategies().collect();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0].query, "Dark (2017)");
        assert_eq!(all[0].year, Some(2017));
        assert_eq!(all[1].locale, "en-US");
        assert_eq!(all[2].query, "Dark");
        assert_eq!(all[2].year, Some(2017));
        assert_eq!(all[4].query, "Dark");
        assert_eq!(all[4].year, None);
        assert_eq!(all[5].locale, "en-US");
    }

    #[test]
    fn undecorated_title_with_year_skips_cleaned_year_attempts() {
        assert_eq!(ranks("Dune 2021"), vec![1, 2, 5, 6]);
    }

    #[tokio::test]
    async fn first_non_empty_response_wins() {
        let catalog = FakeCatalog::new(|query, locale, _year| {
            if query == "Dark" && locale == "pt-BR" {
                Ok(vec![candidate(1, "Dark", 10.0, "2017-12-01")])
            } else {
                Ok(vec![])
            }
        });

        let outcome =
            plan_and_search(&catalog, MediaKind::Series, "Dark [4K]", &Locales::default()).await;
        assert_eq!(outcome.candidates.len(), 1);
        assert_eq!(outcome.strategy.as_ref().unwrap().rank, 3);
        assert_eq!(outcome.attempts, 3);
        assert_eq!(catalog.searches().len(), 3);
    }

    #[tokio::test]
    async fn failed_attempts_fall_through() {
        let catalog = FakeCatalog::new(|_query, locale, _year| {
            if locale == "en-US" {
                Ok(vec![candidate(1, "Dark", 10.0, "")])
            } else {
                Err(crate::MetadataError::Network("timed out".into()))
            }
        });

        let outcome =
            plan_and_search(&catalog, MediaKind::Series, "Dark", &Locales::default()).await;
        assert_eq!(outcome.strategy.as_ref().unwrap().rank, 2);
        assert!(!outcome.is_empty());
    }

    #[tokio::test]
    async fn exhausted_plan_reports_last_attempt() {
        let catalog = FakeCatalog::new(|_, _, _| Ok(vec![]));

        let outcome = plan_and_search(
            &catalog,
            MediaKind::Series,
            "Nada Temporada 1 (2099)",
            &Locales::default(),
        )
        .await;
        assert!(outcome.is_empty());
        assert_eq!(outcome.attempts, 4);
        assert_eq!(outcome.plan.cleaned, "Nada");
        let last = outcome.strategy.unwrap();
        assert_eq!(last.rank, 4);
        assert_eq!(last.query, "Nada");

        let calls = catalog.searches();
        assert_eq!(calls[0].query, "Nada Temporada 1 (2099)");
        assert!(calls.iter().all(|c| c.year.is_none()));
    }
}
