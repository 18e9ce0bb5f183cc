//! Title canonicalization for provider catalog entries.
//!
//! `normalize` feeds similarity scoring only; `clean_query` builds the
//! alternate text sent to the catalog search.

use std::sync::LazyLock;

use chrono::Datelike;
use regex::Regex;

/// Articles, prepositions and conjunctions (pt + en) dropped before comparison.
static STOPWORDS: &[&str] = &[
    "a", "o", "os", "as", "de", "da", "do", "das", "dos", "the", "and", "e", "um", "uma", "para",
    "por", "com", "sem", "em", "na", "no", "nos", "nas",
];

// (...), [...], {...}
static RE_BRACKETED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\(\[\{][^\)\]\}]*[\)\]\}]").unwrap());

// "Dark Temporada 2 ..." -> "Dark"
static RE_SEASON_TAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(temporada|season)\b.*$").unwrap());

// Release noise: dub/sub markers, resolutions, S01E02 codes
static RE_RELEASE_NOISE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(temporada|season|dublado|legendado|dual|nacional|original|completo|torrent|1080p|720p|4k|s\d{1,2}e?\d{0,2})\b",
    )
    .unwrap()
});

static RE_WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

static RE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(?:19|20)\d{2}\b").unwrap());

/// Canonical comparison form: ASCII-folded, lower-case, punctuation and
/// stopwords removed, single-spaced.
pub fn normalize(text: &str) -> String {
    let folded = transliterate(&text.to_lowercase()).to_lowercase();

    let stripped: String = folded
        .chars()
        .map(|c| match c {
            '&' | '+' => ' ',
            c if c.is_alphanumeric() || c.is_whitespace() => c,
            _ => ' ',
        })
        .collect();

    stripped
        .split_whitespace()
        .filter(|t| !STOPWORDS.contains(t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Best-effort ASCII folding. Characters with no transliteration are kept.
fn transliterate(text: &str) -> String {
    text.chars()
        .map(|c| match deunicode::deunicode_char(c) {
            Some(ascii) => ascii.to_string(),
            None => c.to_string(),
        })
        .collect()
}

/// Search form of a provider title: bracketed segments, season tails and
/// release tags removed.
pub fn clean_query(text: &str) -> String {
    let t = RE_BRACKETED.replace_all(text.trim(), " ");
    let t = RE_SEASON_TAIL.replace(&t, " ");
    let t = RE_RELEASE_NOISE.replace_all(&t, " ");
    let t = RE_WHITESPACE.replace_all(&t, " ");
    t.trim()
        .trim_end_matches(|c: char| c.is_whitespace() || matches!(c, '-' | ':' | '|'))
        .to_string()
}

/// First standalone 19xx/20xx token, if it is a plausible release year.
pub fn guess_year(text: &str) -> Option<i32> {
    guess_year_before(text, chrono::Utc::now().year() + 1)
}

fn guess_year_before(text: &str, max_year: i32) -> Option<i32> {
    let year: i32 = RE_YEAR.find(text)?.as_str().parse().ok()?;
    (1900..=max_year).contains(&year).then_some(year)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_folds_accents_and_stopwords() {
        assert_eq!(normalize("A Casa de Papel"), "casa papel");
        assert_eq!(normalize("Coração & Alma"), "coracao alma");
        assert_eq!(normalize("The Walking Dead: World Beyond"), "walking dead world beyond");
    }

    #[test]
    fn normalize_replaces_symbols_with_spaces() {
        assert_eq!(normalize("Law+Order"), "law order");
        assert_eq!(normalize("Spider-Man: No Way Home!"), "spider man way home");
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in [
            "Dark (2017)",
            "Élite [Dublado] S01E02",
            "Ção  &  Ñandú",
            "Pokémon: Os Filmes",
            "  ",
            "東京喰種",
            "\u{A7CB}ata",
            "x\u{A7D2}y \u{A7D4}\u{A7D4}",
            "\u{A7DC} Rising",
        ] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once, "input {s:?}");
        }
    }

    #[test]
    fn clean_query_strips_brackets() {
        assert_eq!(clean_query("Dark (2017)"), "Dark");
        assert_eq!(clean_query("Breaking Bad [4K] {HDR}"), "Breaking Bad");
        assert_eq!(guess_year("Dark (2017)"), Some(2017));
    }

    #[test]
    fn clean_query_removes_release_noise() {
        assert_eq!(clean_query("The Boys Dublado 1080p"), "The Boys");
        assert_eq!(clean_query("Vikings S01E02 Legendado"), "Vikings");
        assert_eq!(clean_query("Lupin DUAL 4K"), "Lupin");
    }

    #[test]
    fn clean_query_truncates_at_season_marker() {
        assert_eq!(clean_query("Dark Temporada 2 Completa"), "Dark");
        assert_eq!(clean_query("Stranger Things - Season 4"), "Stranger Things");
    }

    #[test]
    fn clean_query_leaves_plain_titles_alone() {
        assert_eq!(clean_query("Dark"), "Dark");
        assert_eq!(clean_query("  Two   Spaces "), "Two Spaces");
    }

    #[test]
    fn guess_year_bounds() {
        assert_eq!(guess_year_before("Blade Runner 2049", 2026), None);
        assert_eq!(guess_year_before("Dune 2021", 2026), Some(2021));
        assert_eq!(guess_year_before("Dune 2027", 2026), None);
        assert_eq!(guess_year_before("Series 12345", 2026), None);
        assert_eq!(guess_year_before("1899", 2026), None);
    }

    #[test]
    fn guess_year_only_looks_at_first_token() {
        assert_eq!(guess_year_before("2099 then 2010", 2026), None);
        assert_eq!(guess_year_before("Cobra Kai 2018 2020", 2026), Some(2018));
    }
}
