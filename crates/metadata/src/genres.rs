//! Fallback genre labels for when a details record comes back without
//! genres but the search hit carried `genre_ids`.

use crate::Genre;

const UNKNOWN: &str = "Desconhecido";

static GENRE_NAMES: &[(u32, &str)] = &[
    // TV
    (10759, "Ação & Aventura"),
    (16, "Animação"),
    (35, "Comédia"),
    (80, "Crime"),
    (99, "Documentário"),
    (18, "Drama"),
    (10751, "Família"),
    (10762, "Infantil"),
    (9648, "Mistério"),
    (10763, "Notícias"),
    (10764, "Reality"),
    (10765, "Ficção Científica & Fantasia"),
    (10766, "Soap"),
    (10767, "Talk"),
    (10768, "Guerra & Política"),
    (37, "Faroeste"),
    // Movie-only ids
    (28, "Ação"),
    (12, "Aventura"),
    (14, "Fantasia"),
    (36, "História"),
    (27, "Terror"),
    (10402, "Música"),
    (10749, "Romance"),
    (878, "Ficção científica"),
    (10770, "Cinema TV"),
    (53, "Thriller"),
    (10752, "Guerra"),
];

pub fn genre_name(id: u32) -> &'static str {
    GENRE_NAMES
        .iter()
        .find(|(gid, _)| *gid == id)
        .map(|(_, name)| *name)
        .unwrap_or(UNKNOWN)
}

pub fn genres_from_ids(ids: &[u32]) -> Vec<Genre> {
    ids.iter()
        .map(|&id| Genre {
            id,
            name: genre_name(id).to_string(),
        })
        .collect()
}
