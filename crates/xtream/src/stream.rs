use vodlink_core::types::MediaKind;

use crate::ProviderConnection;

/// Playback URL for a provider item:
/// `{domain}/{series|movie}/{username}/{password}/{id}.mp4`.
///
/// An absent or blank id yields an empty string.
pub fn synthesize(conn: &ProviderConnection, kind: MediaKind, id: Option<&str>) -> String {
    let Some(id) = id.map(str::trim).filter(|id| !id.is_empty()) else {
        return String::new();
    };
    format!(
        "{}/{}/{}/{}/{id}.mp4",
        conn.domain.trim_end_matches('/'),
        kind.stream_segment(),
        conn.username,
        conn.password,
    )
}

pub fn series_episode_url(conn: &ProviderConnection, episode_id: Option<&str>) -> String {
    synthesize(conn, MediaKind::Series, episode_id)
}

pub fn movie_url(conn: &ProviderConnection, stream_id: Option<&str>) -> String {
    synthesize(conn, MediaKind::Movie, stream_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conn() -> ProviderConnection {
        ProviderConnection {
            domain: "http://h".into(),
            username: "u".into(),
            password: "p".into(),
        }
    }

    #[test]
    fn series_url() {
        assert_eq!(series_episode_url(&conn(), Some("99")), "http://h/series/u/p/99.mp4");
    }

    #[test]
    fn movie_url_uses_movie_segment() {
        assert_eq!(movie_url(&conn(), Some("5150")), "http://h/movie/u/p/5150.mp4");
    }

    #[test]
    fn missing_id_is_empty() {
        assert_eq!(series_episode_url(&conn(), None), "");
        assert_eq!(series_episode_url(&conn(), Some("  ")), "");
    }

    #[test]
    fn trailing_slash_on_domain_is_ignored() {
        let mut c = conn();
        c.domain = "http://h/".into();
        assert_eq!(series_episode_url(&c, Some("1")), "http://h/series/u/p/1.mp4");
    }
}
