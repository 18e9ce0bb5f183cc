use url::Url;

use crate::{ProviderConnection, XtreamError};

/// Pull domain, username and password out of a provider listing URL
/// (`http://host:port/player_api.php?username=..&password=..`).
///
/// Parts the URL does not carry are taken from `fallback`. Returns `None`
/// when the URL cannot be parsed and no fallback is configured.
pub fn extract_connection(
    listing_url: &str,
    fallback: Option<&ProviderConnection>,
) -> Option<ProviderConnection> {
    let parsed = match Url::parse(listing_url.trim()) {
        Ok(u) if u.host_str().is_some() => u,
        _ => return fallback.cloned(),
    };

    let mut conn = fallback.cloned().unwrap_or(ProviderConnection {
        domain: String::new(),
        username: String::new(),
        password: String::new(),
    });

    if let Some(host) = parsed.host_str() {
        conn.domain = match parsed.port() {
            Some(port) => format!("{}://{host}:{port}", parsed.scheme()),
            None => format!("{}://{host}", parsed.scheme()),
        };
    }

    for (key, value) in parsed.query_pairs() {
        if value.is_empty() {
            continue;
        }
        match key.as_ref() {
            "username" => conn.username = value.into_owned(),
            "password" => conn.password = value.into_owned(),
            _ => {}
        }
    }

    Some(conn)
}

/// Build the `get_series_info` listing URL for a series on `conn`.
pub fn series_listing_url(
    conn: &ProviderConnection,
    series_id: &str,
) -> Result<String, XtreamError> {
    let base = format!("{}/player_api.php", conn.domain.trim_end_matches('/'));
    let url = Url::parse_with_params(
        &base,
        &[
            ("username", conn.username.as_str()),
            ("password", conn.password.as_str()),
            ("action", "get_series_info"),
            ("series_id", series_id),
        ],
    )
    .map_err(|e| XtreamError::InvalidUrl(format!("{base}: {e}")))?;
    Ok(url.into())
}
