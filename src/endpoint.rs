use url::Url;

use crate::error::{Error, Result};

const SCHEMES: [&str; 2] = ["https://", "http://"];

/// Derives the connection host from a bucket endpoint.
///
/// Endpoints starting with `http://` or `https://` are validated as URLs and
/// reduced to their `host[:port]` authority, exactly as written: explicit
/// ports (including `:80` and `:443`) and host case are kept. Anything else is
/// taken to be a bare host already and returned as is. A scheme-prefixed
/// endpoint that does not parse is an [`Error::InvalidEndpoint`].
pub fn extract_host(endpoint: &str) -> Result<String> {
    let Some(rest) = SCHEMES.iter().find_map(|scheme| endpoint.strip_prefix(scheme)) else {
        return Ok(endpoint.to_string());
    };

    let invalid = |source: url::ParseError| Error::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    };

    let parsed = Url::parse(endpoint).map_err(invalid)?;
    if parsed.host_str().is_none_or(str::is_empty) {
        return Err(invalid(url::ParseError::EmptyHost));
    }

    Ok(authority(rest).to_string())
}

/// Host and port of an already validated URL, minus any userinfo.
fn authority(after_scheme: &str) -> &str {
    let end = after_scheme
        .find(['/', '\\', '?', '#'])
        .unwrap_or(after_scheme.len());
    let authority = &after_scheme[..end];
    match authority.rfind('@') {
        Some(at) => &authority[at + 1..],
        None => authority,
    }
}
