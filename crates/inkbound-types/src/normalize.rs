use url::Url;

/// Query parameters stripped from every submitted URL.
const TRACKING_PARAMS: &[&str] = &["utm_source", "utm_medium", "utm_campaign", "utm_content"];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("URL failed to parse")]
    Parse,
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),
}

/// Parse `raw`, reject anything but http/https, and strip tracking params.
///
/// Idempotent: `normalize(normalize(u)?)? == normalize(u)?`.
pub fn normalize_url(raw: &str) -> Result<String, NormalizeError> {
    let mut url = Url::parse(raw).map_err(|_| NormalizeError::Parse)?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(NormalizeError::UnsupportedScheme(url.scheme().to_string()));
    }

    let retained: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| !TRACKING_PARAMS.contains(&k.as_ref()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if retained.is_empty() {
        url.set_query(None);
    } else {
        let mut serializer = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in &retained {
            serializer.append_pair(k, v);
        }
        url.set_query(Some(&serializer.finish()));
    }

    Ok(url.to_string())
}
