use url::{form_urlencoded, Url};

/// Pull the target URL out of a redirector link's query string.
///
/// Absolute and relative links are both accepted. Returns an empty string
/// when the link has no query or lacks the parameter.
pub fn extract_embedded_url(link: &str, param_name: &str) -> String {
    let Some((_, query)) = link.split_once('?') else {
        return String::new();
    };
    let query = query.split_once('#').map_or(query, |(query, _)| query);
    form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == param_name)
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

/// Resolve `href` against the page it was found on
pub fn resolve_link(base: &Url, href: &str) -> String {
    base.join(href.trim())
        .map(|url| url.to_string())
        .unwrap_or_else(|_| href.trim().to_string())
}
