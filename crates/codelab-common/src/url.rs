//! URL utilities shared by the parser and the fetcher.
//!
//! Exported documents wrap every outbound link in a search-engine redirect
//! and reference other documents by full editor URLs; these helpers reduce
//! both to the value that matters.

use ::url::Url;

/// Path marker preceding a hosted-document id in an editor URL.
pub const DOC_ID_MARKER: &str = "/document/d/";

/// Hosts whose `/url?q=` endpoint is a click-tracking redirect.
const REDIRECT_HOSTS: [&str; 2] = ["google.com", "www.google.com"];

/// Replace a click-tracking redirect with its destination.
///
/// `https://www.google.com/url?q=http%3A%2F%2Fexample.com&sa=D` becomes
/// `http://example.com`. Anything that is not such a redirect (including
/// relative and unparsable hrefs) is returned unchanged.
#[must_use]
pub fn unwrap_redirect(href: &str) -> String {
    let Ok(parsed) = Url::parse(href) else {
        return href.to_string();
    };
    let is_redirect = parsed
        .host_str()
        .is_some_and(|host| REDIRECT_HOSTS.contains(&host))
        && parsed.path() == "/url";
    if !is_redirect {
        return href.to_string();
    }
    parsed
        .query_pairs()
        .find(|(key, _)| key == "q")
        .map_or_else(|| href.to_string(), |(_, target)| target.into_owned())
}

/// Extract a hosted-document id from a full editor URL.
///
/// The id is the path segment following [`DOC_ID_MARKER`]. Bare ids, and
/// strings without the marker, are cut at the first `/` after position zero
/// and otherwise returned as-is.
#[must_use]
pub fn hosted_doc_id(source: &str) -> &str {
    let mut id = source;
    if let Some(start) = id.find(DOC_ID_MARKER) {
        id = &id[start + DOC_ID_MARKER.len()..];
    }
    match id.find('/') {
        Some(end) if end > 0 => &id[..end],
        _ => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwraps_redirect_target() {
        assert_eq!(
            unwrap_redirect("https://google.com/url?q=http%3A%2F%2Fexample.com"),
            "http://example.com"
        );
        assert_eq!(
            unwrap_redirect("https://www.google.com/url?q=https://host/a?b%3Dc&sa=D&ust=1"),
            "https://host/a?b=c"
        );
    }

    #[test]
    fn leaves_plain_links_alone() {
        assert_eq!(unwrap_redirect("http://example.com/url?q=x"), "http://example.com/url?q=x");
        assert_eq!(unwrap_redirect("url"), "url");
        assert_eq!(unwrap_redirect("https://google.com/search?q=x"), "https://google.com/search?q=x");
    }

    #[test]
    fn extracts_doc_id() {
        assert_eq!(
            hosted_doc_id("https://docs.google.com/document/d/1AbC-xyz/edit#heading=h.1"),
            "1AbC-xyz"
        );
        assert_eq!(hosted_doc_id("https://docs.google.com/document/d/1AbC"), "1AbC");
        assert_eq!(hosted_doc_id("1AbC"), "1AbC");
        assert_eq!(hosted_doc_id("1AbC/edit"), "1AbC");
    }
}
