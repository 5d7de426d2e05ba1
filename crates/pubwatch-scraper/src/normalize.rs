//! Canonical URL normalization.

use url::Url;

/// Query parameters that carry tracking state rather than identity.
const TRACKING_PARAMS: [&str; 15] = [
    "fbclid", "gclid", "ref", "referrer", "campaign", "medium", "content", "term", "_ga", "_gl",
    "mc_cid", "mc_eid", "msclkid", "yclid", "source",
];

/// Strip tracking parameters from a URL.
///
/// `utm_*`-prefixed parameters and the fixed [`TRACKING_PARAMS`] set are
/// removed. Hosts containing `medium.com` drop the entire query string —
/// Medium post URLs carry no meaningful query parameters.
///
/// Unparseable input is returned unchanged (never an error); the post-id
/// derivation downstream still works on whatever string the page gave us.
#[must_use]
pub fn normalize_url(raw: &str) -> String {
    let Ok(mut url) = Url::parse(raw) else {
        tracing::warn!(url = raw, "could not parse URL; leaving unnormalized");
        return raw.to_string();
    };

    if url.host_str().is_some_and(|h| h.contains("medium.com")) {
        url.set_query(None);
        return url.to_string();
    }

    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        // Re-serialize through the url crate so decoded values are
        // re-encoded; hand-joining would corrupt values containing
        // delimiters such as an encoded `&`.
        url.query_pairs_mut().clear().extend_pairs(&kept);
    }

    url.to_string()
}

fn is_tracking_param(key: &str) -> bool {
    key.starts_with("utm_") || TRACKING_PARAMS.contains(&key)
}

/// Resolve a possibly-relative link against a base URL, then normalize it.
///
/// Returns `None` when neither the link nor the base can produce an
/// absolute URL.
#[must_use]
pub fn resolve_and_normalize(href: &str, base: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(normalize_url(href));
    }
    let base_url = Url::parse(base).ok()?;
    let joined = base_url.join(href).ok()?;
    Some(normalize_url(joined.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_utm_and_ref_params() {
        let normalized =
            normalize_url("https://mirror.xyz/acme.eth/post-1?utm_source=x&ref=y&page=2");
        assert_eq!(normalized, "https://mirror.xyz/acme.eth/post-1?page=2");
    }

    #[test]
    fn strips_every_known_tracking_param() {
        let normalized = normalize_url(
            "https://paragraph.xyz/@acme/post?fbclid=a&gclid=b&mc_cid=c&msclkid=d&source=e",
        );
        assert_eq!(normalized, "https://paragraph.xyz/@acme/post");
    }

    #[test]
    fn medium_host_drops_entire_query() {
        let normalized = normalize_url("https://medium.com/@acme/post-abc123?page=2&keep=me");
        assert_eq!(normalized, "https://medium.com/@acme/post-abc123");
    }

    #[test]
    fn medium_subdomain_also_drops_query() {
        let normalized = normalize_url("https://acme.medium.com/post-abc123?anything=1");
        assert_eq!(normalized, "https://acme.medium.com/post-abc123");
    }

    #[test]
    fn unparseable_input_is_returned_unchanged() {
        assert_eq!(normalize_url("not a url at all"), "not a url at all");
    }

    #[test]
    fn keeps_encoded_delimiters_in_surviving_values() {
        let normalized = normalize_url("https://mirror.xyz/a/p?q=a%26b&utm_source=x");
        assert_eq!(normalized, "https://mirror.xyz/a/p?q=a%26b");
    }

    #[test]
    fn is_deterministic() {
        let input = "https://mirror.xyz/acme.eth/post-1?utm_campaign=x&id=9";
        assert_eq!(normalize_url(input), normalize_url(input));
    }

    #[test]
    fn resolves_relative_links_against_base() {
        let resolved = resolve_and_normalize("/@acme/post-1?ref=feed", "https://paragraph.xyz");
        assert_eq!(
            resolved.as_deref(),
            Some("https://paragraph.xyz/@acme/post-1")
        );
    }

    #[test]
    fn passes_absolute_links_through_normalization() {
        let resolved =
            resolve_and_normalize("https://medium.com/@acme/post?x=1", "https://medium.com");
        assert_eq!(resolved.as_deref(), Some("https://medium.com/@acme/post"));
    }
}
