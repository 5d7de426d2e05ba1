//! Platform extractors.
//!
//! Each platform defines a [`PlatformRules`] value: an ordered container
//! selector chain plus ordered per-field selector chains. Extraction tries
//! each selector in sequence and takes the first that yields a result, so
//! the fallback order is explicit and testable per platform.

mod medium;
mod mirror;
mod paragraph;

pub use medium::MEDIUM_RULES;
pub use mirror::MIRROR_RULES;
pub use paragraph::PARAGRAPH_RULES;

use chrono::{DateTime, Utc};
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use pubwatch_core::{EngagementMetrics, NormalizedPost, Platform, PostAuthor};

use crate::identity::derive_post_id;
use crate::normalize::resolve_and_normalize;

/// Minimum content length for a candidate to be yielded.
pub const MIN_CONTENT_LEN: usize = 10;
/// Last-resort content is the full container text truncated to this length.
const MAX_FALLBACK_CONTENT_LEN: usize = 1000;
/// Excerpt fallback: leading slice of the content.
const EXCERPT_LEN: usize = 200;
/// Reading speed for the estimated reading time.
const WORDS_PER_MINUTE: usize = 200;

/// Ordered list of container selectors; the first selector that matches at
/// least one element wins and later selectors are not consulted.
pub struct ContainerChain {
    selectors: &'static [&'static str],
}

impl ContainerChain {
    #[must_use]
    pub const fn new(selectors: &'static [&'static str]) -> Self {
        Self { selectors }
    }

    /// Containers matched by the first productive selector, in document order.
    #[must_use]
    pub fn containers<'a>(&self, doc: &'a Html) -> Vec<ElementRef<'a>> {
        for raw in self.selectors {
            let selector = Selector::parse(raw).expect("valid container selector");
            let matched: Vec<ElementRef<'a>> = doc.select(&selector).collect();
            if !matched.is_empty() {
                return matched;
            }
        }
        Vec::new()
    }
}

/// Selector chains for one platform.
///
/// Field chains are ordered most-specific first; empty chains mean the
/// platform never exposes that field and the default applies.
pub struct PlatformRules {
    pub platform: Platform,
    pub containers: ContainerChain,
    pub title: &'static [&'static str],
    pub link: &'static [&'static str],
    pub author_name: &'static [&'static str],
    pub author_avatar: &'static [&'static str],
    pub content: &'static [&'static str],
    pub excerpt: &'static [&'static str],
    pub claps: &'static [&'static str],
    pub comments: &'static [&'static str],
    pub featured_image: &'static [&'static str],
}

#[must_use]
pub(crate) fn rules_for(platform: Platform) -> &'static PlatformRules {
    match platform {
        Platform::Medium => &MEDIUM_RULES,
        Platform::Mirror => &MIRROR_RULES,
        Platform::Paragraph => &PARAGRAPH_RULES,
    }
}

/// Extract up to `max_posts` normalized posts from a platform profile page.
///
/// Candidates missing a title or link, or whose content fails the quality
/// gate, are discarded rather than reported as errors.
#[must_use]
pub fn extract_posts(
    platform: Platform,
    html: &str,
    profile_url: &str,
    max_posts: usize,
) -> Vec<NormalizedPost> {
    let rules = rules_for(platform);
    let doc = Html::parse_document(html);
    let containers = rules.containers.containers(&doc);

    let mut posts = Vec::new();
    for container in containers {
        if posts.len() >= max_posts {
            break;
        }
        match build_post(rules, container, profile_url) {
            Some(post) => posts.push(post),
            None => {
                tracing::debug!(
                    platform = %rules.platform,
                    profile_url,
                    "discarded candidate container (missing title/link or below content gate)"
                );
            }
        }
    }
    posts
}

/// Build one post from a matched container, or `None` if the candidate fails
/// the title/link requirement or the content-quality gate.
fn build_post(
    rules: &PlatformRules,
    container: ElementRef<'_>,
    profile_url: &str,
) -> Option<NormalizedPost> {
    let title = first_text(container, rules.title)?;
    let href = first_href(container, rules.link)?;
    let url = resolve_and_normalize(&href, rules.platform.base_url())?;

    let full_text = container_text(container);

    let content = first_text(container, rules.content)
        .unwrap_or_else(|| truncate_chars(&full_text, MAX_FALLBACK_CONTENT_LEN));
    if content.chars().count() < MIN_CONTENT_LEN {
        return None;
    }

    let excerpt = first_text(container, rules.excerpt)
        .or_else(|| Some(truncate_chars(&content, EXCERPT_LEN)));

    let author = PostAuthor {
        name: first_text(container, rules.author_name)
            .unwrap_or_else(|| PostAuthor::unknown().name),
        username: username_from_profile(profile_url),
        profile_url: Some(profile_url.to_string()),
        avatar_url: first_attr(container, rules.author_avatar, "src"),
    };

    let metrics = EngagementMetrics {
        claps: parse_metric_count(first_text(container, rules.claps).as_deref()),
        views: 0,
        comments: parse_metric_count(first_text(container, rules.comments).as_deref()),
        shares: 0,
    };

    Some(NormalizedPost {
        post_id: derive_post_id(&url),
        title,
        reading_time_minutes: Some(estimate_reading_time(&content)),
        tags: extract_hashtags(&full_text),
        published_at: extract_published_at(container).unwrap_or_else(Utc::now),
        featured_image: first_attr(container, rules.featured_image, "src"),
        metrics,
        author,
        excerpt,
        content,
        platform: rules.platform,
        url,
    })
}

/// First non-empty text for an ordered selector chain.
fn first_text(container: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    for raw in selectors {
        let selector = Selector::parse(raw).expect("valid field selector");
        for element in container.select(&selector) {
            let text = clean_text(&element.text().collect::<Vec<_>>().join(" "));
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// First non-empty attribute value for an ordered selector chain.
fn first_attr(container: ElementRef<'_>, selectors: &[&str], attr: &str) -> Option<String> {
    for raw in selectors {
        let selector = Selector::parse(raw).expect("valid field selector");
        for element in container.select(&selector) {
            if let Some(value) = element.value().attr(attr) {
                let value = value.trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// First usable link target, checking the container itself before its
/// descendants — several platforms wrap the whole card in one anchor.
fn first_href(container: ElementRef<'_>, selectors: &[&str]) -> Option<String> {
    if container.value().name() == "a" {
        if let Some(href) = container.value().attr("href") {
            if is_usable_href(href) {
                return Some(href.trim().to_string());
            }
        }
    }
    for raw in selectors {
        let selector = Selector::parse(raw).expect("valid link selector");
        for element in container.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if is_usable_href(href) {
                    return Some(href.trim().to_string());
                }
            }
        }
    }
    None
}

fn is_usable_href(href: &str) -> bool {
    let href = href.trim();
    !href.is_empty()
        && !href.starts_with('#')
        && !href.starts_with("mailto:")
        && !href.starts_with("javascript:")
}

/// Whole-container text with collapsed whitespace.
fn container_text(container: ElementRef<'_>) -> String {
    clean_text(&container.text().collect::<Vec<_>>().join(" "))
}

pub(crate) fn clean_text(input: &str) -> String {
    input.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse an engagement counter: strip non-digits, parse the remainder,
/// default to zero on failure.
#[must_use]
pub fn parse_metric_count(raw: Option<&str>) -> u64 {
    let Some(raw) = raw else {
        return 0;
    };
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Estimated reading time in minutes at 200 words/minute, rounded up.
#[must_use]
pub fn estimate_reading_time(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE);
    u32::try_from(minutes).unwrap_or(u32::MAX)
}

/// Hashtags (`#word`) found anywhere in the container text, deduplicated in
/// first-seen order, without the leading `#`.
#[must_use]
pub fn extract_hashtags(text: &str) -> Vec<String> {
    let re = Regex::new(r"#(\w+)").expect("valid hashtag regex");
    let mut seen = std::collections::HashSet::new();
    re.captures_iter(text)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str().to_string()))
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}

fn extract_published_at(container: ElementRef<'_>) -> Option<DateTime<Utc>> {
    let selector = Selector::parse("time[datetime]").expect("valid time selector");
    let raw = container
        .select(&selector)
        .next()
        .and_then(|el| el.value().attr("datetime"))?;
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn truncate_chars(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Username guess from the profile link's last path segment (`@acme`,
/// `acme.eth`, ...), stripped of any `@` prefix.
fn username_from_profile(profile_url: &str) -> Option<String> {
    let trimmed = profile_url.trim_end_matches('/');
    let segment = trimmed.rsplit('/').next()?;
    if segment.is_empty() || segment.contains('.') && segment.starts_with("www") {
        return None;
    }
    let name = segment.trim_start_matches('@');
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
