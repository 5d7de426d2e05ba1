//! Medium profile-page extraction rules.

use pubwatch_core::Platform;

use super::{ContainerChain, PlatformRules};

/// Selector chains for Medium profile pages.
///
/// Medium's logged-out profile markup has gone through several generations;
/// the container chain covers the current `data-testid` cards, the bare
/// `article` layout, and the legacy `postArticle` class, in that order.
pub static MEDIUM_RULES: PlatformRules = PlatformRules {
    platform: Platform::Medium,
    containers: ContainerChain::new(&[
        r#"article[data-testid="post-preview"]"#,
        "article",
        "div.postArticle",
    ]),
    title: &[
        "h2",
        "h3",
        "h1",
        r#"[data-testid="post-preview-title"]"#,
        ".graf--title",
    ],
    link: &[
        r#"a[data-testid="post-preview-link"]"#,
        "a[href]",
    ],
    author_name: &[
        r#"[data-testid="authorName"]"#,
        ".author",
        ".postMetaInline-authorLockup a",
    ],
    author_avatar: &[
        r#"img[data-testid="authorPhoto"]"#,
        "img.avatar-image",
    ],
    content: &[
        "p",
        r#"[data-testid="post-preview-content"]"#,
        ".graf--p",
    ],
    excerpt: &[
        "h3 + p",
        ".postArticle-content p",
    ],
    claps: &[
        r#"[data-testid="clap-count"]"#,
        ".clapCount",
        "button.js-multirecommendCountButton",
    ],
    comments: &[
        r#"[data-testid="response-count"]"#,
        ".responseCount",
    ],
    featured_image: &[
        r#"img[data-testid="post-preview-image"]"#,
        "img",
    ],
};
