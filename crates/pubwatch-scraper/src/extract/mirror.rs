//! Mirror profile-page extraction rules.

use pubwatch_core::Platform;

use super::{ContainerChain, PlatformRules};

/// Selector chains for Mirror publication pages.
///
/// Mirror renders entry cards with `data-testid` attributes when hydrated;
/// the static fallback is a plain `article` list, and some self-hosted
/// mirrors still use `div.entry` cards wrapped in a single anchor.
pub static MIRROR_RULES: PlatformRules = PlatformRules {
    platform: Platform::Mirror,
    containers: ContainerChain::new(&[
        r#"div[data-testid="entry-card"]"#,
        "article",
        "div.entry",
    ]),
    title: &[
        "h2",
        "h1",
        r#"[data-testid="entry-title"]"#,
        ".entry-title",
    ],
    link: &[
        r#"a[data-testid="entry-link"]"#,
        "a[href]",
    ],
    author_name: &[
        r#"[data-testid="publication-name"]"#,
        ".author",
        ".entry-author",
    ],
    author_avatar: &[
        r#"img[data-testid="publication-avatar"]"#,
        "img.entry-avatar",
    ],
    content: &[
        "p",
        r#"[data-testid="entry-summary"]"#,
        ".entry-body",
    ],
    excerpt: &[
        r#"[data-testid="entry-summary"]"#,
        ".entry-summary",
    ],
    // Mirror exposes collector counts, closest analogue to claps.
    claps: &[
        r#"[data-testid="collect-count"]"#,
        ".collect-count",
    ],
    comments: &[],
    featured_image: &[
        r#"img[data-testid="entry-image"]"#,
        "img",
    ],
};
