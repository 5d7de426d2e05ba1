//! Paragraph profile-page extraction rules.

use pubwatch_core::Platform;

use super::{ContainerChain, PlatformRules};

/// Selector chains for Paragraph publication pages.
pub static PARAGRAPH_RULES: PlatformRules = PlatformRules {
    platform: Platform::Paragraph,
    containers: ContainerChain::new(&[
        r#"div[data-testid="post-card"]"#,
        "article",
        "div.post-item",
    ]),
    title: &[
        "h2",
        "h3",
        r#"[data-testid="post-title"]"#,
        ".post-title",
    ],
    link: &[
        r#"a[data-testid="post-link"]"#,
        "a[href]",
    ],
    author_name: &[
        r#"[data-testid="publication-author"]"#,
        ".author",
        ".post-author",
    ],
    author_avatar: &[
        r#"img[data-testid="author-avatar"]"#,
        "img.author-avatar",
    ],
    content: &[
        "p",
        r#"[data-testid="post-subtitle"]"#,
        ".post-preview",
    ],
    excerpt: &[
        r#"[data-testid="post-subtitle"]"#,
        ".post-subtitle",
    ],
    claps: &[],
    comments: &[
        r#"[data-testid="comment-count"]"#,
        ".comment-count",
    ],
    featured_image: &[
        r#"img[data-testid="post-cover"]"#,
        "img",
    ],
};

#[cfg(test)]
mod tests {
    use super::super::extract_posts;
    use pubwatch_core::Platform;

    const PROFILE: &str = "https://paragraph.xyz/@acme";

    #[test]
    fn extracts_post_cards_with_testid_markup() {
        let html = r#"
          <div data-testid="post-card">
            <span data-testid="publication-author">Acme Newsletter</span>
            <h2>Issue #42: Roadmap Preview</h2>
            <a data-testid="post-link" href="/@acme/issue-42-roadmap-preview?utm_medium=profile"></a>
            <p data-testid="post-subtitle">A first look at what ships next quarter across the product line.</p>
            <span data-testid="comment-count">9 comments</span>
            <img data-testid="post-cover" src="https://storage.paragraph.xyz/cover42.png">
          </div>
        "#;
        let posts = extract_posts(Platform::Paragraph, html, PROFILE, 10);
        assert_eq!(posts.len(), 1);

        let post = &posts[0];
        assert_eq!(post.title, "Issue #42: Roadmap Preview");
        assert_eq!(post.url, "https://paragraph.xyz/@acme/issue-42-roadmap-preview");
        assert_eq!(post.author.name, "Acme Newsletter");
        assert_eq!(post.metrics.comments, 9);
        assert_eq!(post.metrics.claps, 0, "paragraph has no clap analogue");
        assert_eq!(
            post.featured_image.as_deref(),
            Some("https://storage.paragraph.xyz/cover42.png")
        );
        // "#42" in the title matches the hashtag pattern; lossy but accepted.
        assert_eq!(post.tags, vec!["42".to_string()]);
    }

    #[test]
    fn falls_back_to_article_markup() {
        let html = r#"
          <article>
            <h3>Hiring Across The Stack</h3>
            <a href="https://paragraph.xyz/@acme/hiring-across-the-stack">apply</a>
            <p>Open roles on the protocol, infra, and developer relations teams.</p>
          </article>
        "#;
        let posts = extract_posts(Platform::Paragraph, html, PROFILE, 10);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Hiring Across The Stack");
        assert_eq!(
            posts[0].excerpt.as_deref(),
            Some("Open roles on the protocol, infra, and developer relations teams.")
        );
    }

    #[test]
    fn post_item_class_fallback_applies_last() {
        let html = r#"
          <div class="post-item">
            <h3 class="post-title">Downtime Retro</h3>
            <a href="/@acme/downtime-retro">read</a>
            <div class="post-preview">Root cause analysis for the February outage with timelines.</div>
          </div>
        "#;
        let posts = extract_posts(Platform::Paragraph, html, PROFILE, 10);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].title, "Downtime Retro");
    }
}
