use time::{OffsetDateTime, format_description::well_known::Rfc3339};

use crate::slug::{EmptySlug, PostSlug};

/// Author label stamped into every generated document.
pub const AUTHOR: &str = "Auto Blog Generator";

/// Extracts a title from generated markdown: the first line carrying a
/// single top-level heading marker wins. Falls back to a synthetic title
/// when the text has no such line.
pub fn derive_title(text: &str, topic: &str) -> String {
    for line in text.lines() {
        if let Some(rest) = line.strip_prefix("# ") {
            return rest.trim().to_string();
        }
    }
    format!("A Deep Dive into {topic}")
}

/// One generated article, alive for the duration of a single run.
#[derive(Debug, Clone)]
pub struct GeneratedPost {
    topic: String,
    body: String,
    title: String,
    slug: PostSlug,
    created: OffsetDateTime,
}

impl GeneratedPost {
    /// Derives title and slug from the generated body. `created` is passed
    /// in so the document timestamp is under the caller's control.
    pub fn assemble(
        topic: impl Into<String>,
        body: impl Into<String>,
        created: OffsetDateTime,
    ) -> Result<Self, EmptySlug> {
        let topic = topic.into();
        let body = body.into();
        let title = derive_title(&body, &topic);
        let slug = PostSlug::from_title(&title)?;
        Ok(Self {
            topic,
            body,
            title,
            slug,
            created,
        })
    }

    #[must_use]
    pub fn topic(&self) -> &str {
        &self.topic
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn slug(&self) -> &PostSlug {
        &self.slug
    }

    #[must_use]
    pub const fn created(&self) -> OffsetDateTime {
        self.created
    }

    /// Renders the full markdown document: frontmatter block, blank line,
    /// then the generated body verbatim.
    pub fn document(&self) -> Result<String, time::error::Format> {
        let created = self.created.format(&Rfc3339)?;
        // First whitespace-delimited word of the topic becomes the second tag.
        let topic_tag = self
            .topic
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_lowercase();

        Ok(format!(
            "---
author: {AUTHOR}
pubDatetime: {created}
title: \"{title}\"
slug: \"{slug}\"
featured: false
draft: false
tags:
  - auto-generated
  - {topic_tag}
description: \"Auto-generated blog post about {topic}\"
---

{body}",
            title = self.title,
            slug = self.slug,
            topic = self.topic,
            body = self.body,
        ))
    }
}

#[cfg(test)]
mod tests {
    use time::macros::datetime;

    use super::{GeneratedPost, derive_title};

    #[test]
    fn title_comes_from_first_top_level_heading() {
        let text = "# My Great Title\n\nSome body.";
        assert_eq!(derive_title(text, "Topic"), "My Great Title");
    }

    #[test]
    fn lower_level_headings_are_not_titles() {
        let text = "## Outline\n\n# Real Title\n\nBody.";
        assert_eq!(derive_title(text, "Topic"), "Real Title");
    }

    #[test]
    fn missing_heading_falls_back_to_synthetic_title() {
        let text = "Just prose, no headings at all.";
        assert_eq!(
            derive_title(text, "REST API Design"),
            "A Deep Dive into REST API Design"
        );
    }

    #[test]
    fn document_layout_is_exact() {
        let post = GeneratedPost::assemble(
            "Version Control with Git",
            "# Mastering Git Workflows\n\nBody text...",
            datetime!(2024-05-20 12:30:45 UTC),
        )
        .unwrap();

        let expected = "---
author: Auto Blog Generator
pubDatetime: 2024-05-20T12:30:45Z
title: \"Mastering Git Workflows\"
slug: \"mastering-git-workflows\"
featured: false
draft: false
tags:
  - auto-generated
  - version
description: \"Auto-generated blog post about Version Control with Git\"
---

# Mastering Git Workflows\n\nBody text...";

        assert_eq!(post.document().unwrap(), expected);
    }

    #[test]
    fn body_is_kept_verbatim_including_heading_line() {
        let body = "# Title\n\nline one\n\n```rust\n# not a heading\n```\n";
        let post =
            GeneratedPost::assemble("Docker for Developers", body, datetime!(2024-01-01 0:00 UTC))
                .unwrap();
        assert!(post.document().unwrap().ends_with(body));
    }
}
