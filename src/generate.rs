use std::path::{Path, PathBuf};

use serde::Serialize;
use time::OffsetDateTime;
use tokio::fs;
use tracing::debug;

use crate::{
    post::GeneratedPost,
    provider::{ProviderError, TextProvider},
    slug::{EmptySlug, PostSlug},
};

/// Directory under the blog root that receives generated posts.
pub const OUTPUT_SUBDIR: &str = "auto-generated";

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("Fail to generate content: {0}")]
    Provider(#[from] ProviderError),
    #[error("Fail to derive a usable slug: {0}")]
    Slug(#[from] EmptySlug),
    #[error("Fail to format timestamp: {0}")]
    Timestamp(#[from] time::error::Format),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What happened to the target file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Written,
    Skipped,
}

/// Summary of one generation run.
#[derive(Debug, Serialize)]
pub struct Report {
    pub topic: String,
    pub title: String,
    pub slug: String,
    pub path: PathBuf,
    pub outcome: Outcome,
}

/// Runs one end-to-end generation-and-persist cycle against a provider and
/// a blog root, both supplied explicitly.
#[derive(Debug)]
pub struct Generator<P> {
    provider: P,
    blog_root: PathBuf,
}

impl<P: TextProvider> Generator<P> {
    pub fn new(provider: P, blog_root: impl Into<PathBuf>) -> Self {
        Self {
            provider,
            blog_root: blog_root.into(),
        }
    }

    /// Requests content for `topic`, derives title and slug, and writes the
    /// document unless a post with the same slug already exists.
    pub async fn run(&self, topic: &str) -> Result<Report, GenerateError> {
        let prompt = build_prompt(topic);
        debug!("Requesting content for \"{topic}\"");
        let body = self.provider.generate(&prompt).await?;

        let post = GeneratedPost::assemble(topic, body, OffsetDateTime::now_utc())?;
        let document = post.document()?;
        debug!("Derived slug {} for \"{}\"", post.slug(), post.title());

        let (path, outcome) = persist(&self.blog_root, post.slug(), &document).await?;
        Ok(Report {
            topic: post.topic().to_string(),
            title: post.title().to_string(),
            slug: post.slug().to_string(),
            path,
            outcome,
        })
    }
}

fn build_prompt(topic: &str) -> String {
    format!(
        "Write a blog post about \"{topic}\". The post should be between 800 \
         and 1200 words, formatted as Markdown, and must start with a single \
         top-level heading line that titles the article. Cover the topic for \
         working developers, with concrete examples where they help."
    )
}

/// Writes `document` to `<blog_root>/auto-generated/<slug>.md`, creating
/// missing ancestor directories. An existing file is left untouched and the
/// write is skipped; dedup is by slug, not by content, so the existence
/// check is the only guard. Check-then-write is not atomic across
/// processes.
pub async fn persist(
    blog_root: &Path,
    slug: &PostSlug,
    document: &str,
) -> Result<(PathBuf, Outcome), std::io::Error> {
    let dir = blog_root.join(OUTPUT_SUBDIR);
    fs::create_dir_all(&dir).await?;

    let path = dir.join(format!("{slug}.md"));
    if fs::metadata(&path).await.is_ok() {
        return Ok((path, Outcome::Skipped));
    }

    fs::write(&path, document).await?;
    Ok((path, Outcome::Written))
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use async_trait::async_trait;

    use super::*;

    #[derive(Debug)]
    struct StubProvider(&'static str);

    #[async_trait]
    impl TextProvider for StubProvider {
        async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Debug)]
    struct FailingProvider;

    #[async_trait]
    impl TextProvider for FailingProvider {
        async fn generate(&self, _prompt: &str) -> Result<String, ProviderError> {
            Err(ProviderError::EmptyResponse)
        }
    }

    #[tokio::test]
    async fn persist_creates_missing_ancestors() {
        let tmp = tempfile::tempdir().unwrap();
        let blog_root = tmp.path().join("src").join("data").join("blog");
        let slug = PostSlug::from_str("hello-world").unwrap();

        let (path, outcome) = persist(&blog_root, &slug, "contents").await.unwrap();

        assert_eq!(outcome, Outcome::Written);
        assert_eq!(path, blog_root.join(OUTPUT_SUBDIR).join("hello-world.md"));
        assert_eq!(tokio::fs::read_to_string(&path).await.unwrap(), "contents");
    }

    #[tokio::test]
    async fn persist_skips_existing_file_untouched() {
        let tmp = tempfile::tempdir().unwrap();
        let blog_root = tmp.path().to_path_buf();
        let slug = PostSlug::from_str("hello-world").unwrap();

        let dir = blog_root.join(OUTPUT_SUBDIR);
        tokio::fs::create_dir_all(&dir).await.unwrap();
        let existing = dir.join("hello-world.md");
        tokio::fs::write(&existing, "the original").await.unwrap();

        let (path, outcome) = persist(&blog_root, &slug, "a replacement").await.unwrap();

        assert_eq!(outcome, Outcome::Skipped);
        assert_eq!(path, existing);
        assert_eq!(
            tokio::fs::read_to_string(&existing).await.unwrap(),
            "the original"
        );
    }

    #[tokio::test]
    async fn run_writes_post_named_after_slug() {
        let tmp = tempfile::tempdir().unwrap();
        let generator = Generator::new(
            StubProvider("# Mastering Git Workflows\n\nBody text..."),
            tmp.path(),
        );

        let report = generator.run("Version Control with Git").await.unwrap();

        assert_eq!(report.outcome, Outcome::Written);
        assert_eq!(report.title, "Mastering Git Workflows");
        assert_eq!(report.slug, "mastering-git-workflows");
        assert_eq!(
            report.path.file_name().unwrap(),
            "mastering-git-workflows.md"
        );

        let written = tokio::fs::read_to_string(&report.path).await.unwrap();
        assert!(written.contains("title: \"Mastering Git Workflows\""));
        assert!(written.contains("  - version\n"));
        assert!(written.contains(
            "description: \"Auto-generated blog post about Version Control with Git\""
        ));
        assert!(written.ends_with("# Mastering Git Workflows\n\nBody text..."));
    }

    #[tokio::test]
    async fn second_run_with_same_slug_is_skipped() {
        let tmp = tempfile::tempdir().unwrap();
        let generator = Generator::new(StubProvider("# Same Title\n\nFirst body."), tmp.path());

        let first = generator.run("Docker for Developers").await.unwrap();
        let second = generator.run("Docker for Developers").await.unwrap();

        assert_eq!(first.outcome, Outcome::Written);
        assert_eq!(second.outcome, Outcome::Skipped);
        let contents = tokio::fs::read_to_string(&second.path).await.unwrap();
        assert!(contents.ends_with("First body."));
    }

    #[tokio::test]
    async fn provider_failure_leaves_nothing_behind() {
        let tmp = tempfile::tempdir().unwrap();
        let generator = Generator::new(FailingProvider, tmp.path());

        let error = generator.run("REST API Design").await.unwrap_err();

        assert!(matches!(error, GenerateError::Provider(_)));
        assert!(!tmp.path().join(OUTPUT_SUBDIR).exists());
    }
}
