use std::{fmt, str::FromStr};

#[derive(Debug, thiserror::Error)]
#[error("derived post slug is empty")]
pub struct EmptySlug;

/// Lowercase, hyphen-separated identifier derived from a post title.
///
/// Safe to use both as a URL path segment and as a filename.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostSlug(String);

impl PostSlug {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }

    /// Derives a slug from a title.
    ///
    /// Lowercases the title, strips every character that is not a lowercase
    /// letter, digit, whitespace, or hyphen, turns whitespace runs into
    /// single hyphens, collapses hyphen runs, and trims hyphens at either
    /// end. The transform is idempotent: feeding a slug back through it
    /// yields the same slug.
    pub fn from_title(title: &str) -> Result<Self, EmptySlug> {
        let lowered = title.to_lowercase();
        let kept: String = lowered
            .chars()
            .filter(|c| {
                c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() || *c == '-'
            })
            .collect();
        let hyphenated = kept.split_whitespace().collect::<Vec<_>>().join("-");
        let collapsed = hyphenated
            .split('-')
            .filter(|segment| !segment.is_empty())
            .collect::<Vec<_>>()
            .join("-");
        PostSlug::from_str(&collapsed)
    }
}

impl AsRef<str> for PostSlug {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PostSlug {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl FromStr for PostSlug {
    type Err = EmptySlug;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(EmptySlug);
        }

        Ok(Self(trimmed.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::PostSlug;

    #[test]
    fn strips_punctuation_and_folds_case() {
        let slug = PostSlug::from_title("TypeScript Tips & Tricks!").unwrap();
        assert_eq!(slug.as_str(), "typescript-tips-tricks");
    }

    #[test]
    fn collapses_hyphens_and_whitespace() {
        let slug = PostSlug::from_title("  --Hello   World--  ").unwrap();
        assert_eq!(slug.as_str(), "hello-world");
    }

    #[test]
    fn transform_is_idempotent() {
        let once = PostSlug::from_title("Async Rust: Pin & Unpin, Explained").unwrap();
        let twice = PostSlug::from_title(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn drops_non_ascii_instead_of_transliterating() {
        let slug = PostSlug::from_title("Café Culture").unwrap();
        assert_eq!(slug.as_str(), "caf-culture");
    }

    #[test]
    fn all_punctuation_title_is_rejected() {
        assert!(PostSlug::from_title("?!?!").is_err());
    }
}
