use serde::{Deserialize, Serialize};

/// Shown in place of a missing title.
pub const NO_TITLE: &str = "No Title";
/// Shown in place of a missing snippet.
pub const NO_CONTENT: &str = "No Content";
/// Shown in place of a missing URL.
pub const NO_URL: &str = "No URL";

/// A single web result as returned by SearXNG.
///
/// Every field is optional on the wire; missing or `null` fields are kept as
/// `None` and replaced by a placeholder when rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

impl SearchResult {
    /// Creates a result with all three fields present.
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        url: impl Into<String>,
    ) -> Self {
        Self {
            title: Some(title.into()),
            content: Some(content.into()),
            url: Some(url.into()),
        }
    }

    /// Creates a result from possibly missing fields.
    pub fn from_parts(title: Option<String>, content: Option<String>, url: Option<String>) -> Self {
        Self {
            title,
            content,
            url,
        }
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    pub fn title_or_placeholder(&self) -> &str {
        self.title().unwrap_or(NO_TITLE)
    }

    pub fn content_or_placeholder(&self) -> &str {
        self.content().unwrap_or(NO_CONTENT)
    }

    pub fn url_or_placeholder(&self) -> &str {
        self.url().unwrap_or(NO_URL)
    }
}
