use serde::{Deserialize, Serialize};

/// Outcome of probing one platform for one username.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResult {
    #[serde(rename = "site", alias = "platform")]
    pub platform: String,
    pub url: String,
    pub found: bool,
}

impl ProbeResult {
    pub fn new(platform: impl Into<String>, url: impl Into<String>, found: bool) -> Self {
        Self {
            platform: platform.into(),
            url: url.into(),
            found,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Txt,
    Csv,
}

impl OutputFormat {
    /// Guess the format from a file extension; unknown extensions are plain text.
    pub fn from_path(path: &std::path::Path) -> Self {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .as_deref()
        {
            Some("json") => OutputFormat::Json,
            Some("csv") => OutputFormat::Csv,
            _ => OutputFormat::Txt,
        }
    }
}
