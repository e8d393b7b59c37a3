use std::{fs, path::Path};

use serde::Deserialize;

use crate::core::error::FinderError;

pub const DEFAULT_CONFIG_PATH: &str = "config/userfinder.toml";
pub const DEFAULT_TIMEOUT_MS: u64 = 8_000;
pub const DEFAULT_CONCURRENCY: usize = 15;
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/117.0";

#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    /// URL template; `{u}` is replaced by the encoded username.
    pub url: String,
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default = "timeout_default")]
    pub timeout_ms: u64,
    #[serde(default = "concurrency_default")]
    pub max_concurrent_requests: usize,
    #[serde(default = "user_agent_default")]
    pub user_agent: String,
    #[serde(default = "default_sites")]
    pub sites: Vec<SiteConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            max_concurrent_requests: DEFAULT_CONCURRENCY,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            sites: default_sites(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), FinderError> {
        if self.timeout_ms == 0 {
            return Err(FinderError::Config("timeout_ms must be greater than 0".into()));
        }
        if self.max_concurrent_requests == 0 {
            return Err(FinderError::Config(
                "max_concurrent_requests must be at least 1".into(),
            ));
        }
        Ok(())
    }

    pub fn enabled_sites(&self) -> impl Iterator<Item = &SiteConfig> {
        self.sites.iter().filter(|s| s.enabled)
    }
}

pub fn load_config(path: Option<&str>) -> Result<AppConfig, FinderError> {
    let default_path = Path::new(DEFAULT_CONFIG_PATH);
    let path = path.map(Path::new).unwrap_or(default_path);

    if !path.exists() {
        tracing::debug!("no config at {}, using built-in defaults", path.display());
        return Ok(AppConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| FinderError::Config(e.to_string()))?;
    let cfg = parse_config(&content)?;
    tracing::info!("config loaded from {}", path.display());
    Ok(cfg)
}

pub fn parse_config(content: &str) -> Result<AppConfig, FinderError> {
    let cfg: AppConfig =
        toml::from_str(content).map_err(|e| FinderError::Config(e.to_string()))?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn apply_site_filter(cfg: AppConfig, names: Option<&[String]>) -> AppConfig {
    if let Some(list) = names {
        let mut cfg = cfg;
        let lowered: Vec<String> = list.iter().map(|s| s.trim().to_lowercase()).collect();
        for name in &lowered {
            if !cfg.sites.iter().any(|s| s.name.to_lowercase() == *name) {
                tracing::warn!("unknown site in filter: {}", name);
            }
        }
        for s in cfg.sites.iter_mut() {
            s.enabled = lowered.iter().any(|n| n == &s.name.to_lowercase());
        }
        return cfg;
    }
    cfg
}

fn enabled_default() -> bool {
    true
}

fn timeout_default() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn concurrency_default() -> usize {
    DEFAULT_CONCURRENCY
}

fn user_agent_default() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_sites() -> Vec<SiteConfig> {
    [
        ("Instagram", "https://www.instagram.com/{u}/"),
        ("Facebook", "https://www.facebook.com/{u}"),
        ("Twitter", "https://twitter.com/{u}"),
        ("YouTube", "https://www.youtube.com/@{u}"),
        ("Reddit", "https://www.reddit.com/user/{u}"),
        ("GitHub", "https://github.com/{u}"),
        ("Pinterest", "https://www.pinterest.com/{u}/"),
        ("SoundCloud", "https://soundcloud.com/{u}"),
        ("Steam", "https://steamcommunity.com/id/{u}"),
        ("Flickr", "https://www.flickr.com/people/{u}/"),
        ("VK", "https://vk.com/{u}"),
        ("Spotify", "https://open.spotify.com/user/{u}"),
        ("Mixcloud", "https://www.mixcloud.com/{u}/"),
        ("Behance", "https://www.behance.net/{u}"),
        ("Keybase", "https://keybase.io/{u}"),
        ("Instructables", "https://www.instructables.com/member/{u}/"),
        ("Badoo", "https://www.badoo.com/en/{u}"),
        ("CashMe", "https://cash.me/{u}"),
        ("DeviantArt", "https://www.deviantart.com/{u}"),
        ("Tumblr", "https://{u}.tumblr.com/"),
        ("WordPress", "https://{u}.wordpress.com/"),
        ("Medium", "https://medium.com/@{u}"),
        ("GoodReads", "https://www.goodreads.com/{u}"),
        ("LinkedIn", "https://www.linkedin.com/in/{u}"),
        ("Telegram", "https://t.me/{u}"),
    ]
    .into_iter()
    .map(|(name, url)| SiteConfig {
        name: name.to_string(),
        url: url.to_string(),
        enabled: true,
    })
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_builtin_sites() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.sites.len(), 25);
        assert_eq!(cfg.timeout_ms, 8_000);
        assert_eq!(cfg.max_concurrent_requests, 15);
        assert!(cfg.sites.iter().all(|s| s.url.matches("{u}").count() == 1));
    }

    #[test]
    fn partial_toml_falls_back_to_defaults() {
        let cfg = parse_config("max_concurrent_requests = 4\n").unwrap();
        assert_eq!(cfg.max_concurrent_requests, 4);
        assert_eq!(cfg.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(cfg.sites.len(), 25);
    }

    #[test]
    fn custom_sites_replace_builtin_list() {
        let cfg = parse_config(
            r#"
            [[sites]]
            name = "Example"
            url = "https://example.com/{u}"

            [[sites]]
            name = "Off"
            url = "https://off.example.com/{u}"
            enabled = false
            "#,
        )
        .unwrap();
        assert_eq!(cfg.sites.len(), 2);
        assert_eq!(cfg.enabled_sites().count(), 1);
    }

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = parse_config("max_concurrent_requests = 0\n").unwrap_err();
        assert!(matches!(err, FinderError::Config(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load_config(Some("does/not/exist.toml")).unwrap();
        assert_eq!(cfg.sites.len(), 25);
    }

    #[test]
    fn site_filter_is_case_insensitive() {
        let names = vec!["github".to_string(), "REDDIT".to_string()];
        let cfg = apply_site_filter(AppConfig::default(), Some(&names));
        let enabled: Vec<&str> = cfg.enabled_sites().map(|s| s.name.as_str()).collect();
        assert_eq!(enabled, vec!["Reddit", "GitHub"]);
    }
}
