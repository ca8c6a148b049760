use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Everything the acquisition pipeline needs besides the catalog itself.
///
/// Defaults target the current IMDb title page layout. A JSON file may
/// override any subset of fields; missing fields keep their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquireConfig {
    pub fetch: FetchConfig,
    pub extract: ExtractConfig,
    pub pacing: PacingConfig,
    /// When set, the raw HTML of every fetched page is saved here as `<id>.html`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_dir: Option<PathBuf>,
}

impl AcquireConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }
}

/// How a DOM element is located while waiting in the live browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locator {
    Css(String),
    Xpath(String),
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(s) => write!(f, "css `{s}`"),
            Locator::Xpath(s) => write!(f, "xpath `{s}`"),
        }
    }
}

/// A bounded wait for one element to appear.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WaitFor {
    pub locator: Locator,
    pub timeout_secs: f64,
    /// A required wait that times out skips the episode; an optional one is ignored.
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl WaitFor {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs_f64(self.timeout_secs.max(0.0))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Site root; detail pages live at `{base_url}/title/{id}/`.
    pub base_url: String,
    /// Marker whose presence means the page is ready for extraction.
    pub ready: WaitFor,
    /// Further waits performed, in order, after the marker appears.
    pub waits: Vec<WaitFor>,
}

impl FetchConfig {
    pub fn page_url(&self, external_id: &str) -> String {
        format!("{}/title/{external_id}/", self.base_url.trim_end_matches('/'))
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.imdb.com".to_string(),
            ready: WaitFor {
                locator: Locator::Css("[data-testid='hero__primary-text']".to_string()),
                timeout_secs: 15.0,
                required: true,
            },
            waits: vec![
                WaitFor {
                    locator: Locator::Xpath(
                        "//li[contains(@class, 'ipc-inline-list__item') and contains(text(), 'Episode aired')]"
                            .to_string(),
                    ),
                    timeout_secs: 10.0,
                    required: true,
                },
                WaitFor {
                    locator: Locator::Xpath(
                        "//li[.//span[text()='Director' or text()='Directors']]".to_string(),
                    ),
                    timeout_secs: 5.0,
                    required: false,
                },
            ],
        }
    }
}

/// CSS selectors and match phrases used against the page snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    pub title: String,
    pub rating: String,
    pub votes: String,
    /// Candidate elements for the air date; the first whose text contains
    /// `air_date_phrase` is used.
    pub air_date_item: String,
    pub air_date_phrase: String,
    /// Candidate credit rows; the first with a `credit_label` whose text is
    /// one of `director_labels` is the director section.
    pub credit_item: String,
    pub credit_label: String,
    pub director_labels: Vec<String>,
    pub director_link: String,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            title: "[data-testid='hero__primary-text']".to_string(),
            rating: "span[class*='imUuxf']".to_string(),
            votes: "div[class*='dwhNqC']".to_string(),
            air_date_item: "li.ipc-inline-list__item".to_string(),
            air_date_phrase: "Episode aired".to_string(),
            credit_item: "li".to_string(),
            credit_label: "span".to_string(),
            director_labels: vec!["Director".to_string(), "Directors".to_string()],
            director_link: "a.ipc-metadata-list-item__list-content-item--link".to_string(),
        }
    }
}

/// Randomized delay between consecutive page loads.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl PacingConfig {
    /// No delay at all; used by tests and `--no-pacing`.
    pub fn none() -> Self {
        Self {
            min_secs: 0.0,
            max_secs: 0.0,
        }
    }

    /// Draw the next delay uniformly from `[min_secs, max_secs]`.
    pub fn next_delay<R: rand::Rng>(&self, rng: &mut R) -> Duration {
        let lo = self.min_secs.max(0.0);
        let hi = self.max_secs.max(lo);
        if hi <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(rng.random_range(lo..=hi))
    }
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            min_secs: 1.5,
            max_secs: 3.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url() {
        let mut fetch = FetchConfig::default();
        assert_eq!(fetch.page_url("tt0959621"), "https://www.imdb.com/title/tt0959621/");
        fetch.base_url = "file:///tmp/pages/".to_string();
        assert_eq!(fetch.page_url("tt1"), "file:///tmp/pages/title/tt1/");
    }

    #[test]
    fn test_partial_json_override() {
        let json = r#"{
            "fetch": { "base_url": "http://localhost:8000" },
            "pacing": { "min_secs": 0.5, "max_secs": 1.0 }
        }"#;
        let config: AcquireConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.fetch.base_url, "http://localhost:8000");
        assert_eq!(config.fetch.ready.timeout(), Duration::from_secs(15));
        assert_eq!(config.fetch.waits.len(), 2);
        assert_eq!(config.extract.air_date_phrase, "Episode aired");
        assert_eq!(config.pacing.min_secs, 0.5);
        assert!(config.cache_dir.is_none());
    }

    #[test]
    fn test_wait_locator_json() {
        let json = r#"{ "locator": { "xpath": "//h1" }, "timeout_secs": 2.5 }"#;
        let wait: WaitFor = serde_json::from_str(json).unwrap();
        assert_eq!(wait.locator, Locator::Xpath("//h1".to_string()));
        assert!(wait.required);
        assert_eq!(wait.timeout(), Duration::from_millis(2500));
    }

    #[test]
    fn test_pacing_bounds() {
        let pacing = PacingConfig::default();
        let mut rng = rand::rng();
        for _ in 0..100 {
            let delay = pacing.next_delay(&mut rng);
            assert!(delay >= Duration::from_millis(1500));
            assert!(delay <= Duration::from_millis(3500));
        }
        assert_eq!(PacingConfig::none().next_delay(&mut rng), Duration::ZERO);
    }
}
