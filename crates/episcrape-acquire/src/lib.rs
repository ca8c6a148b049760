pub mod browser;
pub mod config;
pub mod extract;
pub mod normalize;
pub mod output;
pub mod pipeline;
pub mod source;

pub use browser::{BrowserOptions, ChromeSource};
pub use config::AcquireConfig;
pub use pipeline::{EpisodeOutcome, RunSummary, Skip, SkipReason};
pub use source::{FetchError, Page, PageSource};

use anyhow::Result;
use episcrape_model::Catalog;
use std::path::Path;

/// Acquire every episode in `catalog` and write the table to `output_path`.
///
/// The table is written once, after the last page, and replaces any
/// earlier file at that path.
pub fn acquire<S: PageSource>(
    source: &mut S,
    catalog: &Catalog,
    config: &AcquireConfig,
    output_path: &Path,
) -> Result<RunSummary> {
    let summary = pipeline::run(source, catalog, config)?;
    output::write_episodes(&summary.records, output_path)?;
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Locator, PacingConfig};
    use episcrape_model::{read_table, SeasonIds};
    use std::time::Duration;

    /// Every page is the same episode except `broken`, which never loads.
    struct OneBroken {
        broken: &'static str,
    }

    impl PageSource for OneBroken {
        fn navigate(&mut self, external_id: &str) -> Result<Page, FetchError> {
            if external_id == self.broken {
                return Err(FetchError::MarkerMissing {
                    locator: Locator::Css("h1".to_string()),
                    waited: Duration::from_secs(15),
                    message: "timed out".to_string(),
                });
            }
            let html = r#"<html><body>
                <h1 data-testid="hero__primary-text">Episode</h1>
                <li class="ipc-inline-list__item">Episode aired Apr 1, 2015</li>
                <span class="imUuxf">8.1</span>
                <div class="dwhNqC">12K</div>
            </body></html>"#;
            Ok(Page::new(external_id, "fixture", html.to_string()))
        }
    }

    fn catalog() -> Catalog {
        Catalog {
            show: "Test Show".to_string(),
            output_file: "test.csv".to_string(),
            seasons: vec![SeasonIds {
                season: 3,
                ids: vec!["tt1".into(), "tt2".into(), "tt3".into(), "tt4".into()],
            }],
        }
    }

    fn config() -> AcquireConfig {
        AcquireConfig {
            pacing: PacingConfig::none(),
            ..AcquireConfig::default()
        }
    }

    #[test]
    fn test_acquire_writes_n_minus_one_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episodes.csv");

        let summary =
            acquire(&mut OneBroken { broken: "tt3" }, &catalog(), &config(), &path).unwrap();
        assert_eq!(summary.skipped.len(), 1);

        let rows = read_table(&path).unwrap();
        assert_eq!(rows.len(), 3);
        let ids: Vec<&str> = rows.iter().map(|r| r.episode_id.as_str()).collect();
        assert_eq!(ids, vec!["S03E01", "S03E02", "S03E04"]);
        assert!(rows.iter().all(|r| r.director.is_empty()));
        assert!(rows.iter().all(|r| r.votes == 12_000 && r.air_date == "2015-04-01"));
    }

    #[test]
    fn test_rerun_rewrites_identical_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("episodes.csv");

        acquire(&mut OneBroken { broken: "tt3" }, &catalog(), &config(), &path).unwrap();
        let first = std::fs::read(&path).unwrap();

        acquire(&mut OneBroken { broken: "tt3" }, &catalog(), &config(), &path).unwrap();
        let second = std::fs::read(&path).unwrap();

        assert!(!first.is_empty());
        assert_eq!(first, second);
    }
}
