use anyhow::{Context, Result};
use episcrape_model::{Catalog, EpisodeId, EpisodeRecord};
use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("row {row}: season and episode must be positive, got S{season} E{episode}")]
    NonPositive { row: usize, season: u32, episode: u32 },

    #[error("row {row}: episode ID {found} does not match season {season} episode {episode}")]
    EpisodeIdMismatch {
        row: usize,
        found: String,
        season: u32,
        episode: u32,
    },

    #[error("duplicate episode ID: {0}")]
    DuplicateEpisodeId(String),

    #[error("duplicate TTID: {0}")]
    DuplicateExternalId(String),

    #[error("row {row}: {episode_id} is out of order")]
    OutOfOrder { row: usize, episode_id: String },

    #[error("row {row}: rating {rating} outside 0-10")]
    RatingOutOfRange { row: usize, rating: f64 },

    #[error("{episode_id} is not in the catalog")]
    NotInCatalog { episode_id: String },

    #[error("{episode_id}: TTID {found} but the catalog lists {expected}")]
    CatalogMismatch {
        episode_id: String,
        found: String,
        expected: String,
    },
}

/// Validate the episode table at `path`, optionally against a catalog.
///
/// Fails if the file cannot be read or any check finds a problem.
pub fn validate(path: &Path, catalog: Option<&Catalog>) -> Result<()> {
    let records = episcrape_model::read_table(path)
        .with_context(|| format!("Failed to read episode table {}", path.display()))?;

    let mut errors = validate_table(&records);
    if let Some(catalog) = catalog {
        errors.extend(validate_against_catalog(&records, catalog));
        let coverage = CoverageReport::new(&records, catalog);
        tracing::info!(
            show = %catalog.show,
            catalog = coverage.catalog,
            present = coverage.present,
            missing = coverage.missing.len(),
            "Catalog coverage"
        );
        for id in &coverage.missing {
            tracing::info!(episode = %id, "Missing from table");
        }
    }

    if !errors.is_empty() {
        for e in &errors {
            tracing::error!("{e}");
        }
        anyhow::bail!("{} validation errors in {}", errors.len(), path.display());
    }

    tracing::info!(path = %path.display(), rows = records.len(), "Episode table is valid");
    Ok(())
}

/// Check a table for internal consistency.
pub fn validate_table(records: &[EpisodeRecord]) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let mut seen_episode_ids = HashSet::new();
    let mut seen_external_ids = HashSet::new();
    let mut prev: Option<(u32, u32)> = None;

    for (i, record) in records.iter().enumerate() {
        let row = i + 1;

        if record.season == 0 || record.episode == 0 {
            errors.push(ValidationError::NonPositive {
                row,
                season: record.season,
                episode: record.episode,
            });
        }

        if record.episode_id != EpisodeId::new(record.season, record.episode) {
            errors.push(ValidationError::EpisodeIdMismatch {
                row,
                found: record.episode_id.to_string(),
                season: record.season,
                episode: record.episode,
            });
        }

        if !seen_episode_ids.insert(record.episode_id.as_str()) {
            errors.push(ValidationError::DuplicateEpisodeId(record.episode_id.to_string()));
        }
        if !seen_external_ids.insert(record.external_id.as_str()) {
            errors.push(ValidationError::DuplicateExternalId(record.external_id.clone()));
        }

        let slot = (record.season, record.episode);
        if prev.is_some_and(|p| slot <= p) {
            errors.push(ValidationError::OutOfOrder {
                row,
                episode_id: record.episode_id.to_string(),
            });
        }
        prev = Some(slot);

        if !(0.0..=10.0).contains(&record.rating) {
            errors.push(ValidationError::RatingOutOfRange {
                row,
                rating: record.rating,
            });
        }
    }

    errors
}

/// Check that every row sits in the catalog slot its TTID belongs to.
pub fn validate_against_catalog(
    records: &[EpisodeRecord],
    catalog: &Catalog,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    for record in records {
        match catalog.entry(record.season, record.episode) {
            None => errors.push(ValidationError::NotInCatalog {
                episode_id: record.episode_id.to_string(),
            }),
            Some(entry) if entry.external_id != record.external_id => {
                errors.push(ValidationError::CatalogMismatch {
                    episode_id: record.episode_id.to_string(),
                    found: record.external_id.clone(),
                    expected: entry.external_id.to_string(),
                })
            }
            Some(_) => {}
        }
    }
    errors
}

/// How much of a catalog a table covers. Gaps are skipped episodes.
#[derive(Debug, Clone)]
pub struct CoverageReport {
    pub catalog: usize,
    pub present: usize,
    pub missing: Vec<EpisodeId>,
}

impl CoverageReport {
    pub fn new(records: &[EpisodeRecord], catalog: &Catalog) -> Self {
        let present: HashSet<&str> = records.iter().map(|r| r.external_id.as_str()).collect();
        let missing: Vec<EpisodeId> = catalog
            .entries()
            .filter(|e| !present.contains(e.external_id))
            .map(|e| e.episode_id())
            .collect();
        Self {
            catalog: catalog.len(),
            present: catalog.len() - missing.len(),
            missing,
        }
    }
}
