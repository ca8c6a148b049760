use crate::config::AcquireConfig;
use crate::extract::{ExtractError, ExtractedFields, Extractor};
use crate::output;
use crate::source::{FetchError, PageSource};
use anyhow::Result;
use episcrape_model::{Catalog, CatalogEntry, EpisodeId, EpisodeRecord, DIRECTOR_SEPARATOR};
use thiserror::Error;

/// Why an episode was left out of the table.
#[derive(Debug, Error)]
pub enum SkipReason {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
}

/// An episode that was attempted but not recorded.
#[derive(Debug)]
pub struct Skip {
    pub episode_id: EpisodeId,
    pub external_id: String,
    pub reason: SkipReason,
}

/// Result of processing one catalog entry.
#[derive(Debug)]
pub enum EpisodeOutcome {
    Fetched(EpisodeRecord),
    Skipped(Skip),
}

/// Everything one pass over a catalog produced.
#[derive(Debug, Default)]
pub struct RunSummary {
    /// Successfully assembled records, in fetch order.
    pub records: Vec<EpisodeRecord>,
    pub skipped: Vec<Skip>,
}

impl RunSummary {
    pub fn attempted(&self) -> usize {
        self.records.len() + self.skipped.len()
    }
}

/// Combine extracted fields with the catalog slot they were fetched for.
pub fn assemble(entry: &CatalogEntry<'_>, fields: ExtractedFields) -> EpisodeRecord {
    EpisodeRecord {
        season: entry.season,
        episode: entry.episode,
        episode_id: entry.episode_id(),
        external_id: entry.external_id.to_string(),
        title: fields.title,
        director: fields.directors.join(DIRECTOR_SEPARATOR),
        air_date: fields.air_date,
        rating: fields.rating,
        votes: fields.votes,
    }
}

/// Fetch, extract and assemble a single episode.
///
/// Never fails: any problem becomes [`EpisodeOutcome::Skipped`].
pub fn fetch_episode<S: PageSource>(
    source: &mut S,
    extractor: &Extractor,
    entry: &CatalogEntry<'_>,
    config: &AcquireConfig,
) -> EpisodeOutcome {
    let skip = |reason: SkipReason| {
        EpisodeOutcome::Skipped(Skip {
            episode_id: entry.episode_id(),
            external_id: entry.external_id.to_string(),
            reason,
        })
    };

    let page = match source.navigate(entry.external_id) {
        Ok(page) => page,
        Err(e) => return skip(e.into()),
    };

    if let Some(dir) = &config.cache_dir {
        if let Err(e) = output::cache_html(dir, entry.external_id, page.html()) {
            tracing::warn!(id = %entry.external_id, "Could not cache page HTML: {e:#}");
        }
    }

    match extractor.extract(&page) {
        Ok(fields) => EpisodeOutcome::Fetched(assemble(entry, fields)),
        Err(e) => skip(e.into()),
    }
}

/// Process every catalog entry once, in order, pausing between pages.
///
/// Returns an error only for setup problems detected before the first
/// fetch; per-episode failures are collected in [`RunSummary::skipped`].
pub fn run<S: PageSource>(
    source: &mut S,
    catalog: &Catalog,
    config: &AcquireConfig,
) -> Result<RunSummary> {
    let extractor = Extractor::new(&config.extract)?;
    let mut rng = rand::rng();
    let mut summary = RunSummary::default();

    tracing::info!(show = %catalog.show, episodes = catalog.len(), "Starting acquisition");

    let mut current_season = None;
    for entry in catalog.entries() {
        if current_season != Some(entry.season) {
            tracing::info!(show = %catalog.show, season = entry.season, "Processing season");
            current_season = Some(entry.season);
        }
        tracing::info!(episode = %entry.episode_id(), id = %entry.external_id, "Fetching");

        match fetch_episode(source, &extractor, &entry, config) {
            EpisodeOutcome::Fetched(record) => {
                tracing::debug!(
                    episode = %record.episode_id,
                    title = %record.title,
                    rating = record.rating,
                    votes = record.votes,
                    "Fetched"
                );
                summary.records.push(record);
            }
            EpisodeOutcome::Skipped(skip) => {
                tracing::warn!(
                    episode = %skip.episode_id,
                    id = %skip.external_id,
                    "Skipping episode: {}",
                    skip.reason
                );
                summary.skipped.push(skip);
            }
        }

        let delay = config.pacing.next_delay(&mut rng);
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }

    tracing::info!(
        show = %catalog.show,
        fetched = summary.records.len(),
        skipped = summary.skipped.len(),
        "Acquisition finished"
    );
    Ok(summary)
}
