pub mod directors;
pub mod grid;

pub use directors::{director_report, DirectorReport, DirectorStats};
pub use grid::{GridCell, RatingGrid};

use anyhow::{Context, Result};
use episcrape_model::EpisodeRecord;
use std::fs;
use std::path::{Path, PathBuf};

/// Read and concatenate episode tables, in the order given.
pub fn load_tables(paths: &[PathBuf]) -> Result<Vec<EpisodeRecord>> {
    let mut all = Vec::new();
    for path in paths {
        let records = episcrape_model::read_table(path)
            .with_context(|| format!("Failed to read episode table {}", path.display()))?;
        tracing::info!(path = %path.display(), rows = records.len(), "Loaded episode table");
        all.extend(records);
    }
    anyhow::ensure!(!all.is_empty(), "No episodes found in the input tables");
    Ok(all)
}

/// Director performance summary over one or more tables.
///
/// Writes JSON to `json_out` when given, otherwise prints a table.
pub fn report_directors(
    inputs: &[PathBuf],
    min_episodes: usize,
    json_out: Option<&Path>,
) -> Result<DirectorReport> {
    let records = load_tables(inputs)?;
    let report = director_report(&records, min_episodes);
    tracing::info!(
        directors = report.directors.len(),
        min_episodes,
        overall = format!("{:.2}", report.overall_avg_rating),
        "Computed director statistics"
    );

    match json_out {
        Some(path) => write_json(path, &report)?,
        None => print!("{}", render_directors(&report)),
    }
    Ok(report)
}

/// Season x episode rating grid for one table.
pub fn report_grid(input: &Path, json_out: Option<&Path>) -> Result<RatingGrid> {
    let records = load_tables(&[input.to_path_buf()])?;
    let grid = RatingGrid::build(&records);
    tracing::info!(
        seasons = grid.max_season,
        max_episode = grid.max_episode,
        cells = grid.cells.len(),
        "Built rating grid"
    );

    match json_out {
        Some(path) => write_json(path, &grid)?,
        None => print!("{}", grid.render()),
    }
    Ok(grid)
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, &json).with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), "Wrote report JSON");
    Ok(())
}

/// Plain-text director table, best average first.
pub fn render_directors(report: &DirectorReport) -> String {
    let width = report
        .directors
        .iter()
        .map(|d| d.director.chars().count())
        .max()
        .unwrap_or(0)
        .max("Director".len());

    let mut out = format!("{:<width$}  {:>6}  {:>5}  {:>3}\n", "Director", "Avg", "Std", "Eps");
    for d in &report.directors {
        let std = d
            .rating_std
            .map(|s| format!("{s:.2}"))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<width$}  {:>6.2}  {:>5}  {:>3}\n",
            d.director, d.avg_rating, std, d.episode_count
        ));
    }
    out.push_str(&format!(
        "Overall average rating: {:.1} (directors with >= {} episodes shown)\n",
        report.overall_avg_rating, report.min_episodes
    ));
    out
}
