use anyhow::{Context, Result};
use episcrape_model::EpisodeRecord;
use std::fs;
use std::path::Path;

/// Write the episode table for one show, replacing any previous file.
///
/// Creates the parent directory if needed.
pub fn write_episodes(records: &[EpisodeRecord], path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    episcrape_model::write_table(records, path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), rows = records.len(), "Wrote episode table");
    Ok(())
}

/// Save a page's raw HTML for re-examining selectors without re-fetching.
pub fn cache_html(output_dir: &Path, external_id: &str, html: &str) -> Result<()> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join(format!("{external_id}.html"));
    fs::write(&path, html)?;
    tracing::debug!(path = %path.display(), bytes = html.len(), "Cached raw HTML");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out/nested/episodes.csv");
        write_episodes(&[], &path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_cache_html() {
        let dir = tempfile::tempdir().unwrap();
        cache_html(dir.path(), "tt0959621", "<html></html>").unwrap();
        let saved = fs::read_to_string(dir.path().join("tt0959621.html")).unwrap();
        assert_eq!(saved, "<html></html>");
    }
}
