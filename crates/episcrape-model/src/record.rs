use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Column order of an episode table, as written to disk.
pub const COLUMNS: [&str; 9] = [
    "Season",
    "Episode",
    "EpisodeID",
    "TTID",
    "Title",
    "Director",
    "AirDate",
    "Rating",
    "Votes",
];

/// Separator used when joining several director names into one field.
pub const DIRECTOR_SEPARATOR: &str = ", ";

/// One row of an episode table.
///
/// Field order matches [`COLUMNS`]; the serde renames give the on-disk
/// header names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodeRecord {
    #[serde(rename = "Season")]
    pub season: u32,
    #[serde(rename = "Episode")]
    pub episode: u32,
    #[serde(rename = "EpisodeID")]
    pub episode_id: EpisodeId,
    /// Source identifier the detail page was fetched with (e.g., "tt0959621").
    #[serde(rename = "TTID")]
    pub external_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    /// Comma-joined director names, empty when none were found.
    #[serde(rename = "Director")]
    pub director: String,
    /// `YYYY-MM-DD` when the source date parsed, otherwise the source text.
    #[serde(rename = "AirDate")]
    pub air_date: String,
    #[serde(rename = "Rating")]
    pub rating: f64,
    #[serde(rename = "Votes")]
    pub votes: u64,
}

/// Season/episode code in the form `S01E02`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpisodeId(String);

#[derive(Debug, Error, PartialEq, Eq)]
#[error("malformed episode ID '{0}': expected SxxEyy")]
pub struct EpisodeIdError(pub String);

impl EpisodeId {
    pub fn new(season: u32, episode: u32) -> Self {
        Self(format!("S{season:02}E{episode:02}"))
    }

    /// Parse an `SxxEyy` code back into `(season, episode)`.
    ///
    /// Only the exact form [`EpisodeId::new`] produces is accepted, so
    /// `S001E01` and `S+1E01` are errors.
    pub fn parse(s: &str) -> Result<(u32, u32), EpisodeIdError> {
        let err = || EpisodeIdError(s.to_string());
        let rest = s.strip_prefix('S').ok_or_else(err)?;
        let (season, episode) = rest.split_once('E').ok_or_else(err)?;
        let season: u32 = season.parse().map_err(|_| err())?;
        let episode: u32 = episode.parse().map_err(|_| err())?;
        if Self::new(season, episode).as_str() != s {
            return Err(err());
        }
        Ok((season, episode))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EpisodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
