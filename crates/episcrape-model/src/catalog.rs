use crate::record::EpisodeId;
use crate::shows;
use serde::{Deserialize, Serialize};

/// The hand-curated identifier list for one show.
///
/// Season order and identifier order are significant: the position of an
/// identifier within its season gives the episode number (1-based).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Display title of the show (e.g., "Breaking Bad").
    pub show: String,
    /// Default file name for this show's episode table.
    pub output_file: String,
    pub seasons: Vec<SeasonIds>,
}

/// Ordered external identifiers for one season.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonIds {
    pub season: u32,
    pub ids: Vec<String>,
}

/// One catalog slot: an identifier plus the position it defines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry<'a> {
    pub season: u32,
    pub episode: u32,
    pub external_id: &'a str,
}

impl CatalogEntry<'_> {
    pub fn episode_id(&self) -> EpisodeId {
        EpisodeId::new(self.season, self.episode)
    }
}

impl Catalog {
    /// Enumerate every slot in catalog order.
    pub fn entries(&self) -> impl Iterator<Item = CatalogEntry<'_>> + '_ {
        self.seasons.iter().flat_map(|season| {
            season.ids.iter().zip(1u32..).map(move |(id, episode)| CatalogEntry {
                season: season.season,
                episode,
                external_id: id.as_str(),
            })
        })
    }

    /// Total number of identifiers across all seasons.
    pub fn len(&self) -> usize {
        self.seasons.iter().map(|s| s.ids.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up the slot for a season/episode pair.
    pub fn entry(&self, season: u32, episode: u32) -> Option<CatalogEntry<'_>> {
        self.entries().find(|e| e.season == season && e.episode == episode)
    }
}

/// The shows with a built-in catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Show {
    BreakingBad,
    BetterCallSaul,
}

impl Show {
    pub const ALL: [Show; 2] = [Show::BreakingBad, Show::BetterCallSaul];

    pub fn title(self) -> &'static str {
        match self {
            Show::BreakingBad => "Breaking Bad",
            Show::BetterCallSaul => "Better Call Saul",
        }
    }

    /// Build the show's catalog from the compiled-in identifier lists.
    pub fn catalog(self) -> Catalog {
        let (output_file, seasons) = match self {
            Show::BreakingBad => (
                "breaking_bad_episodes_full.csv",
                shows::BREAKING_BAD,
            ),
            Show::BetterCallSaul => (
                "better_call_saul_episodes_full.csv",
                shows::BETTER_CALL_SAUL,
            ),
        };

        Catalog {
            show: self.title().to_string(),
            output_file: output_file.to_string(),
            seasons: seasons
                .iter()
                .zip(1u32..)
                .map(|(ids, season)| SeasonIds {
                    season,
                    ids: ids.iter().map(|id| id.to_string()).collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_builtin_season_sizes() {
        let bb = Show::BreakingBad.catalog();
        let sizes: Vec<usize> = bb.seasons.iter().map(|s| s.ids.len()).collect();
        assert_eq!(sizes, vec![7, 13, 13, 13, 16]);
        assert_eq!(bb.len(), 62);

        let bcs = Show::BetterCallSaul.catalog();
        let sizes: Vec<usize> = bcs.seasons.iter().map(|s| s.ids.len()).collect();
        assert_eq!(sizes, vec![10, 10, 10, 10, 10, 13]);
        assert_eq!(bcs.len(), 63);
    }

    #[test]
    fn test_entries_follow_catalog_order() {
        for show in Show::ALL {
            let catalog = show.catalog();
            for season in &catalog.seasons {
                let entries: Vec<_> = catalog
                    .entries()
                    .filter(|e| e.season == season.season)
                    .collect();
                assert_eq!(entries.len(), season.ids.len());
                for (i, entry) in entries.iter().enumerate() {
                    assert_eq!(entry.episode as usize, i + 1);
                    assert_eq!(entry.external_id, season.ids[i]);
                    assert_eq!(
                        entry.episode_id().as_str(),
                        format!("S{:02}E{:02}", season.season, i + 1)
                    );
                }
            }
        }
    }

    #[test]
    fn test_builtin_ids_unique() {
        for show in Show::ALL {
            let catalog = show.catalog();
            let ids: HashSet<&str> = catalog.entries().map(|e| e.external_id).collect();
            assert_eq!(ids.len(), catalog.len(), "duplicate id in {}", catalog.show);
        }
    }

    #[test]
    fn test_entry_lookup() {
        let catalog = Show::BreakingBad.catalog();
        let pilot = catalog.entry(1, 1).unwrap();
        assert_eq!(pilot.external_id, "tt0959621");
        let finale = catalog.entry(5, 16).unwrap();
        assert_eq!(finale.external_id, "tt2301455");
        assert!(catalog.entry(1, 8).is_none());
    }
}
