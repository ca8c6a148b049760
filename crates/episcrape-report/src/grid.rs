use episcrape_model::EpisodeRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Rating boundaries of the colour bins: bin `i` covers `[BINS[i], BINS[i + 1])`.
pub const BINS: [f64; 6] = [7.5, 8.0, 8.5, 9.0, 9.5, 10.0];

/// Fill colour for each bin, from yellow (7.5-8) to deep green (9.5-10).
pub const COLORS: [&str; 5] = ["#ffff00", "#d9f0a3", "#78c679", "#238443", "#005a32"];

/// Ratings from here up are labelled in white for contrast.
const LIGHT_TEXT_FROM: f64 = 9.0;

/// Index into [`COLORS`] for a rating.
///
/// Ratings below the first boundary share the first colour; ratings at or
/// above the last boundary share the last.
pub fn color_bin(rating: f64) -> usize {
    BINS.windows(2)
        .position(|w| rating >= w[0] && rating < w[1])
        .unwrap_or(if rating < BINS[0] { 0 } else { COLORS.len() - 1 })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridCell {
    pub season: u32,
    pub episode: u32,
    pub rating: f64,
    pub bin: usize,
    pub fill: &'static str,
    pub text_color: &'static str,
}

impl GridCell {
    fn new(season: u32, episode: u32, rating: f64) -> Self {
        let bin = color_bin(rating);
        Self {
            season,
            episode,
            rating,
            bin,
            fill: COLORS[bin],
            text_color: if rating < LIGHT_TEXT_FROM { "black" } else { "white" },
        }
    }
}

/// Season x episode rating matrix.
#[derive(Debug, Clone, Serialize)]
pub struct RatingGrid {
    pub max_season: u32,
    pub max_episode: u32,
    /// Cells ordered by season, then episode. Missing episodes have no cell.
    pub cells: Vec<GridCell>,
}

impl RatingGrid {
    pub fn build(records: &[EpisodeRecord]) -> Self {
        let mut by_slot: BTreeMap<(u32, u32), f64> = BTreeMap::new();
        for record in records {
            if by_slot.insert((record.season, record.episode), record.rating).is_some() {
                tracing::warn!(
                    episode = %record.episode_id,
                    "Duplicate episode in grid input, keeping last"
                );
            }
        }

        let cells: Vec<GridCell> = by_slot
            .into_iter()
            .map(|((season, episode), rating)| GridCell::new(season, episode, rating))
            .collect();

        Self {
            max_season: cells.iter().map(|c| c.season).max().unwrap_or(0),
            max_episode: cells.iter().map(|c| c.episode).max().unwrap_or(0),
            cells,
        }
    }

    pub fn get(&self, season: u32, episode: u32) -> Option<&GridCell> {
        self.cells
            .iter()
            .find(|c| c.season == season && c.episode == episode)
    }

    /// Plain-text rendering: one column per season, one row per episode.
    pub fn render(&self) -> String {
        let mut out = String::from("Ep ");
        for season in 1..=self.max_season {
            out.push_str(&format!(" S{season:<3}"));
        }
        out.push('\n');

        for episode in 1..=self.max_episode {
            out.push_str(&format!("{episode:>2} "));
            for season in 1..=self.max_season {
                match self.get(season, episode) {
                    Some(cell) => out.push_str(&format!(" {:>4.1}", cell.rating)),
                    None => out.push_str("    -"),
                }
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use episcrape_model::EpisodeId;

    fn ep(season: u32, episode: u32, rating: f64) -> EpisodeRecord {
        EpisodeRecord {
            season,
            episode,
            episode_id: EpisodeId::new(season, episode),
            external_id: format!("tt{season}{episode}"),
            title: String::new(),
            director: String::new(),
            air_date: String::new(),
            rating,
            votes: 0,
        }
    }

    #[test]
    fn test_color_bins() {
        assert_eq!(color_bin(6.9), 0);
        assert_eq!(color_bin(7.5), 0);
        assert_eq!(color_bin(7.99), 0);
        assert_eq!(color_bin(8.0), 1);
        assert_eq!(color_bin(8.7), 2);
        assert_eq!(color_bin(9.0), 3);
        assert_eq!(color_bin(9.5), 4);
        assert_eq!(color_bin(10.0), 4);
    }

    #[test]
    fn test_cell_colors() {
        let grid = RatingGrid::build(&[ep(5, 14, 10.0), ep(1, 1, 8.9)]);
        let ozymandias = grid.get(5, 14).unwrap();
        assert_eq!(ozymandias.fill, "#005a32");
        assert_eq!(ozymandias.text_color, "white");
        let pilot = grid.get(1, 1).unwrap();
        assert_eq!(pilot.fill, "#78c679");
        assert_eq!(pilot.text_color, "black");
    }

    #[test]
    fn test_grid_shape_and_order() {
        let grid = RatingGrid::build(&[ep(2, 1, 8.8), ep(1, 2, 8.6), ep(1, 1, 9.0), ep(2, 3, 9.3)]);
        assert_eq!(grid.max_season, 2);
        assert_eq!(grid.max_episode, 3);
        let slots: Vec<(u32, u32)> = grid.cells.iter().map(|c| (c.season, c.episode)).collect();
        assert_eq!(slots, vec![(1, 1), (1, 2), (2, 1), (2, 3)]);
        assert!(grid.get(2, 2).is_none());
    }

    #[test]
    fn test_render() {
        let grid = RatingGrid::build(&[ep(1, 1, 9.0), ep(1, 2, 8.6), ep(2, 1, 8.84)]);
        let text = grid.render();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Ep  S1   S2  ");
        assert_eq!(lines[1], " 1   9.0  8.8");
        assert_eq!(lines[2], " 2   8.6    -");
    }
}
