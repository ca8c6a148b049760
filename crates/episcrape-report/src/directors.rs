use episcrape_model::EpisodeRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate ratings for one value of the `Director` column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DirectorStats {
    pub director: String,
    pub avg_rating: f64,
    pub episode_count: usize,
    /// Sample standard deviation; absent for a single episode.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_std: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DirectorReport {
    /// Mean rating across every input episode.
    pub overall_avg_rating: f64,
    pub min_episodes: usize,
    /// Directors with at least `min_episodes` episodes, best first.
    pub directors: Vec<DirectorStats>,
}

/// Trim and title-case a director field ("vince GILLIGAN" -> "Vince Gilligan").
///
/// Every alphabetic run starts upper-case and continues lower-case, so
/// "o'donnell" becomes "O'Donnell".
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.trim().chars() {
        if c.is_alphabetic() {
            if prev_alpha {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            prev_alpha = true;
        } else {
            out.push(c);
            prev_alpha = false;
        }
    }
    out
}

/// Group episodes by their (normalized) director field and rank the groups.
///
/// Co-directed episodes form their own group, keyed by the joined names.
/// Episodes without a director still count towards the overall average.
pub fn director_report(records: &[EpisodeRecord], min_episodes: usize) -> DirectorReport {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for record in records {
        let director = title_case(&record.director);
        if director.is_empty() {
            continue;
        }
        groups.entry(director).or_default().push(record.rating);
    }

    let mut directors: Vec<DirectorStats> = groups
        .into_iter()
        .filter(|(_, ratings)| ratings.len() >= min_episodes)
        .map(|(director, ratings)| DirectorStats {
            avg_rating: mean(&ratings),
            episode_count: ratings.len(),
            rating_std: sample_std(&ratings),
            director,
        })
        .collect();

    directors.sort_by(|a, b| {
        b.avg_rating
            .partial_cmp(&a.avg_rating)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.director.cmp(&b.director))
    });

    let all: Vec<f64> = records.iter().map(|r| r.rating).collect();
    DirectorReport {
        overall_avg_rating: mean(&all),
        min_episodes,
        directors,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    Some(var.sqrt())
}
