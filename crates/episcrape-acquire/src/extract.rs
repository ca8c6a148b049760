use crate::config::ExtractConfig;
use crate::normalize;
use crate::source::Page;
use anyhow::Result;
use chrono::NaiveDate;
use scraper::Selector;
use std::fmt;
use thiserror::Error;

const AIR_DATE_PREFIX: &str = "Episode aired ";
const AIR_DATE_FORMAT: &str = "%b %d, %Y";

/// A required field of the detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Rating,
    Votes,
    AirDate,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Title => "title",
            Field::Rating => "rating",
            Field::Votes => "votes",
            Field::AirDate => "air date",
        })
    }
}

/// A required field that could not be read from the page.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("{field}: no element matches `{selector}`")]
    Missing { field: Field, selector: String },

    #[error("{field}: '{text}' is not a number")]
    NotANumber { field: Field, text: String },
}

/// The five fields read from one detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub title: String,
    pub rating: f64,
    pub votes: u64,
    pub air_date: String,
    /// Director names in document order; empty when the page lists none.
    pub directors: Vec<String>,
}

/// Compiled selectors for reading a detail page.
#[derive(Debug)]
pub struct Extractor {
    config: ExtractConfig,
    title: Selector,
    rating: Selector,
    votes: Selector,
    air_date_item: Selector,
    credit_item: Selector,
    credit_label: Selector,
    director_link: Selector,
}

fn compile(field: &str, selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| anyhow::anyhow!("Invalid {field} selector `{selector}`: {e}"))
}

impl Extractor {
    pub fn new(config: &ExtractConfig) -> Result<Self> {
        Ok(Self {
            title: compile("title", &config.title)?,
            rating: compile("rating", &config.rating)?,
            votes: compile("votes", &config.votes)?,
            air_date_item: compile("air date", &config.air_date_item)?,
            credit_item: compile("credit item", &config.credit_item)?,
            credit_label: compile("credit label", &config.credit_label)?,
            director_link: compile("director link", &config.director_link)?,
            config: config.clone(),
        })
    }

    /// Read every field from the page.
    ///
    /// Any required field failing aborts the whole page; directors are optional.
    pub fn extract(&self, page: &Page) -> Result<ExtractedFields, ExtractError> {
        let title = self.required(page, Field::Title, &self.title, &self.config.title)?;

        let rating_text = self.required(page, Field::Rating, &self.rating, &self.config.rating)?;
        let rating = parse_rating(&rating_text).ok_or(ExtractError::NotANumber {
            field: Field::Rating,
            text: rating_text.clone(),
        })?;

        let votes_text = self.required(page, Field::Votes, &self.votes, &self.config.votes)?;
        let votes = parse_votes(&votes_text).ok_or(ExtractError::NotANumber {
            field: Field::Votes,
            text: votes_text.clone(),
        })?;

        let air_date_text = self.air_date_text(page).ok_or_else(|| ExtractError::Missing {
            field: Field::AirDate,
            selector: format!(
                "{} containing '{}'",
                self.config.air_date_item, self.config.air_date_phrase
            ),
        })?;
        let air_date = parse_air_date(&air_date_text);
        if air_date == air_date_text {
            tracing::warn!(
                id = %page.external_id(),
                url = %page.url(),
                text = %air_date_text,
                "Air date not in expected format, keeping raw text"
            );
        }

        let directors = self.directors(page);

        Ok(ExtractedFields {
            title,
            rating,
            votes,
            air_date,
            directors,
        })
    }

    fn required(
        &self,
        page: &Page,
        field: Field,
        selector: &Selector,
        source: &str,
    ) -> Result<String, ExtractError> {
        page.find_text(selector).ok_or_else(|| ExtractError::Missing {
            field,
            selector: source.to_string(),
        })
    }

    fn air_date_text(&self, page: &Page) -> Option<String> {
        page.document()
            .select(&self.air_date_item)
            .map(normalize::element_text)
            .find(|text| text.contains(&self.config.air_date_phrase))
    }

    /// Names linked from the first credit row labelled as a director row.
    fn directors(&self, page: &Page) -> Vec<String> {
        let section = page.document().select(&self.credit_item).find(|item| {
            item.select(&self.credit_label).any(|label| {
                let text = normalize::element_text(label);
                self.config.director_labels.iter().any(|l| *l == text)
            })
        });

        match section {
            Some(section) => section
                .select(&self.director_link)
                .map(normalize::element_text)
                .filter(|name| !name.is_empty())
                .collect(),
            None => {
                tracing::debug!(id = %page.external_id(), "No director section");
                Vec::new()
            }
        }
    }
}

/// Parse a rating such as "8.9".
pub fn parse_rating(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|r| r.is_finite())
}

/// Parse a vote count such as "1.2K", "2.3M" or "12,345".
pub fn parse_votes(text: &str) -> Option<u64> {
    let upper = text.trim().to_uppercase();
    let (number, scale) = if upper.contains('K') {
        (upper.replace('K', ""), 1_000.0)
    } else if upper.contains('M') {
        (upper.replace('M', ""), 1_000_000.0)
    } else {
        return upper.replace(',', "").parse().ok();
    };

    let value: f64 = number.trim().parse().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    Some((value * scale) as u64)
}

/// Convert "Episode aired Jan 20, 2008" to "2008-01-20".
///
/// Text that does not parse is returned unchanged.
pub fn parse_air_date(text: &str) -> String {
    let cleaned = text.replace(AIR_DATE_PREFIX, "");
    match NaiveDate::parse_from_str(cleaned.trim(), AIR_DATE_FORMAT) {
        Ok(date) => date.format("%Y-%m-%d").to_string(),
        Err(_) => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PILOT: &str = r#"
    <html><body>
      <section>
        <h1 data-testid="hero__primary-text">
          Pilot
        </h1>
        <ul class="ipc-inline-list">
          <li class="ipc-inline-list__item">Episode aired Jan 20, 2008</li>
          <li class="ipc-inline-list__item">TV-MA</li>
          <li class="ipc-inline-list__item">58m</li>
        </ul>
        <div data-testid="hero-rating-bar__aggregate-rating__score">
          <span class="sc-d541859f-1 imUuxf">9.0</span><span>/10</span>
        </div>
        <div class="sc-d541859f-3 dwhNqC">54K</div>
      </section>
      <ul>
        <li data-testid="title-pec-principal-credit">
          <span class="ipc-metadata-list-item__label">Director</span>
          <div>
            <ul>
              <li><a class="ipc-metadata-list-item__list-content-item ipc-metadata-list-item__list-content-item--link" href="/name/nm0319213/">Vince Gilligan</a></li>
            </ul>
          </div>
        </li>
        <li data-testid="title-pec-principal-credit">
          <span class="ipc-metadata-list-item__label">Writer</span>
          <div>
            <ul>
              <li><a class="ipc-metadata-list-item__list-content-item ipc-metadata-list-item__list-content-item--link" href="/name/nm0319213/">Vince Gilligan</a></li>
            </ul>
          </div>
        </li>
      </ul>
    </body></html>
    "#;

    fn page(html: &str) -> Page {
        Page::new("tt0959621", "https://www.imdb.com/title/tt0959621/", html.to_string())
    }

    fn extractor() -> Extractor {
        Extractor::new(&ExtractConfig::default()).unwrap()
    }

    #[test]
    fn test_extract_full_page() {
        let fields = extractor().extract(&page(PILOT)).unwrap();
        assert_eq!(fields.title, "Pilot");
        assert_eq!(fields.rating, 9.0);
        assert_eq!(fields.votes, 54_000);
        assert_eq!(fields.air_date, "2008-01-20");
        assert_eq!(fields.directors, vec!["Vince Gilligan"]);
    }

    #[test]
    fn test_two_directors_in_document_order() {
        let html = r#"
        <html><body>
          <h1 data-testid="hero__primary-text">Fly</h1>
          <li class="ipc-inline-list__item">Episode aired May 23, 2010</li>
          <span class="imUuxf">7.8</span>
          <div class="dwhNqC">31,204</div>
          <ul>
            <li>
              <span>Directors</span>
              <ul>
                <li><a class="ipc-metadata-list-item__list-content-item--link">Rian Johnson</a></li>
                <li><a class="ipc-metadata-list-item__list-content-item--link">Vince Gilligan</a></li>
              </ul>
            </li>
          </ul>
        </body></html>
        "#;
        let fields = extractor().extract(&page(html)).unwrap();
        assert_eq!(fields.directors, vec!["Rian Johnson", "Vince Gilligan"]);
        assert_eq!(fields.votes, 31_204);
        assert_eq!(fields.air_date, "2010-05-23");
    }

    #[test]
    fn test_missing_director_section_is_empty() {
        let html = PILOT.replace(">Director<", ">Creator<");
        let fields = extractor().extract(&page(&html)).unwrap();
        assert!(fields.directors.is_empty());
    }

    #[test]
    fn test_missing_rating_fails() {
        let html = PILOT.replace("imUuxf", "something-else");
        let err = extractor().extract(&page(&html)).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Missing {
                field: Field::Rating,
                ..
            }
        ));
    }

    #[test]
    fn test_non_numeric_rating_fails() {
        let html = PILOT.replace(">9.0<", ">N/A<");
        let err = extractor().extract(&page(&html)).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::NotANumber {
                field: Field::Rating,
                ..
            }
        ));
    }

    #[test]
    fn test_missing_air_date_fails() {
        let html = PILOT.replace("Episode aired Jan 20, 2008", "Released 2008");
        let err = extractor().extract(&page(&html)).unwrap_err();
        assert!(matches!(
            err,
            ExtractError::Missing {
                field: Field::AirDate,
                ..
            }
        ));
    }

    #[test]
    fn test_unparseable_air_date_kept() {
        let html = PILOT.replace("Jan 20, 2008", "sometime in 2008");
        let fields = extractor().extract(&page(&html)).unwrap();
        assert_eq!(fields.air_date, "Episode aired sometime in 2008");
    }

    #[test]
    fn test_parse_votes() {
        assert_eq!(parse_votes("1.2K"), Some(1200));
        assert_eq!(parse_votes("12,345"), Some(12_345));
        assert_eq!(parse_votes(" 54k "), Some(54_000));
        assert_eq!(parse_votes("2.1M"), Some(2_100_000));
        assert_eq!(parse_votes("987"), Some(987));
        assert_eq!(parse_votes("lots"), None);
        assert_eq!(parse_votes("K"), None);
    }

    #[test]
    fn test_parse_air_date() {
        assert_eq!(parse_air_date("Episode aired Jan 20, 2008"), "2008-01-20");
        assert_eq!(parse_air_date("Episode aired Sep 5, 2013"), "2013-09-05");
        assert_eq!(
            parse_air_date("Episode aired 2008-01-20?"),
            "Episode aired 2008-01-20?"
        );
        assert_eq!(parse_air_date("TBA"), "TBA");
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating(" 9.7 "), Some(9.7));
        assert_eq!(parse_rating("NaN"), None);
        assert_eq!(parse_rating(""), None);
    }

    #[test]
    fn test_invalid_selector_is_setup_error() {
        let config = ExtractConfig {
            rating: "span[[".to_string(),
            ..ExtractConfig::default()
        };
        let err = Extractor::new(&config).unwrap_err();
        assert!(err.to_string().contains("rating selector"));
    }
}
