use crate::config::Locator;
use crate::normalize;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use thiserror::Error;

/// Something that can load an episode detail page.
///
/// The live implementation drives a browser tab; tests substitute fixed
/// HTML. Implementations own any waiting needed before the page is ready.
pub trait PageSource {
    fn navigate(&mut self, external_id: &str) -> Result<Page, FetchError>;
}

/// Why a page could not be loaded. Always recoverable: the episode is skipped.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("{locator} not found within {}s: {message}", .waited.as_secs_f64())]
    MarkerMissing {
        locator: Locator,
        waited: Duration,
        message: String,
    },

    #[error("could not read page content: {0}")]
    Content(String),
}

/// Snapshot of a loaded detail page.
#[derive(Debug)]
pub struct Page {
    external_id: String,
    url: String,
    html: String,
    document: Html,
}

impl Page {
    pub fn new(external_id: &str, url: &str, html: String) -> Self {
        let document = Html::parse_document(&html);
        Self {
            external_id: external_id.to_string(),
            url: url.to_string(),
            html,
            document,
        }
    }

    pub fn external_id(&self) -> &str {
        &self.external_id
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Raw HTML as it was captured.
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// First element matching `selector`, in document order.
    pub fn find(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.document.select(selector).next()
    }

    /// Normalized text of the first element matching `selector`.
    pub fn find_text(&self, selector: &Selector) -> Option<String> {
        self.find(selector).map(normalize::element_text)
    }
}
