use scraper::ElementRef;
use unicode_normalization::UnicodeNormalization;

/// Normalize Unicode text to NFC form and collapse whitespace.
///
/// Runs of whitespace (including non-breaking spaces left over from HTML
/// entities) become a single space, and the ends are trimmed, which is how
/// the text reads when rendered in the browser.
pub fn normalize_text(input: &str) -> String {
    let nfc: String = input.nfc().collect();
    nfc.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Visible text of an element and all its descendants, normalized.
pub fn element_text(element: ElementRef<'_>) -> String {
    normalize_text(&element.text().collect::<String>())
}
