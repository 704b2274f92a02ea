//! Small text helpers shared by markup strategies.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::ElementRef;

static FOUR_DIGITS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d{4})\b").expect("static year pattern"));

/// First standalone four-digit run in `text`.
pub fn first_year(text: &str) -> Option<i32> {
    FOUR_DIGITS
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

/// Concatenated, trimmed text content of an element.
pub fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Parse a leading decimal number such as `"7.4"` or `"7.4/10"`.
pub fn leading_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let end = text
        .char_indices()
        .find(|&(_, c)| !(c.is_ascii_digit() || c == '.'))
        .map_or(text.len(), |(i, _)| i);
    text[..end].parse().ok()
}
