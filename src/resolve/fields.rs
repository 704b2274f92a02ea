//! Value domains for the resolved fields.

use chrono::Datelike;

use super::Field;

/// Earliest plausible release year.
pub const MIN_YEAR: i32 = 1900;

/// Longest accepted genre name.
pub const MAX_GENRE_LEN: usize = 40;

/// Inclusive range of plausible release years: `1900..=current + 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    min: i32,
    max: i32,
}

impl YearWindow {
    /// Window ending one year after the local calendar year.
    pub fn current() -> Self {
        Self::ending(chrono::Local::now().year() + 1)
    }

    /// Window from [`MIN_YEAR`] through `max`.
    pub fn ending(max: i32) -> Self {
        Self { min: MIN_YEAR, max }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }

    pub fn max(&self) -> i32 {
        self.max
    }
}

impl Default for YearWindow {
    fn default() -> Self {
        Self::current()
    }
}

/// Release year, bounded by a [`YearWindow`].
#[derive(Debug, Clone, Copy)]
pub struct YearField {
    window: YearWindow,
}

impl YearField {
    pub fn new(window: YearWindow) -> Self {
        Self { window }
    }
}

impl Field for YearField {
    type Value = i32;

    fn name(&self) -> &'static str {
        "year"
    }

    fn validate(&self, candidate: i32) -> Option<i32> {
        self.window.contains(candidate).then_some(candidate)
    }
}

/// Rating on a 0–10 scale.
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingField;

impl Field for RatingField {
    type Value = f64;

    fn name(&self) -> &'static str {
        "rating"
    }

    fn validate(&self, candidate: f64) -> Option<f64> {
        (candidate.is_finite() && (0.0..=10.0).contains(&candidate)).then_some(candidate)
    }
}

/// Ordered genre list: trimmed, non-empty, no duplicates (case-insensitive,
/// first spelling kept). An empty result is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct GenreField;

impl Field for GenreField {
    type Value = Vec<String>;

    fn name(&self) -> &'static str {
        "genres"
    }

    fn validate(&self, candidate: Vec<String>) -> Option<Vec<String>> {
        let genres = normalize_genres(candidate);
        (!genres.is_empty()).then_some(genres)
    }
}

/// Trim, drop blanks and over-long names, dedupe case-insensitively.
pub fn normalize_genres<I, S>(raw: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut genres: Vec<String> = Vec::new();
    for genre in raw {
        let genre = genre.as_ref().trim();
        if genre.is_empty() || genre.len() > MAX_GENRE_LEN {
            continue;
        }
        if genres.iter().any(|g| g.eq_ignore_ascii_case(genre)) {
            continue;
        }
        genres.push(genre.to_string());
    }
    genres
}
