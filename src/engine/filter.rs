//! Predicate pass of the engine.
//!
//! Filters are conjunctive across categories (text AND category AND every
//! boolean filter) and disjunctive only within the text match, where a listing
//! passes if any designated search field matches.

use super::query::{CategoryFilter, MatchMode, Query, SearchField};
use crate::domain::Listable;
use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use std::collections::BTreeMap;

/// Compiled free-text matcher for one engine run.
pub struct TextMatcher {
    needle: String,
    tokens: Vec<String>,
    fields: Vec<SearchField>,
    fuzzy: Option<SkimMatcherV2>,
}

impl std::fmt::Debug for TextMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextMatcher")
            .field("needle", &self.needle)
            .field("fields", &self.fields)
            .field("fuzzy", &self.fuzzy.is_some())
            .finish_non_exhaustive()
    }
}

impl TextMatcher {
    /// Builds a matcher from the query, or `None` when the text matches everything.
    #[must_use]
    pub fn from_query(query: &Query) -> Option<Self> {
        let needle = query.needle()?.to_lowercase();
        let tokens = needle.split_whitespace().map(String::from).collect();
        let fuzzy = match query.match_mode {
            MatchMode::Substring => None,
            MatchMode::Fuzzy => Some(SkimMatcherV2::default()),
        };
        Some(Self {
            needle,
            tokens,
            fields: query.search_fields.clone(),
            fuzzy,
        })
    }

    /// `true` if any designated field of the listing matches.
    #[must_use]
    pub fn matches(&self, listing: &Listable) -> bool {
        let haystacks: Vec<String> = self
            .fields
            .iter()
            .flat_map(|field| field_values(listing, *field))
            .map(str::to_lowercase)
            .collect();

        match &self.fuzzy {
            None => haystacks.iter().any(|h| h.contains(&self.needle)),
            Some(m) => self
                .tokens
                .iter()
                .all(|token| haystacks.iter().any(|h| m.fuzzy_match(h, token).is_some())),
        }
    }

    /// Byte ranges `(start, end)` of `text` to highlight for this matcher.
    ///
    /// Substring mode returns every case-insensitive occurrence of the needle.
    /// Fuzzy mode matches each token on its own, like [`Self::matches`], and
    /// merges the matched character positions into contiguous ranges.
    #[must_use]
    pub fn highlight_ranges(&self, text: &str) -> Vec<(usize, usize)> {
        match &self.fuzzy {
            None => substring_ranges(text, &self.needle),
            Some(m) => merge_ranges(
                self.tokens
                    .iter()
                    .flat_map(|token| fuzzy_ranges(text, token, m))
                    .collect(),
            ),
        }
    }
}

fn field_values(listing: &Listable, field: SearchField) -> Vec<&str> {
    match field {
        SearchField::Title => vec![listing.title.as_str()],
        SearchField::Category => vec![listing.category.as_str()],
        SearchField::Description => listing.description.as_deref().into_iter().collect(),
        SearchField::Area => listing.location.place_names().collect(),
        SearchField::Keywords => listing.keywords.iter().map(String::as_str).collect(),
    }
}

fn substring_ranges(text: &str, needle_lower: &str) -> Vec<(usize, usize)> {
    if needle_lower.is_empty() {
        return vec![];
    }

    let mut ranges = Vec::new();
    let mut resume_at = 0;

    for (start, _) in text.char_indices() {
        if start < resume_at {
            continue;
        }
        if let Some(end) = match_at(text, start, needle_lower) {
            ranges.push((start, end));
            resume_at = end;
        }
    }

    ranges
}

/// Byte end of a case-insensitive match of `needle_lower` starting at `start`.
fn match_at(text: &str, start: usize, needle_lower: &str) -> Option<usize> {
    let mut needle = needle_lower.chars().peekable();
    for (offset, ch) in text[start..].char_indices() {
        for lower in ch.to_lowercase() {
            if needle.next() != Some(lower) {
                return None;
            }
        }
        if needle.peek().is_none() {
            return Some(start + offset + ch.len_utf8());
        }
    }
    None
}

fn fuzzy_ranges(text: &str, pattern: &str, matcher: &SkimMatcherV2) -> Vec<(usize, usize)> {
    let Some((_score, indices)) = matcher.fuzzy_indices(text, pattern) else {
        return vec![];
    };

    // fuzzy_indices reports char positions; convert to byte offsets
    let offsets: Vec<(usize, usize)> = text
        .char_indices()
        .map(|(byte, ch)| (byte, byte + ch.len_utf8()))
        .collect();

    let mut ranges: Vec<(usize, usize)> = Vec::new();
    for &idx in &indices {
        let Some(&(start, end)) = offsets.get(idx) else {
            continue;
        };
        match ranges.last_mut() {
            Some(last) if last.1 == start => last.1 = end,
            _ => ranges.push((start, end)),
        }
    }
    ranges
}

/// Sorts ranges and joins those that overlap or touch.
fn merge_ranges(mut ranges: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    ranges.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start <= last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}

/// `true` if the listing holds every required flag value. Missing flags read as `false`.
#[must_use]
pub fn matches_flags(listing: &Listable, required: &BTreeMap<String, bool>) -> bool {
    required
        .iter()
        .all(|(name, wanted)| listing.flag(name) == *wanted)
}

/// Single linear scan applying every predicate; returns survivors in input order.
pub(crate) fn select<'a>(
    listings: &'a [Listable],
    query: &Query,
    text: Option<&TextMatcher>,
) -> Vec<&'a Listable> {
    listings
        .iter()
        .filter(|listing| passes(listing, &query.category, &query.boolean_filters, text))
        .collect()
}

fn passes(
    listing: &Listable,
    category: &CategoryFilter,
    flags: &BTreeMap<String, bool>,
    text: Option<&TextMatcher>,
) -> bool {
    category.matches(&listing.category)
        && matches_flags(listing, flags)
        && text.map_or(true, |m| m.matches(listing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Location;

    fn tomatoes() -> Listable {
        Listable::new("1", "Fresh Tomatoes", "Produce").with_description("Grown in Malkerns")
    }

    fn onions() -> Listable {
        Listable::new("2", "Organic Onions", "Produce")
    }

    #[test]
    fn substring_is_case_insensitive() {
        let m = TextMatcher::from_query(&Query::new().text("TOMATO")).unwrap();
        assert!(m.matches(&tomatoes()));
        assert!(!m.matches(&onions()));
    }

    #[test]
    fn empty_text_builds_no_matcher() {
        assert!(TextMatcher::from_query(&Query::new()).is_none());
        assert!(TextMatcher::from_query(&Query::new().text("  ")).is_none());
    }

    #[test]
    fn matches_any_designated_field() {
        let m = TextMatcher::from_query(&Query::new().text("malkerns")).unwrap();
        assert!(m.matches(&tomatoes()));

        let title_only = Query::new().text("malkerns").search_fields([SearchField::Title]);
        let m = TextMatcher::from_query(&title_only).unwrap();
        assert!(!m.matches(&tomatoes()));
    }

    #[test]
    fn area_field_checks_all_place_names() {
        let mut listing = onions();
        listing.location = Location {
            village: Some("Lobamba".into()),
            ..Location::default()
        };
        let q = Query::new().text("lobamba").search_fields([SearchField::Area]);
        assert!(TextMatcher::from_query(&q).unwrap().matches(&listing));
    }

    #[test]
    fn fuzzy_requires_every_token() {
        let q = Query::new().text("frsh tom").match_mode(MatchMode::Fuzzy);
        let m = TextMatcher::from_query(&q).unwrap();
        assert!(m.matches(&tomatoes()));

        let q = Query::new().text("frsh xyz").match_mode(MatchMode::Fuzzy);
        let m = TextMatcher::from_query(&q).unwrap();
        assert!(!m.matches(&tomatoes()));
    }

    #[test]
    fn flags_are_conjunctive() {
        let listing = Listable::new("1", "Quantum", "Minibus")
            .with_flag("borderCrossing", true)
            .with_flag("verified", false);

        let mut required = BTreeMap::new();
        required.insert("borderCrossing".to_string(), true);
        assert!(matches_flags(&listing, &required));

        required.insert("verified".to_string(), true);
        assert!(!matches_flags(&listing, &required));

        let mut absent = BTreeMap::new();
        absent.insert("isOnline".to_string(), false);
        assert!(matches_flags(&listing, &absent));
    }

    #[test]
    fn substring_highlights_every_occurrence() {
        let m = TextMatcher::from_query(&Query::new().text("an")).unwrap();
        assert_eq!(m.highlight_ranges("Banana"), vec![(1, 3), (3, 5)]);
    }

    #[test]
    fn substring_highlight_handles_multibyte() {
        let m = TextMatcher::from_query(&Query::new().text("café")).unwrap();
        assert_eq!(m.highlight_ranges("Le CAFÉ"), vec![(3, 8)]);
    }

    #[test]
    fn fuzzy_highlight_coalesces_runs() {
        let q = Query::new().text("tom").match_mode(MatchMode::Fuzzy);
        let m = TextMatcher::from_query(&q).unwrap();
        let ranges = m.highlight_ranges("tomatoes");
        assert_eq!(ranges, vec![(0, 3)]);
    }

    #[test]
    fn fuzzy_highlight_covers_every_token() {
        let q = Query::new().text("frsh tom").match_mode(MatchMode::Fuzzy);
        let m = TextMatcher::from_query(&q).unwrap();
        assert_eq!(m.highlight_ranges("Fresh Tomatoes"), vec![(0, 2), (3, 5), (6, 9)]);
        // a token that misses the title leaves the others highlighted
        let q = Query::new().text("tom malkerns").match_mode(MatchMode::Fuzzy);
        let m = TextMatcher::from_query(&q).unwrap();
        assert_eq!(m.highlight_ranges("Fresh Tomatoes"), vec![(6, 9)]);
    }

    #[test]
    fn overlapping_ranges_merge() {
        assert_eq!(merge_ranges(vec![(4, 6), (0, 2), (1, 3), (6, 7)]), vec![(0, 3), (4, 7)]);
        assert!(merge_ranges(vec![]).is_empty());
    }

    #[test]
    fn select_preserves_input_order() {
        let listings = vec![onions(), tomatoes(), Listable::new("3", "Tinned Tomatoes", "Grocery")];
        let q = Query::new().text("tomato");
        let m = TextMatcher::from_query(&q);
        let ids: Vec<&str> = select(&listings, &q, m.as_ref())
            .into_iter()
            .map(|l| l.id.as_str())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);
    }
}
