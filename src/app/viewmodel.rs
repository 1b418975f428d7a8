//! View model types representing renderable list state.
//!
//! View models are computed from [`super::CatalogState`] and handed to whatever
//! renders the list (mobile view, terminal, web). They contain no business
//! logic, only display-ready data.

use super::modes::Section;

/// Complete list view model.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogViewModel {
    pub header: HeaderInfo,

    /// One or two sections, in display order.
    pub sections: Vec<SectionView>,

    /// Present when nothing matches the current query.
    pub empty_state: Option<EmptyState>,

    pub search_bar: SearchBarInfo,
}

impl CatalogViewModel {
    /// Total number of rows currently revealed across all sections.
    #[must_use]
    pub fn visible_count(&self) -> usize {
        self.sections.iter().map(|s| s.items.len()).sum()
    }
}

/// A titled group of rows with a "show more" affordance.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionView {
    pub section: Section,

    /// Title including the total count, e.g. `"Nearby (3)"`.
    pub title: String,

    /// Revealed rows.
    pub items: Vec<DisplayItem>,

    /// Rows hidden behind "show more".
    pub hidden_count: usize,

    pub expanded: bool,
}

/// Display information for a single listing.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayItem {
    pub id: String,
    pub title: String,

    /// Most specific place name available.
    pub area: Option<String>,

    /// Formatted price, or "Price on request".
    pub price_label: String,

    /// e.g. "850 m" or "12.4 km"; `None` without a distance.
    pub distance_label: Option<String>,

    /// e.g. "4.5"; `None` when unrated.
    pub rating_label: Option<String>,

    /// e.g. "listed 3d ago".
    pub listed_label: Option<String>,

    /// Byte ranges of `title` to highlight for the current search.
    pub highlight_ranges: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderInfo {
    pub title: String,
}

/// Shown when no listing matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    pub message: String,
    pub subtitle: String,
}

/// Current search text and sort selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBarInfo {
    pub query: String,
    pub sort_label: String,
}

/// "850 m" below one kilometre (rounded to 10 m), otherwise "12.4 km".
#[must_use]
pub fn format_distance(km: f64) -> String {
    let metres = (km * 100.0).round() * 10.0;
    if metres < 1000.0 {
        format!("{metres:.0} m")
    } else {
        format!("{km:.1} km")
    }
}

/// Whole amounts without decimals, otherwise two decimals.
#[must_use]
pub fn format_price(price: Option<f64>) -> String {
    match price {
        None => "Price on request".to_string(),
        Some(p) if p.fract() == 0.0 => format!("{p:.0}"),
        Some(p) => format!("{p:.2}"),
    }
}
