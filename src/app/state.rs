//! Presentation state and view model computation.
//!
//! [`CatalogState`] is the externally-owned state a list screen keeps around the
//! engine: the catalog snapshot, the current [`Query`], the last results, and
//! the "show more" windows of each section. The engine itself holds nothing;
//! every change to the query or the catalog re-runs it from scratch.
//!
//! # Example
//!
//! ```rust
//! use marketview::app::CatalogState;
//! use marketview::{Listable, Query};
//!
//! let mut state = CatalogState::new(vec![Listable::new("1", "Hilux", "Bakkie")], 4, 10.0)?;
//! state.apply_query(Query::new().text("hilux"))?;
//! let viewmodel = state.compute_viewmodel(0);
//! assert_eq!(viewmodel.visible_count(), 1);
//! # Ok::<(), marketview::MarketviewError>(())
//! ```

use super::modes::{ListLayout, Section};
use super::viewmodel::{
    format_distance, format_price, CatalogViewModel, DisplayItem, EmptyState, HeaderInfo,
    SearchBarInfo, SectionView,
};
use crate::domain::{Listable, RankedListable, Result};
use crate::engine::{self, Buckets, Query, TextMatcher, Window};
use crate::storage::ensure_unique_ids;

/// State of one catalog list screen.
#[derive(Debug, Clone)]
pub struct CatalogState {
    /// Catalog snapshot, in source order.
    pub catalog: Vec<Listable>,

    /// Query the current `results` were computed with.
    pub query: Query,

    /// Full filtered and sorted sequence from the last engine run.
    pub results: Vec<RankedListable>,

    pub layout: ListLayout,

    nearby_window: Window,
    other_window: Window,
    all_window: Window,
}

impl CatalogState {
    /// Creates state over a catalog and computes the initial (unfiltered) results.
    ///
    /// `show_more_limit` is how many rows each section reveals before "show more".
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarketviewError::InvalidArgument`] for a negative or
    /// non-finite threshold and [`crate::MarketviewError::Storage`] when ids
    /// repeat within the catalog.
    pub fn new(
        catalog: Vec<Listable>,
        show_more_limit: usize,
        nearby_threshold_km: f64,
    ) -> Result<Self> {
        ensure_unique_ids(&catalog)?;
        let query = Query::new().nearby_threshold_km(nearby_threshold_km);
        let results = engine::run(&catalog, &query)?;
        let window = Window::new(show_more_limit);
        Ok(Self {
            catalog,
            query,
            results,
            layout: ListLayout::default(),
            nearby_window: window,
            other_window: window,
            all_window: window,
        })
    }

    /// Re-runs the engine with the current query.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarketviewError::InvalidArgument`] if the current query is malformed.
    pub fn refresh(&mut self) -> Result<()> {
        self.results = engine::run(&self.catalog, &self.query)?;
        self.collapse_all();
        Ok(())
    }

    /// Replaces the query and re-runs the engine.
    ///
    /// The state is left untouched when the engine rejects the query.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarketviewError::InvalidArgument`] for malformed queries.
    pub fn apply_query(&mut self, query: Query) -> Result<()> {
        let results = engine::run(&self.catalog, &query)?;
        self.query = query;
        self.results = results;
        self.collapse_all();
        Ok(())
    }

    /// Replaces the catalog snapshot and re-runs the engine with the current query.
    ///
    /// The state is left untouched when the snapshot or the query is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MarketviewError::Storage`] when ids repeat within the
    /// snapshot and [`crate::MarketviewError::InvalidArgument`] if the current
    /// query is malformed.
    pub fn replace_catalog(&mut self, catalog: Vec<Listable>) -> Result<()> {
        ensure_unique_ids(&catalog)?;
        let results = engine::run(&catalog, &self.query)?;
        self.catalog = catalog;
        self.results = results;
        self.collapse_all();
        Ok(())
    }

    /// `true` when results are shown as nearby/other sections.
    #[must_use]
    pub const fn is_sectioned(&self) -> bool {
        matches!(self.layout, ListLayout::Sectioned) && self.query.reference_point.is_some()
    }

    #[must_use]
    pub const fn window(&self, section: Section) -> &Window {
        match section {
            Section::Nearby => &self.nearby_window,
            Section::Other => &self.other_window,
            Section::All => &self.all_window,
        }
    }

    pub fn window_mut(&mut self, section: Section) -> &mut Window {
        match section {
            Section::Nearby => &mut self.nearby_window,
            Section::Other => &mut self.other_window,
            Section::All => &mut self.all_window,
        }
    }

    fn collapse_all(&mut self) {
        self.nearby_window.collapse();
        self.other_window.collapse();
        self.all_window.collapse();
    }

    /// Results grouped the way they are displayed.
    #[must_use]
    pub fn sections(&self) -> Vec<(Section, Vec<&RankedListable>)> {
        if self.is_sectioned() {
            // the committed query already passed threshold validation
            let Buckets { nearby, other } =
                engine::bucket::split_nearby(&self.results, self.query.nearby_threshold_km);
            vec![(Section::Nearby, nearby), (Section::Other, other)]
        } else {
            vec![(Section::All, self.results.iter().collect())]
        }
    }

    /// Computes a renderable view model.
    ///
    /// `now` is the current Unix timestamp, used for "listed … ago" labels.
    #[must_use]
    pub fn compute_viewmodel(&self, now: i64) -> CatalogViewModel {
        let matcher = TextMatcher::from_query(&self.query);

        let sections = self
            .sections()
            .into_iter()
            .filter(|(section, items)| *section == Section::All || !items.is_empty())
            .map(|(section, items)| {
                let window = self.window(section);
                let visible = window.visible(items.as_slice());
                SectionView {
                    section,
                    title: format!("{} ({})", section.title(), items.len()),
                    items: visible
                        .iter()
                        .map(|item| Self::compute_display_item(item, matcher.as_ref(), now))
                        .collect(),
                    hidden_count: window.hidden(items.len()),
                    expanded: window.is_expanded(),
                }
            })
            .collect();

        CatalogViewModel {
            header: self.compute_header(),
            sections,
            empty_state: self.compute_empty_state(),
            search_bar: self.compute_search_bar(),
        }
    }

    /// Same as [`Self::compute_viewmodel`] with the current wall-clock time.
    #[must_use]
    pub fn compute_viewmodel_now(&self) -> CatalogViewModel {
        self.compute_viewmodel(chrono::Utc::now().timestamp())
    }

    fn compute_display_item(item: &RankedListable, matcher: Option<&TextMatcher>, now: i64) -> DisplayItem {
        let listing = &item.listing;
        DisplayItem {
            id: listing.id.clone(),
            title: listing.title.clone(),
            area: listing.location.display_name().map(String::from),
            price_label: format_price(listing.price),
            distance_label: item.distance_km.map(format_distance),
            rating_label: listing.rating.map(|r| format!("{r:.1}")),
            listed_label: listing.time_ago(now).map(|ago| format!("listed {ago}")),
            highlight_ranges: matcher.map_or_else(Vec::new, |m| m.highlight_ranges(&listing.title)),
        }
    }

    fn compute_header(&self) -> HeaderInfo {
        HeaderInfo {
            title: format!("{} of {} listings", self.results.len(), self.catalog.len()),
        }
    }

    fn compute_empty_state(&self) -> Option<EmptyState> {
        if !self.results.is_empty() {
            return None;
        }
        let empty_state = if self.catalog.is_empty() {
            EmptyState {
                message: "No listings yet".to_string(),
                subtitle: "Check back later for new listings".to_string(),
            }
        } else {
            EmptyState {
                message: "No results".to_string(),
                subtitle: "Try a different search or clear some filters".to_string(),
            }
        };
        Some(empty_state)
    }

    fn compute_search_bar(&self) -> SearchBarInfo {
        let sort_label = self
            .query
            .effective_sort_key()
            .map_or_else(|| "default".to_string(), |key| key.to_string());
        SearchBarInfo {
            query: self.query.text.clone(),
            sort_label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::GeoPoint;

    fn point(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    fn catalog() -> Vec<Listable> {
        (0..6)
            .map(|i| {
                let lat = -26.3 - f64::from(i) * 0.05;
                Listable::new(format!("v{i}"), format!("Vendor {i}"), "Vendor")
                    .with_coordinates(point(lat, 31.1))
            })
            .chain(std::iter::once(Listable::new("nowhere", "Vendor without map pin", "Vendor")))
            .collect()
    }

    #[test]
    fn single_section_without_reference_point() {
        let state = CatalogState::new(catalog(), 4, 10.0).unwrap();
        let vm = state.compute_viewmodel(0);
        assert_eq!(vm.sections.len(), 1);
        assert_eq!(vm.sections[0].section, Section::All);
        assert_eq!(vm.sections[0].items.len(), 4);
        assert_eq!(vm.sections[0].hidden_count, 3);
        assert_eq!(vm.header.title, "7 of 7 listings");
    }

    #[test]
    fn two_sections_with_reference_point() {
        let mut state = CatalogState::new(catalog(), 4, 10.0).unwrap();
        state.apply_query(state.query.clone().near(-26.3, 31.1).unwrap()).unwrap();

        let vm = state.compute_viewmodel(0);
        let titles: Vec<&str> = vm.sections.iter().map(|s| s.title.as_str()).collect();
        // 0.05 degrees of latitude is about 5.6 km
        assert_eq!(titles, vec!["Nearby (2)", "Other listings (5)"]);
        assert_eq!(vm.sections[0].items[0].distance_label.as_deref(), Some("0 m"));
        assert_eq!(vm.sections[1].items.len(), 4);
        assert_eq!(vm.sections[1].hidden_count, 1);
    }

    #[test]
    fn rejected_query_leaves_state_untouched() {
        let mut state = CatalogState::new(catalog(), 4, 10.0).unwrap();
        let before = state.results.clone();
        let bad = Query::new().nearby_threshold_km(-1.0);
        assert!(state.apply_query(bad).is_err());
        assert_eq!(state.results, before);
        assert!((state.query.nearby_threshold_km - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn new_query_collapses_windows() {
        let mut state = CatalogState::new(catalog(), 2, 10.0).unwrap();
        state.window_mut(Section::All).expand();
        assert_eq!(state.compute_viewmodel(0).visible_count(), 7);

        state.apply_query(Query::new().text("vendor")).unwrap();
        assert_eq!(state.compute_viewmodel(0).visible_count(), 2);
    }

    #[test]
    fn empty_states() {
        let state = CatalogState::new(vec![], 4, 10.0).unwrap();
        let vm = state.compute_viewmodel(0);
        assert_eq!(vm.empty_state.unwrap().message, "No listings yet");
        assert_eq!(vm.sections[0].items.len(), 0);

        let mut state = CatalogState::new(catalog(), 4, 10.0).unwrap();
        state.apply_query(Query::new().text("bicycle")).unwrap();
        assert_eq!(state.compute_viewmodel(0).empty_state.unwrap().message, "No results");
    }

    #[test]
    fn highlights_search_text_in_titles() {
        let mut state = CatalogState::new(catalog(), 4, 10.0).unwrap();
        state.apply_query(Query::new().text("dor")).unwrap();
        let vm = state.compute_viewmodel(0);
        assert_eq!(vm.sections[0].items[0].highlight_ranges, vec![(3, 6)]);
    }

    #[test]
    fn bad_initial_threshold_is_rejected() {
        let err = CatalogState::new(catalog(), 4, f64::NAN).unwrap_err();
        assert!(err.is_invalid_argument());
        assert!(CatalogState::new(catalog(), 4, -1.0).is_err());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut listings = catalog();
        listings.push(Listable::new("v0", "Second vendor 0", "Vendor"));
        let err = CatalogState::new(listings.clone(), 4, 10.0).unwrap_err();
        assert!(matches!(err, crate::MarketviewError::Storage(_)));

        let mut state = CatalogState::new(catalog(), 4, 10.0).unwrap();
        let before = state.catalog.clone();
        let err = state.replace_catalog(listings).unwrap_err();
        assert!(matches!(err, crate::MarketviewError::Storage(_)));
        assert_eq!(state.catalog, before);
        assert_eq!(state.results.len(), 7);
    }

    #[test]
    fn rejected_catalog_replacement_leaves_state_untouched() {
        let mut state = CatalogState::new(catalog(), 4, 10.0).unwrap();
        state.query.nearby_threshold_km = -1.0;
        let before_catalog = state.catalog.clone();
        let before_results = state.results.clone();

        let replacement = vec![Listable::new("9", "New vendor", "Vendor")];
        assert!(state.replace_catalog(replacement).unwrap_err().is_invalid_argument());
        assert_eq!(state.catalog, before_catalog);
        assert_eq!(state.results, before_results);
    }
}
