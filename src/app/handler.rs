//! Event handling for a catalog list screen.
//!
//! UI events (typing in the search box, tapping filter chips, picking a sort
//! option, geolocation resolving, pressing "show more") are translated into
//! query changes and engine re-runs on [`CatalogState`].
//!
//! The handler follows a unidirectional data flow pattern:
//! 1. Events arrive from the host UI or the geolocation collaborator
//! 2. [`handle_event`] pattern-matches the event type
//! 3. A candidate query is built and the engine re-run
//! 4. The returned flag tells the host whether to re-render
//!
//! Rejected input (an unknown sort option, out-of-range coordinates) surfaces
//! as `InvalidArgument` and leaves the state as it was.
//!
//! # Example
//!
//! ```rust
//! use marketview::app::{handle_event, CatalogState, Event};
//! use marketview::Listable;
//!
//! let mut state = CatalogState::new(vec![Listable::new("1", "Hilux", "Bakkie")], 4, 10.0)?;
//! let rerender = handle_event(&mut state, &Event::SearchTextChanged("hil".into()))?;
//! assert!(rerender);
//! assert_eq!(state.results.len(), 1);
//! # Ok::<(), marketview::MarketviewError>(())
//! ```

use super::modes::Section;
use super::state::CatalogState;
use crate::domain::{GeoPoint, Listable, Result};
use crate::engine::{CategoryFilter, SortKey, SortOrder};

/// Events raised by a catalog list screen.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A new catalog snapshot arrived from the data source.
    CatalogLoaded(Vec<Listable>),

    /// Search box text changed.
    SearchTextChanged(String),
    /// Search box cleared.
    ClearSearch,

    /// A category chip was selected (`"All"` disables the filter).
    CategorySelected(String),

    /// A boolean filter chip was switched on with the required value.
    FlagSet {
        name: String,
        value: bool,
    },
    /// A boolean filter chip was switched off.
    FlagCleared(String),

    /// A sort menu option was picked, by its key name.
    SortSelected(String),
    /// The sort direction toggle was changed.
    SortOrderSelected(SortOrder),

    /// The geolocation collaborator resolved the device position.
    LocationResolved {
        latitude: f64,
        longitude: f64,
    },
    /// Permission denied or position lost.
    LocationUnavailable,

    /// "Show more" pressed on a section.
    ShowMore(Section),
    /// "Show less" pressed on a section.
    ShowLess(Section),

    /// Switch between one list and nearby/other sections.
    SectionsToggled,
}

/// Processes an event and returns whether the list needs re-rendering.
///
/// # Errors
///
/// Returns [`crate::MarketviewError::InvalidArgument`] for an unsupported sort
/// option or out-of-range coordinates, and [`crate::MarketviewError::Storage`]
/// for a loaded catalog with repeated ids. The state is unchanged in either case.
pub fn handle_event(state: &mut CatalogState, event: &Event) -> Result<bool> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event_name(event)).entered();

    match event {
        Event::CatalogLoaded(listings) => {
            tracing::debug!(count = listings.len(), "catalog loaded");
            state.replace_catalog(listings.clone())?;
            Ok(true)
        }
        Event::SearchTextChanged(text) => {
            if state.query.text == *text {
                return Ok(false);
            }
            let query = state.query.clone().text(text.clone());
            state.apply_query(query)?;
            Ok(true)
        }
        Event::ClearSearch => {
            if state.query.text.is_empty() {
                return Ok(false);
            }
            let query = state.query.clone().text(String::new());
            state.apply_query(query)?;
            Ok(true)
        }
        Event::CategorySelected(label) => {
            if state.query.category == CategoryFilter::from_label(label) {
                return Ok(false);
            }
            let query = state.query.clone().category(label);
            state.apply_query(query)?;
            Ok(true)
        }
        Event::FlagSet { name, value } => {
            if state.query.boolean_filters.get(name) == Some(value) {
                return Ok(false);
            }
            let query = state.query.clone().require_flag(name.clone(), *value);
            state.apply_query(query)?;
            Ok(true)
        }
        Event::FlagCleared(name) => {
            if !state.query.boolean_filters.contains_key(name) {
                return Ok(false);
            }
            let mut query = state.query.clone();
            query.boolean_filters.remove(name);
            state.apply_query(query)?;
            Ok(true)
        }
        Event::SortSelected(key) => {
            let key: SortKey = key.parse()?;
            tracing::debug!(sort_key = %key, "sort selected");
            let mut query = state.query.clone().sort_by(key);
            query.sort_order = None;
            state.apply_query(query)?;
            Ok(true)
        }
        Event::SortOrderSelected(order) => {
            let query = state.query.clone().order(*order);
            state.apply_query(query)?;
            Ok(true)
        }
        Event::LocationResolved {
            latitude,
            longitude,
        } => {
            let point = GeoPoint::new(*latitude, *longitude)?;
            if state.query.reference_point == Some(point) {
                return Ok(false);
            }
            let query = state.query.clone().reference_point(point);
            state.apply_query(query)?;
            Ok(true)
        }
        Event::LocationUnavailable => {
            if state.query.reference_point.is_none() {
                return Ok(false);
            }
            tracing::debug!("reference point dropped");
            let mut query = state.query.clone();
            query.reference_point = None;
            state.apply_query(query)?;
            Ok(true)
        }
        Event::ShowMore(section) => {
            let window = state.window_mut(*section);
            let changed = !window.is_expanded();
            window.expand();
            Ok(changed)
        }
        Event::ShowLess(section) => {
            let window = state.window_mut(*section);
            let changed = window.is_expanded();
            window.collapse();
            Ok(changed)
        }
        Event::SectionsToggled => {
            state.layout = state.layout.toggled();
            Ok(true)
        }
    }
}

/// Event name without payload, so catalog contents stay out of span fields.
const fn event_name(event: &Event) -> &'static str {
    match event {
        Event::CatalogLoaded(_) => "CatalogLoaded",
        Event::SearchTextChanged(_) => "SearchTextChanged",
        Event::ClearSearch => "ClearSearch",
        Event::CategorySelected(_) => "CategorySelected",
        Event::FlagSet { .. } => "FlagSet",
        Event::FlagCleared(_) => "FlagCleared",
        Event::SortSelected(_) => "SortSelected",
        Event::SortOrderSelected(_) => "SortOrderSelected",
        Event::LocationResolved { .. } => "LocationResolved",
        Event::LocationUnavailable => "LocationUnavailable",
        Event::ShowMore(_) => "ShowMore",
        Event::ShowLess(_) => "ShowLess",
        Event::SectionsToggled => "SectionsToggled",
    }
}
