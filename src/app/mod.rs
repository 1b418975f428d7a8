//! Presentation-state layer around the engine.
//!
//! The engine is stateless; this layer owns what a list screen needs between
//! renders and re-invokes the engine whenever an input changes.
//!
//! ```text
//! UI Input → Events → handle_event → Query change → engine::run → View model
//! ```
//!
//! # Modules
//!
//! - [`handler`]: Event processing and state transitions
//! - [`modes`]: Layout and section types
//! - [`state`]: Catalog list state and view model computation
//! - [`viewmodel`]: Display-ready view model types

pub mod handler;
pub mod modes;
pub mod state;
pub mod viewmodel;

pub use handler::{handle_event, Event};
pub use modes::{ListLayout, Section};
pub use state::CatalogState;
pub use viewmodel::{CatalogViewModel, DisplayItem, EmptyState, SectionView};
