//! List layout and section types.
//!
//! A result list is shown either as one section or, when the device position is
//! known, as two sections split at the nearby threshold.
//!
//! # Example
//!
//! ```rust
//! use marketview::app::{ListLayout, Section};
//!
//! let layout = ListLayout::Sectioned;
//! assert_eq!(layout.toggled(), ListLayout::Single);
//! assert_eq!(Section::Nearby.title(), "Nearby");
//! ```

/// How results are grouped for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListLayout {
    /// Nearby and other sections when a reference point is known.
    #[default]
    Sectioned,
    /// A single section in sort order.
    Single,
}

impl ListLayout {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Sectioned => Self::Single,
            Self::Single => Self::Sectioned,
        }
    }
}

/// A displayed group of results with its own "show more" window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    Nearby,
    Other,
    All,
}

impl Section {
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Nearby => "Nearby",
            Self::Other => "Other listings",
            Self::All => "All listings",
        }
    }
}
