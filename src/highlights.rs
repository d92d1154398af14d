//! Rendered highlight elements as seen by the filter engine.
//!
//! The engine never owns the rendered nodes. It reads and flips two boolean
//! markers per element through an [`ElementSet`], which the rendering layer
//! implements (see `dom::DomElementSet`).

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighlightId(pub u32);

impl fmt::Display for HighlightId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hl-{}", self.0)
    }
}

/// Visual state of one highlight element. `hidden` and `active` are
/// independent: an element can carry both, either or neither.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HighlightState {
    pub hidden: bool,
    pub active: bool,
}

/// Ordered collection of highlight elements, in document order.
pub trait ElementSet {
    /// Re-reads the tracked elements from the rendering layer.
    fn refresh(&mut self) {}

    fn ids(&self) -> Vec<HighlightId>;

    fn state(&self, id: HighlightId) -> Option<HighlightState>;

    fn set_hidden(&mut self, id: HighlightId, hidden: bool);

    fn set_active(&mut self, id: HighlightId, active: bool);

    /// Vertical document offset of the element, if it is tracked.
    fn offset_top(&self, id: HighlightId) -> Option<f64>;

    fn viewport_height(&self) -> f64;

    fn scroll_to(&mut self, top: f64, smooth: bool);

    fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }

    /// The visible set: every element whose hidden marker is clear.
    fn visible(&self) -> Vec<HighlightId> {
        self.ids()
            .into_iter()
            .filter(|id| self.state(*id).is_some_and(|state| !state.hidden))
            .collect()
    }

    fn hidden(&self) -> Vec<HighlightId> {
        self.ids()
            .into_iter()
            .filter(|id| self.state(*id).is_some_and(|state| state.hidden))
            .collect()
    }

    fn active(&self) -> Vec<HighlightId> {
        self.ids()
            .into_iter()
            .filter(|id| self.state(*id).is_some_and(|state| state.active))
            .collect()
    }
}
