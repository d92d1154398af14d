//! The filter toolbar: where filter inputs live and how the engine talks to them.

use std::fmt;

use crate::error::FilterError;

const FILTER_ID_PREFIX: &str = "annotator-filter-";

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct FilterId(String);

impl FilterId {
    pub fn for_property(property: &str) -> Self {
        Self(format!("{FILTER_ID_PREFIX}{property}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FilterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a toolbar needs to render the input for one filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilterView {
    pub id: FilterId,
    pub label: String,
    pub property: String,
    pub placeholder: String,
}

impl FilterView {
    pub fn new(label: &str, property: &str) -> Self {
        Self {
            id: FilterId::for_property(property),
            label: label.to_string(),
            property: property.to_string(),
            placeholder: format!("Filter by {label}\u{2026}"),
        }
    }
}

/// Handle on the input element bound to a filter.
pub trait FilterControl {
    fn value(&self) -> String;

    fn set_value(&mut self, value: &str);

    /// Toggles the presentational "active" marker on the input's container.
    fn set_active(&mut self, active: bool);

    fn is_active(&self) -> bool;
}

pub trait Toolbar {
    /// Attaches the toolbar to the element matched by `append_to`.
    fn attach(&mut self, append_to: &str) -> Result<(), FilterError>;

    /// Appends an input for `view` after the existing ones and returns the
    /// handle bound to it.
    fn append_filter(&mut self, view: &FilterView) -> Box<dyn FilterControl>;

    /// Removes the toolbar and every filter input.
    fn detach(&mut self);

    /// Rendered height, kept clear when scrolling to a highlight.
    fn height(&self) -> f64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_derives_id_and_placeholder() {
        let view = FilterView::new("Tag", "tags");
        assert_eq!(view.id.as_str(), "annotator-filter-tags");
        assert_eq!(view.id.to_string(), "annotator-filter-tags");
        assert_eq!(view.placeholder, "Filter by Tag\u{2026}");
    }
}
