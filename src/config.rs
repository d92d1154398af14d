use serde::{Deserialize, Serialize};

use crate::error::FilterError;
use crate::predicate::MatchMode;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterConfig {
    /// Selector scoping the highlight query. `None` searches the whole page.
    pub filter_element: Option<String>,
    /// Selector of the element the toolbar is mounted into.
    pub append_to: String,
    pub add_annotation_filter: bool,
    pub filters: Vec<FilterSpec>,
    pub classes: FilterClasses,
    pub scroll: ScrollOptions,
    pub log_level: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            filter_element: None,
            append_to: "body".to_string(),
            add_annotation_filter: true,
            filters: Vec::new(),
            classes: FilterClasses::default(),
            scroll: ScrollOptions::default(),
            log_level: "info".to_string(),
        }
    }
}

impl FilterConfig {
    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSpec {
    pub label: String,
    pub property: String,
    #[serde(default)]
    pub match_mode: MatchMode,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FilterClasses {
    /// Set on a filter's container while it is focused or holds a value.
    pub active: String,
    /// Marks rendered highlight elements.
    pub highlight: String,
    pub hidden: String,
    pub highlight_active: String,
}

impl Default for FilterClasses {
    fn default() -> Self {
        Self {
            active: "annotator-filter-active".to_string(),
            highlight: "annotator-hl".to_string(),
            hidden: "annotator-hl-filtered".to_string(),
            highlight_active: "annotator-hl-active".to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollAlign {
    #[default]
    Top,
    Center,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScrollOptions {
    /// Extra space kept between the toolbar and a scrolled-to highlight.
    pub header_clearance: f64,
    pub align: ScrollAlign,
    pub smooth: bool,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            header_clearance: 20.0,
            align: ScrollAlign::Top,
            smooth: true,
        }
    }
}
