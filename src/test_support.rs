//! In-memory stand-ins for the rendering layer, used by unit tests.

use serde_json::{json, Map};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::annotation::{Annotation, AnnotationStore};
use crate::config::FilterConfig;
use crate::error::FilterError;
use crate::filter_core::FilterEngine;
use crate::highlights::{ElementSet, HighlightId, HighlightState};
use crate::toolbar::{FilterControl, FilterId, FilterView, Toolbar};

pub type TestEngine = FilterEngine<MemoryElementSet, AnnotationStore, MemoryToolbar>;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub smooth: bool,
}

#[derive(Clone, Debug)]
pub struct MemoryElement {
    pub id: HighlightId,
    pub state: HighlightState,
    pub offset_top: f64,
}

#[derive(Clone, Debug, Default)]
pub struct MemoryElementSet {
    pub elements: Vec<MemoryElement>,
    pub viewport_height: f64,
    pub scrolls: Vec<ScrollRequest>,
    pub refreshes: usize,
}

impl MemoryElementSet {
    /// `count` elements with ids `0..count`, stacked 100px apart.
    pub fn with_count(count: u32) -> Self {
        Self {
            elements: (0..count)
                .map(|i| MemoryElement {
                    id: HighlightId(i),
                    state: HighlightState::default(),
                    offset_top: f64::from(i) * 100.0,
                })
                .collect(),
            viewport_height: 600.0,
            ..Self::default()
        }
    }

    fn element_mut(&mut self, id: HighlightId) -> Option<&mut MemoryElement> {
        self.elements.iter_mut().find(|element| element.id == id)
    }
}

impl ElementSet for MemoryElementSet {
    fn refresh(&mut self) {
        self.refreshes += 1;
    }

    fn ids(&self) -> Vec<HighlightId> {
        self.elements.iter().map(|element| element.id).collect()
    }

    fn state(&self, id: HighlightId) -> Option<HighlightState> {
        self.elements
            .iter()
            .find(|element| element.id == id)
            .map(|element| element.state)
    }

    fn set_hidden(&mut self, id: HighlightId, hidden: bool) {
        if let Some(element) = self.element_mut(id) {
            element.state.hidden = hidden;
        }
    }

    fn set_active(&mut self, id: HighlightId, active: bool) {
        if let Some(element) = self.element_mut(id) {
            element.state.active = active;
        }
    }

    fn offset_top(&self, id: HighlightId) -> Option<f64> {
        self.elements
            .iter()
            .find(|element| element.id == id)
            .map(|element| element.offset_top)
    }

    fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    fn scroll_to(&mut self, top: f64, smooth: bool) {
        self.scrolls.push(ScrollRequest { top, smooth });
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ControlCall {
    SetValue(String),
    SetActive(bool),
}

#[derive(Debug, Default)]
pub struct ControlState {
    pub value: String,
    pub active: bool,
    pub calls: Vec<ControlCall>,
}

pub struct MemoryControl(Rc<RefCell<ControlState>>);

impl FilterControl for MemoryControl {
    fn value(&self) -> String {
        self.0.borrow().value.clone()
    }

    fn set_value(&mut self, value: &str) {
        let mut state = self.0.borrow_mut();
        state.value = value.to_string();
        state.calls.push(ControlCall::SetValue(value.to_string()));
    }

    fn set_active(&mut self, active: bool) {
        let mut state = self.0.borrow_mut();
        state.active = active;
        state.calls.push(ControlCall::SetActive(active));
    }

    fn is_active(&self) -> bool {
        self.0.borrow().active
    }
}

#[derive(Default)]
pub struct MemoryToolbar {
    pub mount: Option<String>,
    pub toolbar_height: f64,
    pub reject_mounts: bool,
    appended: Vec<FilterView>,
    controls: HashMap<FilterId, Rc<RefCell<ControlState>>>,
}

impl MemoryToolbar {
    pub fn without_mount_points() -> Self {
        Self {
            reject_mounts: true,
            ..Self::default()
        }
    }

    pub fn appended(&self) -> &[FilterView] {
        &self.appended
    }

    /// Shared state behind the control bound to `id`. Panics when no such
    /// filter was appended.
    pub fn control(&self, id: &FilterId) -> Rc<RefCell<ControlState>> {
        self.controls[id].clone()
    }
}

impl Toolbar for MemoryToolbar {
    fn attach(&mut self, append_to: &str) -> Result<(), FilterError> {
        if self.reject_mounts {
            return Err(FilterError::MountPointNotFound(append_to.to_string()));
        }
        self.mount = Some(append_to.to_string());
        Ok(())
    }

    fn append_filter(&mut self, view: &FilterView) -> Box<dyn FilterControl> {
        let state = Rc::new(RefCell::new(ControlState::default()));
        self.appended.push(view.clone());
        self.controls.insert(view.id.clone(), state.clone());
        Box::new(MemoryControl(state))
    }

    fn detach(&mut self) {
        self.mount = None;
        self.appended.clear();
    }

    fn height(&self) -> f64 {
        self.toolbar_height
    }
}

/// Configuration without any pre-registered filter.
pub fn bare_config() -> FilterConfig {
    FilterConfig {
        add_annotation_filter: false,
        ..FilterConfig::default()
    }
}

pub fn annotation(text: &str, highlights: &[u32]) -> Annotation {
    let mut fields = Map::new();
    fields.insert("text".to_string(), json!(text));
    Annotation::new(
        fields,
        highlights.iter().copied().map(HighlightId).collect(),
    )
}

pub fn engine_with(highlights: u32, annotations: Vec<Annotation>) -> TestEngine {
    engine_with_config(bare_config(), highlights, annotations)
}

pub fn engine_with_config(
    config: FilterConfig,
    highlights: u32,
    annotations: Vec<Annotation>,
) -> TestEngine {
    match FilterEngine::new(
        config,
        MemoryElementSet::with_count(highlights),
        AnnotationStore::new(annotations),
        MemoryToolbar::default(),
    ) {
        Ok(engine) => engine,
        Err(err) => panic!("test engine failed to build: {err}"),
    }
}

impl TestEngine {
    /// Replaces a filter's matches without evaluating its predicate.
    pub fn set_matches(&mut self, id: &FilterId, matches: Vec<Rc<Annotation>>) {
        if let Some(filter) = self.filters.iter_mut().find(|filter| &filter.id == id) {
            filter.annotations = matches;
        }
    }
}
