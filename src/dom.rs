//! Browser bindings: the rendering-layer side of the engine's traits.
//!
//! Hidden/active state lives in CSS classes on the page's highlight
//! elements; these adapters translate between the classes and the
//! engine's boolean markers.

use leptos::prelude::*;
use tracing::{debug, warn};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, ScrollBehavior, ScrollToOptions};

use crate::annotation::{AnnotationSource, AnnotationStore};
use crate::config::{FilterClasses, FilterConfig};
use crate::document::{attach_document, DocumentSource, Link, Metadata, PageLocation};
use crate::error::FilterError;
use crate::highlights::{ElementSet, HighlightId, HighlightState};
use crate::toolbar::{FilterControl, FilterView, Toolbar};

pub const TOOLBAR_ID: &str = "annotator-filter";
const CONFIG_GLOBAL: &str = "annotatorFilterConfig";
const ANNOTATIONS_SCRIPT_ID: &str = "annotator-annotations";
const HIGHLIGHT_ID_ATTR: &str = "data-highlight-id";

fn document() -> Option<Document> {
    web_sys::window().and_then(|window| window.document())
}

pub fn mount_point(selector: &str) -> Result<HtmlElement, FilterError> {
    let document = document().ok_or_else(|| FilterError::Dom("no document".to_string()))?;
    document
        .query_selector(selector)
        .map_err(|err| FilterError::dom("query mount point", err))?
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
        .ok_or_else(|| FilterError::MountPointNotFound(selector.to_string()))
}

/// Reads `window.annotatorFilterConfig`, defaulting when the page sets none.
pub fn load_config() -> Result<FilterConfig, FilterError> {
    let Some(window) = web_sys::window() else {
        return Ok(FilterConfig::default());
    };
    let value = js_sys::Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL))
        .map_err(|err| FilterError::dom("read config global", err))?;
    if value.is_undefined() || value.is_null() {
        return Ok(FilterConfig::default());
    }
    serde_wasm_bindgen::from_value(value).map_err(|err| FilterError::Config(err.to_string()))
}

/// Loads the page's annotations from its `application/json` script block.
/// Annotations without document metadata get the current page's.
pub fn load_annotations(source: &impl DocumentSource) -> Result<AnnotationStore, FilterError> {
    let script = document().and_then(|doc| doc.get_element_by_id(ANNOTATIONS_SCRIPT_ID));
    let Some(script) = script else {
        debug!("page provides no annotations");
        return Ok(AnnotationStore::default());
    };
    let json = script.text_content().unwrap_or_default();
    let store = AnnotationStore::from_json(&json)?;

    let mut enriched = AnnotationStore::default();
    for annotation in store.annotations() {
        let mut annotation = (*annotation).clone();
        if annotation.field("document").is_none() {
            attach_document(&mut annotation, source);
        }
        enriched.push(annotation);
    }
    Ok(enriched)
}

/// Pads the top of the page so the fixed toolbar does not cover content.
pub fn insert_spacer(height: f64) {
    let Some(root) = document()
        .and_then(|doc| doc.document_element())
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    else {
        return;
    };
    if let Err(err) = root.style().set_property("padding-top", &format!("{height}px")) {
        warn!(?err, "could not insert toolbar spacer");
    }
}

fn remove_spacer() {
    if let Some(root) = document()
        .and_then(|doc| doc.document_element())
        .and_then(|element| element.dyn_into::<HtmlElement>().ok())
    {
        if let Err(err) = root.style().remove_property("padding-top") {
            warn!(?err, "could not remove toolbar spacer");
        }
    }
}

pub struct DomElementSet {
    root: Option<String>,
    classes: FilterClasses,
    elements: Vec<(HighlightId, HtmlElement)>,
}

impl DomElementSet {
    pub fn new(root: Option<String>, classes: FilterClasses) -> Self {
        Self {
            root,
            classes,
            elements: Vec::new(),
        }
    }

    fn element(&self, id: HighlightId) -> Option<&HtmlElement> {
        self.elements
            .iter()
            .find(|(candidate, _)| *candidate == id)
            .map(|(_, element)| element)
    }

    fn toggle(&self, id: HighlightId, class: &str, on: bool) {
        if let Some(element) = self.element(id) {
            if let Err(err) = element.class_list().toggle_with_force(class, on) {
                warn!(%id, class, ?err, "class toggle failed");
            }
        }
    }
}

impl ElementSet for DomElementSet {
    fn refresh(&mut self) {
        let Some(document) = document() else {
            return;
        };
        let selector = match &self.root {
            Some(root) => format!("{root} .{}", self.classes.highlight),
            None => format!(".{}", self.classes.highlight),
        };
        let nodes = match document.query_selector_all(&selector) {
            Ok(nodes) => nodes,
            Err(err) => {
                warn!(selector, ?err, "highlight query failed");
                return;
            }
        };

        self.elements = (0..nodes.length())
            .filter_map(|index| nodes.item(index))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .filter_map(|element| {
                let id = element.get_attribute(HIGHLIGHT_ID_ATTR)?.parse().ok()?;
                Some((HighlightId(id), element))
            })
            .collect();
        debug!(count = self.elements.len(), "highlights refreshed");
    }

    fn ids(&self) -> Vec<HighlightId> {
        self.elements.iter().map(|(id, _)| *id).collect()
    }

    fn state(&self, id: HighlightId) -> Option<HighlightState> {
        let classes = self.element(id)?.class_list();
        Some(HighlightState {
            hidden: classes.contains(&self.classes.hidden),
            active: classes.contains(&self.classes.highlight_active),
        })
    }

    fn set_hidden(&mut self, id: HighlightId, hidden: bool) {
        self.toggle(id, &self.classes.hidden, hidden);
    }

    fn set_active(&mut self, id: HighlightId, active: bool) {
        self.toggle(id, &self.classes.highlight_active, active);
    }

    fn offset_top(&self, id: HighlightId) -> Option<f64> {
        let element = self.element(id)?;
        let scroll_y = web_sys::window()?.scroll_y().ok()?;
        Some(element.get_bounding_client_rect().top() + scroll_y)
    }

    fn viewport_height(&self) -> f64 {
        web_sys::window()
            .and_then(|window| window.inner_height().ok())
            .and_then(|height| height.as_f64())
            .unwrap_or_default()
    }

    fn scroll_to(&mut self, top: f64, smooth: bool) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(if smooth {
            ScrollBehavior::Smooth
        } else {
            ScrollBehavior::Auto
        });
        window.scroll_to_with_scroll_to_options(&options);
    }
}

/// Toolbar rendered by the `App` component. Appending a filter pushes its
/// view into the signal the component renders from.
pub struct DomToolbar {
    filters: RwSignal<Vec<FilterView>>,
    active_class: String,
}

impl DomToolbar {
    pub fn new(filters: RwSignal<Vec<FilterView>>, classes: &FilterClasses) -> Self {
        Self {
            filters,
            active_class: classes.active.clone(),
        }
    }
}

impl Toolbar for DomToolbar {
    fn attach(&mut self, append_to: &str) -> Result<(), FilterError> {
        mount_point(append_to).map(|_| ())
    }

    fn append_filter(&mut self, view: &FilterView) -> Box<dyn FilterControl> {
        self.filters.update(|filters| filters.push(view.clone()));
        Box::new(DomControl {
            input_id: view.id.to_string(),
            active_class: self.active_class.clone(),
        })
    }

    fn detach(&mut self) {
        self.filters.set(Vec::new());
        remove_spacer();
    }

    fn height(&self) -> f64 {
        document()
            .and_then(|doc| doc.get_element_by_id(TOOLBAR_ID))
            .and_then(|element| element.dyn_into::<HtmlElement>().ok())
            .map(|element| f64::from(element.offset_height()))
            .unwrap_or_default()
    }
}

/// The `<input>` rendered for a filter, looked up by id on each access.
struct DomControl {
    input_id: String,
    active_class: String,
}

impl DomControl {
    fn input(&self) -> Option<HtmlInputElement> {
        document()?
            .get_element_by_id(&self.input_id)?
            .dyn_into::<HtmlInputElement>()
            .ok()
    }

    fn container(&self) -> Option<Element> {
        self.input()?.parent_element()
    }
}

impl FilterControl for DomControl {
    fn value(&self) -> String {
        self.input().map(|input| input.value()).unwrap_or_default()
    }

    fn set_value(&mut self, value: &str) {
        if let Some(input) = self.input() {
            input.set_value(value);
        }
    }

    fn set_active(&mut self, active: bool) {
        if let Some(container) = self.container() {
            let toggled = container
                .class_list()
                .toggle_with_force(&self.active_class, active);
            if let Err(err) = toggled {
                warn!(input = %self.input_id, ?err, "filter container toggle failed");
            }
        }
    }

    fn is_active(&self) -> bool {
        self.container()
            .is_some_and(|container| container.class_list().contains(&self.active_class))
    }
}

/// Document collaborator backed by the live page. Head-tag metadata schemas
/// are not read; only the title and current URL are reported.
pub struct DomDocument;

impl DomDocument {
    fn location() -> Option<PageLocation> {
        let location = web_sys::window()?.location();
        Some(PageLocation::new(
            &location.protocol().ok()?,
            &location.host().ok()?,
            &location.pathname().ok()?,
        ))
    }
}

impl DocumentSource for DomDocument {
    fn document_metadata(&self) -> Metadata {
        let title = document().map(|doc| doc.title()).unwrap_or_default();
        let href = web_sys::window()
            .and_then(|window| window.location().href().ok())
            .unwrap_or_default();
        Metadata {
            title,
            link: vec![Link::href(href)],
            ..Metadata::default()
        }
    }

    fn absolute_url(&self, path: &str) -> String {
        match Self::location() {
            Some(location) => location.absolute_url(path),
            None => path.to_string(),
        }
    }
}
