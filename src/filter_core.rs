use std::collections::HashSet;
use std::rc::Rc;
use tracing::{debug, trace};

use crate::annotation::{Annotation, AnnotationSource};
use crate::config::{FilterConfig, FilterSpec};
use crate::error::FilterError;
use crate::highlights::{ElementSet, HighlightId};
use crate::predicate::{KeywordPredicate, Predicate};
use crate::toolbar::{FilterControl, FilterId, FilterView, Toolbar};

/// Registration request for a filter. Without a predicate the engine's
/// default keyword matching is used.
pub struct FilterDefinition {
    pub label: String,
    pub property: String,
    pub predicate: Option<Box<dyn Predicate>>,
}

impl FilterDefinition {
    pub fn new(label: impl Into<String>, property: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            property: property.into(),
            predicate: None,
        }
    }

    pub fn with_predicate(mut self, predicate: impl Predicate + 'static) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }
}

impl From<&FilterSpec> for FilterDefinition {
    fn from(spec: &FilterSpec) -> Self {
        Self {
            label: spec.label.clone(),
            property: spec.property.clone(),
            predicate: Some(spec.match_mode.predicate()),
        }
    }
}

pub struct Filter {
    pub id: FilterId,
    pub label: String,
    pub property: String,
    /// Matches from the last evaluation with a non-blank input.
    pub annotations: Vec<Rc<Annotation>>,
    /// Number of times this filter has been evaluated.
    revision: u64,
    predicate: Box<dyn Predicate>,
    control: Box<dyn FilterControl>,
}

impl Filter {
    pub fn control(&self) -> &dyn FilterControl {
        self.control.as_ref()
    }

    /// A filter only constrains visibility while it has matches.
    pub fn is_constraining(&self) -> bool {
        !self.annotations.is_empty()
    }

    fn visible_highlights(&self) -> HashSet<HighlightId> {
        self.annotations
            .iter()
            .flat_map(|annotation| annotation.highlights.iter().copied())
            .collect()
    }
}

pub struct FilterEngine<E, S, T> {
    pub(crate) config: FilterConfig,
    pub(crate) filters: Vec<Filter>,
    pub(crate) highlights: E,
    pub(crate) source: S,
    pub(crate) toolbar: T,
}

impl<E, S, T> FilterEngine<E, S, T>
where
    E: ElementSet,
    S: AnnotationSource,
    T: Toolbar,
{
    pub fn new(
        config: FilterConfig,
        highlights: E,
        source: S,
        mut toolbar: T,
    ) -> Result<Self, FilterError> {
        toolbar.attach(&config.append_to)?;
        let mut engine = Self {
            config,
            filters: Vec::new(),
            highlights,
            source,
            toolbar,
        };

        if engine.config.add_annotation_filter {
            engine.add_filter(FilterDefinition::new("Annotation", "text"))?;
        }
        let specs = engine.config.filters.clone();
        for spec in &specs {
            engine.add_filter(spec.into())?;
        }
        engine.update_highlights();

        debug!(
            filters = engine.filters.len(),
            highlights = engine.highlights.ids().len(),
            "filter engine ready"
        );
        Ok(engine)
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn filter(&self, id: &FilterId) -> Option<&Filter> {
        self.filters.iter().find(|filter| &filter.id == id)
    }

    pub fn highlights(&self) -> &E {
        &self.highlights
    }

    pub fn highlights_mut(&mut self) -> &mut E {
        &mut self.highlights
    }

    pub fn toolbar(&self) -> &T {
        &self.toolbar
    }

    pub fn visible_highlights(&self) -> Vec<HighlightId> {
        self.highlights.visible()
    }

    /// Registers a filter and binds a toolbar input to it. A second filter
    /// for an already registered property is ignored.
    pub fn add_filter(
        &mut self,
        definition: FilterDefinition,
    ) -> Result<Option<FilterId>, FilterError> {
        let property = definition.property.trim();
        if property.is_empty() {
            return Err(FilterError::MissingProperty {
                label: definition.label,
            });
        }
        if self.filters.iter().any(|filter| filter.property == property) {
            debug!(property, "filter already registered");
            return Ok(None);
        }

        let view = FilterView::new(&definition.label, property);
        let control = self.toolbar.append_filter(&view);
        let predicate = definition
            .predicate
            .unwrap_or_else(|| Box::new(KeywordPredicate));

        debug!(id = %view.id, "filter added");
        let id = view.id.clone();
        self.filters.push(Filter {
            id: view.id,
            label: view.label,
            property: view.property,
            annotations: Vec::new(),
            revision: 0,
            predicate,
            control,
        });
        Ok(Some(id))
    }

    /// Re-reads the highlight elements from the rendering layer.
    pub fn update_highlights(&mut self) {
        self.highlights.refresh();
    }

    /// Called whenever annotations are loaded, created, updated or deleted.
    pub fn on_annotations_changed(&mut self) {
        self.update_highlights();
    }

    /// Replaces the annotation collection after it changed. Current matches
    /// stay in place until their filter is next evaluated.
    pub fn set_annotations(&mut self, source: S) {
        self.source = source;
        self.on_annotations_changed();
    }

    /// Re-evaluates one filter against the live annotations and re-derives
    /// visibility across all filters. A blank input resets visibility but
    /// keeps the previous matches and skips the intersection pass.
    pub fn update_filter(&mut self, id: &FilterId) {
        self.update_highlights();
        self.reset_highlights();

        let Some(index) = self.filters.iter().position(|filter| &filter.id == id) else {
            debug!(%id, "update for unknown filter ignored");
            return;
        };
        let filter = &mut self.filters[index];
        filter.revision += 1;

        let input = filter.control.value();
        let input = input.trim();
        if input.is_empty() {
            trace!(%id, "blank input, skipping filter pass");
            return;
        }

        filter.annotations = self
            .source
            .annotations()
            .into_iter()
            .filter(|annotation| {
                filter
                    .predicate
                    .is_filtered(input, annotation.field(&filter.property))
            })
            .collect();
        debug!(
            %id,
            input,
            revision = filter.revision,
            matches = filter.annotations.len(),
            "filter evaluated"
        );

        self.filter_highlights();
    }

    /// Clears the hidden marker from every tracked highlight.
    pub fn reset_highlights(&mut self) {
        for id in self.highlights.ids() {
            self.highlights.set_hidden(id, false);
        }
    }

    /// Hides every highlight not owned by a match of each constraining
    /// filter. Filters without matches do not take part; with none left
    /// nothing is hidden.
    pub fn filter_highlights(&mut self) {
        let mut constraining = self
            .filters
            .iter()
            .filter(|filter| filter.is_constraining())
            .map(Filter::visible_highlights);

        let Some(first) = constraining.next() else {
            trace!("no constraining filters");
            return;
        };
        let shown = constraining.fold(first, |shown, next| {
            shown.intersection(&next).copied().collect()
        });

        let mut hidden = 0usize;
        for id in self.highlights.ids() {
            if !shown.contains(&id) {
                self.highlights.set_hidden(id, true);
                hidden += 1;
            }
        }
        debug!(shown = shown.len(), hidden, "highlights filtered");
    }

    pub fn on_filter_focus(&mut self, id: &FilterId) {
        if let Some(filter) = self.filter_mut(id) {
            filter.control.set_active(true);
        }
    }

    /// Leaves the container active while the input still holds a value.
    pub fn on_filter_blur(&mut self, id: &FilterId) {
        if let Some(filter) = self.filter_mut(id) {
            if filter.control.value().is_empty() {
                filter.control.set_active(false);
            }
        }
    }

    pub fn on_filter_keyup(&mut self, id: &FilterId) {
        if self.filter(id).is_none() {
            debug!(%id, "keyup from unbound input ignored");
            return;
        }
        self.update_filter(id);
    }

    /// Empties the input, then runs the same keyup and blur handling a
    /// manual edit would.
    pub fn on_clear_click(&mut self, id: &FilterId) {
        let Some(filter) = self.filter_mut(id) else {
            return;
        };
        filter.control.set_value("");
        self.on_filter_keyup(id);
        self.on_filter_blur(id);
    }

    pub fn destroy(&mut self) {
        for id in self.highlights.ids() {
            self.highlights.set_hidden(id, false);
            self.highlights.set_active(id, false);
        }
        self.filters.clear();
        self.toolbar.detach();
        debug!("filter engine destroyed");
    }

    fn filter_mut(&mut self, id: &FilterId) -> Option<&mut Filter> {
        self.filters.iter_mut().find(|filter| &filter.id == id)
    }
}
