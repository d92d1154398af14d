use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::rc::Rc;
use tracing::debug;

use crate::error::FilterError;
use crate::highlights::HighlightId;

/// An annotation as the filter engine sees it: arbitrary named fields plus the
/// highlight elements rendered for its ranges.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub highlights: Vec<HighlightId>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Annotation {
    pub fn new(fields: Map<String, Value>, highlights: Vec<HighlightId>) -> Self {
        Self {
            id: None,
            highlights,
            fields,
        }
    }

    pub fn field(&self, property: &str) -> Option<&Value> {
        self.fields.get(property)
    }

    pub fn owns(&self, highlight: HighlightId) -> bool {
        self.highlights.contains(&highlight)
    }
}

/// The live annotation collection the engine filters over.
pub trait AnnotationSource {
    fn annotations(&self) -> Vec<Rc<Annotation>>;

    /// First annotation, in source order, that owns `highlight`.
    fn owner_of(&self, highlight: HighlightId) -> Option<Rc<Annotation>> {
        self.annotations()
            .into_iter()
            .find(|annotation| annotation.owns(highlight))
    }
}

#[derive(Clone, Debug, Default)]
pub struct AnnotationStore {
    annotations: Vec<Rc<Annotation>>,
}

impl AnnotationStore {
    pub fn new(annotations: Vec<Annotation>) -> Self {
        Self {
            annotations: annotations.into_iter().map(Rc::new).collect(),
        }
    }

    /// Parses a JSON array of annotations.
    pub fn from_json(json: &str) -> Result<Self, FilterError> {
        let annotations: Vec<Annotation> = serde_json::from_str(json)?;
        debug!(count = annotations.len(), "loaded annotations");
        Ok(Self::new(annotations))
    }

    pub fn push(&mut self, annotation: Annotation) {
        self.annotations.push(Rc::new(annotation));
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

impl AnnotationSource for AnnotationStore {
    fn annotations(&self) -> Vec<Rc<Annotation>> {
        self.annotations.clone()
    }
}
