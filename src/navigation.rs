//! Cyclic navigation over the visible highlights.

use tracing::{debug, trace};

use crate::annotation::AnnotationSource;
use crate::config::ScrollAlign;
use crate::filter_core::FilterEngine;
use crate::highlights::{ElementSet, HighlightId};
use crate::toolbar::Toolbar;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Next,
    Previous,
}

impl<E, S, T> FilterEngine<E, S, T>
where
    E: ElementSet,
    S: AnnotationSource,
    T: Toolbar,
{
    pub fn on_next_click(&mut self) {
        self.navigate(Direction::Next);
    }

    pub fn on_previous_click(&mut self) {
        self.navigate(Direction::Previous);
    }

    /// Moves the active marker to the next visible highlight belonging to a
    /// different annotation, wrapping around at either end.
    pub fn navigate(&mut self, direction: Direction) {
        if self.highlights.is_empty() {
            trace!("no highlights to navigate");
            return;
        }
        let visible = self.highlights.visible();
        let current = visible.iter().position(|id| {
            self.highlights
                .state(*id)
                .is_some_and(|state| state.active)
        });
        let group = current
            .map(|index| self.annotation_group(visible[index]))
            .unwrap_or_default();

        let Some(target) = next_target(&visible, current, direction, &group) else {
            trace!("every highlight is hidden");
            return;
        };
        debug!(?direction, %target, "navigating");
        let targets = self.annotation_group(target);
        self.scroll_to_highlight(&targets);
    }

    /// Marks `targets` as the only active highlights and scrolls the first
    /// of them into view below the toolbar.
    pub fn scroll_to_highlight(&mut self, targets: &[HighlightId]) {
        for id in self.highlights.ids() {
            self.highlights.set_active(id, false);
        }
        for id in targets {
            self.highlights.set_active(*id, true);
        }

        let Some(offset) = targets
            .first()
            .and_then(|id| self.highlights.offset_top(*id))
        else {
            return;
        };
        let scroll = &self.config.scroll;
        let top = match scroll.align {
            ScrollAlign::Top => offset - (self.toolbar.height() + scroll.header_clearance),
            ScrollAlign::Center => offset - self.highlights.viewport_height() / 2.0,
        };
        self.highlights.scroll_to(top.max(0.0), scroll.smooth);
    }

    /// Every highlight of the annotation owning `id`, or just `id` when no
    /// annotation claims it.
    fn annotation_group(&self, id: HighlightId) -> Vec<HighlightId> {
        self.source
            .owner_of(id)
            .map(|annotation| annotation.highlights.clone())
            .unwrap_or_else(|| vec![id])
    }
}

fn next_target(
    visible: &[HighlightId],
    current: Option<usize>,
    direction: Direction,
    group: &[HighlightId],
) -> Option<HighlightId> {
    let wrapped = match direction {
        Direction::Next => visible.first(),
        Direction::Previous => visible.last(),
    };
    let Some(index) = current else {
        return wrapped.copied();
    };
    let outside_group = |id: &&HighlightId| !group.contains(id);
    let candidate = match direction {
        Direction::Next => visible[index + 1..].iter().find(outside_group),
        Direction::Previous => visible[..index].iter().rev().find(outside_group),
    };
    candidate.or(wrapped).copied()
}
