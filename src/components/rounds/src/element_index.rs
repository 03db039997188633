use crate::{Host, StepId};
use element::{AnnotationKind, Element, ElementsByKind};
use indexmap::IndexSet;

/// Which annotated elements exist this round, and which of them each step
/// has already been shown.
#[derive(Debug, Default)]
pub struct ElementIndex {
    tracked: IndexSet<AnnotationKind>,
    presented: Vec<IndexSet<Element>>,
}

impl ElementIndex {
    pub fn new(tracked: IndexSet<AnnotationKind>, num_steps: usize) -> Self {
        Self {
            tracked,
            presented: vec![IndexSet::new(); num_steps],
        }
    }

    pub fn tracked_kinds(&self) -> &IndexSet<AnnotationKind> {
        &self.tracked
    }

    /// Every visible element carrying a tracked kind, old or new.
    pub fn snapshot<H: Host + ?Sized>(&self, host: &H) -> ElementsByKind {
        let mut visible = ElementsByKind::new();

        for kind in self.tracked.iter().copied() {
            visible.extend_kind(kind, host.current_round_elements(kind));
        }

        visible
    }

    pub fn is_new(&self, element: Element, step: StepId) -> bool {
        self.presented
            .get(step.index())
            .map_or(true, |presented| !presented.contains(&element))
    }

    /// The part of `snapshot` that `step` is interested in and has never seen.
    pub fn fresh_for(
        &self,
        step: StepId,
        interest: &IndexSet<AnnotationKind>,
        snapshot: &ElementsByKind,
    ) -> ElementsByKind {
        snapshot
            .restricted_to(interest)
            .filter_elements(|element| self.is_new(element, step))
    }

    pub fn mark_presented(&mut self, step: StepId, elements: impl IntoIterator<Item = Element>) {
        if let Some(presented) = self.presented.get_mut(step.index()) {
            presented.extend(elements);
        }
    }
}
