use crate::StepId;
use element::ElementsByKind;

/// What each step deferred in the most recent round it ran.
#[derive(Debug, Default)]
pub struct DeferralTracker {
    pending: Vec<ElementsByKind>,
}

impl DeferralTracker {
    pub fn new(num_steps: usize) -> Self {
        Self {
            pending: vec![ElementsByKind::new(); num_steps],
        }
    }

    /// Replaces whatever `step` had pending. Anything it no longer lists is
    /// considered resolved by that step.
    pub fn record_deferrals(&mut self, step: StepId, deferred: ElementsByKind) {
        if let Some(pending) = self.pending.get_mut(step.index()) {
            *pending = deferred;
        }
    }

    pub fn pending(&self, step: StepId) -> Option<&ElementsByKind> {
        self.pending.get(step.index())
    }

    /// Steps with something pending, in registration order.
    pub fn pending_all(&self) -> impl Iterator<Item = (StepId, &ElementsByKind)> {
        self.pending
            .iter()
            .enumerate()
            .filter(|(_, pending)| !pending.is_empty())
            .map(|(index, pending)| (StepId(index), pending))
    }

    pub fn has_pending(&self) -> bool {
        self.pending.iter().any(|pending| !pending.is_empty())
    }

    /// Number of (step, element) pairs still pending.
    pub fn pending_count(&self) -> usize {
        self.pending.iter().map(ElementsByKind::len).sum()
    }

    /// Empties every step's pending set, returning what was there.
    pub fn drain(&mut self) -> Vec<(StepId, ElementsByKind)> {
        self.pending
            .iter_mut()
            .enumerate()
            .filter(|(_, pending)| !pending.is_empty())
            .map(|(index, pending)| (StepId(index), std::mem::take(pending)))
            .collect()
    }
}
