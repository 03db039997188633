/*
    ====================  components/rounds/src/step.rs  ======================
    A unit of processing logic registered with a `RoundDriver`.

    Steps receive the elements carrying the annotation kinds they asked for,
    and hand back the ones they could not finish yet.
    ---------------------------------------------------------------------------
*/

use crate::{RoundNumber, StepError};
use derive_more::{Deref, Display};
use element::{AnnotationKind, Element, ElementsByKind};
use indexmap::IndexSet;

/// Elements a step wants to see again next round.
pub type Deferred = IndexSet<Element>;

/// Position of a step in registration order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
pub struct StepId(pub(crate) usize);

impl StepId {
    pub fn index(self) -> usize {
        self.0
    }
}

pub trait Step {
    fn name(&self) -> &str;

    /// Read once, when the step is registered.
    fn interested_kinds(&self) -> IndexSet<AnnotationKind>;

    /// Returns the subset of `input` that must be retried.
    fn process(&mut self, input: &StepInput) -> Result<Deferred, StepError>;
}

#[derive(Debug, Deref)]
pub struct StepInput {
    #[deref]
    elements: ElementsByKind,
    retried: IndexSet<Element>,
    round: RoundNumber,
    terminal: bool,
}

impl StepInput {
    pub fn new(
        elements: ElementsByKind,
        retried: IndexSet<Element>,
        round: RoundNumber,
        terminal: bool,
    ) -> Self {
        Self {
            elements,
            retried,
            round,
            terminal,
        }
    }

    pub fn by_kind(&self) -> &ElementsByKind {
        &self.elements
    }

    /// Whether this step deferred `element` last round.
    pub fn is_retry(&self, element: Element) -> bool {
        self.retried.contains(&element)
    }

    pub fn round(&self) -> RoundNumber {
        self.round
    }

    /// Deferring anything during the terminal round makes it an error.
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }
}

/// A step made out of a closure.
pub struct FnStep<F> {
    name: String,
    kinds: IndexSet<AnnotationKind>,
    process: F,
}

impl<F> FnStep<F>
where
    F: FnMut(&StepInput) -> Result<Deferred, StepError>,
{
    pub fn new(
        name: impl Into<String>,
        kinds: impl IntoIterator<Item = AnnotationKind>,
        process: F,
    ) -> Self {
        Self {
            name: name.into(),
            kinds: kinds.into_iter().collect(),
            process,
        }
    }
}

impl<F> Step for FnStep<F>
where
    F: FnMut(&StepInput) -> Result<Deferred, StepError>,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn interested_kinds(&self) -> IndexSet<AnnotationKind> {
        self.kinds.clone()
    }

    fn process(&mut self, input: &StepInput) -> Result<Deferred, StepError> {
        (self.process)(input)
    }
}
