/*
    ====================  components/rounds/src/host.rs  ======================
    What the round driver needs from the environment it runs inside of.
    ---------------------------------------------------------------------------
*/

use element::{AnnotationKind, Element};
use indexmap::IndexSet;

pub trait Host {
    /// Everything annotated with `kind` in the current compilation state.
    fn current_round_elements(&self, kind: AnnotationKind) -> IndexSet<Element>;

    /// Whether the round that just finished left nothing new behind,
    /// meaning no further code will ever appear.
    fn is_terminal_round(&self) -> bool;

    fn report_diagnostic(&self, element: Element, message: &str);

    /// Called before every round except the first.
    fn advance_round(&self) {}
}
