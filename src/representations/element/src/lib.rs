/*
    ==================  representations/element/src/lib.rs  ===================
    Opaque handles for the constructs a host hands to processing steps.

    Elements and annotation kinds are owned by the host. Everything here only
    carries their identities around.
    ---------------------------------------------------------------------------
*/

mod by_kind;
mod handle;
mod names;

pub use by_kind::ElementsByKind;
pub use handle::{AnnotationKind, Element};
pub use names::{ElementNames, NumericNames};
