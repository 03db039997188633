use crate::{AnnotationKind, Element};
use std::borrow::Cow;

/// Human-readable names for handles, supplied by whoever owns the elements.
pub trait ElementNames {
    fn element_name(&self, element: Element) -> Cow<'_, str>;

    fn annotation_name(&self, kind: AnnotationKind) -> Cow<'_, str> {
        Cow::Owned(kind.to_string())
    }
}

/// Falls back to the numeric identity of each handle.
#[derive(Copy, Clone, Debug, Default)]
pub struct NumericNames;

impl ElementNames for NumericNames {
    fn element_name(&self, element: Element) -> Cow<'_, str> {
        Cow::Owned(element.to_string())
    }
}
