use crate::{Diagnostic, Show};
use element::{Element, ElementNames};

#[derive(Debug)]
pub struct ErrorDiagnostic {
    message: String,
    element: Option<Element>,
    step: Option<String>,
}

impl ErrorDiagnostic {
    pub fn new(message: impl ToString, element: Element) -> Self {
        Self {
            message: message.to_string(),
            element: Some(element),
            step: None,
        }
    }

    pub fn plain(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
            element: None,
            step: None,
        }
    }

    /// An element that a step never managed to process.
    pub fn unresolved(step: impl ToString, element: Element, message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
            element: Some(element),
            step: Some(step.to_string()),
        }
    }
}

impl Show for ErrorDiagnostic {
    fn show(&self, w: &mut dyn std::fmt::Write, names: &dyn ElementNames) -> std::fmt::Result {
        if let Some(element) = self.element {
            write!(
                w,
                "{}: error: {}",
                names.element_name(element),
                self.message,
            )
        } else {
            write!(w, "error: {}", self.message)
        }
    }
}

impl Diagnostic for ErrorDiagnostic {
    fn is_error(&self) -> bool {
        true
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn element(&self) -> Option<Element> {
        self.element
    }

    fn step(&self) -> Option<&str> {
        self.step.as_deref()
    }
}
