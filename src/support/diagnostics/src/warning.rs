use crate::{Diagnostic, Show};
use colored::Colorize;
use element::{Element, ElementNames};

#[derive(Debug)]
pub struct WarningDiagnostic {
    message: String,
    element: Option<Element>,
}

impl WarningDiagnostic {
    pub fn new(message: impl ToString, element: Element) -> Self {
        Self {
            message: message.to_string(),
            element: Some(element),
        }
    }

    pub fn plain(message: impl ToString) -> Self {
        Self {
            message: message.to_string(),
            element: None,
        }
    }
}

impl Show for WarningDiagnostic {
    fn show(&self, w: &mut dyn std::fmt::Write, names: &dyn ElementNames) -> std::fmt::Result {
        if let Some(element) = self.element {
            write!(
                w,
                "{}: {} {}",
                names.element_name(element),
                "warning:".yellow().bold(),
                self.message,
            )
        } else {
            write!(w, "{} {}", "warning:".yellow().bold(), self.message)
        }
    }
}

impl Diagnostic for WarningDiagnostic {
    fn is_error(&self) -> bool {
        false
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn element(&self) -> Option<Element> {
        self.element
    }
}
