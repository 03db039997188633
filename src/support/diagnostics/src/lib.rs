mod error;
mod show;
mod warning;

use append_only_vec::AppendOnlyVec;
use core::fmt::Debug;
use element::{Element, ElementNames};
pub use error::ErrorDiagnostic;
pub use show::Show;
use std::sync::atomic::{AtomicUsize, Ordering};
pub use warning::WarningDiagnostic;

pub trait Diagnostic: Show + Debug + Send + Sync {
    fn is_error(&self) -> bool;

    fn message(&self) -> &str;

    fn element(&self) -> Option<Element>;

    fn step(&self) -> Option<&str> {
        None
    }
}

#[derive(Clone, Debug, Default)]
pub struct DiagnosticFlags {
    pub print_without_collecting: bool,
}

pub struct Diagnostics<'a> {
    names: &'a dyn ElementNames,
    diagnostics: AppendOnlyVec<Box<dyn Diagnostic>>,
    num_errors: AtomicUsize,
    flags: DiagnosticFlags,
}

impl<'a> Debug for Diagnostics<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Diagnostics")
            .field("num_errors", &self.error_count())
            .finish_non_exhaustive()
    }
}

impl<'a> Diagnostics<'a> {
    pub fn new(names: &'a dyn ElementNames, flags: DiagnosticFlags) -> Self {
        Self {
            names,
            diagnostics: AppendOnlyVec::<Box<dyn Diagnostic>>::new(),
            num_errors: AtomicUsize::new(0),
            flags,
        }
    }

    pub fn flags(&self) -> &DiagnosticFlags {
        &self.flags
    }

    pub fn names(&self) -> &'a dyn ElementNames {
        self.names
    }

    pub fn push(&self, diagnostic: impl Diagnostic + 'static) {
        if diagnostic.is_error() {
            self.num_errors.fetch_add(1, Ordering::Relaxed);
        }

        if self.flags.print_without_collecting {
            self.print(&diagnostic);
        } else {
            self.diagnostics.push(Box::new(diagnostic));
        }
    }

    /// Records that `step` never finished `element`.
    pub fn report(&self, step: &str, element: Element, reason: impl ToString) {
        self.push(ErrorDiagnostic::unresolved(step, element, reason));
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() != 0
    }

    pub fn error_count(&self) -> usize {
        self.num_errors.load(Ordering::Relaxed)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Diagnostic> {
        self.diagnostics.iter().map(|diagnostic| &**diagnostic)
    }

    pub fn errors(&self) -> impl Iterator<Item = &dyn Diagnostic> {
        self.iter().filter(|diagnostic| diagnostic.is_error())
    }

    pub fn print_all(&self) {
        for diagnostic in self.diagnostics.iter() {
            self.print(&**diagnostic);
        }
    }

    pub fn print(&self, diagnostic: &dyn Diagnostic) {
        diagnostic.eprintln(self.names);
    }
}
