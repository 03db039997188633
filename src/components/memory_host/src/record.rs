use derive_more::IsVariant;
use element::{AnnotationKind, Element};
use indexmap::IndexSet;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, IsVariant)]
pub enum ElementKind {
    Package,
    Type,
    Method,
    Field,
    Parameter,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, IsVariant)]
pub enum Origin {
    Source,
    Generated { round: usize },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementRecord {
    pub kind: ElementKind,
    pub name: String,
    pub enclosing: Option<Element>,
    pub annotations: IndexSet<AnnotationKind>,
    /// Type names this element mentions and needs to exist.
    pub references: IndexSet<String>,
    pub origin: Origin,
}

impl ElementRecord {
    pub fn new(kind: ElementKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            enclosing: None,
            annotations: IndexSet::new(),
            references: IndexSet::new(),
            origin: Origin::Source,
        }
    }

    pub fn package(name: impl Into<String>) -> Self {
        Self::new(ElementKind::Package, name)
    }

    pub fn ty(name: impl Into<String>) -> Self {
        Self::new(ElementKind::Type, name)
    }

    pub fn method(name: impl Into<String>) -> Self {
        Self::new(ElementKind::Method, name)
    }

    pub fn field(name: impl Into<String>) -> Self {
        Self::new(ElementKind::Field, name)
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        Self::new(ElementKind::Parameter, name)
    }

    pub fn enclosed_by(mut self, enclosing: Element) -> Self {
        self.enclosing = Some(enclosing);
        self
    }

    pub fn annotated(mut self, kind: AnnotationKind) -> Self {
        self.annotations.insert(kind);
        self
    }

    pub fn referencing(mut self, type_name: impl Into<String>) -> Self {
        self.references.insert(type_name.into());
        self
    }
}
