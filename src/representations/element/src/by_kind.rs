use crate::{AnnotationKind, Element};
use indexmap::{IndexMap, IndexSet};
use itertools::Itertools;

/// Elements grouped by the annotation kind that selected them.
///
/// Iteration order is insertion order for both kinds and elements, so that
/// delivering the same input twice produces the same sequence.
/// Kinds are never stored with an empty element set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ElementsByKind {
    groups: IndexMap<AnnotationKind, IndexSet<Element>>,
}

impl ElementsByKind {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, kind: AnnotationKind, element: Element) -> bool {
        self.groups.entry(kind).or_default().insert(element)
    }

    pub fn extend_kind(&mut self, kind: AnnotationKind, elements: impl IntoIterator<Item = Element>) {
        let mut elements = elements.into_iter().peekable();

        if elements.peek().is_some() {
            self.groups.entry(kind).or_default().extend(elements);
        }
    }

    pub fn kinds(&self) -> impl Iterator<Item = AnnotationKind> + '_ {
        self.groups.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (AnnotationKind, &IndexSet<Element>)> + '_ {
        self.groups.iter().map(|(kind, elements)| (*kind, elements))
    }

    /// Every (kind, element) pair, in order.
    pub fn pairs(&self) -> impl Iterator<Item = (AnnotationKind, Element)> + '_ {
        self.iter()
            .flat_map(|(kind, elements)| elements.iter().map(move |element| (kind, *element)))
    }

    /// Distinct elements across all kinds, in first-seen order.
    pub fn elements(&self) -> IndexSet<Element> {
        self.groups.values().flatten().copied().collect()
    }

    pub fn contains(&self, element: Element) -> bool {
        self.groups.values().any(|elements| elements.contains(&element))
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of distinct elements.
    pub fn len(&self) -> usize {
        self.groups.values().flatten().unique().count()
    }

    pub fn restricted_to<'a>(&self, kinds: impl IntoIterator<Item = &'a AnnotationKind>) -> Self {
        let mut restricted = Self::new();

        for kind in kinds {
            if let Some(elements) = self.groups.get(kind) {
                restricted.extend_kind(*kind, elements.iter().copied());
            }
        }

        restricted
    }

    pub fn filter_elements(&self, mut keep: impl FnMut(Element) -> bool) -> Self {
        let mut filtered = Self::new();

        for (kind, elements) in self.iter() {
            filtered.extend_kind(kind, elements.iter().copied().filter(|element| keep(*element)));
        }

        filtered
    }

    pub fn union_with(&mut self, other: &Self) {
        for (kind, elements) in other.iter() {
            self.extend_kind(kind, elements.iter().copied());
        }
    }
}

impl FromIterator<(AnnotationKind, Element)> for ElementsByKind {
    fn from_iter<T: IntoIterator<Item = (AnnotationKind, Element)>>(iter: T) -> Self {
        let mut by_kind = Self::new();
        for (kind, element) in iter {
            by_kind.insert(kind, element);
        }
        by_kind
    }
}
