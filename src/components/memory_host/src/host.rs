use crate::{ElementKind, ElementRecord, HostError, Origin};
use element::{AnnotationKind, Element, ElementNames};
use indexmap::IndexSet;
use itertools::Itertools;
use log::{debug, info};
use rounds::Host;
use std::{borrow::Cow, cell::RefCell};

/// A diagnostic the round driver handed to the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostReport {
    pub element: Element,
    pub message: String,
}

#[derive(Debug)]
pub struct MemoryHost {
    inner: RefCell<Inner>,
}

#[derive(Debug)]
struct Inner {
    records: Vec<ElementRecord>,
    annotation_names: IndexSet<String>,
    visible: IndexSet<Element>,
    // Generated during the current round, visible starting next round
    generated: Vec<Element>,
    round: usize,
    reports: Vec<HostReport>,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            inner: RefCell::new(Inner {
                records: Vec::new(),
                annotation_names: IndexSet::new(),
                visible: IndexSet::new(),
                generated: Vec::new(),
                round: 1,
                reports: Vec::new(),
            }),
        }
    }

    /// Interns an annotation kind by name.
    pub fn annotation(&self, name: &str) -> AnnotationKind {
        let (index, _) = self
            .inner
            .borrow_mut()
            .annotation_names
            .insert_full(name.to_string());
        AnnotationKind::from_usize(index)
    }

    /// Adds an element that exists before processing starts.
    pub fn add(&self, record: ElementRecord) -> Result<Element, HostError> {
        let mut inner = self.inner.borrow_mut();
        inner.check_enclosing(&record)?;

        let element = inner.push(ElementRecord {
            origin: Origin::Source,
            ..record
        });
        inner.visible.insert(element);
        Ok(element)
    }

    /// Adds an element on behalf of a step. It shows up in the next round.
    pub fn generate(&self, record: ElementRecord) -> Result<Element, HostError> {
        let mut inner = self.inner.borrow_mut();
        inner.check_enclosing(&record)?;

        if record.kind.is_type() {
            let qualified = inner.qualify(record.enclosing, &record.kind, &record.name);

            if inner.find_type(&qualified, false).is_some() {
                return Err(HostError::DuplicateType(qualified));
            }
        }

        let round = inner.round;
        let element = inner.push(ElementRecord {
            origin: Origin::Generated { round },
            ..record
        });
        inner.generated.push(element);

        debug!(
            "generated {} in round {}",
            inner.qualified_name(element),
            round
        );
        Ok(element)
    }

    pub fn generate_type(
        &self,
        package: Option<Element>,
        name: &str,
    ) -> Result<Element, HostError> {
        let mut record = ElementRecord::ty(name);
        record.enclosing = package;
        self.generate(record)
    }

    pub fn annotate(&self, element: Element, kind: AnnotationKind) -> Result<(), HostError> {
        let mut inner = self.inner.borrow_mut();
        let record = inner
            .records
            .get_mut(element.into_usize())
            .ok_or(HostError::UnknownElement(element))?;
        record.annotations.insert(kind);
        Ok(())
    }

    pub fn add_reference(&self, element: Element, type_name: &str) -> Result<(), HostError> {
        let mut inner = self.inner.borrow_mut();
        let record = inner
            .records
            .get_mut(element.into_usize())
            .ok_or(HostError::UnknownElement(element))?;
        record.references.insert(type_name.to_string());
        Ok(())
    }

    pub fn record(&self, element: Element) -> Option<ElementRecord> {
        self.inner.borrow().records.get(element.into_usize()).cloned()
    }

    pub fn qualified_name(&self, element: Element) -> String {
        self.inner.borrow().qualified_name(element)
    }

    /// Looks up a visible type by qualified or simple name.
    pub fn resolve_type(&self, name: &str) -> Option<Element> {
        self.inner.borrow().find_type(name, true)
    }

    /// Type names referenced from the type enclosing `element` (or from
    /// `element` itself when it is not inside of a type) that cannot be
    /// resolved yet. A package only answers for its own references.
    pub fn unresolved_references(&self, element: Element) -> Result<Vec<String>, HostError> {
        let inner = self.inner.borrow();
        let Some(record) = inner.records.get(element.into_usize()) else {
            return Err(HostError::UnknownElement(element));
        };

        if record.kind.is_package() {
            return Ok(record
                .references
                .iter()
                .filter(|name| inner.find_type(name, true).is_none())
                .unique()
                .cloned()
                .collect());
        }

        let root = inner
            .enclosing_chain(element)
            .find(|candidate| inner.records[candidate.into_usize()].kind.is_type())
            .unwrap_or(element);

        Ok((0..inner.records.len())
            .map(Element::from_usize)
            .filter(|candidate| inner.enclosing_chain(*candidate).any(|outer| outer == root))
            .flat_map(|candidate| inner.records[candidate.into_usize()].references.iter())
            .filter(|name| inner.find_type(name, true).is_none())
            .unique()
            .cloned()
            .collect())
    }

    pub fn is_resolvable(&self, element: Element) -> Result<bool, HostError> {
        Ok(self.unresolved_references(element)?.is_empty())
    }

    pub fn is_visible(&self, element: Element) -> bool {
        self.inner.borrow().visible.contains(&element)
    }

    pub fn round(&self) -> usize {
        self.inner.borrow().round
    }

    pub fn reports(&self) -> Vec<HostReport> {
        self.inner.borrow().reports.clone()
    }
}

impl Inner {
    fn push(&mut self, record: ElementRecord) -> Element {
        let element = Element::from_usize(self.records.len());
        self.records.push(record);
        element
    }

    fn check_enclosing(&self, record: &ElementRecord) -> Result<(), HostError> {
        match record.enclosing {
            Some(enclosing) if enclosing.into_usize() >= self.records.len() => {
                Err(HostError::UnknownElement(enclosing))
            }
            _ => Ok(()),
        }
    }

    /// `element` followed by everything enclosing it, innermost first.
    fn enclosing_chain(&self, element: Element) -> impl Iterator<Item = Element> + '_ {
        std::iter::successors(Some(element), |current| {
            self.records
                .get(current.into_usize())
                .and_then(|record| record.enclosing)
        })
    }

    fn find_type(&self, name: &str, visible_only: bool) -> Option<Element> {
        (0..self.records.len())
            .map(Element::from_usize)
            .filter(|element| !visible_only || self.visible.contains(element))
            .find(|element| {
                let record = &self.records[element.into_usize()];
                record.kind.is_type()
                    && (record.name == name || self.qualified_name(*element) == name)
            })
    }

    fn qualified_name(&self, element: Element) -> String {
        match self.records.get(element.into_usize()) {
            Some(record) => self.qualify(record.enclosing, &record.kind, &record.name),
            None => format!("<unknown {}>", element),
        }
    }

    fn qualify(&self, enclosing: Option<Element>, kind: &ElementKind, name: &str) -> String {
        let Some(enclosing) = enclosing else {
            return name.to_string();
        };

        let outer = self.qualified_name(enclosing);

        match kind {
            ElementKind::Package | ElementKind::Type => format!("{}.{}", outer, name),
            ElementKind::Method | ElementKind::Field => format!("{}#{}", outer, name),
            ElementKind::Parameter => format!("{}({})", outer, name),
        }
    }
}

impl Host for MemoryHost {
    fn current_round_elements(&self, kind: AnnotationKind) -> IndexSet<Element> {
        let inner = self.inner.borrow();

        inner
            .visible
            .iter()
            .copied()
            .filter(|element| inner.records[element.into_usize()].annotations.contains(&kind))
            .collect()
    }

    fn is_terminal_round(&self) -> bool {
        self.inner.borrow().generated.is_empty()
    }

    fn report_diagnostic(&self, element: Element, message: &str) {
        let mut inner = self.inner.borrow_mut();
        info!("{}: {}", inner.qualified_name(element), message);

        inner.reports.push(HostReport {
            element,
            message: message.to_string(),
        });
    }

    fn advance_round(&self) {
        let mut inner = self.inner.borrow_mut();
        let generated = std::mem::take(&mut inner.generated);
        inner.visible.extend(generated);
        inner.round += 1;
    }
}

impl ElementNames for MemoryHost {
    fn element_name(&self, element: Element) -> Cow<'_, str> {
        Cow::Owned(self.qualified_name(element))
    }

    fn annotation_name(&self, kind: AnnotationKind) -> Cow<'_, str> {
        match self.inner.borrow().annotation_names.get_index(kind.into_usize()) {
            Some(name) => Cow::Owned(format!("@{}", name)),
            None => Cow::Owned(kind.to_string()),
        }
    }
}
