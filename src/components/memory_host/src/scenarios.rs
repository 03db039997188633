use diagnostics::{DiagnosticFlags, Diagnostics, Show};
use element::{AnnotationKind, Element};
use indexmap::IndexSet;
use crate::{ElementRecord, HostError, MemoryHost};
use pretty_assertions::assert_eq;
use rounds::{
    Deferred, FnStep, RoundDriver, RunError, Step, StepError, StepInput, Termination,
};
use std::cell::{Cell, RefCell};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Needs every type referenced around its elements to exist.
struct RequiresGeneratedCode<'h> {
    host: &'h MemoryHost,
    kind: AnnotationKind,
    generated: &'h RefCell<Vec<Element>>,
    processed: &'h Cell<bool>,
}

impl Step for RequiresGeneratedCode<'_> {
    fn name(&self) -> &str {
        "RequiresGeneratedCodeStep"
    }

    fn interested_kinds(&self) -> IndexSet<AnnotationKind> {
        IndexSet::from([self.kind])
    }

    fn process(&mut self, input: &StepInput) -> Result<Deferred, StepError> {
        let mut deferred = Deferred::new();

        for element in input.elements() {
            let resolvable = self
                .host
                .is_resolvable(element)
                .map_err(|error| StepError::with_source("element lookup failed", error))?;

            if !resolvable {
                deferred.insert(element);
                continue;
            }

            if self.generated.borrow().is_empty() {
                return Err(StepError::new("processed before any code was generated"));
            }

            self.processed.set(true);
        }

        Ok(deferred)
    }
}

/// Writes `test.SomeGeneratedClass` for every element it sees.
struct GeneratesCode<'h> {
    host: &'h MemoryHost,
    kind: AnnotationKind,
    package: Element,
    generated: &'h RefCell<Vec<Element>>,
}

impl Step for GeneratesCode<'_> {
    fn name(&self) -> &str {
        "GeneratesCodeStep"
    }

    fn interested_kinds(&self) -> IndexSet<AnnotationKind> {
        IndexSet::from([self.kind])
    }

    fn process(&mut self, input: &StepInput) -> Result<Deferred, StepError> {
        for element in input.elements() {
            self.host
                .generate_type(Some(self.package), "SomeGeneratedClass")
                .map_err(|error| StepError::with_source("could not write generated type", error))?;
            self.generated.borrow_mut().push(element);
        }

        Ok(Deferred::new())
    }
}

struct Fixture {
    host: MemoryHost,
    requires: AnnotationKind,
    generates: AnnotationKind,
    package: Element,
}

impl Fixture {
    fn new() -> Self {
        let host = MemoryHost::new();
        let requires = host.annotation("RequiresGeneratedCode");
        let generates = host.annotation("GeneratesCode");
        let package = host.add(ElementRecord::package("test")).unwrap();

        Self {
            host,
            requires,
            generates,
            package,
        }
    }

    fn run_both(&self) -> (Result<rounds::RunSummary, RunError>, bool, Vec<String>) {
        let generated = RefCell::new(Vec::new());
        let processed = Cell::new(false);
        let diagnostics = Diagnostics::new(&self.host, DiagnosticFlags::default());

        let mut driver = RoundDriver::builder(&diagnostics)
            .step(RequiresGeneratedCode {
                host: &self.host,
                kind: self.requires,
                generated: &generated,
                processed: &processed,
            })
            .step(GeneratesCode {
                host: &self.host,
                kind: self.generates,
                package: self.package,
                generated: &generated,
            })
            .build();

        let result = driver.run(&self.host);
        let errors = diagnostics
            .errors()
            .map(|error| error.to_shown(&self.host))
            .collect();

        (result, processed.get(), errors)
    }
}

#[test]
fn defers_type_element_until_generated_code_exists() {
    init_logging();
    let fixture = Fixture::new();
    let host = &fixture.host;

    let class_a = host
        .add(
            ElementRecord::ty("ClassA")
                .enclosed_by(fixture.package)
                .annotated(fixture.requires),
        )
        .unwrap();
    host.add(
        ElementRecord::field("sgc")
            .enclosed_by(class_a)
            .referencing("SomeGeneratedClass"),
    )
    .unwrap();
    host.add(
        ElementRecord::ty("ClassB")
            .enclosed_by(fixture.package)
            .annotated(fixture.generates),
    )
    .unwrap();

    let (result, processed, errors) = fixture.run_both();
    let summary = result.unwrap();

    assert!(processed);
    assert_eq!(errors, Vec::<String>::new());
    assert_eq!(summary.rounds, 2);
    assert_eq!(summary.invocations_of("RequiresGeneratedCodeStep"), Some(2));
    assert_eq!(summary.invocations_of("GeneratesCodeStep"), Some(1));
}

#[test]
fn defers_package_element_until_generated_code_exists() {
    init_logging();
    let fixture = Fixture::new();
    let host = &fixture.host;

    let references = host.annotation("ReferencesAClass");
    host.annotate(fixture.package, fixture.requires).unwrap();
    host.annotate(fixture.package, references).unwrap();
    host.add_reference(fixture.package, "SomeGeneratedClass")
        .unwrap();

    host.add(
        ElementRecord::ty("ClassA")
            .enclosed_by(fixture.package)
            .annotated(fixture.generates),
    )
    .unwrap();

    assert!(!host.is_resolvable(fixture.package).unwrap());

    let (result, processed, errors) = fixture.run_both();

    assert!(result.unwrap().is_success());
    assert!(processed);
    assert!(errors.is_empty());
}

#[test]
fn package_is_not_deferred_for_references_inside_its_types() {
    init_logging();
    let fixture = Fixture::new();
    let host = &fixture.host;

    host.annotate(fixture.package, fixture.requires).unwrap();
    host.add_reference(fixture.package, "SomeGeneratedClass")
        .unwrap();
    host.add(
        ElementRecord::ty("Other")
            .enclosed_by(fixture.package)
            .referencing("Missing"),
    )
    .unwrap();
    host.add(
        ElementRecord::ty("ClassA")
            .enclosed_by(fixture.package)
            .annotated(fixture.generates),
    )
    .unwrap();

    let (result, processed, errors) = fixture.run_both();
    let summary = result.unwrap();

    assert!(summary.is_success());
    assert!(processed);
    assert!(errors.is_empty());
    assert_eq!(summary.rounds, 2);
    assert_eq!(summary.invocations_of("RequiresGeneratedCodeStep"), Some(2));
    assert!(host.reports().is_empty());
}

#[test]
fn defers_parameter_element_until_generated_code_exists() {
    init_logging();
    let fixture = Fixture::new();
    let host = &fixture.host;

    let class_a = host
        .add(ElementRecord::ty("ClassA").enclosed_by(fixture.package))
        .unwrap();
    host.add(
        ElementRecord::field("sgc")
            .enclosed_by(class_a)
            .referencing("SomeGeneratedClass"),
    )
    .unwrap();
    let method_a = host
        .add(ElementRecord::method("myMethod").enclosed_by(class_a))
        .unwrap();
    host.add(
        ElementRecord::parameter("myInt")
            .enclosed_by(method_a)
            .annotated(fixture.requires),
    )
    .unwrap();

    let class_b = host
        .add(ElementRecord::ty("ClassB").enclosed_by(fixture.package))
        .unwrap();
    let method_b = host
        .add(ElementRecord::method("myMethod").enclosed_by(class_b))
        .unwrap();
    host.add(
        ElementRecord::parameter("myInt")
            .enclosed_by(method_b)
            .annotated(fixture.generates),
    )
    .unwrap();

    let (result, processed, errors) = fixture.run_both();

    assert!(result.unwrap().is_success());
    assert!(processed);
    assert!(errors.is_empty());
}

#[test]
fn reports_missing_type_against_the_processor() {
    init_logging();
    let host = MemoryHost::new();
    let requires = host.annotation("RequiresGeneratedCode");
    let package = host.add(ElementRecord::package("test")).unwrap();
    let class_a = host
        .add(
            ElementRecord::ty("ClassA")
                .enclosed_by(package)
                .annotated(requires),
        )
        .unwrap();
    host.add(
        ElementRecord::field("bar")
            .enclosed_by(class_a)
            .referencing("SomeGeneratedClass"),
    )
    .unwrap();

    let generated = RefCell::new(Vec::new());
    let processed = Cell::new(false);
    let diagnostics = Diagnostics::new(&host, DiagnosticFlags::default());

    let mut driver = RoundDriver::builder(&diagnostics)
        .processor_name("RequiresGeneratedCodeProcessor")
        .step(RequiresGeneratedCode {
            host: &host,
            kind: requires,
            generated: &generated,
            processed: &processed,
        })
        .build();

    let result = driver.run(&host);

    assert!(matches!(result, Err(RunError::Unresolved { count: 1 })));
    assert!(!processed.get());
    assert_eq!(driver.summary().termination, Some(Termination::Unresolved));

    let reports = host.reports();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].element, class_a);
    assert!(reports[0].message.contains("RequiresGeneratedCodeProcessor"));
    assert!(reports[0].message.contains("'test.ClassA'"));

    let shown = diagnostics
        .errors()
        .map(|error| error.to_shown(&host))
        .collect::<Vec<_>>();
    assert_eq!(shown.len(), 1);
    assert!(shown[0].starts_with("test.ClassA: error: RequiresGeneratedCodeProcessor"));
}

#[test]
fn consumer_waits_for_producer_registered_after_it() {
    init_logging();
    let host = MemoryHost::new();
    let requires_gen = host.annotation("RequiresGen");
    let produces_gen = host.annotation("ProducesGen");

    let consumer = host
        .add(ElementRecord::ty("Consumer").annotated(requires_gen))
        .unwrap();
    host.add(ElementRecord::ty("Producer").annotated(produces_gen))
        .unwrap();

    let consumer_rounds = RefCell::new(Vec::new());
    let diagnostics = Diagnostics::new(&host, DiagnosticFlags::default());

    let mut driver = RoundDriver::builder(&diagnostics)
        .step(FnStep::new("B", [requires_gen], |input: &StepInput| {
            consumer_rounds.borrow_mut().push(input.round().get());

            Ok(input
                .elements()
                .into_iter()
                .filter(|_| host.resolve_type("Gen").is_none())
                .collect())
        }))
        .step(FnStep::new("A", [produces_gen], |input: &StepInput| {
            for _ in input.elements() {
                host.generate_type(None, "Gen")
                    .map_err(|error| StepError::with_source("generation failed", error))?;
            }
            Ok(Deferred::new())
        }))
        .build();

    let summary = driver.run(&host).unwrap();

    assert!(summary.is_success());
    assert_eq!(summary.rounds, 2);
    assert_eq!(consumer_rounds.take(), vec![1, 2]);
    assert_eq!(summary.invocations_of("A"), Some(1));
    assert!(!diagnostics.has_errors());
    assert!(host.reports().is_empty());
    assert!(host.is_resolvable(consumer).unwrap());
}

#[test]
fn generated_elements_are_delivered_in_the_next_round() {
    init_logging();
    let host = MemoryHost::new();
    let produces = host.annotation("Produces");
    let followup = host.annotation("Followup");
    host.add(ElementRecord::ty("Seed").annotated(produces)).unwrap();

    let seen = RefCell::new(Vec::new());
    let diagnostics = Diagnostics::new(&host, DiagnosticFlags::default());

    let mut driver = RoundDriver::builder(&diagnostics)
        .step(FnStep::new("followup", [followup], |input: &StepInput| {
            for element in input.elements() {
                seen.borrow_mut()
                    .push((input.round().get(), host.qualified_name(element)));
            }
            Ok(Deferred::new())
        }))
        .step(FnStep::new("produce", [produces], |input: &StepInput| {
            for _ in input.elements() {
                host.generate(ElementRecord::ty("Generated").annotated(followup))
                    .map_err(|error| StepError::with_source("generation failed", error))?;
            }
            Ok(Deferred::new())
        }))
        .build();

    let summary = driver.run(&host).unwrap();

    assert_eq!(summary.rounds, 2);
    assert_eq!(seen.take(), vec![(2, "Generated".to_string())]);
}

#[test]
fn host_failure_inside_a_step_is_fatal() {
    init_logging();
    let fixture = Fixture::new();
    let host = &fixture.host;

    for name in ["ClassA", "ClassB"] {
        host.add(
            ElementRecord::ty(name)
                .enclosed_by(fixture.package)
                .annotated(fixture.generates),
        )
        .unwrap();
    }

    let generated = RefCell::new(Vec::new());
    let after_invoked = Cell::new(false);
    let diagnostics = Diagnostics::new(host, DiagnosticFlags::default());

    let mut driver = RoundDriver::builder(&diagnostics)
        .step(GeneratesCode {
            host,
            kind: fixture.generates,
            package: fixture.package,
            generated: &generated,
        })
        .step(FnStep::new("after", [fixture.generates], |_: &StepInput| {
            after_invoked.set(true);
            Ok(Deferred::new())
        }))
        .build();

    let error = driver.run(host).unwrap_err();

    let source = error.step_error().unwrap();
    assert_eq!(source.message(), "could not write generated type");

    let host_error = std::error::Error::source(source)
        .and_then(|cause| cause.downcast_ref::<HostError>())
        .unwrap();
    assert_eq!(
        host_error,
        &HostError::DuplicateType("test.SomeGeneratedClass".into())
    );

    assert!(!after_invoked.get());
    assert_eq!(generated.borrow().len(), 1);
    assert!(!diagnostics.has_errors());
}
