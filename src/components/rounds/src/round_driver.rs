/*
    ================  components/rounds/src/round_driver.rs  ==================
    Runs registered steps round after round.

    Each round, every step sees the elements it has never been shown plus the
    ones it deferred last round. Once the host reports that a round produced
    no new code, one last round is run if anything is still deferred. What is
    deferred after that last round is reported as an error per (step, element).
    ---------------------------------------------------------------------------
*/

use crate::{
    DeferralTracker, Deferred, DriverState, ElementIndex, Host, RoundNumber, RoundOptions,
    RoundStatus, RunError, RunSummary, Step, StepId, StepInput, Termination,
};
use diagnostics::{Diagnostics, WarningDiagnostic};
use element::{AnnotationKind, Element, ElementsByKind};
use indexmap::IndexSet;
use itertools::Itertools;
use log::{debug, error, trace, warn};
use std::num::NonZero;

struct RegisteredStep<'a> {
    step: Box<dyn Step + 'a>,
    name: String,
    kinds: IndexSet<AnnotationKind>,
    invocations: usize,
}

pub struct RoundDriver<'a> {
    options: RoundOptions,
    steps: Vec<RegisteredStep<'a>>,
    index: ElementIndex,
    tracker: DeferralTracker,
    diagnostics: &'a Diagnostics<'a>,
    state: DriverState,
    round: RoundNumber,
    terminal_next: bool,
    unresolved: usize,
}

pub struct RoundDriverBuilder<'a> {
    options: RoundOptions,
    steps: Vec<Box<dyn Step + 'a>>,
    diagnostics: &'a Diagnostics<'a>,
}

impl<'a> RoundDriverBuilder<'a> {
    pub fn options(mut self, options: RoundOptions) -> Self {
        self.options = options;
        self
    }

    pub fn processor_name(mut self, name: impl Into<String>) -> Self {
        self.options.processor_name = name.into();
        self
    }

    pub fn max_rounds(mut self, limit: NonZero<usize>) -> Self {
        self.options.max_rounds = Some(limit);
        self
    }

    pub fn step(mut self, step: impl Step + 'a) -> Self {
        self.steps.push(Box::new(step));
        self
    }

    #[must_use]
    pub fn build(self) -> RoundDriver<'a> {
        let steps = self
            .steps
            .into_iter()
            .map(|step| RegisteredStep {
                name: step.name().to_string(),
                kinds: step.interested_kinds(),
                step,
                invocations: 0,
            })
            .collect_vec();

        let tracked = steps
            .iter()
            .flat_map(|registered| registered.kinds.iter().copied())
            .collect();

        RoundDriver {
            options: self.options,
            index: ElementIndex::new(tracked, steps.len()),
            tracker: DeferralTracker::new(steps.len()),
            steps,
            diagnostics: self.diagnostics,
            state: DriverState::Running,
            round: RoundNumber::default(),
            terminal_next: false,
            unresolved: 0,
        }
    }
}

impl<'a> RoundDriver<'a> {
    pub fn builder(diagnostics: &'a Diagnostics<'a>) -> RoundDriverBuilder<'a> {
        RoundDriverBuilder {
            options: RoundOptions::default(),
            steps: Vec::new(),
            diagnostics,
        }
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// The last round that was started.
    pub fn round(&self) -> RoundNumber {
        self.round
    }

    pub fn tracker(&self) -> &DeferralTracker {
        &self.tracker
    }

    pub fn index(&self) -> &ElementIndex {
        &self.index
    }

    pub fn step_id(&self, name: &str) -> Option<StepId> {
        self.steps
            .iter()
            .position(|registered| registered.name == name)
            .map(StepId)
    }

    pub fn step_name(&self, step: StepId) -> Option<&str> {
        self.steps
            .get(step.index())
            .map(|registered| registered.name.as_str())
    }

    /// Whether the next round will be the last one.
    pub fn is_terminal_next(&self) -> bool {
        self.terminal_next
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            processor: self.options.processor_name.clone(),
            rounds: self.round.get(),
            termination: match self.state {
                DriverState::Running => None,
                DriverState::Terminated(termination) => Some(termination),
            },
            invocations: self
                .steps
                .iter()
                .map(|registered| (registered.name.clone(), registered.invocations))
                .collect(),
            unresolved: self.unresolved,
        }
    }

    /// Runs rounds until the driver terminates.
    pub fn run<H: Host + ?Sized>(&mut self, host: &H) -> Result<RunSummary, RunError> {
        loop {
            match self.run_round(host)? {
                RoundStatus::Continue => continue,
                RoundStatus::Terminated(Termination::Unresolved) => {
                    return Err(RunError::Unresolved {
                        count: self.unresolved,
                    });
                }
                RoundStatus::Terminated(_) => return Ok(self.summary()),
            }
        }
    }

    /// Runs exactly one round.
    pub fn run_round<H: Host + ?Sized>(&mut self, host: &H) -> Result<RoundStatus, RunError> {
        if self.state.is_terminated() {
            return Err(RunError::AlreadyTerminated);
        }

        if let Some(limit) = self.options.max_rounds {
            if self.round.get() >= limit.get() {
                warn!(
                    "{}: giving up after {} rounds with {} deferral(s) pending",
                    self.options.processor_name,
                    limit,
                    self.tracker.pending_count(),
                );
                self.state = DriverState::Terminated(Termination::RoundLimit);
                return Err(RunError::RoundLimit { limit });
            }
        }

        if self.round.get() != 0 {
            host.advance_round();
        }

        self.round = self.round.next();
        let round = self.round;
        let terminal = self.terminal_next;
        let visible = self.index.snapshot(host);

        debug!(
            "{}: round {} ({} visible element(s), {} pending deferral(s){})",
            self.options.processor_name,
            round,
            visible.len(),
            self.tracker.pending_count(),
            if terminal { ", terminal" } else { "" },
        );

        let names = self.diagnostics.names();

        for (position, registered) in self.steps.iter_mut().enumerate() {
            let step_id = StepId(position);
            let fresh = self.index.fresh_for(step_id, &registered.kinds, &visible);

            let pending = self
                .tracker
                .pending(step_id)
                .cloned()
                .unwrap_or_default();

            if fresh.is_empty() && pending.is_empty() {
                continue;
            }

            let retried = pending.elements();
            let mut elements = fresh;
            self.index.mark_presented(step_id, elements.elements());
            elements.union_with(&pending);

            let input = StepInput::new(elements, retried, round, terminal);

            trace!(
                "{}: invoking step '{}' for {} with {} element(s), {} retried",
                self.options.processor_name,
                registered.name,
                registered
                    .kinds
                    .iter()
                    .map(|kind| names.annotation_name(*kind))
                    .join(", "),
                input.len(),
                pending.len(),
            );

            registered.invocations += 1;

            let deferred = match registered.step.process(&input) {
                Ok(deferred) => deferred,
                Err(source) => {
                    error!(
                        "{}: step '{}' failed in round {}: {}",
                        self.options.processor_name, registered.name, round, source
                    );
                    self.state = DriverState::Terminated(Termination::StepFailed);
                    return Err(RunError::StepFailed {
                        step: registered.name.clone(),
                        round,
                        source,
                    });
                }
            };

            let retry = keep_deferred(&self.options, self.diagnostics, registered, &input, &deferred);

            trace!(
                "{}: step '{}' deferred {} element(s)",
                self.options.processor_name,
                registered.name,
                retry.len(),
            );

            self.tracker.record_deferrals(step_id, retry);
        }

        if terminal {
            return Ok(RoundStatus::Terminated(self.finish(host)));
        }

        if host.is_terminal_round() {
            if !self.tracker.has_pending() {
                debug!(
                    "{}: finished after {} round(s)",
                    self.options.processor_name, round
                );
                self.state = DriverState::Terminated(Termination::Succeeded);
                return Ok(RoundStatus::Terminated(Termination::Succeeded));
            }

            debug!(
                "{}: no new code, next round is the last one",
                self.options.processor_name
            );
            self.terminal_next = true;
        }

        Ok(RoundStatus::Continue)
    }

    /// Turns everything still deferred after the terminal round into errors.
    fn finish<H: Host + ?Sized>(&mut self, host: &H) -> Termination {
        for (step_id, pending) in self.tracker.drain() {
            let step_name = &self.steps[step_id.index()].name;

            for element in pending.elements() {
                let message = unresolved_message(
                    &self.options.processor_name,
                    step_name,
                    &self.diagnostics.names().element_name(element),
                );

                self.diagnostics.report(step_name, element, &message);

                if self.options.report_to_host {
                    host.report_diagnostic(element, &message);
                }

                self.unresolved += 1;
            }
        }

        let termination = if self.unresolved == 0 {
            Termination::Succeeded
        } else {
            Termination::Unresolved
        };

        debug!(
            "{}: terminal round {} ended with {} unresolved element(s)",
            self.options.processor_name, self.round, self.unresolved
        );

        self.state = DriverState::Terminated(termination);
        termination
    }
}

/// Narrows what a step returned down to elements it was actually given,
/// keeping the kinds they were delivered under.
fn keep_deferred(
    options: &RoundOptions,
    diagnostics: &Diagnostics,
    registered: &RegisteredStep,
    input: &StepInput,
    deferred: &Deferred,
) -> ElementsByKind {
    for foreign in deferred.iter().filter(|element| !input.contains(**element)) {
        warn!(
            "{}: step '{}' deferred {} which it was never given",
            options.processor_name, registered.name, foreign
        );
        diagnostics.push(WarningDiagnostic::new(
            format!(
                "step '{}' deferred an element it was not given, ignoring",
                registered.name
            ),
            *foreign,
        ));
    }

    input.filter_elements(|element: Element| deferred.contains(&element))
}

fn unresolved_message(processor: &str, step: &str, element: &str) -> String {
    format!(
        "{processor} was unable to process '{element}' because not all of its dependencies could be resolved (step '{step}' was still deferring it). Check for compilation errors or a circular dependency with generated code."
    )
}
