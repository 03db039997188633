use derive_more::{Display, From, IsVariant};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Display, From)]
pub struct RoundNumber(usize);

impl RoundNumber {
    pub fn get(self) -> usize {
        self.0
    }

    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, IsVariant)]
pub enum Termination {
    #[display("succeeded")]
    Succeeded,
    #[display("unresolved deferrals")]
    Unresolved,
    #[display("step failed")]
    StepFailed,
    #[display("round limit reached")]
    RoundLimit,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, IsVariant)]
pub enum DriverState {
    Running,
    Terminated(Termination),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, IsVariant)]
pub enum RoundStatus {
    Continue,
    Terminated(Termination),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunSummary {
    pub processor: String,
    pub rounds: usize,
    pub termination: Option<Termination>,
    /// How many times each step was invoked, in registration order.
    pub invocations: Vec<(String, usize)>,
    pub unresolved: usize,
}

impl RunSummary {
    pub fn is_success(&self) -> bool {
        self.termination == Some(Termination::Succeeded)
    }

    pub fn invocations_of(&self, step: &str) -> Option<usize> {
        self.invocations
            .iter()
            .find(|(name, _)| name == step)
            .map(|(_, count)| *count)
    }
}
