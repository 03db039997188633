use std::num::NonZero;

#[derive(Clone, Debug)]
pub struct RoundOptions {
    /// Name permanent errors are attributed to.
    pub processor_name: String,
    /// Stop with an error after this many rounds. Unbounded when `None`.
    pub max_rounds: Option<NonZero<usize>>,
    /// Forward permanent errors to `Host::report_diagnostic` as well.
    pub report_to_host: bool,
}

impl Default for RoundOptions {
    fn default() -> Self {
        Self {
            processor_name: "processor".into(),
            max_rounds: None,
            report_to_host: true,
        }
    }
}
