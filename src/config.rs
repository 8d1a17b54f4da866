use crate::interpreter::DEFAULT_MAX_CALL_DEPTH;

/// Knobs for a single [`crate::run`], filled in from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Nested calls allowed before the program fails with "Stack overflow.".
    pub max_call_depth: usize,

    /// Write the program's implicit result when it printed nothing.
    pub show_implicit_result: bool,
}

impl RunConfig {
    /// Flags left unset on the command line keep their defaults.
    pub fn from_args(max_call_depth: Option<usize>, quiet: bool) -> Self {
        let defaults = Self::default();

        RunConfig {
            max_call_depth: max_call_depth.unwrap_or(defaults.max_call_depth),
            show_implicit_result: !quiet,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            show_implicit_result: true,
        }
    }
}
