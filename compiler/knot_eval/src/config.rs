//! Runner configuration.

use std::env;

/// Environment variable overriding [`RunnerConfig::max_call_depth`].
pub const MAX_CALL_DEPTH_VAR: &str = "KNOT_MAX_CALL_DEPTH";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Nested closure invocations allowed before `RecursionLimit`.
    pub max_call_depth: usize,
}

impl RunnerConfig {
    pub const DEFAULT_MAX_CALL_DEPTH: usize = 10_000;

    /// Defaults, overridden by `KNOT_MAX_CALL_DEPTH` when it holds a
    /// positive integer.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(depth) = env::var(MAX_CALL_DEPTH_VAR)
            .ok()
            .and_then(|text| text.trim().parse::<usize>().ok())
            .filter(|&depth| depth > 0)
        {
            config.max_call_depth = depth;
        }
        config
    }

    #[must_use]
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }
}

impl Default for RunnerConfig {
    fn default() -> Self {
        RunnerConfig {
            max_call_depth: Self::DEFAULT_MAX_CALL_DEPTH,
        }
    }
}
