//! Runtime configuration and validation.
//!
//! Mirrors the workspace's plain-struct-with-`validate()` shape: a
//! [`RuntimeConfig`] is constructed, checked once up front, and then
//! consumed by [`crate::Runtime::new`].

/// Hard ceiling on live clones project-wide, independent of configuration
/// — [`RuntimeConfig::clone_cap`] may only tighten this, never loosen it.
pub const MAX_CLONE_CAP: usize = 300;

/// Tunables for one [`crate::Runtime`] instance.
#[derive(Clone, Debug)]
pub struct RuntimeConfig {
    /// Primitive execution steps a single thread may take in one frame
    /// before yielding to the next thread, guarding against starvation
    /// from a runaway script. Default: 4096.
    pub work_budget: usize,
    /// Maximum live (non-removed) clones across the whole project.
    /// Default and hard ceiling: [`MAX_CLONE_CAP`].
    pub clone_cap: usize,
    /// Consecutive stack-overflow warnings logged before the runtime
    /// stops logging further ones for the life of this instance, to
    /// avoid flooding the log from a script that is stuck recursing every
    /// frame. Default: 10.
    pub max_stack_overflow_warnings: u32,
    /// Seed for the deterministic RNG driving `operator_random` and list
    /// keyword indices (`"random"`/`"any"`).
    pub rng_seed: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            work_budget: 4096,
            clone_cap: MAX_CLONE_CAP,
            max_stack_overflow_warnings: 10,
            rng_seed: 0,
        }
    }
}

impl RuntimeConfig {
    /// Validate all structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.work_budget == 0 {
            return Err(ConfigError::ZeroWorkBudget);
        }
        if self.clone_cap > MAX_CLONE_CAP {
            return Err(ConfigError::CloneCapExceedsMaximum {
                configured: self.clone_cap,
                maximum: MAX_CLONE_CAP,
            });
        }
        if self.max_stack_overflow_warnings == 0 {
            return Err(ConfigError::ZeroStackOverflowWarningLimit);
        }
        Ok(())
    }
}

/// Errors detected during [`RuntimeConfig::validate`].
#[derive(Clone, Copy, Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// `work_budget` was zero, which would never let a thread take a
    /// single step.
    #[error("work_budget must be at least 1")]
    ZeroWorkBudget,
    /// `clone_cap` exceeded the project-wide hard ceiling.
    #[error("clone_cap {configured} exceeds the maximum of {maximum}")]
    CloneCapExceedsMaximum {
        /// The configured value that was too large.
        configured: usize,
        /// The hard ceiling it exceeded.
        maximum: usize,
    },
    /// `max_stack_overflow_warnings` was zero, which would silence even
    /// the first overflow warning.
    #[error("max_stack_overflow_warnings must be at least 1")]
    ZeroStackOverflowWarningLimit,
}
