//! Errors a [`crate::Runtime`] can raise outside of a single thread's own
//! fault (those are logged and contained by `scratch-thread`'s scheduler).

use scratch_core::LoadError;

use crate::config::ConfigError;

/// Failure building or driving a [`crate::Runtime`].
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The supplied [`crate::RuntimeConfig`] failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// SB3 project text failed to parse or validate, via
    /// [`crate::Runtime::load`]'s convenience path through `scratch-sb3`.
    #[error(transparent)]
    Load(#[from] LoadError),
}
