//! Blend state errors

use thiserror::Error;

/// Errors raised while configuring a [`BlendState`](crate::core::BlendState).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BlendStateError {
    /// The blend state was modified after being bound to a graphics device.
    #[error("blend state cannot be modified after it has been bound to a graphics device")]
    StateFrozen,
    /// A render target slot outside `0..4` was requested.
    #[error("render target index {index} is out of range (expected 0..{count})")]
    IndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of available slots.
        count: usize,
    },
}

/// Result alias for blend state operations.
pub type Result<T> = std::result::Result<T, BlendStateError>;
