//! Rein blend states
//!
//! Blend state descriptors for wgpu pipelines: how fragment color is combined
//! with the framebuffer for up to four render targets.
//!
//! # Architecture
//!
//! 1. **context** - Device boundary (`GraphicsDevice`, `HeadlessDevice`, `WgpuContext`)
//! 2. **core** - Blend state descriptor, per-target slots and presets
//! 3. **error** - Error type shared by every fallible operation
//!
//! A [`BlendState`] is mutable until a device binds it with
//! [`GraphicsDevice::apply_blend_state`]; afterwards every setter returns
//! [`BlendStateError::StateFrozen`]. The four presets are built already bound.

pub mod context;
pub mod core;
pub mod error;

// Re-export commonly used types
#[cfg(feature = "context")]
pub use context::WgpuContext;
pub use context::{DeviceId, GraphicsDevice, HeadlessDevice};

pub use core::{
    Blend, BlendFunction, BlendPreset, BlendPresets, BlendState, ColorWriteChannels,
    TargetBlendState, TargetBlendStateMut,
};

pub use error::{BlendStateError, Result};

// Re-export wgpu for `wgpu::Color`
pub use wgpu;
