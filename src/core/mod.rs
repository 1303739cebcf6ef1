//! Core render state abstractions
//!
//! This module provides the blend state descriptor and the values it carries.

pub mod blend_state;
pub mod presets;
pub mod render_states;
pub mod target_blend;

pub use blend_state::BlendState;
pub use presets::{BlendPreset, BlendPresets};
pub use render_states::{Blend, BlendFunction, ColorWriteChannels};
pub use target_blend::{TargetBlendState, TargetBlendStateMut};
