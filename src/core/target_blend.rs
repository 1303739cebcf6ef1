//! Per-target blend configuration
//!
//! One [`TargetBlendState`] exists for each of the four simultaneous render
//! targets a [`BlendState`](super::BlendState) describes. Reads go through
//! the slot directly; writes go through [`TargetBlendStateMut`], which checks
//! the owning descriptor's binding before touching any field.

use super::render_states::{Blend, BlendFunction, ColorWriteChannels};
use crate::context::DeviceId;
use crate::error::{BlendStateError, Result};

/// Bound state shared by a descriptor and the write views of its slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Binding {
    device: Option<DeviceId>,
    bound: bool,
}

impl Binding {
    /// A binding that is frozen without belonging to any device.
    pub(crate) fn frozen() -> Self {
        Self {
            device: None,
            bound: true,
        }
    }

    pub(crate) fn is_bound(&self) -> bool {
        self.bound
    }

    pub(crate) fn device(&self) -> Option<DeviceId> {
        self.device
    }

    /// Records `device` as the owner and freezes. Returns the previous device.
    pub(crate) fn bind(&mut self, device: DeviceId) -> Option<DeviceId> {
        self.bound = true;
        self.device.replace(device)
    }

    /// The single gate every mutator goes through.
    pub(crate) fn ensure_unbound(&self) -> Result<()> {
        if self.bound {
            Err(BlendStateError::StateFrozen)
        } else {
            Ok(())
        }
    }
}

/// Blend configuration for a single render target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetBlendState {
    color_source_blend: Blend,
    color_destination_blend: Blend,
    alpha_source_blend: Blend,
    alpha_destination_blend: Blend,
    color_blend_function: BlendFunction,
    alpha_blend_function: BlendFunction,
    color_write_channels: ColorWriteChannels,
}

impl Default for TargetBlendState {
    fn default() -> Self {
        Self {
            color_source_blend: Blend::One,
            color_destination_blend: Blend::Zero,
            alpha_source_blend: Blend::One,
            alpha_destination_blend: Blend::Zero,
            color_blend_function: BlendFunction::Add,
            alpha_blend_function: BlendFunction::Add,
            color_write_channels: ColorWriteChannels::ALL,
        }
    }
}

impl TargetBlendState {
    /// Same factor pair for color and alpha, default functions and mask.
    pub(crate) fn with_factors(source: Blend, destination: Blend) -> Self {
        Self {
            color_source_blend: source,
            color_destination_blend: destination,
            alpha_source_blend: source,
            alpha_destination_blend: destination,
            ..Self::default()
        }
    }

    /// Source factor for color.
    pub fn color_source_blend(&self) -> Blend {
        self.color_source_blend
    }

    /// Destination factor for color.
    pub fn color_destination_blend(&self) -> Blend {
        self.color_destination_blend
    }

    /// Source factor for alpha.
    pub fn alpha_source_blend(&self) -> Blend {
        self.alpha_source_blend
    }

    /// Destination factor for alpha.
    pub fn alpha_destination_blend(&self) -> Blend {
        self.alpha_destination_blend
    }

    /// Function combining weighted color values.
    pub fn color_blend_function(&self) -> BlendFunction {
        self.color_blend_function
    }

    /// Function combining weighted alpha values.
    pub fn alpha_blend_function(&self) -> BlendFunction {
        self.alpha_blend_function
    }

    /// Channels written to the render target.
    pub fn color_write_channels(&self) -> ColorWriteChannels {
        self.color_write_channels
    }

    /// Whether this target simply overwrites the destination.
    ///
    /// Devices can skip enabling blending for such targets.
    pub fn is_blending_disabled(&self) -> bool {
        self.color_source_blend == Blend::One
            && self.alpha_source_blend == Blend::One
            && self.color_destination_blend == Blend::Zero
            && self.alpha_destination_blend == Blend::Zero
            && self.color_blend_function == BlendFunction::Add
            && self.alpha_blend_function == BlendFunction::Add
    }
}

/// Write access to one slot of a [`BlendState`](super::BlendState).
///
/// Every setter fails with [`BlendStateError::StateFrozen`] once the owning
/// descriptor is bound, leaving the field untouched.
pub struct TargetBlendStateMut<'a> {
    binding: &'a Binding,
    target: &'a mut TargetBlendState,
}

impl<'a> TargetBlendStateMut<'a> {
    pub(crate) fn new(binding: &'a Binding, target: &'a mut TargetBlendState) -> Self {
        Self { binding, target }
    }

    /// Read-only view of the slot.
    pub fn get(&self) -> &TargetBlendState {
        self.target
    }

    /// Set the source factor for color.
    pub fn set_color_source_blend(&mut self, blend: Blend) -> Result<()> {
        self.binding.ensure_unbound()?;
        self.target.color_source_blend = blend;
        Ok(())
    }

    /// Set the destination factor for color.
    pub fn set_color_destination_blend(&mut self, blend: Blend) -> Result<()> {
        self.binding.ensure_unbound()?;
        self.target.color_destination_blend = blend;
        Ok(())
    }

    /// Set the source factor for alpha.
    pub fn set_alpha_source_blend(&mut self, blend: Blend) -> Result<()> {
        self.binding.ensure_unbound()?;
        self.target.alpha_source_blend = blend;
        Ok(())
    }

    /// Set the destination factor for alpha.
    pub fn set_alpha_destination_blend(&mut self, blend: Blend) -> Result<()> {
        self.binding.ensure_unbound()?;
        self.target.alpha_destination_blend = blend;
        Ok(())
    }

    /// Set the function combining weighted color values.
    pub fn set_color_blend_function(&mut self, function: BlendFunction) -> Result<()> {
        self.binding.ensure_unbound()?;
        self.target.color_blend_function = function;
        Ok(())
    }

    /// Set the function combining weighted alpha values.
    pub fn set_alpha_blend_function(&mut self, function: BlendFunction) -> Result<()> {
        self.binding.ensure_unbound()?;
        self.target.alpha_blend_function = function;
        Ok(())
    }

    /// Set the channels written to the render target.
    pub fn set_color_write_channels(&mut self, channels: ColorWriteChannels) -> Result<()> {
        self.binding.ensure_unbound()?;
        self.target.color_write_channels = channels;
        Ok(())
    }
}
