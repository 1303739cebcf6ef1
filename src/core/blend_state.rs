//! Blend state descriptor
//!
//! Describes how newly rasterized fragment color is combined with the
//! framebuffer for up to four render targets. A [`BlendState`] is mutable
//! until a [`GraphicsDevice`](crate::context::GraphicsDevice) binds it; from
//! then on every setter returns [`BlendStateError::StateFrozen`].

use std::sync::Arc;

use tracing::{debug, warn};

use super::presets::{self, BlendPreset};
use super::render_states::{Blend, BlendFunction, ColorWriteChannels};
use super::target_blend::{Binding, TargetBlendState, TargetBlendStateMut};
use crate::context::DeviceId;
use crate::error::{BlendStateError, Result};

const TARGET_COUNT: usize = 4;

/// Blend configuration for a draw pipeline.
///
/// Holds four [`TargetBlendState`] slots plus the global blend parameters.
/// The slot-0 accessors (`color_source_blend`, `set_color_source_blend`, ...)
/// cover the common single render target case.
///
/// Cloning keeps the bound state; use [`BlendState::unbound_copy`] to derive
/// a mutable variant of a bound state or preset.
#[derive(Debug, Clone)]
pub struct BlendState {
    targets: [TargetBlendState; TARGET_COUNT],
    blend_constant_color: wgpu::Color,
    multi_sample_mask: u32,
    independent_blend_enable: bool,
    name: Option<String>,
    binding: Binding,
}

impl Default for BlendState {
    fn default() -> Self {
        Self::new()
    }
}

impl BlendState {
    /// Number of simultaneous render targets described.
    pub const TARGET_COUNT: usize = TARGET_COUNT;

    /// Create an unbound blend state with default values.
    pub fn new() -> Self {
        Self {
            targets: [TargetBlendState::default(); Self::TARGET_COUNT],
            blend_constant_color: wgpu::Color::WHITE,
            multi_sample_mask: u32::MAX,
            independent_blend_enable: false,
            name: None,
            binding: Binding::default(),
        }
    }

    /// Build an already bound preset applying `source`/`destination` to slot 0.
    pub(crate) fn preset(name: &str, source: Blend, destination: Blend) -> Self {
        let mut state = Self::new();
        state.name = Some(name.to_string());
        state.targets[0] = TargetBlendState::with_factors(source, destination);
        state.binding = Binding::frozen();
        state
    }

    /// Copy every field into a fresh, unbound blend state.
    pub fn unbound_copy(&self) -> Self {
        Self {
            binding: Binding::default(),
            ..self.clone()
        }
    }

    /// Whether a device has bound this state (or it is a preset).
    pub fn is_bound(&self) -> bool {
        self.binding.is_bound()
    }

    /// Device this state was last bound to.
    pub fn device(&self) -> Option<DeviceId> {
        self.binding.device()
    }

    /// Mark this state as owned by `device`. Binding again is allowed.
    pub(crate) fn bind(&mut self, device: DeviceId) {
        match self.binding.bind(device) {
            Some(previous) if previous != device => warn!(
                "Blend state {} rebound from {} to {}",
                self.label(),
                previous,
                device
            ),
            Some(_) => {}
            None => debug!("Bound blend state {} to {}", self.label(), device),
        }
    }

    fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    fn check_index(index: usize) -> Result<()> {
        if index < Self::TARGET_COUNT {
            Ok(())
        } else {
            Err(BlendStateError::IndexOutOfRange {
                index,
                count: Self::TARGET_COUNT,
            })
        }
    }

    /// Blend configuration of render target `index` (0 to 3).
    pub fn slot(&self, index: usize) -> Result<&TargetBlendState> {
        Self::check_index(index)?;
        Ok(&self.targets[index])
    }

    /// Write access to render target `index` (0 to 3).
    ///
    /// Setters on the returned view still fail once this state is bound.
    pub fn slot_mut(&mut self, index: usize) -> Result<TargetBlendStateMut<'_>> {
        Self::check_index(index)?;
        Ok(self.view(index))
    }

    /// All four slots.
    pub fn targets(&self) -> &[TargetBlendState; TARGET_COUNT] {
        &self.targets
    }

    /// Slot a device consults for render target `index`.
    ///
    /// Without independent blending every target uses slot 0.
    pub fn effective_target(&self, index: usize) -> Result<&TargetBlendState> {
        Self::check_index(index)?;
        if self.independent_blend_enable {
            Ok(&self.targets[index])
        } else {
            Ok(&self.targets[0])
        }
    }

    // Callers pass indices already known to be in range.
    fn view(&mut self, index: usize) -> TargetBlendStateMut<'_> {
        TargetBlendStateMut::new(&self.binding, &mut self.targets[index])
    }

    /// Source factor for color on render target 0.
    pub fn color_source_blend(&self) -> Blend {
        self.targets[0].color_source_blend()
    }

    /// Set the color source blend of render target 0.
    pub fn set_color_source_blend(&mut self, blend: Blend) -> Result<()> {
        self.view(0).set_color_source_blend(blend)
    }

    /// Destination factor for color on render target 0.
    pub fn color_destination_blend(&self) -> Blend {
        self.targets[0].color_destination_blend()
    }

    /// Set the color destination blend of render target 0.
    pub fn set_color_destination_blend(&mut self, blend: Blend) -> Result<()> {
        self.view(0).set_color_destination_blend(blend)
    }

    /// Source factor for alpha on render target 0.
    pub fn alpha_source_blend(&self) -> Blend {
        self.targets[0].alpha_source_blend()
    }

    /// Set the alpha source blend of render target 0.
    pub fn set_alpha_source_blend(&mut self, blend: Blend) -> Result<()> {
        self.view(0).set_alpha_source_blend(blend)
    }

    /// Destination factor for alpha on render target 0.
    pub fn alpha_destination_blend(&self) -> Blend {
        self.targets[0].alpha_destination_blend()
    }

    /// Set the alpha destination blend of render target 0.
    pub fn set_alpha_destination_blend(&mut self, blend: Blend) -> Result<()> {
        self.view(0).set_alpha_destination_blend(blend)
    }

    /// Function combining weighted color values on render target 0.
    pub fn color_blend_function(&self) -> BlendFunction {
        self.targets[0].color_blend_function()
    }

    /// Set the color blend function of render target 0.
    pub fn set_color_blend_function(&mut self, function: BlendFunction) -> Result<()> {
        self.view(0).set_color_blend_function(function)
    }

    /// Function combining weighted alpha values on render target 0.
    pub fn alpha_blend_function(&self) -> BlendFunction {
        self.targets[0].alpha_blend_function()
    }

    /// Set the alpha blend function of render target 0.
    pub fn set_alpha_blend_function(&mut self, function: BlendFunction) -> Result<()> {
        self.view(0).set_alpha_blend_function(function)
    }

    /// Write mask of render target 0.
    pub fn color_write_channels(&self) -> ColorWriteChannels {
        self.targets[0].color_write_channels()
    }

    /// Set the color write channels of render target 0.
    pub fn set_color_write_channels(&mut self, channels: ColorWriteChannels) -> Result<()> {
        self.view(0).set_color_write_channels(channels)
    }

    /// Write mask of render target 1.
    pub fn color_write_channels1(&self) -> ColorWriteChannels {
        self.targets[1].color_write_channels()
    }

    /// Set the write mask of render target 1.
    pub fn set_color_write_channels1(&mut self, channels: ColorWriteChannels) -> Result<()> {
        self.view(1).set_color_write_channels(channels)
    }

    /// Write mask of render target 2.
    pub fn color_write_channels2(&self) -> ColorWriteChannels {
        self.targets[2].color_write_channels()
    }

    /// Set the write mask of render target 2.
    pub fn set_color_write_channels2(&mut self, channels: ColorWriteChannels) -> Result<()> {
        self.view(2).set_color_write_channels(channels)
    }

    /// Write mask of render target 3.
    pub fn color_write_channels3(&self) -> ColorWriteChannels {
        self.targets[3].color_write_channels()
    }

    /// Set the write mask of render target 3.
    pub fn set_color_write_channels3(&mut self, channels: ColorWriteChannels) -> Result<()> {
        self.view(3).set_color_write_channels(channels)
    }

    /// Constant color used by [`Blend::BlendFactor`] and
    /// [`Blend::InverseBlendFactor`].
    pub fn blend_constant_color(&self) -> wgpu::Color {
        self.blend_constant_color
    }

    /// Set the constant blend color.
    pub fn set_blend_constant_color(&mut self, color: wgpu::Color) -> Result<()> {
        self.binding.ensure_unbound()?;
        self.blend_constant_color = color;
        Ok(())
    }

    /// Bitmask of the multisample subsamples that are written.
    pub fn multi_sample_mask(&self) -> u32 {
        self.multi_sample_mask
    }

    /// Set the multisample mask.
    pub fn set_multi_sample_mask(&mut self, mask: u32) -> Result<()> {
        self.binding.ensure_unbound()?;
        self.multi_sample_mask = mask;
        Ok(())
    }

    /// Whether each render target uses its own slot instead of slot 0.
    pub fn independent_blend_enable(&self) -> bool {
        self.independent_blend_enable
    }

    /// Enable or disable per-target blending.
    pub fn set_independent_blend_enable(&mut self, enable: bool) -> Result<()> {
        self.binding.ensure_unbound()?;
        self.independent_blend_enable = enable;
        Ok(())
    }

    /// Diagnostic label.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Set the diagnostic label.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<()> {
        self.binding.ensure_unbound()?;
        self.name = Some(name.into());
        Ok(())
    }

    /// Shared opaque preset: `One` / `Zero`.
    pub fn opaque() -> Arc<BlendState> {
        presets::global(BlendPreset::Opaque)
    }

    /// Shared premultiplied alpha preset: `One` / `InverseSourceAlpha`.
    pub fn alpha_blend() -> Arc<BlendState> {
        presets::global(BlendPreset::AlphaBlend)
    }

    /// Shared additive preset: `SourceAlpha` / `One`.
    pub fn additive() -> Arc<BlendState> {
        presets::global(BlendPreset::Additive)
    }

    /// Shared straight alpha preset: `SourceAlpha` / `InverseSourceAlpha`.
    pub fn non_premultiplied() -> Arc<BlendState> {
        presets::global(BlendPreset::NonPremultiplied)
    }

    /// Forget the shared presets so the next access rebuilds them.
    ///
    /// Presets already handed out remain valid.
    pub fn reset_presets() {
        presets::reset_global();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{GraphicsDevice, HeadlessDevice};

    type Mutator = fn(&mut BlendState) -> Result<()>;

    fn all_mutators() -> [(&'static str, Mutator); 21] {
        [
            ("color_source_blend", |s| s.set_color_source_blend(Blend::DestinationColor)),
            ("color_destination_blend", |s| s.set_color_destination_blend(Blend::One)),
            ("alpha_source_blend", |s| s.set_alpha_source_blend(Blend::Zero)),
            ("alpha_destination_blend", |s| s.set_alpha_destination_blend(Blend::One)),
            ("color_blend_function", |s| s.set_color_blend_function(BlendFunction::Subtract)),
            ("alpha_blend_function", |s| s.set_alpha_blend_function(BlendFunction::Min)),
            ("color_write_channels", |s| s.set_color_write_channels(ColorWriteChannels::BLUE)),
            ("color_write_channels1", |s| s.set_color_write_channels1(ColorWriteChannels::BLUE)),
            ("color_write_channels2", |s| s.set_color_write_channels2(ColorWriteChannels::BLUE)),
            ("color_write_channels3", |s| s.set_color_write_channels3(ColorWriteChannels::BLUE)),
            ("blend_constant_color", |s| s.set_blend_constant_color(wgpu::Color::RED)),
            ("multi_sample_mask", |s| s.set_multi_sample_mask(0)),
            ("independent_blend_enable", |s| s.set_independent_blend_enable(true)),
            ("name", |s| s.set_name("renamed")),
            ("slot_color_source_blend", |s| {
                s.slot_mut(1)?.set_color_source_blend(Blend::SourceColor)
            }),
            ("slot_color_destination_blend", |s| {
                s.slot_mut(2)?.set_color_destination_blend(Blend::DestinationAlpha)
            }),
            ("slot_alpha_source_blend", |s| {
                s.slot_mut(3)?.set_alpha_source_blend(Blend::BlendFactor)
            }),
            ("slot_alpha_destination_blend", |s| {
                s.slot_mut(1)?.set_alpha_destination_blend(Blend::InverseBlendFactor)
            }),
            ("slot_color_blend_function", |s| {
                s.slot_mut(2)?.set_color_blend_function(BlendFunction::ReverseSubtract)
            }),
            ("slot_alpha_blend_function", |s| {
                s.slot_mut(3)?.set_alpha_blend_function(BlendFunction::Max)
            }),
            ("slot_color_write_channels", |s| {
                s.slot_mut(0)?.set_color_write_channels(ColorWriteChannels::empty())
            }),
        ]
    }

    fn snapshot(state: &BlendState) -> String {
        format!(
            "{:?} {:?} {} {} {:?}",
            state.targets(),
            state.blend_constant_color(),
            state.multi_sample_mask(),
            state.independent_blend_enable(),
            state.name()
        )
    }

    #[test]
    fn test_new_defaults() {
        let state = BlendState::new();
        assert!(!state.is_bound());
        assert_eq!(state.device(), None);
        assert_eq!(state.targets().len(), 4);
        for index in 0..4 {
            assert!(state.slot(index).is_ok());
        }
        assert_eq!(state.color_write_channels(), ColorWriteChannels::ALL);
        assert_eq!(state.blend_constant_color(), wgpu::Color::WHITE);
        assert_eq!(state.multi_sample_mask(), u32::MAX);
        assert!(!state.independent_blend_enable());
        assert_eq!(state.name(), None);
    }

    #[test]
    fn test_mutators_succeed_while_unbound() {
        for (field, mutate) in all_mutators() {
            let mut state = BlendState::new();
            let before = snapshot(&state);
            assert!(mutate(&mut state).is_ok(), "{} should be settable", field);
            assert_ne!(snapshot(&state), before, "{} should have changed", field);
        }
    }

    #[test]
    fn test_every_mutator_rejected_after_bind() {
        let device = HeadlessDevice::new();
        for (field, mutate) in all_mutators() {
            let mut state = BlendState::new();
            device.apply_blend_state(&mut state);
            let before = snapshot(&state);

            assert_eq!(
                mutate(&mut state),
                Err(BlendStateError::StateFrozen),
                "{} should be frozen",
                field
            );
            assert_eq!(snapshot(&state), before, "{} changed after bind", field);
        }
    }

    #[test]
    fn test_slot_index_out_of_range() {
        let mut state = BlendState::new();
        let expected = BlendStateError::IndexOutOfRange { index: 4, count: 4 };

        assert_eq!(state.slot(4).err(), Some(expected));
        assert_eq!(state.slot_mut(4).err(), Some(expected));
        assert!(state.slot(usize::MAX).is_err());
        assert!(state.effective_target(7).is_err());
    }

    #[test]
    fn test_slot_index_checked_before_frozen() {
        let mut state = BlendState::opaque().as_ref().clone();
        assert!(matches!(
            state.slot_mut(5),
            Err(BlendStateError::IndexOutOfRange { index: 5, .. })
        ));
    }

    #[test]
    fn test_slot_zero_proxies_share_storage() {
        let mut state = BlendState::new();
        state.set_color_source_blend(Blend::SourceAlpha).unwrap();
        state
            .slot_mut(0)
            .unwrap()
            .set_alpha_blend_function(BlendFunction::Max)
            .unwrap();

        assert_eq!(
            state.slot(0).unwrap().color_source_blend(),
            Blend::SourceAlpha
        );
        assert_eq!(state.alpha_blend_function(), BlendFunction::Max);
        assert_eq!(state.slot(1).unwrap().color_source_blend(), Blend::One);
    }

    #[test]
    fn test_bind_scenario() {
        let device = HeadlessDevice::new();
        let mut state = BlendState::new();
        state.set_color_source_blend(Blend::SourceAlpha).unwrap();
        state.set_independent_blend_enable(true).unwrap();
        state
            .slot_mut(2)
            .unwrap()
            .set_color_write_channels(ColorWriteChannels::RED | ColorWriteChannels::GREEN)
            .unwrap();

        device.apply_blend_state(&mut state);

        assert_eq!(
            state.slot(0).unwrap().color_source_blend(),
            Blend::SourceAlpha
        );
        assert_eq!(
            state.slot(2).unwrap().color_write_channels(),
            ColorWriteChannels::RED | ColorWriteChannels::GREEN
        );
        assert_eq!(
            state.set_multi_sample_mask(0),
            Err(BlendStateError::StateFrozen)
        );
        assert_eq!(state.multi_sample_mask(), u32::MAX);
    }

    #[test]
    fn test_rebind_is_permitted() {
        let first = HeadlessDevice::new();
        let second = HeadlessDevice::new();
        let mut state = BlendState::new();

        first.apply_blend_state(&mut state);
        first.apply_blend_state(&mut state);
        assert_eq!(state.device(), Some(first.device_id()));

        second.apply_blend_state(&mut state);
        assert!(state.is_bound());
        assert_eq!(state.device(), Some(second.device_id()));
    }

    #[test]
    fn test_write_channel_proxies_target_their_slots() {
        let mut state = BlendState::new();
        state
            .set_color_write_channels1(ColorWriteChannels::RED)
            .unwrap();
        state
            .set_color_write_channels2(ColorWriteChannels::GREEN)
            .unwrap();
        state
            .set_color_write_channels3(ColorWriteChannels::BLUE)
            .unwrap();

        assert_eq!(state.color_write_channels1(), ColorWriteChannels::RED);
        assert_eq!(state.color_write_channels2(), ColorWriteChannels::GREEN);
        assert_eq!(state.color_write_channels3(), ColorWriteChannels::BLUE);

        let expected = [
            ColorWriteChannels::ALL,
            ColorWriteChannels::RED,
            ColorWriteChannels::GREEN,
            ColorWriteChannels::BLUE,
        ];
        for (index, channels) in expected.into_iter().enumerate() {
            assert_eq!(
                state.slot(index).unwrap().color_write_channels(),
                channels,
                "slot {} write mask",
                index
            );
        }
        assert_eq!(state.color_write_channels(), ColorWriteChannels::ALL);
    }

    #[test]
    fn test_effective_target_follows_independent_blend() {
        let mut state = BlendState::new();
        state
            .slot_mut(3)
            .unwrap()
            .set_color_write_channels(ColorWriteChannels::ALPHA)
            .unwrap();

        assert_eq!(
            state.effective_target(3).unwrap().color_write_channels(),
            ColorWriteChannels::ALL
        );

        state.set_independent_blend_enable(true).unwrap();
        assert_eq!(
            state.effective_target(3).unwrap().color_write_channels(),
            ColorWriteChannels::ALPHA
        );
    }

    #[test]
    fn test_preset_constructor_is_bound() {
        let state = BlendState::preset("test", Blend::SourceAlpha, Blend::InverseSourceAlpha);
        assert!(state.is_bound());
        assert_eq!(state.device(), None);
        assert_eq!(state.name(), Some("test"));
        assert_eq!(state.color_source_blend(), Blend::SourceAlpha);
        assert_eq!(state.alpha_source_blend(), Blend::SourceAlpha);
        assert_eq!(state.color_destination_blend(), Blend::InverseSourceAlpha);
        assert_eq!(state.alpha_destination_blend(), Blend::InverseSourceAlpha);
        assert_eq!(state.slot(1).unwrap(), &TargetBlendState::default());
    }

    #[test]
    fn test_clone_keeps_binding_unbound_copy_drops_it() {
        let preset = BlendState::non_premultiplied();

        let mut frozen = preset.as_ref().clone();
        assert_eq!(
            frozen.set_color_source_blend(Blend::One),
            Err(BlendStateError::StateFrozen)
        );

        let mut copy = preset.unbound_copy();
        assert!(!copy.is_bound());
        assert_eq!(copy.name(), preset.name());
        assert_eq!(copy.targets(), preset.targets());
        copy.set_color_source_blend(Blend::One).unwrap();
        assert_eq!(preset.color_source_blend(), Blend::SourceAlpha);
    }

    #[test]
    fn test_global_presets_identity_and_reset() {
        let first = BlendState::additive();
        let again = BlendState::additive();
        assert!(Arc::ptr_eq(&first, &again));
        assert!(Arc::ptr_eq(&BlendState::opaque(), &BlendState::opaque()));

        BlendState::reset_presets();

        let rebuilt = BlendState::additive();
        assert!(!Arc::ptr_eq(&first, &rebuilt));
        assert_eq!(rebuilt.color_source_blend(), Blend::SourceAlpha);
        assert_eq!(rebuilt.color_destination_blend(), Blend::One);
        assert!(rebuilt.is_bound());
        assert_eq!(rebuilt.targets(), first.targets());

        assert!(first.is_bound());
    }
}
