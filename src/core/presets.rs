//! Blend state presets
//!
//! [`BlendPresets`] lazily builds the four canonical blend states and hands
//! out shared, already bound instances. The accessors on
//! [`BlendState`](super::BlendState) go through one process-wide cache; code
//! that needs isolated cache state (device teardown, tests) can own its own
//! [`BlendPresets`].

use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use super::blend_state::BlendState;
use super::render_states::Blend;

/// The canonical blend configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendPreset {
    /// Source overwrites destination.
    Opaque,
    /// Premultiplied alpha blending.
    AlphaBlend,
    /// Source is added to destination, weighted by source alpha.
    Additive,
    /// Straight (non-premultiplied) alpha blending.
    NonPremultiplied,
}

impl BlendPreset {
    /// Every preset, in cache order.
    pub const ALL: [BlendPreset; 4] = [
        BlendPreset::Opaque,
        BlendPreset::AlphaBlend,
        BlendPreset::Additive,
        BlendPreset::NonPremultiplied,
    ];

    /// Diagnostic name given to the preset's blend state.
    pub fn name(&self) -> &'static str {
        match self {
            BlendPreset::Opaque => "BlendState.Opaque",
            BlendPreset::AlphaBlend => "BlendState.AlphaBlend",
            BlendPreset::Additive => "BlendState.Additive",
            BlendPreset::NonPremultiplied => "BlendState.NonPremultiplied",
        }
    }

    /// Source and destination factor, applied to color and alpha alike.
    pub fn factors(&self) -> (Blend, Blend) {
        match self {
            BlendPreset::Opaque => (Blend::One, Blend::Zero),
            BlendPreset::AlphaBlend => (Blend::One, Blend::InverseSourceAlpha),
            BlendPreset::Additive => (Blend::SourceAlpha, Blend::One),
            BlendPreset::NonPremultiplied => (Blend::SourceAlpha, Blend::InverseSourceAlpha),
        }
    }

    /// Build a new bound blend state for this preset.
    pub fn build(&self) -> BlendState {
        let (source, destination) = self.factors();
        debug!("Building blend preset {}", self.name());
        BlendState::preset(self.name(), source, destination)
    }

    fn slot(&self) -> usize {
        *self as usize
    }
}

/// Lazily built, resettable cache of the preset blend states.
#[derive(Debug, Default)]
pub struct BlendPresets {
    entries: [Option<Arc<BlendState>>; 4],
}

impl BlendPresets {
    /// Create an empty cache.
    pub const fn new() -> Self {
        Self {
            entries: [None, None, None, None],
        }
    }

    /// Shared instance of `preset`, built on first access.
    pub fn get(&mut self, preset: BlendPreset) -> Arc<BlendState> {
        self.entries[preset.slot()]
            .get_or_insert_with(|| Arc::new(preset.build()))
            .clone()
    }

    /// Cached opaque preset.
    pub fn opaque(&mut self) -> Arc<BlendState> {
        self.get(BlendPreset::Opaque)
    }

    /// Cached premultiplied alpha preset.
    pub fn alpha_blend(&mut self) -> Arc<BlendState> {
        self.get(BlendPreset::AlphaBlend)
    }

    /// Cached additive preset.
    pub fn additive(&mut self) -> Arc<BlendState> {
        self.get(BlendPreset::Additive)
    }

    /// Cached straight alpha preset.
    pub fn non_premultiplied(&mut self) -> Arc<BlendState> {
        self.get(BlendPreset::NonPremultiplied)
    }

    /// Whether `preset` currently has a cached instance.
    pub fn is_cached(&self, preset: BlendPreset) -> bool {
        self.entries[preset.slot()].is_some()
    }

    /// Forget the cached instance of `preset`.
    pub fn reset_preset(&mut self, preset: BlendPreset) {
        self.entries[preset.slot()] = None;
    }

    /// Forget every cached instance. Instances already handed out stay valid.
    pub fn reset(&mut self) {
        debug!("Resetting blend presets");
        for preset in BlendPreset::ALL {
            self.reset_preset(preset);
        }
    }
}

static GLOBAL_PRESETS: Mutex<BlendPresets> = Mutex::new(BlendPresets::new());

// Entries are complete values, so a poisoned lock is still safe to use.
fn with_global<R>(f: impl FnOnce(&mut BlendPresets) -> R) -> R {
    let mut presets = GLOBAL_PRESETS.lock().unwrap_or_else(PoisonError::into_inner);
    f(&mut *presets)
}

pub(crate) fn global(preset: BlendPreset) -> Arc<BlendState> {
    with_global(|presets| presets.get(preset))
}

pub(crate) fn reset_global() {
    with_global(BlendPresets::reset);
}
