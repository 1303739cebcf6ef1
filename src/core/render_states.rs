//! Render state enumerations
//!
//! Factor, function and write-mask values consumed by blend state
//! descriptors. Values are passed through to the device unchanged.

use bitflags::bitflags;

/// Blend factor applied to a source or destination color/alpha value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Blend {
    /// `(0, 0, 0, 0)`
    Zero,
    /// `(1, 1, 1, 1)`
    One,
    /// Source color.
    SourceColor,
    /// One minus source color.
    InverseSourceColor,
    /// Source alpha.
    SourceAlpha,
    /// One minus source alpha.
    InverseSourceAlpha,
    /// Destination color.
    DestinationColor,
    /// One minus destination color.
    InverseDestinationColor,
    /// Destination alpha.
    DestinationAlpha,
    /// One minus destination alpha.
    InverseDestinationAlpha,
    /// The blend state's constant color.
    BlendFactor,
    /// One minus the blend state's constant color.
    InverseBlendFactor,
    /// `min(source alpha, 1 - destination alpha)`
    SourceAlphaSaturation,
}

/// Operation combining the weighted source and destination values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BlendFunction {
    /// `src + dst`
    #[default]
    Add,
    /// `src - dst`
    Subtract,
    /// `dst - src`
    ReverseSubtract,
    /// `min(src, dst)`
    Min,
    /// `max(src, dst)`
    Max,
}

bitflags! {
    /// Color channels written to a render target.
    ///
    /// Unknown bits are retained so values pass through to the device as given.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ColorWriteChannels: u32 {
        /// Red channel.
        const RED = 1 << 0;
        /// Green channel.
        const GREEN = 1 << 1;
        /// Blue channel.
        const BLUE = 1 << 2;
        /// Alpha channel.
        const ALPHA = 1 << 3;
        /// All color channels.
        const ALL = Self::RED.bits() | Self::GREEN.bits() | Self::BLUE.bits() | Self::ALPHA.bits();
    }
}

impl Default for ColorWriteChannels {
    fn default() -> Self {
        Self::ALL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_channels_default_is_all() {
        let channels = ColorWriteChannels::default();
        assert_eq!(channels, ColorWriteChannels::ALL);
        assert!(channels.contains(ColorWriteChannels::RED | ColorWriteChannels::ALPHA));
    }

    #[test]
    fn test_write_channels_retain_unknown_bits() {
        let channels = ColorWriteChannels::from_bits_retain(0x30);
        assert_eq!(channels.bits(), 0x30);
        assert!(!channels.contains(ColorWriteChannels::RED));
    }
}
