//! Program variant flags and the shader defines they select.

use std::ops::BitOr;

/// 64-bit program variant flags.
///
/// Each known bit becomes a shader define when the program is compiled;
/// unknown bits are carried along (they still distinguish cache entries)
/// but select nothing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramParameters(pub u64);

const DEFINES: [(u64, &str); 2] = [(1 << 0, "DEBUG_VIEW"), (1 << 1, "HIGH_QUALITY")];

impl ProgramParameters {
    /// Default variant.
    pub const NONE: Self = Self(0);
    /// Output only the stage's own contribution (shafts only, clouds only).
    pub const DEBUG_VIEW: Self = Self(1 << 0);
    /// More ray-march and blur samples.
    pub const HIGH_QUALITY: Self = Self(1 << 1);

    /// Raw bits.
    #[must_use]
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Whether every bit of `other` is set.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Shader defines selected by the known bits, in bit order.
    pub fn shader_defines(self) -> impl Iterator<Item = &'static str> {
        DEFINES
            .into_iter()
            .filter(move |(bit, _)| self.0 & bit != 0)
            .map(|(_, name)| name)
    }
}

impl From<u64> for ProgramParameters {
    fn from(bits: u64) -> Self {
        Self(bits)
    }
}

impl BitOr for ProgramParameters {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_bits_map_to_defines() {
        let none: Vec<_> = ProgramParameters::NONE.shader_defines().collect();
        assert!(none.is_empty());

        let both = ProgramParameters::DEBUG_VIEW | ProgramParameters::HIGH_QUALITY;
        let defines: Vec<_> = both.shader_defines().collect();
        assert_eq!(defines, ["DEBUG_VIEW", "HIGH_QUALITY"]);
        assert!(both.contains(ProgramParameters::HIGH_QUALITY));
    }

    #[test]
    fn unknown_bits_select_nothing() {
        let params = ProgramParameters(1 << 40);
        assert_eq!(params.shader_defines().count(), 0);
        assert_ne!(params, ProgramParameters::NONE);
    }
}
