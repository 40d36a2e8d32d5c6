//! RGB colour values shared by particles, projectiles and customization
//!
//! Colours coming from outside the simulation (settings files, customization
//! records) are validated once at construction; inside the core an `Rgb` is
//! always three channels.

use serde::{Deserialize, Serialize};

/// An 8-bit-per-channel colour. Serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Substituted when a colour has the wrong shape
pub const DEFAULT_MAGIC_COLOR: Rgb = Rgb(100, 149, 237);
pub const WHITE: Rgb = Rgb(255, 255, 255);

impl Rgb {
    /// Build from an untrusted channel list
    ///
    /// Uses the first three channels clamped to 0..=255 (an alpha channel is
    /// dropped). Fewer than three channels yields [`DEFAULT_MAGIC_COLOR`].
    pub fn from_channels(channels: &[i64]) -> Self {
        match channels {
            [r, g, b, ..] => Self(clamp_channel(*r), clamp_channel(*g), clamp_channel(*b)),
            _ => {
                log::warn!(
                    "Malformed colour with {} channel(s), using default",
                    channels.len()
                );
                DEFAULT_MAGIC_COLOR
            }
        }
    }

    /// Linear blend: `self * (1 - t) + other * t`, truncated like integer pixel maths
    pub fn mix(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 * (1.0 - t) + b as f32 * t) as u8;
        Rgb(
            lerp(self.0, other.0),
            lerp(self.1, other.1),
            lerp(self.2, other.2),
        )
    }

    /// Move each channel toward black by `amount`
    pub fn darker(self, amount: u8) -> Rgb {
        Rgb(
            self.0.saturating_sub(amount),
            self.1.saturating_sub(amount),
            self.2.saturating_sub(amount),
        )
    }

    /// Normalized RGBA for vertex colours
    pub fn to_rgba(self, alpha: f32) -> [f32; 4] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
            alpha.clamp(0.0, 1.0),
        ]
    }
}

/// Colours the simulation needs for its own effects, resolved once per session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Dust kicked up by a jump
    pub jump_dust: Rgb,
    /// Dust kicked up by a hard landing
    pub landing_dust: Rgb,
    /// Particles emitted when the player is hurt
    pub damage: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            jump_dust: Rgb(210, 180, 140),
            landing_dust: Rgb(160, 82, 45),
            damage: Rgb(200, 50, 50),
        }
    }
}

fn clamp_channel(v: i64) -> u8 {
    v.clamp(0, 255) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_channels_drops_alpha() {
        assert_eq!(Rgb::from_channels(&[10, 20, 30, 128]), Rgb(10, 20, 30));
    }

    #[test]
    fn test_from_channels_clamps() {
        assert_eq!(Rgb::from_channels(&[-5, 300, 7]), Rgb(0, 255, 7));
    }

    #[test]
    fn test_from_channels_short_uses_default() {
        assert_eq!(Rgb::from_channels(&[1, 2]), DEFAULT_MAGIC_COLOR);
        assert_eq!(Rgb::from_channels(&[]), DEFAULT_MAGIC_COLOR);
    }

    #[test]
    fn test_mix_toward_white() {
        let base = Rgb(0, 100, 255);
        assert_eq!(base.mix(WHITE, 0.0), base);
        assert_eq!(base.mix(WHITE, 1.0), WHITE);
        // 100 * 0.7 + 255 * 0.3 = 146.5 -> 146
        assert_eq!(base.mix(WHITE, 0.3).1, 146);
    }

    #[test]
    fn test_serializes_as_array() {
        let json = serde_json::to_string(&Rgb(1, 2, 3)).unwrap();
        assert_eq!(json, "[1,2,3]");
    }
}
