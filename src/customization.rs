//! Wizard appearance and magic parameters chosen before a session
//!
//! `CustomizationData` is validated when it is built or deserialized, so the
//! simulation can trust its colours and power without further checks.

use serde::{Deserialize, Serialize};

use crate::assets::Assets;
use crate::consts::MAX_MAGIC_POWER;
use crate::sim::color::Rgb;

/// Robe colour presets offered by the customization screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RobeColor {
    #[default]
    Crimson,
    Emerald,
    Sapphire,
    Amber,
    Violet,
    Teal,
    Lavender,
    Rose,
}

impl RobeColor {
    pub const ALL: [RobeColor; 8] = [
        RobeColor::Crimson,
        RobeColor::Emerald,
        RobeColor::Sapphire,
        RobeColor::Amber,
        RobeColor::Violet,
        RobeColor::Teal,
        RobeColor::Lavender,
        RobeColor::Rose,
    ];

    pub fn rgb(self) -> Rgb {
        match self {
            RobeColor::Crimson => Rgb(180, 30, 30),
            RobeColor::Emerald => Rgb(30, 150, 70),
            RobeColor::Sapphire => Rgb(40, 80, 180),
            RobeColor::Amber => Rgb(220, 160, 40),
            RobeColor::Violet => Rgb(130, 60, 180),
            RobeColor::Teal => Rgb(40, 160, 160),
            RobeColor::Lavender => Rgb(180, 140, 220),
            RobeColor::Rose => Rgb(200, 100, 100),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            RobeColor::Crimson => "Crimson",
            RobeColor::Emerald => "Emerald",
            RobeColor::Sapphire => "Sapphire",
            RobeColor::Amber => "Amber",
            RobeColor::Violet => "Violet",
            RobeColor::Teal => "Teal",
            RobeColor::Lavender => "Lavender",
            RobeColor::Rose => "Rose",
        }
    }

    /// Cycle through the presets, wrapping at both ends
    pub fn cycled(self, step: i32) -> Self {
        let len = Self::ALL.len() as i32;
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0) as i32;
        Self::ALL[(idx + step).rem_euclid(len) as usize]
    }
}

/// Hat shape (cosmetic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hat {
    #[default]
    Pointed,
    Wide,
    Tall,
}

/// Staff type; decides magic colour and power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Staff {
    #[default]
    Wooden,
    Crystal,
    Bone,
}

impl Staff {
    pub const ALL: [Staff; 3] = [Staff::Wooden, Staff::Crystal, Staff::Bone];

    pub fn as_str(&self) -> &'static str {
        match self {
            Staff::Wooden => "wooden",
            Staff::Crystal => "crystal",
            Staff::Bone => "bone",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "wooden" | "wood" => Some(Staff::Wooden),
            "crystal" => Some(Staff::Crystal),
            "bone" => Some(Staff::Bone),
            _ => None,
        }
    }

    /// Name of the asset colour that tints this staff's magic
    pub fn magic_color_name(self) -> &'static str {
        match self {
            Staff::Wooden => "magic_gold",
            Staff::Crystal => "magic_blue",
            Staff::Bone => "magic_purple",
        }
    }

    pub fn magic_power(self) -> f32 {
        match self {
            Staff::Wooden => 1.0,
            Staff::Crystal => 1.5,
            Staff::Bone => 1.2,
        }
    }
}

/// Validated wizard customization, immutable for a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCustomization", into = "RawCustomization")]
pub struct CustomizationData {
    pub robe_color: Rgb,
    pub robe_name: String,
    pub hat: Hat,
    pub staff: Staff,
    pub magic_color: Rgb,
    /// Multiplier for projectile speed and effect sizes, always finite and ≥ 0
    pub magic_power: f32,
}

impl Default for CustomizationData {
    fn default() -> Self {
        Self {
            robe_color: RobeColor::Crimson.rgb(),
            robe_name: RobeColor::Crimson.name().to_string(),
            hat: Hat::Pointed,
            staff: Staff::Wooden,
            magic_color: Rgb(220, 180, 40),
            magic_power: 1.0,
        }
    }
}

impl CustomizationData {
    /// Build from explicit values, sanitizing the power
    pub fn new(robe_color: Rgb, magic_color: Rgb, magic_power: f32) -> Self {
        Self {
            robe_color,
            magic_color,
            magic_power: sanitize_power(magic_power),
            ..Self::default()
        }
    }

    /// Build from presets; the staff's magic colour is looked up in `assets`
    pub fn from_presets(robe: RobeColor, hat: Hat, staff: Staff, assets: &dyn Assets) -> Self {
        Self {
            robe_color: robe.rgb(),
            robe_name: robe.name().to_string(),
            hat,
            staff,
            magic_color: assets.get_color(staff.magic_color_name()),
            magic_power: staff.magic_power(),
        }
    }
}

/// Clamp to `0..=MAX_MAGIC_POWER`; non-finite input becomes 1.0
fn sanitize_power(power: f32) -> f32 {
    if !power.is_finite() {
        log::warn!("Non-finite magic power {power}, using 1.0");
        return 1.0;
    }
    if power > MAX_MAGIC_POWER {
        log::warn!("Magic power {power} above {MAX_MAGIC_POWER}, clamping");
        return MAX_MAGIC_POWER;
    }
    power.max(0.0)
}

/// On-disk shape: colours are plain integer lists and may carry alpha
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct RawCustomization {
    color: Vec<i64>,
    color_name: String,
    hat: Hat,
    staff: Staff,
    magic_color: Vec<i64>,
    magic_power: f64,
}

impl Default for RawCustomization {
    fn default() -> Self {
        CustomizationData::default().into()
    }
}

impl From<RawCustomization> for CustomizationData {
    fn from(raw: RawCustomization) -> Self {
        Self {
            robe_color: Rgb::from_channels(&raw.color),
            robe_name: raw.color_name,
            hat: raw.hat,
            staff: raw.staff,
            magic_color: Rgb::from_channels(&raw.magic_color),
            magic_power: sanitize_power(raw.magic_power as f32),
        }
    }
}

impl From<CustomizationData> for RawCustomization {
    fn from(data: CustomizationData) -> Self {
        let channels = |c: Rgb| vec![c.0 as i64, c.1 as i64, c.2 as i64];
        Self {
            color: channels(data.robe_color),
            color_name: data.robe_name,
            hat: data.hat,
            staff: data.staff,
            magic_color: channels(data.magic_color),
            magic_power: data.magic_power as f64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::AssetCatalog;
    use crate::sim::color::DEFAULT_MAGIC_COLOR;

    #[test]
    fn test_power_is_sanitized() {
        assert_eq!(CustomizationData::new(Rgb(0, 0, 0), Rgb(0, 0, 0), -2.0).magic_power, 0.0);
        assert_eq!(
            CustomizationData::new(Rgb(0, 0, 0), Rgb(0, 0, 0), f32::NAN).magic_power,
            1.0
        );
        assert_eq!(
            CustomizationData::new(Rgb(0, 0, 0), Rgb(0, 0, 0), 1e9).magic_power,
            MAX_MAGIC_POWER
        );
    }

    #[test]
    fn test_huge_power_from_disk_is_clamped() {
        let json = r#"{"magic_power": 1e9}"#;
        let data: CustomizationData = serde_json::from_str(json).unwrap();
        assert_eq!(data.magic_power, MAX_MAGIC_POWER);
    }

    #[test]
    fn test_staff_presets() {
        let data = CustomizationData::from_presets(
            RobeColor::Teal,
            Hat::Tall,
            Staff::Crystal,
            &AssetCatalog::new(),
        );
        assert_eq!(data.robe_color, Rgb(40, 160, 160));
        assert_eq!(data.robe_name, "Teal");
        assert_eq!(data.magic_power, 1.5);
        assert_eq!(data.magic_color, Rgb(100, 149, 237));
    }

    #[test]
    fn test_staff_names() {
        for staff in Staff::ALL {
            assert_eq!(Staff::from_name(staff.as_str()), Some(staff));
        }
        assert_eq!(Staff::from_name("BONE"), Some(Staff::Bone));
        assert_eq!(Staff::from_name("wand"), None);
    }

    #[test]
    fn test_robe_cycle_wraps() {
        assert_eq!(RobeColor::Crimson.cycled(-1), RobeColor::Rose);
        assert_eq!(RobeColor::Rose.cycled(1), RobeColor::Crimson);
        assert_eq!(RobeColor::Amber.cycled(2), RobeColor::Teal);
    }

    #[test]
    fn test_deserialize_malformed_colors() {
        let json = r#"{"color": [10, 20, 30, 255], "magic_color": [1], "magic_power": 1.2}"#;
        let data: CustomizationData = serde_json::from_str(json).unwrap();
        assert_eq!(data.robe_color, Rgb(10, 20, 30));
        assert_eq!(data.magic_color, DEFAULT_MAGIC_COLOR);
        assert!((data.magic_power - 1.2).abs() < 1e-6);
        assert_eq!(data.staff, Staff::Wooden);
    }

    #[test]
    fn test_json_keys() {
        let json = serde_json::to_value(CustomizationData::default()).unwrap();
        assert_eq!(json["color"], serde_json::json!([180, 30, 30]));
        assert_eq!(json["color_name"], "Crimson");
        assert_eq!(json["hat"], "pointed");
        assert_eq!(json["staff"], "wooden");
    }
}
