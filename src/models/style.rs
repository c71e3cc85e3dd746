use crate::error::{SpotforgeError, SpotforgeResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Visual direction applied to every panel prompt
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum StylePreset {
    #[serde(rename = "Minimal Studio")]
    MinimalStudio,
    #[serde(rename = "Warm Lifestyle")]
    WarmLifestyle,
    #[serde(rename = "Outdoor Natural")]
    OutdoorNatural,
}

/// Prompt fragments carried by a style preset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresetTemplate {
    pub description: &'static str,
    pub lighting: &'static str,
    pub background: &'static str,
    pub mood: &'static str,
}

impl StylePreset {
    pub const ALL: [StylePreset; 3] = [
        StylePreset::MinimalStudio,
        StylePreset::WarmLifestyle,
        StylePreset::OutdoorNatural,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            StylePreset::MinimalStudio => "Minimal Studio",
            StylePreset::WarmLifestyle => "Warm Lifestyle",
            StylePreset::OutdoorNatural => "Outdoor Natural",
        }
    }

    pub fn template(&self) -> PresetTemplate {
        match self {
            StylePreset::MinimalStudio => PresetTemplate {
                description: "Clean, simple background with strong product focus.",
                lighting: "bright, even lighting",
                background: "white or light grey seamless paper",
                mood: "professional, minimalist",
            },
            StylePreset::WarmLifestyle => PresetTemplate {
                description: "Cozy, inviting scenes that tell a story.",
                lighting: "warm, soft lighting, possibly golden hour",
                background: "kitchen counter, living room, cozy blanket",
                mood: "comfortable, inviting, homely",
            },
            StylePreset::OutdoorNatural => PresetTemplate {
                description: "Natural settings with outdoor lighting.",
                lighting: "natural daylight",
                background: "park, garden, patio, trail",
                mood: "fresh, energetic, adventurous",
            },
        }
    }
}

impl Default for StylePreset {
    fn default() -> Self {
        StylePreset::WarmLifestyle
    }
}

impl fmt::Display for StylePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StylePreset {
    type Err = SpotforgeError;

    /// Accepts the display name in any case, or its kebab-case form
    /// (`warm-lifestyle`).
    fn from_str(s: &str) -> SpotforgeResult<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', '_'], " ");
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().to_lowercase() == normalized)
            .ok_or_else(|| SpotforgeError::InvalidStyle(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_names() {
        assert_eq!(
            "Warm Lifestyle".parse::<StylePreset>().unwrap(),
            StylePreset::WarmLifestyle
        );
        assert_eq!(
            "minimal studio".parse::<StylePreset>().unwrap(),
            StylePreset::MinimalStudio
        );
        assert_eq!(
            "outdoor-natural".parse::<StylePreset>().unwrap(),
            StylePreset::OutdoorNatural
        );
    }

    #[test]
    fn test_parse_unknown_style() {
        let err = "Neon Noir".parse::<StylePreset>().unwrap_err();
        assert!(matches!(err, SpotforgeError::InvalidStyle(ref s) if s == "Neon Noir"));
    }

    #[test]
    fn test_serde_uses_display_name() {
        let json = serde_json::to_string(&StylePreset::OutdoorNatural).unwrap();
        assert_eq!(json, "\"Outdoor Natural\"");
        let back: StylePreset = serde_json::from_str(&json).unwrap();
        assert_eq!(back, StylePreset::OutdoorNatural);
    }

    #[test]
    fn test_every_preset_has_template() {
        for preset in StylePreset::ALL {
            let template = preset.template();
            assert!(!template.lighting.is_empty());
            assert!(!template.background.is_empty());
            assert!(!template.mood.is_empty());
        }
    }
}
