//! Generation settings: colors, sizing, grid density and value mapping.

use crate::{GlyphtypeError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::RangeInclusive;
use std::path::Path;

/// Slider range offered by settings UIs for `base_font_size`.
pub const FONT_SIZE_RANGE: RangeInclusive<f32> = 4.0..=100.0;
/// Slider range offered by settings UIs for `grid_spacing`.
pub const GRID_SPACING_RANGE: RangeInclusive<u32> = 2..=50;

/// Which pixel channels produce a sample's scalar value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueStrategy {
    /// BT.709 weighted RGB; fully transparent pixels count as 0.
    #[default]
    Luminance,
    /// Alpha channel.
    Opacity,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub glyph_color: String,
    pub background_color: String,
    pub base_font_size: f32,
    /// Pixel distance between samples on both axes. 0 behaves like 1.
    pub grid_spacing: u32,
    #[serde(serialize_with = "palette_to_str", deserialize_with = "palette_from_str")]
    pub character_palette: Vec<char>,
    pub invert: bool,
    /// Samples whose value is strictly below this are dropped.
    pub threshold: u8,
    pub value_strategy: ValueStrategy,
    pub variable_size: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            glyph_color: "#7ED957".to_string(),
            background_color: "#000000".to_string(),
            base_font_size: 15.0,
            grid_spacing: 8,
            character_palette: "01$&#@".chars().collect(),
            invert: false,
            threshold: 18,
            value_strategy: ValueStrategy::Luminance,
            variable_size: true,
        }
    }
}

impl Settings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Grid step actually walked by the sampler.
    pub fn step(&self) -> u32 {
        self.grid_spacing.max(1)
    }

    /// Reject settings the sampler cannot render meaningfully.
    pub fn validate(&self) -> Result<()> {
        if self.character_palette.is_empty() {
            return Err(GlyphtypeError::InvalidSettings(
                "character palette is empty".to_string(),
            ));
        }
        if !self.base_font_size.is_finite() || self.base_font_size <= 0.0 {
            return Err(GlyphtypeError::InvalidSettings(format!(
                "base font size must be positive, got {}",
                self.base_font_size
            )));
        }
        for (name, color) in [
            ("glyph color", &self.glyph_color),
            ("background color", &self.background_color),
        ] {
            // Colors land verbatim inside attribute values.
            if color.chars().any(|c| matches!(c, '<' | '>' | '&' | '"')) {
                return Err(GlyphtypeError::InvalidSettings(format!(
                    "{name} contains markup characters: {color:?}"
                )));
            }
        }
        Ok(())
    }
}

fn palette_to_str<S: Serializer>(
    palette: &[char],
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&palette.iter().collect::<String>())
}

fn palette_from_str<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<Vec<char>, D::Error> {
    let s = String::deserialize(deserializer)?;
    Ok(s.chars().collect())
}
