//! Backdrop suggestions derived from a base color by color-theory rules.
//!
//! All hue math happens in HSL. Chromatic candidates keep the base hue
//! relationship but are pulled into a lightness band that works as a photo
//! backdrop; neutral candidates ignore hue entirely.

use std::fmt;

use palette::{Hsl, ShiftHue};
use serde::{Deserialize, Serialize};

use crate::color::{from_hsl, parse_hex, to_hex, to_hsl};
use crate::error::Result;
use crate::naming::ColorNamer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HarmonyType {
    Complementary,
    Analogous,
    Triadic,
    Neutral,
}

impl HarmonyType {
    pub const ALL: [HarmonyType; 4] = [
        Self::Complementary,
        Self::Analogous,
        Self::Triadic,
        Self::Neutral,
    ];
}

impl fmt::Display for HarmonyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complementary => write!(f, "complementary"),
            Self::Analogous => write!(f, "analogous"),
            Self::Triadic => write!(f, "triadic"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarmonySuggestion {
    pub hex: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: HarmonyType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarmonyOptions {
    /// Hue offset, in degrees, for the two analogous candidates.
    pub analogous_angle: f32,
    /// Lightness band chromatic candidates are clamped into.
    pub min_lightness: f32,
    pub max_lightness: f32,
    /// Chromatic candidates never exceed this saturation.
    pub max_saturation: f32,
}

impl Default for HarmonyOptions {
    fn default() -> Self {
        HarmonyOptions {
            analogous_angle: 30.0,
            min_lightness: 0.55,
            max_lightness: 0.85,
            max_saturation: 0.8,
        }
    }
}

const TRIADIC_ANGLE: f32 = 120.0;

// (lightness, description) for each neutral, given the base lightness.
fn neutral_variants(base_lightness: f32) -> [(f32, &'static str); 3] {
    let light = (0.90 + (base_lightness - 0.5) * 0.1).clamp(0.85, 0.96);
    let mid = if base_lightness > 0.5 {
        base_lightness - 0.35
    } else {
        base_lightness + 0.35
    }
    .clamp(0.2, 0.8);
    let dark = 0.10 + base_lightness * 0.06;
    [
        (light, "Soft neutral backdrop"),
        (mid, "Balanced gray backdrop"),
        (dark, "Moody dark backdrop"),
    ]
}

/// Suggest backdrop colors for `base_hex`.
///
/// The order is the ranking: complementary first, then analogous, triadic
/// and finally the neutral fallbacks.
pub fn suggest(base_hex: &str, options: &HarmonyOptions) -> Result<Vec<HarmonySuggestion>> {
    let base = to_hsl(parse_hex(base_hex)?);
    let namer = ColorNamer::default();

    let backdrop = |hsl: Hsl| -> Hsl {
        let lo = options.min_lightness.min(options.max_lightness);
        let hi = options.max_lightness.max(options.min_lightness);
        Hsl::new(
            hsl.hue,
            hsl.saturation.min(options.max_saturation),
            hsl.lightness.clamp(lo, hi),
        )
    };
    let suggestion = |hsl: Hsl, kind: HarmonyType, description: &str| {
        let rgb = from_hsl(hsl);
        HarmonySuggestion {
            hex: to_hex(rgb),
            name: namer.name_for(rgb).to_string(),
            kind,
            description: description.to_string(),
        }
    };

    let angle = options.analogous_angle;
    let mut out = vec![
        suggestion(
            backdrop(base.shift_hue(180.0)),
            HarmonyType::Complementary,
            "Complementary contrast",
        ),
        suggestion(
            backdrop(base.shift_hue(angle)),
            HarmonyType::Analogous,
            "Analogous harmony",
        ),
        suggestion(
            backdrop(base.shift_hue(-angle)),
            HarmonyType::Analogous,
            "Analogous harmony",
        ),
        suggestion(
            backdrop(base.shift_hue(TRIADIC_ANGLE)),
            HarmonyType::Triadic,
            "Triadic accent",
        ),
        suggestion(
            backdrop(base.shift_hue(-TRIADIC_ANGLE)),
            HarmonyType::Triadic,
            "Triadic accent",
        ),
    ];
    for (lightness, description) in neutral_variants(base.lightness) {
        let gray: Hsl = Hsl::new(0.0, 0.0, lightness);
        out.push(suggestion(gray, HarmonyType::Neutral, description));
    }
    Ok(out)
}

/// The "auto-match" pick: the first complementary suggestion, or the first
/// suggestion of any kind.
pub fn auto_match(suggestions: &[HarmonySuggestion]) -> Option<&HarmonySuggestion> {
    suggestions
        .iter()
        .find(|s| s.kind == HarmonyType::Complementary)
        .or_else(|| suggestions.first())
}
