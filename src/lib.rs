//! Color analysis for product photos.
//!
//! Given the bytes of an uploaded photo this crate extracts the dominant
//! palette, names each swatch, grades how trustworthy the palette is, and
//! derives backdrop colors that pair with the dominant color.
//!
//! ```no_run
//! # fn main() -> backdrop_palette_wasm::Result<()> {
//! let bytes = std::fs::read("product.png").unwrap();
//! let palette = backdrop_palette_wasm::extract_palette(&bytes, 5)?;
//! let named = backdrop_palette_wasm::name_colors(&palette);
//! let backdrops = backdrop_palette_wasm::suggest_backdrops(&named[0].hex)?;
//! # Ok(())
//! # }
//! ```
//!
//! Every function is pure: no shared state, no caching, safe to call from
//! several threads at once.

mod bindings;
pub mod color;
pub mod confidence;
pub mod emoji;
pub mod error;
pub mod extract;
pub mod harmony;
pub mod naming;
pub mod options;
pub mod sample;

use log::debug;
use serde::Serialize;

pub use confidence::{ConfidenceAssessment, ConfidenceThresholds, ConfidenceTier};
pub use emoji::emoji_for;
pub use error::{AnalysisError, Result};
pub use extract::{ColorSpace, ExtractOptions, PaletteSwatch};
pub use harmony::{HarmonyOptions, HarmonySuggestion, HarmonyType, auto_match};
pub use naming::ColorNamer;
pub use options::AnalysisOptions;
pub use sample::{SampledPixel, sample_image, sample_pixels};

/// Decode `input` and extract up to `k` dominant colors with default settings.
pub fn extract_palette(input: &[u8], k: usize) -> Result<Vec<PaletteSwatch>> {
    extract_palette_with(input, &AnalysisOptions::with_k(k))
}

pub fn extract_palette_with(input: &[u8], options: &AnalysisOptions) -> Result<Vec<PaletteSwatch>> {
    let pixels = sample::sample_pixels(input, options.sample_budget)?;
    extract::extract(&pixels, &options.extract)
}

/// Fill in `name` and `simple_name` for every swatch.
pub fn name_colors(swatches: &[PaletteSwatch]) -> Vec<PaletteSwatch> {
    ColorNamer::default().name_all(swatches)
}

pub fn assess_confidence(swatches: &[PaletteSwatch], locale: Option<&str>) -> Result<ConfidenceAssessment> {
    confidence::assess(swatches, &ConfidenceThresholds::default(), locale)
}

pub fn suggest_backdrops(base_hex: &str) -> Result<Vec<HarmonySuggestion>> {
    harmony::suggest(base_hex, &HarmonyOptions::default())
}

/// Everything the UI needs after an upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorReport {
    pub palette: Vec<PaletteSwatch>,
    pub confidence: ConfidenceAssessment,
    pub suggestions: Vec<HarmonySuggestion>,
    /// The suggestion an "auto-match" backdrop toggle would pick.
    pub auto_backdrop: Option<HarmonySuggestion>,
    /// Emoji for the dominant swatch.
    pub emoji: &'static str,
}

/// Run the full pipeline over one image.
pub fn analyze(input: &[u8], options: &AnalysisOptions) -> Result<ColorReport> {
    let palette = name_colors(&extract_palette_with(input, options)?);
    let confidence = confidence::assess(&palette, &options.confidence, options.locale.as_deref())?;

    // extract never returns an empty palette on success.
    let dominant = palette.first().ok_or(AnalysisError::InvalidPalette)?;
    let suggestions = harmony::suggest(&dominant.hex, &options.harmony)?;
    let auto_backdrop = auto_match(&suggestions).cloned();
    let emoji = emoji_for(&dominant.hex);
    debug!(
        "analysed image: {} swatches, dominant {} ({}%), confidence {}",
        palette.len(),
        dominant.hex,
        dominant.percentage,
        confidence.tier
    );

    Ok(ColorReport {
        palette,
        confidence,
        suggestions,
        auto_backdrop,
        emoji,
    })
}
