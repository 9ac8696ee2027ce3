use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::color::{distance_sq, parse_hex};
use crate::error::{AnalysisError, Result};
use crate::extract::PaletteSwatch;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceTier {
    High,
    Medium,
    Low,
}

impl fmt::Display for ConfidenceTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceAssessment {
    pub tier: ConfidenceTier,
    pub message: String,
}

/// Tunable bands used to grade a palette.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfidenceThresholds {
    /// Minimum dominant share (percent) for `high`.
    pub high_dominance: f32,
    /// Minimum dominant share (percent) for `medium`.
    pub medium_dominance: f32,
    /// Swatches closer than this in RGB are near-duplicates.
    pub duplicate_distance: f32,
    /// Near-duplicate pairs tolerated before the palette is graded `low`.
    pub mild_duplicate_limit: usize,
    /// Pairs where both swatches cover less than this share (percent) are
    /// not counted as near-duplicates.
    pub minor_share: f32,
    /// Total coverage (percent) below which the palette is graded `low`.
    pub min_total_coverage: f32,
}

impl Default for ConfidenceThresholds {
    fn default() -> Self {
        ConfidenceThresholds {
            high_dominance: 60.0,
            medium_dominance: 35.0,
            duplicate_distance: 32.0,
            mild_duplicate_limit: 1,
            minor_share: 5.0,
            min_total_coverage: 50.0,
        }
    }
}

/// Grade how trustworthy an extracted palette is.
pub fn assess(
    swatches: &[PaletteSwatch],
    thresholds: &ConfidenceThresholds,
    locale: Option<&str>,
) -> Result<ConfidenceAssessment> {
    let tier = grade(swatches, thresholds)?;
    Ok(ConfidenceAssessment {
        tier,
        message: message(tier, locale).to_string(),
    })
}

pub fn grade(swatches: &[PaletteSwatch], thresholds: &ConfidenceThresholds) -> Result<ConfidenceTier> {
    if swatches.is_empty() {
        return Err(AnalysisError::InvalidPalette);
    }

    let dominant = swatches
        .iter()
        .map(|s| s.percentage)
        .fold(f32::NEG_INFINITY, f32::max);
    let coverage: f32 = swatches.iter().map(|s| s.percentage).sum();
    let duplicates = near_duplicate_pairs(swatches, thresholds);
    debug!("confidence: dominant {dominant}%, coverage {coverage}%, {duplicates} near-duplicate pairs");

    let tier = if coverage < thresholds.min_total_coverage
        || duplicates > thresholds.mild_duplicate_limit
    {
        ConfidenceTier::Low
    } else if dominant >= thresholds.high_dominance && duplicates == 0 {
        ConfidenceTier::High
    } else if dominant >= thresholds.medium_dominance {
        ConfidenceTier::Medium
    } else {
        ConfidenceTier::Low
    };
    Ok(tier)
}

fn near_duplicate_pairs(swatches: &[PaletteSwatch], thresholds: &ConfidenceThresholds) -> usize {
    // Unparseable hex values cannot be compared; they simply never pair up.
    let colors: Vec<_> = swatches
        .iter()
        .filter_map(|s| parse_hex(&s.hex).ok().map(|c| (c, s.percentage)))
        .collect();
    let limit = thresholds.duplicate_distance * thresholds.duplicate_distance;
    let mut pairs = 0;
    for (i, &(a, share_a)) in colors.iter().enumerate() {
        for &(b, share_b) in &colors[i + 1..] {
            let minor = share_a < thresholds.minor_share && share_b < thresholds.minor_share;
            if !minor && (distance_sq(a, b) as f32) < limit {
                pairs += 1;
            }
        }
    }
    pairs
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Locale {
    En,
    Es,
    Fr,
    De,
}

impl Locale {
    /// Match on the language prefix: `es-MX`, `fr_CA` and `DE` all resolve.
    fn parse(code: Option<&str>) -> Self {
        let Some(code) = code else {
            return Self::En;
        };
        let lang = code
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match lang.as_str() {
            "es" => Self::Es,
            "fr" => Self::Fr,
            "de" => Self::De,
            _ => Self::En,
        }
    }
}

pub fn message(tier: ConfidenceTier, locale: Option<&str>) -> &'static str {
    use ConfidenceTier::*;
    match (Locale::parse(locale), tier) {
        (Locale::En, High) => {
            "Clear dominant color detected. Backdrop suggestions should pair well with your product."
        }
        (Locale::En, Medium) => {
            "Several strong colors detected. Suggestions are a good starting point, but review them before generating."
        }
        (Locale::En, Low) => {
            "No clear dominant color found. Try a photo with a plainer background, or pick a backdrop manually."
        }
        (Locale::Es, High) => {
            "Se detectó un color dominante claro. Los fondos sugeridos deberían combinar bien con tu producto."
        }
        (Locale::Es, Medium) => {
            "Se detectaron varios colores fuertes. Las sugerencias son un buen punto de partida, pero revísalas antes de generar."
        }
        (Locale::Es, Low) => {
            "No se encontró un color dominante claro. Prueba con una foto de fondo más simple o elige un fondo manualmente."
        }
        (Locale::Fr, High) => {
            "Couleur dominante clairement détectée. Les fonds suggérés devraient bien s'accorder avec votre produit."
        }
        (Locale::Fr, Medium) => {
            "Plusieurs couleurs marquées détectées. Les suggestions sont un bon point de départ, mais vérifiez-les avant de générer."
        }
        (Locale::Fr, Low) => {
            "Aucune couleur dominante nette. Essayez une photo avec un fond plus simple ou choisissez un fond manuellement."
        }
        (Locale::De, High) => {
            "Eindeutige Hauptfarbe erkannt. Die vorgeschlagenen Hintergründe sollten gut zu Ihrem Produkt passen."
        }
        (Locale::De, Medium) => {
            "Mehrere kräftige Farben erkannt. Die Vorschläge sind ein guter Ausgangspunkt, prüfen Sie sie aber vor dem Generieren."
        }
        (Locale::De, Low) => {
            "Keine eindeutige Hauptfarbe gefunden. Versuchen Sie ein Foto mit schlichterem Hintergrund oder wählen Sie den Hintergrund selbst."
        }
    }
}
