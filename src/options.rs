use serde::{Deserialize, Serialize};

use crate::confidence::ConfidenceThresholds;
use crate::extract::ExtractOptions;
use crate::harmony::HarmonyOptions;
use crate::sample::DEFAULT_SAMPLE_BUDGET;

/// Every tunable of the analysis pipeline.
///
/// Missing fields take their defaults, so a partial JSON document such as
/// `{"extract": {"k": 3}}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisOptions {
    pub sample_budget: u32,
    pub extract: ExtractOptions,
    pub confidence: ConfidenceThresholds,
    pub harmony: HarmonyOptions,
    pub locale: Option<String>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        AnalysisOptions {
            sample_budget: DEFAULT_SAMPLE_BUDGET,
            extract: ExtractOptions::default(),
            confidence: ConfidenceThresholds::default(),
            harmony: HarmonyOptions::default(),
            locale: None,
        }
    }
}

impl AnalysisOptions {
    pub fn with_k(k: usize) -> Self {
        AnalysisOptions {
            extract: ExtractOptions::with_k(k),
            ..Default::default()
        }
    }
}
