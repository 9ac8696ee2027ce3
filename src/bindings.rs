//! `wasm-bindgen` surface consumed by the storefront UI.
//!
//! Results cross the boundary as plain JS objects with the same camelCase
//! field names the Rust types serialize to. The key/value layout of each
//! object is computed by plain functions so it can be checked off-wasm.

use js_sys::{Array, Object, Reflect};
use log::error;
use wasm_bindgen::prelude::*;

use crate::confidence::ConfidenceAssessment;
use crate::error::AnalysisError;
use crate::extract::PaletteSwatch;
use crate::harmony::HarmonySuggestion;
use crate::{AnalysisOptions, ColorReport};

/// A scalar field value before it becomes a `JsValue`.
#[derive(Debug, Clone, PartialEq)]
enum Field {
    Text(String),
    Num(f64),
    Null,
}

impl Field {
    fn opt(value: Option<&str>) -> Self {
        value.map_or(Field::Null, |v| Field::Text(v.to_string()))
    }
}

impl From<Field> for JsValue {
    fn from(field: Field) -> Self {
        match field {
            Field::Text(s) => JsValue::from_str(&s),
            Field::Num(n) => JsValue::from_f64(n),
            Field::Null => JsValue::NULL,
        }
    }
}

type Fields = Vec<(&'static str, Field)>;

fn swatch_fields(s: &PaletteSwatch) -> Fields {
    vec![
        ("hex", Field::Text(s.hex.clone())),
        ("percentage", Field::Num(s.percentage as f64)),
        ("name", Field::opt(s.name.as_deref())),
        ("simpleName", Field::opt(s.simple_name.as_deref())),
    ]
}

fn assessment_fields(a: &ConfidenceAssessment) -> Fields {
    vec![
        ("tier", Field::Text(a.tier.to_string())),
        ("message", Field::Text(a.message.clone())),
    ]
}

fn suggestion_fields(s: &HarmonySuggestion) -> Fields {
    vec![
        ("hex", Field::Text(s.hex.clone())),
        ("name", Field::Text(s.name.clone())),
        ("type", Field::Text(s.kind.to_string())),
        ("description", Field::Text(s.description.clone())),
    ]
}

fn js_error(e: AnalysisError) -> JsValue {
    error!("color analysis failed: {e}");
    JsValue::from_str(e.user_message())
}

fn set(obj: &Object, key: &str, value: &JsValue) -> Result<(), JsValue> {
    Reflect::set(obj, &JsValue::from_str(key), value).map(|_| ())
}

fn object_from(fields: Fields) -> Result<Object, JsValue> {
    let obj = Object::new();
    for (key, field) in fields {
        let value = JsValue::from(field);
        set(&obj, key, &value)?;
    }
    Ok(obj)
}

fn array_from<T>(items: &[T], fields: fn(&T) -> Fields) -> Result<Array, JsValue> {
    let out = Array::new();
    for item in items {
        let obj = object_from(fields(item))?;
        out.push(&obj);
    }
    Ok(out)
}

fn swatch_from_js(value: &JsValue) -> Result<PaletteSwatch, JsValue> {
    let get = |key: &str| Reflect::get(value, &JsValue::from_str(key));
    let hex = get("hex")?
        .as_string()
        .ok_or_else(|| JsValue::from_str("Swatch hex must be a string"))?;
    let percentage = get("percentage")?
        .as_f64()
        .ok_or_else(|| JsValue::from_str("Swatch percentage must be a number"))?;
    Ok(PaletteSwatch {
        hex,
        percentage: percentage as f32,
        name: get("name")?.as_string(),
        simple_name: get("simpleName")?.as_string(),
    })
}

fn swatches_from_js(values: &Array) -> Result<Vec<PaletteSwatch>, JsValue> {
    values.iter().map(|v| swatch_from_js(&v)).collect()
}

fn report_to_js(report: &ColorReport) -> Result<Object, JsValue> {
    let obj = Object::new();
    let palette = array_from(&report.palette, swatch_fields)?;
    set(&obj, "palette", &palette)?;
    let confidence = object_from(assessment_fields(&report.confidence))?;
    set(&obj, "confidence", &confidence)?;
    let suggestions = array_from(&report.suggestions, suggestion_fields)?;
    set(&obj, "suggestions", &suggestions)?;
    let auto: JsValue = match &report.auto_backdrop {
        Some(s) => object_from(suggestion_fields(s))?.into(),
        None => JsValue::NULL,
    };
    set(&obj, "autoBackdrop", &auto)?;
    set(&obj, "emoji", &JsValue::from_str(report.emoji))?;
    Ok(obj)
}

/// Decode an image and return its `k` dominant colors, most dominant first.
#[wasm_bindgen(js_name = extractPalette)]
pub fn extract_palette_js(input: Vec<u8>, k: usize) -> Result<Array, JsValue> {
    let palette = crate::extract_palette(&input, k).map_err(js_error)?;
    array_from(&palette, swatch_fields)
}

#[wasm_bindgen(js_name = nameColors)]
pub fn name_colors_js(swatches: Array) -> Result<Array, JsValue> {
    let swatches = swatches_from_js(&swatches)?;
    array_from(&crate::name_colors(&swatches), swatch_fields)
}

#[wasm_bindgen(js_name = assessConfidence)]
pub fn assess_confidence_js(swatches: Array, locale: Option<String>) -> Result<Object, JsValue> {
    let swatches = swatches_from_js(&swatches)?;
    let assessment = crate::assess_confidence(&swatches, locale.as_deref()).map_err(js_error)?;
    object_from(assessment_fields(&assessment))
}

#[wasm_bindgen(js_name = suggestBackdrops)]
pub fn suggest_backdrops_js(base_hex: String) -> Result<Array, JsValue> {
    let suggestions = crate::suggest_backdrops(&base_hex).map_err(js_error)?;
    array_from(&suggestions, suggestion_fields)
}

#[wasm_bindgen(js_name = emojiFor)]
pub fn emoji_for_js(hex: String) -> String {
    crate::emoji_for(&hex).to_string()
}

/// Run the whole pipeline: palette, names, confidence and backdrops.
#[wasm_bindgen(js_name = analyzeImage)]
pub fn analyze_image_js(input: Vec<u8>, k: usize, locale: Option<String>) -> Result<Object, JsValue> {
    let options = AnalysisOptions {
        locale,
        ..AnalysisOptions::with_k(k)
    };
    let report = crate::analyze(&input, &options).map_err(js_error)?;
    report_to_js(&report)
}
