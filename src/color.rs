use palette::{Hsl, IntoColor, Lab, Srgb};

use crate::error::{AnalysisError, Result};

/// Parse `RRGGBB`, `#RRGGBB` or the three-digit shorthand `#RGB`.
pub fn parse_hex(input: &str) -> Result<Srgb<u8>> {
    let invalid = || AnalysisError::InvalidColor(input.to_string());

    let hex = input.trim().trim_start_matches('#');
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid());
    }
    let expanded;
    let hex = match hex.len() {
        6 => hex,
        3 => {
            expanded = hex.chars().flat_map(|c| [c, c]).collect::<String>();
            expanded.as_str()
        }
        _ => return Err(invalid()),
    };

    let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| invalid())?;
    let g = u8::from_str_radix(&hex[2..4], 16).map_err(|_| invalid())?;
    let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| invalid())?;
    Ok(Srgb::new(r, g, b))
}

/// Six uppercase hex digits, no leading `#`.
pub fn to_hex(c: Srgb<u8>) -> String {
    format!("{:02X}{:02X}{:02X}", c.red, c.green, c.blue)
}

pub fn to_hsl(c: Srgb<u8>) -> Hsl {
    c.into_format::<f32>().into_color()
}

pub fn from_hsl(hsl: Hsl) -> Srgb<u8> {
    let rgb: Srgb = hsl.into_color();
    rgb.into_format::<u8>()
}

/// Hue in `[0, 360)` degrees.
pub fn hue_degrees(hsl: &Hsl) -> f32 {
    hsl.hue.into_positive_degrees()
}

pub fn to_lab(c: Srgb<u8>) -> Lab {
    c.into_linear::<f32>().into_color()
}

pub fn from_lab(lab: Lab) -> Srgb<u8> {
    let rgb_f32: Srgb<f32> = Srgb::from_linear(lab.into_color());
    rgb_f32.into_format::<u8>()
}

/// Squared Euclidean distance in 8-bit RGB.
#[inline]
pub fn distance_sq(a: Srgb<u8>, b: Srgb<u8>) -> u32 {
    let dr = a.red as i32 - b.red as i32;
    let dg = a.green as i32 - b.green as i32;
    let db = a.blue as i32 - b.blue as i32;
    (dr * dr + dg * dg + db * db) as u32
}
