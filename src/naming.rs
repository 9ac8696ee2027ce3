use log::warn;
use palette::Srgb;

use crate::color::{hue_degrees, parse_hex, to_hsl, to_lab};
use crate::extract::PaletteSwatch;

/// Label used when nothing better is available.
pub const FALLBACK_NAME: &str = "Color";

/// An entry of the reference table: a display name and its sRGB value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedColor {
    pub name: &'static str,
    pub rgb: [u8; 3],
}

const fn named(name: &'static str, hex: u32) -> NamedColor {
    NamedColor {
        name,
        rgb: [(hex >> 16) as u8, (hex >> 8) as u8, hex as u8],
    }
}

/// Reference colors, biased toward the tones common in product photography.
pub const NAMED_COLORS: &[NamedColor] = &[
    named("Black", 0x000000),
    named("White", 0xFFFFFF),
    named("Off White", 0xFAF9F6),
    named("Ivory", 0xFFFFF0),
    named("Cream", 0xFFFDD0),
    named("Beige", 0xF5F5DC),
    named("Silver", 0xC0C0C0),
    named("Light Gray", 0xD3D3D3),
    named("Gray", 0x808080),
    named("Slate Gray", 0x708090),
    named("Charcoal", 0x36454F),
    named("Red", 0xFF0000),
    named("Crimson", 0xDC143C),
    named("Maroon", 0x800000),
    named("Burgundy", 0x800020),
    named("Tomato", 0xFF6347),
    named("Coral", 0xFF7F50),
    named("Salmon", 0xFA8072),
    named("Terracotta", 0xE2725B),
    named("Rust", 0xB7410E),
    named("Orange", 0xFFA500),
    named("Dark Orange", 0xFF8C00),
    named("Peach", 0xFFE5B4),
    named("Apricot", 0xFBCEB1),
    named("Copper", 0xB87333),
    named("Bronze", 0xCD7F32),
    named("Gold", 0xFFD700),
    named("Mustard", 0xFFDB58),
    named("Yellow", 0xFFFF00),
    named("Lemon", 0xFFF44F),
    named("Khaki", 0xC3B091),
    named("Olive", 0x808000),
    named("Chartreuse", 0x7FFF00),
    named("Lime", 0x32CD32),
    named("Green", 0x008000),
    named("Forest Green", 0x228B22),
    named("Emerald", 0x50C878),
    named("Mint", 0x98FF98),
    named("Sage", 0xB2AC88),
    named("Teal", 0x008080),
    named("Turquoise", 0x40E0D0),
    named("Cyan", 0x00FFFF),
    named("Sky Blue", 0x87CEEB),
    named("Baby Blue", 0x89CFF0),
    named("Steel Blue", 0x4682B4),
    named("Blue", 0x0000FF),
    named("Royal Blue", 0x4169E1),
    named("Cobalt", 0x0047AB),
    named("Navy", 0x000080),
    named("Midnight Blue", 0x191970),
    named("Indigo", 0x4B0082),
    named("Purple", 0x800080),
    named("Plum", 0x8E4585),
    named("Violet", 0xEE82EE),
    named("Lilac", 0xC8A2C8),
    named("Lavender", 0xE6E6FA),
    named("Magenta", 0xFF00FF),
    named("Hot Pink", 0xFF69B4),
    named("Pink", 0xFFC0CB),
    named("Blush", 0xDE5D83),
    named("Rose", 0xFF007F),
    named("Brown", 0x964B00),
    named("Chocolate", 0x7B3F00),
    named("Chestnut", 0x954535),
    named("Caramel", 0xAF6E4D),
    named("Camel", 0xC19A6B),
    named("Tan", 0xD2B48C),
    named("Sand", 0xC2B280),
    named("Taupe", 0x483C32),
];

/// Layperson color buckets used for `simple_name`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimpleColor {
    Black,
    White,
    Gray,
    Red,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Brown,
    Beige,
}

impl SimpleColor {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Black => "Black",
            Self::White => "White",
            Self::Gray => "Gray",
            Self::Red => "Red",
            Self::Orange => "Orange",
            Self::Yellow => "Yellow",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::Purple => "Purple",
            Self::Pink => "Pink",
            Self::Brown => "Brown",
            Self::Beige => "Beige",
        }
    }

    /// Bucket a color by hue, saturation and lightness. Does not consult
    /// the reference table.
    pub fn of(c: Srgb<u8>) -> Self {
        let hsl = to_hsl(c);
        let (h, s, l) = (hue_degrees(&hsl), hsl.saturation, hsl.lightness);

        if l < 0.12 {
            return Self::Black;
        }
        if l > 0.94 {
            return Self::White;
        }
        if s < 0.12 {
            return match l {
                l if l > 0.85 => Self::White,
                l if l < 0.18 => Self::Black,
                _ => Self::Gray,
            };
        }
        if (20.0..65.0).contains(&h) && l > 0.75 && s < 0.6 {
            return Self::Beige;
        }
        if (15.0..50.0).contains(&h) && l < 0.45 {
            return Self::Brown;
        }
        match h {
            h if !(15.0..345.0).contains(&h) => {
                if l > 0.75 { Self::Pink } else { Self::Red }
            }
            h if h < 45.0 => Self::Orange,
            h if h < 70.0 => Self::Yellow,
            h if h < 165.0 => Self::Green,
            h if h < 255.0 => Self::Blue,
            h if h < 320.0 => Self::Purple,
            _ => Self::Pink,
        }
    }
}

/// Nearest-match lookup against a table of named colors.
///
/// Distance is Euclidean in CIELAB. Ties go to the entry listed first.
#[derive(Debug, Clone, Copy)]
pub struct ColorNamer {
    table: &'static [NamedColor],
}

impl Default for ColorNamer {
    fn default() -> Self {
        ColorNamer { table: NAMED_COLORS }
    }
}

impl ColorNamer {
    pub fn with_table(table: &'static [NamedColor]) -> Self {
        ColorNamer { table }
    }

    pub fn name_for(&self, c: Srgb<u8>) -> &'static str {
        let target = to_lab(c);
        let mut best = None;
        let mut best_dist = f32::INFINITY;
        for entry in self.table {
            let [r, g, b] = entry.rgb;
            let lab = to_lab(Srgb::new(r, g, b));
            let dl = lab.l - target.l;
            let da = lab.a - target.a;
            let db = lab.b - target.b;
            let d = dl * dl + da * da + db * db;
            if d < best_dist {
                best_dist = d;
                best = Some(entry.name);
            }
        }
        best.unwrap_or_else(|| {
            warn!("color naming table is empty");
            FALLBACK_NAME
        })
    }

    /// Return a copy of `swatches` with `name` and `simple_name` filled in.
    ///
    /// Names are derived from `hex` alone, so naming twice changes nothing.
    pub fn name_all(&self, swatches: &[PaletteSwatch]) -> Vec<PaletteSwatch> {
        swatches
            .iter()
            .map(|s| {
                let (name, simple) = match parse_hex(&s.hex) {
                    Ok(c) => (self.name_for(c), SimpleColor::of(c).as_str()),
                    Err(e) => {
                        warn!("cannot name swatch: {e}");
                        (FALLBACK_NAME, FALLBACK_NAME)
                    }
                };
                PaletteSwatch {
                    name: Some(name.to_string()),
                    simple_name: Some(simple.to_string()),
                    ..s.clone()
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn name_of(hex: &str) -> &'static str {
        ColorNamer::default().name_for(parse_hex(hex).unwrap())
    }

    fn simple_of(hex: &str) -> SimpleColor {
        SimpleColor::of(parse_hex(hex).unwrap())
    }

    #[test]
    fn exact_table_entries_name_themselves() {
        for entry in NAMED_COLORS {
            let [r, g, b] = entry.rgb;
            assert_eq!(ColorNamer::default().name_for(Srgb::new(r, g, b)), entry.name);
        }
    }

    #[test]
    fn near_colors_pick_closest_entry() {
        assert_eq!(name_of("FE0101"), "Red");
        assert_eq!(name_of("020284"), "Navy");
        assert_eq!(name_of("F4F4DA"), "Beige");
        assert_eq!(name_of("DD163D"), "Crimson");
    }

    #[test]
    fn ties_go_to_first_listed() {
        static TABLE: &[NamedColor] = &[named("First", 0x000000), named("Second", 0x000000)];
        let namer = ColorNamer::with_table(TABLE);
        assert_eq!(namer.name_for(Srgb::new(10, 10, 10)), "First");
    }

    #[test]
    fn empty_table_falls_back() {
        let namer = ColorNamer::with_table(&[]);
        assert_eq!(namer.name_for(Srgb::new(1, 2, 3)), FALLBACK_NAME);
    }

    #[test]
    fn simple_names_cover_common_buckets() {
        assert_eq!(simple_of("FF0000"), SimpleColor::Red);
        assert_eq!(simple_of("000080"), SimpleColor::Blue);
        assert_eq!(simple_of("008000"), SimpleColor::Green);
        assert_eq!(simple_of("FFA500"), SimpleColor::Orange);
        assert_eq!(simple_of("FFFF00"), SimpleColor::Yellow);
        assert_eq!(simple_of("800080"), SimpleColor::Purple);
        assert_eq!(simple_of("FFC0CB"), SimpleColor::Pink);
        assert_eq!(simple_of("7B3F00"), SimpleColor::Brown);
        assert_eq!(simple_of("F5F5DC"), SimpleColor::Beige);
        assert_eq!(simple_of("FF00FF"), SimpleColor::Purple);
        assert_eq!(simple_of("E8D8B8"), SimpleColor::Beige);
        assert_eq!(simple_of("808080"), SimpleColor::Gray);
        assert_eq!(simple_of("050505"), SimpleColor::Black);
        assert_eq!(simple_of("FFFFFF"), SimpleColor::White);
    }

    #[test]
    fn naming_is_idempotent() {
        let palette = vec![
            PaletteSwatch::new("DC143C", 70.0),
            PaletteSwatch::new("F5F5DC", 20.0),
            PaletteSwatch::new("000080", 9.9),
        ];
        let namer = ColorNamer::default();
        let once = namer.name_all(&palette);
        let twice = namer.name_all(&once);
        assert_eq!(once, twice);
        assert_eq!(once[0].name.as_deref(), Some("Crimson"));
        assert_eq!(once[0].simple_name.as_deref(), Some("Red"));
        assert_eq!(once[2].name.as_deref(), Some("Navy"));
        assert_eq!(once[2].percentage, 9.9);
    }

    #[test]
    fn malformed_hex_gets_fallback_label() {
        let named = ColorNamer::default().name_all(&[PaletteSwatch::new("nope", 100.0)]);
        assert_eq!(named[0].name.as_deref(), Some(FALLBACK_NAME));
        assert_eq!(named[0].simple_name.as_deref(), Some(FALLBACK_NAME));
    }
}
