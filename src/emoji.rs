use crate::color::parse_hex;
use crate::naming::SimpleColor;

/// Shown for malformed input and for colors without a closer match.
pub const DEFAULT_EMOJI: &str = "⚪";

/// A representative emoji for `hex`, bucketed by its simple color name.
pub fn emoji_for(hex: &str) -> &'static str {
    let Ok(color) = parse_hex(hex) else {
        return DEFAULT_EMOJI;
    };
    match SimpleColor::of(color) {
        SimpleColor::Red => "🔴",
        SimpleColor::Orange => "🟠",
        SimpleColor::Yellow => "🟡",
        SimpleColor::Green => "🟢",
        SimpleColor::Blue => "🔵",
        SimpleColor::Purple => "🟣",
        SimpleColor::Pink => "🌸",
        SimpleColor::Brown => "🟤",
        SimpleColor::Beige => "🟫",
        SimpleColor::Black => "⚫",
        SimpleColor::White | SimpleColor::Gray => DEFAULT_EMOJI,
    }
}
