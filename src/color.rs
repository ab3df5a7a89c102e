//! Parsing of editor color strings into RGBA factors in the 0.0–1.0 range.
//!
//! The editor emits Qt-style color strings: `#RGB`, `#RRGGBB`, `#AARRGGBB`
//! (note the leading alpha channel) or a named color.

/// Components used when a color string can't be parsed: opaque black,
/// matching what an invalid `QColor` reports.
pub const FALLBACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Named colors the editor palette offers. RGB values follow the SVG keyword
/// table that Qt uses.
const NAMED: &[(&str, [u8; 4])] = &[
    ("black", [0x00, 0x00, 0x00, 0xff]),
    ("blue", [0x00, 0x00, 0xff, 0xff]),
    ("cyan", [0x00, 0xff, 0xff, 0xff]),
    ("gray", [0x80, 0x80, 0x80, 0xff]),
    ("green", [0x00, 0x80, 0x00, 0xff]),
    ("lime", [0x00, 0xff, 0x00, 0xff]),
    ("magenta", [0xff, 0x00, 0xff, 0xff]),
    ("maroon", [0x80, 0x00, 0x00, 0xff]),
    ("navy", [0x00, 0x00, 0x80, 0xff]),
    ("olive", [0x80, 0x80, 0x00, 0xff]),
    ("orange", [0xff, 0xa5, 0x00, 0xff]),
    ("purple", [0x80, 0x00, 0x80, 0xff]),
    ("red", [0xff, 0x00, 0x00, 0xff]),
    ("silver", [0xc0, 0xc0, 0xc0, 0xff]),
    ("teal", [0x00, 0x80, 0x80, 0xff]),
    ("transparent", [0x00, 0x00, 0x00, 0x00]),
    ("white", [0xff, 0xff, 0xff, 0xff]),
    ("yellow", [0xff, 0xff, 0x00, 0xff]),
];

/// Parse a color string into `[r, g, b, a]` factors.
pub fn parse(text: &str) -> Option<[f32; 4]> {
    if let Some(hex) = text.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = text.to_ascii_lowercase();
    NAMED
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|&(_, rgba)| factors(rgba))
}

fn parse_hex(hex: &str) -> Option<[f32; 4]> {
    match hex.len() {
        // #RGB: each nibble doubled.
        3 => {
            let r = nibble(hex, 0)?;
            let g = nibble(hex, 1)?;
            let b = nibble(hex, 2)?;
            Some(factors([r * 17, g * 17, b * 17, 0xff]))
        }
        6 => {
            let r = byte(hex, 0)?;
            let g = byte(hex, 1)?;
            let b = byte(hex, 2)?;
            Some(factors([r, g, b, 0xff]))
        }
        // Qt orders the 8-digit form alpha first.
        8 => {
            let a = byte(hex, 0)?;
            let r = byte(hex, 1)?;
            let g = byte(hex, 2)?;
            let b = byte(hex, 3)?;
            Some(factors([r, g, b, a]))
        }
        _ => None,
    }
}

fn nibble(hex: &str, i: usize) -> Option<u8> {
    u8::from_str_radix(hex.get(i..i + 1)?, 16).ok()
}

fn byte(hex: &str, i: usize) -> Option<u8> {
    u8::from_str_radix(hex.get(i * 2..i * 2 + 2)?, 16).ok()
}

fn factors([r, g, b, a]: [u8; 4]) -> [f32; 4] {
    [
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        a as f32 / 255.0,
    ]
}
