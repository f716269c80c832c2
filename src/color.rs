//! Color formatting helpers shared by the picker and the header display.

use egui::Color32;

/// Format one RGBA pixel as a lowercase `#rrggbb` string.
///
/// The alpha channel is deliberately ignored — a picked color is always
/// reported opaque, so a fully transparent pixel formats as `#000000`.
pub fn color_from_pixel_data(pixel: [u8; 4]) -> String {
    let rgb = ((pixel[0] as u32) << 16) | ((pixel[1] as u32) << 8) | pixel[2] as u32;
    format!("#{:06x}", rgb)
}

/// Parse a `#rrggbb` or `#rgb` hex string into an opaque [`Color32`].
pub fn parse_hex_color(hex: &str) -> Option<Color32> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    match hex.len() {
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color32::from_rgb(r, g, b))
        }
        3 => {
            // Shorthand: each digit doubles, so "#fff" == "#ffffff".
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            Some(Color32::from_rgb(r * 17, g * 17, b * 17))
        }
        _ => None,
    }
}

/// Perceived luminance of an RGB color, normalized to `0.0..=1.0`.
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
}

/// Text color that stays legible on top of `background` (a hex string).
///
/// Luminance strictly above 0.5 gets dark text; 0.5 exactly, anything
/// darker, and unparsable backgrounds get light text.
pub fn contrast_text_color(background: &str) -> Color32 {
    match parse_hex_color(background) {
        Some(c) if luminance(c.r(), c.g(), c.b()) > 0.5 => Color32::BLACK,
        _ => Color32::WHITE,
    }
}
