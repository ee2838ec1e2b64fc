use std::collections::HashMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: category → Color32
// ---------------------------------------------------------------------------

/// Maps the distinct values of a categorical column (platform, genre) to
/// stable colours, so a platform keeps its colour across selections.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: HashMap<String, Color32>,
}

impl ColorMap {
    pub fn new(values: &[String]) -> Self {
        let mapping = values
            .iter()
            .cloned()
            .zip(generate_palette(values.len()))
            .collect();
        ColorMap { mapping }
    }

    /// Colour for a value; grey for anything unknown.
    pub fn color_for(&self, value: &str) -> Color32 {
        self.mapping.get(value).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colours_are_distinct() {
        let colours = generate_palette(6);
        assert_eq!(colours.len(), 6);
        for (i, a) in colours.iter().enumerate() {
            for b in &colours[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_value_is_grey() {
        let map = ColorMap::new(&["PC".to_string(), "PS4".to_string()]);
        assert_ne!(map.color_for("PC"), map.color_for("PS4"));
        assert_eq!(map.color_for("Dreamcast"), Color32::GRAY);
    }
}
