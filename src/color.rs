use std::str::FromStr;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::config::GalMorphConfig;
use crate::data::model::GalaxyType;
use crate::error::{GalMorphError, Result};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Srgb<u8>> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            rgb.into_format::<u8>()
        })
        .collect()
}

/// Parse `#rrggbb` strings.
pub fn parse_palette(hex: &[String]) -> Result<Vec<Srgb<u8>>> {
    hex.iter()
        .map(|s| {
            Srgb::<u8>::from_str(s.trim())
                .map_err(|e| GalMorphError::Config(format!("bad palette colour '{s}': {e}")))
        })
        .collect()
}

pub fn to_color32(c: Srgb<u8>) -> Color32 {
    Color32::from_rgb(c.red, c.green, c.blue)
}

// ---------------------------------------------------------------------------
// Bar colours: position → colour, cycled
// ---------------------------------------------------------------------------

/// The bar chart palette. Bars take colours by position, wrapping around
/// when there are more bars than colours.
#[derive(Debug, Clone, PartialEq)]
pub struct TypePalette {
    colors: Vec<Srgb<u8>>,
}

impl TypePalette {
    pub fn new(colors: Vec<Srgb<u8>>) -> Self {
        let colors = if colors.is_empty() {
            generate_palette(GalaxyType::ALL.len())
        } else {
            colors
        };
        TypePalette { colors }
    }

    pub fn from_config(config: &GalMorphConfig) -> Result<Self> {
        Ok(Self::new(parse_palette(&config.palette)?))
    }

    /// Colour of the `index`-th bar.
    pub fn color_at(&self, index: usize) -> Srgb<u8> {
        self.colors[index % self.colors.len()]
    }

    /// Pair each type (in the order given) with its cycled colour.
    pub fn assign<I>(&self, types: I) -> Vec<(GalaxyType, Srgb<u8>)>
    where
        I: IntoIterator<Item = GalaxyType>,
    {
        types
            .into_iter()
            .enumerate()
            .map(|(i, t)| (t, self.color_at(i)))
            .collect()
    }
}

impl Default for TypePalette {
    fn default() -> Self {
        let config = GalMorphConfig::default();
        // The default hex list is known-good; fall back to hues regardless.
        Self::new(parse_palette(&config.palette).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        // Distinct hues give distinct colours.
        for i in 0..p.len() {
            for j in (i + 1)..p.len() {
                assert_ne!(p[i], p[j]);
            }
        }
    }

    #[test]
    fn parses_hex_colours() {
        let parsed = parse_palette(&["#ff0000".into(), "008000".into()]).unwrap();
        assert_eq!(parsed, vec![Srgb::new(255, 0, 0), Srgb::new(0, 128, 0)]);
        assert!(parse_palette(&["#zzzzzz".into()]).is_err());
    }

    #[test]
    fn colours_cycle_by_position() {
        let palette = TypePalette::new(vec![Srgb::new(1, 1, 1), Srgb::new(2, 2, 2)]);
        let assigned = palette.assign(GalaxyType::ALL);
        let colours: Vec<u8> = assigned.iter().map(|(_, c)| c.red).collect();
        assert_eq!(colours, [1, 2, 1, 2]);
        assert_eq!(assigned[2].0, GalaxyType::Irregular);
    }

    #[test]
    fn empty_palette_falls_back_to_hues() {
        let palette = TypePalette::new(Vec::new());
        assert_eq!(palette.color_at(0), generate_palette(4)[0]);
        assert_eq!(palette.color_at(4), palette.color_at(0));
    }

    #[test]
    fn default_palette_starts_red() {
        let palette = TypePalette::default();
        assert_eq!(palette.color_at(0), Srgb::new(255, 0, 0));
        assert_eq!(palette.color_at(3), Srgb::new(128, 0, 128));
    }
}
