use std::collections::{BTreeMap, BTreeSet};

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

fn hsl_to_color32(hue: f32, saturation: f32, lightness: f32) -> Color32 {
    let hsl = Hsl::new(hue, saturation, lightness);
    let rgb: Srgb = hsl.into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| hsl_to_color32((i as f32 / n as f32) * 360.0, 0.75, 0.55))
        .collect()
}

/// One distinct colour per country, stable for a given country set.
pub fn country_colors(countries: &BTreeSet<String>) -> BTreeMap<String, Color32> {
    countries
        .iter()
        .cloned()
        .zip(generate_palette(countries.len()))
        .collect()
}

// ---------------------------------------------------------------------------
// Continuous scale: numeric value → (colour, marker size)
// ---------------------------------------------------------------------------

/// Hue of the lowest bin (blue); the highest bin is red (0°).
const LOW_HUE: f32 = 240.0;
const MIN_RADIUS: f32 = 1.5;
const MAX_RADIUS: f32 = 7.0;

/// Buckets a numeric column into `bins` equal-width bins, each with its own
/// colour on a blue → red ramp and a growing marker radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueScale {
    pub min: f64,
    pub max: f64,
    pub bins: usize,
}

impl ValueScale {
    /// Scale spanning the finite `values`. `None` when there are none.
    pub fn from_values(values: impl IntoIterator<Item = f64>, bins: usize) -> Option<Self> {
        let (min, max) = values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<(f64, f64)>, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })?;
        Some(ValueScale {
            min,
            max,
            bins: bins.max(1),
        })
    }

    /// Bin index of `value`, clamped to `0..bins`.
    pub fn bin(&self, value: f64) -> usize {
        let span = self.max - self.min;
        if span <= f64::EPSILON {
            return 0;
        }
        let t = ((value - self.min) / span).clamp(0.0, 1.0);
        ((t * self.bins as f64) as usize).min(self.bins - 1)
    }

    fn fraction(&self, bin: usize) -> f32 {
        if self.bins <= 1 {
            return 1.0;
        }
        bin as f32 / (self.bins - 1) as f32
    }

    pub fn color(&self, bin: usize) -> Color32 {
        hsl_to_color32(LOW_HUE * (1.0 - self.fraction(bin)), 0.85, 0.5)
    }

    pub fn radius(&self, bin: usize) -> f32 {
        MIN_RADIUS + (MAX_RADIUS - MIN_RADIUS) * self.fraction(bin)
    }

    /// Lower and upper value covered by `bin`.
    pub fn bin_range(&self, bin: usize) -> (f64, f64) {
        let width = (self.max - self.min) / self.bins as f64;
        let lo = self.min + width * bin as f64;
        (lo, lo + width)
    }
}
