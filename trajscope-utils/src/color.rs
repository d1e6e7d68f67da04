// Trajscope Feature Colors
//
// New features get bright, well separated colors: the hue walks around the
// color wheel by the golden ratio conjugate at fixed saturation and value.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::{FEATURE_COLOR_SATURATION, FEATURE_COLOR_VALUE};

/// RGB triple, serialized as `[r, g, b]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub [u8; 3]);

impl Rgb {
    pub fn r(&self) -> u8 {
        self.0[0]
    }

    pub fn g(&self) -> u8 {
        self.0[1]
    }

    pub fn b(&self) -> u8 {
        self.0[2]
    }

    /// Convert HSV (all components in `0.0..=1.0`) to RGB.
    pub fn from_hsv(hue: f64, saturation: f64, value: f64) -> Self {
        // rem_euclid can round up to exactly 1.0 for tiny negative hues
        let h = (hue.rem_euclid(1.0) * 6.0) % 6.0;
        let s = saturation.clamp(0.0, 1.0);
        let v = value.clamp(0.0, 1.0);

        let sector = h.floor();
        let f = h - sector;
        let p = v * (1.0 - s);
        let q = v * (1.0 - s * f);
        let t = v * (1.0 - s * (1.0 - f));

        let (r, g, b) = match sector as u8 {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };

        Self([to_channel(r), to_channel(g), to_channel(b)])
    }
}

fn to_channel(component: f64) -> u8 {
    (component * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Produces a new color for every drawn feature
#[derive(Debug, Clone)]
pub struct ColorPicker {
    hue: f64,
    saturation: f64,
    value: f64,
}

impl ColorPicker {
    /// Golden ratio conjugate; successive hues never cluster.
    const HUE_STEP: f64 = 0.618_033_988_749_895;

    /// Start from a random hue
    pub fn new() -> Self {
        Self::with_seed_hue(rand::thread_rng().gen::<f64>())
    }

    /// Start from a fixed hue (for reproducible output)
    pub fn with_seed_hue(hue: f64) -> Self {
        Self {
            hue: hue.rem_euclid(1.0),
            saturation: FEATURE_COLOR_SATURATION,
            value: FEATURE_COLOR_VALUE,
        }
    }

    /// Advance the hue and return the next color
    pub fn next_color(&mut self) -> Rgb {
        self.hue = (self.hue + Self::HUE_STEP) % 1.0;
        Rgb::from_hsv(self.hue, self.saturation, self.value)
    }
}

impl Default for ColorPicker {
    fn default() -> Self {
        Self::new()
    }
}
