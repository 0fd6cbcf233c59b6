// color.rs - Plane tint colors

use std::fmt;

use crate::sim::Rng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const GREY: Rgb = Rgb::new(128, 128, 128);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn random(rng: &mut Rng) -> Self {
        Self { r: rng.byte(), g: rng.byte(), b: rng.byte() }
    }

    pub fn scale(self, s: f32) -> Self {
        let f = |c: u8| (c as f32 * s).clamp(0.0, 255.0) as u8;
        Self { r: f(self.r), g: f(self.g), b: f(self.b) }
    }

    pub fn to_rgba(self) -> [u8; 4] {
        [self.r, self.g, self.b, 255]
    }
}

/// CSS / SVG form: `rgb(r,g,b)`
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}
