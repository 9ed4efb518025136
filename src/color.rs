//! Linear RGBA color storage and its theme-file string format
//!
//! Theme files store colors as `(R=1.000000,G=0.250000,B=0.000000,A=1.000000)`.
//! Components are linear floats and are treated as opaque data — no
//! color-space conversion happens in this crate.

use std::fmt;

/// RGBA color with linear float components
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl LinearColor {
    /// Fully transparent black, the value of an unconfigured scheme slot
    pub const TRANSPARENT: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    /// Create a new color from RGBA components
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque color from RGB components
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Parse from the `(R=..,G=..,B=..,A=..)` theme-file format
    ///
    /// Component order is not significant and `A` may be omitted (defaults
    /// to 1.0). Returns `None` if any of `R`, `G`, `B` is missing or not a
    /// number. Unknown components are ignored.
    pub fn parse(s: &str) -> Option<Self> {
        let inner = s.trim().trim_start_matches('(').trim_end_matches(')');

        let (mut r, mut g, mut b, mut a) = (None, None, None, None);
        for part in inner.split(',') {
            let (key, value) = part.split_once('=')?;
            let value: f32 = value.trim().parse().ok()?;
            match key.trim() {
                "R" => r = Some(value),
                "G" => g = Some(value),
                "B" => b = Some(value),
                "A" => a = Some(value),
                _ => {}
            }
        }

        Some(Self {
            r: r?,
            g: g?,
            b: b?,
            a: a.unwrap_or(1.0),
        })
    }
}

impl fmt::Display for LinearColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(R={:.6},G={:.6},B={:.6},A={:.6})",
            self.r, self.g, self.b, self.a
        )
    }
}
