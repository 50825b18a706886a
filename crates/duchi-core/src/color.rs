//! OKLCH color codec
//!
//! Converts between OKLCH and 8-bit sRGB hex, and between OKLCH values and
//! the CSS `oklch(L C H)` text form used for theme colors.
//!
//! Unrecognized input is reported as `None` rather than an error: callers
//! substitute a default color (see [`DEFAULT_PICKER_COLOR`]) and carry on.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Color used by editors when a stored value cannot be parsed
pub const DEFAULT_PICKER_COLOR: Oklch = Oklch {
    l: 0.5,
    c: 0.15,
    h: 250.0,
};

// OKLab -> non-linear LMS
const OKLAB_TO_LMS: [[f64; 3]; 3] = [
    [1.0, 0.3963377774, 0.2158037573],
    [1.0, -0.1055613458, -0.0638541728],
    [1.0, -0.0894841775, -1.2914855480],
];

// linear LMS -> linear sRGB
const LMS_TO_LINEAR_SRGB: [[f64; 3]; 3] = [
    [4.0767416621, -3.3077115913, 0.2309699292],
    [-1.2684380046, 2.6097574011, -0.3413193965],
    [-0.0041960863, -0.7034186147, 1.7076147010],
];

// linear sRGB -> linear LMS
const LINEAR_SRGB_TO_LMS: [[f64; 3]; 3] = [
    [0.4122214708, 0.5363325363, 0.0514459929],
    [0.2119034982, 0.6806995451, 0.1073969566],
    [0.0883024619, 0.2817188376, 0.6299787005],
];

// non-linear LMS -> OKLab
const LMS_TO_OKLAB: [[f64; 3]; 3] = [
    [0.2104542553, 0.7936177850, -0.0040720468],
    [1.9779984951, -2.4285922050, 0.4505937099],
    [0.0259040371, 0.7827717662, -0.8086757660],
];

// Slack for rounding noise at the gamut boundary (e.g. pure white)
const GAMUT_EPSILON: f64 = 1e-6;

static OKLCH_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"oklch\(\s*([\d.]+)(%?)\s+([\d.]+)\s+([\d.]+)\s*\)")
        .expect("oklch pattern is valid")
});

/// Errors from the `FromStr` implementations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    #[error("not an oklch() color: {0:?}")]
    InvalidOklch(String),

    #[error("not a #rrggbb hex color: {0:?}")]
    InvalidHex(String),
}

/// A color in the OKLCH space.
///
/// `l` is lightness in `[0, 1]`, `c` is chroma (practically below ~0.4) and
/// `h` is hue in degrees, `[0, 360)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Oklch {
    pub l: f64,
    pub c: f64,
    pub h: f64,
}

impl Oklch {
    /// Create a new color
    pub const fn new(l: f64, c: f64, h: f64) -> Self {
        Self { l, c, h }
    }

    /// Linear sRGB channels before gamma encoding and clamping
    pub fn to_linear_srgb(&self) -> [f64; 3] {
        let hue = self.h.to_radians();
        let lab = [self.l, self.c * hue.cos(), self.c * hue.sin()];

        let lms = mul(&OKLAB_TO_LMS, lab).map(|x| x * x * x);
        mul(&LMS_TO_LINEAR_SRGB, lms)
    }

    /// Whether the color is representable in sRGB without clamping
    pub fn is_in_srgb_gamut(&self) -> bool {
        self.to_linear_srgb()
            .iter()
            .all(|&x| (-GAMUT_EPSILON..=1.0 + GAMUT_EPSILON).contains(&x))
    }

    /// Convert to 8-bit sRGB. Out-of-gamut channels are clamped.
    pub fn to_srgb(&self) -> Srgb {
        let [r, g, b] = self.to_linear_srgb().map(|x| to_byte(gamma_encode(x)));
        Srgb::new(r, g, b)
    }

    /// Convert from 8-bit sRGB
    pub fn from_srgb(rgb: Srgb) -> Self {
        let linear = [rgb.r, rgb.g, rgb.b].map(|x| gamma_decode(f64::from(x) / 255.0));
        let lms = mul(&LINEAR_SRGB_TO_LMS, linear).map(f64::cbrt);
        let [l, a, b] = mul(&LMS_TO_OKLAB, lms);

        Self {
            l,
            c: a.hypot(b),
            h: normalize_hue(b.atan2(a).to_degrees()),
        }
    }

    /// Convert to a lowercase `#rrggbb` string
    pub fn to_hex(&self) -> String {
        self.to_srgb().to_hex()
    }

    /// Parse a hex color into OKLCH
    pub fn from_hex(hex: &str) -> Option<Self> {
        Srgb::from_hex(hex).map(Self::from_srgb)
    }
}

impl fmt::Display for Oklch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "oklch({:.3} {:.3} {:.1})", self.l, self.c, self.h)
    }
}

impl FromStr for Oklch {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_oklch(s).ok_or_else(|| ColorParseError::InvalidOklch(s.to_string()))
    }
}

/// An opaque 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Srgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Srgb {
    /// Create a new color
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb`, `rrggbb` or the CSS shorthand `#rgb`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim();
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        match digits.len() {
            6 => Some(Self::new(
                u8::from_str_radix(&digits[0..2], 16).ok()?,
                u8::from_str_radix(&digits[2..4], 16).ok()?,
                u8::from_str_radix(&digits[4..6], 16).ok()?,
            )),
            3 => {
                let nibble = |i: usize| u8::from_str_radix(&digits[i..i + 1], 16).ok();
                Some(Self::new(
                    nibble(0)? * 17,
                    nibble(1)? * 17,
                    nibble(2)? * 17,
                ))
            }
            _ => None,
        }
    }

    /// Format as lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Srgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Srgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s).ok_or_else(|| ColorParseError::InvalidHex(s.to_string()))
    }
}

/// Parse the CSS `oklch(L C H)` form.
///
/// A `%` suffix on the lightness, or a lightness above 1, is read as a
/// percentage. The first `oklch(...)` occurrence in `text` is used.
pub fn parse_oklch(text: &str) -> Option<Oklch> {
    let caps = OKLCH_PATTERN.captures(text)?;

    let mut l: f64 = caps[1].parse().ok()?;
    if !caps[2].is_empty() || l > 1.0 {
        l /= 100.0;
    }

    Some(Oklch {
        l,
        c: caps[3].parse().ok()?,
        h: caps[4].parse().ok()?,
    })
}

/// Render `oklch(L C H)` with 3 decimals for L and C and 1 for H
pub fn format_oklch(color: &Oklch) -> String {
    color.to_string()
}

/// Convert to a lowercase `#rrggbb` string, clamping out-of-gamut colors
pub fn oklch_to_hex(color: &Oklch) -> String {
    color.to_hex()
}

/// Convert a hex color to OKLCH; `None` if `hex` is not a hex color
pub fn hex_to_oklch(hex: &str) -> Option<Oklch> {
    Oklch::from_hex(hex)
}

/// Resolve a theme color value in either accepted text form
pub fn parse_color_value(text: &str) -> Option<Oklch> {
    parse_oklch(text).or_else(|| hex_to_oklch(text))
}

fn mul(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}

fn gamma_encode(x: f64) -> f64 {
    if x >= 0.0031308 {
        1.055 * x.powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * x
    }
}

fn gamma_decode(x: f64) -> f64 {
    if x >= 0.04045 {
        ((x + 0.055) / 1.055).powf(2.4)
    } else {
        x / 12.92
    }
}

fn to_byte(x: f64) -> u8 {
    // NaN saturates to 0
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

fn normalize_hue(h: f64) -> f64 {
    let h = h.rem_euclid(360.0);
    if h >= 360.0 {
        0.0
    } else {
        h
    }
}
