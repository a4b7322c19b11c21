use crate::{Error, Result};
use image::Rgba;
use std::{fmt, str::FromStr};

/// An opaque RGB color, written as `#RRGGBB` (the `#` is optional).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_rgba(self) -> Rgba<u8> {
        Rgba([self.r, self.g, self.b, 255])
    }

    /// Squared Euclidean distance in RGB space, alpha ignored.
    pub fn distance_sq(self, pixel: &Rgba<u8>) -> u32 {
        let dr = self.r.abs_diff(pixel[0]) as u32;
        let dg = self.g.abs_diff(pixel[1]) as u32;
        let db = self.b.abs_diff(pixel[2]) as u32;
        dr * dr + dg * dg + db * db
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 {
            return Err(Error::InvalidColor(format!(
                "`{s}` should have exactly 6 hex digits"
            )));
        }

        let mut rgb = [0u8; 3];
        hex::decode_to_slice(digits, &mut rgb)
            .map_err(|e| Error::InvalidColor(format!("`{s}`: {e}")))?;

        Ok(Self::new(rgb[0], rgb[1], rgb[2]))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Largest color distance still classified as background, in [0, 255].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Tolerance(u8);

impl Tolerance {
    pub const fn new(value: u8) -> Self {
        Self(value)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Tolerance {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        u8::try_from(value).map(Self).map_err(|_| {
            Error::InvalidParameter(format!("tolerance must be between 0 and 255, got {value}"))
        })
    }
}

/// Border thickness in pixels, in [1, 100].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderWidth(u32);

impl BorderWidth {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 100;

    pub fn value(self) -> u32 {
        self.0
    }
}

impl Default for BorderWidth {
    fn default() -> Self {
        Self(2)
    }
}

impl TryFrom<i64> for BorderWidth {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&value) {
            Ok(Self(value as u32))
        } else {
            Err(Error::InvalidParameter(format!(
                "border width must be between {} and {} pixels, got {value}",
                Self::MIN,
                Self::MAX
            )))
        }
    }
}
