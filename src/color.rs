//! Hit-test colors.
//!
//! Every live packet is drawn a second time onto an off-screen canvas in its own
//! solid `rgb(r,g,b)` color. A click reads the pixel under the pointer from that
//! buffer and maps it back to the packet, so the string form here must match
//! what the canvas is fed byte for byte.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, UtilError};
use crate::random::RandomSource;

/// Upper bound on redraws in [`hash_color`] before giving up.
pub const DEFAULT_MAX_COLOR_ATTEMPTS: usize = 100_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Each channel is `round(u * 255)`, so 0 and 255 come up half as often as
    /// the inner values.
    pub fn random<R: RandomSource + ?Sized>(rng: &mut R) -> Self {
        let mut channel = || (rng.next_unit() * 255.0).round() as u8;
        let r = channel();
        let g = channel();
        let b = channel();
        Self { r, g, b }
    }

    /// First three bytes of an RGBA pixel, as returned by `getImageData`.
    pub fn from_rgba(pixel: &[u8]) -> Option<Self> {
        match pixel {
            [r, g, b, ..] => Some(Self::new(*r, *g, *b)),
            _ => None,
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseRgbError(String);

impl fmt::Display for ParseRgbError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "not an rgb(r,g,b) color: '{}'", self.0)
    }
}

impl std::error::Error for ParseRgbError {}

impl FromStr for Rgb {
    type Err = ParseRgbError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let err = || ParseRgbError(s.to_string());
        let body = s
            .strip_prefix("rgb(")
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(err)?;
        let mut parts = body.split(',');
        let mut channel = || -> std::result::Result<u8, ParseRgbError> {
            let part = parts.next().ok_or_else(err)?;
            if part.is_empty() || part.len() > 3 || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(err());
            }
            // Only the canonical spelling maps back to a stored hit color.
            if part.len() > 1 && part.starts_with('0') {
                return Err(err());
            }
            part.parse().map_err(|_| err())
        };
        let rgb = Rgb::new(channel()?, channel()?, channel()?);
        if parts.next().is_some() {
            return Err(err());
        }
        Ok(rgb)
    }
}

/// A pseudo-random opaque color string, `rgb(r,g,b)` with no spaces.
pub fn random_color<R: RandomSource + ?Sized>(rng: &mut R) -> String {
    Rgb::random(rng).to_string()
}

/// Membership test over colors already handed out.
pub trait ColorSet {
    fn contains_color(&self, color: &str) -> bool;
}

impl ColorSet for HashSet<String> {
    fn contains_color(&self, color: &str) -> bool {
        self.contains(color)
    }
}

impl ColorSet for BTreeSet<String> {
    fn contains_color(&self, color: &str) -> bool {
        self.contains(color)
    }
}

impl ColorSet for [String] {
    fn contains_color(&self, color: &str) -> bool {
        self.iter().any(|c| c == color)
    }
}

impl ColorSet for Vec<String> {
    fn contains_color(&self, color: &str) -> bool {
        self.as_slice().contains_color(color)
    }
}

/// Draws [`random_color`] until the result is not in `existing`.
///
/// Returns [`UtilError::ColorSpaceExhausted`] after `max_attempts` draws that
/// all collided.
pub fn hash_color<R, S>(rng: &mut R, existing: &S, max_attempts: usize) -> Result<String>
where
    R: RandomSource + ?Sized,
    S: ColorSet + ?Sized,
{
    for _ in 0..max_attempts {
        let color = random_color(rng);
        if !existing.contains_color(&color) {
            return Ok(color);
        }
    }
    log::warn!("hit color allocation gave up after {max_attempts} attempts");
    Err(UtilError::ColorSpaceExhausted { attempts: max_attempts })
}
