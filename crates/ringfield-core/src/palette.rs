use crate::error::{FieldError, Result};
use rand::Rng;

/// Linear RGB colour with channels in [0, 1]. `Pod`, so it casts straight to
/// `[f32; 3]` for upload.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Default, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Pure blue, `#0000ff`.
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0);

    /// Parse a `#rrggbb` string.
    pub fn from_hex(hex: &str) -> Result<Self> {
        let digits = hex
            .strip_prefix('#')
            .filter(|d| d.len() == 6 && d.bytes().all(|b| b.is_ascii_hexdigit()))
            .ok_or_else(|| FieldError::InvalidColor(hex.to_string()))?;
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|_| FieldError::InvalidColor(hex.to_string()))
        };
        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Light or dark page theme.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_is_dark(is_dark: bool) -> Self {
        if is_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }
}

/// Colours used by the ring field.
///
/// `base` is sampled per particle at creation. `light` and `dark` replace
/// every particle's colour wholesale when the page theme flips.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Palette {
    pub base: [Rgb; 2],
    pub light: Rgb,
    pub dark: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            base: [Rgb::BLUE, Rgb::BLUE],
            light: Rgb::BLUE,
            dark: Rgb::BLUE,
        }
    }
}

impl Palette {
    /// Coin-flip between the two base colours.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Rgb {
        if rng.gen::<f32>() > 0.5 {
            self.base[0]
        } else {
            self.base[1]
        }
    }

    pub fn for_theme(&self, theme: Theme) -> Rgb {
        match theme {
            Theme::Light => self.light,
            Theme::Dark => self.dark,
        }
    }
}
