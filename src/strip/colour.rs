use std::str::FromStr;

use serde::Deserialize;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::ColourParseError;

/// One pixel colour in DMX channel order.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct Colour {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// White channel, ignored by RGB strips.
    pub w: u8,
}

impl Colour {
    pub const BLACK: Self = Self::rgbw(0, 0, 0, 0);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const GREEN: Self = Self::rgb(0, 255, 0);
    pub const BLUE: Self = Self::rgb(0, 0, 255);
    pub const WHITE: Self = Self::rgbw(0, 0, 0, 255);

    /// Creates a colour with the white channel off.
    ///
    /// ```
    /// use artstrip::Colour;
    ///
    /// let colour = Colour::rgb(255, 127, 0);
    /// assert_eq!(0, colour.w);
    /// ```
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, w: 0 }
    }

    /// Creates a colour including the white channel.
    #[must_use]
    pub const fn rgbw(r: u8, g: u8, b: u8, w: u8) -> Self {
        Self { r, g, b, w }
    }

    /// Channel bytes as a DMX controller would send them.
    #[must_use]
    pub const fn channels(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.w]
    }
}

impl FromStr for Colour {
    type Err = ColourParseError;

    /// Parses `RRGGBB` or `RRGGBBWW`, with an optional leading `#`.
    ///
    /// ```
    /// use artstrip::Colour;
    ///
    /// assert_eq!(Ok(Colour::rgbw(255, 0, 16, 32)), "#FF001020".parse());
    /// ```
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let digits = value.strip_prefix('#').unwrap_or(value);
        let bytes = hex::decode(digits).map_err(|source| ColourParseError::Hex {
            value: value.to_string(),
            source,
        })?;
        match bytes.as_slice() {
            [r, g, b] => Ok(Self::rgb(*r, *g, *b)),
            [r, g, b, w] => Ok(Self::rgbw(*r, *g, *b, *w)),
            _ => Err(ColourParseError::Length {
                value: value.to_string(),
            }),
        }
    }
}

/// Component order an RGB strip expects on its data line.
#[derive(
    Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Display, EnumIter, EnumString, Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum ColourOrder {
    #[default]
    Rgb,
    Rbg,
    Grb,
    Gbr,
    Brg,
    Bgr,
}

impl ColourOrder {
    /// For each output byte, the index of the DMX component it carries.
    ///
    /// ```
    /// use artstrip::ColourOrder;
    ///
    /// assert_eq!([1, 0, 2], ColourOrder::Grb.source_indices());
    /// ```
    #[must_use]
    pub const fn source_indices(self) -> [usize; 3] {
        match self {
            Self::Rgb => [0, 1, 2],
            Self::Rbg => [0, 2, 1],
            Self::Grb => [1, 0, 2],
            Self::Gbr => [1, 2, 0],
            Self::Brg => [2, 0, 1],
            Self::Bgr => [2, 1, 0],
        }
    }
}

/// Bytes per pixel and their order in the frame buffer.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub enum PixelFormat {
    /// Three bytes per pixel, reordered to the strip's colour order.
    Rgb(ColourOrder),
    /// Four bytes per pixel. DMX sends R, G, B, W; the strip consumes
    /// G, R, B, W, so the first two components of every pixel are swapped.
    Rgbw,
}

impl PixelFormat {
    /// Largest pixel size across formats; frame buffers are sized for it.
    pub const MAX_BYTES_PER_PIXEL: usize = 4;

    /// Bytes occupied by one pixel.
    #[must_use]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgb(_) => 3,
            Self::Rgbw => 4,
        }
    }

    /// Returns whether pixels carry a white channel.
    #[must_use]
    pub const fn has_white(self) -> bool {
        matches!(self, Self::Rgbw)
    }

    /// Writes one pixel from DMX-ordered `channels` into `out` in wire order.
    ///
    /// Both slices must hold at least [`Self::bytes_per_pixel`] bytes.
    pub(crate) fn encode_pixel(self, channels: &[u8], out: &mut [u8]) {
        match self {
            Self::Rgb(order) => {
                for (slot, source) in order.source_indices().into_iter().enumerate() {
                    out[slot] = channels[source];
                }
            }
            Self::Rgbw => {
                out[0] = channels[1];
                out[1] = channels[0];
                out[2] = channels[2];
                out[3] = channels[3];
            }
        }
    }

    /// Reads one wire-order pixel back into a colour.
    pub(crate) fn decode_pixel(self, wire: &[u8]) -> Colour {
        match self {
            Self::Rgb(order) => {
                let mut channels = [0_u8; 3];
                for (slot, source) in order.source_indices().into_iter().enumerate() {
                    channels[source] = wire[slot];
                }
                Colour::rgb(channels[0], channels[1], channels[2])
            }
            Self::Rgbw => Colour::rgbw(wire[1], wire[0], wire[2], wire[3]),
        }
    }
}

impl Default for PixelFormat {
    fn default() -> Self {
        Self::Rgb(ColourOrder::default())
    }
}

impl std::fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rgb(order) => write!(f, "{order}"),
            Self::Rgbw => write!(f, "rgbw"),
        }
    }
}
