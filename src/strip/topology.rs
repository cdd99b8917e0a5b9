use super::frame_buffer::FrameBuffer;
use crate::error::ConfigError;

/// Position of a logical pixel on the physical strips.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PixelLocation {
    /// Index of the strip in wiring order.
    pub strip: usize,
    /// Pixel offset within that strip.
    pub local: usize,
}

/// Ordered strip lengths sharing one output bus.
///
/// Each strip owns a reserved span of `stride` pixels in the frame buffer;
/// strip `i` starts at pixel `i * stride` regardless of the lengths before it.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct StripTopology {
    lengths: Vec<usize>,
    stride: usize,
}

impl StripTopology {
    /// Creates a topology from strip lengths.
    ///
    /// `stride` defaults to the longest strip.
    ///
    /// # Errors
    ///
    /// Returns an error when there are no strips, a strip is empty, a strip is
    /// longer than the stride, or the reserved spans exceed
    /// [`FrameBuffer::MAX_PIXELS`].
    ///
    /// ```
    /// use artstrip::StripTopology;
    ///
    /// let topology = StripTopology::new(vec![5, 3, 4], None)?;
    /// assert_eq!(5, topology.stride());
    /// assert_eq!(12, topology.pixel_count());
    /// # Ok::<(), artstrip::ConfigError>(())
    /// ```
    pub fn new(lengths: Vec<usize>, stride: Option<usize>) -> Result<Self, ConfigError> {
        let Some(longest) = lengths.iter().copied().max() else {
            return Err(ConfigError::NoStrips);
        };
        if let Some(strip) = lengths.iter().position(|length| *length == 0) {
            return Err(ConfigError::EmptyStrip { strip });
        }
        let stride = stride.unwrap_or(longest);
        if longest > stride {
            return Err(ConfigError::StripExceedsStride {
                length: longest,
                stride,
            });
        }
        let max = FrameBuffer::MAX_PIXELS;
        if lengths
            .len()
            .checked_mul(stride)
            .is_none_or(|reserved| reserved > max)
        {
            return Err(ConfigError::TopologyTooLarge {
                strips: lengths.len(),
                stride,
                max,
            });
        }

        Ok(Self { lengths, stride })
    }

    /// Strip lengths in wiring order.
    #[must_use]
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Reserved pixels per strip.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Number of strips.
    #[must_use]
    pub fn strip_count(&self) -> usize {
        self.lengths.len()
    }

    /// Configured pixels across all strips; never more than
    /// [`Self::reserved_pixels`].
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.lengths.iter().sum()
    }

    /// Pixels reserved in the frame buffer, including unused stride tails.
    #[must_use]
    pub fn reserved_pixels(&self) -> usize {
        self.lengths.len() * self.stride
    }

    /// Finds the strip holding a global logical pixel index.
    ///
    /// ```
    /// use artstrip::{PixelLocation, StripTopology};
    ///
    /// let topology = StripTopology::new(vec![5, 3, 4], None)?;
    /// assert_eq!(Some(PixelLocation { strip: 1, local: 1 }), topology.locate(6));
    /// assert_eq!(None, topology.locate(12));
    /// # Ok::<(), artstrip::ConfigError>(())
    /// ```
    #[must_use]
    pub fn locate(&self, index: usize) -> Option<PixelLocation> {
        let mut remaining = index;
        for (strip, length) in self.lengths.iter().enumerate() {
            if remaining < *length {
                return Some(PixelLocation {
                    strip,
                    local: remaining,
                });
            }
            remaining -= length;
        }
        None
    }

    /// Frame-buffer pixel index for a strip-relative position.
    #[must_use]
    pub fn buffer_pixel(&self, location: PixelLocation) -> Option<usize> {
        let length = *self.lengths.get(location.strip)?;
        (location.local < length).then_some(location.strip * self.stride + location.local)
    }
}
