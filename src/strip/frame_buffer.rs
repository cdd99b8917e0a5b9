use super::colour::PixelFormat;
use crate::error::ConfigError;

/// Output bytes shared with the LED driver.
///
/// Sized for the widest pixel format so switching between RGB and RGBW never
/// reallocates. Only [`FrameBuffer::reset`] and [`FrameBuffer::fill`] touch
/// bytes outside configured strip positions.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct FrameBuffer {
    bytes: Box<[u8]>,
}

impl FrameBuffer {
    /// Largest buffer, in pixels, a node will allocate.
    pub const MAX_PIXELS: usize = 65_536;

    /// Allocates a zeroed buffer able to hold `pixels` pixels of any format.
    ///
    /// # Errors
    ///
    /// Returns an error when `pixels` exceeds [`Self::MAX_PIXELS`].
    ///
    /// ```
    /// use artstrip::FrameBuffer;
    ///
    /// let buffer = FrameBuffer::with_pixel_capacity(120)?;
    /// assert_eq!(480, buffer.len());
    /// # Ok::<(), artstrip::ConfigError>(())
    /// ```
    pub fn with_pixel_capacity(pixels: usize) -> Result<Self, ConfigError> {
        if pixels > Self::MAX_PIXELS {
            return Err(ConfigError::BufferTooLarge {
                pixels,
                max: Self::MAX_PIXELS,
            });
        }
        Ok(Self {
            bytes: vec![0; pixels * PixelFormat::MAX_BYTES_PER_PIXEL].into_boxed_slice(),
        })
    }

    /// Buffer contents.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub(crate) fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    /// Capacity in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns whether the buffer has no capacity.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Zeroes every byte.
    pub fn reset(&mut self) {
        self.bytes.fill(0);
    }

    /// Sets every byte to `value`.
    pub fn fill(&mut self, value: u8) {
        self.bytes.fill(value);
    }
}
