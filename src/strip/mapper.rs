use tracing::{instrument, trace};

use super::colour::{Colour, PixelFormat};
use super::frame_buffer::FrameBuffer;
use super::topology::{PixelLocation, StripTopology};
use crate::error::ConfigError;

/// Translates flat DMX channel data into the frame-buffer layout of a strip
/// topology.
#[derive(Debug, Clone)]
pub struct StripMapper {
    topology: StripTopology,
    format: PixelFormat,
    buffer: FrameBuffer,
}

impl StripMapper {
    /// Creates a mapper owning a buffer of `capacity_pixels` worst-case pixels.
    ///
    /// # Errors
    ///
    /// Returns an error when the reserved strip spans do not fit the buffer.
    ///
    /// ```
    /// use artstrip::{PixelFormat, StripMapper, StripTopology};
    ///
    /// let topology = StripTopology::new(vec![4], None)?;
    /// let mapper = StripMapper::new(topology, PixelFormat::default(), 4)?;
    /// assert_eq!(16, mapper.buffer().len());
    /// # Ok::<(), artstrip::ConfigError>(())
    /// ```
    pub fn new(
        topology: StripTopology,
        format: PixelFormat,
        capacity_pixels: usize,
    ) -> Result<Self, ConfigError> {
        let buffer = FrameBuffer::with_pixel_capacity(capacity_pixels)?;
        let required = topology.reserved_pixels() * format.bytes_per_pixel();
        if required > buffer.len() {
            return Err(ConfigError::BufferTooSmall {
                required,
                capacity: buffer.len(),
            });
        }

        Ok(Self {
            topology,
            format,
            buffer,
        })
    }

    /// Strip layout.
    #[must_use]
    pub fn topology(&self) -> &StripTopology {
        &self.topology
    }

    /// Pixel format.
    #[must_use]
    pub fn format(&self) -> PixelFormat {
        self.format
    }

    /// Frame buffer handed to the output driver.
    #[must_use]
    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Copies DMX channel data onto the strips and returns the pixels written.
    ///
    /// Strips consume consecutive channel ranges in wiring order. Each strip
    /// is written into its own stride-aligned span; bytes past a strip's
    /// length, and pixels the channel data does not fully cover, keep their
    /// previous value.
    #[instrument(skip(self, channels), level = "trace", fields(channels = channels.len()))]
    pub fn update(&mut self, channels: &[u8]) -> usize {
        let bytes_per_pixel = self.format.bytes_per_pixel();
        let stride_bytes = self.topology.stride() * bytes_per_pixel;
        let mut pixels = channels.chunks_exact(bytes_per_pixel);
        let mut written = 0;
        let buffer = self.buffer.as_bytes_mut();

        'strips: for (strip, length) in self.topology.lengths().iter().enumerate() {
            let strip_start = strip * stride_bytes;
            for local in 0..*length {
                let Some(pixel) = pixels.next() else {
                    break 'strips;
                };
                let start = strip_start + local * bytes_per_pixel;
                self.format
                    .encode_pixel(pixel, &mut buffer[start..start + bytes_per_pixel]);
                written += 1;
            }
        }

        trace!(written, "mapped DMX channels onto strips");
        written
    }

    /// Sets one pixel by global logical index.
    ///
    /// Indices past the last configured pixel are ignored.
    ///
    /// ```
    /// use artstrip::{Colour, PixelFormat, StripMapper, StripTopology};
    ///
    /// let topology = StripTopology::new(vec![5, 3, 4], None)?;
    /// let mut mapper = StripMapper::new(topology, PixelFormat::default(), 15)?;
    /// mapper.set_led(6, Colour::RED);
    /// assert_eq!(&[255, 0, 0], &mapper.buffer().as_bytes()[18..21]);
    /// # Ok::<(), artstrip::ConfigError>(())
    /// ```
    pub fn set_led(&mut self, index: usize, colour: Colour) {
        if let Some(location) = self.topology.locate(index) {
            self.set_strip_led(location, colour);
        }
    }

    /// Sets one pixel by strip-relative position; out-of-range positions are
    /// ignored.
    pub fn set_strip_led(&mut self, location: PixelLocation, colour: Colour) {
        let Some(pixel) = self.topology.buffer_pixel(location) else {
            return;
        };
        let bytes_per_pixel = self.format.bytes_per_pixel();
        let start = pixel * bytes_per_pixel;
        self.format.encode_pixel(
            &colour.channels(),
            &mut self.buffer.as_bytes_mut()[start..start + bytes_per_pixel],
        );
    }

    /// Wire bytes of one logical pixel.
    #[must_use]
    pub fn pixel(&self, index: usize) -> Option<&[u8]> {
        let pixel = self.topology.buffer_pixel(self.topology.locate(index)?)?;
        let bytes_per_pixel = self.format.bytes_per_pixel();
        let start = pixel * bytes_per_pixel;
        self.buffer.as_bytes().get(start..start + bytes_per_pixel)
    }

    /// Wire bytes of one strip's configured pixels.
    #[must_use]
    pub fn strip_bytes(&self, strip: usize) -> Option<&[u8]> {
        let length = *self.topology.lengths().get(strip)?;
        let bytes_per_pixel = self.format.bytes_per_pixel();
        let start = strip * self.topology.stride() * bytes_per_pixel;
        self.buffer
            .as_bytes()
            .get(start..start + length * bytes_per_pixel)
    }

    /// Zeroes the whole buffer.
    pub fn reset(&mut self) {
        self.buffer.reset();
    }

    /// Sets every buffer byte to `value`.
    pub fn fill(&mut self, value: u8) {
        self.buffer.fill(value);
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::strip::colour::ColourOrder;

    fn mapper(lengths: Vec<usize>, stride: Option<usize>, format: PixelFormat) -> StripMapper {
        let topology = StripTopology::new(lengths, stride).expect("topology should be valid");
        StripMapper::new(topology, format, 64).expect("mapper should fit")
    }

    #[test]
    fn update_copies_each_strip_into_its_stride_span() {
        let mut mapper = mapper(vec![2, 1], Some(3), PixelFormat::default());
        mapper.fill(0xEE);

        let written = mapper.update(&[1, 2, 3, 4, 5, 6, 7, 8, 9]);

        assert_eq!(3, written);
        assert_eq!(
            &[1, 2, 3, 4, 5, 6, 0xEE, 0xEE, 0xEE, 7, 8, 9, 0xEE],
            &mapper.buffer().as_bytes()[..13]
        );
    }

    #[test]
    fn update_reorders_rgb_components() {
        let mut mapper = mapper(vec![2], None, PixelFormat::Rgb(ColourOrder::Grb));

        mapper.update(&[10, 20, 30, 40, 50, 60]);

        assert_eq!(Some(&[20, 10, 30, 50, 40, 60][..]), mapper.strip_bytes(0));
    }

    #[test]
    fn update_applies_rgbw_swap_once() {
        let mut mapper = mapper(vec![2], None, PixelFormat::Rgbw);
        let channels = [1, 2, 3, 4, 5, 6, 7, 8];

        mapper.update(&channels);
        let first = mapper.buffer().clone();
        mapper.update(&channels);

        assert_eq!(Some(&[2, 1, 3, 4, 6, 5, 7, 8][..]), mapper.strip_bytes(0));
        assert_eq!(&first, mapper.buffer());
    }

    #[test]
    fn update_leaves_uncovered_pixels_alone() {
        let mut mapper = mapper(vec![3], None, PixelFormat::default());
        mapper.fill(9);

        let written = mapper.update(&[1, 1, 1, 2, 2]);

        assert_eq!(1, written);
        assert_eq!(Some(&[1, 1, 1, 9, 9, 9, 9, 9, 9][..]), mapper.strip_bytes(0));
    }

    #[test]
    fn set_led_targets_strip_found_by_running_subtraction() {
        let mut mapper = mapper(vec![5, 3, 4], None, PixelFormat::default());

        mapper.set_led(6, Colour::BLUE);

        assert_eq!(Some(&[0, 0, 0, 0, 0, 255, 0, 0, 0][..]), mapper.strip_bytes(1));
        assert!(mapper.strip_bytes(0).is_some_and(|bytes| bytes.iter().all(|b| *b == 0)));
        assert!(mapper.strip_bytes(2).is_some_and(|bytes| bytes.iter().all(|b| *b == 0)));
    }

    #[test]
    fn set_led_out_of_range_is_silent() {
        let mut mapper = mapper(vec![2], Some(4), PixelFormat::default());
        let before = mapper.buffer().clone();

        mapper.set_led(2, Colour::RED);
        mapper.set_strip_led(PixelLocation { strip: 0, local: 3 }, Colour::RED);
        mapper.set_strip_led(PixelLocation { strip: 5, local: 0 }, Colour::RED);

        assert_eq!(&before, mapper.buffer());
    }

    #[test]
    fn set_led_keeps_white_for_rgbw() {
        let mut mapper = mapper(vec![1], None, PixelFormat::Rgbw);

        mapper.set_led(0, Colour::rgbw(1, 2, 3, 4));

        assert_eq!(Some(&[2, 1, 3, 4][..]), mapper.pixel(0));
    }

    #[test]
    fn rejects_topology_larger_than_buffer() {
        let topology = StripTopology::new(vec![10, 10], None).expect("topology should be valid");

        let result = StripMapper::new(topology, PixelFormat::Rgbw, 19);

        assert_matches!(
            result,
            Err(ConfigError::BufferTooSmall {
                required: 80,
                capacity: 76
            })
        );
    }
}
