use std::io;

use owo_colors::OwoColorize;

use crate::error::OutputError;
use crate::strip::{Colour, FrameBuffer, PixelFormat, StripTopology};

use super::driver::OutputDriver;

/// Renders every frame to a terminal, one line per strip.
///
/// With colour enabled each pixel is drawn as a truecolour block; otherwise
/// pixels are printed as hexadecimal triplets (quads for RGBW).
pub struct PreviewDriver<W> {
    topology: StripTopology,
    format: PixelFormat,
    out: W,
    use_colour: bool,
    started: bool,
}

impl<W> PreviewDriver<W>
where
    W: io::Write + Send,
{
    /// Creates a preview over `out`.
    #[must_use]
    pub fn new(topology: StripTopology, format: PixelFormat, out: W, use_colour: bool) -> Self {
        Self {
            topology,
            format,
            out,
            use_colour,
            started: false,
        }
    }

    /// Consumes the driver and returns its writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn render_strip(&self, frame: &FrameBuffer, strip: usize, length: usize) -> String {
        let bytes_per_pixel = self.format.bytes_per_pixel();
        let start = strip * self.topology.stride() * bytes_per_pixel;
        let bytes = frame
            .as_bytes()
            .get(start..start + length * bytes_per_pixel)
            .unwrap_or_default();

        let pixels: String = bytes
            .chunks_exact(bytes_per_pixel)
            .map(|wire| self.render_pixel(self.format.decode_pixel(wire)))
            .collect();
        format!("{strip:>3} {pixels}")
    }

    fn render_pixel(&self, colour: Colour) -> String {
        if self.use_colour {
            let (r, g, b) = blend_white(colour);
            "██".truecolor(r, g, b).to_string()
        } else if self.format.has_white() {
            format!(
                " {:02X}{:02X}{:02X}{:02X}",
                colour.r, colour.g, colour.b, colour.w
            )
        } else {
            format!(" {:02X}{:02X}{:02X}", colour.r, colour.g, colour.b)
        }
    }
}

impl<W> OutputDriver for PreviewDriver<W>
where
    W: io::Write + Send,
{
    fn begin(&mut self) -> Result<(), OutputError> {
        self.started = true;
        Ok(())
    }

    fn redisplay(&mut self, frame: &FrameBuffer) -> Result<(), OutputError> {
        if !self.started {
            return Err(OutputError::NotStarted);
        }

        let lines: Vec<String> = self
            .topology
            .lengths()
            .iter()
            .enumerate()
            .map(|(strip, length)| self.render_strip(frame, strip, *length))
            .collect();
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W> std::fmt::Debug for PreviewDriver<W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewDriver")
            .field("topology", &self.topology)
            .field("format", &self.format)
            .field("use_colour", &self.use_colour)
            .finish_non_exhaustive()
    }
}

fn blend_white(colour: Colour) -> (u8, u8, u8) {
    (
        colour.r.saturating_add(colour.w),
        colour.g.saturating_add(colour.w),
        colour.b.saturating_add(colour.w),
    )
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::strip::{ColourOrder, StripMapper};

    fn mapper(format: PixelFormat) -> StripMapper {
        let topology = StripTopology::new(vec![2, 1], None).expect("topology should be valid");
        StripMapper::new(topology, format, 4).expect("mapper should fit")
    }

    #[test]
    fn plain_preview_prints_one_line_per_strip() -> Result<(), OutputError> {
        let mut mapper = mapper(PixelFormat::Rgb(ColourOrder::Grb));
        mapper.update(&[255, 0, 0, 0, 0, 255, 1, 2, 3]);
        let mut driver =
            PreviewDriver::new(mapper.topology().clone(), mapper.format(), Vec::new(), false);

        driver.begin()?;
        driver.redisplay(mapper.buffer())?;

        let rendered = String::from_utf8(driver.into_inner()).expect("preview should be UTF-8");
        assert_eq!("  0  FF0000 0000FF\n  1  010203\n\n", rendered);
        Ok(())
    }

    #[test]
    fn rgbw_preview_includes_white() -> Result<(), OutputError> {
        let mut mapper = mapper(PixelFormat::Rgbw);
        mapper.set_led(2, Colour::rgbw(1, 2, 3, 4));
        let mut driver =
            PreviewDriver::new(mapper.topology().clone(), mapper.format(), Vec::new(), false);

        driver.begin()?;
        driver.redisplay(mapper.buffer())?;

        let rendered = String::from_utf8(driver.into_inner()).expect("preview should be UTF-8");
        assert!(rendered.contains("  1  01020304\n"));
        Ok(())
    }

    #[test]
    fn colour_preview_draws_truecolour_blocks() -> Result<(), OutputError> {
        let mut mapper = mapper(PixelFormat::Rgbw);
        mapper.set_led(0, Colour::rgbw(10, 20, 30, 5));
        let mut driver =
            PreviewDriver::new(mapper.topology().clone(), mapper.format(), Vec::new(), true);

        driver.begin()?;
        driver.redisplay(mapper.buffer())?;

        let rendered = String::from_utf8(driver.into_inner()).expect("preview should be UTF-8");
        assert!(rendered.starts_with("  0 \u{1b}[38;2;15;25;35m██"));
        assert_eq!(2, rendered.matches("\u{1b}[38;2;0;0;0m").count());
        Ok(())
    }

    #[test]
    fn redisplay_before_begin_fails() {
        let mapper = mapper(PixelFormat::default());
        let mut driver =
            PreviewDriver::new(mapper.topology().clone(), mapper.format(), Vec::new(), true);

        assert_matches!(
            driver.redisplay(mapper.buffer()),
            Err(OutputError::NotStarted)
        );
    }
}
