use crate::error::OutputError;
use crate::strip::FrameBuffer;

use super::driver::OutputDriver;

/// Driver that keeps a copy of every displayed frame.
///
/// Used in tests and for dry runs without LED hardware.
#[derive(Debug, Clone, Default)]
pub struct RecordingDriver {
    begun: bool,
    frames: Vec<Vec<u8>>,
}

impl RecordingDriver {
    /// Returns whether `begin` has been called.
    #[must_use]
    pub fn begun(&self) -> bool {
        self.begun
    }

    /// Displayed frames, oldest first.
    #[must_use]
    pub fn frames(&self) -> &[Vec<u8>] {
        &self.frames
    }

    /// Most recently displayed frame.
    #[must_use]
    pub fn last_frame(&self) -> Option<&[u8]> {
        self.frames.last().map(Vec::as_slice)
    }
}

impl OutputDriver for RecordingDriver {
    fn begin(&mut self) -> Result<(), OutputError> {
        self.begun = true;
        Ok(())
    }

    fn redisplay(&mut self, frame: &FrameBuffer) -> Result<(), OutputError> {
        self.frames.push(frame.as_bytes().to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn records_frames_in_order() -> Result<(), OutputError> {
        let mut driver = RecordingDriver::default();
        let mut frame = FrameBuffer::with_pixel_capacity(1).expect("one pixel fits");

        driver.begin()?;
        driver.redisplay(&frame)?;
        frame.fill(7);
        driver.redisplay(&frame)?;

        assert!(driver.begun());
        assert_eq!(2, driver.frames().len());
        assert_eq!(Some(&[7, 7, 7, 7][..]), driver.last_frame());
        Ok(())
    }
}
