use crate::error::OutputError;
use crate::strip::FrameBuffer;

/// LED output hardware fed from the frame buffer.
///
/// `redisplay` blocks until the frame has been shifted out; the caller does
/// not touch the buffer again until it returns.
pub trait OutputDriver: Send {
    /// One-time hardware initialisation.
    ///
    /// # Errors
    ///
    /// Returns an error when the hardware cannot be brought up.
    fn begin(&mut self) -> Result<(), OutputError>;

    /// Transmits `frame` to the strips.
    ///
    /// # Errors
    ///
    /// Returns an error when the frame could not be shown.
    fn redisplay(&mut self, frame: &FrameBuffer) -> Result<(), OutputError>;
}

/// Driver that discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullDriver;

impl OutputDriver for NullDriver {
    fn begin(&mut self) -> Result<(), OutputError> {
        Ok(())
    }

    fn redisplay(&mut self, _frame: &FrameBuffer) -> Result<(), OutputError> {
        Ok(())
    }
}
