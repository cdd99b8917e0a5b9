mod driver;
mod preview_driver;
mod recording_driver;

pub use self::driver::{NullDriver, OutputDriver};
pub use self::preview_driver::PreviewDriver;
pub use self::recording_driver::RecordingDriver;
