mod colour;
mod frame_buffer;
mod mapper;
mod self_test;
mod topology;

pub use self::colour::{Colour, ColourOrder, PixelFormat};
pub use self::frame_buffer::FrameBuffer;
pub use self::mapper::StripMapper;
pub use self::self_test::{SelfTest, SelfTestConfig, SelfTestSummary};
pub use self::topology::{PixelLocation, StripTopology};
