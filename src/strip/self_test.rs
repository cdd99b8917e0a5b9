use std::time::Duration;

use bon::Builder;
use tokio::time::sleep;
use tracing::{info, instrument};

use super::colour::Colour;
use super::mapper::StripMapper;
use crate::error::OutputError;
use crate::hw::OutputDriver;

const DEFAULT_CHASE_STEP: Duration = Duration::from_millis(50);
const DEFAULT_FLASH_COUNT: usize = 6;
const DEFAULT_FLASH_INTERVAL: Duration = Duration::from_millis(300);
const DEFAULT_FLASH_LEVEL: u8 = 128;

/// Timing and pattern of the wiring self-test.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Builder)]
pub struct SelfTestConfig {
    #[builder(default = true)]
    enabled: bool,
    #[builder(default = DEFAULT_CHASE_STEP)]
    chase_step: Duration,
    #[builder(default = DEFAULT_FLASH_COUNT)]
    flash_count: usize,
    #[builder(default = DEFAULT_FLASH_INTERVAL)]
    flash_interval: Duration,
    #[builder(default = DEFAULT_FLASH_LEVEL)]
    flash_level: u8,
}

impl SelfTestConfig {
    /// A configuration that skips the self-test.
    #[must_use]
    pub fn disabled() -> Self {
        Self::builder().enabled(false).build()
    }

    /// Returns whether the self-test runs.
    #[must_use]
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Delay after each chase frame.
    #[must_use]
    pub fn chase_step(&self) -> Duration {
        self.chase_step
    }

    /// Number of flash frames, alternating on and off.
    #[must_use]
    pub fn flash_count(&self) -> usize {
        self.flash_count
    }

    /// Delay between flash frames.
    #[must_use]
    pub fn flash_interval(&self) -> Duration {
        self.flash_interval
    }

    /// Byte written to every buffer position on "on" flash frames.
    #[must_use]
    pub fn flash_level(&self) -> u8 {
        self.flash_level
    }
}

impl Default for SelfTestConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Frames shown by one self-test run.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct SelfTestSummary {
    /// Frames shown during the single-pixel chase.
    pub chase_frames: usize,
    /// Frames shown during the flash.
    pub flash_frames: usize,
}

/// Visual wiring check run before live data is accepted.
///
/// Walks a single lit pixel in red, green, blue (and white for RGBW strips)
/// across every configured pixel, then flashes the whole buffer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SelfTest {
    config: SelfTestConfig,
}

impl SelfTest {
    /// Creates a self-test with the given timing.
    #[must_use]
    pub fn new(config: SelfTestConfig) -> Self {
        Self { config }
    }

    /// Runs the chase and flash patterns on `driver`.
    ///
    /// # Errors
    ///
    /// Returns an error when the driver fails to display a frame.
    #[instrument(skip_all, level = "info", name = "self_test")]
    pub async fn run(
        &self,
        mapper: &mut StripMapper,
        driver: &mut dyn OutputDriver,
    ) -> Result<SelfTestSummary, OutputError> {
        let mut summary = SelfTestSummary::default();
        if !self.config.enabled() {
            return Ok(summary);
        }

        let mut colours = vec![
            ("red", Colour::RED),
            ("green", Colour::GREEN),
            ("blue", Colour::BLUE),
        ];
        if mapper.format().has_white() {
            colours.push(("white", Colour::WHITE));
        }

        let pixel_count = mapper.topology().pixel_count();
        for (name, colour) in colours {
            info!(colour = name, pixel_count, "running chase");
            for index in 0..pixel_count {
                mapper.reset();
                mapper.set_led(index, colour);
                driver.redisplay(mapper.buffer())?;
                summary.chase_frames += 1;
                sleep(self.config.chase_step()).await;
            }
        }

        info!(flashes = self.config.flash_count(), "running flash");
        for flash in 0..self.config.flash_count() {
            let level = if flash % 2 == 0 {
                self.config.flash_level()
            } else {
                0
            };
            mapper.fill(level);
            driver.redisplay(mapper.buffer())?;
            summary.flash_frames += 1;
            if flash + 1 != self.config.flash_count() {
                sleep(self.config.flash_interval()).await;
            }
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::hw::RecordingDriver;
    use crate::strip::{PixelFormat, StripTopology};

    fn mapper(format: PixelFormat) -> StripMapper {
        let topology = StripTopology::new(vec![2, 1], None).expect("topology should be valid");
        StripMapper::new(topology, format, 4).expect("mapper should fit")
    }

    #[tokio::test(start_paused = true)]
    async fn chase_lights_one_pixel_per_frame() -> anyhow::Result<()> {
        let mut mapper = mapper(PixelFormat::default());
        let mut driver = RecordingDriver::default();
        let config = SelfTestConfig::builder().flash_count(0).build();

        let summary = SelfTest::new(config).run(&mut mapper, &mut driver).await?;

        assert_eq!(9, summary.chase_frames);
        let frames = driver.frames();
        assert_eq!(&[255, 0, 0, 0, 0, 0], &frames[0][..6]);
        assert_eq!(&[0, 0, 0, 255, 0, 0], &frames[1][..6]);
        assert_eq!(&[255, 0, 0], &frames[2][6..9]);
        assert_eq!(&[0, 0, 255], &frames[8][6..9]);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn rgbw_chase_adds_white_pass() -> anyhow::Result<()> {
        let mut mapper = mapper(PixelFormat::Rgbw);
        let mut driver = RecordingDriver::default();
        let config = SelfTestConfig::builder().flash_count(0).build();

        let summary = SelfTest::new(config).run(&mut mapper, &mut driver).await?;

        assert_eq!(12, summary.chase_frames);
        assert_eq!(&[0, 0, 0, 255], &driver.frames()[9][..4]);
        Ok(())
    }

    #[tokio::test(start_paused = true)]
    async fn flash_alternates_level_and_black() -> anyhow::Result<()> {
        let mut mapper = mapper(PixelFormat::default());
        let mut driver = RecordingDriver::default();
        let start = tokio::time::Instant::now();

        let summary = SelfTest::default().run(&mut mapper, &mut driver).await?;

        assert_eq!(6, summary.flash_frames);
        let frames = driver.frames();
        let flashes = &frames[summary.chase_frames..];
        assert!(flashes[0].iter().all(|byte| *byte == 128));
        assert!(flashes[1].iter().all(|byte| *byte == 0));
        assert!(flashes[4].iter().all(|byte| *byte == 128));
        assert_eq!(
            Duration::from_millis(9 * 50 + 5 * 300),
            start.elapsed()
        );
        Ok(())
    }

    #[tokio::test]
    async fn disabled_self_test_shows_nothing() -> anyhow::Result<()> {
        let mut mapper = mapper(PixelFormat::default());
        let mut driver = RecordingDriver::default();

        let summary = SelfTest::new(SelfTestConfig::disabled())
            .run(&mut mapper, &mut driver)
            .await?;

        assert_eq!(SelfTestSummary::default(), summary);
        assert!(driver.frames().is_empty());
        Ok(())
    }
}
