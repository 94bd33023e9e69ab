use dispenser_traits::{BoxError, Color, Feedback};
use rppal::spi::{Bus, Mode, SlaveSelect, Spi};

use super::Buzzer;
use crate::error::Result;
use crate::ws2812::{SPI_CLOCK_HZ, encode_frame};

/// WS2812 chain on SPI0 MOSI (BCM 10).
pub struct Ws2812Spi {
    spi: Spi,
    len: usize,
}

impl Ws2812Spi {
    pub fn new(len: usize) -> Result<Self> {
        let spi = Spi::new(Bus::Spi0, SlaveSelect::Ss0, SPI_CLOCK_HZ, Mode::Mode0)?;
        Ok(Self { spi, len })
    }

    pub fn fill(&mut self, rgb: (u8, u8, u8), brightness_pct: u8) -> Result<()> {
        let frame = encode_frame(&vec![rgb; self.len], brightness_pct);
        self.spi.write(&frame)?;
        Ok(())
    }
}

/// Strip plus buzzer behind the `Feedback` trait.
pub struct StripFeedback {
    strip: Ws2812Spi,
    buzzer: Buzzer,
    brightness_pct: u8,
    color: Color,
}

impl StripFeedback {
    pub fn new(strip: Ws2812Spi, buzzer: Buzzer) -> Self {
        Self {
            strip,
            buzzer,
            brightness_pct: 100,
            color: Color::Off,
        }
    }
}

impl Feedback for StripFeedback {
    fn show_all(&mut self, color: Color) -> std::result::Result<(), BoxError> {
        self.color = color;
        self.strip.fill(color.rgb(), self.brightness_pct)?;
        Ok(())
    }

    fn set_brightness(&mut self, pct: u8) -> std::result::Result<(), BoxError> {
        self.brightness_pct = pct.min(100);
        // repaint so the new level is visible immediately
        self.strip.fill(self.color.rgb(), self.brightness_pct)?;
        Ok(())
    }

    fn alert(&mut self) -> std::result::Result<(), BoxError> {
        self.buzzer.beep_pattern()?;
        Ok(())
    }
}
