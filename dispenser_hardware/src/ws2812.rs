//! WS2812 frame encoding for an SPI bus clocked at 2.4 MHz.
//!
//! Each data bit becomes three SPI bits (`110` for one, `100` for zero), so
//! one SPI bit lasts ~417 ns and the pulse widths land inside the WS2812
//! T0H/T1H windows. Pixels are sent in GRB order.

/// SPI clock the encoding assumes.
pub const SPI_CLOCK_HZ: u32 = 2_400_000;

/// Zero bytes appended after the pixel data to latch the frame
/// (84 bytes ≈ 280 us, enough for newer WS2812B revisions).
pub const LATCH_BYTES: usize = 84;

/// Scale one channel by a 0..=100 brightness percentage.
#[inline]
pub fn scale_channel(value: u8, brightness_pct: u8) -> u8 {
    let pct = u16::from(brightness_pct.min(100));
    ((u16::from(value) * pct) / 100) as u8
}

/// Expand one data byte into its 24-bit SPI pattern (3 bytes, MSB first).
#[inline]
pub fn encode_byte(byte: u8) -> [u8; 3] {
    let mut acc: u32 = 0;
    for bit in (0..8).rev() {
        let pattern = if byte & (1 << bit) != 0 { 0b110 } else { 0b100 };
        acc = (acc << 3) | pattern;
    }
    [(acc >> 16) as u8, (acc >> 8) as u8, acc as u8]
}

/// Encode a full frame for `pixels` RGB triples at the given brightness.
pub fn encode_frame(pixels: &[(u8, u8, u8)], brightness_pct: u8) -> Vec<u8> {
    let mut out = Vec::with_capacity(pixels.len() * 9 + LATCH_BYTES);
    for &(r, g, b) in pixels {
        for channel in [g, r, b] {
            out.extend_from_slice(&encode_byte(scale_channel(channel, brightness_pct)));
        }
    }
    out.resize(out.len() + LATCH_BYTES, 0);
    out
}
