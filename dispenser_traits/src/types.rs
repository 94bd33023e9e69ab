//! Plain value types exchanged across the peripheral traits.

use core::fmt;

/// A single ranging result in whole centimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Distance(u16);

impl Distance {
    /// In-band sentinel for "no echo / no measurement".
    pub const NO_ECHO: Distance = Distance(u16::MAX);

    #[inline]
    pub const fn from_cm(cm: u16) -> Self {
        Self(cm)
    }

    #[inline]
    pub const fn cm(self) -> u16 {
        self.0
    }

    /// Convert an HC-SR04 style echo pulse width to centimetres.
    ///
    /// Sound travels ~0.0343 cm/us and the pulse covers the round trip, so
    /// `cm = us / 58`. Pulses too long for `u16` collapse to `NO_ECHO`.
    pub fn from_echo_micros(us: u64) -> Self {
        let cm = us / 58;
        u16::try_from(cm)
            .ok()
            .filter(|v| *v != u16::MAX)
            .map_or(Self::NO_ECHO, Self)
    }

    /// True when the reading could come from a real object: non-zero, not the
    /// sentinel, and not beyond `max_cm`.
    #[inline]
    pub fn is_plausible(self, max_cm: u16) -> bool {
        self.0 != 0 && self != Self::NO_ECHO && self.0 <= max_cm
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::NO_ECHO {
            f.write_str("no echo")
        } else {
            write!(f, "{} cm", self.0)
        }
    }
}

/// Raw switch sample: bit 0 = switch 1, bit 1 = switch 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SwitchState(u8);

impl SwitchState {
    pub const SWITCH_1: u8 = 0b01;
    pub const SWITCH_2: u8 = 0b10;

    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & (Self::SWITCH_1 | Self::SWITCH_2))
    }

    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[inline]
    pub const fn switch_1(self) -> bool {
        self.0 & Self::SWITCH_1 != 0
    }

    #[inline]
    pub const fn switch_2(self) -> bool {
        self.0 & Self::SWITCH_2 != 0
    }

    #[inline]
    pub const fn is_idle(self) -> bool {
        self.0 == 0
    }
}

/// Named strip colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Off,
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Violet,
    White,
}

impl Color {
    /// Full-intensity RGB triple.
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Color::Off => (0, 0, 0),
            Color::Red => (255, 0, 0),
            Color::Orange => (255, 100, 0),
            Color::Yellow => (255, 200, 0),
            Color::Green => (0, 255, 0),
            Color::Cyan => (0, 255, 255),
            Color::Blue => (0, 0, 255),
            Color::Violet => (150, 0, 255),
            Color::White => (255, 255, 255),
        }
    }
}
