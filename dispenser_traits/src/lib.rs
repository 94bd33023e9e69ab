pub mod clock;
pub mod types;

pub use clock::{Clock, MonotonicClock};
pub use types::{Color, Distance, SwitchState};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Distance ranging peripheral used to detect the container.
pub trait RangeSensor {
    /// Take one measurement, blocking until it completes.
    fn read_distance(&mut self) -> Result<Distance, BoxError>;
}

/// The two operator switches, sampled as a bitmask.
pub trait Switches {
    fn poll(&mut self) -> Result<SwitchState, BoxError>;
}

/// Pump or relay controlling the fluid path.
pub trait Pump {
    /// `true` opens the fluid path.
    fn set_flow(&mut self, open: bool) -> Result<(), BoxError>;
}

/// Light strip plus audible alert.
pub trait Feedback {
    fn show_all(&mut self, color: Color) -> Result<(), BoxError>;
    /// Percentage, clamped to 0..=100 by implementations.
    fn set_brightness(&mut self, pct: u8) -> Result<(), BoxError>;
    fn alert(&mut self) -> Result<(), BoxError>;
}

impl<T: RangeSensor + ?Sized> RangeSensor for Box<T> {
    fn read_distance(&mut self) -> Result<Distance, BoxError> {
        (**self).read_distance()
    }
}

impl<T: Switches + ?Sized> Switches for Box<T> {
    fn poll(&mut self) -> Result<SwitchState, BoxError> {
        (**self).poll()
    }
}

impl<T: Pump + ?Sized> Pump for Box<T> {
    fn set_flow(&mut self, open: bool) -> Result<(), BoxError> {
        (**self).set_flow(open)
    }
}

impl<T: Feedback + ?Sized> Feedback for Box<T> {
    fn show_all(&mut self, color: Color) -> Result<(), BoxError> {
        (**self).show_all(color)
    }
    fn set_brightness(&mut self, pct: u8) -> Result<(), BoxError> {
        (**self).set_brightness(pct)
    }
    fn alert(&mut self) -> Result<(), BoxError> {
        (**self).alert()
    }
}
