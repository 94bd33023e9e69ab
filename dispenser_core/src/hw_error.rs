//! Maps `Box<dyn Error>` from trait boundaries to typed `DispenserError`.
//!
//! The traits in `dispenser_traits` return `Box<dyn Error + Send + Sync>`;
//! this module converts those to our typed error enum, with an optional
//! feature-gated path for `dispenser_hardware::HwError` downcasting.

use crate::error::DispenserError;

/// Map a trait-boundary error to a typed `DispenserError`.
///
/// Known hardware error types are downcast first; anything else falls back
/// to string heuristics.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static)) -> DispenserError {
    #[cfg(feature = "hardware-errors")]
    {
        use dispenser_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::EchoTimeout => DispenserError::SensorTimeout,
                other => DispenserError::Hardware(other.to_string()),
            };
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") {
        DispenserError::SensorTimeout
    } else {
        DispenserError::Hardware(s)
    }
}

/// Sensor failures: an echo timeout stays `SensorTimeout`, anything else
/// becomes `Sensor`.
pub fn map_sensor_error(e: &(dyn std::error::Error + 'static)) -> DispenserError {
    match map_hw_error(e) {
        DispenserError::SensorTimeout => DispenserError::SensorTimeout,
        _ => DispenserError::Sensor(e.to_string()),
    }
}

pub fn map_feedback_error(e: &(dyn std::error::Error + 'static)) -> DispenserError {
    DispenserError::Feedback(e.to_string())
}

pub fn map_input_error(e: &(dyn std::error::Error + 'static)) -> DispenserError {
    DispenserError::Input(e.to_string())
}
