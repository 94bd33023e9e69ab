//! Human-readable error descriptions, exit codes and JSON error formatting.

use dispenser_core::error::{BuildError, DispenserError};
use dispenser_hardware::error::HwError;

/// Exit code for configuration problems (bad TOML, failed validation).
pub const EXIT_CONFIG: i32 = 2;
/// Exit code for peripherals that could not be opened or answered badly.
pub const EXIT_HARDWARE: i32 = 3;

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingSensor => {
                "What happened: No distance sensor was provided to the controller.\nLikely causes: The HC-SR04 failed to initialize or was not wired into the builder.\nHow to fix: Ensure the sensor is created successfully and passed via with_sensor(...).".to_string()
            }
            BuildError::MissingPump => {
                "What happened: No pump was provided to the controller.\nLikely causes: The relay failed to initialize or was not wired into the builder.\nHow to fix: Ensure the pump is created successfully and passed via with_pump(...).".to_string()
            }
            BuildError::MissingFeedback => {
                "What happened: No light strip / buzzer was provided to the controller.\nLikely causes: The strip failed to initialize or was not wired into the builder.\nHow to fix: Ensure the feedback adapter is passed via with_feedback(...).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML.\nHow to fix: Edit the config file, then rerun. See etc/dispenser.toml for a sample."
            ),
        };
    }

    if let Some(de) = err.downcast_ref::<DispenserError>() {
        return match de {
            DispenserError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: A typo in a key, an unknown section, or an out-of-range value.\nHow to fix: Edit the config file, then rerun. See etc/dispenser.toml for a sample."
            ),
            DispenserError::SensorTimeout => {
                "What happened: The distance sensor did not answer in time.\nLikely causes: HC-SR04 not powered, echo/trigger pins swapped, or the echo divider missing.\nHow to fix: Check [pins] echo/trigger, verify 5V/GND, and consider raising presence.echo_timeout_ms.".to_string()
            }
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    if let Some(hw) = err.downcast_ref::<HwError>() {
        return match hw {
            HwError::Gpio(msg) => format!(
                "What happened: Failed to initialize GPIO ({msg}).\nLikely causes: Incorrect pin numbers, a pin already in use, or insufficient GPIO permissions.\nHow to fix: Fix the [pins] values in the config; add the user to the gpio group."
            ),
            HwError::Spi(msg) => format!(
                "What happened: Failed to open the SPI bus for the light strip ({msg}).\nLikely causes: SPI is disabled or /dev/spidev0.0 is not accessible.\nHow to fix: Enable SPI (dtparam=spi=on in config.txt) and add the user to the spi group."
            ),
            HwError::EchoTimeout => {
                "What happened: The distance sensor did not answer in time.\nLikely causes: HC-SR04 not powered or echo/trigger pins swapped.\nHow to fix: Check [pins] echo/trigger and wiring.".to_string()
            }
            HwError::Io(e) => format!(
                "What happened: I/O error talking to a peripheral ({e}).\nLikely causes: Device node missing or permissions.\nHow to fix: Re-run with --log-level=debug for details."
            ),
        };
    }

    // String-based heuristics for errors that lost their type on the way
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("invalid configuration") || lower.contains("read config") {
        return format!(
            "What happened: Configuration could not be loaded.\nLikely causes: Missing file, TOML syntax error, or out-of-range values.\nHow to fix: Edit the TOML config and try again. Original: {msg}"
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 2 configuration, 3 hardware, 1 anything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if err.downcast_ref::<BuildError>().is_some() {
        return EXIT_CONFIG;
    }
    if let Some(de) = err.downcast_ref::<DispenserError>() {
        return match de {
            DispenserError::Config(_) => EXIT_CONFIG,
            _ => EXIT_HARDWARE,
        };
    }
    if err.downcast_ref::<HwError>().is_some() {
        return EXIT_HARDWARE;
    }
    1
}

fn reason_name(err: &eyre::Report) -> &'static str {
    match exit_code_for_error(err) {
        EXIT_CONFIG => "Config",
        EXIT_HARDWARE => "Hardware",
        _ => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;
    json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
