//! `run` and `self-check` subcommands.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use dispenser_core::hw_error::{map_feedback_error, map_hw_error, map_input_error, map_sensor_error};
use dispenser_core::{Dispenser, DispenserCfg, InputEvent, InputPoller, RunReport, StopReason};
use dispenser_traits::clock::MonotonicClock;
use dispenser_traits::{Color, Distance};
use serde_json::json;

use crate::assembly::assemble;

pub fn run_loop(
    cfg: &dispenser_config::Config,
    ticks: Option<u64>,
    sim_distance: &[u16],
    shutdown: Arc<AtomicBool>,
) -> eyre::Result<RunReport> {
    let dcfg = DispenserCfg::from(cfg);
    let hw = assemble(cfg, sim_distance)?;
    tracing::info!(backend = hw.backend, ?ticks, "starting");

    let clock = Arc::new(MonotonicClock::new());
    let poller = InputPoller::spawn(
        hw.switches,
        Duration::from_millis(dcfg.timing.poll_ms),
        clock.clone(),
    );
    let mut dispenser = Dispenser::builder()
        .with_sensor(hw.sensor)
        .with_pump(hw.pump)
        .with_feedback(hw.feedback)
        .with_config(dcfg)
        .with_clock(clock)
        .build()?;

    let report = dispenser_core::run(&mut dispenser, Some(&poller), &shutdown, ticks);
    drop(poller);
    Ok(report)
}

pub fn print_report(report: &RunReport, json_out: bool) {
    let s = &report.stats;
    let stopped = match report.stopped_by {
        StopReason::TickLimit => "tick limit",
        StopReason::Shutdown => "shutdown",
    };
    if json_out {
        println!(
            "{}",
            json!({
                "stopped_by": stopped,
                "ticks": s.ticks,
                "checks": s.checks,
                "dispenses": s.dispenses,
                "absences": s.absences,
                "sensor_faults": s.sensor_faults,
                "actuator_faults": s.actuator_faults,
                "overrides": s.overrides,
                "overruns": report.overruns,
            })
        );
        return;
    }
    println!("stopped: {stopped}");
    println!("ticks: {}", s.ticks);
    println!("checks: {}", s.checks);
    println!("dispenses: {}", s.dispenses);
    println!("absences: {}", s.absences);
    println!("sensor faults: {}", s.sensor_faults);
    println!("actuator faults: {}", s.actuator_faults);
    println!("overrides: {}", s.overrides);
}

/// One reading from every peripheral. Individual failures are reported,
/// not fatal; only assembly errors abort.
pub fn self_check(cfg: &dispenser_config::Config, json_out: bool) -> eyre::Result<()> {
    let mut hw = assemble(cfg, &[])?;

    let distance = hw
        .sensor
        .read_distance()
        .map_err(|e| map_sensor_error(&*e));
    let switches = hw
        .switches
        .poll()
        .map(InputEvent::from)
        .map_err(|e| map_input_error(&*e));
    let pump = hw
        .pump
        .set_flow(false)
        .map_err(|e| map_hw_error(&*e));
    let strip = hw
        .feedback
        .set_brightness(cfg.strip.brightness_pct)
        .and_then(|()| hw.feedback.show_all(Color::White))
        .map_err(|e| map_feedback_error(&*e));

    let plausible = |d: &Distance| d.is_plausible(cfg.presence.max_plausible_cm);
    let present = |d: &Distance| plausible(d) && d.cm() <= cfg.presence.threshold_cm;

    if json_out {
        println!(
            "{}",
            json!({
                "backend": hw.backend,
                "distance_cm": distance.as_ref().ok().filter(|d| plausible(d)).map(|d| d.cm()),
                "container_present": distance.as_ref().map(present).unwrap_or(false),
                "distance_error": distance.as_ref().err().map(ToString::to_string),
                "switches": switches.as_ref().ok().map(|e| format!("{e:?}")),
                "switches_error": switches.as_ref().err().map(ToString::to_string),
                "pump_ok": pump.is_ok(),
                "strip_ok": strip.is_ok(),
            })
        );
    } else {
        println!("backend: {}", hw.backend);
        match &distance {
            Ok(d) if present(d) => println!("distance: {d} (container present)"),
            Ok(d) => println!("distance: {d} (no container)"),
            Err(e) => println!("distance: error: {e}"),
        }
        match &switches {
            Ok(InputEvent::None) => println!("switches: idle"),
            Ok(ev) => println!("switches: {ev:?}"),
            Err(e) => println!("switches: error: {e}"),
        }
        match &pump {
            Ok(()) => println!("pump: closed"),
            Err(e) => println!("pump: error: {e}"),
        }
        match &strip {
            Ok(()) => println!("strip: ok"),
            Err(e) => println!("strip: error: {e}"),
        }
    }
    Ok(())
}
