//! Peripheral assembly: rppal drivers with the `hardware` feature on Linux,
//! simulated adapters everywhere else.

use dispenser_traits::{Feedback, Pump, RangeSensor, Switches};

pub struct Peripherals {
    pub sensor: Box<dyn RangeSensor + Send>,
    pub switches: Box<dyn Switches + Send>,
    pub pump: Box<dyn Pump + Send>,
    pub feedback: Box<dyn Feedback + Send>,
    pub backend: &'static str,
}

#[cfg(all(feature = "hardware", target_os = "linux"))]
pub fn assemble(cfg: &dispenser_config::Config, _sim_distance: &[u16]) -> eyre::Result<Peripherals> {
    use dispenser_hardware::hardware::{Buzzer, GpioSwitches, HcSr04, RelayPump, StripFeedback, Ws2812Spi};
    use eyre::WrapErr;
    use std::time::Duration;

    // pump first so the fluid path is forced closed before anything else can fail
    let pump = RelayPump::new(cfg.pins.pump, cfg.pump.active_low)
        .wrap_err_with(|| format!("open pump relay on GPIO {}", cfg.pins.pump))?;
    let sensor = HcSr04::new(
        cfg.pins.echo,
        cfg.pins.trigger,
        Duration::from_millis(cfg.presence.echo_timeout_ms),
    )
    .wrap_err("open hc-sr04")?;
    let switches = GpioSwitches::new(cfg.pins.switch_1, cfg.pins.switch_2, cfg.switches.active_low)
        .wrap_err("open switches")?;
    let strip = Ws2812Spi::new(cfg.strip.length).wrap_err("open ws2812 strip")?;
    let buzzer = Buzzer::new(cfg.pins.buzzer).wrap_err("open buzzer")?;
    tracing::info!(
        echo = cfg.pins.echo,
        trigger = cfg.pins.trigger,
        switch_1 = cfg.pins.switch_1,
        switch_2 = cfg.pins.switch_2,
        pump = cfg.pins.pump,
        buzzer = cfg.pins.buzzer,
        strip_len = cfg.strip.length,
        "hardware initialised"
    );

    Ok(Peripherals {
        sensor: Box::new(sensor),
        switches: Box::new(switches),
        pump: Box::new(pump),
        feedback: Box::new(StripFeedback::new(strip, buzzer)),
        backend: "hardware",
    })
}

/// Simulated peripherals. Switch presses are read from stdin: a line
/// starting with `f` presses switch 1, `r` presses switch 2.
#[cfg(not(all(feature = "hardware", target_os = "linux")))]
pub fn assemble(cfg: &dispenser_config::Config, sim_distance: &[u16]) -> eyre::Result<Peripherals> {
    use dispenser_hardware::{
        SimulatedFeedback, SimulatedPump, SimulatedRangeSensor, SimulatedSwitches,
    };

    let sensor = if sim_distance.is_empty() {
        SimulatedRangeSensor::constant(SIM_DEFAULT_CM)
    } else {
        SimulatedRangeSensor::from_cm(sim_distance)
    };
    let switches = SimulatedSwitches::new();
    spawn_stdin_presser(switches.presser());
    tracing::info!(
        strip_len = cfg.strip.length,
        readings = sim_distance.len(),
        "simulated peripherals"
    );

    Ok(Peripherals {
        sensor: Box::new(sensor),
        switches: Box::new(switches),
        pump: Box::new(SimulatedPump::new()),
        feedback: Box::new(SimulatedFeedback::new()),
        backend: "simulation",
    })
}

/// Reading the simulated sensor reports when no `--sim-distance` is given.
#[cfg(not(all(feature = "hardware", target_os = "linux")))]
const SIM_DEFAULT_CM: u16 = 3;

#[cfg(not(all(feature = "hardware", target_os = "linux")))]
fn spawn_stdin_presser(presser: dispenser_hardware::SwitchPresser) {
    use std::io::BufRead;
    // detached: blocks on stdin until EOF, never holds up shutdown
    let spawned = std::thread::Builder::new()
        .name("stdin-switches".into())
        .spawn(move || {
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                match line.trim().chars().next() {
                    Some('f' | 'F') => presser.press_force(),
                    Some('r' | 'R') => presser.press_reset(),
                    _ => {}
                }
            }
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "could not start stdin switch reader");
    }
}
