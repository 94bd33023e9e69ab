#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse errors and validation errors are both fine; panics are not.
    if let Ok(cfg) = dispenser_config::load_toml(data) {
        if cfg.validate().is_ok() {
            // invariants the controller relies on
            assert!(cfg.timing.interval_s >= 1);
            assert!(cfg.presence.threshold_cm <= cfg.presence.max_plausible_cm);
            assert!(cfg.strip.brightness_pct <= 100);
        }
    }
});
