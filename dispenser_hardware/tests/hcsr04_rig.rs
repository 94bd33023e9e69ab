#![cfg(all(feature = "hardware", target_os = "linux"))]

use std::time::Duration;

use dispenser_hardware::error::HwError;
use dispenser_hardware::hardware::HcSr04;

// These need an HC-SR04 wired to BCM 3 (echo, through a divider) and BCM 2
// (trigger). Run with `cargo test -p dispenser_hardware --features hardware -- --ignored`.

#[test]
#[ignore = "needs a wired HC-SR04"]
fn measures_something_plausible() {
    let mut ranger = HcSr04::new(3, 2, Duration::from_millis(30)).expect("open ranger");
    let d = ranger.measure().expect("measure");
    assert!(d.is_plausible(400), "got {d}");
}

#[test]
#[ignore = "needs echo pin left unconnected"]
fn unwired_echo_times_out() {
    let mut ranger = HcSr04::new(3, 2, Duration::from_millis(5)).expect("open ranger");
    match ranger.measure() {
        Err(HwError::EchoTimeout) => {}
        other => panic!("expected echo timeout, got {other:?}"),
    }
}
