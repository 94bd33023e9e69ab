use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::thread;
use std::time::Duration;

use dispenser_hardware::error::HwError;
use dispenser_hardware::util::wait_for_level;
use rstest::rstest;

#[rstest]
#[case::sleeping(Duration::from_micros(200))]
#[case::spinning(Duration::ZERO)]
fn wait_for_level_sees_edge(#[case] poll: Duration) {
    let echo = Arc::new(AtomicBool::new(false));
    let echo_bg = echo.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(3));
        echo_bg.store(true, Ordering::Relaxed);
    });

    let res = wait_for_level(
        || echo.load(Ordering::Relaxed),
        true,
        Duration::from_millis(500),
        poll,
    );
    assert!(res.is_ok(), "expected success, got {res:?}");
}

#[test]
fn wait_for_level_times_out_as_echo_timeout() {
    let echo = AtomicBool::new(true);

    let err = wait_for_level(
        || echo.load(Ordering::Relaxed),
        false,
        Duration::from_millis(5),
        Duration::from_micros(200),
    )
    .expect_err("expected timeout error");

    match err {
        HwError::EchoTimeout => {}
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn already_at_level_returns_immediately() {
    let res = wait_for_level(|| false, false, Duration::ZERO, Duration::ZERO);
    assert!(res.is_ok());
}
