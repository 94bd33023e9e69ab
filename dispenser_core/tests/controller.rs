mod common;

use std::time::Duration;

use common::{Fx, Rig, ScriptSensor};
use dispenser_core::{AbsentReason, DispenserError, TickOutcome};
use dispenser_traits::{Color, Distance};
use rstest::rstest;

#[test]
fn begin_closes_pump_and_shows_idle() {
    let mut rig = Rig::new(ScriptSensor::cm(&[3]), 5);
    rig.d.begin();
    assert_eq!(*rig.pump.lock().unwrap(), vec![(false, Duration::ZERO)]);
    assert_eq!(
        *rig.fx.lock().unwrap(),
        vec![Fx::Brightness(30), Fx::Show(Color::White)]
    );
    assert!(rig.log.contains("dispenser starting"));
    assert_eq!(rig.d.counter(), 0);
}

#[test]
fn no_check_before_interval() {
    let mut rig = Rig::new(ScriptSensor::cm(&[3]), 5);
    rig.d.begin();
    rig.clear();
    for n in 1..5 {
        assert_eq!(rig.d.tick(), TickOutcome::Waiting { elapsed: n });
    }
    assert_eq!(rig.reads(), 0);
    assert_eq!(rig.opens(), 0);
    assert!(rig.pump.lock().unwrap().is_empty());
}

#[test]
fn present_container_dispenses_for_the_hold() {
    let mut rig = Rig::new(ScriptSensor::cm(&[3]), 5);
    rig.d.begin();
    rig.clear();
    for _ in 1..5 {
        rig.d.tick();
    }
    let outcome = rig.d.tick();
    assert_eq!(
        outcome,
        TickOutcome::Dispensed {
            distance: Distance::from_cm(3)
        }
    );
    assert_eq!(rig.reads(), 1);
    assert_eq!(rig.d.counter(), 0);
    assert!(!rig.d.is_flowing());

    let calls = rig.pump.lock().unwrap().clone();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].0);
    assert!(!calls[1].0);
    assert_eq!(calls[1].1 - calls[0].1, Duration::from_millis(3000));

    assert_eq!(
        rig.colors(),
        vec![Color::Green, Color::Blue, Color::Cyan]
    );
    assert_eq!(rig.alerts(), 0);
    for line in [
        "interval elapsed, checking container",
        "container present at 3 cm",
        "dispensing",
        "pump on",
        "pump off",
    ] {
        assert!(rig.log.contains(line), "missing diag line: {line}");
    }
}

#[test]
fn sequence_restarts_after_a_dispense() {
    let mut rig = Rig::new(ScriptSensor::cm(&[3]), 5);
    rig.d.begin();
    for _ in 0..5 {
        rig.d.tick();
    }
    for n in 1..5 {
        assert_eq!(rig.d.tick(), TickOutcome::Waiting { elapsed: n });
    }
    assert!(rig.d.tick().checked());
    assert_eq!(rig.reads(), 2);
    assert_eq!(rig.d.stats().dispenses, 2);
}

#[test]
fn threshold_is_inclusive() {
    let mut rig = Rig::new(ScriptSensor::cm(&[5]), 1);
    rig.d.begin();
    assert!(matches!(rig.d.tick(), TickOutcome::Dispensed { .. }));
}

#[test]
fn absent_container_alerts_and_keeps_pump_closed() {
    let mut rig = Rig::new(ScriptSensor::cm(&[10]), 5);
    rig.d.begin();
    rig.clear();
    for _ in 1..5 {
        rig.d.tick();
    }
    assert_eq!(
        rig.d.tick(),
        TickOutcome::Absent(AbsentReason::OutOfRange(Distance::from_cm(10)))
    );
    assert_eq!(rig.opens(), 0);
    assert_eq!(rig.alerts(), 1);
    assert_eq!(rig.colors(), vec![Color::Red]);
    assert_eq!(rig.d.counter(), 0);
    assert!(rig.log.contains("no container (10 cm), not dispensing"));

    // next interval runs normally
    for n in 1..5 {
        assert_eq!(rig.d.tick(), TickOutcome::Waiting { elapsed: n });
    }
    assert!(rig.d.tick().checked());
    assert_eq!(rig.alerts(), 2);
}

#[rstest]
#[case::zero(0)]
#[case::no_echo(u16::MAX)]
#[case::beyond_rated_range(401)]
fn implausible_readings_never_open_the_pump(#[case] cm: u16) {
    let mut rig = Rig::new(ScriptSensor::cm(&[cm]), 1);
    rig.d.begin();
    assert_eq!(
        rig.d.tick(),
        TickOutcome::Absent(AbsentReason::Implausible(Distance::from_cm(cm)))
    );
    assert_eq!(rig.opens(), 0);
    assert_eq!(rig.alerts(), 1);
}

#[test]
fn sensor_error_is_treated_as_absent() {
    let mut rig = Rig::new(ScriptSensor::with(vec![Err("echo timeout"), Ok(2)]), 1);
    rig.d.begin();
    match rig.d.tick() {
        TickOutcome::Absent(AbsentReason::SensorFault(msg)) => {
            assert!(msg.contains("timeout"), "{msg}");
        }
        other => panic!("expected sensor fault, got {other:?}"),
    }
    assert_eq!(rig.opens(), 0);
    assert_eq!(rig.d.stats().sensor_faults, 1);

    // loop continues; next reading dispenses
    assert!(matches!(rig.d.tick(), TickOutcome::Dispensed { .. }));
}

#[test]
fn exactly_one_read_per_check() {
    let mut rig = Rig::new(ScriptSensor::cm(&[3, 20, 3]), 2);
    rig.d.begin();
    for _ in 0..6 {
        rig.d.tick();
    }
    assert_eq!(rig.reads(), 3);
    let s = rig.d.stats();
    assert_eq!((s.checks, s.dispenses, s.absences), (3, 2, 1));
}

#[test]
fn halt_closes_pump_and_darkens_strip() {
    let mut rig = Rig::new(ScriptSensor::cm(&[3]), 5);
    rig.d.begin();
    rig.clear();
    rig.d.halt();
    assert_eq!(rig.pump.lock().unwrap().last().map(|c| c.0), Some(false));
    assert_eq!(rig.colors(), vec![Color::Off]);
    assert!(rig.log.contains("dispenser stopped"));
}

mod failures {
    use super::*;
    use dispenser_core::build_dispenser;
    use dispenser_core::mocks::{BrokenFeedback, FailingPump, FailingSensor};
    use dispenser_core::{FeedbackCfg, PresenceCfg, TimingCfg};
    use dispenser_hardware::{SimulatedFeedback, SimulatedPump, SimulatedRangeSensor};
    use dispenser_traits::clock::test_clock::TestClock;
    use std::sync::Arc;
    use std::sync::atomic::Ordering;

    fn timing() -> TimingCfg {
        TimingCfg {
            interval_s: 1,
            ..TimingCfg::default()
        }
    }

    #[test]
    fn open_failure_skips_hold_and_closes() {
        let clock = TestClock::new();
        let mut d = build_dispenser(
            SimulatedRangeSensor::constant(3),
            FailingPump {
                fail_open: true,
                fail_close: false,
            },
            SimulatedFeedback::new(),
            timing(),
            PresenceCfg::default(),
            FeedbackCfg::default(),
            Some(Arc::new(clock.clone())),
            None,
        )
        .unwrap();
        d.begin();
        let before = clock.elapsed();
        match d.tick() {
            TickOutcome::Faulted(DispenserError::Actuator(msg)) => assert!(msg.starts_with("open")),
            other => panic!("expected actuator fault, got {other:?}"),
        }
        assert_eq!(clock.elapsed(), before);
        assert!(!d.is_flowing());
        assert_eq!(d.stats().actuator_faults, 1);
        assert_eq!(d.counter(), 0);
    }

    #[test]
    fn close_failure_is_reported() {
        let mut d = build_dispenser(
            SimulatedRangeSensor::constant(3),
            FailingPump {
                fail_open: false,
                fail_close: true,
            },
            SimulatedFeedback::new(),
            timing(),
            PresenceCfg::default(),
            FeedbackCfg::default(),
            Some(Arc::new(TestClock::new())),
            None,
        )
        .unwrap();
        d.begin();
        match d.tick() {
            TickOutcome::Faulted(DispenserError::Actuator(msg)) => assert!(msg.starts_with("close")),
            other => panic!("expected actuator fault, got {other:?}"),
        }
        assert_eq!(d.counter(), 0);
    }

    #[test]
    fn broken_feedback_does_not_change_decisions() {
        let pump = SimulatedPump::new();
        let flow = pump.flow_flag();
        let mut d = build_dispenser(
            SimulatedRangeSensor::from_cm(&[3, 50]),
            pump,
            BrokenFeedback,
            timing(),
            PresenceCfg::default(),
            FeedbackCfg::default(),
            Some(Arc::new(TestClock::new())),
            None,
        )
        .unwrap();
        d.begin();
        assert!(matches!(d.tick(), TickOutcome::Dispensed { .. }));
        assert!(!flow.load(Ordering::Acquire));
        assert!(matches!(d.tick(), TickOutcome::Absent(_)));
    }

    #[test]
    fn failing_sensor_never_dispenses() {
        let pump = SimulatedPump::new();
        let flow = pump.flow_flag();
        let mut d = build_dispenser(
            FailingSensor,
            pump,
            SimulatedFeedback::new(),
            timing(),
            PresenceCfg::default(),
            FeedbackCfg::default(),
            Some(Arc::new(TestClock::new())),
            None,
        )
        .unwrap();
        d.begin();
        for _ in 0..3 {
            match d.tick() {
                TickOutcome::Absent(AbsentReason::SensorFault(msg)) => {
                    assert_eq!(msg, "sensor error: sensor unplugged");
                }
                other => panic!("expected sensor fault, got {other:?}"),
            }
            assert!(!flow.load(Ordering::Acquire));
        }
        assert_eq!(d.stats().sensor_faults, 3);
    }
}
