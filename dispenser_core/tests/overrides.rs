mod common;

use common::{Rig, ScriptSensor};
use dispenser_core::{InputEvent, TickOutcome};
use dispenser_traits::SwitchState;

#[test]
fn force_at_counter_two_checks_on_next_tick() {
    let mut rig = Rig::new(ScriptSensor::cm(&[3]), 5);
    rig.d.begin();
    rig.d.tick();
    rig.d.tick();
    assert_eq!(rig.d.counter(), 2);

    rig.d.apply(InputEvent::ForceDispense);
    assert_eq!(rig.reads(), 0, "override alone must not read the sensor");
    assert_eq!(rig.opens(), 0, "override alone must not open the pump");

    assert!(matches!(rig.d.tick(), TickOutcome::Dispensed { .. }));
    assert_eq!(rig.reads(), 1);
    assert_eq!(rig.d.counter(), 0);
    assert!(rig.log.contains("switch 1 pressed"));
}

#[test]
fn forced_check_with_absent_container_does_not_dispense() {
    let mut rig = Rig::new(ScriptSensor::cm(&[40]), 5);
    rig.d.begin();
    rig.d.apply(InputEvent::ForceDispense);
    assert!(matches!(rig.d.tick(), TickOutcome::Absent(_)));
    assert_eq!(rig.opens(), 0);
}

#[test]
fn reset_restarts_the_interval() {
    let mut rig = Rig::new(ScriptSensor::cm(&[3]), 5);
    rig.d.begin();
    for _ in 0..4 {
        rig.d.tick();
    }
    rig.d.apply(InputEvent::ResetTimer);
    assert_eq!(rig.d.counter(), 0);
    for n in 1..5 {
        assert_eq!(rig.d.tick(), TickOutcome::Waiting { elapsed: n });
    }
    assert!(rig.d.tick().checked());
    assert!(rig.log.contains("switch 2 pressed"));
}

#[test]
fn repeated_resets_collapse() {
    let mut rig = Rig::new(ScriptSensor::cm(&[3]), 5);
    rig.d.begin();
    rig.d.tick();
    rig.d.tick();
    rig.d.apply(InputEvent::ResetTimer);
    let once = rig.d.counter();
    rig.d.apply(InputEvent::ResetTimer);
    rig.d.apply(InputEvent::ResetTimer);
    assert_eq!(rig.d.counter(), once);
    assert_eq!(rig.d.tick(), TickOutcome::Waiting { elapsed: 1 });
}

#[test]
fn none_event_is_ignored() {
    let mut rig = Rig::new(ScriptSensor::cm(&[3]), 5);
    rig.d.begin();
    rig.d.tick();
    rig.d.apply(InputEvent::None);
    assert_eq!(rig.d.counter(), 1);
    assert_eq!(rig.d.stats().overrides, 0);
}

#[test]
fn force_then_reset_applied_in_order_leaves_reset() {
    let mut rig = Rig::new(ScriptSensor::cm(&[3]), 5);
    rig.d.begin();
    rig.d.apply(InputEvent::ForceDispense);
    rig.d.apply(InputEvent::ResetTimer);
    assert_eq!(rig.d.tick(), TickOutcome::Waiting { elapsed: 1 });
    assert_eq!(rig.d.stats().overrides, 2);
}

#[test]
fn both_switches_decode_to_force() {
    let ev = InputEvent::from(SwitchState::from_bits(SwitchState::SWITCH_1 | SwitchState::SWITCH_2));
    assert_eq!(ev, InputEvent::ForceDispense);
}

#[test]
fn force_keeps_counter_in_range() {
    let mut rig = Rig::new(ScriptSensor::cm(&[3]), 5);
    rig.d.begin();
    rig.d.apply(InputEvent::ForceDispense);
    rig.d.apply(InputEvent::ForceDispense);
    assert_eq!(rig.d.counter(), 5);
    rig.d.tick();
    assert_eq!(rig.d.counter(), 0);
}
