mod common;

use common::{Rig, ScriptSensor};
use dispenser_core::InputEvent;
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Step {
    Tick,
    Force,
    Reset,
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        6 => Just(Step::Tick),
        1 => Just(Step::Force),
        1 => Just(Step::Reset),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 128, .. ProptestConfig::default() })]

    #[test]
    fn counter_in_range_and_opens_bounded_by_checks(
        interval in 1u32..8,
        distances in prop::collection::vec(0u16..20, 1..6),
        steps in prop::collection::vec(step(), 1..120),
    ) {
        let mut rig = Rig::new(ScriptSensor::cm(&distances), interval);
        rig.d.begin();
        for s in steps {
            match s {
                Step::Tick => {
                    let outcome = rig.d.tick();
                    if outcome.checked() {
                        prop_assert_eq!(rig.d.counter(), 0);
                    }
                }
                Step::Force => rig.d.apply(InputEvent::ForceDispense),
                Step::Reset => rig.d.apply(InputEvent::ResetTimer),
            }
            prop_assert!(rig.d.counter() <= interval);
            prop_assert!(!rig.d.is_flowing());
            prop_assert!(rig.opens() as u64 <= rig.d.stats().checks);
            prop_assert_eq!(u64::from(rig.reads()), rig.d.stats().checks);
        }
    }

    #[test]
    fn every_open_is_followed_by_a_close(
        distances in prop::collection::vec(0u16..12, 1..6),
        ticks in 1usize..40,
    ) {
        let mut rig = Rig::new(ScriptSensor::cm(&distances), 2);
        rig.d.begin();
        for _ in 0..ticks {
            rig.d.tick();
        }
        let calls = rig.pump.lock().unwrap().clone();
        for (i, (open, _)) in calls.iter().enumerate() {
            if *open {
                prop_assert_eq!(calls.get(i + 1).map(|c| c.0), Some(false));
            }
        }
        prop_assert_eq!(calls.last().map(|c| c.0), Some(false));
    }
}
