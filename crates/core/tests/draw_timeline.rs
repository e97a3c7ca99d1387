//! End-to-end draw runs on the virtual clock

use std::convert::Infallible;
use std::rc::Rc;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;
use surprise_core::{
    Action, Machine, ManualTimers, OverlapPolicy, Patch, Surface, ViewNode, WidgetConfig,
    LABEL_PATH,
};

/// Surface that records the label text and the clock time of every update
struct Recorder {
    clock: ManualTimers,
    tree: Option<ViewNode>,
    frames: Vec<(Duration, String)>,
}

impl Surface for Recorder {
    type Error = Infallible;

    fn mount(&mut self, view: &ViewNode) -> Result<(), Self::Error> {
        self.tree = Some(view.clone());
        Ok(())
    }

    fn apply(&mut self, patches: &[Patch]) -> Result<(), Self::Error> {
        let tree = self.tree.as_mut().expect("apply before mount");
        tree.apply(patches);
        let label = tree.at(LABEL_PATH).map(ViewNode::text_content).unwrap_or_default();
        self.frames.push((self.clock.now(), label));
        Ok(())
    }
}

type Widget = Rc<Machine<ManualTimers, Recorder, StdRng>>;

fn widget(policy: OverlapPolicy, seed: u64) -> (Widget, ManualTimers) {
    let clock = ManualTimers::new();
    let surface = Recorder {
        clock: clock.clone(),
        tree: None,
        frames: Vec::new(),
    };
    let config = WidgetConfig {
        policy,
        ..WidgetConfig::default()
    };
    let machine = Machine::new(config, clock.clone(), surface, StdRng::seed_from_u64(seed))
        .unwrap();
    machine.mount().unwrap();
    (machine, clock)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn frame_times(machine: &Widget) -> Vec<u64> {
    machine
        .surface()
        .frames
        .iter()
        .map(|(t, _)| u64::try_from(t.as_millis()).unwrap())
        .collect()
}

#[test]
fn single_trigger_runs_for_two_seconds() {
    let (machine, clock) = widget(OverlapPolicy::Restart, 1);
    machine.dispatch(Action::Trigger);
    clock.advance(ms(5000));

    let expected: Vec<u64> = (0..20).map(|i| i * 100).collect();
    assert_eq!(frame_times(&machine), expected);
    assert_eq!(machine.refresh_count(), 20);
    assert!(!machine.is_running());
    assert_eq!(clock.pending(), 0);
}

#[test]
fn trigger_updates_before_first_tick() {
    let (machine, clock) = widget(OverlapPolicy::Restart, 2);
    assert_eq!(machine.current(), None);

    machine.dispatch(Action::Trigger);
    assert!(machine.current().is_some());
    assert_eq!(frame_times(&machine), vec![0]);

    clock.advance(ms(99));
    assert_eq!(machine.refresh_count(), 1);
    clock.advance(ms(1));
    assert_eq!(machine.refresh_count(), 2);
}

#[test]
fn displayed_numbers_stay_in_range() {
    for seed in 0..20 {
        let (machine, clock) = widget(OverlapPolicy::Restart, seed);
        machine.dispatch(Action::Trigger);
        clock.advance(ms(2500));

        for (_, label) in &machine.surface().frames {
            let n: i64 = label
                .strip_prefix("Suprise goes to ")
                .and_then(|s| s.parse().ok())
                .expect("label carries a number");
            assert!((0..700).contains(&n), "{n} out of range");
        }
        let shown = machine.surface().frames.last().unwrap().1.clone();
        assert_eq!(shown, format!("Suprise goes to {}", machine.current().unwrap()));
    }
}

#[test]
fn retrigger_after_run_starts_a_new_run() {
    let (machine, clock) = widget(OverlapPolicy::Restart, 3);
    machine.dispatch(Action::Trigger);
    clock.advance(ms(3000));
    assert_eq!(machine.refresh_count(), 20);

    machine.dispatch(Action::Trigger);
    clock.advance(ms(3000));
    assert_eq!(machine.refresh_count(), 40);
    assert_eq!(clock.pending(), 0);
}

#[test]
fn restart_policy_latest_trigger_governs_stop() {
    let (machine, clock) = widget(OverlapPolicy::Restart, 4);
    machine.dispatch(Action::Trigger);
    clock.advance(ms(50));
    machine.dispatch(Action::Trigger);
    clock.advance(ms(5000));

    let mut expected = vec![0, 50];
    expected.extend((1..20).map(|i| 50 + i * 100));
    assert_eq!(frame_times(&machine), expected);
    assert_eq!(*frame_times(&machine).last().unwrap(), 1950);
    assert!(!machine.is_running());
    assert_eq!(clock.pending(), 0);
}

#[test]
fn legacy_policy_orphans_first_timer() {
    let (machine, clock) = widget(OverlapPolicy::Legacy, 5);
    machine.dispatch(Action::Trigger);
    clock.advance(ms(50));
    machine.dispatch(Action::Trigger);
    clock.advance(ms(2450));

    // Both stop timers fired; the second found nothing left to cancel
    assert!(!machine.is_running());
    assert_eq!(clock.pending(), 1);

    let before = machine.refresh_count();
    clock.advance(ms(500));
    assert_eq!(machine.refresh_count(), before + 5);
}
