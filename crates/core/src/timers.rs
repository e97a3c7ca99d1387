//! Timer abstraction
//!
//! The widget only needs `setInterval`, `setTimeout` and a way to cancel
//! either. The browser crate implements `Timers` on top of `window`;
//! `ManualTimers` is a virtual clock for tests and headless use.

use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::rc::Rc;
use std::time::Duration;

/// Opaque handle of a scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u32);

pub trait Timers {
    /// Run `callback` every `period` until cleared
    fn set_interval(&self, period: Duration, callback: Box<dyn FnMut()>) -> TimerId;

    /// Run `callback` once after `delay` unless cleared first
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId;

    /// Cancel a timer. Unknown or already-finished ids are ignored.
    fn clear(&self, id: TimerId);
}

enum Callback {
    Repeat(Duration, Box<dyn FnMut()>),
    Once(Box<dyn FnOnce()>),
}

/// Shortest interval period `ManualTimers` will schedule
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Queue key: deadline first, then arm order
type Slot = (Duration, u64);

#[derive(Default)]
struct Queue {
    now: Duration,
    next_id: u32,
    next_seq: u64,
    slots: BTreeMap<Slot, (TimerId, Callback)>,
    live: HashSet<TimerId>,
}

impl Queue {
    fn arm(&mut self, id: TimerId, deadline: Duration, callback: Callback) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.slots.insert((deadline, seq), (id, callback));
    }

    fn schedule(&mut self, delay: Duration, callback: Callback) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.live.insert(id);
        let deadline = self.now + delay;
        self.arm(id, deadline, callback);
        id
    }

    fn pop_due(&mut self, until: Duration) -> Option<(Duration, TimerId, Callback)> {
        let (&(deadline, _), _) = self.slots.first_key_value()?;
        if deadline > until {
            return None;
        }
        let ((deadline, _), (id, callback)) = self.slots.pop_first()?;
        self.now = deadline;
        Some((deadline, id, callback))
    }
}

/// Deterministic virtual clock.
///
/// Timers due at the same instant fire in the order they were armed; an
/// interval is re-armed after each tick, so it queues behind anything armed
/// before that tick. Cloning shares the same clock.
#[derive(Clone, Default)]
pub struct ManualTimers {
    queue: Rc<RefCell<Queue>>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed since creation
    pub fn now(&self) -> Duration {
        self.queue.borrow().now
    }

    /// Number of timers still scheduled
    pub fn pending(&self) -> usize {
        self.queue.borrow().live.len()
    }

    /// Move the clock forward, firing every callback that falls due.
    /// Callbacks may schedule or clear timers on this clock.
    pub fn advance(&self, by: Duration) {
        let until = self.now() + by;
        loop {
            // The borrow must end before the callback runs
            let next = self.queue.borrow_mut().pop_due(until);
            let Some((deadline, id, callback)) = next else {
                break;
            };
            if !self.queue.borrow().live.contains(&id) {
                continue;
            }
            match callback {
                Callback::Once(f) => {
                    self.queue.borrow_mut().live.remove(&id);
                    f();
                }
                Callback::Repeat(period, mut f) => {
                    f();
                    let mut queue = self.queue.borrow_mut();
                    if queue.live.contains(&id) {
                        queue.arm(id, deadline + period, Callback::Repeat(period, f));
                    }
                }
            }
        }
        self.queue.borrow_mut().now = until;
    }
}

impl Timers for ManualTimers {
    fn set_interval(&self, period: Duration, callback: Box<dyn FnMut()>) -> TimerId {
        // A zero period would re-arm at the same instant forever
        let period = period.max(MIN_PERIOD);
        self.queue
            .borrow_mut()
            .schedule(period, Callback::Repeat(period, callback))
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        self.queue
            .borrow_mut()
            .schedule(delay, Callback::Once(callback))
    }

    fn clear(&self, id: TimerId) {
        let mut queue = self.queue.borrow_mut();
        if queue.live.remove(&id) {
            queue.slots.retain(|_, (slot_id, _)| *slot_id != id);
        }
    }
}
