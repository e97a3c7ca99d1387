//! `Timers` on top of `window.setInterval` / `window.setTimeout`

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use surprise_core::{TimerId, Timers};
use tracing::warn;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

/// Browser-backed timers.
///
/// Interval closures stay alive until cleared. An interval must not clear
/// itself from inside its own callback: that would drop the running closure.
pub struct BrowserTimers {
    window: Window,
    next_id: Cell<u32>,
    intervals: RefCell<HashMap<TimerId, (i32, Closure<dyn FnMut()>)>>,
    timeouts: Rc<RefCell<HashMap<TimerId, i32>>>,
}

impl BrowserTimers {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            next_id: Cell::new(0),
            intervals: RefCell::new(HashMap::new()),
            timeouts: Rc::new(RefCell::new(HashMap::new())),
        }
    }

    fn next_id(&self) -> TimerId {
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        TimerId(id)
    }
}

fn millis(d: Duration) -> i32 {
    i32::try_from(d.as_millis()).unwrap_or(i32::MAX)
}

impl Timers for BrowserTimers {
    fn set_interval(&self, period: Duration, callback: Box<dyn FnMut()>) -> TimerId {
        let id = self.next_id();
        let closure = Closure::wrap(callback);
        match self
            .window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                millis(period),
            ) {
            Ok(handle) => {
                self.intervals.borrow_mut().insert(id, (handle, closure));
            }
            Err(err) => warn!(?err, "setInterval failed"),
        }
        id
    }

    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) -> TimerId {
        let id = self.next_id();
        let pending = Rc::downgrade(&self.timeouts);
        // Frees itself after running
        let function = Closure::once_into_js(move || {
            if let Some(pending) = pending.upgrade() {
                pending.borrow_mut().remove(&id);
            }
            callback();
        });
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                function.unchecked_ref(),
                millis(delay),
            ) {
            Ok(handle) => {
                self.timeouts.borrow_mut().insert(id, handle);
            }
            Err(err) => warn!(?err, "setTimeout failed"),
        }
        id
    }

    fn clear(&self, id: TimerId) {
        let interval = self.intervals.borrow_mut().remove(&id);
        if let Some((handle, _closure)) = interval {
            self.window.clear_interval_with_handle(handle);
            return;
        }
        let timeout = self.timeouts.borrow_mut().remove(&id);
        if let Some(handle) = timeout {
            self.window.clear_timeout_with_handle(handle);
        }
    }
}
