//! The draw widget
//!
//! One `Machine` owns the winner number, the refresh and stop timer handles
//! and the last rendered view. Every state change goes through
//! [`Machine::refresh`], which diffs the new view against the previous one
//! and hands the patches to the surface, so the displayed number always
//! matches `current()`.

use std::cell::{Cell, Ref, RefCell};
use std::rc::Rc;

use rand::RngCore;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::config::{OverlapPolicy, WidgetConfig};
use crate::diff::diff;
use crate::random::random_int;
use crate::surface::Surface;
use crate::timers::{TimerId, Timers};
use crate::view::{render, ViewNode};

pub struct Machine<T: Timers, S: Surface, R: RngCore> {
    config: WidgetConfig,
    timers: T,
    surface: RefCell<S>,
    rng: RefCell<R>,
    number: Cell<Option<i64>>,
    view: RefCell<ViewNode>,
    refresh_timer: Cell<Option<TimerId>>,
    stop_timer: Cell<Option<TimerId>>,
    refreshes: Cell<u64>,
}

impl<T, S, R> Machine<T, S, R>
where
    T: Timers + 'static,
    S: Surface + 'static,
    R: RngCore + 'static,
{
    /// Fails if the config would let `refresh` draw outside its range
    pub fn new(config: WidgetConfig, timers: T, surface: S, rng: R) -> crate::Result<Rc<Self>> {
        config.validate()?;
        let view = render(None, &config);
        Ok(Rc::new(Self {
            config,
            timers,
            surface: RefCell::new(surface),
            rng: RefCell::new(rng),
            number: Cell::new(None),
            view: RefCell::new(view),
            refresh_timer: Cell::new(None),
            stop_timer: Cell::new(None),
            refreshes: Cell::new(0),
        }))
    }

    /// Show the current view on the surface as its first frame
    pub fn mount(&self) -> Result<ViewNode, S::Error> {
        let view = self.view.borrow().clone();
        self.surface.borrow_mut().mount(&view)?;
        Ok(view)
    }

    pub fn dispatch(self: &Rc<Self>, action: Action) {
        match action {
            Action::Trigger => self.on_trigger(),
        }
    }

    /// Draw now, keep drawing every interval, stop after the duration
    pub fn on_trigger(self: &Rc<Self>) {
        match self.config.policy {
            OverlapPolicy::Restart => {
                if self.is_running() {
                    debug!("trigger during run, restarting");
                }
                self.cancel_timers();
            }
            OverlapPolicy::Legacy => {
                if let Some(old) = self.refresh_timer.get() {
                    warn!(timer = old.0, "refresh timer orphaned by overlapping trigger");
                }
            }
        }

        info!(
            interval_ms = self.config.interval_ms,
            duration_ms = self.config.duration_ms,
            "draw started"
        );
        self.refresh();

        let weak = Rc::downgrade(self);
        let refresh = self.timers.set_interval(
            self.config.interval(),
            Box::new(move || {
                if let Some(machine) = weak.upgrade() {
                    machine.refresh();
                }
            }),
        );
        self.refresh_timer.set(Some(refresh));

        let weak = Rc::downgrade(self);
        let stop = self.timers.set_timeout(
            self.config.duration(),
            Box::new(move || {
                if let Some(machine) = weak.upgrade() {
                    machine.stop();
                }
            }),
        );
        if self.config.policy == OverlapPolicy::Restart {
            self.stop_timer.set(Some(stop));
        }
    }

    /// Draw a new number and patch the surface
    pub fn refresh(&self) {
        let (min, max) = self.config.bounds();
        let number = random_int(&mut *self.rng.borrow_mut(), min, max);
        self.number.set(Some(number));
        self.refreshes.set(self.refreshes.get() + 1);

        let next = render(Some(number), &self.config);
        let patches = diff(&self.view.borrow(), &next);
        if let Err(err) = self.surface.borrow_mut().apply(&patches) {
            warn!(%err, "failed to update surface");
        }
        *self.view.borrow_mut() = next;
        debug!(number, patches = patches.len(), "refreshed");
    }

    /// Cancel the refresh timer stored now and any pending stop
    pub fn stop(&self) {
        if self.refresh_timer.get().is_some() {
            info!(refreshes = self.refreshes.get(), "draw stopped");
        }
        self.cancel_timers();
    }

    fn cancel_timers(&self) {
        if let Some(id) = self.refresh_timer.take() {
            self.timers.clear(id);
        }
        if let Some(id) = self.stop_timer.take() {
            self.timers.clear(id);
        }
    }
}

impl<T: Timers, S: Surface, R: RngCore> Machine<T, S, R> {
    pub const fn config(&self) -> &WidgetConfig {
        &self.config
    }

    pub const fn timers(&self) -> &T {
        &self.timers
    }

    pub fn surface(&self) -> Ref<'_, S> {
        self.surface.borrow()
    }

    /// The winner number, `None` before the first draw
    pub fn current(&self) -> Option<i64> {
        self.number.get()
    }

    /// Last view handed to the surface
    pub fn view(&self) -> Ref<'_, ViewNode> {
        self.view.borrow()
    }

    pub fn is_running(&self) -> bool {
        self.refresh_timer.get().is_some()
    }

    /// Total draws since creation
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.get()
    }
}

impl<T: Timers, S: Surface, R: RngCore> Drop for Machine<T, S, R> {
    fn drop(&mut self) {
        if let Some(id) = self.refresh_timer.take() {
            self.timers.clear(id);
        }
        if let Some(id) = self.stop_timer.take() {
            self.timers.clear(id);
        }
    }
}
