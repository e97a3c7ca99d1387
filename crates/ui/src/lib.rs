//! surprise-ui
//!
//! WASM entry point: mounts the draw widget on `document.body`, wires the
//! "Go!" button and drives the refresh with browser timers.

mod dom;
mod timers;

use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use surprise_core::{Action, Machine, WidgetConfig, ACTION_ATTR};
use tracing::{info, warn};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, Element, Event, Window};

use crate::dom::{get_document, DomSurface};
use crate::timers::BrowserTimers;

type Widget = Machine<BrowserTimers, DomSurface, StdRng>;

#[wasm_bindgen(start)]
pub fn main_js() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let win = window().ok_or("No window")?;
    let doc = get_document().ok_or("No document")?;
    let body = doc.body().ok_or("No body")?;

    let config = load_config(&win);
    let surface = DomSurface::new(doc, body.into());
    let machine = Machine::new(
        config,
        BrowserTimers::new(win),
        surface,
        StdRng::from_entropy(),
    )
    .map_err(|err| JsValue::from_str(&err.to_string()))?;
    machine.mount()?;
    bind_actions(&machine)?;

    info!("widget mounted");
    Ok(())
}

/// Defaults plus `?interval=..&duration=..` overrides from the page URL
fn load_config(win: &Window) -> WidgetConfig {
    let search = win.location().search().unwrap_or_default();
    WidgetConfig::from_query(&search).unwrap_or_else(|err| {
        warn!(%err, "ignoring widget query parameters");
        WidgetConfig::default()
    })
}

/// One delegated click listener on the widget root.
/// The listener owns the widget, so it lives for the page session.
fn bind_actions(machine: &Rc<Widget>) -> Result<(), JsValue> {
    let root = machine
        .surface()
        .root()
        .cloned()
        .ok_or("widget is not mounted")?;

    let widget = machine.clone();
    let selector = format!("[{ACTION_ATTR}]");
    let onclick = Closure::wrap(Box::new(move |event: Event| {
        let Some(target) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
            return;
        };
        let Some(control) = target.closest(&selector).ok().flatten() else {
            return;
        };
        let Some(name) = control.get_attribute(ACTION_ATTR) else {
            return;
        };
        match name.parse::<Action>() {
            Ok(action) => widget.dispatch(action),
            Err(err) => warn!(%err, "click ignored"),
        }
    }) as Box<dyn FnMut(_)>);

    root.add_event_listener_with_callback("click", onclick.as_ref().unchecked_ref())?;
    onclick.forget();
    Ok(())
}
