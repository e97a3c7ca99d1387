//! surprise-core
//!
//! State machine behind the "Go!" widget: a button that draws a random
//! number every 100ms for two seconds. Everything here is target-agnostic;
//! the browser bindings live in `surprise-ui`.

pub mod action;
pub mod config;
pub mod diff;
pub mod error;
pub mod machine;
pub mod random;
pub mod surface;
pub mod timers;
pub mod view;

pub use action::{Action, ACTION_ATTR};
pub use config::{OverlapPolicy, WidgetConfig};
pub use diff::{diff, Patch};
pub use error::{Error, Result};
pub use machine::Machine;
pub use random::random_int;
pub use surface::{MemorySurface, Surface};
pub use timers::{ManualTimers, TimerId, Timers};
pub use view::{render, ViewNode, LABEL_PATH};
