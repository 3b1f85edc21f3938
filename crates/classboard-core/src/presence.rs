//! Edge-triggered "in class" signal.
//!
//! The host uses it to decide whether desktop widgets stay on top: with
//! auto-hide enabled they drop behind other windows while a lesson runs.

use serde::{Deserialize, Serialize};

use crate::resolver::LessonState;

/// Presence as reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presence {
    pub in_class: bool,
    /// Policy outcome for the widgets.
    pub keep_on_top: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ClassPresenceMonitor {
    autohide: bool,
    last: Option<bool>,
}

impl ClassPresenceMonitor {
    pub fn new(autohide: bool) -> Self {
        Self {
            autohide,
            last: None,
        }
    }

    /// Feed the latest resolution. Returns `Some` only when the in-class
    /// value differs from the previous observation (always on the first).
    pub fn observe(&mut self, state: &LessonState) -> Option<Presence> {
        let in_class = state.is_in_lesson();
        if self.last == Some(in_class) {
            return None;
        }
        self.last = Some(in_class);
        tracing::info!(in_class, "class presence changed");
        Some(self.presence_for(in_class))
    }

    /// Change the auto-hide policy. Re-announces the current presence so
    /// the host can apply the new policy without waiting for a flip.
    pub fn set_autohide(&mut self, autohide: bool) -> Option<Presence> {
        if self.autohide == autohide {
            return None;
        }
        self.autohide = autohide;
        self.last.map(|in_class| self.presence_for(in_class))
    }

    pub fn autohide(&self) -> bool {
        self.autohide
    }

    /// Last observed value, `None` before the first observation.
    pub fn in_class(&self) -> Option<bool> {
        self.last
    }

    pub fn keep_on_top(&self) -> bool {
        !(self.autohide && self.last == Some(true))
    }

    fn presence_for(&self, in_class: bool) -> Presence {
        Presence {
            in_class,
            keep_on_top: !(self.autohide && in_class),
        }
    }
}
