//! Diagnostic sink handed to the renderer.
//!
//! Rendering reports progress and failures through a [`Diagnostics`] trait object instead of
//! calling the logger directly, so tests can observe exactly what a render reported.

use crate::FormError;
use log::Level;
use std::cell::RefCell;

pub trait Diagnostics {
    fn event(&self, level: Level, message: &str);

    /// Reports a failure that is about to be returned to the caller.
    fn failure(&self, error: &FormError) {
        self.event(Level::Error, &format!("[{}] {}", error.kind(), error.message()));
    }
}

/// Forwards every event to the `log` facade.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn event(&self, level: Level, message: &str) {
        log::log!(target: "formstamp::render", level, "{}", message);
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct CollectedDiagnostics {
    events: RefCell<Vec<(Level, String)>>,
}

impl CollectedDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<(Level, String)> {
        self.events.borrow().clone()
    }

    pub fn messages_at(&self, level: Level) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl Diagnostics for CollectedDiagnostics {
    fn event(&self, level: Level, message: &str) {
        self.events.borrow_mut().push((level, message.to_string()));
    }
}
