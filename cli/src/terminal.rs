//! Collaborators backed by the terminal.
//!
//! Notifications go to stdout/stderr and chrome updates become log events.
//! Actions are remembered so a command can act on what the screen offered.

use std::sync::{
    atomic::{AtomicU32, Ordering},
    Mutex,
};

use gateway_admin_core::{Navigator, Notifier, ProgressSink, ViewAction, ViewChrome};
use tracing::{debug, info, warn};

pub struct TerminalView {
    current_path: String,
    loader: AtomicU32,
    actions: Mutex<Vec<ViewAction>>,
}

impl TerminalView {
    pub fn new(current_path: &str) -> Self {
        Self {
            current_path: current_path.to_string(),
            loader: AtomicU32::new(0),
            actions: Mutex::new(Vec::new()),
        }
    }

    /// The registered action with this label.
    pub fn action(&self, label: &str) -> Option<ViewAction> {
        self.actions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .iter()
            .find(|action| action.label == label)
            .cloned()
    }
}

impl ProgressSink for TerminalView {
    fn set_loader_steps(&self, steps: u32) {
        debug!(steps, "loader sized");
    }

    fn set_loader_step(&self, step: u32) {
        debug!(step, "loader step");
    }

    fn increment_loader(&self) {
        let done = self.loader.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(done, "loader advanced");
    }
}

impl Notifier for TerminalView {
    fn success(&self, message: &str) {
        println!("{message}");
    }

    fn info(&self, message: &str) {
        println!("{message}");
    }

    fn error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

impl Navigator for TerminalView {
    fn current_path(&self) -> String {
        self.current_path.clone()
    }

    fn navigate(&self, target: &str) {
        info!(to = target, "navigate");
    }

    fn add_route(&self, path: &str) {
        debug!(path, "route registered");
    }
}

impl ViewChrome for TerminalView {
    fn set_title(&self, title: &str) {
        info!(title, "screen");
    }

    fn add_breadcrumb(&self, path: &str, label: &str) {
        debug!(path, label, "breadcrumb");
    }

    fn clear_breadcrumbs(&self) {
        debug!("breadcrumbs cleared");
    }

    fn add_action(&self, action: ViewAction) {
        debug!(label = %action.label, path = %action.path, "action available");
        self.actions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(action);
    }

    fn focus_field(&self, field: &str) {
        warn!(field, "field needs attention");
    }
}
