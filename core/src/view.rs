//! Collaborator capabilities injected into controllers.
//!
//! # Design
//! The view layer is split by what the core needs from it rather than by
//! how a host happens to implement it. A host usually backs all four traits
//! with one object; `Collaborators::shared` wires such an object in. Every
//! call is fire-and-forget: the core never reads a result back, apart from
//! `Navigator::current_path`.

use std::sync::Arc;

/// Loader progress accounting.
pub trait ProgressSink: Send + Sync {
    fn set_loader_steps(&self, steps: u32);
    fn set_loader_step(&self, step: u32);
    fn increment_loader(&self);
}

/// User-facing notifications.
pub trait Notifier: Send + Sync {
    fn success(&self, message: &str);
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Location and route history.
pub trait Navigator: Send + Sync {
    /// The current view path without the `#!` prefix, e.g.
    /// `/certificates/__create__`.
    fn current_path(&self) -> String;
    fn navigate(&self, target: &str);
    fn add_route(&self, path: &str);
}

/// Title, breadcrumbs, contextual actions and form focus.
pub trait ViewChrome: Send + Sync {
    fn set_title(&self, title: &str);
    fn add_breadcrumb(&self, path: &str, label: &str);
    fn clear_breadcrumbs(&self);
    fn add_action(&self, action: ViewAction);
    fn focus_field(&self, field: &str);
}

/// A contextual action button.
///
/// Destructive actions carry the resource label and the endpoint the host
/// should delete before following `path`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewAction {
    pub label: String,
    pub path: String,
    pub style_class: Option<String>,
    pub resource_label: Option<String>,
    pub endpoint: Option<String>,
}

impl ViewAction {
    pub fn link(label: &str, path: &str) -> Self {
        Self {
            label: label.to_string(),
            path: path.to_string(),
            style_class: None,
            resource_label: None,
            endpoint: None,
        }
    }

    pub fn delete(path: &str, resource_label: &str, endpoint: &str) -> Self {
        Self {
            label: "Delete".to_string(),
            path: path.to_string(),
            style_class: Some("btn critical delete".to_string()),
            resource_label: Some(resource_label.to_string()),
            endpoint: Some(endpoint.to_string()),
        }
    }
}

/// The capability set handed to every controller.
#[derive(Clone)]
pub struct Collaborators {
    pub progress: Arc<dyn ProgressSink>,
    pub notifier: Arc<dyn Notifier>,
    pub navigator: Arc<dyn Navigator>,
    pub chrome: Arc<dyn ViewChrome>,
}

impl Collaborators {
    /// Use one object for every capability.
    pub fn shared<T>(view: Arc<T>) -> Self
    where
        T: ProgressSink + Notifier + Navigator + ViewChrome + 'static,
    {
        Self {
            progress: view.clone(),
            notifier: view.clone(),
            navigator: view.clone(),
            chrome: view,
        }
    }
}
