//! # Test doubles
//!
//! Utilities for exercising controllers without a browser or a network.
//!
//! - [`RecordingView`] implements every collaborator trait and records each
//!   call as a [`ViewEvent`], in order.
//! - [`ScriptedTransport`] answers requests from a queue of canned outcomes
//!   and remembers what it was asked.
//!
//! ```ignore
//! let view = Arc::new(RecordingView::new("/certificates/__create__"));
//! let transport = Arc::new(ScriptedTransport::new().respond(HttpResponse::json(201, &json!({"id": "r1"}))));
//! let gateway = Gateway::new(AdminClient::new("http://admin"), transport.clone());
//! // drive a controller, then assert on view.events() and transport.requests()
//! ```

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;
use crate::view::{Navigator, Notifier, ProgressSink, ViewAction, ViewChrome};

/// One observed collaborator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Title(String),
    Breadcrumb { path: String, label: String },
    ClearBreadcrumbs,
    Action(ViewAction),
    Route(String),
    Focus(String),
    LoaderSteps(u32),
    LoaderStep(u32),
    LoaderIncrement,
    Success(String),
    Info(String),
    Error(String),
    Navigate(String),
}

/// Records every collaborator call made against it.
#[derive(Debug)]
pub struct RecordingView {
    current_path: Mutex<String>,
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingView {
    pub fn new(current_path: &str) -> Self {
        Self {
            current_path: Mutex::new(current_path.to_string()),
            events: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, event: ViewEvent) {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(event);
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Number of `increment_loader` calls so far.
    pub fn loader_increments(&self) -> usize {
        self.events()
            .iter()
            .filter(|event| matches!(event, ViewEvent::LoaderIncrement))
            .count()
    }

    /// Notifications only, in order.
    pub fn notifications(&self) -> Vec<ViewEvent> {
        self.events()
            .into_iter()
            .filter(|event| {
                matches!(
                    event,
                    ViewEvent::Success(_) | ViewEvent::Info(_) | ViewEvent::Error(_)
                )
            })
            .collect()
    }

    /// Navigation targets only, in order.
    pub fn navigations(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|event| match event {
                ViewEvent::Navigate(target) => Some(target),
                _ => None,
            })
            .collect()
    }
}

impl ProgressSink for RecordingView {
    fn set_loader_steps(&self, steps: u32) {
        self.record(ViewEvent::LoaderSteps(steps));
    }

    fn set_loader_step(&self, step: u32) {
        self.record(ViewEvent::LoaderStep(step));
    }

    fn increment_loader(&self) {
        self.record(ViewEvent::LoaderIncrement);
    }
}

impl Notifier for RecordingView {
    fn success(&self, message: &str) {
        self.record(ViewEvent::Success(message.to_string()));
    }

    fn info(&self, message: &str) {
        self.record(ViewEvent::Info(message.to_string()));
    }

    fn error(&self, message: &str) {
        self.record(ViewEvent::Error(message.to_string()));
    }
}

impl Navigator for RecordingView {
    fn current_path(&self) -> String {
        self.current_path
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn navigate(&self, target: &str) {
        self.record(ViewEvent::Navigate(target.to_string()));
    }

    fn add_route(&self, path: &str) {
        self.record(ViewEvent::Route(path.to_string()));
    }
}

impl ViewChrome for RecordingView {
    fn set_title(&self, title: &str) {
        self.record(ViewEvent::Title(title.to_string()));
    }

    fn add_breadcrumb(&self, path: &str, label: &str) {
        self.record(ViewEvent::Breadcrumb {
            path: path.to_string(),
            label: label.to_string(),
        });
    }

    fn clear_breadcrumbs(&self) {
        self.record(ViewEvent::ClearBreadcrumbs);
    }

    fn add_action(&self, action: ViewAction) {
        self.record(ViewEvent::Action(action));
    }

    fn focus_field(&self, field: &str) {
        self.record(ViewEvent::Focus(field.to_string()));
    }
}

/// A transport that replays queued outcomes in order.
///
/// Once the queue is exhausted every request fails with
/// `ApiError::Transport`.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    outcomes: Mutex<VecDeque<Result<HttpResponse, ApiError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response (any status).
    pub fn respond(self, response: HttpResponse) -> Self {
        self.push(Ok(response));
        self
    }

    /// Queue a failed round-trip.
    pub fn fail(self, error: ApiError) -> Self {
        self.push(Err(error));
        self
    }

    fn push(&self, outcome: Result<HttpResponse, ApiError>) {
        self.outcomes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push_back(outcome);
    }

    /// Every request executed so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request);
        self.outcomes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(ApiError::Transport("no scripted response left".to_string())))
    }
}
