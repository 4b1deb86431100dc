//! The request lifecycle every screen goes through.
//!
//! # Design
//! A request has three phases around the network call:
//!
//! 1. announce progress, if the request is tracked;
//! 2. hand the outcome to the caller's handler, which sees exactly one of
//!    success or failure because it receives a single `Result`;
//! 3. advance the loader by one, if tracked, after the handler returned.
//!
//! The third phase is tied to a guard armed right after the announcement,
//! so it also runs when the caller drops the request future mid-flight.
//!
//! Tracking is chosen per call. Initial loads are tracked, form submissions
//! are not.

use std::sync::Arc;

use serde_json::Value;
use tracing::{instrument, warn};

use crate::error::ApiError;
use crate::http::RequestDescriptor;
use crate::transport::Gateway;
use crate::view::ProgressSink;

/// How a request reports to the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tracking {
    Untracked,
    /// Announce the total number of steps (list fetches).
    Steps(u32),
    /// Jump the loader to a step (hydration fetches).
    Step(u32),
}

impl Tracking {
    pub fn is_tracked(&self) -> bool {
        !matches!(self, Tracking::Untracked)
    }
}

#[derive(Clone)]
pub struct RequestLifecycle {
    gateway: Gateway,
    progress: Arc<dyn ProgressSink>,
}

impl RequestLifecycle {
    pub fn new(gateway: Gateway, progress: Arc<dyn ProgressSink>) -> Self {
        Self { gateway, progress }
    }

    pub fn gateway(&self) -> &Gateway {
        &self.gateway
    }

    /// Run `request` through the three phases and return what `handle`
    /// returned.
    #[instrument(
        level = "debug",
        skip(self, request, handle),
        fields(method = %request.method, endpoint = %request.endpoint)
    )]
    pub async fn execute<T>(
        &self,
        request: &RequestDescriptor,
        tracking: Tracking,
        handle: impl FnOnce(Result<Value, ApiError>) -> T,
    ) -> T {
        match tracking {
            Tracking::Untracked => {}
            Tracking::Steps(steps) => self.progress.set_loader_steps(steps),
            Tracking::Step(step) => self.progress.set_loader_step(step),
        }
        let guard = LoaderGuard {
            progress: tracking.is_tracked().then_some(&self.progress),
        };

        let outcome = self.gateway.send(request).await;
        if let Err(err) = &outcome {
            warn!(%err, "request failed");
        }
        let handled = handle(outcome);

        drop(guard);
        handled
    }
}

/// Advances the loader once when dropped, if armed.
struct LoaderGuard<'a> {
    progress: Option<&'a Arc<dyn ProgressSink>>,
}

impl Drop for LoaderGuard<'_> {
    fn drop(&mut self) {
        if let Some(progress) = self.progress.take() {
            progress.increment_loader();
        }
    }
}
