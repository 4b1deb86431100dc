//! Create/edit screen for a single resource.
//!
//! # Design
//! The mode is resolved once in `new` from the route parameter. In edit mode
//! `open` hydrates the model with a tracked GET; a failed load sends the user
//! back to the list because the form would be unusable. Submissions are
//! untracked and guarded by a local validation gate that never reaches the
//! network.

use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::http::RequestDescriptor;
use crate::lifecycle::{RequestLifecycle, Tracking};
use crate::mode::{self, ResolvedTarget, ResourceMode};
use crate::model::ResourceModel;
use crate::resources::EditKind;
use crate::transport::Gateway;
use crate::view::{Collaborators, ViewAction};

/// Content fields at or below this many characters count as empty.
pub const MIN_CONTENT_LEN: usize = 10;

/// Loader position announced by the hydration fetch.
const HYDRATION_STEP: u32 = 100;

/// What happened to a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Rejected locally; focus was moved to `field` and nothing was sent.
    Invalid { field: &'static str },
    /// The server created the resource. `id` is `None` if the response
    /// carried no id, in which case no navigation happened.
    Created { id: Option<String> },
    Updated,
    Failed,
}

pub struct EditController {
    kind: EditKind,
    target: ResolvedTarget,
    model: ResourceModel,
    lifecycle: RequestLifecycle,
    view: Collaborators,
}

impl EditController {
    /// Resolve the mode and set up the chrome. Does not load anything.
    pub fn new(kind: EditKind, route_param: &str, gateway: Gateway, view: Collaborators) -> Self {
        let target = mode::resolve(route_param, kind.sentinel, kind.collection);
        view.chrome.set_title(&target.mode.title(kind.singular));

        Self {
            model: ResourceModel::new(kind.schema),
            lifecycle: RequestLifecycle::new(gateway, view.progress.clone()),
            kind,
            target,
            view,
        }
    }

    /// `new`, followed by hydration when editing an existing resource.
    pub async fn open(kind: EditKind, route_param: &str, gateway: Gateway, view: Collaborators) -> Self {
        let mut controller = Self::new(kind, route_param, gateway, view);
        if !controller.target.mode.is_create() {
            controller.hydrate().await;
        }
        controller.view.navigator.add_route(controller.kind.list_route);
        controller
    }

    pub fn mode(&self) -> &ResourceMode {
        &self.target.mode
    }

    pub fn target(&self) -> &ResolvedTarget {
        &self.target
    }

    pub fn model(&self) -> &ResourceModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut ResourceModel {
        &mut self.model
    }

    /// Load the resource into the model. Returns whether it loaded; always
    /// `false` in create mode, where there is nothing to load.
    #[instrument(skip(self), fields(endpoint = %self.target.endpoint))]
    pub async fn hydrate(&mut self) -> bool {
        let Self {
            kind,
            target,
            model,
            lifecycle,
            view,
        } = self;
        if target.mode.is_create() {
            return false;
        }

        let request = RequestDescriptor::get(target.endpoint.clone());
        lifecycle
            .execute(&request, Tracking::Step(HYDRATION_STEP), |outcome| match outcome {
                Ok(record) => {
                    model.reconcile(&record);
                    view.chrome.add_action(ViewAction::delete(
                        kind.list_route,
                        kind.resource_label,
                        &target.endpoint,
                    ));
                    true
                }
                Err(_) => {
                    view.notifier.error(kind.messages.load_failed);
                    view.navigator.navigate(kind.list_route);
                    false
                }
            })
            .await
    }

    /// Validate the model and send it.
    #[instrument(skip(self), fields(method = %self.target.method, endpoint = %self.target.endpoint))]
    pub async fn submit(&mut self) -> SubmitOutcome {
        let Self {
            kind,
            target,
            model,
            lifecycle,
            view,
        } = self;

        if content_len(model.text(kind.primary_field)) <= MIN_CONTENT_LEN {
            debug!(field = kind.primary_field, "primary field too short, not sending");
            view.chrome.focus_field(kind.primary_field);
            return SubmitOutcome::Invalid {
                field: kind.primary_field,
            };
        }

        let mut payload = model.to_payload();
        if let Some(digest) = kind.digest_field {
            if content_len(model.text(digest)) <= MIN_CONTENT_LEN {
                payload.remove(digest);
            }
        }
        debug!(?payload, "submitting");

        let request = RequestDescriptor::new(target.method, target.endpoint.clone()).with_payload(payload);
        lifecycle
            .execute(&request, Tracking::Untracked, |outcome| match (outcome, &target.mode) {
                (Ok(created), ResourceMode::Create) => {
                    view.notifier.success(kind.messages.created);
                    let id = created.get("id").and_then(Value::as_str).map(str::to_string);
                    match &id {
                        Some(id) => {
                            let path = view
                                .navigator
                                .current_path()
                                .replacen(&format!("/{}", kind.sentinel), &format!("/{id}"), 1);
                            view.navigator.navigate(&format!("#!{path}"));
                        }
                        None => warn!("created resource carries no id"),
                    }
                    SubmitOutcome::Created { id }
                }
                (Ok(_), ResourceMode::Edit(_)) => {
                    view.notifier.info(kind.messages.updated);
                    SubmitOutcome::Updated
                }
                (Err(_), _) => {
                    view.notifier.error(kind.messages.save_failed);
                    SubmitOutcome::Failed
                }
            })
            .await
    }
}

fn content_len(text: &str) -> usize {
    text.chars().count()
}
