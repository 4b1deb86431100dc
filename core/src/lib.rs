//! Controller core for a gateway admin console.
//!
//! # Overview
//! Drives create/edit and list screens for resources exposed by a gateway's
//! admin REST API. The core builds `HttpRequest` values and parses
//! `HttpResponse` values; the host supplies the actual IO through a
//! [`Transport`] and the view through the collaborator traits in [`view`].
//!
//! # Design
//! - `AdminClient` is stateless, it holds only `base_url`. `Gateway` binds
//!   it to a transport.
//! - `RequestLifecycle` gives every request the same shape: progress
//!   announcement, exactly one of success/failure, then loader completion.
//! - `EditController` and `ListController` are generic over a resource
//!   kind (`resources`), so a new screen is a new constant, not new code.
//! - Everything runs on one cooperative task. Controllers take `&mut self`
//!   for any request, which rules out overlapping fetches on one screen.

pub mod client;
pub mod controller;
pub mod cursor;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod mock;
pub mod mode;
pub mod model;
pub mod query;
pub mod resources;
pub mod transport;
pub mod view;

pub use client::AdminClient;
pub use controller::{EditController, ListController, ListRecord, NextPage, SubmitOutcome};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestDescriptor};
pub use lifecycle::{RequestLifecycle, Tracking};
pub use mode::{ResolvedTarget, ResourceMode, CREATE_SENTINEL};
pub use model::{FieldSpec, FieldValue, ResourceModel};
pub use query::Filter;
pub use resources::{EditKind, ListKind};
pub use transport::{Gateway, Transport};
pub use view::{Collaborators, Navigator, Notifier, ProgressSink, ViewAction, ViewChrome};
