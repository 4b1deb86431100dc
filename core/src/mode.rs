//! Create/edit mode resolution from a route parameter.
//!
//! A screen is instantiated with one route parameter: either a resource id
//! or the reserved sentinel meaning "new". The mode is decided once and
//! never changes for the lifetime of the controller.

use crate::http::HttpMethod;

/// Route parameter value that opens a screen in create mode.
pub const CREATE_SENTINEL: &str = "__create__";

/// Whether a screen creates a new resource or edits an existing one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceMode {
    Create,
    Edit(String),
}

impl ResourceMode {
    pub fn from_route_param(param: &str, sentinel: &str) -> Self {
        if param == sentinel {
            ResourceMode::Create
        } else {
            ResourceMode::Edit(param.to_string())
        }
    }

    pub fn is_create(&self) -> bool {
        matches!(self, ResourceMode::Create)
    }

    /// The id of the edited resource, `None` in create mode.
    pub fn id(&self) -> Option<&str> {
        match self {
            ResourceMode::Create => None,
            ResourceMode::Edit(id) => Some(id),
        }
    }

    /// Verb used when the form is submitted.
    pub fn method(&self) -> HttpMethod {
        match self {
            ResourceMode::Create => HttpMethod::Post,
            ResourceMode::Edit(_) => HttpMethod::Patch,
        }
    }

    /// Submission endpoint under `collection_root`.
    pub fn endpoint(&self, collection_root: &str) -> String {
        match self {
            ResourceMode::Create => collection_root.to_string(),
            ResourceMode::Edit(id) => format!("{collection_root}/{id}"),
        }
    }

    /// Screen title for a resource called `singular` ("CA Certificate").
    pub fn title(&self, singular: &str) -> String {
        match self {
            ResourceMode::Create => format!("Add {singular}"),
            ResourceMode::Edit(_) => format!("Edit {singular}"),
        }
    }
}

/// Everything a screen derives from its route parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    pub mode: ResourceMode,
    pub method: HttpMethod,
    pub endpoint: String,
    /// The route parameter as shown to the user; the sentinel in create mode.
    pub display_id: String,
}

pub fn resolve(param: &str, sentinel: &str, collection_root: &str) -> ResolvedTarget {
    let mode = ResourceMode::from_route_param(param, sentinel);
    ResolvedTarget {
        method: mode.method(),
        endpoint: mode.endpoint(collection_root),
        display_id: param.to_string(),
        mode,
    }
}
