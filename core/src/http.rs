//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests travel in two shapes. A `RequestDescriptor` is what a controller
//! decides to send: a verb, an endpoint relative to the admin API root and an
//! optional JSON payload. `AdminClient::build` turns it into an `HttpRequest`
//! with an absolute path and a serialized body, which the host executes.
//! The host hands back an `HttpResponse` as plain data.
//!
//! All fields use owned types (`String`, `Vec`) so values can be moved into
//! whatever transport the host provides without lifetime concerns.

use std::fmt;

use serde_json::{Map, Value};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a controller wants to send, before it is bound to a base URL.
///
/// `endpoint` is relative to the admin API root and may carry a query string
/// (e.g. `/routes?size=2`).
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub endpoint: String,
    pub payload: Option<Map<String, Value>>,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            method,
            endpoint: endpoint.into(),
            payload: None,
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, endpoint)
    }

    pub fn with_payload(mut self, payload: Map<String, Value>) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// An HTTP request described as plain data.
///
/// Built by `AdminClient::build`. The caller is responsible for executing
/// this request against the network and returning the corresponding
/// `HttpResponse`.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// A response carrying a JSON body.
    pub fn json(status: u16, body: &Value) -> Self {
        Self {
            status,
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: body.to_string(),
        }
    }

    /// A response with no body at all.
    pub fn empty(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: String::new(),
        }
    }
}
