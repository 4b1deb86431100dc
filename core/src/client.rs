//! Stateless HTTP request builder and response parser for the admin API.
//!
//! # Design
//! `AdminClient` holds only a `base_url` and carries no mutable state between
//! calls. Every operation is split into `build` (descriptor to
//! `HttpRequest`) and `parse` (`HttpResponse` to JSON body). The caller, or a
//! `Gateway` wrapping an injected `Transport`, executes the actual HTTP
//! round-trip, keeping this half deterministic and free of I/O.

use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, RequestDescriptor};

/// Synchronous, stateless client for the admin API.
#[derive(Debug, Clone)]
pub struct AdminClient {
    base_url: String,
}

impl AdminClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Bind a descriptor to the base URL and serialize its payload.
    pub fn build(&self, descriptor: &RequestDescriptor) -> Result<HttpRequest, ApiError> {
        let (headers, body) = match &descriptor.payload {
            Some(payload) => {
                let body = serde_json::to_string(payload)
                    .map_err(|e| ApiError::SerializationError(e.to_string()))?;
                (
                    vec![("content-type".to_string(), "application/json".to_string())],
                    Some(body),
                )
            }
            None => (Vec::new(), None),
        };

        Ok(HttpRequest {
            method: descriptor.method,
            path: format!("{}{}", self.base_url, descriptor.endpoint),
            headers,
            body,
        })
    }

    /// Parse any 2xx response into its JSON body. Empty bodies (204) parse
    /// to `Value::Null`.
    pub fn parse(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if (200..300).contains(&response.status) {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::http::HttpMethod;

    fn client() -> AdminClient {
        AdminClient::new("http://localhost:8001")
    }

    #[test]
    fn build_get_produces_correct_request() {
        let req = client().build(&RequestDescriptor::get("/routes?size=2")).unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "http://localhost:8001/routes?size=2");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_patch_serializes_payload() {
        let mut payload = serde_json::Map::new();
        payload.insert("cert".to_string(), json!("-----BEGIN CERTIFICATE-----"));
        payload.insert("tags".to_string(), json!(["edge"]));
        let descriptor =
            RequestDescriptor::new(HttpMethod::Patch, "/ca_certificates/abc").with_payload(payload);

        let req = client().build(&descriptor).unwrap();
        assert_eq!(req.method, HttpMethod::Patch);
        assert_eq!(req.path, "http://localhost:8001/ca_certificates/abc");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["cert"], "-----BEGIN CERTIFICATE-----");
        assert_eq!(body["tags"], json!(["edge"]));
    }

    #[test]
    fn build_delete_has_no_body() {
        let req = client().build(&RequestDescriptor::delete("/routes/r1")).unwrap();
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = AdminClient::new("http://localhost:8001/");
        let req = client.build(&RequestDescriptor::get("/routes")).unwrap();
        assert_eq!(req.path, "http://localhost:8001/routes");
    }

    #[test]
    fn parse_success_returns_body() {
        let response = HttpResponse::json(201, &json!({"id": "r1"}));
        let body = client().parse(response).unwrap();
        assert_eq!(body["id"], "r1");
    }

    #[test]
    fn parse_no_content_is_null() {
        let body = client().parse(HttpResponse::empty(204)).unwrap();
        assert!(body.is_null());
    }

    #[test]
    fn parse_not_found() {
        let err = client().parse(HttpResponse::empty(404)).unwrap_err();
        assert!(matches!(err, ApiError::NotFound));
    }

    #[test]
    fn parse_wrong_status() {
        let response = HttpResponse {
            status: 500,
            headers: Vec::new(),
            body: "internal error".to_string(),
        };
        let err = client().parse(response).unwrap_err();
        assert!(matches!(err, ApiError::HttpError { status: 500, .. }));
    }

    #[test]
    fn parse_bad_json() {
        let response = HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: "not json".to_string(),
        };
        let err = client().parse(response).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
