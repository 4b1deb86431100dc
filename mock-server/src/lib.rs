use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::URL_SAFE, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CaCertificate {
    pub id: Uuid,
    pub cert: String,
    pub cert_digest: Option<String>,
    pub tags: Vec<String>,
    pub created_at: u64,
}

#[derive(Deserialize)]
pub struct CreateCaCertificate {
    pub cert: String,
    #[serde(default)]
    pub cert_digest: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateCaCertificate {
    pub cert: Option<String>,
    pub cert_digest: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub id: Uuid,
    pub name: Option<String>,
    pub protocols: Vec<String>,
    pub paths: Vec<String>,
    pub created_at: u64,
}

#[derive(Deserialize)]
pub struct CreateRoute {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_protocols")]
    pub protocols: Vec<String>,
    #[serde(default)]
    pub paths: Vec<String>,
}

#[derive(Deserialize)]
pub struct UpdateRoute {
    pub name: Option<String>,
    pub protocols: Option<Vec<String>>,
    pub paths: Option<Vec<String>>,
}

fn default_protocols() -> Vec<String> {
    vec!["http".to_string(), "https".to_string()]
}

/// One page of a collection, shaped like the gateway's list responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
    pub next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub size: Option<usize>,
    pub offset: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}

type Failure = (StatusCode, Json<ErrorBody>);

fn failure(status: StatusCode, message: &str) -> Failure {
    (
        status,
        Json(ErrorBody {
            message: message.to_string(),
        }),
    )
}

fn not_found() -> Failure {
    failure(StatusCode::NOT_FOUND, "Not found")
}

#[derive(Default)]
pub struct Store {
    pub ca_certificates: Vec<CaCertificate>,
    pub routes: Vec<Route>,
    page_size: usize,
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    app_with_page_size(DEFAULT_PAGE_SIZE)
}

/// An app whose list endpoints default to `page_size` entries per page.
pub fn app_with_page_size(page_size: usize) -> Router {
    let db: Db = Arc::new(RwLock::new(Store {
        page_size: page_size.max(1),
        ..Store::default()
    }));
    Router::new()
        .route("/ca_certificates", get(list_ca_certificates).post(create_ca_certificate))
        .route(
            "/ca_certificates/{id}",
            get(get_ca_certificate)
                .patch(update_ca_certificate)
                .delete(delete_ca_certificate),
        )
        .route("/routes", get(list_routes).post(create_route))
        .route("/routes/{id}", get(get_route).patch(update_route).delete(delete_route))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    serve(listener, app()).await
}

pub async fn serve(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}

pub fn encode_offset(index: usize) -> String {
    URL_SAFE.encode(index.to_string())
}

pub fn decode_offset(token: &str) -> Option<usize> {
    let bytes = URL_SAFE.decode(token).ok()?;
    String::from_utf8(bytes).ok()?.parse().ok()
}

fn paginate<T: Clone>(
    items: &[T],
    query: &PageQuery,
    default_size: usize,
    collection: &str,
) -> Result<Page<T>, Failure> {
    let start = match &query.offset {
        Some(token) => decode_offset(token)
            .ok_or_else(|| failure(StatusCode::BAD_REQUEST, "invalid offset"))?,
        None => 0,
    };
    let size = query.size.unwrap_or(default_size).max(1);
    let end = start.saturating_add(size).min(items.len());
    let data = items.get(start..end).unwrap_or_default().to_vec();
    let next = (end < items.len()).then(|| format!("/{collection}?offset={}", encode_offset(end)));
    Ok(Page { data, next })
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

// --- CA certificates ---

async fn list_ca_certificates(
    State(db): State<Db>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<CaCertificate>>, Failure> {
    let store = db.read().await;
    paginate(&store.ca_certificates, &query, store.page_size, "ca_certificates").map(Json)
}

async fn create_ca_certificate(
    State(db): State<Db>,
    Json(input): Json<CreateCaCertificate>,
) -> Result<(StatusCode, Json<CaCertificate>), Failure> {
    if input.cert.trim().is_empty() {
        return Err(failure(StatusCode::BAD_REQUEST, "cert: required field missing"));
    }
    let cert = CaCertificate {
        id: Uuid::new_v4(),
        cert: input.cert,
        cert_digest: non_empty(input.cert_digest),
        tags: input.tags,
        created_at: now(),
    };
    db.write().await.ca_certificates.push(cert.clone());
    Ok((StatusCode::CREATED, Json(cert)))
}

async fn get_ca_certificate(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<CaCertificate>, Failure> {
    let store = db.read().await;
    store
        .ca_certificates
        .iter()
        .find(|c| c.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

async fn update_ca_certificate(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateCaCertificate>,
) -> Result<Json<CaCertificate>, Failure> {
    let mut store = db.write().await;
    let cert = store
        .ca_certificates
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or_else(not_found)?;
    if let Some(value) = input.cert {
        if value.trim().is_empty() {
            return Err(failure(StatusCode::BAD_REQUEST, "cert: required field missing"));
        }
        cert.cert = value;
    }
    if let Some(digest) = input.cert_digest {
        cert.cert_digest = non_empty(Some(digest));
    }
    if let Some(tags) = input.tags {
        cert.tags = tags;
    }
    Ok(Json(cert.clone()))
}

async fn delete_ca_certificate(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    let before = store.ca_certificates.len();
    store.ca_certificates.retain(|c| c.id != id);
    if store.ca_certificates.len() == before {
        return Err(not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

// --- routes ---

async fn list_routes(
    State(db): State<Db>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<Route>>, Failure> {
    let store = db.read().await;
    paginate(&store.routes, &query, store.page_size, "routes").map(Json)
}

async fn create_route(
    State(db): State<Db>,
    Json(input): Json<CreateRoute>,
) -> (StatusCode, Json<Route>) {
    let route = Route {
        id: Uuid::new_v4(),
        name: non_empty(input.name),
        protocols: input.protocols,
        paths: input.paths,
        created_at: now(),
    };
    db.write().await.routes.push(route.clone());
    (StatusCode::CREATED, Json(route))
}

async fn get_route(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<Json<Route>, Failure> {
    let store = db.read().await;
    store
        .routes
        .iter()
        .find(|r| r.id == id)
        .cloned()
        .map(Json)
        .ok_or_else(not_found)
}

async fn update_route(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateRoute>,
) -> Result<Json<Route>, Failure> {
    let mut store = db.write().await;
    let route = store
        .routes
        .iter_mut()
        .find(|r| r.id == id)
        .ok_or_else(not_found)?;
    if let Some(name) = input.name {
        route.name = non_empty(Some(name));
    }
    if let Some(protocols) = input.protocols {
        route.protocols = protocols;
    }
    if let Some(paths) = input.paths {
        route.paths = paths;
    }
    Ok(Json(route.clone()))
}

async fn delete_route(State(db): State<Db>, Path(id): Path<Uuid>) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    let before = store.routes.len();
    store.routes.retain(|r| r.id != id);
    if store.routes.len() == before {
        return Err(not_found());
    }
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_tokens_round_trip() {
        assert_eq!(decode_offset(&encode_offset(2)), Some(2));
        assert_eq!(encode_offset(2), "Mg==");
        assert_eq!(decode_offset("not base64!"), None);
    }

    #[test]
    fn paginate_links_next_page() {
        let items = vec![1, 2, 3];
        let query = PageQuery {
            size: Some(2),
            offset: None,
        };
        let page = paginate(&items, &query, DEFAULT_PAGE_SIZE, "routes").unwrap();
        assert_eq!(page.data, vec![1, 2]);
        assert_eq!(page.next.as_deref(), Some("/routes?offset=Mg=="));

        let query = PageQuery {
            size: Some(2),
            offset: Some("Mg==".to_string()),
        };
        let page = paginate(&items, &query, DEFAULT_PAGE_SIZE, "routes").unwrap();
        assert_eq!(page.data, vec![3]);
        assert!(page.next.is_none());
    }

    #[test]
    fn offset_past_end_is_empty() {
        let items = vec![1];
        let query = PageQuery {
            size: None,
            offset: Some(encode_offset(5)),
        };
        let page = paginate(&items, &query, DEFAULT_PAGE_SIZE, "routes").unwrap();
        assert!(page.data.is_empty());
        assert!(page.next.is_none());
    }

    #[test]
    fn create_ca_certificate_defaults_optional_fields() {
        let input: CreateCaCertificate = serde_json::from_str(r#"{"cert":"PEM"}"#).unwrap();
        assert!(input.cert_digest.is_none());
        assert!(input.tags.is_empty());
    }

    #[test]
    fn create_route_defaults_protocols() {
        let input: CreateRoute = serde_json::from_str(r#"{"paths":["/api"]}"#).unwrap();
        assert_eq!(input.protocols, vec!["http", "https"]);
        assert!(input.name.is_none());
    }

    #[test]
    fn null_name_serializes_as_null() {
        let route = Route {
            id: Uuid::nil(),
            name: None,
            protocols: vec!["grpc".to_string()],
            paths: Vec::new(),
            created_at: 0,
        };
        let json = serde_json::to_value(&route).unwrap();
        assert!(json["name"].is_null());
        assert_eq!(json["id"], "00000000-0000-0000-0000-000000000000");
    }
}
