//! Infinite-scroll list screen.
//!
//! Every successful fetch appends its page to the records already held;
//! nothing is replaced or deduplicated. The `next` link of the latest page
//! is kept only as its offset token. The filter of the last `fetch` is
//! kept too, so later pages are requested with the same criteria.

use serde_json::Value;
use tracing::{debug, instrument};
use url::form_urlencoded;

use crate::cursor;
use crate::http::RequestDescriptor;
use crate::lifecycle::{RequestLifecycle, Tracking};
use crate::query::{self, Filter};
use crate::resources::ListKind;
use crate::transport::Gateway;
use crate::view::{Collaborators, ViewAction};

/// A server record plus the labels the table shows for it.
#[derive(Debug, Clone, PartialEq)]
pub struct ListRecord {
    pub record: Value,
    pub display_text: String,
    pub protocols: String,
}

impl ListRecord {
    pub fn from_server(record: Value) -> Self {
        let display_text = match record.get("name") {
            Some(Value::String(name)) => name.clone(),
            _ => object_name(record.get("id").and_then(Value::as_str).unwrap_or_default()),
        };
        let protocols = protocol_summary(record.get("protocols"));
        Self {
            record,
            display_text,
            protocols,
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.record.get("id").and_then(Value::as_str)
    }
}

/// Name shown for unnamed objects: the first group of the identifier.
pub fn object_name(id: &str) -> String {
    id.split('-').next().unwrap_or_default().to_string()
}

fn protocol_summary(protocols: Option<&Value>) -> String {
    let Some(Value::Array(items)) = protocols else {
        return "None".to_string();
    };
    if items.is_empty() {
        return "None".to_string();
    }
    items
        .iter()
        .map(|item| match item {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(", ")
        .to_uppercase()
}

/// Where the next page starts. An empty offset means there is none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NextPage {
    pub offset: String,
}

impl NextPage {
    pub fn exists(&self) -> bool {
        !self.offset.is_empty()
    }
}

pub struct ListController {
    kind: ListKind,
    lifecycle: RequestLifecycle,
    view: Collaborators,
    records: Vec<ListRecord>,
    next: NextPage,
    filter: Option<Filter>,
    page_size: Option<u32>,
}

impl ListController {
    /// Set up the chrome. Does not fetch anything.
    pub fn new(kind: ListKind, gateway: Gateway, view: Collaborators) -> Self {
        view.chrome.clear_breadcrumbs();
        view.chrome.set_title(kind.title);
        view.chrome.add_breadcrumb(kind.route, kind.title);
        view.chrome
            .add_action(ViewAction::link(kind.new_label, &kind.create_route()));

        Self {
            lifecycle: RequestLifecycle::new(gateway, view.progress.clone()),
            kind,
            view,
            records: Vec::new(),
            next: NextPage::default(),
            filter: None,
            page_size: None,
        }
    }

    /// `new`, followed by an unfiltered first fetch.
    pub async fn open(kind: ListKind, gateway: Gateway, view: Collaborators) -> Self {
        let mut controller = Self::new(kind, gateway, view);
        controller.fetch(None).await;
        controller
    }

    /// Page size sent along with `fetch_next`.
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    pub fn records(&self) -> &[ListRecord] {
        &self.records
    }

    pub fn next_page(&self) -> &NextPage {
        &self.next
    }

    /// Fetch one page and append it. Returns whether the page loaded.
    ///
    /// `filter` also applies to every following `fetch_next`.
    pub async fn fetch(&mut self, filter: Option<&Filter>) -> bool {
        self.filter = filter.cloned();
        self.load(filter).await
    }

    /// Fetch the page after the last one loaded, with the last filter.
    /// Returns `false` without a request when there is no next page.
    pub async fn fetch_next(&mut self) -> bool {
        if !self.next.exists() {
            return false;
        }
        let query = next_page_query(self.filter.as_ref(), &self.next.offset, self.page_size);
        self.load(Some(&Filter::raw(query))).await
    }

    #[instrument(skip(self, filter), fields(collection = self.kind.collection))]
    async fn load(&mut self, filter: Option<&Filter>) -> bool {
        let Self {
            kind,
            lifecycle,
            view,
            records,
            next,
            ..
        } = self;

        let request = RequestDescriptor::get(format!("{}{}", kind.collection, query::build(filter)));
        lifecycle
            .execute(&request, Tracking::Steps(1), |outcome| match outcome {
                Ok(mut page) => {
                    next.offset = cursor::decode(page.get("next").and_then(Value::as_str));
                    let items = match page.get_mut("data").map(Value::take) {
                        Some(Value::Array(items)) => items,
                        _ => Vec::new(),
                    };
                    debug!(appended = items.len(), has_next = next.exists(), "page loaded");
                    records.extend(items.into_iter().map(ListRecord::from_server));
                    true
                }
                Err(_) => {
                    view.notifier.error(kind.load_failed);
                    false
                }
            })
            .await
    }

}

/// `base` with its offset replaced by `offset`, and its size by `page_size`
/// when one is set.
fn next_page_query(base: Option<&Filter>, offset: &str, page_size: Option<u32>) -> String {
    let rendered = query::build(base);
    let mut kept = form_urlencoded::Serializer::new(String::new());
    for (key, value) in form_urlencoded::parse(rendered.trim_start_matches('?').as_bytes()) {
        if key == cursor::OFFSET_PARAM || (page_size.is_some() && key == "size") {
            continue;
        }
        kept.append_pair(&key, &value);
    }

    let mut parts = vec![kept.finish(), cursor::encode(offset)];
    if let Some(size) = page_size {
        parts.push(format!("size={size}"));
    }
    parts.retain(|part| !part.is_empty());
    parts.join("&")
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;
    use crate::client::AdminClient;
    use crate::error::ApiError;
    use crate::http::HttpResponse;
    use crate::mock::{RecordingView, ScriptedTransport, ViewEvent};
    use crate::resources::ROUTES;

    fn harness(transport: ScriptedTransport) -> (Arc<RecordingView>, Arc<ScriptedTransport>, Collaborators, Gateway) {
        let view = Arc::new(RecordingView::new("/routes"));
        let transport = Arc::new(transport);
        let gateway = Gateway::new(AdminClient::new("http://admin"), transport.clone());
        let collaborators = Collaborators::shared(view.clone());
        (view, transport, collaborators, gateway)
    }

    #[tokio::test]
    async fn pages_are_appended_not_replaced() {
        let (view, transport, collaborators, gateway) = harness(
            ScriptedTransport::new()
                .respond(HttpResponse::json(
                    200,
                    &json!({
                        "data": [
                            {"id": "a1b2c3d4-0000-0000-0000-000000000001", "name": "web", "protocols": ["http", "https"]},
                            {"id": "e5f6a7b8-0000-0000-0000-000000000002", "name": null, "protocols": null}
                        ],
                        "next": "/routes?offset=X"
                    }),
                ))
                .respond(HttpResponse::json(
                    200,
                    &json!({
                        "data": [{"id": "r3", "name": "grpc", "protocols": []}],
                        "next": null
                    }),
                )),
        );

        let mut controller = ListController::open(ROUTES, gateway, collaborators).await;
        assert_eq!(controller.records().len(), 2);
        assert_eq!(controller.next_page().offset, "X");

        assert!(controller.fetch(None).await);
        let records = controller.records();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].display_text, "web");
        assert_eq!(records[0].protocols, "HTTP, HTTPS");
        assert_eq!(records[1].display_text, "e5f6a7b8");
        assert_eq!(records[1].protocols, "None");
        assert_eq!(records[2].protocols, "None");
        assert_eq!(records[2].id(), Some("r3"));
        assert!(!controller.next_page().exists());

        let paths: Vec<_> = transport.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(paths, ["http://admin/routes", "http://admin/routes"]);
        assert_eq!(view.loader_increments(), 2);
    }

    #[tokio::test]
    async fn chrome_is_set_up_before_first_fetch() {
        let (view, _, collaborators, gateway) =
            harness(ScriptedTransport::new().respond(HttpResponse::json(200, &json!({"data": [], "next": null}))));
        ListController::open(ROUTES, gateway, collaborators).await;

        assert_eq!(
            view.events(),
            vec![
                ViewEvent::ClearBreadcrumbs,
                ViewEvent::Title("Routes".into()),
                ViewEvent::Breadcrumb {
                    path: "#!/routes".into(),
                    label: "Routes".into()
                },
                ViewEvent::Action(ViewAction::link("New Route", "#!/routes/__create__")),
                ViewEvent::LoaderSteps(1),
                ViewEvent::LoaderIncrement,
            ]
        );
    }

    #[tokio::test]
    async fn filter_is_rendered_into_endpoint() {
        let (_, transport, collaborators, gateway) =
            harness(ScriptedTransport::new().respond(HttpResponse::json(200, &json!({"data": []}))));
        let mut controller = ListController::new(ROUTES, gateway, collaborators);

        controller
            .fetch(Some(&Filter::fields().with("tags", "edge").with("size", 10)))
            .await;
        assert_eq!(transport.requests()[0].path, "http://admin/routes?size=10&tags=edge");
    }

    #[tokio::test]
    async fn fetch_next_sends_offset_and_size() {
        let (_, transport, collaborators, gateway) = harness(
            ScriptedTransport::new()
                .respond(HttpResponse::json(200, &json!({"data": [{"id": "r1"}], "next": "/routes?offset=Mg%3D%3D"})))
                .respond(HttpResponse::json(200, &json!({"data": [{"id": "r2"}], "next": null}))),
        );
        let mut controller = ListController::new(ROUTES, gateway, collaborators).with_page_size(1);
        controller.fetch(None).await;
        assert_eq!(controller.next_page().offset, "Mg==");

        assert!(controller.fetch_next().await);
        assert_eq!(transport.requests()[1].path, "http://admin/routes?offset=Mg%3D%3D&size=1");
        assert_eq!(controller.records().len(), 2);
        assert!(!controller.fetch_next().await);
        assert_eq!(transport.requests().len(), 2);
    }

    #[tokio::test]
    async fn fetch_next_keeps_the_filter() {
        let (_, transport, collaborators, gateway) = harness(
            ScriptedTransport::new()
                .respond(HttpResponse::json(200, &json!({"data": [{"id": "r1"}], "next": "/routes?offset=Mg%3D%3D"})))
                .respond(HttpResponse::json(200, &json!({"data": [{"id": "r2"}], "next": "/routes?offset=Mw%3D%3D"})))
                .respond(HttpResponse::json(200, &json!({"data": [], "next": null}))),
        );
        let mut controller = ListController::new(ROUTES, gateway, collaborators);

        controller.fetch(Some(&Filter::fields().with("tags", "edge"))).await;
        assert!(controller.fetch_next().await);
        assert!(controller.fetch_next().await);

        let paths: Vec<_> = transport.requests().into_iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            [
                "http://admin/routes?tags=edge",
                "http://admin/routes?tags=edge&offset=Mg%3D%3D",
                "http://admin/routes?tags=edge&offset=Mw%3D%3D",
            ]
        );
    }

    #[tokio::test]
    async fn new_fetch_replaces_the_kept_filter() {
        let (_, transport, collaborators, gateway) = harness(
            ScriptedTransport::new()
                .respond(HttpResponse::json(200, &json!({"data": [], "next": "/routes?offset=A"})))
                .respond(HttpResponse::json(200, &json!({"data": [], "next": "/routes?offset=B"})))
                .respond(HttpResponse::json(200, &json!({"data": [], "next": null}))),
        );
        let mut controller = ListController::new(ROUTES, gateway, collaborators);

        controller.fetch(Some(&Filter::fields().with("tags", "edge"))).await;
        controller.fetch(None).await;
        assert!(controller.fetch_next().await);
        assert_eq!(transport.requests()[2].path, "http://admin/routes?offset=B");
    }

    #[test]
    fn next_page_query_replaces_offset_and_size() {
        let base = Filter::fields().with("tags", "edge").with("size", 10).with("offset", "old");
        assert_eq!(
            next_page_query(Some(&base), "AB==", Some(2)),
            "tags=edge&offset=AB%3D%3D&size=2"
        );
        assert_eq!(
            next_page_query(Some(&base), "AB==", None),
            "size=10&tags=edge&offset=AB%3D%3D"
        );
        assert_eq!(next_page_query(Some(&Filter::raw("?tags=edge")), "X", None), "tags=edge&offset=X");
        assert_eq!(next_page_query(None, "X", Some(5)), "offset=X&size=5");
    }

    #[tokio::test]
    async fn failure_keeps_records_and_notifies() {
        let (view, _, collaborators, gateway) = harness(
            ScriptedTransport::new()
                .respond(HttpResponse::json(200, &json!({"data": [{"id": "r1"}], "next": "/routes?offset=X"})))
                .fail(ApiError::Transport("timed out".into())),
        );
        let mut controller = ListController::open(ROUTES, gateway, collaborators).await;

        assert!(!controller.fetch(None).await);
        assert_eq!(controller.records().len(), 1);
        assert_eq!(controller.next_page().offset, "X");
        assert_eq!(view.notifications(), vec![ViewEvent::Error("Could not load list of routes.".into())]);
        assert_eq!(view.loader_increments(), 2);
    }

    #[test]
    fn object_name_uses_first_group() {
        assert_eq!(object_name("3f2a9c1d-1111-2222-3333-444455556666"), "3f2a9c1d");
        assert_eq!(object_name("plain"), "plain");
        assert_eq!(object_name(""), "");
    }
}
