use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use brandflow_application::{
    AuthService, PortalService, RecordStore, StoreTable, WebhookIntakeService,
    WebhookSignaturePolicy,
};
use brandflow_core::ClientId;
use brandflow_infrastructure::{
    HmacSha256SignatureVerifier, InMemoryRecordStore, SupabaseAuthProvider,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::postgres::PgPoolOptions;
use tower::ServiceExt;
use tower_sessions::{MemoryStore, SessionManagerLayer};

use crate::handlers::webhooks::SIGNATURE_HEADER;
use crate::state::AppState;

use super::build_router;

const FRONTEND_URL: &str = "http://localhost:3000";
const WEBHOOK_SECRET: &str = "zapier-shared-secret";
const ALL_TABLES: [StoreTable; 7] = [
    StoreTable::AutomationRuns,
    StoreTable::Leads,
    StoreTable::Automations,
    StoreTable::Contacts,
    StoreTable::Clients,
    StoreTable::ClientUsers,
    StoreTable::Metrics,
];

struct TestApp {
    router: Router,
    store: Arc<InMemoryRecordStore>,
    signer: HmacSha256SignatureVerifier,
}

impl TestApp {
    fn new(bound_client: Option<ClientId>) -> Self {
        let Ok(verifier) = HmacSha256SignatureVerifier::new(WEBHOOK_SECRET) else {
            panic!("verifier should accept the test secret");
        };
        Self::with_policy(
            WebhookSignaturePolicy::Required(Arc::new(verifier)),
            bound_client,
        )
    }

    fn with_policy(policy: WebhookSignaturePolicy, bound_client: Option<ClientId>) -> Self {
        let store = Arc::new(InMemoryRecordStore::new());
        let record_store: Arc<dyn RecordStore> = store.clone();

        let Ok(signer) = HmacSha256SignatureVerifier::new(WEBHOOK_SECRET) else {
            panic!("signer should accept the test secret");
        };

        let mut webhook_service = WebhookIntakeService::new(record_store.clone(), policy);
        if let Some(client_id) = bound_client {
            webhook_service = webhook_service.with_bound_client(client_id);
        }

        let Ok(auth_provider) =
            SupabaseAuthProvider::new(reqwest::Client::new(), "http://127.0.0.1:9", "anon")
        else {
            panic!("auth provider url should parse");
        };
        let Ok(pool) = PgPoolOptions::new().connect_lazy("postgres://brandflow@127.0.0.1:1/brandflow")
        else {
            panic!("lazy pool should build");
        };

        let state = AppState {
            webhook_service,
            auth_service: AuthService::new(
                Arc::new(auth_provider),
                format!("{FRONTEND_URL}/api/auth/callback"),
            ),
            portal_service: PortalService::new(record_store),
            postgres_pool: pool,
            frontend_url: FRONTEND_URL.to_owned(),
        };

        let Ok(router) = build_router(
            state,
            FRONTEND_URL,
            SessionManagerLayer::new(MemoryStore::default()),
        ) else {
            panic!("router should build");
        };

        Self {
            router,
            store,
            signer,
        }
    }

    fn signed_post(&self, uri: &str, body: &str) -> Request<Body> {
        self.post_with_signature(uri, body, &self.signer.sign(body.as_bytes()))
    }

    fn post_with_signature(&self, uri: &str, body: &str, signature: &str) -> Request<Body> {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(SIGNATURE_HEADER, signature)
            .body(Body::from(body.to_owned()));
        let Ok(request) = request else {
            panic!("request should build");
        };
        request
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let Ok(response) = self.router.clone().oneshot(request).await else {
            panic!("router is infallible");
        };
        let status = response.status();
        let Ok(collected) = response.into_body().collect().await else {
            panic!("body should be readable");
        };
        let body = serde_json::from_slice(&collected.to_bytes()).unwrap_or(Value::Null);
        (status, body)
    }

    async fn row_count(&self) -> usize {
        let mut count = 0;
        for table in ALL_TABLES {
            count += self.store.rows(table).await.len();
        }
        count
    }
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    let Ok(request) = Request::builder().method(method).uri(uri).body(Body::empty()) else {
        panic!("request should build");
    };
    request
}

#[tokio::test]
async fn signed_automation_run_is_recorded_verbatim() {
    let app = TestApp::new(None);
    let body = json!({
        "type": "automation_run",
        "data": {
            "automation_id": "zap-42",
            "status": "success",
            "started_at": "2025-03-01T10:00:00Z",
            "completed_at": "2025-03-01T10:00:04Z",
            "logs": ["step 1 ok"],
            "results": { "records": 3 },
        }
    })
    .to_string();

    let (status, response) = app.send(app.signed_post("/api/webhooks/zapier", &body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "success": true }));

    let runs = app.store.rows(StoreTable::AutomationRuns).await;
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["automation_id"], json!("zap-42"));
    assert_eq!(runs[0]["logs"], json!(["step 1 ok"]));
    assert_eq!(runs[0]["results"], json!({ "records": 3 }));
}

#[tokio::test]
async fn invalid_signature_is_rejected_without_writes() {
    let app = TestApp::new(None);
    let body = json!({ "type": "new_lead", "data": { "email": "a@b.io" } }).to_string();
    let forged = app.signer.sign(b"a different body");

    let (status, response) = app
        .send(app.post_with_signature("/api/webhooks/zapier", &body, &forged))
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(response, json!({ "error": "Invalid signature" }));
    assert_eq!(app.row_count().await, 0);
}

#[tokio::test]
async fn missing_signature_is_rejected() {
    let app = TestApp::new(None);
    let Ok(request) = Request::builder()
        .method("POST")
        .uri("/api/webhooks/zapier")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"type":"automation_run","data":{}}"#))
    else {
        panic!("request should build");
    };

    let (status, _) = app.send(request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(app.row_count().await, 0);
}

#[tokio::test]
async fn non_post_methods_are_not_allowed() {
    let app = TestApp::new(None);

    for uri in ["/api/webhooks/zapier", "/api/webhooks/zapier/contacts"] {
        let (status, response) = app.send(empty_request("GET", uri)).await;

        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response, json!({ "error": "Method not allowed" }));
    }
    assert_eq!(app.row_count().await, 0);
}

#[tokio::test]
async fn unrecognized_event_type_is_acknowledged_without_writes() {
    let app = TestApp::new(None);
    let body = json!({ "type": "zap_paused", "data": { "id": 7 } }).to_string();

    let (status, response) = app.send(app.signed_post("/api/webhooks/zapier", &body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "success": true }));
    assert_eq!(app.row_count().await, 0);
}

#[tokio::test]
async fn malformed_payload_is_a_bad_request() {
    let app = TestApp::new(None);

    for body in ["{not json", r#"{"type":"new_lead","data":"flat"}"#] {
        let (status, response) = app.send(app.signed_post("/api/webhooks/zapier", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "body: {body}");
        assert!(response.get("error").is_some());
    }
    assert_eq!(app.row_count().await, 0);
}

#[tokio::test]
async fn automation_update_without_match_still_succeeds() {
    let app = TestApp::new(None);
    let body = json!({
        "type": "automation_update",
        "data": { "external_id": "zap-unknown", "total_runs": 3 }
    })
    .to_string();

    let (status, _) = app.send(app.signed_post("/api/webhooks/zapier", &body)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.row_count().await, 0);
}

#[tokio::test]
async fn partial_automation_update_keeps_absent_counters() {
    let app = TestApp::new(None);
    let Value::Object(seed) = json!({
        "external_id": "zap-1",
        "status": "active",
        "total_runs": 2,
        "successful_runs": 2,
        "last_run_at": "2025-03-01T10:00:00Z",
    }) else {
        panic!("seed must be an object");
    };
    let Ok(_) = app.store.insert(StoreTable::Automations, seed).await else {
        panic!("seed insert should succeed");
    };

    let body = json!({
        "type": "automation_update",
        "data": { "external_id": "zap-1", "total_runs": 5 }
    })
    .to_string();
    let (status, _) = app.send(app.signed_post("/api/webhooks/zapier", &body)).await;

    assert_eq!(status, StatusCode::OK);
    let automations = app.store.rows(StoreTable::Automations).await;
    let [automation] = automations.as_slice() else {
        panic!("expected the seeded automation only");
    };
    assert_eq!(automation["total_runs"], json!(5));
    assert_eq!(automation["status"], json!("active"));
    assert_eq!(automation["successful_runs"], json!(2));
    assert_eq!(automation["last_run_at"], json!("2025-03-01T10:00:00Z"));
}

#[tokio::test]
async fn non_string_event_types_are_acknowledged_without_writes() {
    let app = TestApp::new(None);

    for body in [
        r#"{"type":null,"data":{}}"#,
        r#"{"type":7,"data":{"email":"a@b.io"}}"#,
        r#"{"data":{}}"#,
    ] {
        let (status, response) = app.send(app.signed_post("/api/webhooks/zapier", body)).await;

        assert_eq!(status, StatusCode::OK, "body: {body}");
        assert_eq!(response, json!({ "success": true }));
    }
    assert_eq!(app.row_count().await, 0);
}

#[tokio::test]
async fn open_intake_accepts_unsigned_events() {
    let app = TestApp::with_policy(WebhookSignaturePolicy::Open, None);
    let Ok(request) = Request::builder()
        .method("POST")
        .uri("/api/webhooks/zapier")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            r#"{"type":"automation_run","data":{"automation_id":"zap-9","status":"success"}}"#,
        ))
    else {
        panic!("request should build");
    };

    let (status, response) = app.send(request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({ "success": true }));
    let runs = app.store.rows(StoreTable::AutomationRuns).await;
    assert_eq!(runs.len(), 1);
    assert_eq!(runs[0]["automation_id"], json!("zap-9"));
}

#[tokio::test]
async fn bound_client_rejects_leads_for_other_clients() {
    let bound = ClientId::new();
    let app = TestApp::new(Some(bound));
    let body = json!({
        "type": "new_lead",
        "data": { "client_id": ClientId::new().to_string(), "email": "lead@acme.io" }
    })
    .to_string();

    let (status, _) = app.send(app.signed_post("/api/webhooks/zapier", &body)).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert!(app.store.rows(StoreTable::Leads).await.is_empty());

    let own_lead = json!({
        "type": "new_lead",
        "data": { "client_id": bound.to_string(), "email": "lead@acme.io" }
    })
    .to_string();
    let (status, _) = app
        .send(app.signed_post("/api/webhooks/zapier", &own_lead))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.store.rows(StoreTable::Leads).await.len(), 1);
}

#[tokio::test]
async fn contact_intake_echoes_stored_row() {
    let app = TestApp::new(None);
    let body = json!({ "email": "hello@acme.io", "name": "Ada" }).to_string();

    let (status, response) = app
        .send(app.signed_post("/api/webhooks/zapier/contacts", &body))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(response["success"], json!(true));
    assert_eq!(response["data"]["email"], json!("hello@acme.io"));
    assert!(response["data"]["id"].is_string());
    assert_eq!(app.store.rows(StoreTable::Contacts).await.len(), 1);
}

#[tokio::test]
async fn cross_origin_auth_mutations_are_blocked() {
    let app = TestApp::new(None);
    let Ok(request) = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::ORIGIN, "https://evil.example")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"email":"a@b.io","password":"secret123"}"#))
    else {
        panic!("request should build");
    };

    let (status, _) = app.send(request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn portal_routes_require_a_session() {
    let app = TestApp::new(None);

    for uri in ["/auth/me", "/api/portal/dashboard"] {
        let (status, response) = app.send(empty_request("GET", uri)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "uri: {uri}");
        assert_eq!(response, json!({ "error": "authentication required" }));
    }
}

#[tokio::test]
async fn oauth_callback_without_code_is_a_bad_request() {
    let app = TestApp::new(None);

    let (status, response) = app
        .send(empty_request("GET", "/api/auth/callback"))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(response, json!({ "error": "Missing code parameter" }));
}
