//! Router construction.
//!
//! Builds the axum router with all routes and middleware.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::handlers::{api, dashboard, pages};
use crate::middleware::{security, timing};
use crate::state::AppState;
use crate::static_files;

/// Create the application router.
pub(crate) fn create_router(state: Arc<AppState>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(pages::health))
        .route("/new", post(api::new_document));

    Router::new()
        .route("/", get(pages::home))
        .route("/d/{id}", get(pages::document))
        .route("/raw/{id}", get(pages::raw))
        .route("/render", get(pages::render))
        .route("/render-embed", post(api::render_embed))
        .route("/health", get(pages::health))
        .route("/dash", get(dashboard::home))
        .route("/dash/", get(dashboard::home))
        .route("/dash/status", get(dashboard::status))
        .nest("/api", api_routes)
        .merge(static_files::static_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(axum::middleware::from_fn(timing::timing_middleware))
                .layer(security::csp_layer())
                .layer(security::content_type_options_layer())
                .layer(security::frame_options_layer()),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::response::Response;
    use mds_renderer::{CodeFormatter, EMPTY_DOCUMENT_HTML, RENDER_ERROR_HTML};
    use mds_store::{
        ApiKey, ApiUsage, Document, DocumentStore, MemoryStore, StoreError, StoreErrorKind, User,
        hash_secret,
    };
    use pretty_assertions::assert_eq;
    use tower::ServiceExt;

    use super::*;
    use crate::ServerConfig;

    const API_KEY: &str = "0123456789abcdef0123456789abcdef0123456789abcdef";

    fn seeded_store() -> Arc<MemoryStore> {
        Arc::new(
            MemoryStore::new()
                .with_document(
                    "doc-1",
                    "Guide",
                    "# Guide\n\n!!! warning Careful\n    Body text.\n",
                )
                .with_document("raw-1", "Raw", "# Raw  \r\n\n<script>x</script>\n\u{1F600}")
                .with_api_key(hash_secret(API_KEY)),
        )
    }

    fn router_with(store: Arc<dyn DocumentStore>, config: &ServerConfig) -> Router {
        create_router(Arc::new(AppState::new(store, config)))
    }

    fn router(store: Arc<MemoryStore>) -> Router {
        router_with(store, &ServerConfig::default())
    }

    struct ExplodingFormatter;

    impl CodeFormatter for ExplodingFormatter {
        fn format(&self, _code: &str, _language: Option<&str>) -> String {
            panic!("formatter exploded")
        }
    }

    /// Router whose pipeline fails on any code block.
    fn failing_router() -> Router {
        let state = AppState::with_formatter(
            seeded_store(),
            &ServerConfig::default(),
            Box::new(ExplodingFormatter),
        );
        create_router(Arc::new(state))
    }

    const CODE_BLOCK: &str = "```\ncode\n```";

    async fn send(router: Router, request: Request<Body>) -> Response {
        router.oneshot(request).await.unwrap()
    }

    async fn get(router: Router, uri: &str) -> Response {
        send(router, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    async fn body_string(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn header_value<'a>(response: &'a Response, name: &str) -> &'a str {
        response.headers().get(name).unwrap().to_str().unwrap()
    }

    fn post_json(uri: &str, body: &str, api_key: Option<&str>) -> Request<Body> {
        let mut builder = Request::post(uri).header(header::CONTENT_TYPE, "application/json");
        if let Some(key) = api_key {
            builder = builder.header("X-API-KEY", key);
        }
        builder.body(Body::from(body.to_owned())).unwrap()
    }

    /// Store that authenticates API keys but fails every document operation.
    struct FailingStore(MemoryStore);

    fn unavailable() -> StoreError {
        StoreError::new(StoreErrorKind::Unavailable).with_backend("Test")
    }

    #[async_trait]
    impl DocumentStore for FailingStore {
        async fn get_document(&self, _id: &str) -> Result<Option<Document>, StoreError> {
            Err(unavailable())
        }
        async fn create_document(&self, _: &str, _: &str) -> Result<Document, StoreError> {
            Err(unavailable())
        }
        async fn delete_document(&self, _id: &str) -> Result<bool, StoreError> {
            Err(unavailable())
        }
        async fn create_api_key(&self, hash: &str, d: Option<&str>) -> Result<ApiKey, StoreError> {
            self.0.create_api_key(hash, d).await
        }
        async fn find_api_key(&self, hash: &str) -> Result<Option<ApiKey>, StoreError> {
            self.0.find_api_key(hash).await
        }
        async fn list_api_keys(&self) -> Result<Vec<ApiKey>, StoreError> {
            self.0.list_api_keys().await
        }
        async fn log_api_usage(
            &self,
            api_key: &str,
            endpoint: &str,
            client_ip: Option<&str>,
        ) -> Result<ApiUsage, StoreError> {
            self.0.log_api_usage(api_key, endpoint, client_ip).await
        }
        async fn find_user(&self, _: &str) -> Result<Option<User>, StoreError> {
            Err(unavailable())
        }
        async fn create_user(&self, _: &str, _: Option<&str>) -> Result<User, StoreError> {
            Err(unavailable())
        }
    }

    #[tokio::test]
    async fn test_health() {
        for uri in ["/health", "/api/health"] {
            let response = get(router(seeded_store()), uri).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(body_string(response).await, r#"{"status":"ok"}"#);
        }
    }

    #[tokio::test]
    async fn test_home_page() {
        let response = get(router(seeded_store()), "/").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(header_value(&response, "content-type").starts_with("text/html"));
        assert!(header_value(&response, "content-security-policy").contains("default-src 'self'"));
        assert_eq!(header_value(&response, "x-content-type-options"), "nosniff");
        assert!(response.headers().contains_key("x-process-time"));

        let html = body_string(response).await;
        assert!(html.contains("<title>Home | md-server</title>"));
        assert!(html.contains(r#"<div class="admonition admonition-success">"#));
        assert!(html.contains("<table>"));
    }

    #[tokio::test]
    async fn test_document_page() {
        let response = get(router(seeded_store()), "/d/doc-1").await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("<title>Guide | md-server</title>"));
        assert!(html.contains(r#"<span class="admonition-title">Careful</span>"#));
    }

    #[tokio::test]
    async fn test_document_not_found() {
        let response = get(router(seeded_store()), "/d/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(header_value(&response, "content-type").starts_with("text/html"));
        let html = body_string(response).await;
        assert!(html.contains("Document not found"));
        assert!(html.contains("<code>missing</code>"));
    }

    #[tokio::test]
    async fn test_raw_is_byte_for_byte() {
        let response = get(router(seeded_store()), "/raw/raw-1").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            header_value(&response, "content-type"),
            "text/markdown; charset=utf-8"
        );
        assert_eq!(
            body_string(response).await,
            "# Raw  \r\n\n<script>x</script>\n\u{1F600}"
        );
    }

    #[tokio::test]
    async fn test_raw_not_found() {
        let response = get(router(seeded_store()), "/raw/missing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(header_value(&response, "content-type").starts_with("text/plain"));
        assert_eq!(body_string(response).await, "Document not found");
    }

    #[tokio::test]
    async fn test_render_query() {
        let query = serde_urlencoded::to_string([
            ("md", "**bold** <script>alert(1)</script>"),
            ("title", "Preview"),
        ])
        .unwrap();
        let response = get(router(seeded_store()), &format!("/render?{query}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("<title>Preview | md-server</title>"));
        assert!(html.contains("<strong>bold</strong>"));
        assert!(!html.contains("alert(1)"));
    }

    #[tokio::test]
    async fn test_render_defaults() {
        let response = get(router(seeded_store()), "/render").await;
        let html = body_string(response).await;
        assert!(html.contains("<title>Document | md-server</title>"));
        assert!(html.contains(EMPTY_DOCUMENT_HTML));
    }

    #[tokio::test]
    async fn test_render_failure_degrades_inline() {
        let query = serde_urlencoded::to_string([("md", CODE_BLOCK)]).unwrap();
        let response = get(failing_router(), &format!("/render?{query}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains(RENDER_ERROR_HTML));
    }

    #[tokio::test]
    async fn test_render_unbalanced_markup_keeps_content() {
        let source = "# Report\n\nLots of content.\n\n!!! note\n    <div>\n\nMore content.\n";
        let query = serde_urlencoded::to_string([("md", source)]).unwrap();
        let response = get(router(seeded_store()), &format!("/render?{query}")).await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_string(response).await;
        assert!(html.contains("Lots of content."));
        assert!(html.contains("More content."));
        assert!(!html.contains(RENDER_ERROR_HTML));
    }

    #[tokio::test]
    async fn test_render_embed_fragment_only() {
        let request = post_json("/render-embed", r##"{"md": "# Title\n\ntext"}"##, None);
        let response = send(router(seeded_store()), request).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(header_value(&response, "content-type").starts_with("text/html"));
        let html = body_string(response).await;
        assert!(html.starts_with("<h1"));
        assert!(!html.contains("<html"));
    }

    #[tokio::test]
    async fn test_render_embed_failure_is_500() {
        let body = serde_json::json!({ "md": CODE_BLOCK }).to_string();
        let request = post_json("/render-embed", &body, None);
        let response = send(failing_router(), request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_string(response).await,
            r#"{"error":"Error rendering markdown content."}"#
        );
    }

    #[tokio::test]
    async fn test_render_embed_invalid_body() {
        let request = post_json("/render-embed", "not json", None);
        let response = send(router(seeded_store()), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_new_document_requires_key() {
        let store = seeded_store();
        let response = send(router(Arc::clone(&store)), post_json("/api/new", "{}", None)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_string(response).await, r#"{"error":"API key required"}"#);

        let request = post_json("/api/new", "{}", Some("wrong"));
        let response = send(router(Arc::clone(&store)), request).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_string(response).await, r#"{"error":"Invalid API key"}"#);
        assert!(store.usage().is_empty());
    }

    #[tokio::test]
    async fn test_new_document_defaults_and_usage() {
        let store = seeded_store();
        let request = post_json("/api/new", "{}", Some(API_KEY));
        let response = send(router(Arc::clone(&store)), request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["title"], "Untitled");
        assert_eq!(body["content"], "");
        assert!(body["created_at"].is_string());

        let id = body["id"].as_str().unwrap();
        let created = store.get_document(id).await.unwrap().unwrap();
        assert_eq!(created.title, "Untitled");

        let usage = store.usage();
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].api_key, hash_secret(API_KEY));
        assert_eq!(usage[0].endpoint, "/api/new");
    }

    #[tokio::test]
    async fn test_new_document_then_raw() {
        let store = seeded_store();
        let content = "# Hello\n\n- [x] done\n";
        let body = serde_json::json!({"title": "Hello", "content": content}).to_string();
        let response = send(
            router(Arc::clone(&store)),
            post_json("/api/new", &body, Some(API_KEY)),
        )
        .await;
        let created: serde_json::Value =
            serde_json::from_str(&body_string(response).await).unwrap();
        let id = created["id"].as_str().unwrap();

        let response = get(router(store), &format!("/raw/{id}")).await;
        assert_eq!(body_string(response).await, content);
    }

    #[tokio::test]
    async fn test_new_document_invalid_body() {
        let request = post_json("/api/new", "[1, 2", Some(API_KEY));
        let response = send(router(seeded_store()), request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_string(response).await, r#"{"error":"Invalid request body"}"#);
    }

    #[tokio::test]
    async fn test_store_failures() {
        let store: Arc<dyn DocumentStore> = Arc::new(FailingStore(
            MemoryStore::new().with_api_key(hash_secret(API_KEY)),
        ));
        let app = router_with(store, &ServerConfig::default());

        let response = get(app.clone(), "/d/any").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let request = post_json("/api/new", "{}", Some(API_KEY));
        let response = send(app, request).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body_string(response).await,
            r#"{"error":"Failed to create document"}"#
        );
    }

    fn dash_request(uri: &str, uid: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(uri);
        if let Some(uid) = uid {
            builder = builder
                .header("X-authentik-uid", uid)
                .header("X-authentik-username", "alice");
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_dashboard_creates_user() {
        let store = seeded_store();
        let app = router(Arc::clone(&store));
        let response = send(app, dash_request("/dash/", Some("uid-1"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(body_string(response).await.contains("<strong>alice</strong>"));
        assert_eq!(store.user_count(), 1);

        let user = store.find_user(&hash_secret("uid-1")).await.unwrap().unwrap();
        let response = send(router(store), dash_request("/dash/status", Some("uid-1"))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["authenticated"], true);
        assert_eq!(body["user_id"], user.id);
        assert_eq!(body["username"], "alice");
    }

    #[tokio::test]
    async fn test_dashboard_status_unknown_user() {
        let store = seeded_store();
        let app = router(Arc::clone(&store));
        let response = send(app, dash_request("/dash/status", Some("uid-2"))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(store.user_count(), 0);

        let response = send(router(store), dash_request("/dash/", None)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_dashboard_without_user_creation() {
        let store = seeded_store();
        let config = ServerConfig {
            create_users: false,
            ..ServerConfig::default()
        };
        let app = router_with(Arc::clone(&store) as Arc<dyn DocumentStore>, &config);
        let response = send(app, dash_request("/dash/", Some("uid-3"))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_string(response).await, r#"{"error":"User not recognized"}"#);
        assert_eq!(store.user_count(), 0);
    }

    #[tokio::test]
    async fn test_dashboard_disabled() {
        let store = Arc::new(MemoryStore::new().with_user(hash_secret("uid-4"), Some("bob")));
        let config = ServerConfig {
            auth_disabled: true,
            ..ServerConfig::default()
        };
        let app = router_with(store, &config);
        let response = send(app, dash_request("/dash/status", Some("uid-4"))).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            body_string(response).await,
            r#"{"error":"Authenticated endpoints are disabled"}"#
        );
    }

    #[tokio::test]
    async fn test_static_stylesheet() {
        let response = get(router(seeded_store()), "/static/style.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(header_value(&response, "content-type"), "text/css; charset=utf-8");
        assert_eq!(header_value(&response, "cache-control"), "public, max-age=3600");

        let config = ServerConfig {
            no_cache: true,
            ..ServerConfig::default()
        };
        let response = get(router_with(seeded_store(), &config), "/static/style.css").await;
        assert_eq!(
            header_value(&response, "cache-control"),
            "no-cache, no-store, must-revalidate"
        );

        let response = get(router(seeded_store()), "/static/missing.js").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
