// src/routes.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

/// Monta o router completo. Usado pelo `main` e pelos testes.
pub fn app(app_state: AppState) -> Router {
    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/google", get(handlers::auth::google_login))
        .route("/google/callback", get(handlers::auth::google_callback));

    let user_routes = Router::new().route("/me", get(handlers::auth::get_me));

    let student_routes = Router::new().route(
        "/complaints",
        post(handlers::student::file_complaint).get(handlers::student::list_my_complaints),
    );

    let mentor_routes = Router::new()
        .route("/complaints", get(handlers::mentor::list_mentee_complaints))
        .route("/complaints/{id}", put(handlers::mentor::review_complaint))
        .route("/mentees", get(handlers::mentor::list_mentees));

    let warden_routes = Router::new()
        .route("/complaints", get(handlers::warden::get_board))
        .route("/complaints/{id}", put(handlers::warden::update_complaint));

    let admin_routes = Router::new()
        .route(
            "/hostels",
            get(handlers::admin::list_hostels).post(handlers::admin::create_hostel),
        )
        .route(
            "/hostels/{id}",
            get(handlers::admin::get_hostel)
                .put(handlers::admin::update_hostel)
                .delete(handlers::admin::delete_hostel),
        )
        .route(
            "/hostels/{id}/rooms",
            get(handlers::admin::list_rooms).post(handlers::admin::generate_rooms),
        )
        .route(
            "/users",
            get(handlers::admin::list_users).post(handlers::admin::create_user),
        )
        .route(
            "/users/{id}",
            get(handlers::admin::get_user)
                .put(handlers::admin::update_user)
                .delete(handlers::admin::delete_user),
        )
        .route("/users/{id}/profile", get(handlers::admin::student_profile))
        .route(
            "/complaints",
            get(handlers::admin::list_complaints).post(handlers::admin::create_complaint),
        )
        .route("/complaints/summary", get(handlers::admin::complaint_summary))
        .route(
            "/complaints/{id}",
            get(handlers::admin::get_complaint)
                .put(handlers::admin::update_complaint)
                .delete(handlers::admin::delete_complaint),
        );

    // Tudo que exige login passa pelo auth_guard; o papel é checado em cada serviço
    let protected = Router::new()
        .nest("/users", user_routes)
        .nest("/student", student_routes)
        .nest("/mentor", mentor_routes)
        .nest("/warden", warden_routes)
        .nest("/admin", admin_routes)
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api", protected)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::{
        config::Config,
        db::{memory::MemoryStore, Store},
        models::user::{NewUser, Role},
        services::{auth::hash_password, moderation::Blocklist},
    };

    const PASSWORD: &str = "secret123";

    fn test_config() -> Config {
        Config {
            database_url: "postgres://unused".into(),
            jwt_secret: "router-test-secret".into(),
            bind_addr: "127.0.0.1:0".into(),
            db_max_connections: 1,
            blocklist_path: "bad_words.txt".into(),
            bcrypt_cost: 4,
            token_ttl_hours: 1,
            google: None,
            bootstrap_admin: None,
        }
    }

    struct TestApp {
        router: Router,
        store: MemoryStore,
    }

    impl TestApp {
        fn new() -> Self {
            let store = MemoryStore::new();
            let state = AppState::with_store(
                test_config(),
                Arc::new(store.clone()),
                Blocklist::parse("idiot\nstupid"),
                None,
            );
            Self {
                router: app(state),
                store,
            }
        }

        async fn seed_user(&self, email: &str, role: Role, hostel_id: Option<Uuid>) -> Uuid {
            let password_hash = hash_password(PASSWORD, 4).await.expect("hash");
            let mut tx = self.store.begin().await.expect("begin");
            let user = tx
                .insert_user(&NewUser {
                    email: email.into(),
                    name: None,
                    password_hash: Some(password_hash),
                    role,
                    hostel_id,
                    room_number: None,
                    mentor_id: None,
                })
                .await
                .expect("user");
            tx.commit().await.expect("commit");
            user.id
        }

        async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
            let mut builder = Request::builder().method(method).uri(uri);
            if let Some(token) = token {
                builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }
            let request = match body {
                Some(json) => builder
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(json.to_string())),
                None => builder.body(Body::empty()),
            }
            .expect("request");

            let response = self.router.clone().oneshot(request).await.expect("response");
            let status = response.status();
            let bytes = response.into_body().collect().await.expect("body").to_bytes();
            let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, value)
        }

        async fn login(&self, email: &str) -> String {
            let (status, body) = self
                .send(
                    Method::POST,
                    "/api/auth/login",
                    None,
                    Some(json!({ "email": email, "password": PASSWORD })),
                )
                .await;
            assert_eq!(status, StatusCode::OK, "{body}");
            body["token"].as_str().expect("token").to_string()
        }
    }

    #[tokio::test]
    async fn health_is_public() {
        let app = TestApp::new();
        let request = Request::builder().uri("/api/health").body(Body::empty()).expect("request");

        let response = app.router.clone().oneshot(request).await.expect("response");

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn protected_routes_require_a_token() {
        let app = TestApp::new();

        let (status, body) = app.send(Method::GET, "/api/student/complaints", None, None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn errors_follow_accept_language() {
        let app = TestApp::new();
        let request = Request::builder()
            .uri("/api/users/me")
            .header(header::ACCEPT_LANGUAGE, "pt-BR,pt;q=0.9")
            .body(Body::empty())
            .expect("request");

        let response = app.router.clone().oneshot(request).await.expect("response");
        let bytes = response.into_body().collect().await.expect("body").to_bytes();
        let body: Value = serde_json::from_slice(&bytes).expect("json");

        assert_eq!(body["error"], "Token de autenticação inválido ou ausente.");
    }

    #[tokio::test]
    async fn login_returns_the_role_landing_path() {
        let app = TestApp::new();
        app.seed_user("mentor@kiit.ac.in", Role::Mentor, None).await;

        let (status, body) = app
            .send(
                Method::POST,
                "/api/auth/login",
                None,
                Some(json!({ "email": "mentor@kiit.ac.in", "password": PASSWORD })),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["role"], "mentor");
        assert_eq!(body["redirectTo"], "/mentor/dashboard");
    }

    #[tokio::test]
    async fn sso_is_unavailable_without_configuration() {
        let app = TestApp::new();

        let (status, _) = app.send(Method::GET, "/api/auth/google", None, None).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn wrong_role_is_forbidden_with_a_safe_redirect() {
        let app = TestApp::new();
        app.seed_user("mentor@kiit.ac.in", Role::Mentor, None).await;
        let token = app.login("mentor@kiit.ac.in").await;

        let (status, body) = app
            .send(
                Method::POST,
                "/api/student/complaints",
                Some(&token),
                Some(json!({ "heading": "wifi down", "description": "d", "category": "wifi" })),
            )
            .await;

        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["redirectTo"], "/");
    }

    #[tokio::test]
    async fn student_filing_is_validated() {
        let app = TestApp::new();
        let admin = app.seed_user("admin@kiit.ac.in", Role::Admin, None).await;
        assert_ne!(admin, Uuid::nil());
        let admin_token = app.login("admin@kiit.ac.in").await;

        let (_, hostel) = app
            .send(
                Method::POST,
                "/api/admin/hostels",
                Some(&admin_token),
                Some(json!({ "name": "West Wing", "gender": "Boys", "totalRooms": 3 })),
            )
            .await;
        let hostel_id: Uuid = serde_json::from_value(hostel["id"].clone()).expect("hostel id");
        app.seed_user("student@kiit.ac.in", Role::Student, Some(hostel_id)).await;
        let token = app.login("student@kiit.ac.in").await;

        let (status, body) = app
            .send(
                Method::POST,
                "/api/student/complaints",
                Some(&token),
                Some(json!({ "heading": "", "description": "", "category": "wifi" })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"]["heading"].is_array());

        let (status, body) = app
            .send(
                Method::POST,
                "/api/student/complaints",
                Some(&token),
                Some(json!({ "heading": "stupid fan", "description": "broken", "category": "electric" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["flagged"], true);
        assert_eq!(body["status"], "flagged");
        assert_eq!(body["isAbusive"], true);
    }

    #[tokio::test]
    async fn west_wing_over_http() {
        let app = TestApp::new();
        app.seed_user("admin@kiit.ac.in", Role::Admin, None).await;
        let admin_token = app.login("admin@kiit.ac.in").await;

        // 1. Admin cria o bloco com 10 quartos
        let (status, hostel) = app
            .send(
                Method::POST,
                "/api/admin/hostels",
                Some(&admin_token),
                Some(json!({ "name": "West Wing", "gender": "Boys", "totalRooms": 10 })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{hostel}");
        let rooms = hostel["rooms"].as_array().expect("rooms");
        assert_eq!(rooms.len(), 10);
        assert_eq!(rooms[0]["roomNumber"], "101");
        assert_eq!(rooms[9]["roomNumber"], "110");
        let hostel_id = hostel["id"].as_str().expect("id").to_string();

        // 2. Admin cria o estudante e o warden do bloco
        for (email, role) in [("student@kiit.ac.in", "student"), ("warden@kiit.ac.in", "warden")] {
            let (status, body) = app
                .send(
                    Method::POST,
                    "/api/admin/users",
                    Some(&admin_token),
                    Some(json!({
                        "email": email,
                        "name": "Someone",
                        "password": PASSWORD,
                        "role": role,
                        "hostelId": hostel_id,
                    })),
                )
                .await;
            assert_eq!(status, StatusCode::CREATED, "{body}");
        }

        // 3. Estudante registra a reclamação
        let student_token = app.login("student@kiit.ac.in").await;
        let (status, filed) = app
            .send(
                Method::POST,
                "/api/student/complaints",
                Some(&student_token),
                Some(json!({ "heading": "wifi down", "description": "router dead", "category": "wifi" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(filed["status"], "pending");
        let complaint_id = filed["id"].as_str().expect("id").to_string();
        let uri = format!("/api/warden/complaints/{complaint_id}");

        // 4. Warden: status inválido não muda nada; depois in_progress e resolved
        let warden_token = app.login("warden@kiit.ac.in").await;
        let (status, _) = app
            .send(Method::PUT, &uri, Some(&warden_token), Some(json!({ "status": "done" })))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = app
            .send(Method::PUT, &uri, Some(&warden_token), Some(json!({ "status": "in_progress" })))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["resolvedAt"].is_null());

        let (status, body) = app
            .send(
                Method::PUT,
                &uri,
                Some(&warden_token),
                Some(json!({ "status": "resolved", "comment": "router replaced" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "resolved");
        assert!(body["resolvedAt"].is_string());

        // 5. O painel do warden mostra a reclamação como concluída
        let (status, board) = app.send(Method::GET, "/api/warden/complaints", Some(&warden_token), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(board["completed"].as_array().map(Vec::len), Some(1));

        // 6. O resumo do admin conta a reclamação resolvida
        let (status, summary) = app
            .send(
                Method::GET,
                &format!("/api/admin/complaints/summary?hostelId={hostel_id}"),
                Some(&admin_token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        let resolved = summary
            .as_array()
            .expect("summary")
            .iter()
            .find(|entry| entry["status"] == "resolved")
            .expect("resolved entry");
        assert_eq!(resolved["count"], 1);
    }
}
