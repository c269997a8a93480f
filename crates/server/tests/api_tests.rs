use axum_test::TestServer;
use orchestrator::PhaseManagerConfig;
use serde_json::{json, Value};
use server::{create_router, state::AppState};

async fn setup_test_server() -> TestServer {
    let pool = db::create_pool("sqlite::memory:")
        .await
        .expect("Failed to create pool");
    db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");
    db::seed_phase_catalog(&pool)
        .await
        .expect("Failed to seed phases");

    let config = PhaseManagerConfig::new().with_settle_delay_ms(0);
    let state = AppState::new(pool, config);
    let app = create_router(state);

    TestServer::new(app).expect("Failed to create test server")
}

async fn register(server: &TestServer, code: &str) -> Value {
    let response = server
        .post("/api/units")
        .json(&json!({
            "name": "Unidade Teste",
            "code": code,
            "location": "Centro"
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json()
}

async fn phase_id(server: &TestServer, name: &str) -> String {
    let phases: Value = server.get("/api/phases").await.json();
    phases
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == name)
        .map(|p| p["id"].as_str().unwrap().to_string())
        .unwrap()
}

mod health {
    use super::*;

    #[tokio::test]
    async fn test_health_endpoint() {
        let server = setup_test_server().await;

        let response = server.get("/health").await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["database"], "ok");
    }
}

mod units {
    use super::*;

    #[tokio::test]
    async fn test_register_returns_201_in_initial_phase() {
        let server = setup_test_server().await;
        let interacao = phase_id(&server, "interacao").await;

        let body = register(&server, "CENTRAL").await;

        assert_eq!(body["code"], "CENTRAL");
        assert_eq!(body["status"], "active");
        assert_eq!(body["current_phase_id"], interacao.as_str());
        assert!(body["id"].is_string());
    }

    #[tokio::test]
    async fn test_register_blank_name_is_400() {
        let server = setup_test_server().await;

        let response = server
            .post("/api/units")
            .json(&json!({ "name": "  ", "code": "X", "location": "Centro" }))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "validation");
    }

    #[tokio::test]
    async fn test_register_duplicate_code_is_409() {
        let server = setup_test_server().await;
        register(&server, "DUP").await;

        let response = server
            .post("/api/units")
            .json(&json!({ "name": "Outra", "code": "DUP", "location": "Batel" }))
            .await;

        response.assert_status(axum::http::StatusCode::CONFLICT);
        let body: Value = response.json();
        assert_eq!(body["error"], "duplicate_code");
    }

    #[tokio::test]
    async fn test_list_and_get_units() {
        let server = setup_test_server().await;
        let created = register(&server, "A").await;
        register(&server, "B").await;

        let list: Value = server.get("/api/units").await.json();
        assert_eq!(list.as_array().unwrap().len(), 2);

        let id = created["id"].as_str().unwrap();
        let response = server.get(&format!("/api/units/{}", id)).await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["code"], "A");
    }

    #[tokio::test]
    async fn test_get_unit_not_found() {
        let server = setup_test_server().await;

        let fake_id = uuid::Uuid::new_v4();
        let response = server.get(&format!("/api/units/{}", fake_id)).await;

        response.assert_status_not_found();
    }
}

mod transitions {
    use super::*;

    #[tokio::test]
    async fn test_transition_and_history() {
        let server = setup_test_server().await;
        let unit = register(&server, "CENTRAL").await;
        let id = unit["id"].as_str().unwrap();
        let compras = phase_id(&server, "compras").await;

        let response = server
            .post(&format!("/api/units/{}/transition", id))
            .json(&json!({ "phase_id": compras, "triggered_by": "maria" }))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["current_phase_id"], compras.as_str());
        assert_eq!(body["status"], "active");

        let history: Value = server
            .get(&format!("/api/units/{}/transitions", id))
            .await
            .json();
        let history = history.as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["triggered_by"], "maria");
        assert_eq!(history[0]["reason"], "Manual transition");
        assert_eq!(history[1]["reason"], "Unit registration");
    }

    #[tokio::test]
    async fn test_transition_to_unknown_phase_is_404_and_logged() {
        let server = setup_test_server().await;
        let unit = register(&server, "CENTRAL").await;
        let id = unit["id"].as_str().unwrap();

        let response = server
            .post(&format!("/api/units/{}/transition", id))
            .json(&json!({ "phase_id": uuid::Uuid::new_v4() }))
            .await;
        response.assert_status_not_found();

        let failed: Value = server.get("/api/transitions?success=false").await.json();
        let failed = failed.as_array().unwrap();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0]["success"], false);
        assert!(failed[0]["error_message"].is_string());

        let stored: Value = server.get(&format!("/api/units/{}", id)).await.json();
        assert_eq!(stored["status"], "active");
    }

    #[tokio::test]
    async fn test_advance_moves_to_next_phase() {
        let server = setup_test_server().await;
        let unit = register(&server, "CENTRAL").await;
        let id = unit["id"].as_str().unwrap();
        let pre_compras = phase_id(&server, "pre_compras").await;

        let response = server
            .post(&format!("/api/units/{}/advance", id))
            .json(&json!({}))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["current_phase_id"], pre_compras.as_str());
    }

    #[tokio::test]
    async fn test_advance_from_terminal_phase_is_400() {
        let server = setup_test_server().await;
        let unit = register(&server, "CENTRAL").await;
        let id = unit["id"].as_str().unwrap();
        let closed = phase_id(&server, "loja_fechada_definitivamente").await;

        server
            .post(&format!("/api/units/{}/transition", id))
            .json(&json!({ "phase_id": closed }))
            .await
            .assert_status_ok();

        let response = server
            .post(&format!("/api/units/{}/advance", id))
            .json(&json!({}))
            .await;

        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "invalid_transition");
    }

    #[tokio::test]
    async fn test_transition_log_limit() {
        let server = setup_test_server().await;
        register(&server, "A").await;
        register(&server, "B").await;
        register(&server, "C").await;

        let logs: Value = server.get("/api/transitions?limit=2").await.json();
        assert_eq!(logs.as_array().unwrap().len(), 2);
    }
}

mod can_respond {
    use super::*;

    #[tokio::test]
    async fn test_active_phase_allows_responses() {
        let server = setup_test_server().await;
        let unit = register(&server, "CENTRAL").await;
        let id = unit["id"].as_str().unwrap();

        let body: Value = server
            .get(&format!("/api/units/{}/can-respond", id))
            .await
            .json();
        assert_eq!(body["can_respond"], true);
    }

    #[tokio::test]
    async fn test_closed_unit_is_silenced() {
        let server = setup_test_server().await;
        let unit = register(&server, "CENTRAL").await;
        let id = unit["id"].as_str().unwrap();
        let closed = phase_id(&server, "loja_fechada_definitivamente").await;

        server
            .post(&format!("/api/units/{}/transition", id))
            .json(&json!({ "phase_id": closed }))
            .await
            .assert_status_ok();

        let body: Value = server
            .get(&format!("/api/units/{}/can-respond", id))
            .await
            .json();
        assert_eq!(body["can_respond"], false);
    }

    #[tokio::test]
    async fn test_unknown_unit_cannot_respond() {
        let server = setup_test_server().await;

        let response = server
            .get(&format!("/api/units/{}/can-respond", uuid::Uuid::new_v4()))
            .await;

        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["can_respond"], false);
    }
}

mod phases {
    use super::*;

    #[tokio::test]
    async fn test_catalog_in_order() {
        let server = setup_test_server().await;

        let body: Value = server.get("/api/phases").await.json();
        let phases = body.as_array().unwrap();

        assert_eq!(phases.len(), 9);
        assert_eq!(phases[0]["name"], "interacao");
        assert_eq!(phases[8]["name"], "loja_fechada_definitivamente");
        assert!(phases[8]["next_phase_id"].is_null());
    }

    #[tokio::test]
    async fn test_update_phase_durations() {
        let server = setup_test_server().await;
        let compras = phase_id(&server, "compras").await;

        let response = server
            .patch(&format!("/api/phases/{}", compras))
            .json(&json!({ "min_duration_days": 10, "max_duration_days": 20 }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["min_duration_days"], 10);
        assert_eq!(body["max_duration_days"], 20);

        let response = server
            .patch(&format!("/api/phases/{}", compras))
            .json(&json!({ "min_duration_days": 30 }))
            .await;
        response.assert_status_bad_request();
    }

    #[tokio::test]
    async fn test_update_phase_from_duration_text() {
        let server = setup_test_server().await;
        let compras = phase_id(&server, "compras").await;

        let response = server
            .patch(&format!("/api/phases/{}", compras))
            .json(&json!({ "duration": "7-14 dias" }))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["min_duration_days"], 7);
        assert_eq!(body["max_duration_days"], 14);

        let response = server
            .patch(&format!("/api/phases/{}", compras))
            .json(&json!({ "duration": "Indeterminado" }))
            .await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["error"], "bad_request");
    }

    #[tokio::test]
    async fn test_phase_behavior() {
        let server = setup_test_server().await;
        let interacao = phase_id(&server, "interacao").await;

        let response = server
            .get(&format!("/api/phases/{}/behavior", interacao))
            .await;
        response.assert_status_ok();
        let body: Value = response.json();
        assert_eq!(body["allowed_to_respond"], true);
        assert_eq!(body["name"], "Grupo Interação");
        assert!(!body["restrictions"].as_array().unwrap().is_empty());

        let response = server
            .get(&format!("/api/phases/{}/behavior", uuid::Uuid::new_v4()))
            .await;
        response.assert_status_not_found();
    }
}
