pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::onboarding::handlers as onboarding;
use crate::resume::handlers as resume;
use crate::state::AppState;
use crate::theme::handlers as theme;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Theme presets
        .route("/api/v1/themes/presets", get(theme::handle_list_presets))
        .route(
            "/api/v1/themes/presets/:id/:mode",
            get(theme::handle_get_preset),
        )
        .route(
            "/api/v1/themes/normalize",
            post(theme::handle_normalize_theme),
        )
        // Resumes
        .route(
            "/api/v1/resumes/normalize",
            post(resume::handle_normalize_resume),
        )
        // Onboarding wizard
        .route("/api/v1/onboarding/steps", get(onboarding::handle_list_steps))
        .route(
            "/api/v1/onboarding/steps/:step/extract",
            post(onboarding::handle_extract),
        )
        .route(
            "/api/v1/onboarding/steps/:step/transform",
            post(onboarding::handle_transform),
        )
        .route(
            "/api/v1/onboarding/drafts/reload",
            post(onboarding::handle_reload_drafts),
        )
        .route(
            "/api/v1/onboarding/drafts/:step",
            put(onboarding::handle_put_draft).get(onboarding::handle_get_draft),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        };
        app.clone().oneshot(request.unwrap()).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn app() -> Router {
        build_router(AppState::default())
    }

    fn valid_profile() -> Value {
        json!({
            "profession": "Engineer",
            "phone": "+1 555 0100",
            "email": "dana@example.com",
            "location": "Lisbon",
            "language_used": "en",
            "about": {"short_description": "Builder", "description": "Ships things."},
        })
    }

    #[tokio::test]
    async fn test_health() {
        let response = send(&app(), Method::GET, "/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "tovo-api");
    }

    #[tokio::test]
    async fn test_list_presets() {
        let response = send(&app(), Method::GET, "/api/v1/themes/presets", None).await;
        let body = json_body(response).await;
        assert_eq!(body["options"].as_array().map(Vec::len), Some(5));
        assert_eq!(body["options"][4]["id"], "custom");
        assert_eq!(body["presets"][0]["id"], "bostami");
    }

    #[tokio::test]
    async fn test_get_preset() {
        let app = app();
        let response = send(&app, Method::GET, "/api/v1/themes/presets/ryancv/dark", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["theme"]["id"], "ryancv");
        assert_eq!(body["theme"]["mode"], "dark");

        let response = send(&app, Method::GET, "/api/v1/themes/presets/neon/dark", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::GET, "/api/v1/themes/presets/bostami/sepia", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_normalize_endpoints() {
        let app = app();
        let response = send(
            &app,
            Method::POST,
            "/api/v1/themes/normalize",
            Some(json!({"theme": "dark"})),
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(body["theme"]["mode"], "dark");
        assert_eq!(body["config"]["theme"], body["theme"]);

        let response = send(
            &app,
            Method::POST,
            "/api/v1/resumes/normalize",
            Some(json!({"knowledge": [{"value": "OKRs"}], "education": "none"})),
        )
        .await;
        let body = json_body(response).await;
        assert_eq!(body["knowledge"], json!(["OKRs"]));
        assert_eq!(body["education"], json!([]));
        assert_eq!(body["language_used"], "en");
    }

    #[tokio::test]
    async fn test_list_steps_in_order() {
        let response = send(&app(), Method::GET, "/api/v1/onboarding/steps", None).await;
        let body = json_body(response).await;
        let keys: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|meta| meta["key"].as_str())
            .collect();
        assert_eq!(keys, ["step_1", "step_2", "step_3", "step_4", "theme", "logout"]);
    }

    #[tokio::test]
    async fn test_extract_without_user() {
        let response = send(
            &app(),
            Method::POST,
            "/api/v1/onboarding/steps/step_1/extract",
            Some(json!({"resume": {"profession": "Chef", "subdomain": "dana"}})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["profession"], "Chef");
        assert_eq!(body["subdomain"], "dana");
    }

    #[tokio::test]
    async fn test_unknown_step_is_not_found() {
        let response = send(
            &app(),
            Method::POST,
            "/api/v1/onboarding/steps/step_9/extract",
            Some(json!({"resume": {}})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_transform_rejects_invalid_values() {
        let mut values = valid_profile();
        values["email"] = json!("nope");
        let response = send(
            &app(),
            Method::POST,
            "/api/v1/onboarding/steps/step_1/transform",
            Some(json!({"values": values})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        assert_eq!(
            body["error"]["fieldErrors"]["email"],
            "Please enter a valid email address."
        );
    }

    #[tokio::test]
    async fn test_transform_stores_draft_for_user() {
        let app = app();
        let user_id = Uuid::new_v4();
        let response = send(
            &app,
            Method::POST,
            "/api/v1/onboarding/steps/step_1/transform",
            Some(json!({"user_id": user_id, "values": valid_profile()})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let payload = json_body(response).await;
        assert_eq!(payload["about"]["short_description"], "Builder");
        assert_eq!(payload["include_blogs"], false);

        let uri = format!("/api/v1/onboarding/drafts/step_1?user_id={user_id}");
        let response = send(&app, Method::GET, &uri, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, valid_profile());

        let response = send(
            &app,
            Method::POST,
            "/api/v1/onboarding/steps/step_1/extract",
            Some(json!({"user_id": user_id, "resume": {"profession": "Chef"}})),
        )
        .await;
        assert_eq!(json_body(response).await["profession"], "Engineer");
    }

    #[tokio::test]
    async fn test_draft_put_get_and_reload() {
        let app = app();
        let user_id = Uuid::new_v4();
        let uri = format!("/api/v1/onboarding/drafts/step_4?user_id={user_id}");

        let response = send(&app, Method::GET, &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(
            &app,
            Method::PUT,
            "/api/v1/onboarding/drafts/step_4",
            Some(json!({"user_id": user_id, "values": {"knowledge": [{"value": "CI"}]}})),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);

        let response = send(&app, Method::GET, &uri, None).await;
        assert_eq!(
            json_body(response).await,
            json!({"knowledge": [{"value": "CI"}]})
        );

        let response = send(
            &app,
            Method::POST,
            "/api/v1/onboarding/drafts/reload",
            Some(json!({"user_id": user_id, "resume": {"knowledge": ["Rust"]}})),
        )
        .await;
        let snapshot = json_body(response).await;
        assert_eq!(snapshot["step_4"]["knowledge"], json!([{"value": "Rust"}]));

        let response = send(&app, Method::GET, &uri, None).await;
        assert_eq!(json_body(response).await, snapshot["step_4"]);
    }
}
