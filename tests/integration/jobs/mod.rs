//! Jobs endpoint integration tests

use axum::http::{Method, Request, StatusCode};
use axum::body::Body;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::common::{
    create_test_jwt, json_request, request, valid_token, TestApp, TEST_JWT_SECRET,
};

// ============================================================================
// Authentication gate
// ============================================================================
mod test_authentication {
    use super::*;

    #[tokio::test]
    async fn test_missing_token_is_rejected() {
        let app = TestApp::new().await;
        let (status, body) = app.send_json(request(Method::GET, "/api/v1/jobs", None)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "MISSING_AUTHORIZATION");
    }

    #[tokio::test]
    async fn test_non_bearer_scheme_is_rejected() {
        let app = TestApp::new().await;
        let request = Request::builder()
            .uri("/api/v1/jobs")
            .header("authorization", "Basic dXNlcjpwYXNz")
            .body(Body::empty())
            .unwrap();

        let (status, body) = app.send_json(request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"]["code"], "INVALID_AUTHORIZATION");
    }

    #[tokio::test]
    async fn test_bad_tokens_are_rejected() {
        let app = TestApp::new().await;
        let user = Uuid::new_v4();

        for token in [
            "not-a-jwt".to_string(),
            create_test_jwt(user, "Mallory", "some-other-secret", 3600),
            create_test_jwt(user, "Expired", TEST_JWT_SECRET, -3600),
        ] {
            let (status, body) = app
                .send_json(request(Method::GET, "/api/v1/jobs", Some(&token)))
                .await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body["error"]["code"], "INVALID_TOKEN");
        }
    }

    #[tokio::test]
    async fn test_every_method_and_path_under_prefix_requires_auth() {
        let app = TestApp::new().await;
        let id = Uuid::new_v4();

        for (method, uri) in [
            (Method::POST, "/api/v1/jobs".to_string()),
            (Method::GET, format!("/api/v1/jobs/{}", id)),
            (Method::PATCH, format!("/api/v1/jobs/{}", id)),
            (Method::DELETE, format!("/api/v1/jobs/{}", id)),
            (Method::GET, "/api/v1/jobs/unknown/deeper".to_string()),
            (Method::PUT, "/api/v1/jobs".to_string()),
        ] {
            let response = app.send(request(method.clone(), &uri, None)).await;
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "{} {}",
                method,
                uri
            );
        }
    }

    #[tokio::test]
    async fn test_unknown_path_with_token_is_not_found() {
        let app = TestApp::new().await;
        let token = valid_token();

        let (status, body) = app
            .send_json(request(Method::GET, "/api/v1/jobs/a/b", Some(&token)))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["message"], "Route does not exist");
    }
}

// ============================================================================
// Request validation (rejected before any database access)
// ============================================================================
mod test_validation {
    use super::*;

    #[tokio::test]
    async fn test_create_without_body_is_bad_request() {
        let app = TestApp::new().await;
        let token = valid_token();

        let (status, body) = app
            .send_json(request(Method::POST, "/api/v1/jobs", Some(&token)))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_create_with_invalid_fields_is_bad_request() {
        let app = TestApp::new().await;
        let token = valid_token();

        for payload in [
            json!({ "position": "Engineer" }),
            json!({ "company": "", "position": "Engineer" }),
            json!({ "company": "Acme", "position": "Engineer", "status": "hired" }),
            json!({ "company": "x".repeat(51), "position": "Engineer" }),
        ] {
            let (status, _) = app
                .send_json(json_request(
                    Method::POST,
                    "/api/v1/jobs",
                    Some(&token),
                    payload.clone(),
                ))
                .await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload {}", payload);
        }
    }

    #[tokio::test]
    async fn test_malformed_id_is_bad_request() {
        let app = TestApp::new().await;
        let token = valid_token();

        let (status, body) = app
            .send_json(request(Method::GET, "/api/v1/jobs/not-a-uuid", Some(&token)))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_empty_update_is_bad_request() {
        let app = TestApp::new().await;
        let token = valid_token();
        let uri = format!("/api/v1/jobs/{}", Uuid::new_v4());

        let (status, _) = app
            .send_json(json_request(Method::PATCH, &uri, Some(&token), json!({})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_invalid_status_filter_is_bad_request() {
        let app = TestApp::new().await;
        let token = valid_token();

        let (status, _) = app
            .send_json(request(Method::GET, "/api/v1/jobs?status=hired", Some(&token)))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

// ============================================================================
// CRUD against a live database
// ============================================================================
mod test_with_database {
    use super::*;

    async fn create(app: &TestApp, token: &str, payload: Value) -> Value {
        let (status, body) = app
            .send_json(json_request(Method::POST, "/api/v1/jobs", Some(token), payload))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
        body["job"].clone()
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_crud_lifecycle() {
        let app = TestApp::with_database().await.unwrap();
        let token = app.register("Ada Lovelace", "ada@example.com", "secret1").await;

        let job = create(
            &app,
            &token,
            json!({ "company": "  Analytical <Engines> ", "position": "Programmer" }),
        )
        .await;
        assert_eq!(job["status"], "pending");
        assert_eq!(job["company"], "Analytical &lt;Engines>");
        let uri = format!("/api/v1/jobs/{}", job["id"].as_str().unwrap());

        let (status, body) = app.send_json(request(Method::GET, &uri, Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["job"]["id"], job["id"]);

        let (status, body) = app
            .send_json(json_request(
                Method::PATCH,
                &uri,
                Some(&token),
                json!({ "status": "interview" }),
            ))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["job"]["status"], "interview");
        assert_eq!(body["job"]["position"], "Programmer");

        let (status, body) = app
            .send_json(json_request(
                Method::PATCH,
                &uri,
                Some(&token),
                json!({ "company": "" }),
            ))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Company or Position fields cannot be empty"
        );

        let (status, body) = app.send_json(request(Method::DELETE, &uri, Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["job"]["id"], job["id"]);

        let (status, body) = app.send_json(request(Method::GET, &uri, Some(&token))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(
            body["error"]["message"],
            format!("No job with id {}", job["id"].as_str().unwrap())
        );
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_list_is_scoped_filtered_and_newest_first() {
        let app = TestApp::with_database().await.unwrap();
        let token = app.register("Grace Hopper", "grace@example.com", "secret1").await;
        let other = app.register("Alan Turing", "alan@example.com", "secret1").await;

        create(&app, &token, json!({ "company": "Navy", "position": "Officer" })).await;
        create(
            &app,
            &token,
            json!({ "company": "Remington Rand", "position": "Engineer", "status": "declined" }),
        )
        .await;
        create(&app, &other, json!({ "company": "Bletchley", "position": "Analyst" })).await;

        let (status, body) = app
            .send_json(request(Method::GET, "/api/v1/jobs", Some(&token)))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);
        assert_eq!(body["jobs"][0]["company"], "Remington Rand");
        assert_eq!(body["jobs"][1]["company"], "Navy");

        let (_, body) = app
            .send_json(request(
                Method::GET,
                "/api/v1/jobs?status=declined",
                Some(&token),
            ))
            .await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["jobs"][0]["status"], "declined");
    }

    #[tokio::test]
    #[ignore = "requires TEST_DATABASE_URL"]
    async fn test_other_users_jobs_are_invisible() {
        let app = TestApp::with_database().await.unwrap();
        let owner = app.register("Owner Person", "owner@example.com", "secret1").await;
        let intruder = app
            .register("Intruder Person", "intruder@example.com", "secret1")
            .await;

        let job = create(&app, &owner, json!({ "company": "Acme", "position": "Dev" })).await;
        let uri = format!("/api/v1/jobs/{}", job["id"].as_str().unwrap());

        for method in [Method::GET, Method::DELETE] {
            let (status, _) = app
                .send_json(request(method, &uri, Some(&intruder)))
                .await;
            assert_eq!(status, StatusCode::NOT_FOUND);
        }

        let (status, _) = app
            .send_json(json_request(
                Method::PATCH,
                &uri,
                Some(&intruder),
                json!({ "status": "declined" }),
            ))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, body) = app.send_json(request(Method::GET, &uri, Some(&owner))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["job"]["status"], "pending");
    }
}
