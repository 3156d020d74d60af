//! Request pipeline tests: landing page, docs, fallbacks, headers, CORS,
//! rate limiting and body size limit

use axum::http::{header, Method, Request, StatusCode};
use axum::body::Body;
use serde_json::json;

use crate::common::{body_text, json_request, parse_body, request, TestApp};

mod test_routes {
    use super::*;

    #[tokio::test]
    async fn test_root_serves_landing_page() {
        let app = TestApp::new().await;
        let response = app.send(request(Method::GET, "/", None)).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/html"));

        let body = body_text(response).await;
        assert!(body.contains("Jobs API"));
        assert!(body.contains(r#"href="./api-docs""#));
    }

    #[tokio::test]
    async fn test_docs_viewer_served_with_and_without_slash() {
        let app = TestApp::new().await;

        for path in ["/api-docs", "/api-docs/"] {
            let response = app.send(request(Method::GET, path, None)).await;
            assert_eq!(response.status(), StatusCode::OK, "{}", path);
            assert!(response.headers()[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("text/html"));
        }
    }

    #[tokio::test]
    async fn test_docs_document_is_served_as_json() {
        let app = TestApp::new().await;
        let response = app
            .send(request(Method::GET, "/api-docs/openapi.json", None))
            .await;

        assert_eq!(response.status(), StatusCode::OK);
        let body = parse_body(response).await;
        assert_eq!(body["info"]["title"], "Jobs API");
    }

    #[tokio::test]
    async fn test_unknown_route_returns_uniform_404() {
        let app = TestApp::new().await;
        let response = app.send(request(Method::GET, "/nope", None)).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = parse_body(response).await;
        assert_eq!(
            body,
            json!({"error": {"code": "NOT_FOUND", "message": "Route does not exist"}})
        );
    }

    #[tokio::test]
    async fn test_wrong_method_is_not_found() {
        let app = TestApp::new().await;
        let response = app
            .send(request(Method::DELETE, "/api/v1/auth/login", None))
            .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = parse_body(response).await;
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}

mod test_headers {
    use super::*;

    const EXPECTED: [(&str, &str); 5] = [
        ("x-content-type-options", "nosniff"),
        ("x-frame-options", "SAMEORIGIN"),
        ("x-xss-protection", "0"),
        ("referrer-policy", "no-referrer"),
        ("cross-origin-opener-policy", "same-origin"),
    ];

    #[tokio::test]
    async fn test_security_headers_on_found_and_missing_routes() {
        let app = TestApp::new().await;

        for uri in ["/", "/nope", "/api/v1/jobs"] {
            let response = app.send(request(Method::GET, uri, None)).await;
            for (name, value) in EXPECTED {
                assert_eq!(response.headers()[name], value, "{} on {}", name, uri);
            }
            assert!(response
                .headers()
                .contains_key(header::CONTENT_SECURITY_POLICY));
            assert!(response
                .headers()
                .contains_key(header::STRICT_TRANSPORT_SECURITY));
        }
    }

    #[tokio::test]
    async fn test_cors_is_permissive_by_default() {
        let app = TestApp::new().await;
        let response = app
            .send(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, "https://client.example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn test_cors_allow_list_from_config() {
        let app = TestApp::with_overrides(&[(
            "CORS_ALLOWED_ORIGINS",
            "https://app.example.com, https://admin.example.com",
        )])
        .await;

        let preflight = |origin: &str| {
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/api/v1/jobs")
                .header(header::ORIGIN, origin)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .body(Body::empty())
                .unwrap()
        };

        let response = app.send(preflight("https://admin.example.com")).await;
        assert_eq!(
            response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://admin.example.com"
        );

        let response = app.send(preflight("https://evil.example.com")).await;
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}

mod test_rate_limit {
    use super::*;

    #[tokio::test]
    async fn test_hundred_and_first_request_is_rejected() {
        let app = TestApp::new().await;

        for i in 1..=100 {
            let response = app.send(request(Method::GET, "/", None)).await;
            assert_eq!(response.status(), StatusCode::OK, "request {}", i);
        }

        let response = app.send(request(Method::GET, "/", None)).await;
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key(header::RETRY_AFTER));
        assert_eq!(response.headers()["x-ratelimit-remaining"], "0");

        let body = parse_body(response).await;
        assert_eq!(body["error"]["code"], "RATE_LIMIT_EXCEEDED");
    }

    #[tokio::test]
    async fn test_limit_headers_count_down() {
        let app = TestApp::with_overrides(&[("RATE_LIMIT_MAX", "5")]).await;

        let response = app.send(request(Method::GET, "/", None)).await;
        assert_eq!(response.headers()["x-ratelimit-limit"], "5");
        assert_eq!(response.headers()["x-ratelimit-remaining"], "4");
        assert!(response.headers().contains_key("x-ratelimit-reset"));
    }

    #[tokio::test]
    async fn test_clients_are_limited_separately_behind_proxy() {
        let app = TestApp::with_overrides(&[("RATE_LIMIT_MAX", "1")]).await;

        let from = |ip: &str| {
            Request::builder()
                .uri("/")
                .header("x-forwarded-for", ip)
                .body(Body::empty())
                .unwrap()
        };

        assert_eq!(app.send(from("203.0.113.1")).await.status(), StatusCode::OK);
        assert_eq!(
            app.send(from("203.0.113.1")).await.status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(app.send(from("203.0.113.2")).await.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_rejected_requests_never_reach_routes() {
        let app = TestApp::with_overrides(&[("RATE_LIMIT_MAX", "1")]).await;

        app.send(request(Method::GET, "/", None)).await;
        let response = app.send(request(Method::GET, "/api/v1/jobs", None)).await;

        // Limited before authentication runs.
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}

mod test_body_limit {
    use super::*;

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let app = TestApp::new().await;
        let padding = "x".repeat(200 * 1024);

        let response = app
            .send(json_request(
                Method::POST,
                "/api/v1/auth/login",
                None,
                json!({ "email": "a@b.co", "password": padding }),
            ))
            .await;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn test_declared_oversize_gets_uniform_error_body() {
        let app = TestApp::new().await;
        let padding = "x".repeat(200 * 1024);

        let payload = json!({ "email": "a@b.co", "password": padding }).to_string();
        let req = Request::builder()
            .method(Method::POST)
            .uri("/api/v1/auth/login")
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::CONTENT_LENGTH, payload.len())
            .body(Body::from(payload))
            .unwrap();

        let response = app.send(req).await;

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/json"));
        let body = parse_body(response).await;
        assert_eq!(body["error"]["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(
            body["error"]["message"],
            "Request body exceeds the allowed size"
        );
    }
}
