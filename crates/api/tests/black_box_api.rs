use chrono::{Months, Utc};
use reqwest::StatusCode;
use serde_json::json;

use geocore_infra::AppConfig;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Build app (same router as prod), but bind to an ephemeral port.
        let app = geocore_api::app::build_app(&AppConfig::default()).expect("failed to build app");
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[tokio::test]
async fn health_is_public() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn sample_people_are_listed_sorted_by_name() {
    let srv = TestServer::spawn().await;

    let res = reqwest::get(srv.url("/people")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let body: serde_json::Value = res.json().await.unwrap();
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["José da Silva", "João Oliveira", "Maria Santos"]);
}

#[tokio::test]
async fn person_lifecycle_create_patch_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    // Create
    let res = client
        .post(srv.url("/people"))
        .json(&json!({
            "name": "Ana Lima",
            "birthDate": "1990-05-01",
            "admissionDate": "2015-03-02",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["id"], 4);

    // Patch only the name
    let res = client
        .patch(srv.url("/people/4"))
        .json(&json!({ "name": "Ana Souza" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let patched: serde_json::Value = res.json().await.unwrap();
    assert_eq!(patched["name"], "Ana Souza");
    assert_eq!(patched["birthDate"], "1990-05-01");
    assert_eq!(patched["admissionDate"], "2015-03-02");

    // Delete
    let res = client.delete(srv.url("/people/4")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let res = client.get(srv.url("/people/4")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let problem: serde_json::Value = res.json().await.unwrap();
    assert_eq!(problem["errorCode"], "PESSOA_NOT_FOUND");
}

#[tokio::test]
async fn salary_after_one_year_of_service() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let today = Utc::now().date_naive();
    let admission = today.checked_sub_months(Months::new(12)).unwrap();

    let res = client
        .post(srv.url("/people/50"))
        .json(&json!({
            "name": "Bruno",
            "birthDate": "1985-01-01",
            "admissionDate": admission.to_string(),
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let full: f64 = client
        .get(srv.url("/people/50/salary?output=full"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(full, 2338.44);

    let min: f64 = client
        .get(srv.url("/people/50/salary?output=min"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(min, 1.80);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/people/1")).send().await.unwrap();
    assert!(res.headers().contains_key("x-request-id"));

    let res = client
        .get(srv.url("/people/1"))
        .header("x-request-id", "abc-123")
        .send()
        .await
        .unwrap();
    assert_eq!(res.headers()["x-request-id"], "abc-123");
}
