//! The four verbs against the live fixture server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `Api` over real HTTP
//! with a ureq-backed `Transport`. Validates request building, the wire
//! format and response parsing end-to-end.

use restglue_core::{Api, ApiError, Body, HttpMethod, HttpRequest, HttpResponse, JsonClient, Transport};
use serde_json::json;

/// Executes requests with ureq.
///
/// Status-code-as-error is disabled so 4xx/5xx responses come back as data
/// and the core decides what they mean.
struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    builder
}

impl Transport for UreqTransport {
    async fn send(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = req.url.as_str();
        let headers = req.headers.as_slice();
        let result = match (req.method, req.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(url), headers).send(body.as_bytes()),
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(url), headers).send(body.as_bytes()),
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
            (HttpMethod::Delete, Some(body)) => {
                with_headers(self.agent.delete(url).force_send_body(), headers).send(body.as_bytes())
            }
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(url), headers).call(),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(HttpResponse::new(status, body))
    }
}

/// Start the fixture server on a random port and return its base URL.
fn spawn_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

fn api() -> Api<UreqTransport> {
    Api::new(JsonClient::with_base(&spawn_server()).unwrap(), UreqTransport::new())
}

#[tokio::test]
async fn record_lifecycle() {
    let api = api();

    // Step 1: list starts empty.
    let records = api.get("/records").await.unwrap();
    assert_eq!(records, json!([]));

    // Step 2: create from ordered entries.
    let body: Body = [("name", json!("laptop")), ("slots", json!(2))].into_iter().collect();
    let created = api.post("/records", Some(&body)).await.unwrap();
    assert_eq!(created["data"], json!({ "name": "laptop", "slots": 2 }));
    let id = created["id"].as_str().unwrap().to_string();

    // Step 3: fetch it back.
    let fetched = api.get(&format!("/records/{id}")).await.unwrap();
    assert_eq!(fetched, created);

    // Step 4: update merges fields.
    let body: Body = [("online", true)].into_iter().collect();
    let updated = api.put(&format!("/records/{id}"), Some(&body)).await.unwrap();
    assert_eq!(updated["data"]["name"], "laptop");
    assert_eq!(updated["data"]["online"], true);

    // Step 5: delete answers with an empty body, read as {}.
    let deleted = api.delete(&format!("/records/{id}"), None).await.unwrap();
    assert_eq!(deleted, json!({}));

    // Step 6: gone.
    let err = api.get(&format!("/records/{id}")).await.unwrap_err();
    assert_eq!(err.to_string(), "404 - not found");

    let err = api.delete(&format!("/records/{id}"), None).await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn body_capable_verbs_send_json_content_type() {
    let api = api();

    for (method, echo) in [
        ("POST", api.post("/echo", None).await.unwrap()),
        ("PUT", api.put("/echo", None).await.unwrap()),
        ("DELETE", api.delete("/echo", None).await.unwrap()),
    ] {
        assert_eq!(echo["method"], method);
        assert_eq!(echo["content_type"], "application/json", "{method}");
        assert!(echo["body"].is_null(), "{method}: no body expected");
    }
}

#[tokio::test]
async fn get_sends_neither_body_nor_content_type() {
    let echo = api().get("/echo").await.unwrap();
    assert_eq!(echo["method"], "GET");
    assert!(echo["content_type"].is_null());
    assert!(echo["body"].is_null());
}

#[tokio::test]
async fn delete_body_reaches_the_server() {
    let body: Body = [("reason", "expired")].into_iter().collect();
    let echo = api().delete("/echo", Some(&body)).await.unwrap();
    assert_eq!(echo["method"], "DELETE");
    assert_eq!(echo["body"], json!({ "reason": "expired" }));
}

#[tokio::test]
async fn non_json_success_is_a_parse_error() {
    let err = api().get("/raw?text=not%20json").await.unwrap_err();
    assert!(matches!(err, ApiError::Parse(_)));
}

#[tokio::test]
async fn status_text_is_carried_into_the_error() {
    let err = api()
        .get("/status/503?text=maintenance")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 503, .. }));
    assert_eq!(err.to_string(), "503 - maintenance");
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap();
    let api = Api::new(JsonClient::with_base(&format!("http://{addr}")).unwrap(), UreqTransport::new());
    let err = api.get("/records").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}
