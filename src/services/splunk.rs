//! Blocking REST client for the Splunk search service.
//!
//! Covers the three endpoints the notebook commands need: resolving a job by
//! sid, fetching a job's search log, and updating an SPL2 module. Each call
//! is a single request with a fixed timeout; nothing is retried.

use crate::config::Config;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// One message from a Splunk structured error payload
/// (`{"messages": [{"type": ..., "text": ...}]}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceMessage {
    #[serde(rename = "type")]
    pub kind: String,
    pub text: String,
}

/// Errors from the Splunk REST client
#[derive(Debug, Clone, PartialEq)]
pub enum SplunkError {
    /// The request never produced an HTTP response (DNS, TLS, timeout, IO)
    Transport(String),
    /// HTTP error status whose body carried the structured messages payload
    Service {
        status: u16,
        messages: Vec<ServiceMessage>,
    },
    /// HTTP error status without a parseable payload; carries the raw body
    Status { status: u16, body: String },
    /// A success response whose body did not match the expected shape
    UnexpectedResponse(String),
}

impl std::fmt::Display for SplunkError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SplunkError::Transport(msg) => write!(f, "Request failed: {msg}"),
            SplunkError::Service { status, messages } => {
                write!(f, "Splunk returned status {status}: ")?;
                let serialized = serde_json::to_string(messages)
                    .unwrap_or_else(|_| format!("{messages:?}"));
                write!(f, "{serialized}")
            }
            SplunkError::Status { status, body } => {
                write!(f, "Splunk returned status {status}: {body}")
            }
            SplunkError::UnexpectedResponse(msg) => write!(f, "Unexpected response: {msg}"),
        }
    }
}

impl std::error::Error for SplunkError {}

impl SplunkError {
    /// The text shown to the user: the serialized messages payload when the
    /// service sent one, otherwise the raw error.
    pub fn user_message(&self) -> String {
        match self {
            SplunkError::Service { messages, .. } => serde_json::to_string(messages)
                .unwrap_or_else(|_| format!("{messages:?}")),
            other => other.to_string(),
        }
    }
}

/// A search job as resolved from the jobs endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchJob {
    pub sid: String,
    pub dispatch_state: String,
    pub is_done: bool,
}

/// The remote search service as the command handlers see it.
pub trait SearchService {
    /// Resolve a job by its sid.
    fn job_by_sid(&self, sid: &str) -> Result<SearchJob, SplunkError>;

    /// Fetch the raw search log text for a job.
    fn job_search_log(&self, sid: &str) -> Result<String, SplunkError>;

    /// Create or replace an SPL2 module with the given definition.
    fn update_spl2_module(
        &self,
        name: &str,
        namespace: &str,
        definition: &str,
    ) -> Result<(), SplunkError>;
}

// Response shapes for the jobs endpoint (output_mode=json)

#[derive(Debug, Deserialize)]
struct JobsResponse {
    #[serde(default)]
    entry: Vec<JobEntry>,
}

#[derive(Debug, Deserialize)]
struct JobEntry {
    content: JobContent,
}

#[derive(Debug, Deserialize)]
struct JobContent {
    sid: String,
    #[serde(rename = "dispatchState", default)]
    dispatch_state: String,
    #[serde(rename = "isDone", default)]
    is_done: bool,
}

#[derive(Debug, Deserialize)]
struct MessagesEnvelope {
    messages: Vec<ServiceMessage>,
}

/// ureq-backed `SearchService` against a Splunk management endpoint.
pub struct SplunkClient {
    base_url: String,
    token: String,
    agent: ureq::Agent,
}

impl SplunkClient {
    /// Build a client from configuration.
    pub fn new(config: &Config) -> Self {
        Self::from_parts(
            &config.rest_url,
            &config.token,
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    /// Build a client from explicit parts (used by tests).
    pub fn from_parts(base_url: &str, token: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
            agent,
        }
    }

    fn get(&self, path: &str) -> Result<String, SplunkError> {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);
        let response = self
            .agent
            .get(&url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .call()
            .map_err(classify_error)?;
        response
            .into_string()
            .map_err(|e| SplunkError::Transport(e.to_string()))
    }
}

/// Map a ureq error to a `SplunkError`, extracting the structured messages
/// payload from HTTP error bodies when present.
fn classify_error(error: ureq::Error) -> SplunkError {
    match error {
        ureq::Error::Status(status, response) => {
            let body = response.into_string().unwrap_or_default();
            match serde_json::from_str::<MessagesEnvelope>(&body) {
                Ok(envelope) => SplunkError::Service {
                    status,
                    messages: envelope.messages,
                },
                Err(_) => SplunkError::Status { status, body },
            }
        }
        ureq::Error::Transport(transport) => SplunkError::Transport(transport.to_string()),
    }
}

impl SearchService for SplunkClient {
    fn job_by_sid(&self, sid: &str) -> Result<SearchJob, SplunkError> {
        let body = self.get(&format!(
            "/services/search/v2/jobs/{sid}?output_mode=json"
        ))?;
        let parsed: JobsResponse = serde_json::from_str(&body)
            .map_err(|e| SplunkError::UnexpectedResponse(e.to_string()))?;
        let entry = parsed.entry.into_iter().next().ok_or_else(|| {
            SplunkError::UnexpectedResponse(format!("no job entry returned for sid {sid}"))
        })?;
        Ok(SearchJob {
            sid: entry.content.sid,
            dispatch_state: entry.content.dispatch_state,
            is_done: entry.content.is_done,
        })
    }

    fn job_search_log(&self, sid: &str) -> Result<String, SplunkError> {
        self.get(&format!("/services/search/v2/jobs/{sid}/search.log"))
    }

    fn update_spl2_module(
        &self,
        name: &str,
        namespace: &str,
        definition: &str,
    ) -> Result<(), SplunkError> {
        let url = format!("{}/services/spl2/modules", self.base_url);
        tracing::debug!("POST {} (module {} in {})", url, name, namespace);
        self.agent
            .post(&url)
            .set("Authorization", &format!("Bearer {}", self.token))
            .send_json(serde_json::json!({
                "name": name,
                "namespace": namespace,
                "definition": definition,
            }))
            .map_err(classify_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read as _;
    use std::sync::mpsc;
    use std::thread;

    /// A request as seen by the mock server.
    struct SeenRequest {
        method: String,
        url: String,
        authorization: Option<String>,
        body: String,
    }

    /// Test helper: start a local HTTP server that answers every request with
    /// the given status and body, recording requests on the returned channel.
    /// Returns (stop_sender, base_url, request_receiver).
    fn start_mock_splunk_server(
        status: u16,
        body: &str,
    ) -> (mpsc::Sender<()>, String, mpsc::Receiver<SeenRequest>) {
        let server = tiny_http::Server::http("127.0.0.1:0").expect("Failed to start test server");
        let port = server.server_addr().to_ip().unwrap().port();
        let base_url = format!("http://127.0.0.1:{}", port);

        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let (seen_tx, seen_rx) = mpsc::channel::<SeenRequest>();

        let body = body.to_string();
        thread::spawn(move || loop {
            if stop_rx.try_recv().is_ok() {
                break;
            }
            match server.recv_timeout(Duration::from_millis(100)) {
                Ok(Some(mut request)) => {
                    let mut request_body = String::new();
                    let _ = request.as_reader().read_to_string(&mut request_body);
                    let authorization = request
                        .headers()
                        .iter()
                        .find(|h| h.field.equiv("Authorization"))
                        .map(|h| h.value.as_str().to_string());
                    let _ = seen_tx.send(SeenRequest {
                        method: request.method().to_string(),
                        url: request.url().to_string(),
                        authorization,
                        body: request_body,
                    });
                    let response =
                        tiny_http::Response::from_string(body.clone()).with_status_code(status);
                    let _ = request.respond(response);
                }
                Ok(None) => {}
                Err(_) => break,
            }
        });

        (stop_tx, base_url, seen_rx)
    }

    fn client_for(base_url: &str) -> SplunkClient {
        SplunkClient::from_parts(base_url, "test-token", Duration::from_secs(2))
    }

    #[test]
    fn test_job_by_sid_parses_entry() {
        let (stop_tx, base_url, seen_rx) = start_mock_splunk_server(
            200,
            r#"{"entry": [{"content": {"sid": "1700000000.123", "dispatchState": "DONE", "isDone": true}}]}"#,
        );

        let job = client_for(&base_url).job_by_sid("1700000000.123").unwrap();
        assert_eq!(job.sid, "1700000000.123");
        assert_eq!(job.dispatch_state, "DONE");
        assert!(job.is_done);

        let seen = seen_rx.recv().unwrap();
        assert_eq!(seen.method, "GET");
        assert_eq!(
            seen.url,
            "/services/search/v2/jobs/1700000000.123?output_mode=json"
        );
        assert_eq!(seen.authorization.as_deref(), Some("Bearer test-token"));

        let _ = stop_tx.send(());
    }

    #[test]
    fn test_job_by_sid_empty_entry_is_unexpected_response() {
        let (stop_tx, base_url, _seen_rx) = start_mock_splunk_server(200, r#"{"entry": []}"#);

        let err = client_for(&base_url).job_by_sid("missing").unwrap_err();
        match err {
            SplunkError::UnexpectedResponse(msg) => assert!(msg.contains("missing")),
            other => panic!("Expected UnexpectedResponse, got {:?}", other),
        }

        let _ = stop_tx.send(());
    }

    #[test]
    fn test_job_search_log_returns_raw_body() {
        let log = "line one\\r\\nline two\\r\\n";
        let (stop_tx, base_url, seen_rx) = start_mock_splunk_server(200, log);

        let fetched = client_for(&base_url).job_search_log("sid1").unwrap();
        assert_eq!(fetched, log);

        let seen = seen_rx.recv().unwrap();
        assert_eq!(seen.url, "/services/search/v2/jobs/sid1/search.log");

        let _ = stop_tx.send(());
    }

    #[test]
    fn test_update_spl2_module_posts_definition() {
        let (stop_tx, base_url, seen_rx) = start_mock_splunk_server(200, "{}");

        client_for(&base_url)
            .update_spl2_module("my_module", "apps.search", "$out = from [{}]")
            .unwrap();

        let seen = seen_rx.recv().unwrap();
        assert_eq!(seen.method, "POST");
        assert_eq!(seen.url, "/services/spl2/modules");
        let payload: serde_json::Value = serde_json::from_str(&seen.body).unwrap();
        assert_eq!(payload["name"], "my_module");
        assert_eq!(payload["namespace"], "apps.search");
        assert_eq!(payload["definition"], "$out = from [{}]");

        let _ = stop_tx.send(());
    }

    #[test]
    fn test_error_with_structured_payload() {
        let (stop_tx, base_url, _seen_rx) = start_mock_splunk_server(
            400,
            r#"{"messages": [{"type": "ERROR", "text": "Module name is invalid"}]}"#,
        );

        let err = client_for(&base_url)
            .update_spl2_module("Bad Name", "apps.search", "")
            .unwrap_err();
        match &err {
            SplunkError::Service { status, messages } => {
                assert_eq!(*status, 400);
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0].kind, "ERROR");
                assert_eq!(messages[0].text, "Module name is invalid");
            }
            other => panic!("Expected Service error, got {:?}", other),
        }
        // The user-facing message carries the serialized payload.
        assert!(err.user_message().contains("Module name is invalid"));
        assert!(err.user_message().contains("ERROR"));

        let _ = stop_tx.send(());
    }

    #[test]
    fn test_error_without_structured_payload() {
        let (stop_tx, base_url, _seen_rx) =
            start_mock_splunk_server(500, "Internal Server Error");

        let err = client_for(&base_url).job_search_log("sid1").unwrap_err();
        match &err {
            SplunkError::Status { status, body } => {
                assert_eq!(*status, 500);
                assert_eq!(body, "Internal Server Error");
            }
            other => panic!("Expected Status error, got {:?}", other),
        }
        assert!(err.user_message().contains("Internal Server Error"));

        let _ = stop_tx.send(());
    }

    #[test]
    fn test_transport_error_is_stringified() {
        // Nothing is listening on this port.
        let client = SplunkClient::from_parts(
            "http://127.0.0.1:1",
            "token",
            Duration::from_millis(200),
        );
        let err = client.job_search_log("sid1").unwrap_err();
        match err {
            SplunkError::Transport(_) => {}
            other => panic!("Expected Transport error, got {:?}", other),
        }
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let client = SplunkClient::from_parts(
            "http://127.0.0.1:8089/",
            "token",
            Duration::from_secs(1),
        );
        assert_eq!(client.base_url, "http://127.0.0.1:8089");
    }
}
