use std::cell::RefCell;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;

use motif_core::fetch::{
    fetch_to_file, item_count, ArchiveClient, ArchiveResponse, FetchError, FetchMetadata,
    HttpArchiveClient, SearchQuery,
};
use motif_core::project::FetchConfig;
use serde_json::json;
use sha2::{Digest, Sha256};

struct FakeClient {
    status: u16,
    body: String,
    requests: RefCell<Vec<(String, SearchQuery)>>,
}

impl FakeClient {
    fn new(status: u16, body: &str) -> Self {
        Self { status, body: body.to_string(), requests: RefCell::new(Vec::new()) }
    }
}

impl ArchiveClient for FakeClient {
    fn search(&self, endpoint: &str, query: &SearchQuery) -> Result<ArchiveResponse, FetchError> {
        self.requests.borrow_mut().push((endpoint.to_string(), query.clone()));
        Ok(ArchiveResponse { status: self.status, body: self.body.clone() })
    }
}

/// Serve one canned HTTP response and hand back the request line.
fn serve_once(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut request = Vec::new();
        let mut buf = [0u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            let n = stream.read(&mut buf).unwrap();
            if n == 0 {
                break;
            }
            request.extend_from_slice(&buf[..n]);
        }
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).unwrap();
        String::from_utf8_lossy(&request).lines().next().unwrap_or_default().to_string()
    });
    (format!("http://{addr}/data/api/inschrift/suche"), handle)
}

#[test]
fn default_query_uses_archive_parameter_names() {
    let query = SearchQuery::from(&FetchConfig::default());
    assert_eq!(
        query.params(),
        vec![
            ("inschriftgattung", "titsep".to_string()),
            ("jahr_a", "200".to_string()),
            ("jahr_b", "600".to_string()),
            ("limit", "1000000".to_string()),
        ]
    );
}

#[test]
fn successful_fetch_writes_body_and_metadata() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("data").join("results.json");
    let meta_path = temp.path().join(".motif").join("fetch.json");
    let body = json!({"items": [{"id": "HD1", "commentary": "Rückseite mit Kreuz"}, {"id": "HD2"}]});
    let client = FakeClient::new(200, &body.to_string());

    let meta = fetch_to_file(&client, &FetchConfig::default(), &output, &meta_path).unwrap();

    assert_eq!(meta.item_count, 2);
    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.contains("Rückseite"), "non-ASCII should be written unescaped");
    assert!(written.contains('\n'), "output should be pretty-printed");
    assert_eq!(serde_json::from_str::<serde_json::Value>(&written).unwrap(), body);
    assert_eq!(meta.sha256, format!("{:x}", Sha256::digest(written.as_bytes())));

    let stored: FetchMetadata =
        serde_json::from_str(&std::fs::read_to_string(&meta_path).unwrap()).unwrap();
    assert_eq!(stored, meta);
    assert_eq!(client.requests.borrow()[0].0, FetchConfig::default().endpoint);
}

#[test]
fn non_200_status_writes_nothing() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("results.json");
    let meta_path = temp.path().join("fetch.json");
    let client = FakeClient::new(404, "Not Found");

    let err = fetch_to_file(&client, &FetchConfig::default(), &output, &meta_path).unwrap_err();
    match err {
        FetchError::Status { code, body } => {
            assert_eq!(code, 404);
            assert_eq!(body, "Not Found");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!output.exists());
    assert!(!meta_path.exists());
}

#[test]
fn invalid_json_body_is_an_error() {
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("results.json");
    let client = FakeClient::new(200, "<html>");
    let err = fetch_to_file(&client, &FetchConfig::default(), &output, &temp.path().join("m.json"))
        .unwrap_err();
    assert!(matches!(err, FetchError::Json(_)));
    assert!(!output.exists());
}

#[test]
fn item_count_handles_both_shapes() {
    assert_eq!(item_count(&json!({"items": [1, 2, 3]})), 3);
    assert_eq!(item_count(&json!([1, 2])), 2);
    assert_eq!(item_count(&json!({"total": 0})), 0);
}

#[test]
fn http_client_reports_status_and_body_from_server() {
    let (endpoint, server) = serve_once("404 Not Found", "Not Found");
    let client = HttpArchiveClient::new().unwrap();
    let query = SearchQuery::from(&FetchConfig::default());

    let response = client.search(&endpoint, &query).unwrap();
    assert_eq!(response, ArchiveResponse { status: 404, body: "Not Found".into() });

    let request_line = server.join().unwrap();
    assert!(request_line.starts_with("GET /data/api/inschrift/suche?"));
    assert!(request_line.contains("inschriftgattung=titsep"));
    assert!(request_line.contains("jahr_a=200"));
    assert!(request_line.contains("limit=1000000"));
}

#[test]
fn http_fetch_against_local_server_writes_file() {
    let (endpoint, server) = serve_once("200 OK", r#"{"items":[{"id":"HD000001"}]}"#);
    let temp = tempfile::tempdir().unwrap();
    let output = temp.path().join("results.json");
    let config = FetchConfig { endpoint, ..FetchConfig::default() };

    let client = HttpArchiveClient::new().unwrap();
    let meta = fetch_to_file(&client, &config, &output, &temp.path().join("fetch.json")).unwrap();
    server.join().unwrap();

    assert_eq!(meta.item_count, 1);
    assert!(output.is_file());
}
