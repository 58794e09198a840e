//! Mock generation service for integration tests

#![allow(dead_code)]

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tiny_http::{Header, Response, Server};

/// A request as received by the mock service
#[derive(Debug, Clone)]
pub struct Captured {
    pub method: String,
    pub url: String,
    pub content_type: String,
    pub body: Vec<u8>,
}

impl Captured {
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Start a server on an ephemeral port that answers the given
/// `(status, body)` pairs in order, then stops accepting.
pub fn mock_service(replies: Vec<(u16, &'static str)>) -> (String, Arc<Mutex<Vec<Captured>>>) {
    mock_service_with_delay(replies, Duration::ZERO)
}

pub fn mock_service_with_delay(
    replies: Vec<(u16, &'static str)>,
    delay: Duration,
) -> (String, Arc<Mutex<Vec<Captured>>>) {
    let server = Server::http("127.0.0.1:0").unwrap();
    let origin = format!("http://{}", server.server_addr());
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = captured.clone();

    std::thread::spawn(move || {
        for (status, body) in replies {
            let mut request = match server.recv() {
                Ok(r) => r,
                Err(_) => return,
            };
            let mut buf = Vec::new();
            let _ = request.as_reader().read_to_end(&mut buf);
            let content_type = request
                .headers()
                .iter()
                .find(|h| h.field.equiv("Content-Type"))
                .map(|h| h.value.as_str().to_string())
                .unwrap_or_default();
            sink.lock().unwrap().push(Captured {
                method: request.method().to_string(),
                url: request.url().to_string(),
                content_type,
                body: buf,
            });

            std::thread::sleep(delay);
            let response = Response::from_string(body)
                .with_status_code(status)
                .with_header("Content-Type: application/json".parse::<Header>().unwrap());
            let _ = request.respond(response);
        }
    });

    (origin, captured)
}

/// An origin with nothing listening on it
pub fn dead_origin() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}
