//! Minimal canned HTTP server for exercising the Overpass provider.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Response the server sends for every connection.
#[derive(Debug, Clone)]
pub struct CannedResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body, sent as JSON.
    pub body: String,
    /// Pause between reading the request and answering.
    pub delay: Duration,
}

impl CannedResponse {
    /// A 200 response carrying `body`.
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_owned(),
            delay: Duration::ZERO,
        }
    }

    /// A response with an arbitrary status.
    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_owned(),
            delay: Duration::ZERO,
        }
    }

    /// Answer only after `delay`.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Local HTTP server answering a fixed number of requests with one response.
pub struct CannedServer {
    url: String,
    bodies: Arc<Mutex<Vec<String>>>,
    handle: Option<JoinHandle<()>>,
}

impl CannedServer {
    /// Bind an ephemeral port and serve `connections` requests.
    pub fn start(response: CannedResponse, connections: usize) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind local listener");
        let address = listener.local_addr().expect("listener address");
        let bodies = Arc::new(Mutex::new(Vec::new()));
        let recorded = Arc::clone(&bodies);
        let handle = thread::spawn(move || {
            for stream in listener.incoming().take(connections) {
                let Ok(stream) = stream else { continue };
                serve(stream, &response, &recorded);
            }
        });
        Self {
            url: format!("http://{address}/api/interpreter"),
            bodies,
            handle: Some(handle),
        }
    }

    /// Interpreter URL pointing at this server.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Request bodies received so far.
    pub fn bodies(&self) -> Vec<String> {
        self.bodies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Drop for CannedServer {
    fn drop(&mut self) {
        // The listener thread exits once it has served its quota; a test
        // that sent fewer requests simply leaves it parked in `accept`.
        if let Some(handle) = self.handle.take() {
            if handle.is_finished() {
                let _ = handle.join();
            }
        }
    }
}

fn serve(stream: TcpStream, response: &CannedResponse, bodies: &Mutex<Vec<String>>) {
    let mut reader = BufReader::new(stream);
    let mut content_length = 0_usize;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            return;
        }
        let trimmed = line.trim_end();
        if trimmed.is_empty() {
            break;
        }
        if let Some((name, value)) = trimmed.split_once(':') {
            if name.eq_ignore_ascii_case("content-length") {
                content_length = value.trim().parse().unwrap_or(0);
            }
        }
    }
    let mut body = vec![0_u8; content_length];
    if reader.read_exact(&mut body).is_err() {
        return;
    }
    bodies
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(String::from_utf8_lossy(&body).into_owned());

    thread::sleep(response.delay);
    let mut stream = reader.into_inner();
    let payload = format!(
        "HTTP/1.1 {} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        response.status,
        response.body.len(),
        response.body
    );
    let _ = stream.write_all(payload.as_bytes());
    let _ = stream.flush();
}
