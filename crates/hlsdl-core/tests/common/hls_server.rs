//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves fixed bodies by path (manifests and segments). A route can be
//! scripted to answer with error statuses before it succeeds. Unknown paths
//! get 404. Every request is counted per path.

use std::collections::{HashMap, VecDeque};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
struct Route {
    body: Vec<u8>,
    content_type: String,
    failures: VecDeque<u16>,
    delay: Duration,
}

#[derive(Default)]
struct State {
    routes: HashMap<String, Route>,
    hits: HashMap<String, usize>,
}

/// Routes to serve; call [`HlsServerBuilder::start`] to bind.
#[derive(Default)]
pub struct HlsServerBuilder {
    routes: HashMap<String, Route>,
}

impl HlsServerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `path` (e.g. "/live/index.m3u8").
    pub fn route(mut self, path: &str, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        self.routes.insert(
            path.to_string(),
            Route {
                body: body.into(),
                content_type: content_type.to_string(),
                failures: VecDeque::new(),
                delay: Duration::ZERO,
            },
        );
        self
    }

    pub fn playlist(self, path: &str, text: &str) -> Self {
        self.route(path, "application/vnd.apple.mpegurl", text.as_bytes().to_vec())
    }

    pub fn segment(self, path: &str, body: impl Into<Vec<u8>>) -> Self {
        self.route(path, "video/mp2t", body)
    }

    /// Answer `path` with these statuses, in order, before serving the body.
    pub fn fail(mut self, path: &str, statuses: &[u16]) -> Self {
        if let Some(r) = self.routes.get_mut(path) {
            r.failures.extend(statuses.iter().copied());
        }
        self
    }

    pub fn delay(mut self, path: &str, delay: Duration) -> Self {
        if let Some(r) = self.routes.get_mut(path) {
            r.delay = delay;
        }
        self
    }

    /// Starts the server on an ephemeral port. It runs until the process exits.
    pub fn start(self) -> HlsServer {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State {
            routes: self.routes,
            hits: HashMap::new(),
        }));
        let shared = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&shared);
                thread::spawn(move || handle(stream, &state));
            }
        });
        HlsServer {
            base: format!("http://127.0.0.1:{}", port),
            state,
        }
    }
}

pub struct HlsServer {
    base: String,
    state: Arc<Mutex<State>>,
}

impl HlsServer {
    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Requests received for `path` so far.
    pub fn hits(&self, path: &str) -> usize {
        self.state.lock().unwrap().hits.get(path).copied().unwrap_or(0)
    }
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let mut buf = [0u8; 8192];
    let n = match stream.read(&mut buf) {
        Ok(0) | Err(_) => return,
        Ok(n) => n,
    };
    let Ok(request) = std::str::from_utf8(&buf[..n]) else {
        return;
    };
    let mut parts = request.lines().next().unwrap_or("").split_whitespace();
    let method = parts.next().unwrap_or("");
    let path = parts.next().unwrap_or("/").to_string();
    if !method.eq_ignore_ascii_case("GET") {
        let _ = stream.write_all(b"HTTP/1.1 405 Method Not Allowed\r\nContent-Length: 0\r\nConnection: close\r\n\r\n");
        return;
    }

    let answer = {
        let mut st = state.lock().unwrap();
        *st.hits.entry(path.clone()).or_default() += 1;
        st.routes.get_mut(&path).map(|r| match r.failures.pop_front() {
            Some(code) => (code, String::from("text/plain"), Vec::new(), r.delay),
            None => (200, r.content_type.clone(), r.body.clone(), r.delay),
        })
    };
    let (status, content_type, body, delay) =
        answer.unwrap_or((404, String::from("text/plain"), Vec::new(), Duration::ZERO));
    if !delay.is_zero() {
        thread::sleep(delay);
    }
    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        content_type,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        _ => "Status",
    }
}
