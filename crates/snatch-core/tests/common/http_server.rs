//! Minimal HTTP/1.1 server for integration tests.
//!
//! Serves GET requests from a route table that can be changed after startup
//! (so pages can embed the server's own URL). Routes may fail their first N
//! hits with 500. Every request's headers are recorded for assertions.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Route {
    pub status: u16,
    pub body: Vec<u8>,
    /// Answer the first `fail_first` hits with 500 before serving normally.
    pub fail_first: usize,
}

impl Route {
    pub fn ok(body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            body: body.into(),
            fail_first: 0,
        }
    }

    pub fn status(status: u16) -> Self {
        Self {
            status,
            body: Vec::new(),
            fail_first: 0,
        }
    }

    pub fn flaky(body: impl Into<Vec<u8>>, fail_first: usize) -> Self {
        Self {
            fail_first,
            ..Self::ok(body)
        }
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub path: String,
    pub headers: Vec<(String, String)>,
}

#[derive(Default)]
struct State {
    routes: HashMap<String, Route>,
    hits: HashMap<String, usize>,
    requests: Vec<RecordedRequest>,
}

#[derive(Clone)]
pub struct TestServer {
    base: String,
    state: Arc<Mutex<State>>,
}

impl TestServer {
    /// Starts a server on an ephemeral port. It runs until the process exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State::default()));
        let accept_state = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&accept_state);
                thread::spawn(move || handle(stream, &state));
            }
        });
        Self {
            base: format!("http://127.0.0.1:{}/", port),
            state,
        }
    }

    /// Base URL ending in `/`.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Absolute URL for `path` (leading `/` optional).
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path.trim_start_matches('/'))
    }

    pub fn route(&self, path: &str, route: Route) {
        let key = format!("/{}", path.trim_start_matches('/'));
        self.state.lock().unwrap().routes.insert(key, route);
    }

    pub fn hits(&self, path: &str) -> usize {
        let key = format!("/{}", path.trim_start_matches('/'));
        self.state.lock().unwrap().hits.get(&key).copied().unwrap_or(0)
    }

    /// Value of `name` on the most recent request to `path`.
    pub fn last_header(&self, path: &str, name: &str) -> Option<String> {
        let key = format!("/{}", path.trim_start_matches('/'));
        let state = self.state.lock().unwrap();
        state
            .requests
            .iter()
            .rev()
            .find(|r| r.path == key)?
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.clone())
    }
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));

    let mut raw = Vec::new();
    let mut buf = [0u8; 4096];
    while !raw.windows(4).any(|w| w == b"\r\n\r\n") {
        match stream.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => raw.extend_from_slice(&buf[..n]),
        }
    }
    let request = String::from_utf8_lossy(&raw);
    let Some(recorded) = parse_request(&request) else {
        return;
    };

    let (status, body) = {
        let mut st = state.lock().unwrap();
        let path_only = recorded.path.split('?').next().unwrap_or("").to_string();
        let hit = {
            let n = st.hits.entry(path_only.clone()).or_insert(0);
            *n += 1;
            *n
        };
        st.requests.push(RecordedRequest {
            path: path_only.clone(),
            headers: recorded.headers,
        });
        match st.routes.get(&path_only) {
            Some(route) if hit <= route.fail_first => (500, b"temporary failure".to_vec()),
            Some(route) => (route.status, route.body.clone()),
            None => (404, b"not found".to_vec()),
        }
    };

    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Length: {}\r\nContent-Type: application/octet-stream\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    let _ = stream.write_all(&body);
    let _ = stream.flush();
}

fn parse_request(request: &str) -> Option<RecordedRequest> {
    let mut lines = request.lines();
    let first = lines.next()?;
    let mut parts = first.split_whitespace();
    let _method = parts.next()?;
    let path = parts.next()?.to_string();
    let headers = lines
        .take_while(|l| !l.trim().is_empty())
        .filter_map(|l| l.split_once(':'))
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .collect();
    Some(RecordedRequest { path, headers })
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        403 => "Forbidden",
        404 => "Not Found",
        500 => "Internal Server Error",
        503 => "Service Unavailable",
        _ => "Unknown",
    }
}
