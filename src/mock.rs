//! In-memory lights and sinks, and a canned-reply HTTP bridge, for tests.

use std::collections::VecDeque;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::errors::Error;
use crate::events::{EventSink, MonitorEvent};
use crate::light::{LightControl, LightDirectory};
use crate::types::{Brightness, LightId};

type Result<T> = std::result::Result<T, Error>;

/// A light that plays back a scripted brightness sequence.
///
/// Each read consumes one value; the last value is repeated once the script
/// runs out. Writes are recorded and do not alter the script.
pub(crate) struct MockLight {
    id: LightId,
    name: String,
    script: Mutex<VecDeque<Brightness>>,
    writes: Mutex<Vec<Brightness>>,
    reads: AtomicUsize,
    write_attempts: AtomicUsize,
    latency: Duration,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl MockLight {
    pub fn new(id: u32, name: &str, initial: u8) -> Self {
        Self::scripted(id, name, &[initial])
    }

    pub fn scripted(id: u32, name: &str, values: &[u8]) -> Self {
        assert!(!values.is_empty(), "script needs at least one value");
        MockLight {
            id: LightId::new(id),
            name: name.to_string(),
            script: Mutex::new(values.iter().copied().map(Brightness::new).collect()),
            writes: Mutex::new(Vec::new()),
            reads: AtomicUsize::new(0),
            write_attempts: AtomicUsize::new(0),
            latency: Duration::ZERO,
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Simulated round trip for every read and write.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Replaces the script with a single steady value.
    pub fn set(&self, value: u8) {
        let mut script = self.script.lock().unwrap();
        script.clear();
        script.push_back(Brightness::new(value));
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Successful and failed writes alike.
    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    pub fn writes(&self) -> Vec<u8> {
        self.writes.lock().unwrap().iter().map(Brightness::value).collect()
    }

    async fn round_trip(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    fn failure(&self, action: &str) -> Error {
        Error::Bridge {
            kind: 901,
            address: format!("/lights/{}", self.id),
            description: format!("mock {action} failure"),
        }
    }
}

impl LightControl for MockLight {
    fn id(&self) -> LightId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    async fn brightness(&self) -> Result<Brightness> {
        self.round_trip().await;
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(self.failure("read"));
        }

        let mut script = self.script.lock().unwrap();
        let value = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().copied()
        };
        Ok(value.unwrap_or_default())
    }

    async fn set_brightness(&self, value: Brightness) -> Result<()> {
        self.round_trip().await;
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(self.failure("write"));
        }
        self.writes.lock().unwrap().push(value);
        Ok(())
    }
}

/// A fixed set of mock lights.
pub(crate) struct MockDirectory {
    pub lights: Vec<(u32, String, u8)>,
}

impl LightDirectory for MockDirectory {
    type Light = MockLight;

    async fn list_lights(&self) -> Result<Vec<MockLight>> {
        Ok(self
            .lights
            .iter()
            .map(|(id, name, bri)| MockLight::new(*id, name, *bri))
            .collect())
    }
}

/// Keeps every emitted event.
#[derive(Default)]
pub(crate) struct RecordingSink {
    events: Mutex<Vec<MonitorEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<MonitorEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&MonitorEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(*e)).count()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &MonitorEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

/// A request seen by [`FakeBridge`].
#[derive(Debug, Clone)]
pub(crate) struct Request {
    pub method: String,
    pub path: String,
    /// `Value::Null` when the request had no body.
    pub body: Value,
}

struct Route {
    method: String,
    path: String,
    replies: VecDeque<Value>,
}

type Routes = Arc<Mutex<Vec<Route>>>;
type Requests = Arc<Mutex<Vec<Request>>>;

/// An HTTP server on localhost that answers bridge requests with canned JSON.
///
/// Each route plays back its replies in order and repeats the last one.
/// Requests to unknown routes get a 404.
pub(crate) struct FakeBridge {
    addr: SocketAddr,
    routes: Routes,
    requests: Requests,
}

impl FakeBridge {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let routes = Routes::default();
        let requests = Requests::default();

        let (r, q) = (Arc::clone(&routes), Arc::clone(&requests));
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                tokio::spawn(serve(stream, Arc::clone(&r), Arc::clone(&q)));
            }
        });

        FakeBridge {
            addr,
            routes,
            requests,
        }
    }

    pub fn route(&self, method: &str, path: &str, replies: &[Value]) -> &Self {
        assert!(!replies.is_empty(), "route needs at least one reply");
        self.routes.lock().unwrap().push(Route {
            method: method.to_string(),
            path: path.to_string(),
            replies: replies.iter().cloned().collect(),
        });
        self
    }

    /// Address to hand to [`Bridge`](crate::Bridge).
    pub fn host(&self) -> String {
        self.addr.to_string()
    }

    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().unwrap().clone()
    }
}

async fn serve(mut stream: TcpStream, routes: Routes, requests: Requests) {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];

    let head_len = loop {
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    };

    let head = String::from_utf8_lossy(&buf[..head_len]).into_owned();
    let mut lines = head.lines();
    let mut request_line = lines.next().unwrap_or_default().split_whitespace();
    let method = request_line.next().unwrap_or_default().to_string();
    let path = request_line.next().unwrap_or_default().to_string();
    let content_length = lines
        .filter_map(|l| l.split_once(':'))
        .find(|(k, _)| k.trim().eq_ignore_ascii_case("content-length"))
        .and_then(|(_, v)| v.trim().parse::<usize>().ok())
        .unwrap_or(0);

    while buf.len() < head_len + content_length {
        match stream.read(&mut chunk).await {
            Ok(0) | Err(_) => return,
            Ok(n) => buf.extend_from_slice(&chunk[..n]),
        }
    }
    let body = serde_json::from_slice(&buf[head_len..head_len + content_length])
        .unwrap_or(Value::Null);

    let reply = {
        let mut routes = routes.lock().unwrap();
        routes
            .iter_mut()
            .find(|r| r.method == method && r.path == path)
            .and_then(|r| {
                if r.replies.len() > 1 {
                    r.replies.pop_front()
                } else {
                    r.replies.front().cloned()
                }
            })
    };
    requests.lock().unwrap().push(Request { method, path, body });

    let (status, payload) = match reply {
        Some(v) => ("200 OK", v.to_string()),
        None => ("404 Not Found", "[]".to_string()),
    };
    let response = format!(
        "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{payload}",
        payload.len()
    );
    let _ = stream.write_all(response.as_bytes()).await;
    let _ = stream.shutdown().await;
}
