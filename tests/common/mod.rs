//! Shared helpers: mock Esplora endpoint, recording fakes, record fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use bitcoin::secp256k1::SecretKey;
use bitcoin::{NetworkKind, PrivateKey};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use txpush::{BroadcastError, BroadcastResult, RawBroadcaster, SigningCapability, SigningRequest};

/// One request as seen by the mock endpoint.
#[derive(Debug, Clone)]
pub struct CapturedRequest {
    pub head: String,
    pub body: String,
}

impl CapturedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.head.lines().find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case(name).then(|| value.trim().to_string())
        })
    }
}

pub struct MockEsplora {
    pub addr: SocketAddr,
    pub requests: Arc<Mutex<Vec<CapturedRequest>>>,
}

impl MockEsplora {
    /// Esplora API base; the broadcaster appends `/tx`.
    pub fn base_url(&self) -> String { format!("http://{}", self.addr) }

    pub fn hits(&self) -> usize { self.requests.lock().unwrap().len() }
}

/// Start an endpoint that answers every request with `status` and `body`.
pub async fn start_mock_esplora(status: u16, body: &'static str) -> MockEsplora {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let seen = requests.clone();

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { break };
            let seen = seen.clone();
            tokio::spawn(async move {
                if let Some(request) = read_request(&mut socket).await {
                    seen.lock().unwrap().push(request);
                }
                let status_text = match status {
                    200 => "200 OK",
                    400 => "400 Bad Request",
                    500 => "500 Internal Server Error",
                    503 => "503 Service Unavailable",
                    _ => "200 OK",
                };
                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_text,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockEsplora { addr, requests }
}

/// Start an endpoint that accepts connections and never answers.
pub async fn start_silent_backend() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                drop(socket);
            });
        }
    });
    addr
}

/// An address nothing listens on.
pub async fn closed_port() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr
}

async fn read_request(socket: &mut tokio::net::TcpStream) -> Option<CapturedRequest> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    let header_end = loop {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let content_length = head
        .lines()
        .find_map(|line| {
            let (key, value) = line.split_once(':')?;
            key.trim().eq_ignore_ascii_case("content-length").then(|| value.trim().parse::<usize>().ok())?
        })
        .unwrap_or(0);
    while buf.len() < header_end + content_length {
        let n = socket.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let body = String::from_utf8_lossy(&buf[header_end..]).to_string();
    Some(CapturedRequest { head, body })
}

/// Raw broadcaster that records calls and returns a fixed result.
#[derive(Clone)]
pub struct FakeRaw {
    txid: Option<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl FakeRaw {
    pub fn accepting(txid: &str) -> Self { Self { txid: Some(txid.into()), calls: Arc::default() } }
    pub fn rejecting() -> Self { Self { txid: None, calls: Arc::default() } }
    pub fn call_count(&self) -> usize { self.calls.lock().unwrap().len() }
}

#[async_trait]
impl RawBroadcaster for FakeRaw {
    async fn broadcast(&self, raw_hex: &str) -> BroadcastResult<String> {
        self.calls.lock().unwrap().push(raw_hex.to_string());
        self.txid.clone().ok_or(BroadcastError::Rejected { status: 500, body: "mock failure".into() })
    }
}

/// Signing capability that records requests and returns a fixed result.
#[derive(Clone)]
pub struct FakeSigner {
    txid: Option<String>,
    pub requests: Arc<Mutex<Vec<SigningRequest>>>,
    calls: Arc<AtomicUsize>,
}

impl FakeSigner {
    pub fn succeeding(txid: &str) -> Self { Self { txid: Some(txid.into()), requests: Arc::default(), calls: Arc::default() } }
    pub fn failing() -> Self { Self { txid: None, requests: Arc::default(), calls: Arc::default() } }
    pub fn call_count(&self) -> usize { self.calls.load(Ordering::SeqCst) }
    pub fn last_request(&self) -> Option<SigningRequest> { self.requests.lock().unwrap().last().cloned() }
}

#[async_trait]
impl SigningCapability for FakeSigner {
    fn name(&self) -> &str { "fake" }

    async fn sign_and_send(&self, request: SigningRequest) -> BroadcastResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request);
        self.txid.clone().ok_or_else(|| BroadcastError::Signing("insufficient funds".into()))
    }
}

/// Deterministic testnet key (never use with real funds).
pub fn test_key() -> PrivateKey {
    PrivateKey::new(SecretKey::from_slice(&[0x42; 32]).unwrap(), NetworkKind::Test)
}

pub fn test_wif() -> String { test_key().to_wif() }

/// `{from A, to B, 1000 sats}` record with the test key, optionally with raw hex.
pub fn sample_record(raw_hex: Option<&str>) -> Value {
    let mut record = json!({
        "transaction": {"from_address": "A", "to_address": "B", "amount_sats": 1000},
        "private_key_wif": test_wif(),
        "address": "A"
    });
    if let Some(hex) = raw_hex {
        record["raw_transaction_hex"] = json!(hex);
    }
    record
}

pub fn write_record(dir: &Path, record: &Value) -> PathBuf {
    let path = dir.join("pending_transaction.json");
    std::fs::write(&path, serde_json::to_string_pretty(record).unwrap()).unwrap();
    path
}
