//! Shared test fixtures for the CS2 price SDK integration tests.
//!
//! Provides `StubBackend`, a tiny HTTP server on a loopback port that answers
//! GET requests with canned JSON, plus sample payloads mirroring what the
//! tracker backend returns.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;

use chrono::{DateTime, TimeZone, Utc};
use cs2_price_sdk::models::{PriceObservation, PriceSource};
use cs2_price_sdk::SkinTrackerSdk;

// ---------------------------------------------------------------------------
// StubBackend
// ---------------------------------------------------------------------------

#[derive(Clone)]
struct Route {
    status: u16,
    body: String,
}

/// Loopback HTTP server serving fixed responses keyed by request path.
///
/// Paths are matched without their query string. Unknown paths answer 404.
/// Every request target (path and query) is recorded in order of arrival.
pub struct StubBackend {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubBackend {
    pub fn start(routes: &[(&str, u16, String)]) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let routes: Arc<HashMap<String, Route>> = Arc::new(
            routes
                .iter()
                .map(|(path, status, body)| {
                    (
                        format!("/api{}", path),
                        Route {
                            status: *status,
                            body: body.clone(),
                        },
                    )
                })
                .collect(),
        );
        let requests = Arc::new(Mutex::new(Vec::new()));

        let log = requests.clone();
        thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                let routes = routes.clone();
                let log = log.clone();
                thread::spawn(move || handle(stream, &routes, &log));
            }
        });

        Self {
            base_url: format!("http://{}/api", addr),
            requests,
        }
    }

    /// Request targets received so far, e.g. `/api/items?limit=100`.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn sdk(&self) -> SkinTrackerSdk {
        SkinTrackerSdk::builder()
            .base_url(&self.base_url)
            .build()
            .unwrap()
    }
}

fn handle(stream: TcpStream, routes: &HashMap<String, Route>, log: &Mutex<Vec<String>>) {
    let mut reader = BufReader::new(stream.try_clone().unwrap());
    let mut request_line = String::new();
    if reader.read_line(&mut request_line).is_err() {
        return;
    }
    // Drain headers; GET requests carry no body.
    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) if line == "\r\n" || line == "\n" => break,
            Ok(_) => continue,
            Err(_) => return,
        }
    }

    let target = request_line
        .split_whitespace()
        .nth(1)
        .unwrap_or("/")
        .to_string();
    log.lock().unwrap().push(target.clone());

    let path = target.split('?').next().unwrap_or("/");
    let route = routes.get(path).cloned().unwrap_or(Route {
        status: 404,
        body: r#"{"detail":"Not Found"}"#.to_string(),
    });

    let reason = match route.status {
        200 => "OK",
        404 => "Not Found",
        500 => "Internal Server Error",
        _ => "Status",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        route.status,
        reason,
        route.body.len(),
        route.body
    );
    let mut stream = stream;
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

/// A base URL nothing listens on.
pub fn unreachable_base_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}

// ---------------------------------------------------------------------------
// Sample payloads
// ---------------------------------------------------------------------------

pub fn items_json() -> String {
    serde_json::json!([
        {
            "item_id": "ak47-redline-ft",
            "market_hash_name": "AK-47 | Redline (Field-Tested)",
            "type": "sale",
            "buff_price": 10.5,
            "steam_price": 13.2,
            "url": "https://buff.163.com/goods/33960",
            "created_at": "2024-03-01T10:00:00"
        },
        {
            "item_id": 1042,
            "market_hash_name": "AWP | Asiimov (Field-Tested)",
            "type": "purchase",
            "buff_price": null,
            "steam_price": 95.0
        }
    ])
    .to_string()
}

pub fn item_json() -> String {
    serde_json::json!({
        "item_id": "ak47-redline-ft",
        "market_hash_name": "AK-47 | Redline (Field-Tested)",
        "type": "sale",
        "buff_price": 10.5,
        "steam_price": 13.2
    })
    .to_string()
}

/// History in the backend's order (newest first), naive UTC timestamps.
pub fn history_json() -> String {
    serde_json::json!([
        {"price": 130.0, "volume": 4, "source": "steam", "timestamp": "2024-03-03T12:00:00", "market_hash_name": "AK-47 | Redline (Field-Tested)"},
        {"price": 100.0, "volume": 9, "source": "buff", "timestamp": "2024-03-03T12:00:00", "market_hash_name": "AK-47 | Redline (Field-Tested)"},
        {"price": 110.0, "volume": 2, "source": "steam", "timestamp": "2024-03-02T12:00:00", "market_hash_name": "AK-47 | Redline (Field-Tested)"},
        {"price": 100.0, "volume": 7, "source": "buff", "timestamp": "2024-03-01T12:00:00", "market_hash_name": "AK-47 | Redline (Field-Tested)"}
    ])
    .to_string()
}

pub fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap()
}

pub fn obs(source: PriceSource, price: f64, day: u32, hour: u32) -> PriceObservation {
    PriceObservation::new(price, ts(day, hour), source)
}
