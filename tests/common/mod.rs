//! Scripted in-memory transport for driving the client without a network.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use catalog_sync::adapters::{ClientSettings, HttpReply, TmdbClient, Transport, TransportError};
use serde_json::json;

pub const BASE_URL: &str = "http://tmdb.test/3";
pub const API_KEY: &str = "test-key";

/// A recorded request
#[derive(Debug, Clone)]
pub struct Call {
    pub path: String,
    pub params: BTreeMap<String, String>,
}

enum Route {
    Reply(HttpReply),
    Fail,
    Panic(&'static str),
}

/// Transport answering from a fixed route table.
///
/// Routes are keyed by path and optional `page`; unmatched requests get 404.
#[derive(Default)]
pub struct ScriptedTransport {
    routes: HashMap<(String, Option<String>), Route>,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<Call>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Listing page with the given result entries
    pub fn listing(mut self, path: &str, page: u32, results: serde_json::Value) -> Self {
        let body = json!({ "page": page, "results": results }).to_string();
        self.routes.insert(
            (path.to_string(), Some(page.to_string())),
            Route::Reply(HttpReply::new(200, body)),
        );
        self
    }

    /// Raw reply for a path (any page)
    pub fn reply(mut self, path: &str, status: u16, body: &str) -> Self {
        self.routes
            .insert((path.to_string(), None), Route::Reply(HttpReply::new(status, body)));
        self
    }

    /// Transport-level failure for a path (any page)
    pub fn fail(mut self, path: &str) -> Self {
        self.routes.insert((path.to_string(), None), Route::Fail);
        self
    }

    /// Panic while answering a path (any page)
    pub fn panic_on(mut self, path: &str, message: &'static str) -> Self {
        self.routes.insert((path.to_string(), None), Route::Panic(message));
        self
    }

    /// External IDs answer for an item
    pub fn imdb(self, segment: &str, id: u64, imdb_id: Option<&str>) -> Self {
        let path = format!("/{}/{}/external_ids", segment, id);
        let body = json!({ "id": id, "imdb_id": imdb_id }).to_string();
        self.reply(&path, 200, &body)
    }

    /// Delay answering a path
    pub fn delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(path.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.path).collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(
        &self,
        url: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<HttpReply, TransportError> {
        let path = url.strip_prefix(BASE_URL).unwrap_or(url).to_string();
        self.calls.lock().unwrap().push(Call {
            path: path.clone(),
            params: params.clone(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(delay) = self.delays.get(&path) {
            tokio::time::sleep(*delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let route = self
            .routes
            .get(&(path.clone(), params.get("page").cloned()))
            .or_else(|| self.routes.get(&(path.clone(), None)));

        match route {
            Some(Route::Reply(reply)) => Ok(reply.clone()),
            Some(Route::Fail) => Err(TransportError::Request {
                url: url.to_string(),
                message: "connection reset".to_string(),
            }),
            Some(Route::Panic(message)) => panic!("{}", message),
            None => Ok(HttpReply::new(
                404,
                r#"{"status_code":34,"status_message":"The resource you requested could not be found."}"#,
            )),
        }
    }
}

pub fn settings(page_limit: u32) -> ClientSettings {
    let mut settings = ClientSettings::new(API_KEY);
    settings.base_url = BASE_URL.to_string();
    settings.page_limit = page_limit;
    settings
}

pub fn client(transport: ScriptedTransport) -> TmdbClient<ScriptedTransport> {
    TmdbClient::with_transport(settings(1), transport)
}
