use crate::http::error::FetchError;
use crate::http::fetcher::JsonFetcher;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Canned responses keyed by `url?k=v&k=v`. Unscripted requests get a 404.
#[derive(Default)]
pub struct ScriptedFetcher {
    responses: HashMap<String, Result<Value, FetchError>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key(url: &str, params: &[(&str, String)]) -> String {
        if params.is_empty() {
            return url.to_string();
        }
        let query = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", url, query)
    }

    pub fn respond(mut self, key: &str, body: Value) -> Self {
        self.responses.insert(key.to_string(), Ok(body));
        self
    }

    pub fn fail(mut self, key: &str, err: FetchError) -> Self {
        self.responses.insert(key.to_string(), Err(err));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl JsonFetcher for ScriptedFetcher {
    async fn fetch_json(&self, url: &str, params: &[(&str, String)]) -> Result<Value, FetchError> {
        let key = Self::key(url, params);
        self.calls.lock().unwrap().push(key.clone());
        self.responses.get(&key).cloned().unwrap_or(Err(FetchError::Status {
            url: url.to_string(),
            status: 404,
        }))
    }
}
