//! Shared test fixtures

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::{ready, Ready};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use pipectl::{PipelineApi, PipelineError};
use secrecy::SecretString;
use serde_json::{json, Value};

/// One request seen by [`ScriptedApi`]
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

/// In-memory transport that answers operation polls from a script
pub struct ScriptedApi {
    trigger_response: Value,
    operations: Mutex<VecDeque<Value>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedApi {
    /// Polls of `operation_id` return the given statuses in order.
    /// An empty status string produces a record with no `status` field.
    pub fn new(operation_id: &str, statuses: &[&str]) -> Self {
        let operations = statuses
            .iter()
            .enumerate()
            .map(|(poll, status)| {
                let mut record = json!({
                    "id": operation_id,
                    "sourceStageOrder": 0,
                    "targetStageOrder": 1,
                    "poll": poll,
                });
                if !status.is_empty() {
                    record["status"] = json!(status);
                }
                record
            })
            .collect();

        Self {
            trigger_response: json!({ "id": operation_id, "status": "NotStarted" }),
            operations: Mutex::new(operations),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_trigger_response(mut self, response: Value) -> Self {
        self.trigger_response = response;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str, path_fragment: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.method == method && call.path.contains(path_fragment))
            .count()
    }

    fn record(&self, method: &'static str, path: &str, body: Option<&Value>) {
        self.calls.lock().unwrap().push(Call {
            method,
            path: path.to_string(),
            body: body.cloned(),
        });
    }
}

#[async_trait]
impl PipelineApi for ScriptedApi {
    async fn get(&self, path: &str, _token: &SecretString) -> Result<Value, PipelineError> {
        self.record("GET", path, None);
        if path.contains("/operations/") {
            return self
                .operations
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| PipelineError::ApiError {
                    status: 500,
                    body: "script exhausted".to_string(),
                });
        }
        Ok(json!({ "value": [] }))
    }

    async fn post(
        &self,
        path: &str,
        _token: &SecretString,
        body: Option<&Value>,
    ) -> Result<Value, PipelineError> {
        self.record("POST", path, body);
        Ok(self.trigger_response.clone())
    }

    async fn patch(
        &self,
        path: &str,
        _token: &SecretString,
        body: &Value,
    ) -> Result<Value, PipelineError> {
        self.record("PATCH", path, Some(body));
        Ok(Value::Null)
    }

    async fn delete(&self, path: &str, _token: &SecretString) -> Result<Value, PipelineError> {
        self.record("DELETE", path, None);
        Ok(Value::Null)
    }
}

/// Sleep stand-in that records each requested delay and returns at once
pub fn recording_sleep(log: Arc<Mutex<Vec<Duration>>>) -> impl Fn(Duration) -> Ready<()> {
    move |duration| {
        log.lock().unwrap().push(duration);
        ready(())
    }
}

pub fn token() -> SecretString {
    SecretString::from("test-token".to_string())
}
