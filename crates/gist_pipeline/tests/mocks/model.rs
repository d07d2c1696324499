use std::sync::{Arc, Mutex};

use gist_pipeline::types::ModelConfig;
use gist_pipeline::CompletionModel;

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct MockModelError(pub String);

#[derive(Clone)]
enum FailMode {
    Never,
    Always(String),
    /// 1-based call numbers that fail; every other call succeeds.
    OnCalls(Vec<usize>),
}

#[derive(Clone)]
pub struct MockModel {
    /// Fixed reply, or `None` to echo the prompt back.
    reply: Option<String>,
    pub calls: Arc<Mutex<Vec<String>>>,
    fail: FailMode,
}

impl MockModel {
    pub fn new(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: FailMode::Never,
        }
    }

    pub fn echo() -> Self {
        Self {
            reply: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: FailMode::Never,
        }
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            reply: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: FailMode::Always(msg.to_string()),
        }
    }

    pub fn echo_failing_on(calls: &[usize]) -> Self {
        Self {
            reply: None,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: FailMode::OnCalls(calls.to_vec()),
        }
    }
}

impl CompletionModel for MockModel {
    type Error = MockModelError;

    async fn complete(&self, prompt: &str, _config: &ModelConfig) -> Result<String, Self::Error> {
        let call_number = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(prompt.to_string());
            calls.len()
        };

        match &self.fail {
            FailMode::Never => {}
            FailMode::Always(msg) => return Err(MockModelError(msg.clone())),
            FailMode::OnCalls(failing) => {
                if failing.contains(&call_number) {
                    return Err(MockModelError(format!(
                        "mock LLM failure on call {call_number}"
                    )));
                }
            }
        }

        Ok(self
            .reply
            .clone()
            .unwrap_or_else(|| prompt.to_string()))
    }
}
