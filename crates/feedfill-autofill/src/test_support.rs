//! Test doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Semaphore;

use feedfill_protocols::{GenerationRequest, Generator, GeneratorError, Prompter};

pub struct MockGenerator {
    default: String,
    scripted: Mutex<VecDeque<Result<String, GeneratorError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
    delay: Option<Duration>,
    gate: Option<Arc<Semaphore>>,
}

impl MockGenerator {
    pub fn replying(text: &str) -> Self {
        Self {
            default: text.to_string(),
            scripted: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            delay: None,
            gate: None,
        }
    }

    pub fn then(self, result: Result<String, GeneratorError>) -> Self {
        self.scripted.lock().push_back(result);
        self
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every call waits for a permit on the returned semaphore.
    pub fn gated(mut self) -> (Self, Arc<Semaphore>) {
        let gate = Arc::new(Semaphore::new(0));
        self.gate = Some(gate.clone());
        (self, gate)
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }
}

#[async_trait]
impl Generator for MockGenerator {
    fn id(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, GeneratorError> {
        self.requests.lock().push(request.clone());
        if let Some(gate) = &self.gate {
            if let Ok(permit) = gate.acquire().await {
                permit.forget();
            }
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.scripted.lock().pop_front();
        scripted.unwrap_or_else(|| Ok(self.default.clone()))
    }
}

pub struct ScriptedPrompter {
    answer: Option<String>,
    asked: Mutex<Vec<(String, String)>>,
}

impl ScriptedPrompter {
    pub fn answering(answer: Option<&str>) -> Self {
        Self {
            answer: answer.map(str::to_string),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn asked(&self) -> Vec<(String, String)> {
        self.asked.lock().clone()
    }
}

#[async_trait]
impl Prompter for ScriptedPrompter {
    async fn prompt(&self, message: &str, default: &str) -> Option<String> {
        self.asked
            .lock()
            .push((message.to_string(), default.to_string()));
        self.answer.clone()
    }
}
