//! Deterministic model doubles for pipeline tests.

use crate::model::{LlmError, NarrativeModel};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Model that replays a queue of canned responses.
///
/// Once the queue is exhausted the last response is repeated, so a bounded
/// refinement loop can run any number of iterations against a short script.
/// Every prompt is recorded for assertions.
#[derive(Debug)]
pub struct ScriptedModel {
    responses: Mutex<VecDeque<String>>,
    last: Mutex<String>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    /// Model that always answers `response`.
    #[must_use]
    pub fn always(response: &str) -> Self {
        Self::with_responses([response])
    }

    /// Model that answers from `responses` in order.
    #[must_use]
    pub fn with_responses<'a>(responses: impl IntoIterator<Item = &'a str>) -> Self {
        let queue: VecDeque<String> = responses.into_iter().map(str::to_string).collect();
        let last = queue.back().cloned().unwrap_or_default();
        Self {
            responses: Mutex::new(queue),
            last: Mutex::new(last),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of generation calls issued so far.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received, in call order.
    #[must_use]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl NarrativeModel for ScriptedModel {
    async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().push(prompt.to_string());

        if let Some(next) = self.responses.lock().pop_front() {
            *self.last.lock() = next.clone();
            return Ok(next);
        }
        Ok(self.last.lock().clone())
    }
}
