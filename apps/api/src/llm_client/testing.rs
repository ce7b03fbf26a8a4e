//! In-process `ModelInvoker` fake for pipeline and router tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{LlmError, ModelInvoker};

/// Replays queued replies in call order and records every prompt it receives.
/// An exhausted queue answers with `LlmError::EmptyContent`.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, LlmError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedModel {
    pub fn new(replies: Vec<Result<String, LlmError>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ModelInvoker for ScriptedModel {
    async fn invoke(&self, prompt: &str, _timeout: Duration) -> Result<String, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(LlmError::EmptyContent))
    }
}

/// A well-formed tagged reply.
pub fn tagged_reply(fit: u32, risk: u32, verdict: &str, report: &str) -> String {
    format!("FIT_SCORE: {fit}\nRISK_SCORE: {risk}\nVERDICT: {verdict}\nREPORT:\n{report}\n")
}
