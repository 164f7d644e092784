//! Scripted `TextGenerator` for tests: replays canned envelopes in order and
//! records every prompt it receives.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{LlmError, TextGenerator};

#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<Value>>,
    prompts: Mutex<Vec<String>>,
    unreachable: bool,
}

impl ScriptedGenerator {
    pub fn with_replies(replies: Vec<Value>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    /// Replies with envelopes whose text payloads are `texts`.
    pub fn with_texts(texts: &[&str]) -> Self {
        Self::with_replies(texts.iter().map(|t| text_envelope(t)).collect())
    }

    /// Every call fails as if the upstream returned a non-JSON body.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Default::default()
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

pub fn text_envelope(text: &str) -> Value {
    json!({"candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]})
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<Value, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if self.unreachable {
            let source = serde_json::from_str::<Value>("<html>502 Bad Gateway</html>")
                .unwrap_err();
            return Err(LlmError::NonJsonBody {
                status: 502,
                source,
            });
        }

        // Out of script: behave like an empty envelope.
        Ok(self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| json!({})))
    }
}
