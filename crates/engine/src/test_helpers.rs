//! Shared test utilities for engine unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use docroute_core::error::ProviderError;
use docroute_core::message::Message;
use docroute_core::provider::{FinishReason, Provider, ProviderRequest, ProviderResponse, Usage};

/// A mock provider that plays back scripted answers in sequence.
///
/// Once the script runs out it repeats `always` if set, otherwise panics.
pub struct ScriptedProvider {
    script: Mutex<VecDeque<Result<String, ProviderError>>>,
    always: Option<Result<String, ProviderError>>,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            script: Mutex::new(answers.iter().map(|a| Ok(a.to_string())).collect()),
            always: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call with the same text.
    pub fn always(answer: &str) -> Self {
        Self {
            always: Some(Ok(answer.to_string())),
            ..Self::new(&[])
        }
    }

    /// Fail every call with the same error.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            always: Some(Err(error)),
            ..Self::new(&[])
        }
    }

    /// Queue an error ahead of the remaining script.
    pub fn then_error(self, error: ProviderError) -> Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    /// Queue another answer.
    pub fn then(self, answer: &str) -> Self {
        self.script.lock().unwrap().push_back(Ok(answer.to_string()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted_mock"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let call = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request);
            requests.len()
        };

        let next = self.script.lock().unwrap().pop_front();
        let answer = match (next, &self.always) {
            (Some(answer), _) => answer,
            (None, Some(always)) => always.clone(),
            (None, None) => panic!("ScriptedProvider: no more responses (call #{call})"),
        };
        answer.map(|text| make_text_response(&text))
    }
}

/// Create a simple text response.
pub fn make_text_response(text: &str) -> ProviderResponse {
    ProviderResponse {
        message: Message::assistant(text),
        usage: Some(Usage {
            prompt_tokens: 10,
            completion_tokens: 5,
            total_tokens: 15,
        }),
        model: "mock-model".into(),
        finish_reason: Some(FinishReason::Stop),
    }
}
