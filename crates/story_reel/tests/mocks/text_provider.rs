use std::{
    collections::HashSet,
    sync::{Arc, Mutex},
};
use story_reel::{
    analyzer::ANALYSIS_INSTRUCTION, prompt::KEY_POINT_INSTRUCTION, TextCompletionProvider,
};

#[derive(Clone)]
pub struct MockTextProvider {
    pub analysis: String,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
    pub failing_key_points: HashSet<String>,
}

impl MockTextProvider {
    pub fn new(analysis: &str) -> Self {
        Self {
            analysis: analysis.to_string(),
            calls: Arc::new(Mutex::new(Vec::new())),
            fail_with: None,
            failing_key_points: HashSet::new(),
        }
    }

    pub fn from_fixture() -> Self {
        Self::new(include_str!("../fixtures/analysis_reply.txt"))
    }

    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Self::new("")
        }
    }

    /// Fails only the prompt request for `key_point`
    pub fn failing_for(mut self, key_point: &str) -> Self {
        self.failing_key_points.insert(key_point.to_string());
        self
    }
}

impl TextCompletionProvider for MockTextProvider {
    const PROVIDER_NAME: &'static str = "mock-llm";
    type Error = anyhow::Error;

    async fn complete(&self, prompt: &str) -> Result<String, Self::Error> {
        self.calls.lock().unwrap().push(prompt.to_string());
        if let Some(ref msg) = self.fail_with {
            return Err(anyhow::anyhow!("{}", msg));
        }

        if prompt.starts_with(ANALYSIS_INSTRUCTION) {
            return Ok(self.analysis.clone());
        }

        let key_point = prompt.strip_prefix(KEY_POINT_INSTRUCTION).unwrap_or(prompt);
        if self.failing_key_points.contains(key_point) {
            return Err(anyhow::anyhow!("model crashed on '{}'", key_point));
        }
        Ok(format!("  {key_point}, cinematic lighting \n"))
    }
}
