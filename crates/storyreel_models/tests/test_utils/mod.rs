//! Test doubles for provider tests.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use storyreel_core::{SynthesisRequest, SynthesisSubmission, TaskKind, TaskPoll};
use storyreel_error::StoryreelResult;
use storyreel_interface::RemoteTaskProvider;

/// Everything the mock has been asked to do.
#[derive(Debug, Default)]
pub struct Calls {
    pub expansions: Vec<(String, String)>,
    pub syntheses: Vec<SynthesisRequest>,
    pub polls: usize,
    pub fetches: Vec<String>,
}

/// Scripted provider: each poll pops the next observation, repeating the last one.
pub struct MockProvider {
    polls: Mutex<VecDeque<TaskPoll>>,
    inline_audio: Vec<u8>,
    fetched_audio: Vec<u8>,
    pub calls: Arc<Mutex<Calls>>,
}

impl MockProvider {
    pub fn new(polls: Vec<TaskPoll>) -> Self {
        Self {
            polls: Mutex::new(polls.into()),
            inline_audio: b"inline-mp3".to_vec(),
            fetched_audio: b"remote-mp3".to_vec(),
            calls: Arc::new(Mutex::new(Calls::default())),
        }
    }
}

#[async_trait]
impl RemoteTaskProvider for MockProvider {
    fn provider_name(&self) -> &'static str {
        "mock"
    }

    async fn submit_expand(&self, image: &str, style_prompt: &str) -> StoryreelResult<String> {
        self.calls
            .lock()
            .unwrap()
            .expansions
            .push((image.to_string(), style_prompt.to_string()));
        Ok("expand-task".to_string())
    }

    async fn submit_synthesize(
        &self,
        request: &SynthesisRequest,
    ) -> StoryreelResult<SynthesisSubmission> {
        self.calls.lock().unwrap().syntheses.push(request.clone());
        if *request.prefer_sync() {
            Ok(SynthesisSubmission::Completed(self.inline_audio.clone()))
        } else {
            Ok(SynthesisSubmission::Submitted("speech-task".to_string()))
        }
    }

    async fn poll(&self, _kind: TaskKind, _task_id: &str) -> StoryreelResult<TaskPoll> {
        self.calls.lock().unwrap().polls += 1;
        let mut polls = self.polls.lock().unwrap();
        let next = if polls.len() > 1 {
            polls.pop_front()
        } else {
            polls.front().cloned()
        };
        Ok(next.unwrap_or(TaskPoll::Queued))
    }

    async fn fetch(&self, url: &str) -> StoryreelResult<Vec<u8>> {
        self.calls.lock().unwrap().fetches.push(url.to_string());
        Ok(self.fetched_audio.clone())
    }
}
