//! In-memory fakes shared by the integration tests.

use anyhow::anyhow;
use domain::gateway::{ChatGateway, ChatRequest, VideoSearch};
use domain::models::RelatedVideo;
use domain::speech::{SpeechStatus, TextToSpeech};
use shared::types::Result;
use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

#[derive(Debug, Clone)]
pub enum Scripted {
    Reply(String),
    Fail(String),
    /// Never resolves; used to abandon a send mid-flight.
    Hang,
}

/// Replays scripted replies in order and records every request.
#[derive(Debug, Default)]
pub struct FakeGateway {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ChatRequest>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGateway {
    pub fn replying(replies: &[&str]) -> Self {
        let gateway = Self::default();
        for reply in replies {
            gateway.push(Scripted::Reply(reply.to_string()));
        }
        gateway
    }

    pub fn push(&self, step: Scripted) {
        self.script.lock().unwrap().push_back(step);
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    async fn next(&self) -> Result<String> {
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(Scripted::Reply(text)) => Ok(text),
            Some(Scripted::Fail(reason)) => Err(anyhow!(reason)),
            Some(Scripted::Hang) => {
                std::future::pending::<()>().await;
                unreachable!("pending never resolves")
            }
            None => Err(anyhow!("no scripted reply left")),
        }
    }
}

impl ChatGateway for FakeGateway {
    async fn send_chat(&self, request: &ChatRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request.clone());
        self.next().await
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.next().await
    }
}

/// One deterministic video per query; queries in `failing` find nothing.
#[derive(Debug, Default)]
pub struct FakeVideoSearch {
    calls: Mutex<Vec<(String, u32)>>,
    failing: HashSet<String>,
}

impl FakeVideoSearch {
    pub fn failing_on(queries: &[&str]) -> Self {
        Self {
            calls: Mutex::default(),
            failing: queries.iter().map(|q| q.to_string()).collect(),
        }
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn video_for(query: &str) -> RelatedVideo {
        let id = query.replace(' ', "-");
        RelatedVideo {
            video_url: format!("https://www.youtube.com/watch?v={id}"),
            thumbnail_url: format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg"),
        }
    }
}

impl VideoSearch for FakeVideoSearch {
    async fn search_videos(&self, query: &str, max_results: u32) -> Option<Vec<RelatedVideo>> {
        self.calls.lock().unwrap().push((query.to_string(), max_results));
        if self.failing.contains(query) {
            return None;
        }
        Some(vec![Self::video_for(query)])
    }
}

/// Records utterances instead of voicing them.
#[derive(Debug, Default)]
pub struct RecordingSpeech {
    pub spoken: Vec<String>,
    pub cancels: usize,
    status: SpeechStatus,
}

impl TextToSpeech for RecordingSpeech {
    fn speak(&mut self, text: &str) {
        self.spoken.push(text.to_string());
        self.status = SpeechStatus::Speaking;
    }

    fn cancel(&mut self) {
        self.cancels += 1;
        self.status = SpeechStatus::Idle;
    }

    fn pause(&mut self) {
        if self.status == SpeechStatus::Speaking {
            self.status = SpeechStatus::Paused;
        }
    }

    fn resume(&mut self) {
        if self.status == SpeechStatus::Paused {
            self.status = SpeechStatus::Speaking;
        }
    }

    fn status(&self) -> SpeechStatus {
        self.status
    }
}
