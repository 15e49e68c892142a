//! Scripted transport for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use crate::upstream::transport::{
    OneShotBody, RawResponse, TransportError, UpstreamRequest, UpstreamTransport,
};

/// What a scripted upstream does for one call.
#[derive(Debug, Clone)]
pub enum Scripted {
    Respond(u16, String),
    Fail(String),
    Panic,
}

pub fn respond(status: u16, body: &str) -> Scripted {
    Scripted::Respond(status, body.to_string())
}

/// Replays per-host scripts and records every call it receives.
///
/// A request is matched to a script by its URL prefix. The last step of a
/// script repeats once the script runs out.
#[derive(Default)]
pub struct ScriptedTransport {
    scripts: Mutex<HashMap<String, VecDeque<Scripted>>>,
    calls: Mutex<Vec<UpstreamRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script(self, base: &str, steps: impl IntoIterator<Item = Scripted>) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .insert(base.to_string(), steps.into_iter().collect());
        self
    }

    pub fn calls(&self) -> Vec<UpstreamRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, base: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.starts_with(base))
            .count()
    }

    fn next_step(&self, url: &str) -> Scripted {
        let mut scripts = self.scripts.lock().unwrap();
        let script = scripts
            .iter_mut()
            .filter(|(base, _)| url.starts_with(base.as_str()))
            .max_by_key(|(base, _)| base.len())
            .map(|(_, steps)| steps);

        match script {
            Some(steps) if steps.len() > 1 => steps.pop_front().unwrap(),
            Some(steps) => steps
                .front()
                .cloned()
                .unwrap_or_else(|| Scripted::Fail("script exhausted".into())),
            None => Scripted::Fail(format!("no script for {url}")),
        }
    }
}

impl UpstreamTransport for ScriptedTransport {
    async fn send(&self, request: &UpstreamRequest) -> Result<RawResponse, TransportError> {
        self.calls.lock().unwrap().push(request.clone());
        match self.next_step(&request.url) {
            Scripted::Respond(status, body) => Ok(RawResponse {
                status: Some(status),
                body: OneShotBody::from_text(body),
            }),
            Scripted::Fail(reason) => Err(TransportError::Unreachable(reason)),
            Scripted::Panic => panic!("scripted upstream fault"),
        }
    }
}
