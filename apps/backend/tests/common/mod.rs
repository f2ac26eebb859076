#![allow(dead_code)]

// tests/common/mod.rs
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use hokm_backend::ai::{HokmBot, PlayStyle};
use hokm_backend::config::Pacing;
use hokm_backend::services::game_flow::{GameFlowService, Outbox};
use hokm_backend::services::game_manager::{SessionRegistry, SharedSession};
use hokm_backend::ws::protocol::{ClientMsg, ServerMsg};
use parking_lot::Mutex;
use serde_json::Value;

// Logging is auto-installed for every test binary that includes this module
#[ctor::ctor]
fn init_logging() {
    hokm_test_support::test_logging::init();
}

/// Outbox that keeps every frame, serialized, per recipient.
#[derive(Default)]
pub struct RecordingOutbox {
    frames: Mutex<HashMap<String, Vec<Value>>>,
}

impl RecordingOutbox {
    pub fn frames_for(&self, player_id: &str) -> Vec<Value> {
        self.frames.lock().get(player_id).cloned().unwrap_or_default()
    }

    /// Frames for `player_id`, leaving their queue empty.
    pub fn take(&self, player_id: &str) -> Vec<Value> {
        self.frames.lock().remove(player_id).unwrap_or_default()
    }

    pub fn clear(&self) {
        self.frames.lock().clear();
    }
}

impl Outbox for RecordingOutbox {
    fn send(&self, player_id: &str, msg: ServerMsg) {
        let value = serde_json::to_value(&msg).expect("server frames serialize");
        self.frames
            .lock()
            .entry(player_id.to_string())
            .or_default()
            .push(value);
    }
}

pub struct Harness {
    pub flow: GameFlowService,
    pub registry: Arc<SessionRegistry>,
    pub outbox: Arc<RecordingOutbox>,
}

impl Harness {
    pub fn new(pacing: Pacing) -> Self {
        Self::seeded(pacing, 7)
    }

    pub fn seeded(pacing: Pacing, seed: u64) -> Self {
        let registry = Arc::new(SessionRegistry::with_seed(seed));
        let outbox = Arc::new(RecordingOutbox::default());
        let flow = GameFlowService::new(
            Arc::clone(&registry),
            outbox.clone(),
            Arc::new(HokmBot::new(PlayStyle::Balanced)),
            pacing,
        );
        Self {
            flow,
            registry,
            outbox,
        }
    }

    pub fn send(&self, player_id: &str, msg: ClientMsg) {
        self.flow.handle_intent(player_id, msg);
    }

    /// `player_id` opens a new game; returns its code.
    pub fn create(&self, player_id: &str) -> String {
        self.send(
            player_id,
            ClientMsg::Create {
                player_name: format!("name-{player_id}"),
                external_id: None,
            },
        );
        self.registry
            .session_of(player_id)
            .map(|(id, _)| id)
            .expect("creator should be seated")
    }

    pub fn join(&self, player_id: &str, session_id: &str) {
        self.send(
            player_id,
            ClientMsg::Join {
                session_id: session_id.to_string(),
                player_name: format!("name-{player_id}"),
                external_id: None,
            },
        );
    }

    /// A lobby with `humans` seated and ready, filled up with bots.
    pub fn table(&self, humans: &[&str]) -> String {
        let (creator, rest) = humans.split_first().expect("at least one human");
        let id = self.create(creator);
        for h in rest {
            self.join(h, &id);
        }
        for _ in humans.len()..4 {
            self.send(creator, ClientMsg::AddBot);
        }
        for h in humans {
            self.send(h, ClientMsg::Ready);
        }
        id
    }

    pub fn session(&self, id: &str) -> SharedSession {
        self.registry.lookup(id).expect("session exists")
    }
}

/// Let spawned timers run; virtual time moves forward under a paused clock.
pub async fn settle(by: Duration) {
    tokio::time::sleep(by).await;
}
