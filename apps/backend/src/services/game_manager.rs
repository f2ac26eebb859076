//! Session registry: every live game, addressable by session code and by
//! the id of any player seated in it.
//!
//! The registry's maps and each session's lock are independent. A map guard
//! is always dropped before a session lock is taken, so slow work inside one
//! session never blocks lookups or creation of others. The one nesting runs
//! the other way: a join writes its index entry while holding the session
//! lock, so teardown either sees the new player or turns the join away.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::engine::{HokmEngine, RemovalOutcome};
use crate::domain::rules::{RoundsToWin, PLAYERS};
use crate::domain::state::{PhaseKind, Player, PlayerId, Seat, Team, TeamScore};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::utils::join_code::generate_session_code;

pub type SessionId = String;
pub type SharedSession = Arc<Mutex<GameSession>>;

const MAX_CODE_ATTEMPTS: usize = 16;

/// Who opened the session from an external surface (chat group, etc.).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatorInfo {
    pub external_id: String,
    pub username: Option<String>,
}

/// One live game plus the bookkeeping the registry keeps around it.
#[derive(Debug)]
pub struct GameSession {
    pub engine: HokmEngine,
    pub created_at: OffsetDateTime,
    last_activity: Instant,
    pub notify_target: Option<i64>,
    pub creator: Option<CreatorInfo>,
    timers: CancellationToken,
    /// Set under the lock by `destroy_session`; a handle cloned before
    /// teardown must not seat anyone.
    destroyed: bool,
}

impl GameSession {
    fn new(engine: HokmEngine) -> Self {
        Self {
            engine,
            created_at: OffsetDateTime::now_utc(),
            last_activity: Instant::now(),
            notify_target: None,
            creator: None,
            timers: CancellationToken::new(),
            destroyed: false,
        }
    }

    pub(crate) fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    pub fn last_activity(&self) -> Instant {
        self.last_activity
    }

    /// Token cancelled when the session is destroyed; scheduled follow-ups
    /// race against a child of it.
    pub fn timer_token(&self) -> CancellationToken {
        self.timers.child_token()
    }

    /// No seat is held by a connected human any more.
    pub fn is_abandoned(&self) -> bool {
        self.engine.players().is_empty() || self.engine.connected_humans() == 0
    }
}

/// What `leave_session` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveOutcome {
    pub session_id: SessionId,
    pub removal: RemovalOutcome,
    /// The session had no connected human left and was torn down.
    pub destroyed: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryStats {
    pub total_games: usize,
    pub active_players: usize,
    pub waiting_games: usize,
}

/// A lobby that still has a free seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitingSession {
    pub id: SessionId,
    pub player_count: usize,
    pub max_players: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSummary {
    pub name: String,
    pub position: Seat,
    pub team: Team,
    pub is_bot: bool,
    pub is_connected: bool,
}

/// Public, card-free description of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub id: SessionId,
    pub phase: PhaseKind,
    pub players: Vec<SeatSummary>,
    pub rounds_to_win: RoundsToWin,
    pub round_number: u32,
    pub game_score: TeamScore,
    pub created_at: Option<String>,
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<SessionId, SharedSession>,
    player_index: DashMap<PlayerId, SessionId>,
    /// Seeds every new engine; `None` draws from the OS.
    seed: Option<u64>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry whose engines deal reproducibly.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Open an empty session under a fresh code.
    pub fn create_session(&self) -> Result<SessionId, DomainError> {
        for _ in 0..MAX_CODE_ATTEMPTS {
            let code = generate_session_code();
            if let Entry::Vacant(slot) = self.sessions.entry(code.clone()) {
                let engine = match self.seed {
                    Some(seed) => HokmEngine::with_seed(code.clone(), seed),
                    None => HokmEngine::new(code.clone()),
                };
                slot.insert(Arc::new(Mutex::new(GameSession::new(engine))));
                info!(session_id = %code, "session created");
                return Ok(code);
            }
        }
        Err(DomainError::conflict(
            ConflictKind::SessionCodeConflict,
            "Could not allocate a session code",
        ))
    }

    /// Look a session up and mark it active.
    pub fn get_session(&self, id: &str) -> Result<SharedSession, DomainError> {
        let session = self.lookup(id)?;
        session.lock().touch();
        Ok(session)
    }

    /// Look a session up without touching its activity clock.
    pub fn lookup(&self, id: &str) -> Result<SharedSession, DomainError> {
        self.sessions
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| {
                DomainError::not_found(NotFoundKind::Session, format!("No game with code {id}"))
            })
    }

    /// The session `player_id` is seated in, if any. An index entry whose
    /// session is gone is dropped on the way.
    pub fn session_of(&self, player_id: &str) -> Option<(SessionId, SharedSession)> {
        let session_id = self.player_index.get(player_id)?.value().clone();
        match self.get_session(&session_id) {
            Ok(session) => Some((session_id, session)),
            Err(_) => {
                self.player_index
                    .remove_if(player_id, |_, indexed| *indexed == session_id);
                debug!(session_id = %session_id, player_id, "dropped stale index entry");
                None
            }
        }
    }

    /// Seat a player and index them under the session.
    pub fn join_session(
        &self,
        id: &str,
        player_id: &str,
        name: &str,
        external_id: Option<String>,
    ) -> Result<Player, DomainError> {
        if self.session_of(player_id).is_some() {
            return Err(already_in_session());
        }
        let session = self.get_session(id)?;
        let mut guard = session.lock();
        if guard.destroyed {
            return Err(DomainError::not_found(
                NotFoundKind::Session,
                format!("No game with code {id}"),
            ));
        }
        let slot = match self.player_index.entry(player_id.to_string()) {
            Entry::Occupied(_) => return Err(already_in_session()),
            Entry::Vacant(slot) => slot,
        };
        let player = guard.engine.add_player(player_id, name, external_id)?.clone();
        slot.insert(id.to_string());
        drop(guard);
        info!(session_id = %id, player_id, "player joined");
        Ok(player)
    }

    /// Remove a player from whatever session they are in. A session left with
    /// no connected human is destroyed.
    pub fn leave_session(&self, player_id: &str) -> Result<LeaveOutcome, DomainError> {
        let (session_id, session) = self.session_of(player_id).ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Player, "Not in a game")
        })?;

        let (removal, abandoned) = {
            let mut guard = session.lock();
            let removal = guard.engine.remove_player(player_id)?;
            (removal, guard.is_abandoned())
        };
        self.player_index.remove(player_id);
        info!(session_id = %session_id, player_id, ?removal, "player left");

        let destroyed = abandoned && self.destroy_session(&session_id);
        Ok(LeaveOutcome {
            session_id,
            removal,
            destroyed,
        })
    }

    /// Drop a session, cancel its timers and forget its players.
    pub fn destroy_session(&self, id: &str) -> bool {
        let Some((_, session)) = self.sessions.remove(id) else {
            return false;
        };
        let player_ids: Vec<PlayerId> = {
            let mut guard = session.lock();
            guard.destroyed = true;
            guard.timers.cancel();
            guard.engine.players().iter().map(|p| p.id.clone()).collect()
        };
        for player_id in player_ids {
            self.player_index
                .remove_if(&player_id, |_, session_id| session_id == id);
        }
        info!(session_id = %id, "session destroyed");
        true
    }

    /// Evict sessions idle for longer than `max_idle`.
    pub fn cleanup_idle(&self, max_idle: Duration) -> usize {
        self.cleanup_idle_as_of(Instant::now(), max_idle)
    }

    pub fn cleanup_idle_as_of(&self, now: Instant, max_idle: Duration) -> usize {
        let stale: Vec<SessionId> = self
            .snapshot()
            .into_iter()
            .filter(|(_, session)| {
                now.saturating_duration_since(session.lock().last_activity) > max_idle
            })
            .map(|(id, _)| id)
            .collect();

        let cleaned = stale
            .iter()
            .filter(|id| self.destroy_session(id))
            .count();
        if cleaned > 0 {
            info!(cleaned, "idle sessions evicted");
        }
        cleaned
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            total_games: self.sessions.len(),
            active_players: self.player_index.len(),
            waiting_games: self.waiting_sessions().len(),
        }
    }

    /// Lobbies with a free seat, in no particular order.
    pub fn waiting_sessions(&self) -> Vec<WaitingSession> {
        self.snapshot()
            .into_iter()
            .filter_map(|(id, session)| {
                let guard = session.lock();
                let count = guard.engine.players().len();
                (guard.engine.phase_kind() == PhaseKind::Waiting && count < PLAYERS).then(|| {
                    WaitingSession {
                        id,
                        player_count: count,
                        max_players: PLAYERS,
                    }
                })
            })
            .collect()
    }

    pub fn summary(&self, id: &str) -> Result<SessionSummary, DomainError> {
        let session = self.lookup(id)?;
        let guard = session.lock();
        let engine = &guard.engine;
        Ok(SessionSummary {
            id: engine.id().to_string(),
            phase: engine.phase_kind(),
            players: engine
                .players()
                .iter()
                .map(|p| SeatSummary {
                    name: p.name.clone(),
                    position: p.seat,
                    team: p.team(),
                    is_bot: p.is_bot,
                    is_connected: p.is_connected,
                })
                .collect(),
            rounds_to_win: engine.rounds_to_win(),
            round_number: engine.round_number(),
            game_score: engine.game_score(),
            created_at: guard.created_at.format(&Rfc3339).ok(),
        })
    }

    // ---- external notification bookkeeping -------------------------------

    pub fn set_notification_target(&self, id: &str, target: i64) -> Result<(), DomainError> {
        self.lookup(id)?.lock().notify_target = Some(target);
        Ok(())
    }

    pub fn notification_target(&self, id: &str) -> Option<i64> {
        self.lookup(id).ok()?.lock().notify_target
    }

    pub fn set_creator(&self, id: &str, creator: CreatorInfo) -> Result<(), DomainError> {
        self.lookup(id)?.lock().creator = Some(creator);
        Ok(())
    }

    pub fn creator(&self, id: &str) -> Option<CreatorInfo> {
        self.lookup(id).ok()?.lock().creator.clone()
    }

    pub fn is_creator(&self, id: &str, external_id: &str) -> bool {
        self.creator(id)
            .is_some_and(|c| c.external_id == external_id)
    }

    /// Clone out every session handle so no map guard outlives this call.
    fn snapshot(&self) -> Vec<(SessionId, SharedSession)> {
        self.sessions
            .iter()
            .map(|entry| (entry.key().clone(), Arc::clone(entry.value())))
            .collect()
    }
}

fn already_in_session() -> DomainError {
    DomainError::conflict(ConflictKind::AlreadyInSession, "Already in a game")
}

/// Periodically evict idle sessions until the runtime shuts down.
pub fn spawn_idle_cleanup(
    registry: Arc<SessionRegistry>,
    every: Duration,
    max_idle: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.tick().await;
        loop {
            ticker.tick().await;
            let cleaned = registry.cleanup_idle(max_idle);
            debug!(cleaned, remaining = registry.stats().total_games, "idle cleanup pass");
        }
    })
}
