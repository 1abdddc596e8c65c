//! Per-session game ownership.
//!
//! Each [`Session`] exclusively owns one [`GameState`]. Moves and resets take
//! the session lock, mutate, and publish the new snapshot before releasing it,
//! so concurrent requests serialize and every subscriber sees snapshots in
//! mutation order.

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use gridduel_core::wire::{LegalMoveModel, StateModel};
use gridduel_core::{Direction, GameState, MoveRejected, PieceId, Ruleset};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::error::ApiError;

/// Name of the session that exists from startup.
pub const DEFAULT_SESSION: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One game and the channel its viewers listen on.
pub struct Session {
    id: SessionId,
    rules: Ruleset,
    state: Mutex<GameState>,
    updates: broadcast::Sender<StateModel>,
}

impl Session {
    fn new(id: SessionId, rules: Ruleset, capacity: NonZeroUsize) -> Self {
        let (updates, _) = broadcast::channel(capacity.get());
        Self {
            id,
            rules,
            state: Mutex::new(gridduel_core::initialize()),
            updates,
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    // State is only written after validation passes, so a poisoned lock
    // still guards a consistent game.
    fn lock(&self) -> MutexGuard<'_, GameState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Current state in wire form.
    pub fn snapshot(&self) -> StateModel {
        StateModel::from(&*self.lock())
    }

    /// Current state plus a receiver for every later snapshot, with no gap
    /// between the two.
    pub fn subscribe(&self) -> (StateModel, broadcast::Receiver<StateModel>) {
        let state = self.lock();
        (StateModel::from(&*state), self.updates.subscribe())
    }

    pub fn legal_moves(&self) -> Vec<LegalMoveModel> {
        self.rules
            .legal_moves(&self.lock())
            .into_iter()
            .map(LegalMoveModel::from)
            .collect()
    }

    /// Apply a move and publish the result to every subscriber.
    pub fn apply_move(
        &self,
        piece: PieceId,
        direction: Direction,
    ) -> Result<StateModel, MoveRejected> {
        let mut state = self.lock();
        match self.rules.apply_move(&mut state, piece, direction) {
            Ok(snapshot) => {
                let model = StateModel::from(&snapshot);
                info!(session = %self.id, %piece, %direction, "move applied");
                if let Some(winner) = snapshot.winner() {
                    info!(session = %self.id, %winner, "game won");
                }
                self.publish(model.clone());
                Ok(model)
            }
            Err(rejected) => {
                debug!(session = %self.id, %piece, %direction, reason = rejected.reason(), "move rejected");
                Err(rejected)
            }
        }
    }

    /// Replace the game with a fresh one and publish it.
    pub fn reset(&self) -> StateModel {
        let mut state = self.lock();
        *state = gridduel_core::reset();
        let model = StateModel::from(&*state);
        info!(session = %self.id, "game reset");
        self.publish(model.clone());
        model
    }

    pub fn subscriber_count(&self) -> usize {
        self.updates.receiver_count()
    }

    // Called with the state lock held.
    fn publish(&self, model: StateModel) {
        // No subscribers is fine, the caller still gets the snapshot
        let _ = self.updates.send(model);
    }
}

/// All live sessions, at most `max_sessions` of them counting the default.
pub struct SessionRegistry {
    rules: Ruleset,
    capacity: NonZeroUsize,
    max_sessions: NonZeroUsize,
    sessions: RwLock<HashMap<SessionId, Arc<Session>>>,
}

impl SessionRegistry {
    /// Registry holding only the [`DEFAULT_SESSION`].
    pub fn new(rules: Ruleset, capacity: NonZeroUsize, max_sessions: NonZeroUsize) -> Self {
        let registry = Self {
            rules,
            capacity,
            max_sessions,
            sessions: RwLock::new(HashMap::new()),
        };
        let id = SessionId::new(DEFAULT_SESSION);
        registry
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), Arc::new(registry.session(id)));
        registry
    }

    /// Start a new game under a fresh id, unless the registry is full.
    pub fn create(&self) -> Result<Arc<Session>, ApiError> {
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let max = self.max_sessions.get();
        if sessions.len() >= max {
            warn!(max, "session limit reached");
            return Err(ApiError::SessionLimit { max });
        }

        let id = SessionId::random();
        let session = Arc::new(self.session(id.clone()));
        sessions.insert(id, Arc::clone(&session));
        info!(session = %session.id(), live = sessions.len(), "session created");
        Ok(session)
    }

    /// Drop a session. Connected viewers see their update stream close once
    /// the last handle goes away. The default session cannot be removed.
    pub fn remove(&self, id: &str) -> Result<Arc<Session>, ApiError> {
        if id == DEFAULT_SESSION {
            return Err(ApiError::DefaultSessionProtected);
        }
        let session = self
            .sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&SessionId::new(id))
            .ok_or_else(|| ApiError::SessionNotFound(id.to_string()))?;
        info!(session = %session.id(), "session removed");
        Ok(session)
    }

    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&SessionId::new(id))
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn session(&self, id: SessionId) -> Session {
        Session::new(id, self.rules, self.capacity)
    }
}
