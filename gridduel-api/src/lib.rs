//! Grid Duel server.
//!
//! Holds one authoritative game per session and fans every accepted move out
//! to the session's WebSocket viewers. All rules live in `gridduel-core`.

pub mod config;
pub mod error;
pub mod routes;
pub mod session;
pub mod ws;

use std::num::NonZeroUsize;
use std::sync::Arc;

use gridduel_core::Ruleset;

use crate::session::SessionRegistry;

/// Shared application state
pub struct AppStateInner {
    pub sessions: SessionRegistry,
}

impl AppStateInner {
    pub fn new(rules: Ruleset, channel_capacity: NonZeroUsize, max_sessions: NonZeroUsize) -> Self {
        Self {
            sessions: SessionRegistry::new(rules, channel_capacity, max_sessions),
        }
    }
}

pub type AppState = Arc<AppStateInner>;
