//! Server configuration (flags or environment).

use std::net::SocketAddr;
use std::num::NonZeroUsize;

use clap::{Parser, ValueEnum};
use gridduel_core::{DirectionPolicy, Ruleset};

#[derive(Debug, Clone, Parser)]
#[command(name = "gridduel-api", about = "Authoritative Grid Duel game server")]
pub struct Config {
    /// Address to listen on
    #[arg(long, env = "GRIDDUEL_BIND", default_value = "0.0.0.0:3000")]
    pub bind: SocketAddr,

    /// Which directions each piece kind may move in
    #[arg(
        long,
        env = "GRIDDUEL_DIRECTION_POLICY",
        value_enum,
        default_value_t = PolicyArg::Unrestricted
    )]
    pub direction_policy: PolicyArg,

    /// Snapshots buffered per session before slow subscribers start skipping
    #[arg(long, env = "GRIDDUEL_CHANNEL_CAPACITY", default_value = "64")]
    pub channel_capacity: NonZeroUsize,

    /// Most sessions alive at once, the default session included
    #[arg(long, env = "GRIDDUEL_MAX_SESSIONS", default_value = "1024")]
    pub max_sessions: NonZeroUsize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Any of the eight directions for every kind
    Unrestricted,
    /// P-kinds and H1 orthogonal, H2 diagonal
    ByKind,
}

impl Config {
    pub fn ruleset(&self) -> Ruleset {
        let directions = match self.direction_policy {
            PolicyArg::Unrestricted => DirectionPolicy::Unrestricted,
            PolicyArg::ByKind => DirectionPolicy::ByKind,
        };
        Ruleset::new(directions)
    }
}
