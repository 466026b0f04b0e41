//! Annual sports fest web app: tournament engine library plus storage
//! contracts. The HTTP surface lives in the `web` binary.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    create_match, delete_match, update_match, CreateMatchRequest, EligibilitySnapshot,
    GenderResolver, RecomputeReport, UpdateMatchRequest,
};
pub use models::{
    EngineError, EventId, EventWindow, Gender, MatchSeq, MatchStatus, MatchType, Outcome,
    Participant, Player, PlayerId, Qualifier, RankedEntry, Sport, SportMatch, SportType,
    StandingsEntry, TeamRoster,
};
pub use store::{InMemoryStore, Store};
