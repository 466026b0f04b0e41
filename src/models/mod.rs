//! Data structures for the sports fest: sports, matches, standings, errors.

mod error;
mod matches;
mod sport;
mod standings;

pub use error::EngineError;
pub use matches::{MatchSeq, MatchStatus, MatchType, Outcome, Participant, Qualifier, SportMatch};
pub use sport::{EventId, EventWindow, Gender, Player, PlayerId, Sport, SportType, TeamRoster};
pub use standings::{RankedEntry, StandingsEntry};
