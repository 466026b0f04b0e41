//! Points-table rows and the ranked view returned to readers.

use crate::models::matches::Participant;
use crate::models::sport::EventId;
use serde::{Deserialize, Serialize};

/// One points-table row per (sport, event, participant). Created lazily on
/// the first league result touching the participant; recomputation rebuilds
/// rows from scratch rather than resetting them in place.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub sport: String,
    pub event: EventId,
    pub participant: Participant,
    pub points: u32,
    pub matches_played: u32,
    pub matches_won: u32,
    pub matches_lost: u32,
    pub matches_draw: u32,
    pub matches_cancelled: u32,
}

impl StandingsEntry {
    /// A zeroed row for the participant.
    pub fn new(sport: impl Into<String>, event: EventId, participant: Participant) -> Self {
        Self {
            sport: sport.into(),
            event,
            participant,
            points: 0,
            matches_played: 0,
            matches_won: 0,
            matches_lost: 0,
            matches_draw: 0,
            matches_cancelled: 0,
        }
    }
}

/// A standings row plus its computed rank (points desc, then wins desc).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub rank: u32,
    #[serde(flatten)]
    pub entry: StandingsEntry,
}
