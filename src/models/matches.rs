//! Match record: participants, stage, status, and declared outcome.

use crate::models::sport::{EventId, PlayerId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Sequence number of a match, unique per (sport, event) across both genders.
pub type MatchSeq = u32;

/// Stage of the tournament this match belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    League,
    Knockout,
    Final,
}

/// Lifecycle status. `Scheduled` is the only non-terminal state.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    #[default]
    Scheduled,
    Completed,
    Draw,
    Cancelled,
}

impl MatchStatus {
    /// Completed, draw, and cancelled are all terminal: no further status
    /// transition is permitted once reached.
    pub fn is_terminal(self) -> bool {
        self != MatchStatus::Scheduled
    }
}

/// One side of a match: a team name or an individual player.
/// A match's participant list is homogeneous in variant and gender.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Participant {
    Team(String),
    Player(PlayerId),
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Participant::Team(name) => write!(f, "{}", name),
            Participant::Player(id) => write!(f, "{}", id),
        }
    }
}

/// A ranked finishing position in a multi-type match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Qualifier {
    /// 1-based position; positions across a match form a unique 1..N sequence.
    pub position: u32,
    pub participant: Participant,
}

/// Declared result of a completed match: a single winner for dual types,
/// a ranked qualifier list for multi types. Never both.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Winner(Participant),
    Qualifiers(Vec<Qualifier>),
}

/// One scheduled contest. Gender is not stored; it is derived on read from
/// the first participant's player record.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct SportMatch {
    /// Unique per (sport, event), shared across both gender brackets.
    pub seq: MatchSeq,
    /// Normalized lowercase sport name.
    pub sport: String,
    pub event: EventId,
    pub match_type: MatchType,
    pub participants: Vec<Participant>,
    pub status: MatchStatus,
    /// Populated only while `status == Completed`.
    pub outcome: Option<Outcome>,
    pub match_date: NaiveDate,
}

impl SportMatch {
    /// The declared winner, when the outcome is a dual-type result.
    pub fn winner(&self) -> Option<&Participant> {
        match &self.outcome {
            Some(Outcome::Winner(p)) => Some(p),
            _ => None,
        }
    }

    /// The declared qualifier list, when the outcome is a multi-type result.
    pub fn qualifiers(&self) -> Option<&[Qualifier]> {
        match &self.outcome {
            Some(Outcome::Qualifiers(q)) => Some(q.as_slice()),
            _ => None,
        }
    }

    /// Whether the given participant is one of this match's sides.
    pub fn has_participant(&self, p: &Participant) -> bool {
        self.participants.iter().any(|x| x == p)
    }
}
