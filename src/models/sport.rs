//! Sport, roster, player, and event-window collaborator records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (used in matches, rosters, and gender lookups).
pub type PlayerId = Uuid;

/// Event scope: the tournament year.
pub type EventId = u32;

/// Gender bucket. Never stored on matches or standings rows; always derived
/// from player records.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Structural type of a sport: who competes and how the outcome is declared.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SportType {
    /// Two teams, single winner.
    DualTeam,
    /// More than two teams, ranked qualifier list.
    MultiTeam,
    /// Two individual players, single winner.
    DualPlayer,
    /// More than two individual players, ranked qualifier list.
    MultiPlayer,
}

impl SportType {
    /// Outcome is a single winner (exactly two participants per match).
    pub fn is_dual(self) -> bool {
        matches!(self, SportType::DualTeam | SportType::DualPlayer)
    }

    /// Outcome is a ranked qualifier list (more than two participants).
    pub fn is_multi(self) -> bool {
        !self.is_dual()
    }

    /// Participants are teams (as opposed to individual players).
    pub fn is_team(self) -> bool {
        matches!(self, SportType::DualTeam | SportType::MultiTeam)
    }
}

/// A registered player: identity plus the gender used for bracket partitioning.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub gender: Gender,
}

impl Player {
    pub fn new(name: impl Into<String>, gender: Gender) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            gender,
        }
    }
}

/// A team registered for a sport, with its player membership.
/// Teams are built gender-homogeneous at registration time; downstream code
/// trusts that and classifies a team by its first member.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct TeamRoster {
    pub name: String,
    pub players: Vec<PlayerId>,
}

/// A sport registered for an event: structural type plus roster.
/// Team sports carry `teams`; player sports carry `players`.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Sport {
    /// Normalized lowercase sport name.
    pub name: String,
    pub event: EventId,
    pub sport_type: SportType,
    pub teams: Vec<TeamRoster>,
    pub players: Vec<PlayerId>,
}

impl Sport {
    pub fn new(name: impl Into<String>, event: EventId, sport_type: SportType) -> Self {
        Self {
            name: name.into().to_lowercase(),
            event,
            sport_type,
            teams: Vec::new(),
            players: Vec::new(),
        }
    }

    /// Number of registered entrants (teams or players, per structural type).
    pub fn roster_size(&self) -> usize {
        if self.sport_type.is_team() {
            self.teams.len()
        } else {
            self.players.len()
        }
    }

    /// Membership of a team by name, if registered.
    pub fn team(&self, name: &str) -> Option<&TeamRoster> {
        self.teams.iter().find(|t| t.name == name)
    }
}

/// Configured dates of the yearly event; matches must fall inside this window.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EventWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl EventWindow {
    /// Whether a date falls inside the window (inclusive on both ends).
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}
