//! Storage collaborator: the read/write contracts the engine needs, plus an
//! in-memory implementation used by the web binary and the tests.

use crate::models::{
    EngineError, EventId, EventWindow, Gender, MatchSeq, Participant, Player, PlayerId, Sport,
    SportMatch, StandingsEntry,
};
use std::collections::{BTreeMap, HashMap};

/// Everything the engine reads from and writes to its storage collaborator.
/// Reads return owned copies; a missing record is `None`, never an error.
/// Writes may fail with [`EngineError::Persistence`] (or a not-found variant
/// when updating a record that does not exist).
pub trait Store {
    /// Sport record (structural type + roster) for a sport/event.
    fn sport(&self, sport: &str, event: EventId) -> Option<Sport>;
    fn put_sport(&mut self, sport: Sport) -> Result<(), EngineError>;

    /// Registered player record.
    fn player(&self, id: PlayerId) -> Option<Player>;
    fn put_player(&mut self, player: Player) -> Result<(), EngineError>;

    /// Gender of a registered player, batch-free single lookup.
    fn player_gender(&self, id: PlayerId) -> Option<Gender> {
        self.player(id).map(|p| p.gender)
    }

    /// Configured date window of an event.
    fn event_window(&self, event: EventId) -> Option<EventWindow>;
    fn put_event_window(&mut self, event: EventId, window: EventWindow)
        -> Result<(), EngineError>;

    /// All matches of a sport/event, ordered by sequence number.
    fn matches(&self, sport: &str, event: EventId) -> Vec<SportMatch>;
    fn match_by_seq(&self, sport: &str, event: EventId, seq: MatchSeq) -> Option<SportMatch>;
    fn insert_match(&mut self, m: SportMatch) -> Result<(), EngineError>;
    fn update_match(&mut self, m: SportMatch) -> Result<(), EngineError>;
    fn delete_match(&mut self, sport: &str, event: EventId, seq: MatchSeq)
        -> Result<(), EngineError>;

    /// Points-table row for one participant, if it has been created.
    fn standings_entry(
        &self,
        sport: &str,
        event: EventId,
        participant: &Participant,
    ) -> Option<StandingsEntry>;
    /// Upsert one row; all counters land together or not at all.
    fn put_standings_entry(&mut self, entry: StandingsEntry) -> Result<(), EngineError>;
    /// All rows of a sport/event (both genders; callers partition).
    fn standings(&self, sport: &str, event: EventId) -> Vec<StandingsEntry>;
}

/// HashMap-backed store. The web binary wraps one of these in a single
/// `RwLock`, which gives the per-(sport, event) single-writer discipline the
/// standings read-modify-write needs.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    sports: HashMap<(String, EventId), Sport>,
    players: HashMap<PlayerId, Player>,
    windows: HashMap<EventId, EventWindow>,
    matches: HashMap<(String, EventId), BTreeMap<MatchSeq, SportMatch>>,
    standings: HashMap<(String, EventId), HashMap<Participant, StandingsEntry>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for InMemoryStore {
    fn sport(&self, sport: &str, event: EventId) -> Option<Sport> {
        self.sports.get(&(sport.to_lowercase(), event)).cloned()
    }

    fn put_sport(&mut self, sport: Sport) -> Result<(), EngineError> {
        self.sports
            .insert((sport.name.clone(), sport.event), sport);
        Ok(())
    }

    fn player(&self, id: PlayerId) -> Option<Player> {
        self.players.get(&id).cloned()
    }

    fn put_player(&mut self, player: Player) -> Result<(), EngineError> {
        self.players.insert(player.id, player);
        Ok(())
    }

    fn event_window(&self, event: EventId) -> Option<EventWindow> {
        self.windows.get(&event).copied()
    }

    fn put_event_window(
        &mut self,
        event: EventId,
        window: EventWindow,
    ) -> Result<(), EngineError> {
        self.windows.insert(event, window);
        Ok(())
    }

    fn matches(&self, sport: &str, event: EventId) -> Vec<SportMatch> {
        self.matches
            .get(&(sport.to_lowercase(), event))
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }

    fn match_by_seq(&self, sport: &str, event: EventId, seq: MatchSeq) -> Option<SportMatch> {
        self.matches
            .get(&(sport.to_lowercase(), event))
            .and_then(|m| m.get(&seq))
            .cloned()
    }

    fn insert_match(&mut self, m: SportMatch) -> Result<(), EngineError> {
        self.matches
            .entry((m.sport.clone(), m.event))
            .or_default()
            .insert(m.seq, m);
        Ok(())
    }

    fn update_match(&mut self, m: SportMatch) -> Result<(), EngineError> {
        let bucket = self
            .matches
            .get_mut(&(m.sport.clone(), m.event))
            .ok_or(EngineError::MatchNotFound(m.seq))?;
        if !bucket.contains_key(&m.seq) {
            return Err(EngineError::MatchNotFound(m.seq));
        }
        bucket.insert(m.seq, m);
        Ok(())
    }

    fn delete_match(
        &mut self,
        sport: &str,
        event: EventId,
        seq: MatchSeq,
    ) -> Result<(), EngineError> {
        self.matches
            .get_mut(&(sport.to_lowercase(), event))
            .and_then(|m| m.remove(&seq))
            .map(|_| ())
            .ok_or(EngineError::MatchNotFound(seq))
    }

    fn standings_entry(
        &self,
        sport: &str,
        event: EventId,
        participant: &Participant,
    ) -> Option<StandingsEntry> {
        self.standings
            .get(&(sport.to_lowercase(), event))
            .and_then(|rows| rows.get(participant))
            .cloned()
    }

    fn put_standings_entry(&mut self, entry: StandingsEntry) -> Result<(), EngineError> {
        self.standings
            .entry((entry.sport.clone(), entry.event))
            .or_default()
            .insert(entry.participant.clone(), entry);
        Ok(())
    }

    fn standings(&self, sport: &str, event: EventId) -> Vec<StandingsEntry> {
        self.standings
            .get(&(sport.to_lowercase(), event))
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }
}
