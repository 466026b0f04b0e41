//! Gender partition resolver: derives the gender bucket of a participant or
//! a match from player records. Gender is never stored on matches or
//! standings rows; every partitioned read path goes through here.

use crate::models::{EventId, Gender, Participant, Sport, SportMatch};
use crate::store::Store;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Cache entries expire after this long; lookups within one request burst
/// hit the cache, roster edits invalidate it explicitly.
const CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Resolves gender buckets with a short-lived lookup cache keyed by
/// (sport, event, participant).
#[derive(Debug)]
pub struct GenderResolver {
    cache: HashMap<(String, EventId, Participant), (Gender, Instant)>,
    ttl: Duration,
}

impl Default for GenderResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl GenderResolver {
    pub fn new() -> Self {
        Self::with_ttl(CACHE_TTL)
    }

    /// Resolver with a custom TTL (tests use a zero TTL to bypass caching).
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            cache: HashMap::new(),
            ttl,
        }
    }

    /// Gender of a single participant, or `None` when it cannot be derived
    /// (missing player record, unknown team, empty team roster). Never fails
    /// harder than `None`; callers decide whether that skips the record or
    /// becomes a validation error.
    ///
    /// Teams are gender-homogeneous by construction, so one representative
    /// player (the first registered member) classifies the whole team.
    pub fn participant_gender(
        &mut self,
        store: &impl Store,
        sport: &Sport,
        participant: &Participant,
    ) -> Option<Gender> {
        let key = (sport.name.clone(), sport.event, participant.clone());
        if let Some((gender, at)) = self.cache.get(&key) {
            if at.elapsed() < self.ttl {
                return Some(*gender);
            }
        }

        let gender = match participant {
            Participant::Team(name) => {
                let team = sport.team(name)?;
                let first = team.players.first()?;
                store.player_gender(*first)?
            }
            Participant::Player(id) => store.player_gender(*id)?,
        };

        self.cache.insert(key, (gender, Instant::now()));
        Some(gender)
    }

    /// Gender of a match: its first participant's bucket. Creation enforces
    /// that all participants share one gender, so one lookup classifies the
    /// whole match.
    pub fn match_gender(
        &mut self,
        store: &impl Store,
        sport: &Sport,
        m: &SportMatch,
    ) -> Option<Gender> {
        let first = m.participants.first()?;
        self.participant_gender(store, sport, first)
    }

    /// Drop all cached lookups for a sport/event. Fired whenever roster
    /// composition changes for that sport.
    pub fn invalidate(&mut self, sport: &str, event: EventId) {
        let sport = sport.to_lowercase();
        self.cache
            .retain(|(s, e, _), _| !(*s == sport && *e == event));
    }
}
