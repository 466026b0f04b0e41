//! Eligibility tracker: which participants a knockout/final result has
//! eliminated, and which are locked into a pending knockout/final match.
//! Always recomputed on demand from match history; match results change it
//! too often to cache.

use crate::logic::gender::GenderResolver;
use crate::models::{Gender, MatchStatus, MatchType, Participant, Sport};
use crate::store::Store;
use std::collections::HashSet;

/// Derived view for one (sport, event, gender); never persisted.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EligibilitySnapshot {
    /// Knocked out by a completed knockout/final result.
    pub eliminated: HashSet<Participant>,
    /// Already scheduled in a pending knockout/final match.
    pub locked: HashSet<Participant>,
}

impl EligibilitySnapshot {
    /// Whether a participant may enter a new knockout/final match.
    pub fn blocks(&self, p: &Participant) -> bool {
        self.eliminated.contains(p) || self.locked.contains(p)
    }
}

/// Participants eliminated by completed knockout/final matches of the gender.
///
/// Dual types eliminate everyone except the declared winner. Multi types
/// eliminate everyone absent from the qualifier list; a completed multi
/// match with no qualifiers recorded therefore eliminates all of its
/// participants.
pub fn eliminated(
    store: &impl Store,
    resolver: &mut GenderResolver,
    sport: &Sport,
    gender: Gender,
) -> HashSet<Participant> {
    let mut out = HashSet::new();
    for m in store.matches(&sport.name, sport.event) {
        if m.match_type == MatchType::League || m.status != MatchStatus::Completed {
            continue;
        }
        if resolver.match_gender(store, sport, &m) != Some(gender) {
            continue;
        }
        if sport.sport_type.is_dual() {
            let winner = m.winner().cloned();
            for p in &m.participants {
                if Some(p) != winner.as_ref() {
                    out.insert(p.clone());
                }
            }
        } else {
            let qualified: HashSet<&Participant> = m
                .qualifiers()
                .unwrap_or_default()
                .iter()
                .map(|q| &q.participant)
                .collect();
            for p in &m.participants {
                if !qualified.contains(p) {
                    out.insert(p.clone());
                }
            }
        }
    }
    out
}

/// Participants of scheduled knockout/final matches of the gender. Draw and
/// cancelled knockouts lock nothing; those participants may be rescheduled.
pub fn locked(
    store: &impl Store,
    resolver: &mut GenderResolver,
    sport: &Sport,
    gender: Gender,
) -> HashSet<Participant> {
    let mut out = HashSet::new();
    for m in store.matches(&sport.name, sport.event) {
        if m.match_type == MatchType::League || m.status != MatchStatus::Scheduled {
            continue;
        }
        if resolver.match_gender(store, sport, &m) != Some(gender) {
            continue;
        }
        out.extend(m.participants.iter().cloned());
    }
    out
}

/// Both sets in one pass-friendly bundle.
pub fn snapshot(
    store: &impl Store,
    resolver: &mut GenderResolver,
    sport: &Sport,
    gender: Gender,
) -> EligibilitySnapshot {
    EligibilitySnapshot {
        eliminated: eliminated(store, resolver, sport, gender),
        locked: locked(store, resolver, sport, gender),
    }
}

/// Roster participants of the gender that are neither eliminated nor locked.
/// Feeds participant pickers and the two-remain-means-final rule. Roster
/// entries whose gender cannot be derived are skipped.
pub fn eligible(
    store: &impl Store,
    resolver: &mut GenderResolver,
    sport: &Sport,
    gender: Gender,
) -> Vec<Participant> {
    let snap = snapshot(store, resolver, sport, gender);
    roster_participants(sport)
        .into_iter()
        .filter(|p| match resolver.participant_gender(store, sport, p) {
            Some(g) => g == gender,
            None => {
                log::debug!(
                    "skipping roster entry '{}' of {}: gender unresolved",
                    p,
                    sport.name
                );
                false
            }
        })
        .filter(|p| !snap.blocks(p))
        .collect()
}

/// The sport's full roster as participants (teams or players per type).
pub fn roster_participants(sport: &Sport) -> Vec<Participant> {
    if sport.sport_type.is_team() {
        sport
            .teams
            .iter()
            .map(|t| Participant::Team(t.name.clone()))
            .collect()
    } else {
        sport
            .players
            .iter()
            .map(|id| Participant::Player(*id))
            .collect()
    }
}
