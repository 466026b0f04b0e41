//! Standings engine: cumulative points-table maintenance. Incremental delta
//! application when one league match changes, full replay of league history
//! when the table has drifted.
//!
//! Scoring: win 2 points, draw 1 point each, cancelled 1 point each, loss 0.
//! Every counted match adds one to `matches_played` per participant.

use crate::logic::gender::GenderResolver;
use crate::models::{
    EngineError, Gender, MatchStatus, MatchType, Participant, RankedEntry, Sport, SportMatch,
    StandingsEntry,
};
use crate::store::Store;
use serde::Serialize;
use std::collections::HashMap;

/// Result of a recomputation pass.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize)]
pub struct RecomputeReport {
    /// League matches replayed into the table.
    pub processed: u32,
    /// Matches skipped because their gender could not be derived.
    pub errors: u32,
}

/// Add one match's contribution to a row.
fn credit(entry: &mut StandingsEntry, status: MatchStatus, is_winner: bool) {
    match status {
        MatchStatus::Scheduled => {}
        MatchStatus::Completed => {
            if is_winner {
                entry.points += 2;
                entry.matches_won += 1;
            } else {
                entry.matches_lost += 1;
            }
            entry.matches_played += 1;
        }
        MatchStatus::Draw => {
            entry.points += 1;
            entry.matches_draw += 1;
            entry.matches_played += 1;
        }
        MatchStatus::Cancelled => {
            entry.points += 1;
            entry.matches_cancelled += 1;
            entry.matches_played += 1;
        }
    }
}

/// Remove a previously credited contribution. Decrements floor at zero so a
/// drifted row cannot underflow; recompute repairs whatever is left over.
fn revert(entry: &mut StandingsEntry, status: MatchStatus, was_winner: bool) {
    match status {
        MatchStatus::Scheduled => {}
        MatchStatus::Completed => {
            if was_winner {
                entry.points = entry.points.saturating_sub(2);
                entry.matches_won = entry.matches_won.saturating_sub(1);
            } else {
                entry.matches_lost = entry.matches_lost.saturating_sub(1);
            }
            entry.matches_played = entry.matches_played.saturating_sub(1);
        }
        MatchStatus::Draw => {
            entry.points = entry.points.saturating_sub(1);
            entry.matches_draw = entry.matches_draw.saturating_sub(1);
            entry.matches_played = entry.matches_played.saturating_sub(1);
        }
        MatchStatus::Cancelled => {
            entry.points = entry.points.saturating_sub(1);
            entry.matches_cancelled = entry.matches_cancelled.saturating_sub(1);
            entry.matches_played = entry.matches_played.saturating_sub(1);
        }
    }
}

/// Apply one league match's status transition to the points table: revert
/// the contribution implied by the previous (status, winner) pair, then
/// credit the match's current pair. Rows are created lazily on first touch.
///
/// The caller guarantees an actual transition occurred; re-invoking with an
/// unchanged pair would double-count and must not happen.
pub fn apply(
    store: &mut impl Store,
    m: &SportMatch,
    previous_status: MatchStatus,
    previous_winner: Option<&Participant>,
) -> Result<(), EngineError> {
    let current_winner = m.winner();
    for p in &m.participants {
        let mut entry = store
            .standings_entry(&m.sport, m.event, p)
            .unwrap_or_else(|| StandingsEntry::new(m.sport.clone(), m.event, p.clone()));
        revert(&mut entry, previous_status, previous_winner == Some(p));
        credit(&mut entry, m.status, current_winner == Some(p));
        store.put_standings_entry(entry)?;
    }
    Ok(())
}

/// Rebuild the table for a sport/gender from scratch: replay every resolved
/// league match of that gender, zero-initialize every participant observed,
/// and overwrite their rows. Reads match history only; never mutates it.
/// Safe to run at any time, and idempotent over unchanged history.
pub fn recompute(
    store: &mut impl Store,
    resolver: &mut GenderResolver,
    sport: &Sport,
    gender: Gender,
) -> Result<RecomputeReport, EngineError> {
    let mut report = RecomputeReport::default();
    let mut rows: HashMap<Participant, StandingsEntry> = HashMap::new();

    for m in store.matches(&sport.name, sport.event) {
        if m.match_type != MatchType::League || !m.status.is_terminal() {
            continue;
        }
        match resolver.match_gender(store, sport, &m) {
            Some(g) if g == gender => {}
            Some(_) => continue,
            None => {
                log::warn!(
                    "recompute {}/{}: match {} skipped, gender unresolved",
                    sport.name,
                    sport.event,
                    m.seq
                );
                report.errors += 1;
                continue;
            }
        }
        let winner = m.winner().cloned();
        for p in &m.participants {
            let entry = rows.entry(p.clone()).or_insert_with(|| {
                StandingsEntry::new(sport.name.clone(), sport.event, p.clone())
            });
            credit(entry, m.status, winner.as_ref() == Some(p));
        }
        report.processed += 1;
    }

    for entry in rows.into_values() {
        store.put_standings_entry(entry)?;
    }
    Ok(report)
}

/// The table for one gender, ranked: points descending, then wins
/// descending. Rows whose participant gender cannot be derived are skipped.
pub fn standings(
    store: &impl Store,
    resolver: &mut GenderResolver,
    sport: &Sport,
    gender: Gender,
) -> Vec<RankedEntry> {
    let mut rows: Vec<StandingsEntry> = store
        .standings(&sport.name, sport.event)
        .into_iter()
        .filter(
            |e| match resolver.participant_gender(store, sport, &e.participant) {
                Some(g) => g == gender,
                None => {
                    log::debug!(
                        "standings {}/{}: row '{}' skipped, gender unresolved",
                        sport.name,
                        sport.event,
                        e.participant
                    );
                    false
                }
            },
        )
        .collect();
    rows.sort_by(|a, b| {
        b.points
            .cmp(&a.points)
            .then(b.matches_won.cmp(&a.matches_won))
    });
    rows.into_iter()
        .enumerate()
        .map(|(i, entry)| RankedEntry {
            rank: i as u32 + 1,
            entry,
        })
        .collect()
}
