//! Match progression state machine: validates match creation, status
//! transitions, and deletion against sport-type rules, the event window,
//! stage ordering, and the eligibility tracker. The only status transitions
//! are `scheduled -> {completed, draw, cancelled}`; all three are terminal.

use crate::logic::{eligibility, gender::GenderResolver, standings};
use crate::models::{
    EngineError, EventId, Gender, MatchSeq, MatchStatus, MatchType, Outcome, Participant,
    Qualifier, Sport, SportMatch,
};
use crate::store::Store;
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;

/// Admin request to schedule a new match.
#[derive(Clone, Debug, Deserialize)]
pub struct CreateMatchRequest {
    pub sport: String,
    pub event: EventId,
    pub match_type: MatchType,
    pub participants: Vec<Participant>,
    pub match_date: NaiveDate,
}

/// Admin request to update a match: move its date (while scheduled) and/or
/// resolve it with a terminal status plus outcome. `winner`/`qualifiers`
/// are only accepted together with `status: completed`.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct UpdateMatchRequest {
    pub status: Option<MatchStatus>,
    pub match_date: Option<NaiveDate>,
    pub winner: Option<Participant>,
    pub qualifiers: Option<Vec<Qualifier>>,
}

/// Validate and persist a new match. On success the match gets the next
/// sequence number for the (sport, event) — one counter shared by both
/// gender brackets — and starts out `scheduled`.
pub fn create_match(
    store: &mut impl Store,
    resolver: &mut GenderResolver,
    req: CreateMatchRequest,
) -> Result<SportMatch, EngineError> {
    let sport = store
        .sport(&req.sport, req.event)
        .ok_or_else(|| EngineError::SportNotFound(req.sport.clone()))?;
    let window = store
        .event_window(req.event)
        .ok_or(EngineError::EventNotFound(req.event))?;

    if !window.contains(req.match_date) {
        return Err(EngineError::DateOutsideWindow {
            date: req.match_date,
            start: window.start,
            end: window.end,
        });
    }

    validate_participants(&sport, &req.participants)?;
    let gender = common_gender(store, resolver, &sport, &req.participants)?;

    // History of the same gender bracket drives every stage rule below.
    let history: Vec<SportMatch> = store
        .matches(&sport.name, sport.event)
        .into_iter()
        .filter(|m| resolver.match_gender(store, &sport, m) == Some(gender))
        .collect();

    match req.match_type {
        MatchType::League => {
            if sport.sport_type.is_multi() {
                return Err(EngineError::LeagueDualOnly);
            }
            if history.iter().any(|m| m.match_type != MatchType::League) {
                return Err(EngineError::LeagueStageClosed);
            }
        }
        MatchType::Knockout | MatchType::Final => {
            check_stage_order(&history, req.match_type, req.match_date)?;

            let snap = eligibility::snapshot(store, resolver, &sport, gender);
            for p in &req.participants {
                if snap.eliminated.contains(p) {
                    return Err(EngineError::ParticipantEliminated(p.clone()));
                }
                if snap.locked.contains(p) {
                    return Err(EngineError::ParticipantLocked(p.clone()));
                }
            }

            // When the bracket is down to its last two, the next dual match
            // between exactly those two has to be the final.
            if req.match_type == MatchType::Knockout && sport.sport_type.is_dual() {
                let remaining = eligibility::eligible(store, resolver, &sport, gender);
                if remaining.len() == 2 && remaining.iter().all(|p| req.participants.contains(p))
                {
                    return Err(EngineError::MustBeFinal);
                }
            }
        }
    }

    // Next sequence number is scoped to (sport, event), not to the gender
    // bracket: both brackets draw from one counter.
    let seq = store
        .matches(&sport.name, sport.event)
        .iter()
        .map(|m| m.seq)
        .max()
        .unwrap_or(0)
        + 1;

    let m = SportMatch {
        seq,
        sport: sport.name.clone(),
        event: sport.event,
        match_type: req.match_type,
        participants: req.participants,
        status: MatchStatus::Scheduled,
        outcome: None,
        match_date: req.match_date,
    };
    store.insert_match(m.clone())?;
    Ok(m)
}

/// Arity, duplicate, kind, and roster-membership checks for a proposed
/// participant list.
fn validate_participants(sport: &Sport, participants: &[Participant]) -> Result<(), EngineError> {
    if sport.sport_type.is_dual() {
        if participants.len() != 2 {
            return Err(EngineError::DualParticipantCount(participants.len()));
        }
    } else if participants.len() <= 2 || participants.len() > sport.roster_size() {
        return Err(EngineError::MultiParticipantCount {
            got: participants.len(),
            roster: sport.roster_size(),
        });
    }

    let mut seen = HashSet::new();
    for p in participants {
        if !seen.insert(p) {
            return Err(EngineError::DuplicateParticipant(p.clone()));
        }
        match p {
            Participant::Team(name) => {
                if !sport.sport_type.is_team() {
                    return Err(EngineError::WrongParticipantKind);
                }
                if sport.team(name).is_none() {
                    return Err(EngineError::UnknownParticipant(p.clone()));
                }
            }
            Participant::Player(id) => {
                if sport.sport_type.is_team() {
                    return Err(EngineError::WrongParticipantKind);
                }
                if !sport.players.contains(id) {
                    return Err(EngineError::UnknownParticipant(p.clone()));
                }
            }
        }
    }
    Ok(())
}

/// All participants must resolve to one common gender; at creation a
/// missing gender is a validation error, not a skip.
fn common_gender(
    store: &impl Store,
    resolver: &mut GenderResolver,
    sport: &Sport,
    participants: &[Participant],
) -> Result<Gender, EngineError> {
    let mut gender = None;
    for p in participants {
        let g = resolver
            .participant_gender(store, sport, p)
            .ok_or_else(|| EngineError::GenderUnresolved(p.clone()))?;
        match gender {
            None => gender = Some(g),
            Some(prev) if prev != g => return Err(EngineError::MixedGenders),
            Some(_) => {}
        }
    }
    // validate_participants ran first, so the list is non-empty.
    gender.ok_or(EngineError::MixedGenders)
}

/// Stage-ordering rules for a new knockout/final match against the gender
/// bracket's history: the prior stage must be fully resolved and the new
/// match may not be dated before the prior stage's last match (same day is
/// fine).
fn check_stage_order(
    history: &[SportMatch],
    match_type: MatchType,
    match_date: NaiveDate,
) -> Result<(), EngineError> {
    if history
        .iter()
        .any(|m| m.match_type == MatchType::League && m.status == MatchStatus::Scheduled)
    {
        return Err(EngineError::LeagueStillScheduled);
    }

    match match_type {
        MatchType::Knockout => {
            let latest_league = history
                .iter()
                .filter(|m| m.match_type == MatchType::League)
                .map(|m| m.match_date)
                .max();
            if let Some(latest) = latest_league {
                if match_date < latest {
                    return Err(EngineError::KnockoutBeforeLeague(latest));
                }
            }
        }
        MatchType::Final => {
            if history
                .iter()
                .any(|m| m.match_type == MatchType::Knockout && m.status == MatchStatus::Scheduled)
            {
                return Err(EngineError::KnockoutStillScheduled);
            }
            let latest_knockout = history
                .iter()
                .filter(|m| m.match_type == MatchType::Knockout)
                .map(|m| m.match_date)
                .max();
            if let Some(latest) = latest_knockout {
                if match_date < latest {
                    return Err(EngineError::FinalBeforeKnockout(latest));
                }
            }
            // A draw or cancelled final frees up a rematch; scheduled or
            // completed does not.
            if history.iter().any(|m| {
                m.match_type == MatchType::Final
                    && matches!(m.status, MatchStatus::Scheduled | MatchStatus::Completed)
            }) {
                return Err(EngineError::FinalAlreadyExists);
            }
        }
        MatchType::League => unreachable!("league creation is handled by the caller"),
    }
    Ok(())
}

/// Validate and persist a match update. `today` is the caller's clock (the
/// web layer passes the current UTC date); results can only be recorded for
/// matches whose date has arrived, while the event window is active.
///
/// On a league status transition the standings engine is invoked with the
/// previous (status, winner) pair; a standings failure is logged and does
/// not roll back the match write — the table is repairable via recompute.
pub fn update_match(
    store: &mut impl Store,
    sport_name: &str,
    event: EventId,
    seq: MatchSeq,
    req: UpdateMatchRequest,
    today: NaiveDate,
) -> Result<SportMatch, EngineError> {
    let sport = store
        .sport(sport_name, event)
        .ok_or_else(|| EngineError::SportNotFound(sport_name.to_string()))?;
    let window = store
        .event_window(event)
        .ok_or(EngineError::EventNotFound(event))?;
    let mut m = store
        .match_by_seq(&sport.name, event, seq)
        .ok_or(EngineError::MatchNotFound(seq))?;

    let previous_status = m.status;
    let previous_winner = m.winner().cloned();

    if let Some(date) = req.match_date {
        if m.status != MatchStatus::Scheduled {
            return Err(EngineError::DateEditNotScheduled);
        }
        if !window.contains(date) {
            return Err(EngineError::DateOutsideWindow {
                date,
                start: window.start,
                end: window.end,
            });
        }
        m.match_date = date;
    }

    validate_outcome_shape(&sport, &m, &req)?;

    let mut transitioned = false;
    if let Some(status) = req.status {
        if m.status.is_terminal() {
            return Err(EngineError::AlreadyResolved);
        }
        if status != m.status {
            if m.match_date > today {
                return Err(EngineError::MatchInFuture(m.match_date));
            }
            if !window.contains(today) {
                return Err(EngineError::OutsideActiveWindow(today));
            }
            // Any status other than completed carries no outcome.
            let outcome = match status {
                MatchStatus::Completed => completed_outcome(&sport, &m, req)?,
                _ => None,
            };
            m.status = status;
            m.outcome = outcome;
            transitioned = true;
        }
    }

    store.update_match(m.clone())?;

    if transitioned && m.match_type == MatchType::League {
        if let Err(e) = standings::apply(store, &m, previous_status, previous_winner.as_ref()) {
            log::warn!(
                "standings update failed for {}/{} match {}: {}; run recompute to repair",
                m.sport,
                m.event,
                m.seq,
                e
            );
        }
    }
    Ok(m)
}

/// Reject a winner for a non-dual sport or a non-participant, and
/// qualifiers for a non-multi sport. An outcome is only meaningful on a
/// `completed` transition, so supplying one with any other (or no)
/// requested status is rejected rather than dropped.
fn validate_outcome_shape(
    sport: &Sport,
    m: &SportMatch,
    req: &UpdateMatchRequest,
) -> Result<(), EngineError> {
    if let Some(winner) = &req.winner {
        if req.status != Some(MatchStatus::Completed) || !sport.sport_type.is_dual() {
            return Err(EngineError::WinnerNotAllowed);
        }
        if !m.has_participant(winner) {
            return Err(EngineError::WinnerNotParticipant(winner.clone()));
        }
    }
    if let Some(qualifiers) = &req.qualifiers {
        if req.status != Some(MatchStatus::Completed) || !sport.sport_type.is_multi() {
            return Err(EngineError::QualifiersNotAllowed);
        }
        let n = qualifiers.len();
        let positions: HashSet<u32> = qualifiers.iter().map(|q| q.position).collect();
        if positions.len() != n || qualifiers.iter().any(|q| q.position < 1 || q.position > n as u32)
        {
            return Err(EngineError::QualifierPositions(n));
        }
        for q in qualifiers {
            if !m.has_participant(&q.participant) {
                return Err(EngineError::QualifierNotParticipant(q.participant.clone()));
            }
        }
    }
    Ok(())
}

/// Outcome attached when a match is marked completed: dual types must name
/// their winner; multi types record whatever qualifier list was declared
/// (possibly none).
fn completed_outcome(
    sport: &Sport,
    m: &SportMatch,
    req: UpdateMatchRequest,
) -> Result<Option<Outcome>, EngineError> {
    if sport.sport_type.is_dual() {
        let winner = req.winner.ok_or(EngineError::MissingWinner)?;
        debug_assert!(m.has_participant(&winner));
        Ok(Some(Outcome::Winner(winner)))
    } else {
        Ok(req.qualifiers.map(Outcome::Qualifiers))
    }
}

/// Delete a match; permitted only while it is still scheduled.
pub fn delete_match(
    store: &mut impl Store,
    sport_name: &str,
    event: EventId,
    seq: MatchSeq,
) -> Result<(), EngineError> {
    let m = store
        .match_by_seq(&sport_name.to_lowercase(), event, seq)
        .ok_or(EngineError::MatchNotFound(seq))?;
    if m.status != MatchStatus::Scheduled {
        return Err(EngineError::DeleteNotScheduled);
    }
    store.delete_match(&m.sport, event, seq)
}
