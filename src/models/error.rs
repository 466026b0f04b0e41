//! Errors surfaced by the tournament engine.

use crate::models::matches::{MatchSeq, Participant};
use crate::models::sport::{EventId, PlayerId};
use chrono::NaiveDate;

/// Errors that can occur during match scheduling, progression, and
/// standings maintenance. Validation variants carry the specific reason
/// the request was rejected; not-found variants name the missing record.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// Referenced sport is not registered for the event.
    #[error("sport '{0}' is not registered for this event")]
    SportNotFound(String),
    /// Referenced event has no configured date window.
    #[error("event {0} has no configured date window")]
    EventNotFound(EventId),
    /// Referenced match does not exist.
    #[error("match {0} not found")]
    MatchNotFound(MatchSeq),
    /// Referenced player is not registered.
    #[error("player {0} is not registered")]
    PlayerNotFound(PlayerId),

    /// Match date falls outside the event's configured window.
    #[error("match date {date} is outside the event window ({start} to {end})")]
    DateOutsideWindow {
        date: NaiveDate,
        start: NaiveDate,
        end: NaiveDate,
    },
    /// Dual-type sports take exactly two participants per match.
    #[error("a dual-type match needs exactly 2 participants, got {0}")]
    DualParticipantCount(usize),
    /// Multi-type sports take more than two participants, at most the roster.
    #[error("a multi-type match needs more than 2 and at most {roster} participants, got {got}")]
    MultiParticipantCount { got: usize, roster: usize },
    /// The same participant appears twice in one match.
    #[error("participant '{0}' is listed more than once")]
    DuplicateParticipant(Participant),
    /// A participant is not on the sport's registered roster.
    #[error("participant '{0}' is not on the sport's roster")]
    UnknownParticipant(Participant),
    /// Team participants given for a player sport, or vice versa.
    #[error("participant kind does not match the sport's structural type")]
    WrongParticipantKind,
    /// A participant's gender could not be resolved from player records.
    #[error("cannot resolve a gender for participant '{0}'")]
    GenderUnresolved(Participant),
    /// The participants do not all resolve to one common gender.
    #[error("all participants of a match must share one gender")]
    MixedGenders,

    /// League matches cannot be added once the knockout stage has begun.
    #[error("league stage is closed: a knockout or final match already exists")]
    LeagueStageClosed,
    /// League is restricted to dual-type sports.
    #[error("league matches are not available for multi-type sports")]
    LeagueDualOnly,
    /// A knockout match cannot be dated before the last league match.
    #[error("knockout match cannot be dated before the last league match ({0})")]
    KnockoutBeforeLeague(NaiveDate),
    /// A final cannot be dated before the last knockout match.
    #[error("final cannot be dated before the last knockout match ({0})")]
    FinalBeforeKnockout(NaiveDate),
    /// Knockout/final requested while league matches are still unresolved.
    #[error("complete league matches first: a league match is still scheduled")]
    LeagueStillScheduled,
    /// Final requested while knockout matches are still unresolved.
    #[error("complete knockout matches first: a knockout match is still scheduled")]
    KnockoutStillScheduled,
    /// Participant was eliminated by an earlier knockout/final result.
    #[error("participant '{0}' has been eliminated")]
    ParticipantEliminated(Participant),
    /// Participant is already locked into a pending knockout/final match.
    #[error("participant '{0}' is already scheduled in a pending knockout or final")]
    ParticipantLocked(Participant),
    /// Exactly two eligible participants remain; the match must be the final.
    #[error("only two eligible participants remain: this match must be a final")]
    MustBeFinal,
    /// A final is already scheduled or completed for this sport and gender.
    #[error("a final already exists for this sport and gender")]
    FinalAlreadyExists,

    /// Terminal statuses are immutable.
    #[error("match is already resolved; its status cannot change")]
    AlreadyResolved,
    /// A result cannot be recorded before the match date.
    #[error("match is dated {0}, in the future; it cannot be resolved yet")]
    MatchInFuture(NaiveDate),
    /// Results can only be recorded while the event window is active.
    #[error("results can only be recorded during the event window (today is {0})")]
    OutsideActiveWindow(NaiveDate),
    /// Winners apply to dual-type sports only, and only when completing.
    #[error("a winner can only be declared when completing a dual-type match")]
    WinnerNotAllowed,
    /// The declared winner must be one of the match's own participants.
    #[error("winner '{0}' is not a participant of this match")]
    WinnerNotParticipant(Participant),
    /// A completed dual-type match must declare its winner.
    #[error("a completed dual-type match must declare a winner")]
    MissingWinner,
    /// Qualifiers apply to multi-type sports only, and only when completing.
    #[error("qualifiers can only be declared when completing a multi-type match")]
    QualifiersNotAllowed,
    /// Qualifier positions must form a unique 1..N sequence.
    #[error("qualifier positions must be a unique sequence 1..{0}")]
    QualifierPositions(usize),
    /// Every listed qualifier must be one of the match's own participants.
    #[error("qualifier '{0}' is not a participant of this match")]
    QualifierNotParticipant(Participant),
    /// The match date can only be moved while the match is still scheduled.
    #[error("match date can only be changed while the match is scheduled")]
    DateEditNotScheduled,
    /// Only scheduled matches can be deleted.
    #[error("only scheduled matches can be deleted")]
    DeleteNotScheduled,

    /// Underlying storage failed; the request may be retried by the caller.
    #[error("storage failure: {0}")]
    Persistence(String),
}

impl EngineError {
    /// Whether this error names a missing record (maps to 404 at the edge).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            EngineError::SportNotFound(_)
                | EngineError::EventNotFound(_)
                | EngineError::MatchNotFound(_)
                | EngineError::PlayerNotFound(_)
        )
    }
}
