//! The application stage machine.
//!
//! `APPLIED -> SCREENED | INTERVIEWING -> OFFERED | REJECTED -> HIRED | REJECTED`, driven only
//! by interview outcomes and offer responses.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::domain::{Interview, InterviewId, InterviewResult, InterviewType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Applied,
    Screened,
    Interviewing,
    Offered,
    Hired,
    Rejected,
}

impl Stage {
    pub const fn is_terminal(self) -> bool {
        matches!(self, Stage::Hired | Stage::Rejected)
    }

    pub const fn label(self) -> &'static str {
        match self {
            Stage::Applied => "APPLIED",
            Stage::Screened => "SCREENED",
            Stage::Interviewing => "INTERVIEWING",
            Stage::Offered => "OFFERED",
            Stage::Hired => "HIRED",
            Stage::Rejected => "REJECTED",
        }
    }

    /// Apply one event, or explain why it is not a legal move from here.
    pub fn next(
        self,
        event: &StageEvent,
        trigger: StageTrigger,
    ) -> Result<Stage, TransitionError> {
        if self.is_terminal() {
            return Err(TransitionError::Terminal(self));
        }

        match *event {
            StageEvent::InterviewOutcome { result, .. } if result.is_pending() => {
                Err(TransitionError::PendingResult)
            }
            StageEvent::InterviewOutcome {
                result: InterviewResult::Failed,
                ..
            } => Ok(Stage::Rejected),
            StageEvent::InterviewOutcome {
                interview_type,
                final_round,
                ..
            } => Ok(self.after_pass(interview_type, final_round, trigger)),
            StageEvent::OfferAccepted if self == Stage::Offered => Ok(Stage::Hired),
            StageEvent::OfferDeclined if self == Stage::Offered => Ok(Stage::Rejected),
            StageEvent::OfferAccepted | StageEvent::OfferDeclined => {
                Err(TransitionError::NoOfferExtended(self))
            }
        }
    }

    fn after_pass(
        self,
        interview_type: InterviewType,
        final_round: bool,
        trigger: StageTrigger,
    ) -> Stage {
        if self == Stage::Offered {
            return Stage::Offered;
        }

        let advances = match trigger {
            StageTrigger::AnyInterview => true,
            StageTrigger::FinalInterview => final_round,
        };
        if advances {
            return Stage::Offered;
        }

        match (self, interview_type) {
            (Stage::Applied, InterviewType::InitialScreening) => Stage::Screened,
            _ => Stage::Interviewing,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Events that move an application between stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageEvent {
    InterviewOutcome {
        interview_type: InterviewType,
        result: InterviewResult,
        final_round: bool,
    },
    OfferAccepted,
    OfferDeclined,
}

/// Which passed interview is allowed to push an application to `OFFERED`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StageTrigger {
    /// Only a pass on the last outstanding interview produces an offer.
    #[default]
    FinalInterview,
    /// Any pass produces an offer.
    AnyInterview,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("application is already {0} and cannot move")]
    Terminal(Stage),
    #[error("a pending interview result does not move an application")]
    PendingResult,
    #[error("no offer has been extended (application is {0})")]
    NoOfferExtended(Stage),
    #[error("interview {0} does not belong to this application")]
    UnknownInterview(InterviewId),
}

/// An interview is the final round when no other interview on the application is still
/// pending. Schedule order does not matter: rounds may be recorded out of order.
pub fn is_final_round(interview: &Interview, siblings: &[Interview]) -> bool {
    !siblings.iter().any(|other| {
        other.id != interview.id
            && other.application_id == interview.application_id
            && other.result.is_pending()
    })
}
