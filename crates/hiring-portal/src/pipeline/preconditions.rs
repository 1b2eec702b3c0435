use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Application, Interview, InterviewResult, Job, JobStatus};
use super::stage::Stage;
use crate::access::{is_allowed, Action};
use crate::session::{Identity, Role};

/// Outcome of a precondition check. Denials always carry the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionDecision {
    Allowed,
    Denied(PreconditionFailure),
}

impl ActionDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, ActionDecision::Allowed)
    }

    pub fn summary(&self) -> String {
        match self {
            ActionDecision::Allowed => "allowed".to_string(),
            ActionDecision::Denied(reason) => reason.summary(),
        }
    }

    pub fn into_result(self) -> Result<(), PreconditionFailure> {
        match self {
            ActionDecision::Allowed => Ok(()),
            ActionDecision::Denied(reason) => Err(reason),
        }
    }
}

impl From<Result<(), PreconditionFailure>> for ActionDecision {
    fn from(result: Result<(), PreconditionFailure>) -> Self {
        match result {
            Ok(()) => ActionDecision::Allowed,
            Err(reason) => ActionDecision::Denied(reason),
        }
    }
}

/// Reasons a pipeline action is refused before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum PreconditionFailure {
    #[error("{role} may not {action}")]
    RoleNotPermitted { role: Role, action: Action },
    #[error("no resume on file")]
    NoResumeOnFile,
    #[error("already applied to this job")]
    AlreadyApplied,
    #[error("job is {status:?}")]
    JobNotOpen { status: JobStatus },
    #[error("application is already {stage}")]
    AlreadyTerminal { stage: Stage },
    #[error("interview is assigned to another interviewer")]
    NotAssignedInterviewer,
    #[error("interview result already recorded as {result:?}")]
    ResultAlreadyRecorded { result: InterviewResult },
    #[error("result must be PASSED or FAILED")]
    ResultRequired,
    #[error("feedback is required")]
    FeedbackRequired,
    #[error("interview time is in the past")]
    ScheduledInPast,
}

impl PreconditionFailure {
    pub fn summary(&self) -> String {
        match self {
            PreconditionFailure::RoleNotPermitted { role, action } => {
                format!("your role ({role}) is not allowed to {action}")
            }
            PreconditionFailure::NoResumeOnFile => {
                "upload your resume before applying".to_string()
            }
            PreconditionFailure::AlreadyApplied => {
                "you have already applied to this job".to_string()
            }
            PreconditionFailure::JobNotOpen { status } => format!(
                "this job is {} and not accepting applications",
                status.label().to_lowercase()
            ),
            PreconditionFailure::AlreadyTerminal { stage } => format!(
                "the application is {} and cannot be scheduled",
                stage.label().to_lowercase()
            ),
            PreconditionFailure::NotAssignedInterviewer => {
                "only the assigned interviewer can submit this result".to_string()
            }
            PreconditionFailure::ResultAlreadyRecorded { result } => format!(
                "a result ({}) has already been submitted",
                result.label().to_lowercase()
            ),
            PreconditionFailure::ResultRequired => "choose passed or failed".to_string(),
            PreconditionFailure::FeedbackRequired => "feedback cannot be empty".to_string(),
            PreconditionFailure::ScheduledInPast => {
                "pick an interview time in the future".to_string()
            }
        }
    }
}

/// What the client knows about the candidate when deciding whether they may apply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateRecord {
    pub resume_on_file: bool,
    pub applications: Vec<Application>,
}

impl CandidateRecord {
    pub fn new(resume_on_file: bool, applications: Vec<Application>) -> Self {
        Self {
            resume_on_file,
            applications,
        }
    }
}

fn require_role(identity: &Identity, action: Action) -> Result<(), PreconditionFailure> {
    if is_allowed(identity.role(), action) {
        Ok(())
    } else {
        Err(PreconditionFailure::RoleNotPermitted {
            role: identity.role(),
            action,
        })
    }
}

/// Checked in order: role, resume, duplicate application, job status.
pub fn can_apply(identity: &Identity, job: &Job, record: &CandidateRecord) -> ActionDecision {
    check_apply(identity, job, record).into()
}

fn check_apply(
    identity: &Identity,
    job: &Job,
    record: &CandidateRecord,
) -> Result<(), PreconditionFailure> {
    require_role(identity, Action::ApplyToJob)?;

    if !record.resume_on_file {
        return Err(PreconditionFailure::NoResumeOnFile);
    }

    if record
        .applications
        .iter()
        .any(|application| application.links(&job.id, identity.id()))
    {
        return Err(PreconditionFailure::AlreadyApplied);
    }

    if !job.status.accepts_applications() {
        return Err(PreconditionFailure::JobNotOpen { status: job.status });
    }

    Ok(())
}

pub fn can_schedule(application: &Application) -> ActionDecision {
    let stage = application.current_stage();
    if stage.is_terminal() {
        ActionDecision::Denied(PreconditionFailure::AlreadyTerminal { stage })
    } else {
        ActionDecision::Allowed
    }
}

/// Scheduling check including the caller's role and the proposed time.
pub fn can_schedule_at(
    identity: &Identity,
    application: &Application,
    scheduled_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> ActionDecision {
    let checked = require_role(identity, Action::ScheduleInterview)
        .and_then(|()| can_schedule(application).into_result())
        .and_then(|()| {
            if scheduled_time <= now {
                Err(PreconditionFailure::ScheduledInPast)
            } else {
                Ok(())
            }
        });
    checked.into()
}

pub fn can_submit_result(identity: &Identity, interview: &Interview) -> ActionDecision {
    let checked = require_role(identity, Action::SubmitInterviewResult).and_then(|()| {
        if !interview.is_assigned_to(identity.id()) {
            Err(PreconditionFailure::NotAssignedInterviewer)
        } else if !interview.result.is_pending() {
            Err(PreconditionFailure::ResultAlreadyRecorded {
                result: interview.result,
            })
        } else {
            Ok(())
        }
    });
    checked.into()
}

/// Form-level checks on a result submission: a decided result and non-blank feedback.
pub fn check_result_form(
    result: InterviewResult,
    feedback: &str,
) -> Result<(), PreconditionFailure> {
    if result.is_pending() {
        return Err(PreconditionFailure::ResultRequired);
    }
    if feedback.trim().is_empty() {
        return Err(PreconditionFailure::FeedbackRequired);
    }
    Ok(())
}
