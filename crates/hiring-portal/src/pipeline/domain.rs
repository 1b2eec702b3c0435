use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::stage::{Stage, StageEvent, StageTrigger, TransitionError};
use crate::session::UserId;

macro_rules! record_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

record_id!(
    /// Backend identifier of a job posting.
    JobId
);
record_id!(
    /// Backend identifier of a job application (job-candidate link).
    ApplicationId
);
record_id!(
    /// Backend identifier of a scheduled interview.
    InterviewId
);

/// Publication state of a job posting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    Draft,
    #[serde(alias = "PUBLISHED")]
    Open,
    Closed,
}

impl JobStatus {
    pub const fn accepts_applications(self) -> bool {
        matches!(self, JobStatus::Open)
    }

    pub const fn label(self) -> &'static str {
        match self {
            JobStatus::Draft => "DRAFT",
            JobStatus::Open => "OPEN",
            JobStatus::Closed => "CLOSED",
        }
    }
}

/// Read copy of a job posting owned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub title: String,
    pub department: String,
    pub location: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    pub status: JobStatus,
}

/// Job form contents submitted by recruiters and admins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDraft {
    pub title: String,
    pub department: String,
    pub location: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<String>,
    pub status: JobStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobDraftError {
    #[error("{0} is required")]
    MissingField(&'static str),
}

impl JobDraft {
    pub fn validate(&self) -> Result<(), JobDraftError> {
        let fields = [
            ("title", &self.title),
            ("department", &self.department),
            ("location", &self.location),
            ("description", &self.description),
        ];
        match fields
            .into_iter()
            .find(|(_, value)| value.trim().is_empty())
        {
            Some((field, _)) => Err(JobDraftError::MissingField(field)),
            None => Ok(()),
        }
    }
}

/// Read copy of an application linking one candidate to one job.
///
/// `current_stage` has no setter: local copies only move through [`Application::advance`],
/// which runs the validated stage machine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub id: ApplicationId,
    pub job_id: JobId,
    pub user_id: UserId,
    pub applied_at: DateTime<Utc>,
    current_stage: Stage,
}

impl Application {
    /// A freshly submitted application.
    pub fn submitted(
        id: ApplicationId,
        job_id: JobId,
        user_id: UserId,
        applied_at: DateTime<Utc>,
    ) -> Self {
        Self::from_record(id, job_id, user_id, applied_at, Stage::Applied)
    }

    /// Mirror a server record as-is.
    pub fn from_record(
        id: ApplicationId,
        job_id: JobId,
        user_id: UserId,
        applied_at: DateTime<Utc>,
        current_stage: Stage,
    ) -> Self {
        Self {
            id,
            job_id,
            user_id,
            applied_at,
            current_stage,
        }
    }

    pub fn current_stage(&self) -> Stage {
        self.current_stage
    }

    pub fn links(&self, job_id: &JobId, user_id: &UserId) -> bool {
        &self.job_id == job_id && &self.user_id == user_id
    }

    pub fn advance(
        &mut self,
        event: &StageEvent,
        trigger: StageTrigger,
    ) -> Result<Stage, TransitionError> {
        let next = self.current_stage.next(event, trigger)?;
        self.current_stage = next;
        Ok(next)
    }
}

/// Interview categories; the category fixes which score criteria are mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewType {
    InitialScreening,
    Architect,
    Director,
    Technical,
    Behavioral,
    Hr,
    #[serde(other)]
    Other,
}

impl InterviewType {
    pub const fn label(self) -> &'static str {
        match self {
            InterviewType::InitialScreening => "INITIAL_SCREENING",
            InterviewType::Architect => "ARCHITECT",
            InterviewType::Director => "DIRECTOR",
            InterviewType::Technical => "TECHNICAL",
            InterviewType::Behavioral => "BEHAVIORAL",
            InterviewType::Hr => "HR",
            InterviewType::Other => "OTHER",
        }
    }
}

impl fmt::Display for InterviewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewResult {
    #[default]
    Pending,
    Passed,
    Failed,
}

impl InterviewResult {
    pub const fn is_pending(self) -> bool {
        matches!(self, InterviewResult::Pending)
    }

    pub const fn label(self) -> &'static str {
        match self {
            InterviewResult::Pending => "PENDING",
            InterviewResult::Passed => "PASSED",
            InterviewResult::Failed => "FAILED",
        }
    }
}

/// Evaluation dimensions an interviewer may be required to rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Criterion {
    LogicBuilding,
    Oop,
    Db,
    Communication,
}

impl Criterion {
    pub const fn key(self) -> &'static str {
        match self {
            Criterion::LogicBuilding => "logicBuilding",
            Criterion::Oop => "oop",
            Criterion::Db => "db",
            Criterion::Communication => "communication",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Whole-number rating in `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rating {0} is outside 1..=5")]
pub struct RatingOutOfRange(pub i64);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Rating(value as u8))
        } else {
            Err(RatingOutOfRange(value))
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingOutOfRange;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::try_from(i64::from(value))
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub criteria: Criterion,
    pub score: Rating,
}

/// Read copy of an interview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: InterviewId,
    pub application_id: ApplicationId,
    pub interviewer_id: UserId,
    pub interview_type: InterviewType,
    pub scheduled_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(default)]
    pub result: InterviewResult,
    #[serde(default)]
    pub scores: Vec<Score>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl Interview {
    pub fn is_assigned_to(&self, user: &UserId) -> bool {
        &self.interviewer_id == user
    }
}
