//! Hiring pipeline model: records, the stage machine, scoring rules, action preconditions
//! and the desk that coordinates them with the backend.

mod desk;
mod domain;
mod preconditions;
mod scoring;
mod stage;
mod timeline;

pub use desk::{
    CandidateBoard, DeskError, HiringDesk, InterviewPlan, JobListing, RecordedOutcome,
    ResultSubmission,
};
pub use domain::{
    Application, ApplicationId, Criterion, Interview, InterviewId, InterviewResult,
    InterviewType, Job, JobDraft, JobDraftError, JobId, JobStatus, Rating, RatingOutOfRange,
    Score,
};
pub use preconditions::{
    can_apply, can_schedule, can_schedule_at, can_submit_result, check_result_form,
    ActionDecision, CandidateRecord, PreconditionFailure,
};
pub use scoring::{build_score_payload, required_criteria, ScoreForm, ScoreProblem, ScoringError};
pub use stage::{is_final_round, Stage, StageEvent, StageTrigger, TransitionError};
pub use timeline::ApplicationTimeline;

#[cfg(test)]
mod tests;
