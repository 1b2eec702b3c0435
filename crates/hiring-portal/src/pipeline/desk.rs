use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::domain::{
    Application, Interview, InterviewId, InterviewResult, InterviewType, Job, JobDraft,
    JobDraftError, JobId,
};
use super::preconditions::{
    can_apply, can_schedule_at, can_submit_result, check_result_form, ActionDecision,
    CandidateRecord, PreconditionFailure,
};
use super::scoring::{build_score_payload, ScoreForm, ScoringError};
use super::stage::{Stage, StageTrigger, TransitionError};
use super::timeline::ApplicationTimeline;
use crate::access::{is_allowed, Action};
use crate::api::{
    ApiError, ApplyRequest, HiringApi, InterviewResultPayload, ScheduleInterviewRequest,
};
use crate::session::{Identity, Role, UserId};

#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error("{role} may not {action}")]
    Forbidden { role: Role, action: Action },
    #[error("precondition failed: {0}")]
    Precondition(#[from] PreconditionFailure),
    #[error(transparent)]
    Scoring(#[from] ScoringError),
    #[error(transparent)]
    Transition(#[from] TransitionError),
    #[error("job form invalid: {0}")]
    Invalid(#[from] JobDraftError),
    #[error(transparent)]
    Upstream(#[from] ApiError),
}

impl DeskError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, DeskError::Upstream(err) if err.is_unauthorized())
    }
}

/// Proposed interview as entered on the scheduling form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewPlan {
    pub interviewer_id: UserId,
    pub interview_type: InterviewType,
    pub scheduled_time: DateTime<Utc>,
    #[serde(default)]
    pub details: Option<String>,
}

/// Interviewer feedback form contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSubmission {
    pub result: InterviewResult,
    pub feedback: String,
    #[serde(default)]
    pub scores: ScoreForm,
}

/// Server copy of the recorded interview plus the stage the application should now be in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedOutcome {
    pub interview: Interview,
    pub projected_stage: Stage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobListing {
    pub job: Job,
    pub eligibility: ActionDecision,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateBoard {
    pub listings: Vec<JobListing>,
    pub applications: Vec<Application>,
}

/// Entry point for dashboard actions: role gate, local validation, then the backend call.
///
/// Nothing is applied locally before the backend accepts it; every successful call returns
/// the server's copy.
pub struct HiringDesk<A> {
    api: Arc<A>,
    trigger: StageTrigger,
}

impl<A> HiringDesk<A>
where
    A: HiringApi + 'static,
{
    pub fn new(api: Arc<A>, trigger: StageTrigger) -> Self {
        Self { api, trigger }
    }

    pub fn trigger(&self) -> StageTrigger {
        self.trigger
    }

    pub async fn post_job(&self, actor: &Identity, draft: &JobDraft) -> Result<Job, DeskError> {
        self.require(actor, Action::PostJob)?;
        draft.validate()?;
        let job = self.api.create_job(draft).await?;
        info!(job = %job.id, user = %actor.id(), "job posted");
        Ok(job)
    }

    pub async fn update_job(
        &self,
        actor: &Identity,
        id: &JobId,
        draft: &JobDraft,
    ) -> Result<Job, DeskError> {
        self.require(actor, Action::EditJob)?;
        draft.validate()?;
        let job = self.api.update_job(id, draft).await?;
        info!(job = %job.id, user = %actor.id(), "job updated");
        Ok(job)
    }

    /// Jobs with per-job apply eligibility for the signed-in user.
    pub async fn candidate_board(
        &self,
        actor: &Identity,
        resume_on_file: bool,
    ) -> Result<CandidateBoard, DeskError> {
        self.require(actor, Action::BrowseJobs)?;
        let (jobs, applications) = tokio::join!(
            self.api.list_jobs(),
            self.api.applications_for_user(actor.id())
        );
        let record = CandidateRecord::new(resume_on_file, applications?);

        let listings = jobs?
            .into_iter()
            .map(|job| {
                let eligibility = can_apply(actor, &job, &record);
                JobListing { job, eligibility }
            })
            .collect();

        Ok(CandidateBoard {
            listings,
            applications: record.applications,
        })
    }

    pub async fn apply(
        &self,
        actor: &Identity,
        job: &Job,
        record: &CandidateRecord,
    ) -> Result<Application, DeskError> {
        self.require(actor, Action::ApplyToJob)?;
        self.check(actor, Action::ApplyToJob, can_apply(actor, job, record))?;

        let request = ApplyRequest {
            job_id: job.id.clone(),
            user_id: actor.id().clone(),
        };
        let application = self.api.apply(&request).await?;
        info!(application = %application.id, job = %job.id, "application submitted");
        Ok(application)
    }

    /// Fresh server copy of one posting.
    pub async fn job_detail(&self, actor: &Identity, id: &JobId) -> Result<Job, DeskError> {
        self.require(actor, Action::BrowseJobs)?;
        Ok(self.api.get_job(id).await?)
    }

    /// Applications received for a job, for the recruiter pipeline view.
    pub async fn job_pipeline(
        &self,
        actor: &Identity,
        job: &JobId,
    ) -> Result<Vec<Application>, DeskError> {
        self.require(actor, Action::EditJob)?;
        Ok(self.api.applications_for_job(job).await?)
    }

    pub async fn schedule_interview(
        &self,
        actor: &Identity,
        application: &Application,
        plan: InterviewPlan,
    ) -> Result<Interview, DeskError> {
        self.require(actor, Action::ScheduleInterview)?;
        let decision = can_schedule_at(actor, application, plan.scheduled_time, Utc::now());
        self.check(actor, Action::ScheduleInterview, decision)?;

        let request = ScheduleInterviewRequest {
            interviewer_id: plan.interviewer_id,
            candidate_id: application.id.clone(),
            job_id: application.job_id.clone(),
            interview_type: plan.interview_type,
            scheduled_time: plan.scheduled_time,
            details: plan.details.filter(|details| !details.trim().is_empty()),
        };
        let interview = self.api.schedule_interview(&request).await?;
        info!(
            interview = %interview.id,
            application = %application.id,
            interview_type = %interview.interview_type,
            "interview scheduled"
        );
        Ok(interview)
    }

    /// Record an interviewer's result after checking assignment, form content, the required
    /// scores and the stage move it implies.
    ///
    /// The application's interviews are loaded from the backend here so the final-round
    /// decision sees every interviewer's rounds, not only the caller's.
    pub async fn submit_interview_result(
        &self,
        actor: &Identity,
        application: &Application,
        interview_id: &InterviewId,
        submission: &ResultSubmission,
    ) -> Result<RecordedOutcome, DeskError> {
        self.require(actor, Action::SubmitInterviewResult)?;
        check_result_form(submission.result, &submission.feedback)?;

        let interviews = self
            .api
            .interviews_for_candidate(&application.user_id)
            .await?;
        let timeline = ApplicationTimeline::new(application.clone(), interviews);
        let interview = timeline
            .interview(interview_id)
            .ok_or_else(|| TransitionError::UnknownInterview(interview_id.clone()))?;

        self.check(
            actor,
            Action::SubmitInterviewResult,
            can_submit_result(actor, interview),
        )?;
        let scores = build_score_payload(interview.interview_type, &submission.scores)?;
        let projected_stage =
            timeline.project_outcome(interview_id, submission.result, self.trigger)?;
        let outstanding = timeline
            .pending()
            .filter(|other| &other.id != interview_id)
            .count();

        let payload = InterviewResultPayload {
            result: submission.result,
            feedback: submission.feedback.trim().to_string(),
            scores,
        };
        let interview = self
            .api
            .record_interview_result(interview_id, &payload)
            .await?;
        info!(
            interview = %interview.id,
            result = interview.result.label(),
            projected = %projected_stage,
            outstanding,
            "interview result recorded"
        );

        Ok(RecordedOutcome {
            interview,
            projected_stage,
        })
    }

    /// Interviews assigned to the signed-in interviewer, earliest first.
    pub async fn interviewer_queue(&self, actor: &Identity) -> Result<Vec<Interview>, DeskError> {
        self.require(actor, Action::SubmitInterviewResult)?;
        let mut interviews = self.api.interviews_for_interviewer(actor.id()).await?;
        interviews.retain(|interview| interview.is_assigned_to(actor.id()));
        interviews.sort_by_key(|interview| interview.scheduled_time);
        Ok(interviews)
    }

    fn require(&self, actor: &Identity, action: Action) -> Result<(), DeskError> {
        if is_allowed(actor.role(), action) {
            return Ok(());
        }
        warn!(user = %actor.id(), role = %actor.role(), %action, "action forbidden for role");
        Err(DeskError::Forbidden {
            role: actor.role(),
            action,
        })
    }

    fn check(
        &self,
        actor: &Identity,
        action: Action,
        decision: ActionDecision,
    ) -> Result<(), DeskError> {
        decision.into_result().map_err(|reason| {
            info!(user = %actor.id(), %action, reason = %reason.summary(), "action denied");
            DeskError::Precondition(reason)
        })
    }
}
