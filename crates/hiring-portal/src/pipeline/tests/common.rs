use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::api::{
    ApiError, ApplyRequest, HiringApi, InterviewResultPayload, ScheduleInterviewRequest,
};
use crate::pipeline::{
    Application, ApplicationId, HiringDesk, Interview, InterviewId, InterviewResult,
    InterviewType, Job, JobDraft, JobId, JobStatus, Stage, StageTrigger,
};
use crate::session::{Identity, Role, UserId};

pub(super) fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2031, 3, 10, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub(super) fn tomorrow() -> DateTime<Utc> {
    Utc::now() + Duration::days(1)
}

pub(super) fn candidate() -> Identity {
    Identity::new(
        "cand-1",
        "Priya Natarajan",
        Some("priya@example.com".into()),
        Role::Candidate,
    )
}

pub(super) fn recruiter() -> Identity {
    Identity::new("rec-1", "Marcus Hale", Some("marcus@example.com".into()), Role::Recruiter)
}

pub(super) fn interviewer(id: &str) -> Identity {
    Identity::new(id, "Iris Okafor", None, Role::Interviewer)
}

pub(super) fn admin() -> Identity {
    Identity::new("adm-1", "Ops Admin", None, Role::Admin)
}

pub(super) fn job(id: &str, status: JobStatus) -> Job {
    Job {
        id: JobId::from(id),
        title: "Backend Engineer".to_string(),
        department: "Engineering".to_string(),
        location: "Pune".to_string(),
        description: "Own the hiring API".to_string(),
        requirements: Some("Rust, SQL".to_string()),
        status,
    }
}

pub(super) fn draft() -> JobDraft {
    JobDraft {
        title: "Data Engineer".to_string(),
        department: "Analytics".to_string(),
        location: "Remote".to_string(),
        description: "Pipelines and warehouses".to_string(),
        requirements: None,
        status: JobStatus::Open,
    }
}

pub(super) fn application(id: &str, job_id: &str, user: &str, stage: Stage) -> Application {
    Application::from_record(
        ApplicationId::from(id),
        JobId::from(job_id),
        UserId::from(user),
        at(8),
        stage,
    )
}

pub(super) fn interview(
    id: &str,
    application_id: &str,
    interviewer_id: &str,
    interview_type: InterviewType,
    hour: u32,
    result: InterviewResult,
) -> Interview {
    Interview {
        id: InterviewId::from(id),
        application_id: ApplicationId::from(application_id),
        interviewer_id: UserId::from(interviewer_id),
        interview_type,
        scheduled_time: at(hour),
        details: None,
        result,
        scores: Vec::new(),
        feedback: None,
    }
}

pub(super) fn build_desk(
    trigger: StageTrigger,
) -> (HiringDesk<MemoryHiringApi>, Arc<MemoryHiringApi>) {
    let api = Arc::new(MemoryHiringApi::default());
    (HiringDesk::new(api.clone(), trigger), api)
}

#[derive(Debug, Default)]
pub(super) struct BackendState {
    pub(super) jobs: Vec<Job>,
    pub(super) applications: Vec<Application>,
    pub(super) interviews: Vec<Interview>,
    pub(super) calls: Vec<String>,
    pub(super) fail_with: Option<ApiError>,
}

/// Backend double that records every call and answers from memory.
#[derive(Debug, Default)]
pub(super) struct MemoryHiringApi {
    pub(super) state: Mutex<BackendState>,
}

impl MemoryHiringApi {
    pub(super) fn seed_job(&self, job: Job) {
        self.state.lock().expect("backend mutex poisoned").jobs.push(job);
    }

    pub(super) fn seed_application(&self, application: Application) {
        self.state
            .lock()
            .expect("backend mutex poisoned")
            .applications
            .push(application);
    }

    pub(super) fn seed_interview(&self, interview: Interview) {
        self.state
            .lock()
            .expect("backend mutex poisoned")
            .interviews
            .push(interview);
    }

    pub(super) fn fail_with(&self, error: ApiError) {
        self.state.lock().expect("backend mutex poisoned").fail_with = Some(error);
    }

    pub(super) fn calls(&self) -> Vec<String> {
        self.state.lock().expect("backend mutex poisoned").calls.clone()
    }

    fn enter(&self, call: &str) -> Result<std::sync::MutexGuard<'_, BackendState>, ApiError> {
        let mut state = self.state.lock().expect("backend mutex poisoned");
        state.calls.push(call.to_string());
        match state.fail_with.clone() {
            Some(error) => Err(error),
            None => Ok(state),
        }
    }
}

#[async_trait]
impl HiringApi for MemoryHiringApi {
    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        Ok(self.enter("list_jobs")?.jobs.clone())
    }

    async fn get_job(&self, id: &JobId) -> Result<Job, ApiError> {
        self.enter("get_job")?
            .jobs
            .iter()
            .find(|job| &job.id == id)
            .cloned()
            .ok_or(ApiError::Rejected {
                status: 404,
                message: "job not found".to_string(),
            })
    }

    async fn create_job(&self, draft: &JobDraft) -> Result<Job, ApiError> {
        let mut state = self.enter("create_job")?;
        let job = Job {
            id: JobId(format!("job-{}", state.jobs.len() + 1)),
            title: draft.title.clone(),
            department: draft.department.clone(),
            location: draft.location.clone(),
            description: draft.description.clone(),
            requirements: draft.requirements.clone(),
            status: draft.status,
        };
        state.jobs.push(job.clone());
        Ok(job)
    }

    async fn update_job(&self, id: &JobId, draft: &JobDraft) -> Result<Job, ApiError> {
        let mut state = self.enter("update_job")?;
        let job = state
            .jobs
            .iter_mut()
            .find(|job| &job.id == id)
            .ok_or(ApiError::Rejected {
                status: 404,
                message: "job not found".to_string(),
            })?;
        job.title = draft.title.clone();
        job.status = draft.status;
        Ok(job.clone())
    }

    async fn apply(&self, request: &ApplyRequest) -> Result<Application, ApiError> {
        let mut state = self.enter("apply")?;
        let application = Application::submitted(
            ApplicationId(format!("app-{}", state.applications.len() + 1)),
            request.job_id.clone(),
            request.user_id.clone(),
            at(9),
        );
        state.applications.push(application.clone());
        Ok(application)
    }

    async fn applications_for_user(&self, user: &UserId) -> Result<Vec<Application>, ApiError> {
        Ok(self
            .enter("applications_for_user")?
            .applications
            .iter()
            .filter(|application| &application.user_id == user)
            .cloned()
            .collect())
    }

    async fn applications_for_job(&self, job: &JobId) -> Result<Vec<Application>, ApiError> {
        Ok(self
            .enter("applications_for_job")?
            .applications
            .iter()
            .filter(|application| &application.job_id == job)
            .cloned()
            .collect())
    }

    async fn schedule_interview(
        &self,
        request: &ScheduleInterviewRequest,
    ) -> Result<Interview, ApiError> {
        let mut state = self.enter("schedule_interview")?;
        let interview = Interview {
            id: InterviewId(format!("iv-{}", state.interviews.len() + 1)),
            application_id: request.candidate_id.clone(),
            interviewer_id: request.interviewer_id.clone(),
            interview_type: request.interview_type,
            scheduled_time: request.scheduled_time,
            details: request.details.clone(),
            result: InterviewResult::Pending,
            scores: Vec::new(),
            feedback: None,
        };
        state.interviews.push(interview.clone());
        Ok(interview)
    }

    async fn record_interview_result(
        &self,
        id: &InterviewId,
        payload: &InterviewResultPayload,
    ) -> Result<Interview, ApiError> {
        let mut state = self.enter("record_interview_result")?;
        let interview = state
            .interviews
            .iter_mut()
            .find(|interview| &interview.id == id)
            .ok_or(ApiError::Rejected {
                status: 404,
                message: "interview not found".to_string(),
            })?;
        interview.result = payload.result;
        interview.feedback = Some(payload.feedback.clone());
        interview.scores = payload.scores.clone();
        Ok(interview.clone())
    }

    async fn interviews_for_candidate(&self, user: &UserId) -> Result<Vec<Interview>, ApiError> {
        let state = self.enter("interviews_for_candidate")?;
        let owned: Vec<&ApplicationId> = state
            .applications
            .iter()
            .filter(|application| &application.user_id == user)
            .map(|application| &application.id)
            .collect();
        Ok(state
            .interviews
            .iter()
            .filter(|interview| owned.contains(&&interview.application_id))
            .cloned()
            .collect())
    }

    async fn interviews_for_interviewer(
        &self,
        user: &UserId,
    ) -> Result<Vec<Interview>, ApiError> {
        Ok(self
            .enter("interviews_for_interviewer")?
            .interviews
            .iter()
            .filter(|interview| &interview.interviewer_id == user)
            .cloned()
            .collect())
    }
}
