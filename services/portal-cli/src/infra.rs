use async_trait::async_trait;
use chrono::{Duration, Utc};
use hiring_portal::access::Route;
use hiring_portal::api::{
    ApiError, ApplyRequest, AuthApi, CredentialGrant, HiringApi, InterviewResultPayload,
    LoginRequest, ScheduleInterviewRequest,
};
use hiring_portal::pipeline::{
    is_final_round, Application, ApplicationId, Interview, InterviewId, InterviewResult, Job,
    JobDraft, JobId, StageEvent, StageTrigger,
};
use hiring_portal::session::{encode_unsigned, Navigator, RegistrationProfile, Role, UserId};
use serde_json::json;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::info;

/// Prints every redirect with the name of the tab that raised it.
pub(crate) struct ConsoleNavigator {
    label: String,
}

impl ConsoleNavigator {
    pub(crate) fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

impl Navigator for ConsoleNavigator {
    fn redirect(&self, route: Route) {
        info!(tab = %self.label, route = %route, "redirect");
        println!("  [{}] -> {}", self.label, route);
    }
}

#[derive(Debug, Clone)]
struct Account {
    id: UserId,
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    role: Role,
}

#[derive(Debug, Default)]
struct BackendState {
    accounts: Vec<Account>,
    jobs: Vec<Job>,
    applications: Vec<Application>,
    interviews: Vec<Interview>,
}

/// Stand-in for the REST backend: issues unsigned credentials and moves applications through
/// the stage machine when results are recorded.
pub(crate) struct InMemoryBackend {
    state: Mutex<BackendState>,
    trigger: StageTrigger,
}

impl InMemoryBackend {
    pub(crate) fn new(trigger: StageTrigger) -> Self {
        Self {
            state: Mutex::new(BackendState::default()),
            trigger,
        }
    }

    pub(crate) fn with_staff(self) -> Self {
        {
            let mut state = self.lock();
            for (id, first, last, email, role) in [
                ("u-100", "Ada", "Admin", "admin@portal.dev", Role::Admin),
                ("u-200", "Ravi", "Menon", "ravi@portal.dev", Role::Recruiter),
                ("u-300", "Iris", "Okafor", "iris@portal.dev", Role::Interviewer),
                ("u-301", "Tomas", "Berg", "tomas@portal.dev", Role::Interviewer),
            ] {
                state.accounts.push(Account {
                    id: UserId::from(id),
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    email: email.to_string(),
                    password: "Portal2024".to_string(),
                    role,
                });
            }
        }
        self
    }

    fn lock(&self) -> MutexGuard<'_, BackendState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn issue(account: &Account) -> CredentialGrant {
        let expires = Utc::now() + Duration::hours(8);
        CredentialGrant {
            token: encode_unsigned(&json!({
                "userId": account.id.as_str(),
                "firstName": account.first_name,
                "lastName": account.last_name,
                "email": account.email,
                "role": account.role.label(),
                "exp": expires.timestamp(),
            })),
        }
    }
}

fn rejected(status: u16, message: impl Into<String>) -> ApiError {
    ApiError::Rejected {
        status,
        message: message.into(),
    }
}

#[async_trait]
impl AuthApi for InMemoryBackend {
    async fn login(&self, request: &LoginRequest) -> Result<CredentialGrant, ApiError> {
        let state = self.lock();
        state
            .accounts
            .iter()
            .find(|account| {
                account.email.eq_ignore_ascii_case(&request.email)
                    && account.password == request.password
            })
            .map(Self::issue)
            .ok_or_else(|| rejected(400, "Invalid email or password"))
    }

    async fn register(&self, profile: &RegistrationProfile) -> Result<CredentialGrant, ApiError> {
        let mut state = self.lock();
        if state
            .accounts
            .iter()
            .any(|account| account.email.eq_ignore_ascii_case(&profile.email))
        {
            return Err(rejected(409, "Email is already registered"));
        }
        let account = Account {
            id: UserId(format!("u-{}", 500 + state.accounts.len())),
            first_name: profile.first_name.trim().to_string(),
            last_name: profile.last_name.trim().to_string(),
            email: profile.email.trim().to_string(),
            password: profile.password.clone(),
            role: profile.role,
        };
        let grant = Self::issue(&account);
        state.accounts.push(account);
        Ok(grant)
    }

    async fn logout(&self, _credential: &str) -> Result<(), ApiError> {
        Ok(())
    }
}

#[async_trait]
impl HiringApi for InMemoryBackend {
    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        Ok(self.lock().jobs.clone())
    }

    async fn get_job(&self, id: &JobId) -> Result<Job, ApiError> {
        self.lock()
            .jobs
            .iter()
            .find(|job| &job.id == id)
            .cloned()
            .ok_or_else(|| rejected(404, format!("job {id} not found")))
    }

    async fn create_job(&self, draft: &JobDraft) -> Result<Job, ApiError> {
        let mut state = self.lock();
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
        let mut state = self.lock();
        let job = state
            .jobs
            .iter_mut()
            .find(|job| &job.id == id)
            .ok_or_else(|| rejected(404, format!("job {id} not found")))?;
        job.title = draft.title.clone();
        job.department = draft.department.clone();
        job.location = draft.location.clone();
        job.description = draft.description.clone();
        job.requirements = draft.requirements.clone();
        job.status = draft.status;
        Ok(job.clone())
    }

    async fn apply(&self, request: &ApplyRequest) -> Result<Application, ApiError> {
        let mut state = self.lock();
        if state
            .applications
            .iter()
            .any(|application| application.links(&request.job_id, &request.user_id))
        {
            return Err(rejected(409, "Already applied for this job"));
        }
        let application = Application::submitted(
            ApplicationId(format!("app-{}", state.applications.len() + 1)),
            request.job_id.clone(),
            request.user_id.clone(),
            Utc::now(),
        );
        state.applications.push(application.clone());
        Ok(application)
    }

    async fn applications_for_user(&self, user: &UserId) -> Result<Vec<Application>, ApiError> {
        Ok(self
            .lock()
            .applications
            .iter()
            .filter(|application| &application.user_id == user)
            .cloned()
            .collect())
    }

    async fn applications_for_job(&self, job: &JobId) -> Result<Vec<Application>, ApiError> {
        Ok(self
            .lock()
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
        let mut state = self.lock();
        if !state
            .applications
            .iter()
            .any(|application| application.id == request.candidate_id)
        {
            return Err(rejected(404, "application not found"));
        }
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
        let mut state = self.lock();
        let position = state
            .interviews
            .iter()
            .position(|interview| &interview.id == id)
            .ok_or_else(|| rejected(404, format!("interview {id} not found")))?;
        if !state.interviews[position].result.is_pending() {
            return Err(rejected(409, "result already recorded"));
        }

        let final_round = is_final_round(&state.interviews[position], &state.interviews);
        let event = StageEvent::InterviewOutcome {
            interview_type: state.interviews[position].interview_type,
            result: payload.result,
            final_round,
        };
        let application_id = state.interviews[position].application_id.clone();
        // The stage moves first: a refused transition must leave the interview pending.
        if let Some(application) = state
            .applications
            .iter_mut()
            .find(|application| application.id == application_id)
        {
            application
                .advance(&event, self.trigger)
                .map_err(|err| rejected(409, err.to_string()))?;
        }

        let interview = &mut state.interviews[position];
        interview.result = payload.result;
        interview.feedback = Some(payload.feedback.clone());
        interview.scores = payload.scores.clone();
        let recorded = interview.clone();
        Ok(recorded)
    }

    async fn interviews_for_candidate(&self, user: &UserId) -> Result<Vec<Interview>, ApiError> {
        let state = self.lock();
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
            .lock()
            .interviews
            .iter()
            .filter(|interview| &interview.interviewer_id == user)
            .cloned()
            .collect())
    }
}
