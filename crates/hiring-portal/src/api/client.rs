//! Collaborator contracts for the remote backend.
//!
//! The core never talks HTTP directly; it is written against these traits so decisions stay
//! testable without a network. [`super::HttpApiClient`] is the production implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pipeline::{
    Application, ApplicationId, Interview, InterviewId, InterviewResult, InterviewType, Job,
    JobDraft, JobId, Score,
};
use crate::session::{RegistrationProfile, UserId};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The backend rejected the credential (HTTP 401).
    #[error("credential rejected by the backend")]
    Unauthorized,
    #[error("backend rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Credential returned by `auth/login` and `auth/register`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialGrant {
    #[serde(alias = "credential")]
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyRequest {
    pub job_id: JobId,
    pub user_id: UserId,
}

/// Wire body for `POST candidates/interviews`. `candidate_id` carries the application id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleInterviewRequest {
    pub interviewer_id: UserId,
    pub candidate_id: ApplicationId,
    pub job_id: JobId,
    pub interview_type: InterviewType,
    pub scheduled_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterviewResultPayload {
    pub result: InterviewResult,
    pub feedback: String,
    pub scores: Vec<Score>,
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: &LoginRequest) -> Result<CredentialGrant, ApiError>;

    async fn register(&self, profile: &RegistrationProfile)
        -> Result<CredentialGrant, ApiError>;

    async fn logout(&self, credential: &str) -> Result<(), ApiError>;
}

#[async_trait]
pub trait HiringApi: Send + Sync {
    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError>;

    async fn get_job(&self, id: &JobId) -> Result<Job, ApiError>;

    async fn create_job(&self, draft: &JobDraft) -> Result<Job, ApiError>;

    async fn update_job(&self, id: &JobId, draft: &JobDraft) -> Result<Job, ApiError>;

    async fn apply(&self, request: &ApplyRequest) -> Result<Application, ApiError>;

    async fn applications_for_user(&self, user: &UserId) -> Result<Vec<Application>, ApiError>;

    async fn applications_for_job(&self, job: &JobId) -> Result<Vec<Application>, ApiError>;

    async fn schedule_interview(
        &self,
        request: &ScheduleInterviewRequest,
    ) -> Result<Interview, ApiError>;

    async fn record_interview_result(
        &self,
        id: &InterviewId,
        payload: &InterviewResultPayload,
    ) -> Result<Interview, ApiError>;

    async fn interviews_for_candidate(&self, user: &UserId) -> Result<Vec<Interview>, ApiError>;

    async fn interviews_for_interviewer(
        &self,
        user: &UserId,
    ) -> Result<Vec<Interview>, ApiError>;
}
