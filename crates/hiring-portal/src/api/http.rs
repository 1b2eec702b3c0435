use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use super::client::{
    ApiError, ApplyRequest, AuthApi, CredentialGrant, HiringApi, InterviewResultPayload,
    LoginRequest, ScheduleInterviewRequest,
};
use crate::config::ApiConfig;
use crate::pipeline::{Application, Interview, InterviewId, Job, JobDraft, JobId};
use crate::session::{CredentialStorage, RegistrationProfile, UserId};

/// reqwest-backed client for the portal REST backend.
///
/// The bearer credential is read from storage on every request so a login or logout is
/// picked up without rebuilding the client.
#[derive(Clone)]
pub struct HttpApiClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialStorage>,
}

impl HttpApiClient {
    pub fn new(
        config: &ApiConfig,
        credentials: Arc<dyn CredentialStorage>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let builder = self.http.request(method, url);
        match self.credentials.load() {
            Ok(Some(token)) => builder.bearer_auth(token),
            Ok(None) => builder,
            Err(err) => {
                warn!(error = %err, "credential storage unreadable; sending request anonymously");
                builder
            }
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.to_string()))?;
        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "backend responded");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                message: rejection_message(status, &body),
            });
        }
        Ok(response)
    }

    async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(self.request(Method::GET, path)).await?;
        decode(response).await
    }

    async fn submit<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.request(method, path).json(body)).await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    response
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}

/// Prefer the backend's `message` field; fall back to the raw body, then the status text.
fn rejection_message(status: StatusCode, body: &str) -> String {
    if let Ok(serde_json::Value::Object(fields)) = serde_json::from_str(body) {
        if let Some(serde_json::Value::String(message)) = fields.get("message") {
            return message.clone();
        }
    }
    let body = body.trim();
    if body.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request rejected")
            .to_string()
    } else {
        body.to_string()
    }
}

#[async_trait]
impl AuthApi for HttpApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<CredentialGrant, ApiError> {
        self.submit(Method::POST, "auth/login", request).await
    }

    async fn register(
        &self,
        profile: &RegistrationProfile,
    ) -> Result<CredentialGrant, ApiError> {
        self.submit(Method::POST, "auth/register", profile).await
    }

    async fn logout(&self, credential: &str) -> Result<(), ApiError> {
        // Storage is already cleared by the time logout reaches the backend.
        let builder = self
            .http
            .post(format!("{}/auth/logout", self.base_url))
            .bearer_auth(credential);
        self.send(builder).await.map(|_| ())
    }
}

#[async_trait]
impl HiringApi for HttpApiClient {
    async fn list_jobs(&self) -> Result<Vec<Job>, ApiError> {
        self.fetch("jobs").await
    }

    async fn get_job(&self, id: &JobId) -> Result<Job, ApiError> {
        self.fetch(&format!("jobs/{id}")).await
    }

    async fn create_job(&self, draft: &JobDraft) -> Result<Job, ApiError> {
        self.submit(Method::POST, "jobs", draft).await
    }

    async fn update_job(&self, id: &JobId, draft: &JobDraft) -> Result<Job, ApiError> {
        self.submit(Method::PUT, &format!("jobs/{id}"), draft).await
    }

    async fn apply(&self, request: &ApplyRequest) -> Result<Application, ApiError> {
        self.submit(Method::POST, "job-candidates/apply", request)
            .await
    }

    async fn applications_for_user(&self, user: &UserId) -> Result<Vec<Application>, ApiError> {
        self.fetch(&format!("job-candidates/user/{user}")).await
    }

    async fn applications_for_job(&self, job: &JobId) -> Result<Vec<Application>, ApiError> {
        self.fetch(&format!("job-candidates/job/{job}")).await
    }

    async fn schedule_interview(
        &self,
        request: &ScheduleInterviewRequest,
    ) -> Result<Interview, ApiError> {
        self.submit(Method::POST, "candidates/interviews", request)
            .await
    }

    async fn record_interview_result(
        &self,
        id: &InterviewId,
        payload: &InterviewResultPayload,
    ) -> Result<Interview, ApiError> {
        self.submit(Method::PUT, &format!("interviews/{id}/status"), payload)
            .await
    }

    async fn interviews_for_candidate(&self, user: &UserId) -> Result<Vec<Interview>, ApiError> {
        self.fetch(&format!("interviews/candidate/{user}")).await
    }

    async fn interviews_for_interviewer(
        &self,
        user: &UserId,
    ) -> Result<Vec<Interview>, ApiError> {
        self.fetch(&format!("interviews/interviewer/{user}")).await
    }
}
