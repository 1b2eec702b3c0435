mod client;
mod http;

pub use client::{
    ApiError, ApplyRequest, AuthApi, CredentialGrant, HiringApi, InterviewResultPayload,
    LoginRequest, ScheduleInterviewRequest,
};
pub use http::HttpApiClient;
