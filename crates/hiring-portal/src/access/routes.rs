use std::fmt;

use crate::pipeline::JobId;
use crate::session::{Role, UserId};

/// Every screen the portal can navigate to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    About,
    Login,
    Register,
    RegisterCandidate,
    Dashboard,
    Jobs,
    JobDetail(JobId),
    Candidates,
    CandidateDetail(UserId),
    AdminOverview,
    RecruiterDashboard,
    RecruiterJob(JobId),
    CandidateDashboard,
    InterviewerDashboard,
    NotFound(String),
}

/// Who may open a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Public,
    Restricted(&'static [Role]),
}

const CANDIDATE_OR_RECRUITER: &[Role] = &[Role::Candidate, Role::Recruiter];
const ADMIN_ONLY: &[Role] = &[Role::Admin];
const RECRUITER_ONLY: &[Role] = &[Role::Recruiter];
const CANDIDATE_ONLY: &[Role] = &[Role::Candidate];
const INTERVIEWER_ONLY: &[Role] = &[Role::Interviewer];

impl Route {
    /// Resolve a browser path. Query strings and fragments are ignored; unknown paths map to
    /// [`Route::NotFound`].
    pub fn parse(path: &str) -> Route {
        let bare = path
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let segments: Vec<&str> = bare.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Route::Home,
            ["about"] => Route::About,
            ["login"] => Route::Login,
            ["register"] => Route::Register,
            ["register", "candidate"] => Route::RegisterCandidate,
            ["dashboard"] => Route::Dashboard,
            ["jobs"] => Route::Jobs,
            ["jobs", id] => Route::JobDetail(JobId::from(*id)),
            ["candidates"] => Route::Candidates,
            ["candidates", id] => Route::CandidateDetail(UserId::from(*id)),
            ["admin"] => Route::AdminOverview,
            ["recruiter", "dashboard"] => Route::RecruiterDashboard,
            ["recruiter", "jobs", id] => Route::RecruiterJob(JobId::from(*id)),
            ["candidate", "dashboard"] => Route::CandidateDashboard,
            ["interviewer", "dashboard"] => Route::InterviewerDashboard,
            _ => Route::NotFound(bare.to_string()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::About => "/about".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::RegisterCandidate => "/register/candidate".to_string(),
            Route::Dashboard => "/dashboard".to_string(),
            Route::Jobs => "/jobs".to_string(),
            Route::JobDetail(id) => format!("/jobs/{id}"),
            Route::Candidates => "/candidates".to_string(),
            Route::CandidateDetail(id) => format!("/candidates/{id}"),
            Route::AdminOverview => "/admin".to_string(),
            Route::RecruiterDashboard => "/recruiter/dashboard".to_string(),
            Route::RecruiterJob(id) => format!("/recruiter/jobs/{id}"),
            Route::CandidateDashboard => "/candidate/dashboard".to_string(),
            Route::InterviewerDashboard => "/interviewer/dashboard".to_string(),
            Route::NotFound(path) => path.clone(),
        }
    }

    pub fn access(&self) -> Access {
        match self {
            Route::Dashboard
            | Route::Jobs
            | Route::JobDetail(_)
            | Route::Candidates
            | Route::CandidateDetail(_) => Access::Restricted(CANDIDATE_OR_RECRUITER),
            Route::AdminOverview => Access::Restricted(ADMIN_ONLY),
            Route::RecruiterDashboard | Route::RecruiterJob(_) => {
                Access::Restricted(RECRUITER_ONLY)
            }
            Route::CandidateDashboard => Access::Restricted(CANDIDATE_ONLY),
            Route::InterviewerDashboard => Access::Restricted(INTERVIEWER_ONLY),
            Route::Home
            | Route::About
            | Route::Login
            | Route::Register
            | Route::RegisterCandidate
            | Route::NotFound(_) => Access::Public,
        }
    }

    pub fn required_roles(&self) -> Option<&'static [Role]> {
        match self.access() {
            Access::Public => None,
            Access::Restricted(roles) => Some(roles),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
