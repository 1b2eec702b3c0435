//! Role capability matrix: the one place that says which role may do what.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::routes::Route;
use crate::session::Role;

/// User-facing actions gated by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    BrowseJobs,
    PostJob,
    EditJob,
    ApplyToJob,
    ScheduleInterview,
    SubmitInterviewResult,
    DownloadResume,
}

impl Action {
    pub const ALL: [Action; 7] = [
        Action::BrowseJobs,
        Action::PostJob,
        Action::EditJob,
        Action::ApplyToJob,
        Action::ScheduleInterview,
        Action::SubmitInterviewResult,
        Action::DownloadResume,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Action::BrowseJobs => "browse jobs",
            Action::PostJob => "post jobs",
            Action::EditJob => "edit jobs",
            Action::ApplyToJob => "apply to jobs",
            Action::ScheduleInterview => "schedule interviews",
            Action::SubmitInterviewResult => "submit interview results",
            Action::DownloadResume => "download resumes",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How far a granted action reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Any,
    /// Only records where the caller is the assigned interviewer.
    AssignedToSelf,
    /// At most one application per (job, candidate) pair.
    OncePerJob,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Permission {
    Allowed(Scope),
    Denied,
}

impl Permission {
    pub const fn is_allowed(self) -> bool {
        matches!(self, Permission::Allowed(_))
    }

    pub const fn scope(self) -> Option<Scope> {
        match self {
            Permission::Allowed(scope) => Some(scope),
            Permission::Denied => None,
        }
    }
}

pub fn permission(role: Role, action: Action) -> Permission {
    use Action::*;
    use Role::*;

    match (role, action) {
        (Admin | Recruiter | Candidate, BrowseJobs) => Permission::Allowed(Scope::Any),
        (Admin | Recruiter, PostJob | EditJob) => Permission::Allowed(Scope::Any),
        (Recruiter, ScheduleInterview) => Permission::Allowed(Scope::Any),
        (Recruiter | Interviewer, DownloadResume) => Permission::Allowed(Scope::Any),
        (Interviewer, SubmitInterviewResult) => Permission::Allowed(Scope::AssignedToSelf),
        (Candidate, ApplyToJob) => Permission::Allowed(Scope::OncePerJob),
        _ => Permission::Denied,
    }
}

pub fn is_allowed(role: Role, action: Action) -> bool {
    permission(role, action).is_allowed()
}

/// Landing route after login. Unrecognised roles go back to login.
pub fn default_route(role: Role) -> Route {
    match role {
        Role::Admin => Route::AdminOverview,
        Role::Recruiter => Route::RecruiterDashboard,
        Role::Interviewer => Route::InterviewerDashboard,
        Role::Candidate => Route::CandidateDashboard,
        Role::Unknown => Route::Login,
    }
}

/// Every action granted to `role`, with its scope.
pub fn capabilities(role: Role) -> Vec<(Action, Scope)> {
    Action::ALL
        .into_iter()
        .filter_map(|action| permission(role, action).scope().map(|scope| (action, scope)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matrix_matches_role_table() {
        let expectations = [
            (Role::Admin, [true, false, false, false]),
            (Role::Recruiter, [true, false, true, false]),
            (Role::Interviewer, [false, false, false, true]),
            (Role::Candidate, [false, true, false, false]),
        ];

        for (role, [jobs, apply, schedule, submit]) in expectations {
            assert_eq!(is_allowed(role, Action::PostJob), jobs, "{role} post");
            assert_eq!(is_allowed(role, Action::EditJob), jobs, "{role} edit");
            assert_eq!(is_allowed(role, Action::ApplyToJob), apply, "{role} apply");
            assert_eq!(
                is_allowed(role, Action::ScheduleInterview),
                schedule,
                "{role} schedule"
            );
            assert_eq!(
                is_allowed(role, Action::SubmitInterviewResult),
                submit,
                "{role} submit"
            );
        }
    }

    #[test]
    fn unknown_role_is_denied_everything() {
        assert!(capabilities(Role::Unknown).is_empty());
        assert_eq!(default_route(Role::Unknown), Route::Login);
    }

    #[test]
    fn scoped_grants_carry_their_limits() {
        assert_eq!(
            permission(Role::Interviewer, Action::SubmitInterviewResult),
            Permission::Allowed(Scope::AssignedToSelf)
        );
        assert_eq!(
            permission(Role::Candidate, Action::ApplyToJob),
            Permission::Allowed(Scope::OncePerJob)
        );
    }

    #[test]
    fn default_routes_follow_role() {
        assert_eq!(default_route(Role::Admin).path(), "/admin");
        assert_eq!(default_route(Role::Recruiter).path(), "/recruiter/dashboard");
        assert_eq!(
            default_route(Role::Interviewer).path(),
            "/interviewer/dashboard"
        );
        assert_eq!(default_route(Role::Candidate).path(), "/candidate/dashboard");
    }
}
