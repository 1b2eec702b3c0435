use tracing::debug;

use super::capability::default_route;
use super::routes::Route;
use crate::session::{Identity, Role};

/// Where a signed-in user goes when the route does not admit their role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RoleMismatchPolicy {
    /// Send the user to their own role's landing route.
    ToDefaultDashboard,
    /// Send the user back to login.
    #[default]
    ToLogin,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(Route),
}

impl GuardDecision {
    pub fn is_render(&self) -> bool {
        matches!(self, GuardDecision::Render)
    }
}

/// Render-or-redirect decision for a single navigation.
///
/// The guard holds no session state; callers pass the identity current at the moment of
/// navigation, so a login or logout between two navigations is always observed.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard {
    on_role_mismatch: RoleMismatchPolicy,
}

impl RouteGuard {
    pub fn new(on_role_mismatch: RoleMismatchPolicy) -> Self {
        Self { on_role_mismatch }
    }

    pub fn policy(&self) -> RoleMismatchPolicy {
        self.on_role_mismatch
    }

    pub fn authorize(
        &self,
        identity: Option<&Identity>,
        required_roles: Option<&[Role]>,
    ) -> GuardDecision {
        let Some(identity) = identity else {
            return GuardDecision::Redirect(Route::Login);
        };

        match required_roles {
            Some(roles) if !roles.contains(&identity.role()) => {
                debug!(
                    role = %identity.role(),
                    policy = ?self.on_role_mismatch,
                    "role not admitted by route"
                );
                GuardDecision::Redirect(match self.on_role_mismatch {
                    RoleMismatchPolicy::ToDefaultDashboard => default_route(identity.role()),
                    RoleMismatchPolicy::ToLogin => Route::Login,
                })
            }
            _ => GuardDecision::Render,
        }
    }

    /// Resolve `path` and decide. Public routes render for everyone.
    pub fn navigate(&self, identity: Option<&Identity>, path: &str) -> (Route, GuardDecision) {
        let route = Route::parse(path);
        let decision = match route.required_roles() {
            None => GuardDecision::Render,
            Some(roles) => self.authorize(identity, Some(roles)),
        };
        (route, decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> Identity {
        Identity::new("u-1", "Dana Reyes", None, role)
    }

    #[test]
    fn anonymous_is_sent_to_login_for_any_roles() {
        let guard = RouteGuard::default();
        assert_eq!(
            guard.authorize(None, None),
            GuardDecision::Redirect(Route::Login)
        );
        for role in Role::ALL {
            assert_eq!(
                guard.authorize(None, Some(&[role])),
                GuardDecision::Redirect(Route::Login)
            );
        }
    }

    #[test]
    fn mismatch_follows_policy() {
        let candidate = user(Role::Candidate);

        let to_login = RouteGuard::new(RoleMismatchPolicy::ToLogin);
        assert_eq!(
            to_login.authorize(Some(&candidate), Some(&[Role::Admin])),
            GuardDecision::Redirect(Route::Login)
        );

        let to_dashboard = RouteGuard::new(RoleMismatchPolicy::ToDefaultDashboard);
        assert_eq!(
            to_dashboard.authorize(Some(&candidate), Some(&[Role::Admin])),
            GuardDecision::Redirect(Route::CandidateDashboard)
        );
    }

    #[test]
    fn unknown_role_falls_back_to_login_even_with_dashboard_policy() {
        let guard = RouteGuard::new(RoleMismatchPolicy::ToDefaultDashboard);
        assert_eq!(
            guard.authorize(Some(&user(Role::Unknown)), Some(&[Role::Recruiter])),
            GuardDecision::Redirect(Route::Login)
        );
    }

    #[test]
    fn signed_in_user_renders_without_role_requirement() {
        let guard = RouteGuard::default();
        assert!(guard.authorize(Some(&user(Role::Interviewer)), None).is_render());
    }

    #[test]
    fn navigate_renders_public_routes_for_anonymous_users() {
        let guard = RouteGuard::default();
        let (route, decision) = guard.navigate(None, "/register/candidate");
        assert_eq!(route, Route::RegisterCandidate);
        assert!(decision.is_render());

        let (_, decision) = guard.navigate(None, "/recruiter/jobs/9");
        assert_eq!(decision, GuardDecision::Redirect(Route::Login));
    }
}
