use std::sync::Arc;

use tracing::debug;

use crate::access::{GuardDecision, RoleMismatchPolicy, Route, RouteGuard};
use crate::api::{AuthApi, HiringApi};
use crate::config::AppConfig;
use crate::pipeline::{DeskError, HiringDesk, StageTrigger};
use crate::session::{
    CredentialStorage, Identity, Navigator, RegistrationRedirect, RestoreOutcome, SessionStore,
};

/// Policy switches for the three behaviours the backend leaves open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortalSettings {
    pub role_mismatch: RoleMismatchPolicy,
    pub register_redirect: RegistrationRedirect,
    pub stage_trigger: StageTrigger,
}

impl From<&AppConfig> for PortalSettings {
    fn from(config: &AppConfig) -> Self {
        Self {
            role_mismatch: config.session.role_mismatch,
            register_redirect: config.session.register_redirect,
            stage_trigger: config.pipeline.stage_trigger,
        }
    }
}

/// Owning scope for one running client: the session, the route guard and the hiring desk.
pub struct Portal<A> {
    session: SessionStore<A>,
    guard: RouteGuard,
    desk: HiringDesk<A>,
    navigator: Arc<dyn Navigator>,
}

impl<A> Portal<A>
where
    A: AuthApi + HiringApi + 'static,
{
    /// Restore the persisted session, then assemble the guard and desk around it.
    pub fn start(
        api: Arc<A>,
        storage: Arc<dyn CredentialStorage>,
        navigator: Arc<dyn Navigator>,
        settings: PortalSettings,
    ) -> (Self, RestoreOutcome) {
        let (session, restored) = SessionStore::start(
            api.clone(),
            storage,
            navigator.clone(),
            settings.register_redirect,
        );
        let portal = Self {
            session,
            guard: RouteGuard::new(settings.role_mismatch),
            desk: HiringDesk::new(api, settings.stage_trigger),
            navigator,
        };
        (portal, restored)
    }

    pub fn session(&self) -> &SessionStore<A> {
        &self.session
    }

    pub fn desk(&self) -> &HiringDesk<A> {
        &self.desk
    }

    pub fn identity(&self) -> Option<Identity> {
        self.session.identity()
    }

    /// Guard a navigation against the identity current right now and follow any redirect.
    pub fn navigate(&self, path: &str) -> (Route, GuardDecision) {
        let identity = self.session.identity();
        let (route, decision) = self.guard.navigate(identity.as_ref(), path);
        match &decision {
            GuardDecision::Render => debug!(route = %route, "render"),
            GuardDecision::Redirect(target) => {
                debug!(route = %route, target = %target, "guard redirect");
                self.navigator.redirect(target.clone());
            }
        }
        (route, decision)
    }

    /// Pass a desk result through, evicting the session if the backend rejected the credential.
    pub fn settle<T>(&self, result: Result<T, DeskError>) -> Result<T, DeskError> {
        if let Err(err) = &result {
            if err.is_unauthorized() {
                self.session.handle_unauthorized();
            }
        }
        result
    }

    pub fn teardown(self) -> Option<Identity> {
        self.session.teardown()
    }
}
