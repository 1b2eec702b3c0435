use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockWriteGuard};

use chrono::Utc;
use tracing::{debug, info, warn};

use super::credential::{decode_claims, InvalidCredential};
use super::identity::Identity;
use super::navigation::Navigator;
use super::registration::{RegistrationError, RegistrationProfile};
use super::storage::{CredentialStorage, StorageError};
use crate::access::{default_route, Route};
use crate::api::{ApiError, AuthApi, LoginRequest};

/// Where a freshly registered user is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RegistrationRedirect {
    #[default]
    Login,
    RoleDashboard,
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("credential rejected: {0}")]
    Credential(#[from] InvalidCredential),
    #[error("registration form invalid: {0}")]
    Registration(#[from] RegistrationError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Upstream(#[from] ApiError),
    #[error("a newer session change replaced this request")]
    Superseded,
}

/// Result of reading the persisted credential at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    Restored(Identity),
    Empty,
    Discarded(InvalidCredential),
    StorageUnavailable(String),
    AlreadyRestored,
}

/// Identity and credential are stored together so neither can exist without the other.
#[derive(Debug, Clone)]
struct ActiveSession {
    identity: Identity,
    credential: String,
}

/// Owner of the process-wide session.
///
/// All writes to the session go through the lifecycle methods here (`restore`, `login`,
/// `register`, `logout`, `handle_unauthorized`); everything else only reads
/// [`SessionStore::identity`]. Login and register responses are tagged with a generation and
/// dropped if a newer lifecycle call started while they were in flight.
pub struct SessionStore<A> {
    auth: Arc<A>,
    storage: Arc<dyn CredentialStorage>,
    navigator: Arc<dyn Navigator>,
    register_redirect: RegistrationRedirect,
    state: RwLock<Option<ActiveSession>>,
    restored: AtomicBool,
    generation: AtomicU64,
}

impl<A> SessionStore<A>
where
    A: AuthApi + 'static,
{
    /// Build the store and restore any persisted credential before handing it out.
    pub fn start(
        auth: Arc<A>,
        storage: Arc<dyn CredentialStorage>,
        navigator: Arc<dyn Navigator>,
        register_redirect: RegistrationRedirect,
    ) -> (Self, RestoreOutcome) {
        let store = Self {
            auth,
            storage,
            navigator,
            register_redirect,
            state: RwLock::new(None),
            restored: AtomicBool::new(false),
            generation: AtomicU64::new(0),
        };
        let outcome = store.restore();
        (store, outcome)
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|active| active.identity.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Load the persisted credential once. Invalid or expired credentials are removed from
    /// storage; nothing here fails past this call.
    pub fn restore(&self) -> RestoreOutcome {
        if self.restored.swap(true, Ordering::SeqCst) {
            debug!("session already restored; ignoring");
            return RestoreOutcome::AlreadyRestored;
        }

        let raw = match self.storage.load() {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                debug!("no persisted credential");
                return RestoreOutcome::Empty;
            }
            Err(err) => {
                warn!(error = %err, "credential storage unreadable; starting signed out");
                return RestoreOutcome::StorageUnavailable(err.to_string());
            }
        };

        let decoded =
            decode_claims(&raw).and_then(|claims| claims.into_fresh_identity(Utc::now()));
        match decoded {
            Ok(identity) => {
                info!(
                    user = %identity.id(),
                    role = %identity.role(),
                    "session restored from stored credential"
                );
                *self.write() = Some(ActiveSession {
                    identity: identity.clone(),
                    credential: raw,
                });
                RestoreOutcome::Restored(identity)
            }
            Err(cause) => {
                warn!(%cause, "discarding stored credential");
                if let Err(err) = self.storage.clear() {
                    warn!(error = %err, "failed to remove discarded credential");
                }
                RestoreOutcome::Discarded(cause)
            }
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, SessionError> {
        let generation = self.begin();
        let request = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        let grant = self.auth.login(&request).await.map_err(|err| {
            warn!(error = %err, "login failed");
            SessionError::Upstream(err)
        })?;
        let identity = self.establish(generation, grant.token)?;

        info!(user = %identity.id(), role = %identity.role(), "signed in");
        self.navigator.redirect(default_route(identity.role()));
        Ok(identity)
    }

    pub async fn register(
        &self,
        profile: &RegistrationProfile,
    ) -> Result<Identity, SessionError> {
        profile.validate()?;
        let generation = self.begin();

        let grant = self.auth.register(profile).await.map_err(|err| {
            warn!(error = %err, "registration failed");
            SessionError::Upstream(err)
        })?;
        let identity = self.establish(generation, grant.token)?;

        info!(user = %identity.id(), role = %identity.role(), "account registered");
        self.navigator.redirect(match self.register_redirect {
            RegistrationRedirect::Login => Route::Login,
            RegistrationRedirect::RoleDashboard => default_route(identity.role()),
        });
        Ok(identity)
    }

    /// Clear the session and go to login. Safe to call repeatedly; the server-side logout is
    /// best effort and never reported back.
    pub async fn logout(&self) {
        self.begin();
        let previous = self.write().take();
        if let Err(err) = self.storage.clear() {
            warn!(error = %err, "failed to clear stored credential on logout");
        }
        self.navigator.redirect(Route::Login);

        match previous {
            Some(active) => {
                info!(user = %active.identity.id(), "signed out");
                if let Err(err) = self.auth.logout(&active.credential).await {
                    warn!(error = %err, "backend logout failed; local session already cleared");
                }
            }
            None => debug!("logout with no active session"),
        }
    }

    /// The backend rejected our credential: drop it and send the user to login.
    pub fn handle_unauthorized(&self) {
        self.begin();
        let previous = self.write().take();
        if let Err(err) = self.storage.clear() {
            warn!(error = %err, "failed to clear rejected credential");
        }
        if let Some(active) = previous {
            warn!(user = %active.identity.id(), "credential rejected by backend; session evicted");
        }
        self.navigator.redirect(Route::Login);
    }

    /// Release the in-memory session. The persisted credential is left for the next start.
    pub fn teardown(self) -> Option<Identity> {
        let active = self
            .state
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner);
        debug!(signed_in = active.is_some(), "session store torn down");
        active.map(|active| active.identity)
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn write(&self) -> RwLockWriteGuard<'_, Option<ActiveSession>> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn establish(&self, generation: u64, credential: String) -> Result<Identity, SessionError> {
        let identity = decode_claims(&credential)?.into_fresh_identity(Utc::now())?;

        let mut state = self.write();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(generation, "discarding stale session response");
            return Err(SessionError::Superseded);
        }
        self.storage.save(&credential)?;
        *state = Some(ActiveSession {
            identity: identity.clone(),
            credential,
        });
        Ok(identity)
    }
}
