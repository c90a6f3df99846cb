//! Process-wide view of the current user and role.
//!
//! [`AuthStore`] resolves the role once at startup and again on every
//! [`AuthEvent`] from the backend, publishing an [`AuthSnapshot`] through a
//! `tokio::sync::watch` channel.
//!
//! Overlapping resolutions are ordered by a generation counter: each
//! resolution takes a generation when it starts and commits only if no newer
//! one was issued in the meantime, so the most recently issued resolution
//! always wins. [`AuthStore::set_guest_mode`] and a successful
//! [`AuthStore::sign_out`] also issue a generation, which discards any role
//! lookup still in flight.
//!
//! A store built with [`AuthStore::with_cache`] clears that
//! [`RequestCache`] whenever the signed-in identity changes, so reads
//! authorized for one user are never served to the next.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::auth::{
    AuthBackend, AuthError, AuthEvent, LoginResult, RegistrationResult, Role, Session, User,
};
use crate::cache::RequestCache;

/// Published auth state.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthSnapshot {
    pub user: Option<User>,
    pub session: Option<Session>,
    pub role: Role,
    /// True only until the initial session check settles.
    pub loading: bool,
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        Self {
            user: None,
            session: None,
            role: Role::Guest,
            loading: true,
        }
    }
}

struct StoreInner {
    backend: Arc<dyn AuthBackend>,
    cache: Option<RequestCache>,
    state: watch::Sender<AuthSnapshot>,
    generation: AtomicU64,
    initialized: AtomicBool,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl StoreInner {
    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    async fn get_user_role(&self, user_id: Uuid) -> Role {
        match self.backend.get_user_role(user_id).await {
            Ok(Some(role)) => role,
            Ok(None) => {
                debug!(%user_id, "no role row, falling back to guest");
                Role::Guest
            }
            Err(e) => {
                warn!(%user_id, error = %e, "role lookup failed, falling back to guest");
                Role::Guest
            }
        }
    }

    fn clear_cache(&self, reason: &str) {
        if let Some(cache) = &self.cache {
            debug!(reason, "identity changed, clearing request cache");
            cache.clear();
        }
    }

    /// Publish user and session for `generation`, keeping the current role
    /// until the lookup settles.
    fn apply_session(&self, generation: u64, session: &Option<Session>) -> bool {
        let mut identity_changed = false;
        let applied = self.state.send_if_modified(|snapshot| {
            if !self.is_current(generation) {
                return false;
            }
            let previous = snapshot.user.as_ref().map(|user| user.id);
            identity_changed = previous != session.as_ref().map(|s| s.user.id);
            snapshot.user = session.as_ref().map(|s| s.user.clone());
            snapshot.session = session.clone();
            if session.is_none() {
                snapshot.role = Role::Guest;
            }
            true
        });
        if identity_changed {
            self.clear_cache("session changed");
        }
        applied
    }

    fn apply_role(&self, generation: u64, role: Role) -> bool {
        self.state.send_if_modified(|snapshot| {
            if !self.is_current(generation) {
                return false;
            }
            snapshot.role = role;
            true
        })
    }

    async fn resolve(&self, generation: u64, session: Option<Session>) {
        if !self.apply_session(generation, &session) {
            debug!(generation, "session superseded before publish");
            return;
        }
        let Some(session) = session else {
            return;
        };

        let role = self.get_user_role(session.user.id).await;
        if !self.apply_role(generation, role) {
            debug!(generation, %role, "role resolution superseded");
        }
    }

    async fn current_session(&self) -> Option<Session> {
        match self.backend.get_session().await {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "session check failed, continuing as guest");
                None
            }
        }
    }

    async fn handle_event(&self, event: AuthEvent) {
        let generation = self.begin();
        debug!(event = event.name(), generation, "auth state changed");
        let session = event.session().cloned();
        self.resolve(generation, session).await;
    }

    async fn resync(&self) {
        let generation = self.begin();
        let session = self.current_session().await;
        self.resolve(generation, session).await;
    }

    fn reset_to_guest(&self) {
        self.state.send_modify(|snapshot| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            snapshot.user = None;
            snapshot.session = None;
            snapshot.role = Role::Guest;
        });
        self.clear_cache("reset to guest");
    }
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        let listener = self
            .listener
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = listener {
            handle.abort();
        }
    }
}

async fn listen(inner: Weak<StoreInner>, mut events: broadcast::Receiver<AuthEvent>) {
    loop {
        let event = match events.recv().await {
            Ok(event) => Some(event),
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped, "auth events lagged, resyncing session");
                None
            }
            Err(RecvError::Closed) => break,
        };
        let Some(inner) = inner.upgrade() else {
            break;
        };
        match event {
            Some(event) => inner.handle_event(event).await,
            None => inner.resync().await,
        }
    }
    debug!("auth event listener stopped");
}

/// Current user, session and role, resolved from an [`AuthBackend`].
///
/// Cheap to clone; clones share state. The event listener started by
/// [`initialize`](Self::initialize) stops when the last clone is dropped.
#[derive(Clone)]
pub struct AuthStore {
    inner: Arc<StoreInner>,
}

impl AuthStore {
    pub fn new(backend: Arc<dyn AuthBackend>) -> Self {
        Self::build(backend, None)
    }

    /// Like [`new`](Self::new), clearing `cache` on sign-in, sign-out and
    /// guest mode.
    pub fn with_cache(backend: Arc<dyn AuthBackend>, cache: RequestCache) -> Self {
        Self::build(backend, Some(cache))
    }

    fn build(backend: Arc<dyn AuthBackend>, cache: Option<RequestCache>) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::default());
        Self {
            inner: Arc::new(StoreInner {
                backend,
                cache,
                state,
                generation: AtomicU64::new(0),
                initialized: AtomicBool::new(false),
                listener: Mutex::new(None),
            }),
        }
    }

    /// Subscribe to backend events and run the initial session check.
    ///
    /// Only the first call does anything. `loading` is cleared once the
    /// check settles, whatever its outcome.
    pub async fn initialize(&self) {
        if self.inner.initialized.swap(true, Ordering::SeqCst) {
            return;
        }

        let events = self.inner.backend.subscribe();
        let handle = tokio::spawn(listen(Arc::downgrade(&self.inner), events));
        *self
            .inner
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(handle);

        self.inner.resync().await;
        self.inner.state.send_modify(|snapshot| snapshot.loading = false);

        let snapshot = self.snapshot();
        info!(
            role = %snapshot.role,
            signed_in = snapshot.user.is_some(),
            "auth state initialized"
        );
    }

    /// Re-resolve state from an auth event. The event listener calls this
    /// for every event the backend emits.
    pub async fn handle_event(&self, event: AuthEvent) {
        self.inner.handle_event(event).await;
    }

    /// Role for `user_id`. A missing row or a failed lookup yields
    /// [`Role::Guest`].
    pub async fn get_user_role(&self, user_id: Uuid) -> Role {
        self.inner.get_user_role(user_id).await
    }

    /// Register a new account. `role` defaults to [`Role::Client`].
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        role: Option<Role>,
    ) -> Result<RegistrationResult, AuthError> {
        let role = role.unwrap_or(Role::Client);
        self.inner.backend.sign_up(email, password, role).await
    }

    /// Log in. Local state follows through the backend's
    /// [`AuthEvent::SignedIn`]; on failure it is left untouched.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<LoginResult, AuthError> {
        self.inner.backend.sign_in(email, password).await
    }

    /// Log out. On success user and session are cleared, the role reset
    /// to guest and the attached cache emptied; on failure local state is
    /// left untouched.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        self.inner.backend.sign_out().await?;
        self.inner.reset_to_guest();
        Ok(())
    }

    /// Drop to guest without contacting the backend.
    pub fn set_guest_mode(&self) {
        self.inner.reset_to_guest();
        debug!("guest mode enabled");
    }

    pub fn user(&self) -> Option<User> {
        self.inner.state.borrow().user.clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.inner.state.borrow().session.clone()
    }

    pub fn role(&self) -> Role {
        self.inner.state.borrow().role
    }

    pub fn is_loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.inner.state.subscribe()
    }
}
