//! The prediction pipeline as one stateful service.
//!
//! `PredictionService` owns the session, the history log and the signed-in
//! identity, and decides per call whether the remote service or the local
//! engine and store handle it. The desktop commands are thin wrappers over
//! its methods.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use crate::auth::{google_user, offline_user, validate_credentials, Identity, User};
use crate::catalog::{Symptom, SymptomCatalog};
use crate::error::MediPredictError;
use crate::history::{HistoryEntry, HistoryStore};
use crate::inference::{Prediction, RuleEngine};
use crate::recorder::SessionRecorder;
use crate::remote::RemoteClient;
use crate::session::{AnalysisTicket, PredictionSession, SessionSnapshot};
use crate::storage::Storage;

const UNAVAILABLE_NOTICE: &str =
    "The prediction service is unavailable. Using local predictions and history.";

/// Timing knobs for the simulated analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceOptions {
    pub analysis_delay: Duration,
    /// Upper bound of a random extra delay
    pub analysis_jitter: Duration,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            analysis_delay: Duration::from_millis(1500),
            analysis_jitter: Duration::ZERO,
        }
    }
}

/// Which side produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    Local,
    Remote,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceStatus {
    pub configured: bool,
    pub available: bool,
    pub base_url: Option<String>,
    pub last_error: Option<String>,
    pub checked_at: Option<DateTime<Utc>>,
}

/// Result of one completed analysis.
///
/// A failed history write does not fail the analysis: the results are still
/// shown and `history_error` says why nothing was recorded.
#[derive(Debug, Clone, Serialize)]
pub struct PredictionOutcome {
    pub session: SessionSnapshot,
    pub backend: Backend,
    pub history_entry: Option<HistoryEntry>,
    pub history_error: Option<String>,
}

#[derive(Debug, Default)]
struct RemoteState {
    available: bool,
    last_error: Option<String>,
    checked_at: Option<DateTime<Utc>>,
}

pub struct PredictionService<S> {
    catalog: SymptomCatalog,
    engine: RuleEngine,
    recorder: SessionRecorder,
    options: ServiceOptions,
    remote: Option<RemoteClient>,
    remote_state: Mutex<RemoteState>,
    notices: Mutex<Vec<String>>,
    session: Mutex<PredictionSession>,
    history: Mutex<HistoryStore<S>>,
    identity: Mutex<Identity<S>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// An analysis in flight. Dropping it before `settle` returns the session
/// to `Selecting`, so a cancelled call cannot leave it stuck in `Analyzing`.
struct PendingAnalysis<'a> {
    session: &'a Mutex<PredictionSession>,
    ticket: AnalysisTicket,
    settled: bool,
}

impl PendingAnalysis<'_> {
    fn settle(&mut self) {
        self.settled = true;
    }
}

impl Drop for PendingAnalysis<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        // A stale ticket leaves the session alone.
        if lock(self.session).abort(&self.ticket).is_ok() {
            info!("Analysis {} cancelled", self.ticket.generation());
        }
    }
}

impl<S: Storage> PredictionService<S> {
    pub fn new(
        engine: RuleEngine,
        history: HistoryStore<S>,
        identity: Identity<S>,
        options: ServiceOptions,
    ) -> Self {
        let catalog = SymptomCatalog::builtin();
        let notices = history
            .discarded_on_load()
            .map(|reason| vec![format!("Your saved history could not be read and was reset. {}", reason)])
            .unwrap_or_default();

        Self {
            recorder: SessionRecorder::new(catalog.clone()),
            session: Mutex::new(PredictionSession::new(catalog.clone())),
            catalog,
            engine,
            options,
            remote: None,
            remote_state: Mutex::new(RemoteState::default()),
            notices: Mutex::new(notices),
            history: Mutex::new(history),
            identity: Mutex::new(identity),
        }
    }

    /// Route predictions and history through `client` while it is healthy.
    /// The service is assumed reachable until a call or health check says otherwise.
    pub fn with_remote(mut self, client: RemoteClient) -> Self {
        self.remote = Some(client);
        lock(&self.remote_state).available = true;
        self
    }

    // -------------------------------------------------------------------------
    // Session
    // -------------------------------------------------------------------------

    pub fn symptoms(&self) -> Vec<Symptom> {
        self.catalog.all().to_vec()
    }

    pub fn session_snapshot(&self) -> SessionSnapshot {
        lock(&self.session).snapshot()
    }

    pub fn toggle_symptom(
        &self,
        symptom_id: &str,
        selected: bool,
    ) -> Result<SessionSnapshot, MediPredictError> {
        let mut session = lock(&self.session);
        session.toggle(symptom_id, selected)?;
        Ok(session.snapshot())
    }

    pub fn reset_session(&self) -> SessionSnapshot {
        let mut session = lock(&self.session);
        session.reset();
        session.snapshot()
    }

    /// Analyze the current selection and record the result.
    ///
    /// Fails with `Busy` while another analysis is running, and with `Stale`
    /// when the session was reset before the result arrived.
    pub async fn start_prediction(&self) -> Result<PredictionOutcome, MediPredictError> {
        let token = self.require_user()?;
        let mut pending = PendingAnalysis {
            session: &self.session,
            ticket: lock(&self.session).begin_analysis()?,
            settled: false,
        };
        let ticket = &pending.ticket;
        info!(
            "Analyzing {} symptoms (generation {})",
            ticket.selection().len(),
            ticket.generation()
        );

        let delay = self.analysis_delay();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let (predictions, backend) = self.infer(ticket.selection(), token.as_deref()).await;

        let session = {
            let mut session = lock(&self.session);
            session.complete(ticket, predictions.clone()).map_err(|e| {
                info!("Discarding result of generation {}", ticket.generation());
                e
            })?;
            session.snapshot()
        };
        let selection = ticket.selection().to_vec();
        pending.settle();

        // The remote service keeps its own history of remote predictions.
        let (history_entry, history_error) = match backend {
            Backend::Remote => (None, None),
            Backend::Local => {
                let mut history = lock(&self.history);
                match self
                    .recorder
                    .record(&mut history, &selection, &predictions)
                {
                    Ok(entry) => (Some(entry), None),
                    Err(e) => {
                        warn!("Prediction shown but not saved to history: {}", e);
                        (None, Some(e.to_string()))
                    }
                }
            }
        };

        Ok(PredictionOutcome {
            session,
            backend,
            history_entry,
            history_error,
        })
    }

    fn analysis_delay(&self) -> Duration {
        let jitter_ms = self.options.analysis_jitter.as_millis() as u64;
        let jitter = if jitter_ms == 0 {
            0
        } else {
            rand::random_range(0..=jitter_ms)
        };
        self.options.analysis_delay + Duration::from_millis(jitter)
    }

    async fn infer(&self, selection: &[String], token: Option<&str>) -> (Vec<Prediction>, Backend) {
        if let (Some(remote), Some(token)) = (self.usable_remote(), token) {
            match remote.predict(token, selection).await {
                Ok(predictions) => return (predictions, Backend::Remote),
                Err(e) => {
                    warn!("Remote prediction failed, using local engine: {}", e);
                    self.remote_failed(&e);
                }
            }
        }
        (self.engine.infer(selection), Backend::Local)
    }

    // -------------------------------------------------------------------------
    // History
    // -------------------------------------------------------------------------

    /// The history log, newest first.
    pub async fn list_history(&self) -> Result<Vec<HistoryEntry>, MediPredictError> {
        let token = self.require_user()?;
        if let (Some(remote), Some(token)) = (self.usable_remote(), token.as_deref()) {
            match remote.history(token).await {
                Ok(entries) => return Ok(entries),
                Err(e) => {
                    warn!("Remote history unavailable, showing local history: {}", e);
                    self.remote_failed(&e);
                }
            }
        }
        Ok(lock(&self.history).list())
    }

    /// Delete one entry. Returns false when the local log has no such id.
    pub async fn delete_history_entry(&self, id: &str) -> Result<bool, MediPredictError> {
        let token = self.require_user()?;
        if let (Some(remote), Some(token)) = (self.usable_remote(), token.as_deref()) {
            match remote.delete_history(token, id).await {
                Ok(()) => return Ok(true),
                Err(e) if e.is_validation() => return Err(e),
                Err(e) => {
                    warn!("Remote delete failed, deleting locally: {}", e);
                    self.remote_failed(&e);
                }
            }
        }
        lock(&self.history).delete(id)
    }

    pub async fn clear_history(&self) -> Result<(), MediPredictError> {
        let token = self.require_user()?;
        if let (Some(remote), Some(token)) = (self.usable_remote(), token.as_deref()) {
            match remote.clear_history(token).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!("Remote clear failed, clearing locally: {}", e);
                    self.remote_failed(&e);
                }
            }
        }
        lock(&self.history).clear()
    }

    // -------------------------------------------------------------------------
    // Remote service state
    // -------------------------------------------------------------------------

    /// Check the remote service. A failed check queues one notice for the UI.
    pub async fn check_service(&self) -> ServiceStatus {
        if let Some(remote) = &self.remote {
            let healthy = remote.health().await;
            {
                let mut state = lock(&self.remote_state);
                state.available = healthy;
                state.checked_at = Some(Utc::now());
                state.last_error = (!healthy).then(|| "Health check failed".to_string());
            }
            if !healthy {
                self.push_notice(UNAVAILABLE_NOTICE);
            }
        }
        self.status()
    }

    pub fn status(&self) -> ServiceStatus {
        let state = lock(&self.remote_state);
        ServiceStatus {
            configured: self.remote.is_some(),
            available: self.remote.is_some() && state.available,
            base_url: self.remote.as_ref().map(|r| r.base_url().to_string()),
            last_error: state.last_error.clone(),
            checked_at: state.checked_at,
        }
    }

    /// Oldest pending notice, removing it from the queue.
    pub fn take_notice(&self) -> Option<String> {
        let mut notices = lock(&self.notices);
        (!notices.is_empty()).then(|| notices.remove(0))
    }

    fn push_notice(&self, notice: &str) {
        let mut notices = lock(&self.notices);
        if !notices.iter().any(|n| n == notice) {
            notices.push(notice.to_string());
        }
    }

    fn usable_remote(&self) -> Option<&RemoteClient> {
        let available = lock(&self.remote_state).available;
        self.remote.as_ref().filter(|_| available)
    }

    /// Rejected credentials do not say anything about reachability; every
    /// other failure marks the service unavailable until the next good health check.
    fn remote_failed(&self, error: &MediPredictError) {
        // Rejected before any request was sent, or by the server for the user.
        if error.is_validation() || matches!(error, MediPredictError::Unauthenticated) {
            return;
        }
        let was_available = {
            let mut state = lock(&self.remote_state);
            let was_available = state.available;
            state.available = false;
            state.last_error = Some(error.to_string());
            state.checked_at = Some(Utc::now());
            was_available
        };
        if was_available {
            self.push_notice(UNAVAILABLE_NOTICE);
        }
    }

    // -------------------------------------------------------------------------
    // Identity
    // -------------------------------------------------------------------------

    /// Sign in. With a remote service the service checks the password; if it
    /// cannot be reached the sign-in continues offline.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, MediPredictError> {
        validate_credentials(email, password)?;
        let email = email.trim();

        let (user, token) = match self.usable_remote() {
            Some(remote) => match remote.login(email, password).await {
                Ok((token, user)) => (user, Some(token)),
                Err(MediPredictError::Unauthenticated) => {
                    return Err(MediPredictError::Validation(
                        "Invalid email or password".to_string(),
                    ))
                }
                Err(e) => {
                    warn!("Remote login failed, signing in offline: {}", e);
                    self.remote_failed(&e);
                    (offline_user(email), None)
                }
            },
            None => (offline_user(email), None),
        };

        lock(&self.identity).sign_in(user, token)
    }

    pub fn login_with_google(&self) -> Result<User, MediPredictError> {
        lock(&self.identity).sign_in(google_user(), None)
    }

    /// Sign out and start over with an empty session.
    pub fn logout(&self) -> Result<(), MediPredictError> {
        lock(&self.identity).sign_out()?;
        lock(&self.session).reset();
        Ok(())
    }

    pub fn current_user(&self) -> Option<User> {
        lock(&self.identity).current_user().cloned()
    }

    pub fn is_user_present(&self) -> bool {
        lock(&self.identity).is_user_present()
    }

    fn require_user(&self) -> Result<Option<String>, MediPredictError> {
        let identity = lock(&self.identity);
        if !identity.is_user_present() {
            return Err(MediPredictError::Unauthenticated);
        }
        Ok(identity.token().map(str::to_string))
    }
}
