//! Identity stub.
//!
//! Supplies "who is signed in" to the rest of the app. Without a remote
//! service the user object is fabricated from the submitted email; with one,
//! the service's login endpoint provides the user and a bearer token. The
//! pipeline itself only consumes `is_user_present()`.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::MediPredictError;
use crate::storage::Storage;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
}

/// What is persisted under the user key: the user object plus the bearer
/// token when the remote service issued one.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredIdentity {
    #[serde(flatten)]
    user: User,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    token: Option<String>,
}

/// Reject obviously malformed credentials before any login attempt.
pub fn validate_credentials(email: &str, password: &str) -> Result<(), MediPredictError> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(MediPredictError::Validation(
            "Please enter a valid email address".to_string(),
        ));
    }
    if password.is_empty() {
        return Err(MediPredictError::Validation(
            "Please enter your password".to_string(),
        ));
    }
    Ok(())
}

/// Offline user derived from the email address.
pub fn offline_user(email: &str) -> User {
    let email = email.trim();
    let name = email.split('@').next().unwrap_or(email).to_string();
    User {
        id: "123".to_string(),
        email: email.to_string(),
        name,
    }
}

/// Offline stand-in for an OAuth sign-in.
pub fn google_user() -> User {
    User {
        id: "456".to_string(),
        email: "user@gmail.com".to_string(),
        name: "Google User".to_string(),
    }
}

/// The signed-in identity, persisted through a `Storage`.
pub struct Identity<S> {
    storage: S,
    current: Option<StoredIdentity>,
}

impl<S: Storage> Identity<S> {
    /// Restore a previous sign-in. A corrupt record is removed and treated as
    /// signed out.
    pub fn open(storage: S) -> Self {
        let current = match storage.load() {
            Ok(Some(raw)) => match serde_json::from_str::<StoredIdentity>(&raw) {
                Ok(identity) => Some(identity),
                Err(e) => {
                    warn!("Error parsing stored user, signing out: {}", e);
                    if let Err(e) = storage.remove() {
                        warn!("Failed to remove stored user: {}", e);
                    }
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to load stored user: {}", e);
                None
            }
        };

        Self { storage, current }
    }

    pub fn is_user_present(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_user(&self) -> Option<&User> {
        self.current.as_ref().map(|c| &c.user)
    }

    /// Bearer token for the remote service, if the last sign-in issued one.
    pub fn token(&self) -> Option<&str> {
        self.current.as_ref().and_then(|c| c.token.as_deref())
    }

    /// Persist and adopt a new identity.
    pub fn sign_in(&mut self, user: User, token: Option<String>) -> Result<User, MediPredictError> {
        let identity = StoredIdentity {
            user: user.clone(),
            token,
        };
        let json = serde_json::to_string(&identity)
            .map_err(|e| MediPredictError::Storage(format!("Failed to serialize user: {}", e)))?;
        self.storage.save(&json)?;
        self.current = Some(identity);

        info!("Signed in as {}", user.email);
        Ok(user)
    }

    pub fn sign_out(&mut self) -> Result<(), MediPredictError> {
        self.storage.remove()?;
        if let Some(previous) = self.current.take() {
            info!("Signed out {}", previous.user.email);
        }
        Ok(())
    }
}
