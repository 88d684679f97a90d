use crate::errors::{StoreError, TrackerError, ValidationError};
use crate::models::{AccountRow, User};
use crate::storage::JsonStore;
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::{Mutex, broadcast};
use tracing::{info, warn};
use uuid::Uuid;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

/// Sent whenever a session signs in (`user` set) or out (`user` empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthChange {
    pub token: String,
    pub user: Option<User>,
}

/// Handle returned by [`SessionProvider::subscribe`]. Dropping it unsubscribes.
pub struct AuthSubscription {
    receiver: broadcast::Receiver<AuthChange>,
}

impl AuthSubscription {
    pub fn new(receiver: broadcast::Receiver<AuthChange>) -> Self {
        Self { receiver }
    }

    /// Waits for the next change; `None` once the provider is gone.
    pub async fn next(&mut self) -> Option<AuthChange> {
        loop {
            match self.receiver.recv().await {
                Ok(change) => return Some(change),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("auth subscriber lagged, skipped {skipped} changes");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {}
}

#[async_trait]
pub trait SessionProvider: Send + Sync {
    async fn sign_up(&self, credentials: &Credentials, nickname: &str) -> Result<Session, TrackerError>;

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, TrackerError>;

    async fn sign_out(&self, token: &str) -> Result<(), TrackerError>;

    async fn current_user(&self, token: &str) -> Result<Option<User>, TrackerError>;

    fn subscribe(&self) -> AuthSubscription;
}

/// Email/password accounts kept in the JSON store; sessions live in memory.
pub struct LocalSessionProvider {
    store: JsonStore,
    // Tokens stay valid until sign-out or restart.
    sessions: Mutex<HashMap<String, User>>,
    changes: broadcast::Sender<AuthChange>,
}

impl LocalSessionProvider {
    pub fn new(store: JsonStore) -> Self {
        let (changes, _) = broadcast::channel(64);
        Self {
            store,
            sessions: Mutex::new(HashMap::new()),
            changes,
        }
    }

    async fn open_session(&self, user: User) -> Session {
        let token = Uuid::new_v4().to_string();
        self.sessions.lock().await.insert(token.clone(), user.clone());
        // No receivers is fine.
        let _ = self.changes.send(AuthChange {
            token: token.clone(),
            user: Some(user.clone()),
        });
        Session { token, user }
    }
}

#[async_trait]
impl SessionProvider for LocalSessionProvider {
    async fn sign_up(&self, credentials: &Credentials, nickname: &str) -> Result<Session, TrackerError> {
        let email = normalize_email(&credentials.email)?;
        if credentials.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN).into());
        }
        if self.store.find_account(&email).await.is_some() {
            return Err(TrackerError::AccountExists);
        }

        let password_hash = hash_password(&credentials.password)?;
        let nickname = nickname.trim();
        let account = AccountRow {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            nickname: (!nickname.is_empty()).then(|| nickname.to_string()),
        };
        let user = account.user();
        match self.store.insert_account(account).await {
            Ok(()) => {}
            Err(StoreError::Conflict(_)) => return Err(TrackerError::AccountExists),
            Err(err) => return Err(err.into()),
        }

        info!("account created for {}", user.email);
        Ok(self.open_session(user).await)
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<Session, TrackerError> {
        let email = normalize_email(&credentials.email).map_err(|_| TrackerError::InvalidCredentials)?;
        let account = self
            .store
            .find_account(&email)
            .await
            .ok_or(TrackerError::InvalidCredentials)?;
        if !verify_password(&credentials.password, &account.password_hash)? {
            return Err(TrackerError::InvalidCredentials);
        }
        Ok(self.open_session(account.user()).await)
    }

    async fn sign_out(&self, token: &str) -> Result<(), TrackerError> {
        let removed = self.sessions.lock().await.remove(token);
        if removed.is_none() {
            return Err(TrackerError::Unauthorized);
        }
        let _ = self.changes.send(AuthChange {
            token: token.to_string(),
            user: None,
        });
        Ok(())
    }

    async fn current_user(&self, token: &str) -> Result<Option<User>, TrackerError> {
        Ok(self.sessions.lock().await.get(token).cloned())
    }

    fn subscribe(&self) -> AuthSubscription {
        AuthSubscription::new(self.changes.subscribe())
    }
}

fn normalize_email(raw: &str) -> Result<String, ValidationError> {
    let email = raw.trim().to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(email),
        _ => Err(ValidationError::InvalidEmail),
    }
}

fn hash_password(password: &str) -> Result<String, TrackerError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| TrackerError::Session(err.to_string()))
}

fn verify_password(password: &str, stored: &str) -> Result<bool, TrackerError> {
    let parsed = PasswordHash::new(stored).map_err(|err| TrackerError::Session(err.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}
