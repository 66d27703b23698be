//! # Auth provider
//!
//! Seam over the hosted identity service: email/password sign-in and
//! sign-up, reauthentication, identity deletion, and the auth-state
//! channel every page load subscribes to.
//!
//! The channel is a [`tokio::sync::watch`] pair; the provider pushes
//! `Some(identity)` on sign-in and `None` on sign-out, and a fresh
//! subscriber always observes the current value first.

use std::{
    collections::HashMap,
    sync::{
        Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::watch;
use tracing::info;

use crate::{config::Config, error::AppError};

/// The authenticated account as the identity service reports it.
#[derive(Clone, Debug, PartialEq)]
pub struct Identity {
    /// Opaque identity key; doubles as the profile document key.
    pub uid: String,
    pub email: String,
}

pub type AuthWatch = watch::Receiver<Option<Identity>>;

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AppError>;
    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AppError>;
    async fn sign_out(&self);
    /// Fresh proof of identity, required before account deletion.
    async fn reauthenticate(&self, identity: &Identity, password: &str) -> Result<(), AppError>;
    async fn delete_identity(&self, identity: &Identity) -> Result<(), AppError>;
    /// Auth-state notifications; fires with the current value at
    /// subscription time and again on every sign-in/sign-out.
    fn subscribe(&self) -> AuthWatch;
}

/// REST client for the hosted identity service.
pub struct HttpAuth {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    sessions: watch::Sender<Option<Identity>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: String,
}

impl HttpAuth {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.identity_url.clone(),
            api_key: config.api_key.clone(),
            sessions: watch::channel(None).0,
        }
    }

    async fn credential_call(
        &self,
        action: &str,
        email: &str,
        password: &str,
    ) -> Result<reqwest::Response, AppError> {
        let url = format!("{}/accounts:{action}?key={}", self.endpoint, self.api_key);
        let response = self
            .http
            .post(url)
            .json(&json!({
                "email": email,
                "password": password,
                "returnSecureToken": true,
            }))
            .send()
            .await?;
        Ok(response)
    }
}

#[async_trait]
impl AuthApi for HttpAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let response = self
            .credential_call("signInWithPassword", email, password)
            .await?;

        if response.status() == StatusCode::BAD_REQUEST {
            return Err(AppError::InvalidCredentials);
        }
        let account: AccountResponse = response.error_for_status()?.json().await?;

        let identity = Identity {
            uid: account.local_id,
            email: account.email,
        };
        info!("Signed in as {}", identity.uid);
        self.sessions.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let response = self.credential_call("signUp", email, password).await?;

        if response.status() == StatusCode::BAD_REQUEST {
            return Err(AppError::EmailTaken);
        }
        let account: AccountResponse = response.error_for_status()?.json().await?;

        let identity = Identity {
            uid: account.local_id,
            email: email.to_string(),
        };
        info!("Registered {}", identity.uid);
        self.sessions.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) {
        self.sessions.send_replace(None);
    }

    async fn reauthenticate(&self, identity: &Identity, password: &str) -> Result<(), AppError> {
        let response = self
            .credential_call("signInWithPassword", &identity.email, password)
            .await?;

        if response.status() == StatusCode::BAD_REQUEST {
            return Err(AppError::InvalidCredentials);
        }
        response.error_for_status()?;
        Ok(())
    }

    async fn delete_identity(&self, identity: &Identity) -> Result<(), AppError> {
        let url = format!("{}/accounts:delete?key={}", self.endpoint, self.api_key);
        let response = self
            .http
            .post(url)
            .json(&json!({ "localId": identity.uid }))
            .send()
            .await?;

        // The service rejects deletions on stale sessions.
        if response.status() == StatusCode::BAD_REQUEST {
            return Err(AppError::RequiresRecentLogin);
        }
        response.error_for_status()?;

        self.sessions.send_replace(None);
        Ok(())
    }

    fn subscribe(&self) -> AuthWatch {
        self.sessions.subscribe()
    }
}

/// In-process identity backend over a `HashMap`. Shares the [`AuthApi`]
/// seam with [`HttpAuth`] so flows can run without a hosted service.
pub struct MemoryAuth {
    accounts: Mutex<HashMap<String, Account>>,
    next_uid: AtomicU64,
    sessions: watch::Sender<Option<Identity>>,
}

#[derive(Clone)]
struct Account {
    uid: String,
    password: String,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self {
            accounts: Mutex::new(HashMap::new()),
            next_uid: AtomicU64::new(1),
            sessions: watch::channel(None).0,
        }
    }
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuthApi for MemoryAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let accounts = self.accounts.lock().unwrap();
        let account = accounts.get(email).ok_or(AppError::InvalidCredentials)?;
        if account.password != password {
            return Err(AppError::InvalidCredentials);
        }

        let identity = Identity {
            uid: account.uid.clone(),
            email: email.to_string(),
        };
        drop(accounts);
        self.sessions.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Identity, AppError> {
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(email) {
            return Err(AppError::EmailTaken);
        }

        let uid = format!("uid-{}", self.next_uid.fetch_add(1, Ordering::Relaxed));
        accounts.insert(
            email.to_string(),
            Account {
                uid: uid.clone(),
                password: password.to_string(),
            },
        );
        drop(accounts);

        let identity = Identity {
            uid,
            email: email.to_string(),
        };
        self.sessions.send_replace(Some(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self) {
        self.sessions.send_replace(None);
    }

    async fn reauthenticate(&self, identity: &Identity, password: &str) -> Result<(), AppError> {
        let accounts = self.accounts.lock().unwrap();
        match accounts.get(&identity.email) {
            Some(account) if account.password == password => Ok(()),
            Some(_) => Err(AppError::InvalidCredentials),
            None => Err(AppError::InvalidCredentials),
        }
    }

    async fn delete_identity(&self, identity: &Identity) -> Result<(), AppError> {
        self.accounts.lock().unwrap().remove(&identity.email);
        self.sessions.send_replace(None);
        Ok(())
    }

    fn subscribe(&self) -> AuthWatch {
        self.sessions.subscribe()
    }
}
