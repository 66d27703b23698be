use std::sync::{Arc, Mutex};

use tracing::info;

use crate::{
    auth::{AuthApi, HttpAuth, Identity},
    config::Config,
    model::Profile,
    store::{DocumentStore, HttpDocumentStore, ProfileStore},
};

/// What one page load holds: the signed-in identity (or none) and the
/// profile loaded for it. Replaced wholesale on navigation and on every
/// auth change.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub identity: Option<Identity>,
    pub profile: Option<Profile>,
}

pub struct AppState {
    pub config: Config,
    pub auth: Arc<dyn AuthApi>,
    pub profiles: ProfileStore,
    session: Mutex<Session>,
}

impl AppState {
    /// Wire up the hosted services from the environment.
    pub fn from_env() -> Arc<Self> {
        info!("Initializing state...");
        let config = Config::load();
        let auth: Arc<dyn AuthApi> = Arc::new(HttpAuth::new(&config));
        let store: Arc<dyn DocumentStore> = Arc::new(HttpDocumentStore::new(&config));
        Self::new(config, auth, store)
    }

    /// Compose with explicit service backends (HTTP or in-memory).
    pub fn new(
        config: Config,
        auth: Arc<dyn AuthApi>,
        store: Arc<dyn DocumentStore>,
    ) -> Arc<Self> {
        let profiles = ProfileStore::new(store, &config.users_collection);
        Arc::new(Self {
            config,
            auth,
            profiles,
            session: Mutex::new(Session::default()),
        })
    }

    pub fn session(&self) -> Session {
        self.session.lock().unwrap().clone()
    }

    pub fn replace_session(&self, session: Session) {
        *self.session.lock().unwrap() = session;
    }
}
