//! # Router & bootstrap
//!
//! Resolves which page a load is for, keeps nav visibility in step with
//! the auth state, and re-runs the page's controller on every auth-state
//! notification.
//!
//! Each dispatch takes a generation snapshot up front; a dispatch that is
//! no longer the newest by the time its loads resolve is discarded rather
//! than applied, so rapid auth flapping can never paint a stale screen.

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use tracing::{debug, info};

use crate::{
    auth::Identity,
    error::AppError,
    pages::{AuthPage, DashboardPage, Destination, ProfileOutcome, ProfilePage, SearchPage},
    state::{AppState, Session},
};

/// Which page a document root is marked as.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PageKind {
    Auth,
    Dashboard,
    Search,
    Profile,
}

impl PageKind {
    /// Reads the marker carried on the page root.
    pub fn from_marker(marker: &str) -> Option<Self> {
        match marker {
            "auth" => Some(Self::Auth),
            "dashboard" => Some(Self::Dashboard),
            "search" => Some(Self::Search),
            "profile" => Some(Self::Profile),
            _ => None,
        }
    }
}

/// One page load: the page kind plus the optional `uid` query parameter
/// naming whose profile to view publicly.
#[derive(Clone, Debug, PartialEq)]
pub struct PageRequest {
    pub kind: PageKind,
    pub uid: Option<String>,
}

impl PageRequest {
    pub fn new(kind: PageKind) -> Self {
        Self { kind, uid: None }
    }

    pub fn parse(marker: &str, query: &str) -> Option<Self> {
        Some(Self {
            kind: PageKind::from_marker(marker)?,
            uid: uid_param(query),
        })
    }
}

/// Pulls `uid` out of a query string like `?uid=abc&x=y`.
pub fn uid_param(query: &str) -> Option<String> {
    query
        .trim_start_matches('?')
        .split('&')
        .find_map(|pair| pair.strip_prefix("uid="))
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

/// Login/logout affordance visibility.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Nav {
    pub show_login: bool,
    pub show_logout: bool,
}

pub fn nav_for(identity: Option<&Identity>) -> Nav {
    Nav {
        show_login: identity.is_none(),
        show_logout: identity.is_some(),
    }
}

/// The controller (or redirect) produced by one dispatch.
pub enum Screen {
    Auth(AuthPage),
    Dashboard(DashboardPage),
    Search(SearchPage),
    Profile(ProfileOutcome),
    RedirectToAuth,
    RedirectHome,
}

pub struct Bootstrap {
    state: Arc<AppState>,
    generation: AtomicU64,
}

impl Bootstrap {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            generation: AtomicU64::new(0),
        }
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// One controller run for `request` against the current auth state.
    /// Returns `Ok(None)` when a newer dispatch superseded this one while
    /// its loads were in flight.
    pub async fn dispatch(&self, request: &PageRequest) -> Result<Option<Screen>, AppError> {
        let generation = self.begin();
        let identity = self.state.auth.subscribe().borrow().clone();

        let mut session = Session {
            identity: identity.clone(),
            profile: None,
        };
        if let Some(identity) = &identity {
            session.profile = Some(self.state.profiles.load_or_create(identity).await?);
        }

        if !self.is_current(generation) {
            debug!("Discarding stale dispatch (generation {generation})");
            return Ok(None);
        }
        self.state.replace_session(session);

        let screen = match (request.kind, &identity) {
            (PageKind::Auth, Some(_)) => Screen::RedirectHome,
            (PageKind::Auth, None) => Screen::Auth(AuthPage::new(&self.state)),
            (PageKind::Dashboard, Some(_)) => Screen::Dashboard(DashboardPage::open(&self.state)?),
            (PageKind::Dashboard, None) => Screen::RedirectToAuth,
            (PageKind::Search, _) => Screen::Search(SearchPage::open(&self.state).await?),
            (PageKind::Profile, _) => match (request.uid.as_deref(), &identity) {
                (Some(uid), _) => Screen::Profile(ProfilePage::open(&self.state, Some(uid)).await?),
                (None, Some(_)) => Screen::Profile(ProfilePage::open(&self.state, None).await?),
                (None, None) => Screen::RedirectToAuth,
            },
        };

        if !self.is_current(generation) {
            debug!("Discarding stale dispatch (generation {generation})");
            return Ok(None);
        }
        Ok(Some(screen))
    }

    /// Nav logout button. The resulting auth notification re-dispatches
    /// whatever page is running.
    pub async fn sign_out(&self) -> Destination {
        self.state.auth.sign_out().await;
        Destination::Auth
    }

    /// Runs the page for `request`, re-dispatching on every auth-state
    /// notification, until the auth provider goes away. Current screens
    /// are handed to `on_screen`; superseded ones are dropped.
    pub async fn run<F>(&self, request: PageRequest, mut on_screen: F) -> Result<(), AppError>
    where
        F: FnMut(Nav, Screen),
    {
        let mut auth_watch = self.state.auth.subscribe();
        info!("Bootstrap running for {:?}", request.kind);

        loop {
            let nav = nav_for(auth_watch.borrow().as_ref());
            if let Some(screen) = self.dispatch(&request).await? {
                on_screen(nav, screen);
            }

            if auth_watch.changed().await.is_err() {
                return Ok(());
            }
        }
    }
}
