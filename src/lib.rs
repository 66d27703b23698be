//! Client core for a personal-portfolio directory.
//!
//! Users register, edit a profile (bio, skills, contact info, projects),
//! and visitors browse or search profiles. Durability lives entirely in a
//! hosted auth provider and document store; this crate is the state and
//! view-binding layer between them and whatever presentation layer embeds
//! it.
//!
//!
//!
//! # Pages
//!
//! - **auth** — login and register forms
//! - **dashboard** — edit profile, skills, contact info, projects; delete
//!   the account
//! - **profile** — public view of one profile, own or `?uid=`-selected
//! - **search** — substring search across every profile, user or project
//!   mode
//!
//!
//!
//! # Flow
//!
//! The bootstrap subscribes once to the auth-state channel. On every
//! notification it refreshes the session (loading or lazily creating the
//! signed-in user's profile document), recomputes nav visibility, and
//! re-runs the controller for the current page. Form submissions mutate
//! the in-memory profile, persist the changed subset, and repaint from
//! the local copy on success; a failed write restores the pre-mutation
//! snapshot. Dispatches superseded by a newer auth notification are
//! discarded, not applied.
//!
//!
//!
//! # Backends
//!
//! The auth provider and document store sit behind traits. `HttpAuth` and
//! `HttpDocumentStore` speak to the hosted services configured through
//! the environment; `MemoryAuth` and `MemoryStore` run the same flows
//! in-process.

use tracing_subscriber::{EnvFilter, fmt};

pub mod auth;
pub mod config;
pub mod error;
pub mod model;
pub mod pages;
pub mod router;
pub mod search;
pub mod state;
pub mod store;
pub mod view;

pub use auth::{AuthApi, Identity};
pub use config::Config;
pub use error::AppError;
pub use model::{Contact, Profile, Project};
pub use router::{Bootstrap, PageKind, PageRequest, Screen};
pub use state::AppState;
pub use store::{DocumentStore, ProfileStore};

pub fn init_tracing() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
}
