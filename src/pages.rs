//! # Page controllers
//!
//! One controller per page, all the same shape: resolve the subject, load
//! it through the store adapter, render view models, and expose the form
//! submissions as methods.
//!
//! Every persisting mutation snapshots the in-memory profile first,
//! applies the edit, writes the changed subset, and restores the snapshot
//! if the write fails. The local copy therefore never diverges from the
//! store on a failed save. Successful writes are not re-read; the local
//! copy is authoritative.

use std::{sync::Arc, time::Duration};

use tracing::warn;

use crate::{
    auth::{AuthApi, Identity},
    error::AppError,
    model::{Profile, ProfileEdit, ProjectDraft, normalize_skills},
    search::Directory,
    state::AppState,
    store::ProfileStore,
    view::{self, ContactView, ProfileView, ProjectHitCard, ProjectsView, SkillsView, UserCard},
};

/// How long a success notice stays up before the presentation layer
/// clears it. Errors carry no ttl and persist until replaced.
pub const NOTICE_TTL: Duration = Duration::from_millis(1500);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NoticeKind {
    Success,
    Error,
}

/// Transient feedback line next to a form.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub text: String,
    pub kind: NoticeKind,
    pub ttl: Option<Duration>,
}

impl Notice {
    pub fn success(text: &str) -> Self {
        Self {
            text: text.to_string(),
            kind: NoticeKind::Success,
            ttl: Some(NOTICE_TTL),
        }
    }

    pub fn error(text: &str) -> Self {
        Self {
            text: text.to_string(),
            kind: NoticeKind::Error,
            ttl: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.kind == NoticeKind::Success
    }
}

/// Where a page asks the shell to navigate next.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Destination {
    Home,
    Dashboard,
    Auth,
}

// ---------------------------------------------------------------------
// Auth page
// ---------------------------------------------------------------------

pub struct AuthPage {
    auth: Arc<dyn AuthApi>,
    profiles: ProfileStore,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AuthOutcome {
    pub notice: Notice,
    pub goto: Option<Destination>,
}

#[derive(Clone, Debug, Default)]
pub struct RegisterInput {
    pub name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

impl AuthPage {
    pub fn new(state: &AppState) -> Self {
        Self {
            auth: state.auth.clone(),
            profiles: state.profiles.clone(),
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthOutcome {
        match self.auth.sign_in(email.trim(), password).await {
            Ok(_) => AuthOutcome {
                notice: Notice::success("Login successful. Redirecting…"),
                goto: Some(Destination::Home),
            },
            Err(err) => {
                warn!("Sign-in failed: {err}");
                AuthOutcome {
                    notice: Notice::error("Invalid email or password."),
                    goto: None,
                }
            }
        }
    }

    /// Signs the account up and seeds its profile document with the
    /// submitted name and username.
    pub async fn register(&self, input: RegisterInput) -> AuthOutcome {
        let name = input.name.trim();
        let username = input.username.trim();
        let email = input.email.trim();

        if name.is_empty() || email.is_empty() || input.password.is_empty() {
            return AuthOutcome {
                notice: Notice::error("Please fill in all required fields."),
                goto: None,
            };
        }

        let identity = match self.auth.sign_up(email, &input.password).await {
            Ok(identity) => identity,
            Err(err) => {
                warn!("Sign-up failed: {err}");
                return AuthOutcome {
                    notice: Notice::error("Registration failed. Maybe email already used."),
                    goto: None,
                };
            }
        };

        let mut profile = Profile::default_for(&identity.uid, &identity.email, name);
        profile.username = username.to_string();

        if let Err(err) = self.profiles.create(&profile).await {
            warn!("Seeding profile for {} failed: {err}", identity.uid);
            return AuthOutcome {
                notice: Notice::error("Registration failed. Maybe email already used."),
                goto: None,
            };
        }

        AuthOutcome {
            notice: Notice::success("Account created. Redirecting to dashboard…"),
            goto: Some(Destination::Dashboard),
        }
    }
}

// ---------------------------------------------------------------------
// Public profile page
// ---------------------------------------------------------------------

/// Fully rendered profile page.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileScreen {
    pub profile: ProfileView,
    pub projects: ProjectsView,
    pub skills: SkillsView,
    pub contact: ContactView,
}

/// Outcome of resolving the page's subject. A missing public profile is a
/// view state, not an error.
#[derive(Clone, Debug, PartialEq)]
pub enum ProfileOutcome {
    Found(ProfileScreen),
    NotFound,
}

fn compose(profile: &Profile) -> ProfileScreen {
    ProfileScreen {
        profile: view::profile_view(Some(profile)),
        projects: view::projects_view(&profile.projects),
        skills: view::skills_view(&profile.skills),
        contact: view::contact_view(&profile.contact),
    }
}

pub struct ProfilePage;

impl ProfilePage {
    /// Subject resolution: an explicit `uid` reads the named profile
    /// publicly; otherwise the session's own (already loaded) profile is
    /// shown.
    pub async fn open(state: &AppState, uid: Option<&str>) -> Result<ProfileOutcome, AppError> {
        if let Some(uid) = uid {
            return Ok(match state.profiles.load_public(uid).await? {
                Some(profile) => ProfileOutcome::Found(compose(&profile)),
                None => ProfileOutcome::NotFound,
            });
        }

        match state.session().profile {
            Some(profile) => Ok(ProfileOutcome::Found(compose(&profile))),
            None => Err(AppError::NotSignedIn),
        }
    }
}

// ---------------------------------------------------------------------
// Dashboard page
// ---------------------------------------------------------------------

/// Owns the live profile copy for the duration of the page.
pub struct DashboardPage {
    auth: Arc<dyn AuthApi>,
    profiles: ProfileStore,
    identity: Identity,
    profile: Profile,
}

impl DashboardPage {
    pub fn open(state: &AppState) -> Result<Self, AppError> {
        let session = state.session();
        let identity = session.identity.ok_or(AppError::NotSignedIn)?;
        let profile = session.profile.ok_or(AppError::NotSignedIn)?;

        Ok(Self {
            auth: state.auth.clone(),
            profiles: state.profiles.clone(),
            identity,
            profile,
        })
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn header(&self) -> String {
        view::dashboard_header(&self.profile)
    }

    /// Prefill values for the profile form.
    pub fn form(&self) -> ProfileEdit {
        self.profile.edit()
    }

    /// Prefill value for the comma-separated skills field.
    pub fn skills_field(&self) -> String {
        self.profile.skills.join(", ")
    }

    pub fn project_list(&self) -> ProjectsView {
        view::projects_view(&self.profile.projects)
    }

    pub async fn save_profile(&mut self, edit: &ProfileEdit) -> Notice {
        let snapshot = self.profile.clone();
        self.profile.apply_edit(edit);

        match self
            .profiles
            .save_edit(&self.identity.uid, &self.profile.edit())
            .await
        {
            Ok(()) => Notice::success("Profile saved."),
            Err(err) => {
                warn!("Saving profile for {} failed: {err}", self.identity.uid);
                self.profile = snapshot;
                Notice::error("Error saving profile.")
            }
        }
    }

    pub async fn save_skills(&mut self, raw: &str) -> Notice {
        let snapshot = self.profile.clone();
        self.profile.skills = normalize_skills(raw);

        match self
            .profiles
            .save_skills(&self.identity.uid, &self.profile.skills)
            .await
        {
            Ok(()) => Notice::success("Skills saved."),
            Err(err) => {
                warn!("Saving skills for {} failed: {err}", self.identity.uid);
                self.profile = snapshot;
                Notice::error("Error saving skills.")
            }
        }
    }

    pub async fn add_project(&mut self, draft: ProjectDraft) -> Notice {
        let snapshot = self.profile.clone();
        if self.profile.add_project(draft).is_err() {
            return Notice::error("Please fill in a title and description.");
        }

        match self
            .profiles
            .save_projects(&self.identity.uid, &self.profile.projects)
            .await
        {
            Ok(()) => Notice::success("Project added."),
            Err(err) => {
                warn!("Adding project for {} failed: {err}", self.identity.uid);
                self.profile = snapshot;
                Notice::error("Error adding project.")
            }
        }
    }

    pub async fn delete_project(&mut self, index: usize) -> Notice {
        let snapshot = self.profile.clone();
        if self.profile.remove_project(index).is_err() {
            return Notice::error("Error deleting project.");
        }

        match self
            .profiles
            .save_projects(&self.identity.uid, &self.profile.projects)
            .await
        {
            Ok(()) => Notice::success("Project deleted."),
            Err(err) => {
                warn!("Deleting project for {} failed: {err}", self.identity.uid);
                self.profile = snapshot;
                Notice::error("Error deleting project.")
            }
        }
    }

    /// Account deletion, reauthenticate-first: a wrong password stops the
    /// flow before anything is destroyed. On success the auth channel
    /// fires with `None` and the bootstrap re-dispatches.
    pub async fn delete_account(&self, password: &str) -> Notice {
        if let Err(err) = self.auth.reauthenticate(&self.identity, password).await {
            warn!("Reauthentication for {} failed: {err}", self.identity.uid);
            return match err {
                AppError::InvalidCredentials => Notice::error("Incorrect password."),
                _ => Notice::error("Error deleting account."),
            };
        }

        if let Err(err) = self.profiles.delete(&self.identity.uid).await {
            warn!("Deleting document for {} failed: {err}", self.identity.uid);
            return Notice::error("Error deleting account.");
        }

        match self.auth.delete_identity(&self.identity).await {
            Ok(()) => Notice::success("Account deleted."),
            Err(AppError::RequiresRecentLogin) => {
                Notice::error("Please sign in again to delete your account.")
            }
            Err(err) => {
                warn!("Deleting identity {} failed: {err}", self.identity.uid);
                Notice::error("Error deleting account.")
            }
        }
    }
}

// ---------------------------------------------------------------------
// Search page
// ---------------------------------------------------------------------

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SearchMode {
    Users,
    Projects,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SearchHit {
    User(UserCard),
    Project(ProjectHitCard),
}

#[derive(Clone, Debug, PartialEq)]
pub struct SearchView {
    /// Count line, prompt, or no-results message.
    pub status: String,
    pub hits: Vec<SearchHit>,
}

/// Fetches the directory once; every query after that is an in-memory
/// filter, no further network calls.
pub struct SearchPage {
    directory: Directory,
}

impl SearchPage {
    pub async fn open(state: &AppState) -> Result<Self, AppError> {
        let users = state.profiles.list_all().await?;
        Ok(Self {
            directory: Directory::new(users),
        })
    }

    pub fn query(&self, mode: SearchMode, text: &str) -> SearchView {
        let query = text.trim();

        match mode {
            SearchMode::Users => {
                if query.is_empty() {
                    return SearchView {
                        status: "Start typing to see user results.".to_string(),
                        hits: Vec::new(),
                    };
                }

                let matches = self.directory.filter_users(query);
                if matches.is_empty() {
                    return SearchView {
                        status: "No users found.".to_string(),
                        hits: Vec::new(),
                    };
                }

                SearchView {
                    status: format!("{} user(s) found.", matches.len()),
                    hits: matches
                        .into_iter()
                        .map(|user| SearchHit::User(view::user_card(user)))
                        .collect(),
                }
            }
            SearchMode::Projects => {
                if query.is_empty() {
                    return SearchView {
                        status: "Start typing to see project results.".to_string(),
                        hits: Vec::new(),
                    };
                }

                let matches = self.directory.filter_projects(query);
                if matches.is_empty() {
                    return SearchView {
                        status: "No projects found.".to_string(),
                        hits: Vec::new(),
                    };
                }

                SearchView {
                    status: format!("{} project(s) found.", matches.len()),
                    hits: matches
                        .into_iter()
                        .map(|(owner, project)| {
                            SearchHit::Project(view::project_hit_card(owner, project))
                        })
                        .collect(),
                }
            }
        }
    }
}
