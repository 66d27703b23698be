//! # View models
//!
//! Pure mappings from profile state to the trees the presentation layer
//! paints. Each function fully replaces its region: feeding it the same
//! profile twice yields the same view, and none of them read prior view
//! state.
//!
//! Empty and missing fields always render defined placeholder text, never
//! blank regions. Guest and not-found states reuse the same fallbacks.

use crate::model::{Contact, Profile, Project};

pub const NAME_FALLBACK: &str = "Unnamed user";
pub const DOB_FALLBACK: &str = "Not provided";
pub const NO_USERNAME: &str = "No username";
pub const NO_SKILLS: &str = "No skills added yet.";
pub const NO_PROJECTS: &str = "No projects yet.";
pub const NO_CONTACT: &str = "No contact info provided.";

/// Header region of the public profile page.
#[derive(Clone, Debug, PartialEq)]
pub struct ProfileView {
    pub name: String,
    /// "@username", or `None` when the profile has no username.
    pub username: Option<String>,
    pub date_of_birth: String,
    pub bio: String,
    pub picture_url: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ProjectsView {
    Empty { message: &'static str },
    Cards(Vec<ProjectCard>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ProjectCard {
    pub title: String,
    pub description: String,
    /// `None` when the project has no link; the card then renders without
    /// a link affordance.
    pub link: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum SkillsView {
    Empty { message: &'static str },
    Items(Vec<String>),
}

#[derive(Clone, Debug, PartialEq)]
pub enum ContactView {
    Empty { message: &'static str },
    Rows(Vec<ContactRow>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ContactRow {
    pub label: &'static str,
    pub value: String,
    /// Render the value as an outbound link (website rows).
    pub linked: bool,
}

pub fn profile_view(profile: Option<&Profile>) -> ProfileView {
    let Some(profile) = profile else {
        return ProfileView {
            name: NAME_FALLBACK.to_string(),
            username: None,
            date_of_birth: DOB_FALLBACK.to_string(),
            bio: String::new(),
            picture_url: None,
        };
    };

    ProfileView {
        name: text_or(&profile.name, NAME_FALLBACK),
        username: handle(&profile.username),
        date_of_birth: text_or(&profile.date_of_birth, DOB_FALLBACK),
        bio: profile.bio.clone(),
        picture_url: if profile.profile_pic_url.is_empty() {
            None
        } else {
            Some(profile.profile_pic_url.clone())
        },
    }
}

pub fn projects_view(projects: &[Project]) -> ProjectsView {
    if projects.is_empty() {
        return ProjectsView::Empty {
            message: NO_PROJECTS,
        };
    }

    ProjectsView::Cards(projects.iter().map(project_card).collect())
}

pub fn project_card(project: &Project) -> ProjectCard {
    ProjectCard {
        title: project.title.clone(),
        description: project.description.clone(),
        link: if project.link.is_empty() {
            None
        } else {
            Some(project.link.clone())
        },
    }
}

pub fn skills_view(skills: &[String]) -> SkillsView {
    if skills.is_empty() {
        return SkillsView::Empty { message: NO_SKILLS };
    }

    SkillsView::Items(skills.to_vec())
}

pub fn contact_view(contact: &Contact) -> ContactView {
    let mut rows = Vec::new();

    if !contact.email.is_empty() {
        rows.push(ContactRow {
            label: "Email",
            value: contact.email.clone(),
            linked: false,
        });
    }
    if !contact.socials.is_empty() {
        rows.push(ContactRow {
            label: "Socials",
            value: contact.socials.clone(),
            linked: false,
        });
    }
    if !contact.website.is_empty() {
        rows.push(ContactRow {
            label: "Website",
            value: contact.website.clone(),
            linked: true,
        });
    }
    if !contact.phone.is_empty() {
        rows.push(ContactRow {
            label: "Phone",
            value: contact.phone.clone(),
            linked: false,
        });
    }

    if rows.is_empty() {
        return ContactView::Empty {
            message: NO_CONTACT,
        };
    }

    ContactView::Rows(rows)
}

/// One row of user-mode search results.
#[derive(Clone, Debug, PartialEq)]
pub struct UserCard {
    pub name: String,
    /// "@username" or the no-username fallback.
    pub username_line: String,
    pub project_count: usize,
}

/// One row of project-mode search results.
#[derive(Clone, Debug, PartialEq)]
pub struct ProjectHitCard {
    pub title: String,
    pub description: String,
    pub owner_line: String,
}

pub fn user_card(profile: &Profile) -> UserCard {
    UserCard {
        name: text_or(&profile.name, NAME_FALLBACK),
        username_line: handle(&profile.username).unwrap_or_else(|| NO_USERNAME.to_string()),
        project_count: profile.projects.len(),
    }
}

pub fn project_hit_card(owner: &Profile, project: &Project) -> ProjectHitCard {
    let owner_name = text_or(&owner.name, NAME_FALLBACK);
    let owner_line = match handle(&owner.username) {
        Some(handle) => format!("Owner: {owner_name} ({handle})"),
        None => format!("Owner: {owner_name}"),
    };

    ProjectHitCard {
        title: project.title.clone(),
        description: project.description.clone(),
        owner_line,
    }
}

/// Dashboard header line: "Name (username)".
pub fn dashboard_header(profile: &Profile) -> String {
    let name = text_or(&profile.name, "Unnamed");
    let username = text_or(&profile.username, "no username");
    format!("{name} ({username})")
}

/// "@username" line used on profile headers and search cards.
pub fn handle(username: &str) -> Option<String> {
    if username.is_empty() {
        None
    } else {
        Some(format!("@{username}"))
    }
}

fn text_or(value: &str, fallback: &str) -> String {
    if value.is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Profile;

    #[test]
    fn empty_projects_render_the_empty_state_message() {
        assert_eq!(
            projects_view(&[]),
            ProjectsView::Empty {
                message: NO_PROJECTS
            }
        );
    }

    #[test]
    fn linkless_project_has_no_link_affordance() {
        let card = project_card(&Project {
            title: "T".to_string(),
            description: "D".to_string(),
            link: String::new(),
        });
        assert_eq!(card.link, None);

        let linked = project_card(&Project {
            title: "T".to_string(),
            description: "D".to_string(),
            link: "https://t.example".to_string(),
        });
        assert_eq!(linked.link.as_deref(), Some("https://t.example"));
    }

    #[test]
    fn guest_profile_uses_placeholders() {
        let view = profile_view(None);
        assert_eq!(view.name, NAME_FALLBACK);
        assert_eq!(view.date_of_birth, DOB_FALLBACK);
        assert_eq!(view.username, None);
        assert_eq!(view.picture_url, None);
    }

    #[test]
    fn username_renders_as_handle() {
        let mut profile = Profile::default();
        profile.username = "ana_dev".to_string();
        let view = profile_view(Some(&profile));
        assert_eq!(view.username.as_deref(), Some("@ana_dev"));
    }

    #[test]
    fn empty_skills_and_contact_render_placeholders() {
        assert_eq!(skills_view(&[]), SkillsView::Empty { message: NO_SKILLS });
        assert_eq!(
            contact_view(&Contact::default()),
            ContactView::Empty {
                message: NO_CONTACT
            }
        );
    }

    #[test]
    fn contact_rows_only_for_present_fields() {
        let contact = Contact {
            email: "a@x.com".to_string(),
            website: "https://a.example".to_string(),
            ..Contact::default()
        };
        let ContactView::Rows(rows) = contact_view(&contact) else {
            panic!("expected rows");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "Email");
        assert!(!rows[0].linked);
        assert_eq!(rows[1].label, "Website");
        assert!(rows[1].linked);
    }

    #[test]
    fn search_cards_fall_back_like_the_profile_header() {
        let mut owner = Profile::default();
        owner.projects.push(Project {
            title: "T".to_string(),
            description: "D".to_string(),
            link: String::new(),
        });

        let card = user_card(&owner);
        assert_eq!(card.name, NAME_FALLBACK);
        assert_eq!(card.username_line, NO_USERNAME);
        assert_eq!(card.project_count, 1);

        let hit = project_hit_card(&owner, &owner.projects[0]);
        assert_eq!(hit.owner_line, "Owner: Unnamed user");

        owner.name = "Ana".to_string();
        owner.username = "ana001".to_string();
        let hit = project_hit_card(&owner, &owner.projects[0]);
        assert_eq!(hit.owner_line, "Owner: Ana (@ana001)");
    }

    #[test]
    fn dashboard_header_falls_back_per_field() {
        let mut profile = Profile::default();
        assert_eq!(dashboard_header(&profile), "Unnamed (no username)");
        profile.name = "Ana".to_string();
        profile.username = "ana001".to_string();
        assert_eq!(dashboard_header(&profile), "Ana (ana001)");
    }
}
