//! # Profile documents
//!
//! The document shapes stored per user, plus the pure mutations the
//! dashboard applies to them before persisting.
//!
//! Wire names are camelCase to match what the hosted store holds; the
//! identity key doubles as the document key and is never written into the
//! document body.

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// One user's portfolio content, keyed by their identity key.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Identity key. Lives outside the stored document body.
    #[serde(skip)]
    pub id: String,

    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub profile_pic_url: String,

    /// De-duplicated, first-seen order preserved for display.
    #[serde(default)]
    pub skills: Vec<String>,

    /// Insertion order, index-addressable for deletion.
    #[serde(default)]
    pub projects: Vec<Project>,

    #[serde(default)]
    pub contact: Contact,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    pub description: String,
    /// Optional; empty means no link affordance is rendered.
    #[serde(default)]
    pub link: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub socials: String,
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub phone: String,
}

/// The field subset the dashboard's profile form persists in one write.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEdit {
    pub name: String,
    pub username: String,
    pub date_of_birth: String,
    pub bio: String,
    pub contact: Contact,
}

/// A new-project form submission. Title and description are required,
/// the link is not.
#[derive(Clone, Debug, Default)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub link: String,
}

impl Profile {
    /// Default document synthesized on first access for a fresh identity.
    /// The account email seeds both the display name fallback and the
    /// contact email.
    pub fn default_for(id: &str, email: &str, fallback_name: &str) -> Self {
        let name = if fallback_name.is_empty() {
            if email.is_empty() { "New user" } else { email }
        } else {
            fallback_name
        };

        Self {
            id: id.to_string(),
            name: name.to_string(),
            contact: Contact {
                email: email.to_string(),
                ..Contact::default()
            },
            ..Self::default()
        }
    }

    pub fn apply_edit(&mut self, edit: &ProfileEdit) {
        self.name = edit.name.trim().to_string();
        self.username = edit.username.trim().to_string();
        self.date_of_birth = edit.date_of_birth.trim().to_string();
        self.bio = edit.bio.trim().to_string();
        self.contact = Contact {
            email: edit.contact.email.trim().to_string(),
            socials: edit.contact.socials.trim().to_string(),
            website: edit.contact.website.trim().to_string(),
            phone: edit.contact.phone.trim().to_string(),
        };
    }

    /// Current form values for prefilling the dashboard editor.
    pub fn edit(&self) -> ProfileEdit {
        ProfileEdit {
            name: self.name.clone(),
            username: self.username.clone(),
            date_of_birth: self.date_of_birth.clone(),
            bio: self.bio.clone(),
            contact: self.contact.clone(),
        }
    }

    pub fn add_project(&mut self, draft: ProjectDraft) -> Result<(), AppError> {
        let title = draft.title.trim().to_string();
        let description = draft.description.trim().to_string();

        if title.is_empty() || description.is_empty() {
            return Err(AppError::MissingFields);
        }

        self.projects.push(Project {
            title,
            description,
            link: draft.link.trim().to_string(),
        });

        Ok(())
    }

    /// Removes the project at `index`. Survivors keep their relative order,
    /// entries past `index` shift down by one.
    pub fn remove_project(&mut self, index: usize) -> Result<Project, AppError> {
        if index >= self.projects.len() {
            return Err(AppError::ProjectOutOfRange(index));
        }
        Ok(self.projects.remove(index))
    }
}

/// Splits a comma-separated edit field into the stored skills list:
/// trim each entry, drop empties, dedupe exact matches, keep first-seen
/// order.
pub fn normalize_skills(raw: &str) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();

    for entry in raw.split(',') {
        let skill = entry.trim();
        if skill.is_empty() {
            continue;
        }
        if !skills.iter().any(|s| s == skill) {
            skills.push(skill.to_string());
        }
    }

    skills
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_skills_trims_dedupes_and_keeps_order() {
        assert_eq!(normalize_skills("a, b, a, ,c"), vec!["a", "b", "c"]);
        assert_eq!(normalize_skills(""), Vec::<String>::new());
        assert_eq!(normalize_skills(" , ,, "), Vec::<String>::new());
        // Exact-match dedupe is case-sensitive.
        assert_eq!(normalize_skills("Rust, rust"), vec!["Rust", "rust"]);
    }

    #[test]
    fn remove_project_shifts_survivors_down() {
        let mut profile = Profile::default();
        for title in ["a", "b", "c", "d"] {
            profile.projects.push(Project {
                title: title.to_string(),
                description: "d".to_string(),
                link: String::new(),
            });
        }

        let removed = profile.remove_project(1).unwrap();
        assert_eq!(removed.title, "b");
        let titles: Vec<&str> = profile.projects.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "c", "d"]);

        assert!(matches!(
            profile.remove_project(3),
            Err(AppError::ProjectOutOfRange(3))
        ));
    }

    #[test]
    fn add_project_requires_title_and_description() {
        let mut profile = Profile::default();

        let err = profile.add_project(ProjectDraft {
            title: "  ".to_string(),
            description: "D".to_string(),
            link: String::new(),
        });
        assert!(matches!(err, Err(AppError::MissingFields)));
        assert!(profile.projects.is_empty());

        profile
            .add_project(ProjectDraft {
                title: " T ".to_string(),
                description: "D".to_string(),
                link: String::new(),
            })
            .unwrap();
        assert_eq!(profile.projects[0].title, "T");
    }

    #[test]
    fn default_profile_seeds_name_and_contact_email() {
        let profile = Profile::default_for("u1", "ana@x.com", "");
        assert_eq!(profile.name, "ana@x.com");
        assert_eq!(profile.contact.email, "ana@x.com");
        assert!(profile.projects.is_empty());
        assert!(profile.skills.is_empty());

        let named = Profile::default_for("u1", "ana@x.com", "Ana");
        assert_eq!(named.name, "Ana");

        let bare = Profile::default_for("u1", "", "");
        assert_eq!(bare.name, "New user");
    }

    #[test]
    fn wire_shape_is_camel_case_without_id() {
        let profile = Profile::default_for("u1", "ana@x.com", "Ana");
        let value = serde_json::to_value(&profile).unwrap();
        assert!(value.get("id").is_none());
        assert!(value.get("dateOfBirth").is_some());
        assert!(value.get("profilePicUrl").is_some());
    }
}
