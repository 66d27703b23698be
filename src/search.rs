//! # Directory search
//!
//! The search page fetches the whole profile collection once, then every
//! keystroke filters that cached list in memory. Matching is
//! case-insensitive substring: name + username in user mode, title +
//! description + owner name in project mode.

use crate::model::{Profile, Project};

/// The profile collection as cached for one search-page load.
pub struct Directory {
    users: Vec<Profile>,
}

impl Directory {
    pub fn new(users: Vec<Profile>) -> Self {
        Self { users }
    }

    pub fn filter_users(&self, query: &str) -> Vec<&Profile> {
        let query = query.to_lowercase();
        self.users
            .iter()
            .filter(|user| {
                contains_ci(&user.name, &query) || contains_ci(&user.username, &query)
            })
            .collect()
    }

    pub fn filter_projects(&self, query: &str) -> Vec<(&Profile, &Project)> {
        let query = query.to_lowercase();
        self.users
            .iter()
            .flat_map(|user| user.projects.iter().map(move |project| (user, project)))
            .filter(|(user, project)| {
                contains_ci(&project.title, &query)
                    || contains_ci(&project.description, &query)
                    || contains_ci(&user.name, &query)
            })
            .collect()
    }
}

fn contains_ci(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Profile, Project};

    fn directory() -> Directory {
        let mut ana = Profile {
            id: "u1".to_string(),
            name: "Ana Lovelace".to_string(),
            username: "ana001".to_string(),
            ..Profile::default()
        };
        ana.projects.push(Project {
            title: "Compiler".to_string(),
            description: "A toy compiler".to_string(),
            link: String::new(),
        });

        let bert = Profile {
            id: "u2".to_string(),
            name: "Bert".to_string(),
            username: "bert_dev".to_string(),
            ..Profile::default()
        };

        Directory::new(vec![ana, bert])
    }

    #[test]
    fn user_matching_is_case_insensitive_over_name_and_username() {
        let directory = directory();

        let by_name: Vec<&str> = directory
            .filter_users("LOVELACE")
            .iter()
            .map(|u| u.id.as_str())
            .collect();
        assert_eq!(by_name, vec!["u1"]);

        let by_username: Vec<&str> = directory
            .filter_users("_dev")
            .iter()
            .map(|u| u.id.as_str())
            .collect();
        assert_eq!(by_username, vec!["u2"]);
    }

    #[test]
    fn project_matching_covers_title_description_and_owner() {
        let directory = directory();

        assert_eq!(directory.filter_projects("toy").len(), 1);
        assert_eq!(directory.filter_projects("compiler").len(), 1);
        // Owner-name hits count in project mode too.
        assert_eq!(directory.filter_projects("ana").len(), 1);
        assert_eq!(directory.filter_projects("bert").len(), 0);
    }

    #[test]
    fn name_hit_without_projects_stays_out_of_project_mode() {
        let directory = directory();
        assert_eq!(directory.filter_users("bert").len(), 1);
        assert_eq!(directory.filter_projects("bert").len(), 0);
    }
}
