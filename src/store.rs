//! # Document store
//!
//! Seam over the hosted document database plus the typed profile adapter
//! the page controllers talk to.
//!
//! The adapter is optimistic-write: after a successful save the caller's
//! in-memory profile is taken as authoritative, there is no re-read.
//! `projects` is always written as the whole array.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tracing::info;

use crate::{
    auth::Identity,
    config::Config,
    error::AppError,
    model::{Profile, ProfileEdit, Project},
};

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, AppError>;
    /// Full overwrite.
    async fn set(&self, collection: &str, key: &str, doc: &Value) -> Result<(), AppError>;
    /// Top-level field merge into an existing document.
    async fn update(&self, collection: &str, key: &str, fields: &Value) -> Result<(), AppError>;
    async fn delete(&self, collection: &str, key: &str) -> Result<(), AppError>;
    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, AppError>;
}

/// REST client for the hosted document database.
pub struct HttpDocumentStore {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

impl HttpDocumentStore {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.store_url.clone(),
            api_key: config.api_key.clone(),
        }
    }

    fn doc_url(&self, collection: &str, key: &str) -> String {
        format!("{}/{collection}/{key}?key={}", self.endpoint, self.api_key)
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, AppError> {
        let response = self.http.get(self.doc_url(collection, key)).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let doc = response.error_for_status()?.json().await?;
        Ok(Some(doc))
    }

    async fn set(&self, collection: &str, key: &str, doc: &Value) -> Result<(), AppError> {
        self.http
            .put(self.doc_url(collection, key))
            .json(doc)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn update(&self, collection: &str, key: &str, fields: &Value) -> Result<(), AppError> {
        self.http
            .patch(self.doc_url(collection, key))
            .json(fields)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), AppError> {
        self.http
            .delete(self.doc_url(collection, key))
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, AppError> {
        let url = format!("{}/{collection}?key={}", self.endpoint, self.api_key);
        let docs: HashMap<String, Value> = self
            .http
            .get(url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(docs.into_iter().collect())
    }
}

/// In-process document backend over nested `HashMap`s. Shares the
/// [`DocumentStore`] seam with [`HttpDocumentStore`]; also counts write
/// operations so callers can observe how many actually happened.
pub struct MemoryStore {
    collections: Mutex<HashMap<String, HashMap<String, Value>>>,
    writes: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
            writes: AtomicUsize::new(0),
        }
    }

    /// Number of `set`/`update` calls performed so far.
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::Relaxed)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, key: &str) -> Result<Option<Value>, AppError> {
        let collections = self.collections.lock().unwrap();
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(key))
            .cloned())
    }

    async fn set(&self, collection: &str, key: &str, doc: &Value) -> Result<(), AppError> {
        let mut collections = self.collections.lock().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(key.to_string(), doc.clone());
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn update(&self, collection: &str, key: &str, fields: &Value) -> Result<(), AppError> {
        let mut collections = self.collections.lock().unwrap();
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(key))
            .ok_or_else(|| AppError::Service(format!("no document {collection}/{key}")))?;

        let (Value::Object(existing), Value::Object(incoming)) = (doc, fields) else {
            return Err(AppError::Service("malformed document".to_string()));
        };
        for (field, value) in incoming {
            existing.insert(field.clone(), value.clone());
        }
        self.writes.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn delete(&self, collection: &str, key: &str) -> Result<(), AppError> {
        let mut collections = self.collections.lock().unwrap();
        if let Some(docs) = collections.get_mut(collection) {
            docs.remove(key);
        }
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<(String, Value)>, AppError> {
        let collections = self.collections.lock().unwrap();
        let mut docs: Vec<(String, Value)> = collections
            .get(collection)
            .map(|docs| docs.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default();
        docs.sort_by(|(a, _), (b, _)| a.cmp(b));
        Ok(docs)
    }
}

/// Typed adapter between the page controllers and the raw document seam.
#[derive(Clone)]
pub struct ProfileStore {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl ProfileStore {
    pub fn new(store: Arc<dyn DocumentStore>, collection: &str) -> Self {
        Self {
            store,
            collection: collection.to_string(),
        }
    }

    fn decode(key: &str, doc: Value) -> Result<Profile, AppError> {
        let mut profile: Profile = serde_json::from_value(doc)?;
        profile.id = key.to_string();
        Ok(profile)
    }

    /// Fetch the signed-in user's own document, synthesizing and persisting
    /// a default one on first access. Never reports not-found.
    pub async fn load_or_create(&self, identity: &Identity) -> Result<Profile, AppError> {
        if let Some(doc) = self.store.get(&self.collection, &identity.uid).await? {
            return Self::decode(&identity.uid, doc);
        }

        let profile = Profile::default_for(&identity.uid, &identity.email, "");
        self.create(&profile).await?;
        info!("Created profile document for {}", identity.uid);
        Ok(profile)
    }

    /// Fetch somebody else's document. Absence is an explicit `None`, never
    /// an implicit creation and never an error.
    pub async fn load_public(&self, key: &str) -> Result<Option<Profile>, AppError> {
        match self.store.get(&self.collection, key).await? {
            Some(doc) => Ok(Some(Self::decode(key, doc)?)),
            None => Ok(None),
        }
    }

    /// Full overwrite; used at registration and first access.
    pub async fn create(&self, profile: &Profile) -> Result<(), AppError> {
        let doc = serde_json::to_value(profile)?;
        self.store.set(&self.collection, &profile.id, &doc).await
    }

    /// Merge-write the profile-form field subset.
    pub async fn save_edit(&self, key: &str, edit: &ProfileEdit) -> Result<(), AppError> {
        let fields = serde_json::to_value(edit)?;
        self.store.update(&self.collection, key, &fields).await
    }

    pub async fn save_skills(&self, key: &str, skills: &[String]) -> Result<(), AppError> {
        self.store
            .update(&self.collection, key, &json!({ "skills": skills }))
            .await
    }

    /// Whole-array replace; both add and delete go through here.
    pub async fn save_projects(&self, key: &str, projects: &[Project]) -> Result<(), AppError> {
        self.store
            .update(&self.collection, key, &json!({ "projects": projects }))
            .await
    }

    /// Every stored profile, materialized once per search-page load.
    pub async fn list_all(&self) -> Result<Vec<Profile>, AppError> {
        let docs = self.store.list(&self.collection).await?;
        docs.into_iter()
            .map(|(key, doc)| Self::decode(&key, doc))
            .collect()
    }

    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.store.delete(&self.collection, key).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (Arc<MemoryStore>, ProfileStore) {
        let memory = Arc::new(MemoryStore::new());
        let profiles = ProfileStore::new(memory.clone(), "users");
        (memory, profiles)
    }

    fn ana() -> Identity {
        Identity {
            uid: "uid-1".to_string(),
            email: "ana@x.com".to_string(),
        }
    }

    #[tokio::test]
    async fn load_or_create_writes_the_document_exactly_once() {
        let (memory, profiles) = store();

        let first = profiles.load_or_create(&ana()).await.unwrap();
        assert_eq!(memory.write_count(), 1);
        assert_eq!(first.name, "ana@x.com");
        assert_eq!(first.contact.email, "ana@x.com");

        let second = profiles.load_or_create(&ana()).await.unwrap();
        assert_eq!(memory.write_count(), 1);
        assert_eq!(second, first);
    }

    #[tokio::test]
    async fn load_public_misses_are_none_not_errors() {
        let (_memory, profiles) = store();
        assert_eq!(profiles.load_public("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn save_edit_merges_without_clobbering_lists() {
        let (_memory, profiles) = store();
        let mut profile = profiles.load_or_create(&ana()).await.unwrap();
        profile.skills = vec!["rust".to_string()];
        profiles
            .save_skills(&profile.id, &profile.skills)
            .await
            .unwrap();

        let mut edit = profile.edit();
        edit.name = "Ana".to_string();
        profiles.save_edit(&profile.id, &edit).await.unwrap();

        let stored = profiles.load_public(&profile.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Ana");
        assert_eq!(stored.skills, vec!["rust".to_string()]);
    }

    #[tokio::test]
    async fn update_of_a_missing_document_is_a_service_error() {
        let (memory, _profiles) = store();
        let err = memory
            .update("users", "ghost", &json!({ "bio": "x" }))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Service(_)));
    }
}
