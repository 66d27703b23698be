use std::{env, fmt::Display, str::FromStr};

use tracing::{info, warn};

/// Endpoints and credentials for the hosted auth and document services.
pub struct Config {
    pub identity_url: String,
    pub store_url: String,
    pub api_key: String,
    pub users_collection: String,
}

impl Config {
    pub fn load() -> Self {
        Self {
            identity_url: try_load("HUB_IDENTITY_URL", "http://localhost:9099/v1"),
            store_url: try_load("HUB_STORE_URL", "http://localhost:8080/v1"),
            api_key: try_load("HUB_API_KEY", ""),
            users_collection: try_load("HUB_USERS_COLLECTION", "users"),
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> T
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| {
            warn!("Invalid {key} value: {e}");
        })
        .expect("Environment misconfigured!")
}
