use std::collections::HashMap;

use tracing::{error, info, warn};

use crate::api::BettingApi;
use crate::error::Result;
use crate::FormFields;

pub const USERNAME_KEY: &str = "username";
pub const HOME_PATH: &str = "/";
pub const USER_CREATED: &str = "User created successfully!";

/// Tab-scoped key/value storage that remembers the last created user.
pub trait SessionStore {
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemorySession {
    values: HashMap<String, String>,
}

impl MemorySession {
    pub fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

impl SessionStore for MemorySession {
    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created {
    pub alert: String,
    pub redirect: &'static str,
}

pub async fn submit<A: BettingApi, S: SessionStore>(
    api: &A,
    session: &mut S,
    fields: &FormFields,
) -> Result<Created> {
    info!("Creating user: {fields:?}");
    let response = api.create_user(fields).await.inspect_err(|e| {
        error!("Error creating user: {e}");
    })?;

    match fields.get("Username") {
        Some(username) => session.set(USERNAME_KEY, username).inspect_err(|e| {
            error!("Error creating user: {e}");
        })?,
        None => warn!("Create user form had no Username field, session not updated"),
    }

    Ok(Created {
        alert: response.message_or(USER_CREATED),
        redirect: HOME_PATH,
    })
}
