use argon2::Argon2;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;

use crate::config::HashingConfig;
use crate::models::User;
use crate::services::ServiceError;
use crate::utils::{build_hasher, hash_password, verify_password, Password, PasswordHashString};

/// In-memory credential store keyed by account identifier.
///
/// Hashing happens before the map is touched, so the expensive Argon2 work
/// never runs while a shard lock is held; the uniqueness check and the
/// insert go through the entry API and are atomic per key.
#[derive(Clone)]
pub struct CredentialStore {
    users: Arc<DashMap<String, User>>,
    hasher: Argon2<'static>,
}

impl CredentialStore {
    pub fn new(config: &HashingConfig) -> Result<Self, anyhow::Error> {
        Ok(Self {
            users: Arc::new(DashMap::new()),
            hasher: build_hasher(config)?,
        })
    }

    /// Store a new identity under `identifier`. Only the salted hash of the
    /// password is retained.
    pub fn register(
        &self,
        identifier: &str,
        raw_password: &Password,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, ServiceError> {
        if self.users.contains_key(identifier) {
            return Err(ServiceError::AlreadyExists);
        }

        let password_hash = hash_password(&self.hasher, raw_password)
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Password hashing error: {}", e)))?;

        match self.users.entry(identifier.to_string()) {
            Entry::Occupied(_) => Err(ServiceError::AlreadyExists),
            Entry::Vacant(entry) => {
                let user = User::new(
                    identifier.to_string(),
                    password_hash.into_string(),
                    first_name.to_string(),
                    last_name.to_string(),
                );
                entry.insert(user.clone());
                Ok(user)
            }
        }
    }

    /// Look up an identity by identifier. No side effects.
    pub fn lookup(&self, identifier: &str) -> Option<User> {
        self.users.get(identifier).map(|u| u.clone())
    }

    /// Check a raw password against the stored hash. The caller passes the
    /// already looked-up user so no map lock is held during verification.
    pub fn verify_password(&self, user: &User, raw_password: &Password) -> bool {
        verify_password(
            raw_password,
            &PasswordHashString::new(user.password_hash.clone()),
        )
        .is_ok()
    }

    /// Replace the stored hash for an existing identity.
    pub fn update_password(
        &self,
        identifier: &str,
        raw_password: &Password,
    ) -> Result<bool, ServiceError> {
        let password_hash = hash_password(&self.hasher, raw_password)
            .map_err(|e| ServiceError::Internal(anyhow::anyhow!("Password hashing error: {}", e)))?;

        match self.users.get_mut(identifier) {
            Some(mut user) => {
                user.password_hash = password_hash.into_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
