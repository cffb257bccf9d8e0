use std::collections::HashMap;

use crate::auth::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::{Role, User};
use crate::store::CredentialStore;

/// Credential store backed by a map that is never mutated after construction.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    users: HashMap<String, User>,
}

impl InMemoryCredentialStore {
    pub fn from_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: users
                .into_iter()
                .map(|user| (user.username.clone(), user))
                .collect(),
        }
    }

    /// The two built-in accounts, `admin`/`admin123` and `user`/`user123`,
    /// hashed with the given bcrypt cost.
    pub fn seeded(cost: u32) -> Result<Self, AppError> {
        let users = vec![
            User::new("admin", hash_password("admin123", cost)?, Role::Admin),
            User::new("user", hash_password("user123", cost)?, Role::User),
        ];
        log::debug!("seeded {} users", users.len());
        Ok(Self::from_users(users))
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn find(&self, username: &str) -> Option<User> {
        self.users.get(username).cloned()
    }

    fn authenticate(&self, username: &str, password: &str) -> Result<Option<User>, AppError> {
        let user = match self.users.get(username) {
            Some(user) => user,
            None => return Ok(None),
        };
        if verify_password(password, &user.password_hash)? {
            Ok(Some(user.clone()))
        } else {
            Ok(None)
        }
    }
}
