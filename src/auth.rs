//! Role gate in front of the attendant and supervisor menus.

use serde::{Deserialize, Serialize};

use crate::types::Role;

/// Decides whether a username/password pair may act as `role`.
pub trait Authenticator {
    /// True when the pair is accepted for `role`.
    fn authenticate(&self, role: Role, username: &str, password: &str) -> bool;
}

/// One username/password pair bound to a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    /// Role the pair unlocks.
    pub role: Role,
    /// Login name, compared case-insensitively.
    pub username: String,
    /// Plain-text password, compared exactly.
    pub password: String,
}

/// Fixed in-memory table of credentials, usually built from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CredentialTable {
    entries: Vec<Credential>,
}

impl CredentialTable {
    /// Table holding `entries`.
    pub fn new(entries: Vec<Credential>) -> Self {
        Self { entries }
    }

    /// True when at least one credential unlocks `role`.
    pub fn has_role(&self, role: Role) -> bool {
        self.entries.iter().any(|c| c.role == role)
    }
}

impl Authenticator for CredentialTable {
    fn authenticate(&self, role: Role, username: &str, password: &str) -> bool {
        let username = username.trim().to_lowercase();
        let password = password.trim();
        self.entries.iter().any(|c| {
            c.role == role && c.username.to_lowercase() == username && c.password == password
        })
    }
}
