use serde::{Deserialize, Serialize};

use clinistock_core::{DomainError, DomainResult, Entity, UserId};

use crate::roles::Role;

/// An application user.
///
/// Users authenticate with an opaque bearer token looked up in the `users`
/// collection. Deactivated users keep their history but cannot act.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    username: String,
    role: Role,
    token: String,
    active: bool,
}

impl User {
    pub fn new(id: UserId, username: String, role: Role, token: String) -> DomainResult<Self> {
        if username.trim().is_empty() {
            return Err(DomainError::validation("username cannot be empty"));
        }
        if token.trim().is_empty() {
            return Err(DomainError::validation("token cannot be empty"));
        }
        Ok(Self {
            id,
            username,
            role,
            token,
            active: true,
        })
    }

    pub fn id_typed(&self) -> UserId {
        self.id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn role(&self) -> &Role {
        &self.role
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }
}

impl Entity for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
